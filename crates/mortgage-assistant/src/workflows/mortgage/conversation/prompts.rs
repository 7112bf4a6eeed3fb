use crate::workflows::mortgage::domain::{ConversationState, ProfileField};

pub const GREETING: &str = "Hello! I'm here to help you check your mortgage loan eligibility. \
Let's start by knowing your income. Please enter your income.";

pub const CHECKING_ELIGIBILITY: &str =
    "Thank you for providing all the details. Let me check your eligibility...";

pub const FOLLOW_UP_OFFER: &str = "Would you like to know why or get suggestions for improvement?";

pub const ALREADY_ELIGIBLE: &str = "You're already eligible for a mortgage loan.";

pub const REASONS_PREFIX: &str = "Here's why you're ineligible: ";

pub const SUGGESTIONS_PREFIX: &str = "Here are some suggestions to improve your eligibility: ";

/// Question asked on entering a collection state.
pub fn request_for(state: ConversationState) -> &'static str {
    match state {
        ConversationState::AwaitingIncome => "Please enter your income.",
        ConversationState::AwaitingCreditScore => {
            "Great! Now, could you please tell me your credit score?"
        }
        ConversationState::AwaitingLoanAmount => {
            "Thank you! How much loan amount are you looking for?"
        }
        ConversationState::AwaitingPropertyValue => {
            "Got it! Lastly, could you please provide the property value?"
        }
        ConversationState::ReadyForEvaluation => CHECKING_ELIGIBILITY,
    }
}

pub fn invalid_input(field: ProfileField) -> String {
    let label = field.label();
    format!("That doesn't seem like a valid number for {label}. Please enter a valid {label}.")
}
