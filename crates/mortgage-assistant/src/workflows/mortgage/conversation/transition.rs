use crate::workflows::mortgage::domain::{CollectedValue, ConversationState, ProfileField};
use crate::workflows::mortgage::eligibility::check_amount;

/// Follow-up requests understood once the verdict is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Explain,
    Suggest,
}

impl Command {
    /// Case-insensitive keyword match; "why" wins over "suggest" when both appear.
    pub fn detect(input: &str) -> Option<Self> {
        let lowered = input.to_lowercase();
        if lowered.contains("why") || lowered.contains("explain") {
            Some(Command::Explain)
        } else if lowered.contains("suggest") {
            Some(Command::Suggest)
        } else {
            None
        }
    }
}

/// What a single input does to the conversation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    Collected {
        value: CollectedValue,
        next: ConversationState,
    },
    Rejected(ProfileField),
    FollowUp(Command),
    Delegate,
}

/// Pure transition function: classifies `input` for the active `state`.
///
/// Collection steps only ever collect or reject; free text is delegated
/// once every field is known.
pub fn transition(state: ConversationState, input: &str) -> Transition {
    let Some(field) = state.awaiting() else {
        return match Command::detect(input) {
            Some(command) => Transition::FollowUp(command),
            None => Transition::Delegate,
        };
    };

    match parse_answer(field, input) {
        Some(value) => Transition::Collected {
            value,
            next: state.next(),
        },
        None => Transition::Rejected(field),
    }
}

fn parse_answer(field: ProfileField, input: &str) -> Option<CollectedValue> {
    match field {
        ProfileField::Income => parse_amount(field, input).map(CollectedValue::Income),
        ProfileField::CreditScore => parse_score(input).map(CollectedValue::CreditScore),
        ProfileField::LoanAmount => parse_amount(field, input).map(CollectedValue::LoanAmount),
        ProfileField::PropertyValue => {
            parse_amount(field, input).map(CollectedValue::PropertyValue)
        }
    }
}

fn parse_amount(field: ProfileField, input: &str) -> Option<f64> {
    let value = input.trim().parse::<f64>().ok()?;
    check_amount(field, value).ok().map(f64::abs)
}

fn parse_score(input: &str) -> Option<u32> {
    input.trim().parse::<u32>().ok()
}
