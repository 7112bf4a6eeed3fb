//! Turn handling for the eligibility conversation.
//!
//! [`transition`] decides what an input means in the active state without
//! touching anything; [`ConversationController`] applies that decision to a
//! session, calling the evaluator or the free-text responder as needed.

mod controller;
pub mod prompts;
mod transition;

pub use controller::{ControllerError, ConversationController, TurnReply};
pub use transition::{transition, Command, Transition};
