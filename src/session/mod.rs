//! Session state for one conversation with a persona
//!
//! This module holds the transcript, the selected persona, the draft input
//! and the busy gate that keeps one reply outstanding at a time.

pub mod message;
pub mod state;

pub use message::{Message, Role};
pub use state::{
    PendingTurn, Session, ValidationSkip, CONNECTIVITY_ERROR_REPLY, CREDENTIAL_ERROR_REPLY,
};
