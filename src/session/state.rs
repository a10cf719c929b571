//! Session state and its mutation operations
//!
//! A [`Session`] is owned by the presentation layer. The busy flag is the
//! only concurrency control: while a reply is outstanding every further
//! submission is rejected, never queued.

use crate::adapter::{Adapter, AdapterError, Reply};
use crate::catalog::Model;
use crate::session::Message;
use thiserror::Error;

/// Assistant reply shown when the upstream rejects the credential
pub const CREDENTIAL_ERROR_REPLY: &str = "Your API key appears to be invalid or expired. \
Please check your credentials and reconnect, then try again.";

/// Assistant reply shown for any other upstream or transport failure
pub const CONNECTIVITY_ERROR_REPLY: &str = "Sorry, I encountered an error connecting to the \
Maguai network. Please check your connection and try again.";

/// Why a submission was ignored
///
/// Never shown to the user; the session is left untouched.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationSkip {
    /// Input was empty or whitespace only
    #[error("empty input")]
    EmptyInput,
    /// A reply is still outstanding
    #[error("session is busy")]
    Busy,
}

/// Receipt for an accepted submission
///
/// Hand it back to [`Session::complete_turn`] once the adapter resolves.
#[derive(Debug)]
#[must_use = "an accepted submission keeps the session busy until it is completed"]
pub struct PendingTurn {
    /// Id of the user message that opened the turn
    pub message_id: String,
    /// Thinking mode at submission time
    pub thinking_mode: bool,
}

/// State of one ongoing conversation
#[derive(Debug, Clone)]
pub struct Session {
    selected_model: Model,
    transcript: Vec<Message>,
    pending_input: String,
    thinking_mode: bool,
    busy: bool,
}

impl Session {
    /// Start an empty session with the given persona
    ///
    /// # Examples
    ///
    /// ```
    /// use maguai::catalog;
    /// use maguai::session::Session;
    ///
    /// let session = Session::new(catalog::default_model());
    /// assert!(session.transcript().is_empty());
    /// assert!(!session.is_busy());
    /// ```
    pub fn new(model: &Model) -> Self {
        Self {
            selected_model: model.clone(),
            transcript: Vec::new(),
            pending_input: String::new(),
            thinking_mode: false,
            busy: false,
        }
    }

    /// Builder-style initial thinking mode
    pub fn with_thinking_mode(mut self, enabled: bool) -> Self {
        self.thinking_mode = enabled;
        self
    }

    /// Currently selected persona
    pub fn selected_model(&self) -> &Model {
        &self.selected_model
    }

    /// Messages in order
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// Draft input text
    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    /// Whether thinking mode is on
    pub fn thinking_mode(&self) -> bool {
        self.thinking_mode
    }

    /// Whether a reply is outstanding
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Switch persona; the transcript is cleared, the draft is kept
    pub fn select_model(&mut self, model: &Model) {
        tracing::info!(
            "Selected model {} ({}), clearing {} messages",
            model.id,
            model.name,
            self.transcript.len()
        );
        self.selected_model = model.clone();
        self.transcript.clear();
    }

    /// Replace the draft input text
    pub fn set_pending_input(&mut self, text: impl Into<String>) {
        self.pending_input = text.into();
    }

    /// Flip thinking mode and return the new value
    pub fn toggle_thinking_mode(&mut self) -> bool {
        self.thinking_mode = !self.thinking_mode;
        tracing::debug!(thinking_mode = self.thinking_mode, "Toggled thinking mode");
        self.thinking_mode
    }

    /// Append a user message and mark the session busy
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationSkip`] without touching the session when the
    /// trimmed text is empty or a reply is already outstanding
    ///
    /// # Examples
    ///
    /// ```
    /// use maguai::catalog;
    /// use maguai::session::{Session, ValidationSkip};
    ///
    /// let mut session = Session::new(catalog::default_model());
    /// assert_eq!(session.submit_user_message("   ").unwrap_err(), ValidationSkip::EmptyInput);
    ///
    /// let turn = session.submit_user_message(" Hello ").unwrap();
    /// assert_eq!(session.transcript()[0].content, "Hello");
    /// assert!(session.is_busy());
    /// assert_eq!(session.submit_user_message("again").unwrap_err(), ValidationSkip::Busy);
    ///
    /// session.complete_turn(turn, Ok("Hi there".into()));
    /// assert!(!session.is_busy());
    /// ```
    pub fn submit_user_message(&mut self, text: &str) -> Result<PendingTurn, ValidationSkip> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ValidationSkip::EmptyInput);
        }
        if self.busy {
            return Err(ValidationSkip::Busy);
        }

        let message = Message::user(trimmed);
        let turn = PendingTurn {
            message_id: message.id.clone(),
            thinking_mode: self.thinking_mode,
        };

        self.transcript.push(message);
        self.pending_input.clear();
        self.busy = true;

        Ok(turn)
    }

    /// Append the assistant side of a turn and release the busy flag
    ///
    /// Failures are turned into a regular assistant message so the error
    /// shows up in the transcript. Returns `None` when the turn's user message
    /// is gone because the model was switched meanwhile; the reply is then
    /// discarded.
    pub fn complete_turn(
        &mut self,
        turn: PendingTurn,
        outcome: Result<String, AdapterError>,
    ) -> Option<&Message> {
        let reply = outcome.map(|text| Reply {
            text,
            thinking: None,
        });
        let appended = self.finish(&turn, reply);
        self.busy = false;
        if appended {
            Some(self.last_message())
        } else {
            None
        }
    }

    /// Submit text, wait for the adapter and append its answer
    ///
    /// Returns the appended assistant message. The busy flag is released on
    /// every exit path, including when this future is dropped before the
    /// upstream answers (the user message then stays without a reply).
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationSkip`] when the submission is ignored; upstream
    /// failures are not errors here, they become assistant messages
    pub async fn send(&mut self, text: &str, adapter: &Adapter) -> Result<&Message, ValidationSkip> {
        let turn = self.submit_user_message(text)?;

        let guard = BusyGuard { session: &mut *self };
        let outcome = adapter
            .converse_detailed(&guard.session.transcript, turn.thinking_mode)
            .await;
        guard.session.finish(&turn, outcome);
        drop(guard);

        Ok(self.last_message())
    }

    fn finish(&mut self, turn: &PendingTurn, outcome: Result<Reply, AdapterError>) -> bool {
        if !self.transcript.iter().any(|m| m.id == turn.message_id) {
            tracing::debug!(
                "Dropping reply to {}: transcript was cleared",
                turn.message_id
            );
            return false;
        }

        let message = match outcome {
            Ok(reply) => Message::assistant_with_thinking(reply.text, reply.thinking),
            Err(AdapterError::CredentialExpired(detail)) => {
                tracing::warn!("Credential rejected by upstream: {}", detail);
                Message::assistant(CREDENTIAL_ERROR_REPLY)
            }
            Err(AdapterError::AdapterFailure(cause)) => {
                tracing::error!("Reply to {} failed: {:#}", turn.message_id, cause);
                Message::assistant(CONNECTIVITY_ERROR_REPLY)
            }
        };
        self.transcript.push(message);
        true
    }

    fn last_message(&self) -> &Message {
        // Only called once the turn's messages are in the transcript
        &self.transcript[self.transcript.len() - 1]
    }
}

/// Clears the busy flag when dropped
struct BusyGuard<'a> {
    session: &'a mut Session,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.session.busy = false;
    }
}
