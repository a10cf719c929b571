//! Base provider trait and common types for Maguai
//!
//! This module defines the Provider trait that the upstream generative API
//! must implement, along with the provider-neutral request, response and
//! fault types the adapter works with.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a turn as the upstream API understands it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// Text written by the user
    User,
    /// Text previously produced by the model
    Model,
}

impl TurnRole {
    /// Wire name of the role ("user" or "model")
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

/// A single role-tagged text turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Who produced the text
    pub role: TurnRole,
    /// Plain text of the turn
    pub text: String,
}

impl Turn {
    /// Creates a user turn
    ///
    /// # Examples
    ///
    /// ```
    /// use maguai::providers::{Turn, TurnRole};
    ///
    /// let turn = Turn::user("Hello");
    /// assert_eq!(turn.role, TurnRole::User);
    /// ```
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    /// Creates a model turn
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Model,
            text: text.into(),
        }
    }
}

/// Extended reasoning settings
///
/// Present on a request only when thinking mode is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThinkingConfig {
    /// Token allowance for internal reasoning before answering
    pub budget_tokens: u32,
    /// Ask the upstream to return its reasoning trace alongside the answer
    pub include_thoughts: bool,
}

/// Sampling and reasoning parameters for a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Sampling temperature
    pub temperature: f32,
    /// Reasoning budget, `None` when thinking mode is off
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking: Option<ThinkingConfig>,
}

/// Provider-neutral generation request
///
/// `contents` holds every prior turn followed by the new user turn, in
/// transcript order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Prior turns followed by the new user turn
    pub contents: Vec<Turn>,
    /// Fixed persona instruction
    pub system_instruction: String,
    /// Sampling and reasoning parameters
    pub config: GenerationConfig,
}

impl GenerateRequest {
    /// Whether the request asks for extended reasoning
    pub fn has_thinking_budget(&self) -> bool {
        self.config.thinking.is_some()
    }
}

/// Token usage information from a generation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: usize,
    /// Number of tokens in the answer
    pub completion_tokens: usize,
    /// Number of tokens spent on internal reasoning
    pub thinking_tokens: usize,
    /// Total tokens reported by the upstream
    pub total_tokens: usize,
}

/// Text extracted from an upstream response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateResponse {
    /// Answer text, `None` when the upstream produced nothing usable
    pub text: Option<String>,
    /// Reasoning trace, when requested and returned
    pub thoughts: Option<String>,
    /// Token accounting, when reported
    pub usage: Option<TokenUsage>,
}

impl GenerateResponse {
    /// Creates a response carrying only answer text
    ///
    /// # Examples
    ///
    /// ```
    /// use maguai::providers::GenerateResponse;
    ///
    /// let response = GenerateResponse::text("Hi there");
    /// assert_eq!(response.text.as_deref(), Some("Hi there"));
    /// assert!(response.thoughts.is_none());
    /// ```
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Creates a response with no text at all
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Category of an upstream fault
///
/// Mirrors the canonical status names the upstream puts in its error bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultKind {
    /// `NOT_FOUND`: the requested entity (model or key binding) does not exist
    NotFound,
    /// `UNAUTHENTICATED`
    Unauthenticated,
    /// `PERMISSION_DENIED`
    PermissionDenied,
    /// `INVALID_ARGUMENT`
    InvalidArgument,
    /// `RESOURCE_EXHAUSTED`
    ResourceExhausted,
    /// `UNAVAILABLE`
    Unavailable,
    /// `INTERNAL`
    Internal,
    /// Any other status string, or none at all
    Other(String),
}

impl FaultKind {
    /// Parse a canonical status name
    ///
    /// # Examples
    ///
    /// ```
    /// use maguai::providers::FaultKind;
    ///
    /// assert_eq!(FaultKind::from_status("NOT_FOUND"), FaultKind::NotFound);
    /// assert_eq!(FaultKind::from_status("ABORTED"), FaultKind::Other("ABORTED".into()));
    /// ```
    pub fn from_status(status: &str) -> Self {
        match status {
            "NOT_FOUND" => Self::NotFound,
            "UNAUTHENTICATED" => Self::Unauthenticated,
            "PERMISSION_DENIED" => Self::PermissionDenied,
            "INVALID_ARGUMENT" => Self::InvalidArgument,
            "RESOURCE_EXHAUSTED" => Self::ResourceExhausted,
            "UNAVAILABLE" => Self::Unavailable,
            "INTERNAL" => Self::Internal,
            other => Self::Other(other.to_string()),
        }
    }

    /// Best-effort kind for an HTTP status when the body names none
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 => Self::InvalidArgument,
            401 => Self::Unauthenticated,
            403 => Self::PermissionDenied,
            404 => Self::NotFound,
            429 => Self::ResourceExhausted,
            500 => Self::Internal,
            503 => Self::Unavailable,
            _ => Self::Other(String::new()),
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Unauthenticated => write!(f, "UNAUTHENTICATED"),
            Self::PermissionDenied => write!(f, "PERMISSION_DENIED"),
            Self::InvalidArgument => write!(f, "INVALID_ARGUMENT"),
            Self::ResourceExhausted => write!(f, "RESOURCE_EXHAUSTED"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
            Self::Internal => write!(f, "INTERNAL"),
            Self::Other(s) if s.is_empty() => write!(f, "UNKNOWN"),
            Self::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Structured fault returned by the upstream API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamFault {
    /// HTTP status code
    pub status: u16,
    /// Canonical fault category
    pub kind: FaultKind,
    /// Human-readable message from the upstream
    pub message: String,
    /// Whether `kind` was named by the upstream itself rather than guessed
    /// from the HTTP status
    pub reported: bool,
}

impl fmt::Display for UpstreamFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.status, self.kind, self.message)
    }
}

/// Provider trait for the upstream generative API
///
/// The narrow contract the adapter depends on: role-tagged turns, a system
/// instruction, a temperature and an optional reasoning budget go in; text
/// or a fault comes out. Faults reported by the upstream should be returned
/// as [`crate::error::MaguaiError::Upstream`] so they can be classified by
/// kind.
///
/// # Examples
///
/// ```no_run
/// use maguai::providers::{GenerateRequest, GenerateResponse, Provider};
/// use maguai::error::Result;
/// use async_trait::async_trait;
///
/// struct EchoProvider;
///
/// #[async_trait]
/// impl Provider for EchoProvider {
///     async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
///         let last = request.contents.last().map(|t| t.text.clone());
///         Ok(GenerateResponse { text: last, ..Default::default() })
///     }
///
///     fn model_name(&self) -> String {
///         "echo".to_string()
///     }
/// }
/// ```
#[async_trait]
pub trait Provider: Send + Sync {
    /// Issue one generation request
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, an upstream fault, or an
    /// unparseable response
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse>;

    /// Name of the upstream model requests are sent to
    fn model_name(&self) -> String;
}
