//! Request adapter between a session transcript and the upstream provider
//!
//! The adapter reshapes a transcript into a [`GenerateRequest`], issues one
//! call, extracts plain text and classifies failures. It holds no
//! per-session state; callers serialize calls per session.

use crate::config::{ChatConfig, Config};
use crate::error::MaguaiError;
use crate::providers::{
    self, FaultKind, GenerateRequest, GenerationConfig, Provider, ThinkingConfig, Turn,
};
use crate::session::{Message, Role};
use thiserror::Error;

/// Returned when the upstream answers without any text
pub const FALLBACK_REPLY: &str = "I'm sorry, I couldn't generate a response.";

/// Returned, without calling the upstream, for an empty transcript
pub const EMPTY_TRANSCRIPT_REPLY: &str = "No message content found.";

// Upstream message for a stale key or an unknown model binding. Only
// consulted when a fault carries no upstream-reported kind.
const ENTITY_NOT_FOUND: &str = "entity was not found";

/// Failure of a single `converse` call
#[derive(Error, Debug)]
pub enum AdapterError {
    /// The upstream rejected the credential or the entity it is bound to
    #[error("Credential expired or invalid: {0}")]
    CredentialExpired(String),

    /// Any other transport or upstream fault
    #[error("Adapter failure: {0}")]
    AdapterFailure(#[source] anyhow::Error),
}

/// Answer text plus the optional reasoning trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Plain-text answer (the fallback string when the upstream returned none)
    pub text: String,
    /// Reasoning trace, when requested and returned
    pub thinking: Option<String>,
}

/// Fixed request parameters
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterSettings {
    /// Persona instruction sent with every request
    pub system_instruction: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Reasoning budget attached in thinking mode
    pub thinking_budget: u32,
    /// Ask for the reasoning trace in thinking mode
    pub include_thoughts: bool,
}

impl From<&ChatConfig> for AdapterSettings {
    fn from(chat: &ChatConfig) -> Self {
        Self {
            system_instruction: chat.system_prompt.clone(),
            temperature: chat.temperature,
            thinking_budget: chat.thinking_budget,
            include_thoughts: chat.include_thoughts,
        }
    }
}

impl Default for AdapterSettings {
    fn default() -> Self {
        Self::from(&ChatConfig::default())
    }
}

/// Adapter over one upstream provider
pub struct Adapter {
    provider: Box<dyn Provider>,
    settings: AdapterSettings,
}

impl Adapter {
    /// Create an adapter over an existing provider
    pub fn new(provider: Box<dyn Provider>, settings: AdapterSettings) -> Self {
        Self { provider, settings }
    }

    /// Create the configured provider and wrap it
    ///
    /// # Errors
    ///
    /// Returns error if the provider type is unknown or the HTTP client
    /// cannot be built
    pub fn from_config(config: &Config) -> crate::error::Result<Self> {
        let provider = providers::create_provider(&config.provider.provider_type, &config.provider)?;
        Ok(Self::new(provider, AdapterSettings::from(&config.chat)))
    }

    /// Settings this adapter sends with every request
    pub fn settings(&self) -> &AdapterSettings {
        &self.settings
    }

    /// Name of the upstream model
    pub fn model_name(&self) -> String {
        self.provider.model_name()
    }

    /// Build the upstream request for a transcript
    ///
    /// The last message is the new user turn and everything before it is
    /// context. Roles map `user -> user` and `assistant -> model`, in order.
    /// The reasoning budget is attached only when `thinking_mode` is set.
    ///
    /// # Errors
    ///
    /// Returns `AdapterFailure` for an empty transcript
    ///
    /// # Examples
    ///
    /// ```
    /// use maguai::adapter::{Adapter, AdapterSettings};
    /// use maguai::config::GeminiConfig;
    /// use maguai::providers::GeminiProvider;
    /// use maguai::session::Message;
    ///
    /// let provider = GeminiProvider::new(GeminiConfig::default()).unwrap();
    /// let adapter = Adapter::new(Box::new(provider), AdapterSettings::default());
    ///
    /// let transcript = vec![Message::user("Hello")];
    /// let request = adapter.build_request(&transcript, true).unwrap();
    /// assert_eq!(request.config.thinking.unwrap().budget_tokens, 32768);
    ///
    /// let request = adapter.build_request(&transcript, false).unwrap();
    /// assert!(request.config.thinking.is_none());
    /// ```
    pub fn build_request(
        &self,
        transcript: &[Message],
        thinking_mode: bool,
    ) -> Result<GenerateRequest, AdapterError> {
        if transcript.is_empty() {
            return Err(AdapterError::AdapterFailure(anyhow::anyhow!(
                "cannot converse with an empty transcript"
            )));
        }

        let contents = transcript
            .iter()
            .map(|m| match m.role {
                Role::User => Turn::user(m.content.clone()),
                Role::Assistant => Turn::model(m.content.clone()),
            })
            .collect();

        let thinking = thinking_mode.then(|| ThinkingConfig {
            budget_tokens: self.settings.thinking_budget,
            include_thoughts: self.settings.include_thoughts,
        });

        Ok(GenerateRequest {
            contents,
            system_instruction: self.settings.system_instruction.clone(),
            config: GenerationConfig {
                temperature: self.settings.temperature,
                thinking,
            },
        })
    }

    /// Send the transcript upstream and return the answer text
    ///
    /// An empty transcript resolves to [`EMPTY_TRANSCRIPT_REPLY`] without
    /// an upstream call.
    ///
    /// # Errors
    ///
    /// Returns `CredentialExpired` when the upstream reports the entity was
    /// not found, `AdapterFailure` for every other fault
    pub async fn converse(
        &self,
        transcript: &[Message],
        thinking_mode: bool,
    ) -> Result<String, AdapterError> {
        self.converse_detailed(transcript, thinking_mode)
            .await
            .map(|reply| reply.text)
    }

    /// Like [`Adapter::converse`], but also returns the reasoning trace
    pub async fn converse_detailed(
        &self,
        transcript: &[Message],
        thinking_mode: bool,
    ) -> Result<Reply, AdapterError> {
        if transcript.is_empty() {
            tracing::warn!("Converse called with an empty transcript");
            return Ok(Reply {
                text: EMPTY_TRANSCRIPT_REPLY.to_string(),
                thinking: None,
            });
        }

        let request = self.build_request(transcript, thinking_mode)?;

        tracing::debug!(
            "Conversing: {} turns, thinking_mode={}",
            request.contents.len(),
            thinking_mode
        );

        let response = self.provider.generate(&request).await.map_err(|e| {
            let classified = classify_fault(e);
            tracing::error!("Upstream call failed: {}", classified);
            classified
        })?;

        let text = response
            .text
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| {
                tracing::warn!("Upstream returned no text, using fallback reply");
                FALLBACK_REPLY.to_string()
            });

        Ok(Reply {
            text,
            thinking: response.thoughts,
        })
    }
}

/// Classify a provider error into the adapter taxonomy
///
/// An upstream-reported fault of kind `NotFound` maps to `CredentialExpired`;
/// any other reported kind is an `AdapterFailure`. A kind guessed from the
/// HTTP status alone (a bare 404 from a proxy, say) is not trusted: like any
/// error without a reported kind, its text is searched for the upstream's
/// "entity was not found" message. Everything else is an `AdapterFailure`
/// carrying the original error.
pub fn classify_fault(err: anyhow::Error) -> AdapterError {
    if let Some(MaguaiError::Upstream(fault)) = err.downcast_ref::<MaguaiError>() {
        if fault.reported {
            return match fault.kind {
                FaultKind::NotFound => AdapterError::CredentialExpired(fault.message.clone()),
                _ => AdapterError::AdapterFailure(err),
            };
        }
    }

    if format!("{:#}", err).to_lowercase().contains(ENTITY_NOT_FOUND) {
        return AdapterError::CredentialExpired(err.to_string());
    }

    AdapterError::AdapterFailure(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::providers::{GenerateResponse, UpstreamFault};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Provider returning a canned outcome and recording every request
    struct ScriptedProvider {
        outcome: fn() -> Result<GenerateResponse>,
        seen: Arc<Mutex<Vec<GenerateRequest>>>,
    }

    #[async_trait]
    impl Provider for ScriptedProvider {
        async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
            self.seen.lock().unwrap().push(request.clone());
            (self.outcome)()
        }

        fn model_name(&self) -> String {
            "scripted".to_string()
        }
    }

    fn adapter_with(
        outcome: fn() -> Result<GenerateResponse>,
    ) -> (Adapter, Arc<Mutex<Vec<GenerateRequest>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let provider = ScriptedProvider {
            outcome,
            seen: Arc::clone(&seen),
        };
        (
            Adapter::new(Box::new(provider), AdapterSettings::default()),
            seen,
        )
    }

    fn transcript() -> Vec<Message> {
        vec![
            Message::user("Hello"),
            Message::assistant("Hi there"),
            Message::user("Tell me a joke"),
        ]
    }

    fn upstream(status: u16, kind: FaultKind, message: &str) -> anyhow::Error {
        MaguaiError::Upstream(UpstreamFault {
            status,
            kind,
            message: message.to_string(),
            reported: true,
        })
        .into()
    }

    #[test]
    fn test_build_request_maps_roles_in_order() {
        let (adapter, _) = adapter_with(|| Ok(GenerateResponse::empty()));
        let request = adapter.build_request(&transcript(), false).unwrap();

        let roles: Vec<&str> = request.contents.iter().map(|t| t.role.as_str()).collect();
        assert_eq!(roles, vec!["user", "model", "user"]);
        assert_eq!(request.contents[2].text, "Tell me a joke");
        assert_eq!(request.system_instruction, crate::config::DEFAULT_SYSTEM_PROMPT);
        assert_eq!(request.config.temperature, 0.7);
    }

    #[test]
    fn test_build_request_thinking_budget_only_in_thinking_mode() {
        let (adapter, _) = adapter_with(|| Ok(GenerateResponse::empty()));

        let with = adapter.build_request(&transcript(), true).unwrap();
        assert_eq!(
            with.config.thinking,
            Some(ThinkingConfig {
                budget_tokens: 32768,
                include_thoughts: false
            })
        );

        let without = adapter.build_request(&transcript(), false).unwrap();
        assert!(without.config.thinking.is_none());
    }

    #[test]
    fn test_build_request_empty_transcript() {
        let (adapter, _) = adapter_with(|| Ok(GenerateResponse::empty()));
        let err = adapter.build_request(&[], false).unwrap_err();
        assert!(matches!(err, AdapterError::AdapterFailure(_)));
    }

    #[tokio::test]
    async fn test_converse_returns_text() {
        let (adapter, seen) = adapter_with(|| Ok(GenerateResponse::text("Hi there")));
        let text = adapter.converse(&transcript(), true).await.unwrap();
        assert_eq!(text, "Hi there");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].has_thinking_budget());
    }

    #[tokio::test]
    async fn test_converse_empty_text_uses_fallback() {
        let (adapter, _) = adapter_with(|| Ok(GenerateResponse::empty()));
        assert_eq!(adapter.converse(&transcript(), false).await.unwrap(), FALLBACK_REPLY);

        let (adapter, _) = adapter_with(|| Ok(GenerateResponse::text("")));
        assert_eq!(adapter.converse(&transcript(), false).await.unwrap(), FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_converse_whitespace_text_is_kept() {
        let (adapter, _) = adapter_with(|| Ok(GenerateResponse::text("  ")));
        assert_eq!(adapter.converse(&transcript(), false).await.unwrap(), "  ");
    }

    #[tokio::test]
    async fn test_converse_detailed_keeps_thoughts() {
        let (adapter, _) = adapter_with(|| {
            Ok(GenerateResponse {
                text: Some("42".to_string()),
                thoughts: Some("6 * 7".to_string()),
                usage: None,
            })
        });
        let reply = adapter.converse_detailed(&transcript(), true).await.unwrap();
        assert_eq!(reply.text, "42");
        assert_eq!(reply.thinking.as_deref(), Some("6 * 7"));
    }

    #[tokio::test]
    async fn test_converse_empty_transcript_never_calls_upstream() {
        let (adapter, seen) = adapter_with(|| Ok(GenerateResponse::text("unused")));
        let text = adapter.converse(&[], false).await.unwrap();
        assert_eq!(text, EMPTY_TRANSCRIPT_REPLY);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_converse_not_found_is_credential_expired() {
        let (adapter, _) = adapter_with(|| {
            Err(upstream(404, FaultKind::NotFound, "Requested entity was not found."))
        });
        let err = adapter.converse(&transcript(), false).await.unwrap_err();
        assert!(matches!(err, AdapterError::CredentialExpired(_)));
    }

    #[tokio::test]
    async fn test_converse_other_fault_is_adapter_failure() {
        let (adapter, _) = adapter_with(|| {
            Err(upstream(503, FaultKind::Unavailable, "The model is overloaded."))
        });
        let err = adapter.converse(&transcript(), false).await.unwrap_err();
        match err {
            AdapterError::AdapterFailure(cause) => {
                assert!(matches!(
                    cause.downcast_ref::<MaguaiError>(),
                    Some(MaguaiError::Upstream(f)) if f.status == 503
                ));
            }
            other => panic!("expected AdapterFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_structured_kind_wins_over_message() {
        // A NOT_FOUND message under a different kind is not a credential problem
        let err = upstream(
            400,
            FaultKind::InvalidArgument,
            "Requested entity was not found.",
        );
        assert!(matches!(classify_fault(err), AdapterError::AdapterFailure(_)));
    }

    #[test]
    fn test_classify_guessed_not_found_is_adapter_failure() {
        let err: anyhow::Error = MaguaiError::Upstream(UpstreamFault {
            status: 404,
            kind: FaultKind::NotFound,
            message: "404 page not found".to_string(),
            reported: false,
        })
        .into();
        assert!(matches!(classify_fault(err), AdapterError::AdapterFailure(_)));

        let err: anyhow::Error = MaguaiError::Upstream(UpstreamFault {
            status: 404,
            kind: FaultKind::NotFound,
            message: "Requested entity was not found.".to_string(),
            reported: false,
        })
        .into();
        assert!(matches!(classify_fault(err), AdapterError::CredentialExpired(_)));
    }

    #[test]
    fn test_classify_message_fallback() {
        let err = anyhow::anyhow!("Requested entity was not found.");
        assert!(matches!(classify_fault(err), AdapterError::CredentialExpired(_)));

        let err = anyhow::anyhow!("REQUESTED ENTITY WAS NOT FOUND");
        assert!(matches!(classify_fault(err), AdapterError::CredentialExpired(_)));

        let err = anyhow::anyhow!("connection reset by peer");
        assert!(matches!(classify_fault(err), AdapterError::AdapterFailure(_)));
    }

    #[test]
    fn test_classify_fallback_sees_context_chain() {
        let err = anyhow::anyhow!("Requested entity was not found.").context("calling upstream");
        assert!(matches!(classify_fault(err), AdapterError::CredentialExpired(_)));
    }

    #[test]
    fn test_settings_from_chat_config() {
        let chat = ChatConfig {
            temperature: 0.1,
            thinking_budget: 2048,
            include_thoughts: true,
            system_prompt: "Be terse.".to_string(),
            ..Default::default()
        };
        let settings = AdapterSettings::from(&chat);
        assert_eq!(settings.temperature, 0.1);
        assert_eq!(settings.thinking_budget, 2048);
        assert!(settings.include_thoughts);
        assert_eq!(settings.system_instruction, "Be terse.");
    }
}
