use std::env;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::error::TutorError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o";

/// One system/user exchange with a token budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TutorPrompt {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
}

impl TutorPrompt {
    #[must_use]
    pub fn new(system: impl Into<String>, user: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            max_tokens,
        }
    }
}

/// A chat-completion backend.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Whether the backend can answer at all.
    fn enabled(&self) -> bool;

    /// # Errors
    ///
    /// Returns `TutorError` when the backend is disabled or the call fails.
    async fn complete(&self, prompt: &TutorPrompt) -> Result<String, TutorError>;
}

#[derive(Clone, Debug)]
pub struct TutorConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl TutorConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("MAGLAB_AI_API_KEY").ok()?;
        Self::with_key(api_key)
    }

    /// Config for `api_key` with base URL and model taken from the environment.
    #[must_use]
    pub fn with_key(api_key: impl Into<String>) -> Option<Self> {
        let api_key = api_key.into().trim().to_owned();
        if api_key.is_empty() {
            return None;
        }
        let base_url = env::var("MAGLAB_AI_BASE_URL")
            .ok()
            .filter(|raw| Url::parse(raw).is_ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let model = env::var("MAGLAB_AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
        Some(Self {
            base_url,
            api_key,
            model,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// OpenAI-compatible `/chat/completions` client.
#[derive(Clone)]
pub struct OpenAiChat {
    client: Client,
    config: TutorConfig,
}

impl OpenAiChat {
    #[must_use]
    pub fn new(config: TutorConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl ChatCompletion for OpenAiChat {
    fn enabled(&self) -> bool {
        true
    }

    async fn complete(&self, prompt: &TutorPrompt) -> Result<String, TutorError> {
        let payload = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompt.system.clone(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt.user.clone(),
                },
            ],
            max_tokens: prompt.max_tokens,
            temperature: 0.7,
        };

        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TutorError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(TutorError::EmptyResponse)?;

        Ok(content.trim().to_string())
    }
}

/// Backend used when no credential is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisabledChat;

#[async_trait]
impl ChatCompletion for DisabledChat {
    fn enabled(&self) -> bool {
        false
    }

    async fn complete(&self, _prompt: &TutorPrompt) -> Result<String, TutorError> {
        Err(TutorError::Disabled)
    }
}

/// Result of a tutor call that never fails: either the answer or a readable
/// error line to show in its place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TutorReply {
    Answer(String),
    Unavailable(String),
}

impl TutorReply {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Answer(text) | Self::Unavailable(text) => text,
        }
    }

    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Answer(text) | Self::Unavailable(text) => text,
        }
    }

    #[must_use]
    pub fn is_answer(&self) -> bool {
        matches!(self, Self::Answer(_))
    }
}

/// The chat tutor. The backend is picked at startup and can be swapped when a
/// key is entered at runtime.
pub struct TutorService {
    backend: RwLock<Arc<dyn ChatCompletion>>,
}

impl TutorService {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_config(TutorConfig::from_env())
    }

    #[must_use]
    pub fn from_config(config: Option<TutorConfig>) -> Self {
        match config {
            Some(config) => Self::new(Arc::new(OpenAiChat::new(config))),
            None => Self::disabled(),
        }
    }

    #[must_use]
    pub fn new(backend: Arc<dyn ChatCompletion>) -> Self {
        Self {
            backend: RwLock::new(backend),
        }
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self::new(Arc::new(DisabledChat))
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.backend().enabled()
    }

    /// Replace the credential for later calls; a blank key disables the tutor.
    pub fn set_api_key(&self, api_key: &str) {
        let backend: Arc<dyn ChatCompletion> = match TutorConfig::with_key(api_key) {
            Some(config) => Arc::new(OpenAiChat::new(config)),
            None => Arc::new(DisabledChat),
        };
        self.replace_backend(backend);
    }

    pub fn replace_backend(&self, backend: Arc<dyn ChatCompletion>) {
        let enabled = backend.enabled();
        match self.backend.write() {
            Ok(mut guard) => *guard = backend,
            Err(poisoned) => *poisoned.into_inner() = backend,
        }
        debug!(enabled, "tutor backend replaced");
    }

    /// Ask the tutor.
    ///
    /// # Errors
    ///
    /// Returns `TutorError` when no credential is configured or the call fails.
    pub async fn try_complete(&self, prompt: &TutorPrompt) -> Result<String, TutorError> {
        let backend = self.backend();
        backend.complete(prompt).await
    }

    /// Ask the tutor, turning any failure into a readable line.
    pub async fn complete(&self, prompt: &TutorPrompt) -> TutorReply {
        match self.try_complete(prompt).await {
            Ok(text) => TutorReply::Answer(text),
            Err(err) => {
                warn!(error = %err, "tutor call failed");
                TutorReply::Unavailable(format!("[tutor unavailable] {err}"))
            }
        }
    }

    fn backend(&self) -> Arc<dyn ChatCompletion> {
        match self.backend.read() {
            Ok(guard) => Arc::clone(&*guard),
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}
