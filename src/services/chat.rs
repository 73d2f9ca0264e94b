use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::AiSettings;
use crate::error::StartupError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: ChatRole::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into() }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned {status}: {body}")]
    Status { status: reqwest::StatusCode, body: String },

    #[error("response contained no message")]
    EmptyResponse,
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    fn deployment(&self) -> &str;

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatError>;
}

/// Chat completions against an Azure OpenAI deployment.
pub struct AzureOpenAiChatClient {
    http: reqwest::Client,
    completions_url: Url,
    deployment: String,
}

impl AzureOpenAiChatClient {
    /// Builds the client without touching the network.
    pub fn new(settings: &AiSettings) -> Result<Self, StartupError> {
        let mut key = HeaderValue::from_str(&settings.key)
            .map_err(|err| StartupError::ChatClient(format!("invalid credential: {err}")))?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("api-key", key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| StartupError::ChatClient(err.to_string()))?;

        let completions_url = completions_url(&settings.endpoint, &settings.deployment_name, &settings.api_version)?;

        Ok(Self {
            http,
            completions_url,
            deployment: settings.deployment_name.clone(),
        })
    }

    pub fn completions_url(&self) -> &Url {
        &self.completions_url
    }
}

#[async_trait]
impl ChatClient for AzureOpenAiChatClient {
    fn deployment(&self) -> &str {
        &self.deployment
    }

    #[tracing::instrument(level = "debug", skip_all, fields(deployment = %self.deployment, messages = messages.len()))]
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatError> {
        let response = self
            .http
            .post(self.completions_url.clone())
            .json(&CompletionRequest { messages })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "chat completion rejected");

            return Err(ChatError::Status { status, body });
        }

        let completion: CompletionResponse = response.json().await?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ChatError::EmptyResponse)
    }
}

fn completions_url(endpoint: &Url, deployment: &str, api_version: &str) -> Result<Url, StartupError> {
    let mut url = endpoint.clone();

    url.path_segments_mut()
        .map_err(|_| StartupError::ChatClient(format!("endpoint `{endpoint}` cannot carry a path")))?
        .pop_if_empty()
        .extend(["openai", "deployments", deployment, "chat", "completions"]);

    url.query_pairs_mut().clear().append_pair("api-version", api_version);

    Ok(url)
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}
