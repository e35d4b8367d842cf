use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    config::Config,
    errors::AppResult,
    models::domain::UploadedDocument,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PromptPart {
    Attachment {
        mime_type: String,
        file_name: String,
        data: Vec<u8>,
    },
    Text(String),
}

/// Ordered attachments and instructions sent in a single model call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerationRequest {
    pub parts: Vec<PromptPart>,
}

impl GenerationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, document: &UploadedDocument) -> Self {
        self.parts.push(PromptPart::Attachment {
            mime_type: document.content_type.clone(),
            file_name: document.file_name.clone(),
            data: document.bytes.clone(),
        });
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(PromptPart::Text(text.into()));
        self
    }

    pub fn attachment_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|p| matches!(p, PromptPart::Attachment { .. }))
            .count()
    }

    /// Concatenated text parts; handy for logging and assertions.
    pub fn instruction_text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                PromptPart::Text(text) => Some(text.as_str()),
                PromptPart::Attachment { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> AppResult<String>;
}

/// Chat-completions client for any OpenAI-compatible endpoint. The default
/// base URL is Gemini's compatibility layer, which accepts inline PDF parts.
pub struct OpenAiCompatibleModel {
    client: Client<OpenAIConfig>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionBody {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiCompatibleModel {
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(config.llm_api_key.expose_secret())
            .with_api_base(&config.llm_api_base);

        Self {
            client: Client::with_config(openai_config),
            model: config.llm_model.clone(),
        }
    }

    fn build_payload(model: &str, request: &GenerationRequest) -> Value {
        let content: Vec<Value> = request
            .parts
            .iter()
            .map(|part| match part {
                PromptPart::Attachment {
                    mime_type,
                    file_name,
                    data,
                } => json!({
                    "type": "file",
                    "file": {
                        "filename": file_name,
                        "file_data": format!("data:{};base64,{}", mime_type, BASE64.encode(data)),
                    }
                }),
                PromptPart::Text(text) => json!({ "type": "text", "text": text }),
            })
            .collect();

        json!({
            "model": model,
            "messages": [{ "role": "user", "content": content }],
        })
    }
}

#[async_trait]
impl GenerativeModel for OpenAiCompatibleModel {
    async fn generate(&self, request: GenerationRequest) -> AppResult<String> {
        log::debug!(
            "Calling model {} with {} attachment(s), {} instruction chars",
            self.model,
            request.attachment_count(),
            request.instruction_text().len()
        );

        let payload = Self::build_payload(&self.model, &request);
        let response: ChatCompletionBody = self.client.chat().create_byot(payload).await?;

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        Ok(text)
    }
}
