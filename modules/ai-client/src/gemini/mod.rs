mod client;
pub(crate) mod schema;
pub(crate) mod types;

pub use schema::StructuredOutput;

use crate::error::AiError;
use crate::traits::StructuredGenerator;
use async_trait::async_trait;

use client::GeminiClient;
use types::*;

// =============================================================================
// Gemini Agent
// =============================================================================

/// Gemini model handle holding an injected credential.
///
/// Each call builds a fresh HTTP client; nothing is shared between requests.
#[derive(Clone)]
pub struct Gemini {
    api_key: String,
    model: String,
    base_url: Option<String>,
}

impl std::fmt::Debug for Gemini {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gemini")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Gemini {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
        }
    }

    /// Read the key from `GEMINI_API_KEY`, falling back to `API_KEY`.
    pub fn from_env(model: impl Into<String>) -> Result<Self, AiError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .map_err(|_| {
                AiError::Config("GEMINI_API_KEY environment variable not set".to_string())
            })?;
        Ok(Self::new(api_key, model))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Get the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub(crate) fn client(&self) -> GeminiClient {
        let client = GeminiClient::new(&self.api_key);
        if let Some(ref url) = self.base_url {
            client.with_base_url(url)
        } else {
            client
        }
    }

    async fn send(&self, request: &GenerateContentRequest) -> Result<String, AiError> {
        let response = self.client().generate(&self.model, request).await?;

        if let Some(reason) = response.block_reason() {
            return Err(AiError::Blocked(reason.to_string()));
        }

        response.text().ok_or(AiError::EmptyResponse)
    }

    // =========================================================================
    // Convenience methods
    // =========================================================================

    /// Plain text completion.
    pub async fn complete(&self, prompt: &str) -> Result<String, AiError> {
        self.send(&GenerateContentRequest::new(prompt)).await
    }

    /// Generate JSON constrained to a raw response schema and return the text payload.
    pub async fn generate_json(
        &self,
        prompt: &str,
        schema: serde_json::Value,
    ) -> Result<String, AiError> {
        let request = GenerateContentRequest::new(prompt).json_schema(schema);
        self.send(&request).await
    }

    /// Type-safe structured output extraction.
    pub async fn extract<T: StructuredOutput>(&self, prompt: &str) -> Result<T, AiError> {
        let text = self.generate_json(prompt, T::gemini_schema()).await?;
        Ok(serde_json::from_str(text.trim())?)
    }
}

// =============================================================================
// StructuredGenerator Implementation
// =============================================================================

#[async_trait]
impl StructuredGenerator for Gemini {
    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<String, AiError> {
        self.generate_json(prompt, schema.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_new() {
        let ai = Gemini::new("test-key", "gemini-3-pro-preview");
        assert_eq!(ai.model(), "gemini-3-pro-preview");
        assert_eq!(ai.api_key(), "test-key");
        assert_eq!(ai.base_url, None);
    }

    #[test]
    fn test_gemini_with_base_url() {
        let ai = Gemini::new("test-key", "gemini-3-pro-preview")
            .with_base_url("https://custom.api.com");
        assert_eq!(ai.base_url, Some("https://custom.api.com".to_string()));
        assert_eq!(
            ai.client().endpoint(ai.model()),
            "https://custom.api.com/models/gemini-3-pro-preview:generateContent"
        );
    }

    #[test]
    fn test_debug_hides_key() {
        let ai = Gemini::new("super-secret", "gemini-3-pro-preview");
        let rendered = format!("{ai:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("gemini-3-pro-preview"));
    }

    #[test]
    fn test_unreachable_host_is_network_error() {
        let ai = Gemini::new("test-key", "m").with_base_url("http://127.0.0.1:1");
        let err = tokio_test::block_on(ai.complete("hello")).unwrap_err();
        assert!(matches!(err, AiError::Network(_)), "got {err:?}");
    }
}
