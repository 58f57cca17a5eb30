use crate::error::AiError;
use async_trait::async_trait;

// =============================================================================
// StructuredGenerator Trait
// =============================================================================

/// A text-generation backend that can be asked for JSON constrained to a
/// response schema.
///
/// Implementations return the raw text payload exactly as the provider sent
/// it; decoding into a concrete type is the caller's job.
#[async_trait]
pub trait StructuredGenerator: Send + Sync {
    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<String, AiError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct Echo;

    #[async_trait]
    impl StructuredGenerator for Echo {
        async fn generate_structured(
            &self,
            prompt: &str,
            _schema: &serde_json::Value,
        ) -> Result<String, AiError> {
            Ok(prompt.to_string())
        }
    }

    #[test]
    fn test_usable_as_trait_object() {
        let generator: Arc<dyn StructuredGenerator> = Arc::new(Echo);
        let out = tokio_test::block_on(
            generator.generate_structured("hello", &serde_json::json!({})),
        )
        .unwrap();
        assert_eq!(out, "hello");
    }
}
