use std::sync::Arc;

use ai_client::{Gemini, StructuredGenerator, StructuredOutput};
use async_trait::async_trait;
use civic_common::Config;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::AnalysisError;

const FALLBACK_SCORE: f64 = 5.0;
const FALLBACK_REASON: &str = "Automated analysis failed. Defaulting to standard priority.";
const FALLBACK_TREND: &str = "Data insufficient for prediction.";

/// Longest payload excerpt kept on a decode failure.
const EXCERPT_BYTES: usize = 200;

// =============================================================================
// Result types
// =============================================================================

/// Priority assessment of a single civic report.
///
/// Values are passed through exactly as the model returned them; the score is
/// not clamped to 1–10.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Urgency from 1 to 10, where 10 is a life-threatening hazard.
    pub priority_score: f64,
    /// Brief justification for the score.
    pub reason: String,
    /// Whether the report looks like a duplicate of a common issue.
    pub is_duplicate: bool,
    /// Id of the suspected original. Accepted when supplied, never requested.
    #[serde(
        default,
        deserialize_with = "deserialize_duplicate_id",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(skip)]
    pub duplicate_id: Option<String>,
    /// Expected trend, e.g. "Likely to worsen during monsoon".
    pub trend_prediction: String,
}

/// Accept a string or numeric id; anything else is treated as absent so an
/// unrequested field never discards the assessment.
fn deserialize_duplicate_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

impl AnalysisResult {
    /// Neutral mid-range assessment used whenever the model cannot be consulted.
    pub fn fallback() -> Self {
        Self {
            priority_score: FALLBACK_SCORE,
            reason: FALLBACK_REASON.to_string(),
            is_duplicate: false,
            duplicate_id: None,
            trend_prediction: FALLBACK_TREND.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentSource {
    Model,
    Fallback,
}

/// An analysis result together with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub result: AnalysisResult,
    pub source: AssessmentSource,
}

impl Assessment {
    pub fn is_fallback(&self) -> bool {
        self.source == AssessmentSource::Fallback
    }
}

// =============================================================================
// Prompt / decoding
// =============================================================================

pub fn build_prompt(description: &str, category: &str) -> String {
    format!(
        "Analyze this civic issue report for a national dashboard in India.\n\
         Category: {category}\n\
         Description: {description}\n\
         \n\
         Tasks:\n\
         1. Assign a priority score from 1-10 (10 being most urgent like life-threatening hazards).\n\
         2. Provide a brief reason for the score.\n\
         3. Check if it seems like a duplicate of common issues.\n\
         4. Predict the trend (e.g., \"Likely to worsen during monsoon\")."
    )
}

/// Longest prefix of `s` within `max_bytes` that ends on a char boundary.
fn payload_excerpt(s: &str, max_bytes: usize) -> &str {
    let end = s
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .take_while(|&end| end <= max_bytes)
        .last()
        .unwrap_or(0);
    &s[..end]
}

/// Trim and decode a raw model payload. Missing or mistyped required fields fail.
///
/// A score outside the `f64` range (e.g. `1e400`) is a decode failure, not infinity.
pub fn decode_result(text: &str) -> Result<AnalysisResult, AnalysisError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AnalysisError::EmptyResponse);
    }

    serde_json::from_str(trimmed).map_err(|source| AnalysisError::Decode {
        source,
        excerpt: payload_excerpt(trimmed, EXCERPT_BYTES).to_string(),
    })
}

// =============================================================================
// ReportAnalyzer Trait
// =============================================================================

#[async_trait]
pub trait ReportAnalyzer: Send + Sync {
    async fn assess(&self, description: &str, category: &str) -> Assessment;
}

// =============================================================================
// ReportAnalysisClient
// =============================================================================

/// Scores civic reports with a hosted model, degrading to a fixed neutral
/// assessment on any failure.
///
/// One upstream attempt per call, no retry, no state kept between calls.
#[derive(Clone)]
pub struct ReportAnalysisClient {
    generator: Arc<dyn StructuredGenerator>,
    schema: serde_json::Value,
}

impl ReportAnalysisClient {
    pub fn new(generator: Arc<dyn StructuredGenerator>) -> Self {
        Self {
            generator,
            schema: AnalysisResult::gemini_schema(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut gemini = Gemini::new(&config.gemini_api_key, &config.gemini_model);
        if let Some(ref url) = config.gemini_base_url {
            gemini = gemini.with_base_url(url);
        }
        Self::new(Arc::new(gemini))
    }

    /// Response schema sent with every request.
    pub fn response_schema(&self) -> &serde_json::Value {
        &self.schema
    }

    /// Single attempt with the failure left visible.
    pub async fn try_analyze(
        &self,
        description: &str,
        category: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        let prompt = build_prompt(description, category);

        debug!(category, "Requesting report analysis");

        let text = self
            .generator
            .generate_structured(&prompt, &self.schema)
            .await?;

        decode_result(&text)
    }

    pub async fn assess(&self, description: &str, category: &str) -> Assessment {
        match self.try_analyze(description, category).await {
            Ok(result) => Assessment {
                result,
                source: AssessmentSource::Model,
            },
            Err(e) => {
                match &e {
                    AnalysisError::Decode { excerpt, .. } => {
                        error!(error = %e, category, excerpt = excerpt.as_str(), "AI analysis error")
                    }
                    _ => error!(error = %e, category, "AI analysis error"),
                }
                Assessment {
                    result: AnalysisResult::fallback(),
                    source: AssessmentSource::Fallback,
                }
            }
        }
    }

    /// Always resolves: the model's assessment, or the fallback.
    pub async fn analyze(&self, description: &str, category: &str) -> AnalysisResult {
        self.assess(description, category).await.result
    }
}

#[async_trait]
impl ReportAnalyzer for ReportAnalysisClient {
    async fn assess(&self, description: &str, category: &str) -> Assessment {
        ReportAnalysisClient::assess(self, description, category).await
    }
}
