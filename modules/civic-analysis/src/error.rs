use ai_client::AiError;
use thiserror::Error;

/// Why a single analysis attempt did not produce a usable result.
///
/// Never reaches `ReportAnalysisClient::analyze` callers; it is collapsed into
/// the fallback result there.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("upstream request failed: {0}")]
    Upstream(#[from] AiError),

    #[error("empty analysis payload")]
    EmptyResponse,

    #[error("failed to decode analysis payload: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        excerpt: String,
    },
}
