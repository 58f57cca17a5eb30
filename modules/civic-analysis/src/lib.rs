pub mod analysis;
pub mod board;
pub mod error;

pub use analysis::{
    build_prompt, decode_result, AnalysisResult, Assessment, AssessmentSource,
    ReportAnalysisClient, ReportAnalyzer,
};
pub use board::{IssueBoard, ReportDraft};
pub use error::AnalysisError;
