pub mod error;
pub mod gemini;
pub mod traits;

pub use error::AiError;
pub use gemini::{Gemini, StructuredOutput};
pub use traits::StructuredGenerator;
