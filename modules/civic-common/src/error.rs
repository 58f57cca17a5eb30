use thiserror::Error;

#[derive(Error, Debug)]
pub enum CivicError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Issue not found: {0}")]
    NotFound(String),
}
