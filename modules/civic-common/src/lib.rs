pub mod types;
pub mod config;
pub mod error;
pub mod fixtures;

pub use types::*;
pub use config::Config;
pub use error::CivicError;
