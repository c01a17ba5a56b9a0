//! Ecosort Core Library
//!
//! This crate provides the domain models, error types, configuration, and the
//! reward table shared across all Ecosort components.

pub mod config;
pub mod constants;
pub mod error;
pub mod hooks;
pub mod models;
pub mod reward;

// Re-export commonly used types
pub use config::{Config, LogFormat};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use hooks::{NoOpRewardReporter, RewardEvent, RewardReporter};
pub use models::{
    Classification, ClassificationOutcome, ClassificationResult, FailureReason, UploadRecord,
    WasteCategory,
};
pub use reward::reward_for;
