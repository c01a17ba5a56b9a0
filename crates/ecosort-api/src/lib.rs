//! Ecosort API Library
//!
//! HTTP surface of the waste-classification reward service: the predict
//! endpoint, public file serving under `/uploads`, health checks and
//! application setup.

mod api_doc;
mod handlers;
mod utils;

pub mod error;
pub mod services;
pub mod setup;
pub mod state;

// Re-exports
pub use error::HttpAppError;
pub use services::submission::{Prediction, SubmissionService};
pub use state::AppState;
