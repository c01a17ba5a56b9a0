//! Data models for the submission pipeline
//!
//! Each sub-module represents one stage: the stored upload, the waste
//! category vocabulary, and the outcome of a classification attempt.

mod category;
mod classification;
mod upload;

pub use category::*;
pub use classification::*;
pub use upload::*;
