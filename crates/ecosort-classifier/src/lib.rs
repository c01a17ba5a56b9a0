//! Ecosort Classifier
//!
//! Client for the external waste-classification service. Every call returns a
//! `ClassificationOutcome`; transport and protocol failures are folded into
//! `ClassificationOutcome::Failed` instead of being raised.

pub mod http;
pub mod traits;

pub use http::HttpClassifier;
pub use traits::{Classifier, ClassifierError};
