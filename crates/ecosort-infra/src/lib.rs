//! Ecosort Infrastructure Library
//!
//! Shared infrastructure for the HTTP service:
//! - Middleware (request ID, security headers)
//! - Tracing subscriber initialization
//! - Error response body

pub mod error;
pub mod middleware;
pub mod telemetry;

// Re-export commonly used types
pub use error::ErrorResponse;
pub use middleware::{
    get_request_id, request_id_middleware, security_headers_middleware, RequestId,
};
pub use telemetry::{init_telemetry, shutdown_telemetry};
