//! Request extractors and response types shared by the handlers

pub mod error;
pub mod json;
pub mod query;

pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
pub use query::Page;

use serde::{Deserialize, Serialize};

/// `{"message": "..."}` body of successful writes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
