//! Errors raised at parsing boundaries. The animation runtime itself never fails.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TweenError {
    #[error("property map parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("property map must be a JSON object")]
    NotAnObject,
    #[error("invalid value for property '{name}': {reason}")]
    InvalidProperty { name: String, reason: String },
}
