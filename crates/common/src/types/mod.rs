use serde::{Deserialize, Serialize};

/// Plain-text body of the liveness endpoint.
pub const PING_BODY: &str = "ok";

/// Fixed message for every rejected request payload.
pub const VALIDATION_MESSAGE: &str = "invalid request";
pub const VALIDATION_ERROR: &str = "invalid parameter";

/// Error body shared by every HTTP surface: `{status, message, error}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub status: u16,
    pub message: String,
    pub error: String,
}

impl ErrorBody {
    pub fn new(status: u16, message: &str, error: &str) -> Self {
        Self { status, message: message.to_string(), error: error.to_string() }
    }

    /// The body sent for any malformed payload; never carries the reason.
    pub fn invalid_parameter() -> Self {
        Self::new(400, VALIDATION_MESSAGE, VALIDATION_ERROR)
    }
}
