use serde::{Deserialize, Serialize};

/// Opaque execution token assigned by the remote runner on start.
pub type ExecutionId = String;

/// Request body for the start endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartRequest {
    pub code: String,
}

impl StartRequest {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

/// Response body returned by a successful start request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartResponse {
    pub id: ExecutionId,
}

/// Request body for the input-forwarding endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRequest {
    pub id: ExecutionId,
    pub text: String,
}

impl InputRequest {
    pub fn new(id: impl Into<ExecutionId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}
