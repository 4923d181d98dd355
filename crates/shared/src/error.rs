use serde::{Deserialize, Serialize};

/// Error payload returned by the backend on non-2xx responses. Endpoints
/// are inconsistent about the field name, so both are accepted; `error`
/// wins when both are present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Most specific non-empty message available.
    pub fn into_message(self) -> Option<String> {
        self.error
            .filter(|text| !text.is_empty())
            .or(self.message.filter(|text| !text.is_empty()))
    }
}
