use serde::de::DeserializeOwned;

use crate::error::FlowError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// Decode the body. Text that is not JSON at all is
    /// [`FlowError::InvalidJson`]; JSON of the wrong shape is a validation
    /// failure.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FlowError> {
        serde_json::from_str(&self.body).map_err(|e| {
            if e.is_syntax() || e.is_eof() {
                tracing::debug!(status = self.status, error = %e, "response body is not JSON");
                FlowError::InvalidJson
            } else {
                FlowError::Validation(format!("Unexpected response format: {e}"))
            }
        })
    }
}
