use thiserror::Error;

/// Failures talking to the gateway.
///
/// None of these say anything about the payment itself: a parsed response with `Success: false` is *not* an error
/// at this level. Callers must treat every variant as "not confirmed", never as "confirmed false".
#[derive(Debug, Error)]
pub enum GatewayApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Could not serialize request: {0}")]
    RequestError(String),
    #[error("Gateway is unreachable: {0}")]
    Unreachable(String),
    #[error("Gateway did not respond within the timeout. {0}")]
    Timeout(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
    #[error("Could not deserialize gateway response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for GatewayApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(e.to_string())
        } else if e.is_builder() {
            Self::RequestError(e.to_string())
        } else if e.is_decode() {
            Self::MalformedResponse(e.to_string())
        } else {
            Self::Unreachable(e.to_string())
        }
    }
}
