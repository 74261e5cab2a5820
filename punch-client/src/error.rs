use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConnectError {
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("Timed out connecting to {0}")]
    Timeout(String),
    #[error("TransportError: {0}")]
    Transport(String),
    #[error("Health check returned status {0}")]
    Status(u16),
}

#[derive(Error, Debug)]
pub enum CallError {
    #[error("{0} timed out")]
    Timeout(&'static str),
    #[error("TransportError: {0}")]
    Transport(String),
    #[error("{call} returned status {status}")]
    Status { call: &'static str, status: u16 },
    #[error("ParsingError: {0}")]
    Decode(String),
    #[error("Not connected")]
    NotConnected,
}

impl CallError {
    pub(crate) fn from_reqwest(call: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CallError::Timeout(call)
        } else if err.is_decode() {
            CallError::Decode(format!("Failed to parse {} response: {}", call, err))
        } else if let Some(status) = err.status() {
            CallError::Status {
                call,
                status: status.as_u16(),
            }
        } else {
            CallError::Transport(err.to_string())
        }
    }
}
