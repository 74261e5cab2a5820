use thiserror::Error;

#[derive(Error, Debug)]
pub enum KioskError {
    /// Requested shutdown. Not a failure.
    #[error("terminated")]
    Terminated,
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

impl KioskError {
    pub fn is_terminated(&self) -> bool {
        matches!(self, KioskError::Terminated)
    }
}
