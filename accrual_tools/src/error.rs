use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AccrualApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Request to the accrual service failed: {0}")]
    RequestError(String),
    #[error("The accrual service did not answer within {0} seconds")]
    Timeout(u64),
    #[error("Could not deserialize accrual response: {0}")]
    JsonError(String),
}

impl AccrualApiError {
    /// Transient errors are worth retrying on a later pass. Protocol errors will usually repeat until the service is
    /// fixed, but they are retried too; the distinction only affects logging.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RequestError(_) | Self::Timeout(_))
    }
}
