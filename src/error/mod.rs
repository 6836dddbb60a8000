use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum RouterError {
    /// Parsing errors for pool snapshot data (malformed decimal strings, etc.)
    #[error("Parse Error: {0}")]
    ParseError(String),

    /// Pool state validation errors (fee out of range, negative reserves)
    #[error("Invalid Pool State: {0}")]
    InvalidPoolState(String),

    /// Configuration errors
    #[error("Config Error: {0}")]
    ConfigError(String),
}

impl RouterError {
    /// Classifies whether the error stems from upstream data rather than
    /// this process's own configuration.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            RouterError::ParseError(_) | RouterError::InvalidPoolState(_)
        )
    }
}
