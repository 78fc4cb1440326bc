use thiserror::Error;

/// Fatal outcomes of a log tail run.
#[derive(Debug, Error)]
pub enum LogsError {
    /// Invalid invocation context or options.
    #[error("{0}")]
    Configuration(String),

    #[error("Function \"{0}\" doesn't exist in this service")]
    FunctionNotFound(String),

    // Causes are part of the message, never a `source()`
    #[error("Failed to retrieve activation logs due to error: {0}")]
    Transport(TransportError),

    #[error("Failed to write activation logs: {0}")]
    Output(std::io::Error),
}

impl From<TransportError> for LogsError {
    fn from(err: TransportError) -> Self {
        LogsError::Transport(err)
    }
}

impl From<std::io::Error> for LogsError {
    fn from(err: std::io::Error) -> Self {
        LogsError::Output(err)
    }
}

impl LogsError {
    pub fn configuration(message: impl Into<String>) -> Self {
        LogsError::Configuration(message.into())
    }
}

/// Failures of the activation fetch capability.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{0}")]
    Request(String),

    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },

    #[error("invalid activation list response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("activation fetch task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
