use thiserror::Error;

#[derive(Error, Debug)]
pub enum DialogError {
    /// The external command could not be started at all.
    #[error("failed to launch '{command}': {source}")]
    Launch {
        command: String,
        source: std::io::Error,
    },

    /// Caller misuse detected before any process was started.
    #[error("invalid dialog request: {0}")]
    Precondition(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend exited normally but printed something we cannot interpret.
    #[error("unexpected output from '{command}': {output:?}")]
    Protocol { command: String, output: String },

    #[error("no dialog backend selected")]
    NoBackend,
}

impl DialogError {
    pub(crate) fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
    }

    pub(crate) fn protocol(command: &str, output: impl Into<String>) -> Self {
        Self::Protocol {
            command: command.to_string(),
            output: output.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DialogError>;
