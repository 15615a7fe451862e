use std::fmt;

#[derive(Debug)]
pub enum ReplayError {
    /// Tile notation that matches no known identifier.
    Parse { input: String, message: String },
    /// A decodable line whose fields make no sense for its event kind.
    InvalidEvent { kind: String, message: String },
}

impl ReplayError {
    pub(crate) fn invalid_event(kind: &str, message: impl Into<String>) -> Self {
        ReplayError::InvalidEvent {
            kind: kind.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayError::Parse { input, message } => {
                write!(f, "Parse error on '{}': {}", input, message)
            }
            ReplayError::InvalidEvent { kind, message } => {
                write!(f, "Invalid '{}' event: {}", kind, message)
            }
        }
    }
}

impl std::error::Error for ReplayError {}

impl From<serde_json::Error> for ReplayError {
    fn from(err: serde_json::Error) -> Self {
        ReplayError::Parse {
            input: format!("line {}, column {}", err.line(), err.column()),
            message: err.to_string(),
        }
    }
}

pub type ReplayResult<T> = Result<T, ReplayError>;
