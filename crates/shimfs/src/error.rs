use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the shim layer.
///
/// Nothing here is fatal to the host: every failure is recoverable
/// locally by rolling back the optimistic cache entry and logging.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The host has not installed its native backend yet.
    #[error("host backend not installed ({op})")]
    BackendUnavailable { op: &'static str },

    /// The backend attempted the operation and rejected it.
    #[error("backend {op} failed for {path}: {message}")]
    Backend {
        op: &'static str,
        path: String,
        message: String,
    },

    /// A string-marshalled host payload could not be parsed.
    #[error("malformed {op} payload: {source}")]
    Payload {
        op: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    pub fn backend_unavailable(op: &'static str) -> Self {
        Error::BackendUnavailable { op }
    }

    pub fn backend(op: &'static str, path: impl Into<String>, message: impl fmt::Display) -> Self {
        Error::Backend {
            op,
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn payload(op: &'static str, source: serde_json::Error) -> Self {
        Error::Payload { op, source }
    }
}
