use std::path::PathBuf;
use thiserror::Error;
use zh_fhir_primitives::PrimitiveError;

/// Errors raised while loading definitions or expanding terminology.
#[derive(Debug, Error)]
pub enum TerminologyError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: {message}")]
    Definition {
        path: String,
        line: usize,
        message: String,
    },

    #[error(transparent)]
    Primitive(#[from] PrimitiveError),

    #[error("Terminology resource not found: {0}")]
    NotFound(String),
}

impl TerminologyError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a new Definition error at `path:line`
    pub fn definition(path: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::Definition {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    pub fn not_found(url: impl Into<String>) -> Self {
        Self::NotFound(url.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Caused by the caller's input rather than the environment.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Definition { .. } | Self::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, TerminologyError>;
