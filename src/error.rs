use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// An argument the builder cannot represent, such as an unknown binding
    /// bucket or an unknown comparison operator.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The active grammar cannot express the requested statement.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// The query state is missing something the statement needs.
    #[error("cannot compile query: {0}")]
    CompilationPrecondition(String),

    /// Failure reported by the connection collaborator.
    #[error("connection error: {0}")]
    Connection(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("format error")]
    Fmt(#[from] std::fmt::Error),

    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl Error {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedOperation(message.into())
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        Self::CompilationPrecondition(message.into())
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedOperation(_))
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}
