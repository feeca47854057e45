use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A weight cannot produce a scorer for a segment. Callers treat this
    /// as "no matches in this segment".
    UnsupportedOperation,
    TooManyClauses,
    InvalidInput,
    Serialization,
    Internal,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub kind: ErrorKind,
    pub context: String,
}

impl Error {
    pub fn new(kind: ErrorKind, context: String) -> Self {
        Error { kind, context }
    }

    pub fn unsupported(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::UnsupportedOperation, context.into())
    }

    pub fn invalid_input(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::InvalidInput, context.into())
    }

    /// True for the non-fatal "no scorer for this segment" case.
    pub fn is_unsupported(&self) -> bool {
        self.kind == ErrorKind::UnsupportedOperation
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.context)
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            kind: ErrorKind::Serialization,
            context: err.to_string(),
        }
    }
}

impl From<rayon::ThreadPoolBuildError> for Error {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        Error {
            kind: ErrorKind::Internal,
            context: format!("Thread pool error: {}", err),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_is_recognised() {
        let err = Error::unsupported("no postings for body:rust");
        assert!(err.is_unsupported());
        assert_eq!(err.to_string(), "UnsupportedOperation: no postings for body:rust");

        let err = Error::invalid_input("k must be positive");
        assert!(!err.is_unsupported());
    }
}
