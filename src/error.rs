use thiserror::Error;

/// Result type for spreadcheck operations
pub type Result<T> = std::result::Result<T, SpreadError>;

/// Main error type for the spreadcheck library
#[derive(Debug, Error)]
pub enum SpreadError {
    /// Unknown weight initialization mode
    #[error("Unsupported initialization mode '{0}' (expected 'xavier' or 'he')")]
    UnsupportedMode(String),

    /// Unknown activation name
    #[error("Unsupported activation '{0}' (expected 'identity' or 'relu')")]
    UnsupportedActivation(String),

    /// Invalid parameter value
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Moments requested for a tensor without elements
    #[error("Cannot compute moments of an empty tensor")]
    EmptyTensor,

    /// IO errors (artifact and config files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Chart rendering errors
    #[error("Plotting error: {0}")]
    Plot(String),
}

impl SpreadError {
    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        SpreadError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn plot<E: std::fmt::Display>(err: E) -> Self {
        SpreadError::Plot(err.to_string())
    }

    /// Whether this error comes from an unknown initializer or activation name.
    /// Such errors are fatal to one pattern, never to the whole run.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SpreadError::UnsupportedMode(_) | SpreadError::UnsupportedActivation(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SpreadError::UnsupportedMode("lecun".to_string());
        assert!(format!("{}", err).contains("lecun"));
        assert!(err.is_configuration());

        let err = SpreadError::UnsupportedActivation("tanh".to_string());
        assert!(format!("{}", err).contains("Unsupported activation"));
        assert!(err.is_configuration());

        let err = SpreadError::invalid_parameter("depth", "must be positive");
        assert_eq!(format!("{}", err), "Invalid parameter 'depth': must be positive");
        assert!(!err.is_configuration());

        assert!(!SpreadError::EmptyTensor.is_configuration());

        let err = SpreadError::plot("backend closed");
        assert_eq!(format!("{}", err), "Plotting error: backend closed");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: SpreadError = io.into();
        assert!(matches!(err, SpreadError::Io(_)));
    }
}
