use thiserror::Error;

/// Top-level error type for the deja system.
///
/// Subsystem crates define their own error types and implement
/// `From<SubsystemError> for DejaError` so that the `?` operator works
/// seamlessly across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DejaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    /// The answer is longer than the store's column capacity. Callers that
    /// want to recover (summarize, truncate) match on this variant instead
    /// of scraping driver error text.
    #[error("Answer of {len} characters exceeds store capacity of {capacity}")]
    CapacityExceeded { len: usize, capacity: usize },

    #[error("Model error: {0}")]
    Model(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for DejaError {
    fn from(err: toml::de::Error) -> Self {
        DejaError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for DejaError {
    fn from(err: toml::ser::Error) -> Self {
        DejaError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for DejaError {
    fn from(err: serde_json::Error) -> Self {
        DejaError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for deja operations.
pub type Result<T> = std::result::Result<T, DejaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DejaError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");

        let err = DejaError::Storage("disk full".to_string());
        assert_eq!(err.to_string(), "Storage error: disk full");

        let err = DejaError::Model("quota exhausted".to_string());
        assert_eq!(err.to_string(), "Model error: quota exhausted");
    }

    #[test]
    fn test_capacity_exceeded_display() {
        let err = DejaError::CapacityExceeded {
            len: 2500,
            capacity: 2000,
        };
        assert_eq!(
            err.to_string(),
            "Answer of 2500 characters exceeds store capacity of 2000"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let deja_err: DejaError = io_err.into();
        assert!(matches!(deja_err, DejaError::Io(_)));
        assert!(deja_err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_from_toml_de() {
        let bad_toml = "invalid = [[[";
        let err: std::result::Result<toml::Value, _> = toml::from_str(bad_toml);
        assert!(err.is_err());
        let deja_err: DejaError = err.unwrap_err().into();
        assert!(matches!(deja_err, DejaError::Config(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let bad_json = "{ invalid json }";
        let err: std::result::Result<serde_json::Value, _> = serde_json::from_str(bad_json);
        assert!(err.is_err());
        let deja_err: DejaError = err.unwrap_err().into();
        assert!(matches!(deja_err, DejaError::Serialization(_)));
    }

    #[test]
    fn test_result_type_with_question_mark() {
        fn inner() -> Result<String> {
            let io_result: std::result::Result<i32, std::io::Error> = Ok(42);
            let _value = io_result?;
            Ok("success".to_string())
        }

        assert_eq!(inner().unwrap(), "success");
    }

    #[test]
    fn test_capacity_exceeded_is_matchable() {
        fn classify(err: &DejaError) -> bool {
            matches!(err, DejaError::CapacityExceeded { .. })
        }

        assert!(classify(&DejaError::CapacityExceeded {
            len: 501,
            capacity: 500
        }));
        assert!(!classify(&DejaError::Storage("other".into())));
    }
}
