use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Harvest error: {0}")]
    Harvest(String),

    #[error("Annotation pool is empty: {0}")]
    EmptyPool(String),

    #[error("Manifest error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<lopdf::Error> for SeedError {
    fn from(err: lopdf::Error) -> Self {
        SeedError::Harvest(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SeedError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_seed_error_display() {
        let error = SeedError::Config("pages.min > pages.max".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid configuration: pages.min > pages.max"
        );
    }

    #[test]
    fn test_seed_error_from_io_error() {
        let io_error = IoError::new(ErrorKind::PermissionDenied, "read-only");
        let seed_error = SeedError::from(io_error);

        match seed_error {
            SeedError::Io(ref err) => {
                assert_eq!(err.kind(), ErrorKind::PermissionDenied);
            }
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_all_seed_error_variants_display() {
        let errors = vec![
            SeedError::Config("bad range".to_string()),
            SeedError::Harvest("unreadable".to_string()),
            SeedError::EmptyPool("widgets".to_string()),
        ];

        for error in errors {
            assert!(!error.to_string().is_empty());
        }
    }

    #[test]
    fn test_result_question_mark_propagation() {
        fn fails() -> Result<()> {
            Err(IoError::new(ErrorKind::Other, "disk full"))?;
            Ok(())
        }

        assert!(matches!(fails(), Err(SeedError::Io(_))));
    }
}
