//! error types
//!
//! structured errors for config, schema loading, schema building, and output.

use std::path::PathBuf;

/// library result type
pub type Result<T> = std::result::Result<T, Error>;

/// error type for schema loading, synthesis, and output
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("schema parse error: {0}")]
    Parse(String),

    #[error("schema validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("io error at {}: {source}", path.display())]
    Io {
        /// file or directory involved
        path: PathBuf,
        /// underlying io error
        source: std::io::Error,
    },

    #[error("schema http error: {status}")]
    SchemaFetch {
        /// http status of the schema response
        status: u16,
        /// raw response body
        body: String,
    },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url error: {0}")]
    Url(#[from] url::ParseError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// true if the schema text could not be turned into a type graph
    pub fn is_schema_error(&self) -> bool {
        matches!(self, Error::Parse(_) | Error::Validation(_))
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_schema_error() {
        assert!(Error::Parse("unexpected end of input".to_string()).is_schema_error());
        assert!(Error::Validation(vec!["unknown type Foo".to_string()]).is_schema_error());
        assert!(!Error::Config("depth limit must be at least 1".to_string()).is_schema_error());
    }

    #[test]
    fn test_validation_message_lists_problems() {
        let err = Error::Validation(vec![
            "field Query.a has unknown type A".to_string(),
            "field Query.b has unknown type B".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "schema validation failed: field Query.a has unknown type A; field Query.b has unknown type B"
        );
    }

    #[test]
    fn test_io_message_includes_path() {
        let err = Error::io(
            "/tmp/missing.graphql",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert_eq!(err.to_string(), "io error at /tmp/missing.graphql: not found");
    }

    #[test]
    fn test_schema_fetch_message() {
        let err = Error::SchemaFetch {
            status: 404,
            body: "not found".to_string(),
        };
        assert_eq!(err.to_string(), "schema http error: 404");
        assert!(!err.is_schema_error());
    }
}
