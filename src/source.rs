//! schema sources
//!
//! load sdl text from a local file or fetch it over http(s).

use crate::error::{Error, Result};
use reqwest::blocking::Client as BlockingClient;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use url::Url;

/// where the schema text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    File(PathBuf),
    Url {
        url: Url,
        /// sent as a bearer token
        token: Option<String>,
    },
}

impl SchemaSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        SchemaSource::File(path.into())
    }

    /// remote schema; the url must be http or https
    pub fn url(url: &str, token: Option<String>) -> Result<Self> {
        let url = Url::parse(url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(Error::Config(format!(
                "invalid url scheme: {}. must be http or https",
                url.scheme()
            )));
        }
        Ok(SchemaSource::Url { url, token })
    }

    /// read or fetch the schema text
    pub fn load(&self) -> Result<String> {
        match self {
            SchemaSource::File(path) => {
                fs::read_to_string(path).map_err(|err| Error::io(path, err))
            }
            SchemaSource::Url { url, token } => {
                fetch_schema_with(url, token.as_deref(), |url, headers| {
                    let response = BlockingClient::new().get(url).headers(headers).send()?;
                    let status = response.status();
                    let text = response.text()?;
                    Ok((status, text))
                })
            }
        }
    }
}

impl fmt::Display for SchemaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaSource::File(path) => write!(f, "{}", path.display()),
            SchemaSource::Url { url, .. } => write!(f, "{url}"),
        }
    }
}

pub(crate) fn fetch_schema_with<F>(url: &Url, token: Option<&str>, send: F) -> Result<String>
where
    F: FnOnce(Url, HeaderMap) -> Result<(StatusCode, String)>,
{
    let mut headers = HeaderMap::new();
    if let Some(token) = token {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|err| Error::Config(format!("invalid token header value: {err}")))?,
        );
    }

    let (status, text) = send(url.clone(), headers)?;
    parse_schema_response(status, text)
}

fn parse_schema_response(status: StatusCode, text: String) -> Result<String> {
    if !status.is_success() {
        return Err(Error::SchemaFetch {
            status: status.as_u16(),
            body: text,
        });
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "type Query {{ ping: String }}").unwrap();

        let source = SchemaSource::file(file.path());
        assert_eq!(source.load().unwrap(), "type Query { ping: String }");
        assert_eq!(source.to_string(), file.path().display().to_string());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SchemaSource::file(dir.path().join("missing.graphql"))
            .load()
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_url_validation() {
        let source = SchemaSource::url("https://example.com/schema.graphql", None).unwrap();
        assert_eq!(source.to_string(), "https://example.com/schema.graphql");

        let err = SchemaSource::url("ftp://example.com/schema.graphql", None).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = SchemaSource::url("not a url", None).unwrap_err();
        assert!(matches!(err, Error::Url(_)));
    }

    #[test]
    fn test_fetch_sets_bearer_token() {
        let url = Url::parse("http://localhost:1234/schema.graphql").unwrap();
        let schema = fetch_schema_with(&url, Some("secret"), |url, headers| {
            assert_eq!(url.path(), "/schema.graphql");
            assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer secret");
            Ok((StatusCode::OK, "type Query { ping: String }".to_string()))
        })
        .unwrap();
        assert!(schema.contains("ping"));
    }

    #[test]
    fn test_fetch_without_token() {
        let url = Url::parse("http://localhost:1234/schema.graphql").unwrap();
        fetch_schema_with(&url, None, |_url, headers| {
            assert!(headers.is_empty());
            Ok((StatusCode::OK, String::new()))
        })
        .unwrap();
    }

    #[test]
    fn test_fetch_http_error() {
        let url = Url::parse("http://localhost:1234/schema.graphql").unwrap();
        let err = fetch_schema_with(&url, None, |_url, _headers| {
            Ok((StatusCode::NOT_FOUND, "nope".to_string()))
        })
        .unwrap_err();
        assert!(matches!(err, Error::SchemaFetch { status: 404, .. }));
    }

    #[test]
    fn test_invalid_token_header() {
        let url = Url::parse("http://localhost:1234/schema.graphql").unwrap();
        let err = fetch_schema_with(&url, Some("bad\ntoken"), |_url, _headers| {
            Ok((StatusCode::OK, String::new()))
        })
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
