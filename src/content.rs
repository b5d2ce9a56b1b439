//! Content roots and JSON resource fetching.
//!
//! Every site resource (`lang.json`, `blog-posts.json`, images) resolves
//! against one root: either the deployed site over HTTP or a local content
//! directory.
use std::fmt;
use std::path::PathBuf;

use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

/// Shared HTTP client for content and email traffic.
pub static HTTP: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

/// A resource could not be fetched or decoded.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid resource location: {0}")]
    Location(#[from] url::ParseError),
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse {resource}: {source}")]
    Parse {
        resource: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone)]
pub enum ContentSource {
    /// Site root URL, trailing slash included.
    Remote(Url),
    /// Content directory on disk.
    Local(PathBuf),
}

impl ContentSource {
    /// GET and parse a JSON resource relative to the root. Remote non-2xx
    /// statuses are errors.
    pub async fn fetch_json<T: DeserializeOwned>(&self, resource: &str) -> Result<T, ContentError> {
        match self {
            ContentSource::Remote(base) => {
                let url = base.join(resource)?;
                let value = HTTP
                    .get(url)
                    .send()
                    .await?
                    .error_for_status()?
                    .json::<T>()
                    .await?;
                Ok(value)
            }
            ContentSource::Local(dir) => {
                let path = dir.join(resource);
                let raw = tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|source| ContentError::Io {
                        path: path.clone(),
                        source,
                    })?;
                serde_json::from_str(&raw).map_err(|source| ContentError::Parse {
                    resource: resource.to_string(),
                    source,
                })
            }
        }
    }

    /// Whether `resource` exists under a local root. Remote roots are
    /// reported as present; the webview deals with what the server says.
    pub fn resource_exists(&self, resource: &str) -> bool {
        match self {
            ContentSource::Remote(_) => true,
            ContentSource::Local(dir) => dir.join(resource).exists(),
        }
    }

    /// Absolute form of `resource` the webview can render.
    pub fn display_url(&self, resource: &str) -> String {
        match self {
            ContentSource::Remote(base) => base
                .join(resource)
                .map(String::from)
                .unwrap_or_else(|_| resource.to_string()),
            ContentSource::Local(dir) => dir.join(resource).display().to_string(),
        }
    }
}

impl fmt::Display for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentSource::Remote(base) => base.fmt(f),
            ContentSource::Local(dir) => write!(f, "{}", dir.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[tokio::test]
    async fn local_fetch_parses_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("lang.json"), r#"{"k":{"hu":"szia"}}"#).unwrap();
        let source = ContentSource::Local(dir.path().to_path_buf());
        let parsed: HashMap<String, HashMap<String, String>> =
            source.fetch_json("lang.json").await.unwrap();
        assert_eq!(parsed["k"]["hu"], "szia");
    }

    #[tokio::test]
    async fn missing_local_resource_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = ContentSource::Local(dir.path().to_path_buf());
        let err = source
            .fetch_json::<serde_json::Value>("absent.json")
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::Io { .. }));
    }

    #[tokio::test]
    async fn invalid_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), "{ nope").unwrap();
        let source = ContentSource::Local(dir.path().to_path_buf());
        let err = source
            .fetch_json::<serde_json::Value>("bad.json")
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::Parse { .. }));
    }

    #[test]
    fn resource_existence_is_checked_locally() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("images")).unwrap();
        std::fs::write(dir.path().join("images/a.svg"), "<svg/>").unwrap();
        let source = ContentSource::Local(dir.path().to_path_buf());
        assert!(source.resource_exists("images/a.svg"));
        assert!(!source.resource_exists("images/b.svg"));
    }

    #[test]
    fn remote_display_url_joins_against_the_root() {
        let source = ContentSource::Remote(Url::parse("https://example.com/site/").unwrap());
        assert_eq!(
            source.display_url("images/a.svg"),
            "https://example.com/site/images/a.svg"
        );
    }
}
