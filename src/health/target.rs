//! Probe target parsing.
//!
//! # Responsibilities
//! - Turn the user-supplied address into an immutable, validated `Target`
//! - Accept bare `host:port` shorthand (assumed `http://`)
//! - Apply the configured default path when the address has none
//!
//! # Design Decisions
//! - Invalid targets fail before any attempt is made
//! - Only `http` is accepted; the bundled transport speaks plain HTTP

use std::fmt;

use hyper::Uri;
use thiserror::Error;
use url::Url;

/// Reasons a target address is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    #[error("target is empty")]
    Empty,

    #[error("target {input:?} is not a valid URL: {reason}")]
    Malformed { input: String, reason: String },

    #[error("unsupported scheme {0:?}, only http is supported")]
    UnsupportedScheme(String),

    #[error("target {0:?} has no host")]
    MissingHost(String),
}

/// A validated probe target. Immutable for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    url: Url,
    uri: Uri,
}

impl Target {
    /// Parse a target, appending `default_path` when the address has no path.
    pub fn parse(input: &str, default_path: Option<&str>) -> Result<Self, TargetError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(TargetError::Empty);
        }

        let with_scheme = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("http://{}", trimmed)
        };

        let mut url = Url::parse(&with_scheme).map_err(|e| TargetError::Malformed {
            input: trimmed.to_string(),
            reason: e.to_string(),
        })?;

        if url.scheme() != "http" {
            return Err(TargetError::UnsupportedScheme(url.scheme().to_string()));
        }

        if url.host_str().map_or(true, str::is_empty) {
            return Err(TargetError::MissingHost(trimmed.to_string()));
        }

        if let Some(path) = default_path {
            if url.path() == "/" {
                url.set_path(path);
            }
        }

        let uri = url.as_str().parse::<Uri>().map_err(|e| TargetError::Malformed {
            input: trimmed.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { url, uri })
    }

    /// The target as a URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The target as a request URI for the transport.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_url() {
        let target = Target::parse("http://127.0.0.1:8080/health", None).unwrap();
        assert_eq!(target.as_str(), "http://127.0.0.1:8080/health");
        assert_eq!(target.uri().port_u16(), Some(8080));
    }

    #[test]
    fn test_bare_host_port_gets_scheme() {
        let target = Target::parse("localhost:3000", None).unwrap();
        assert_eq!(target.as_str(), "http://localhost:3000/");
    }

    #[test]
    fn test_default_path_only_fills_empty_path() {
        let bare = Target::parse("localhost:3000", Some("/health")).unwrap();
        assert_eq!(bare.as_str(), "http://localhost:3000/health");

        let explicit = Target::parse("localhost:3000/ready", Some("/health")).unwrap();
        assert_eq!(explicit.as_str(), "http://localhost:3000/ready");
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(Target::parse("   ", None), Err(TargetError::Empty));
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert_eq!(
            Target::parse("ftp://example.com", None),
            Err(TargetError::UnsupportedScheme("ftp".into()))
        );
        assert!(matches!(
            Target::parse("https://example.com", None),
            Err(TargetError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(matches!(
            Target::parse("http://exa mple.com", None),
            Err(TargetError::Malformed { .. })
        ));
        assert!(matches!(
            Target::parse("localhost:notaport", None),
            Err(TargetError::Malformed { .. })
        ));
    }
}
