//! Absolute URIs for report endpoints and candidate resources

use super::{Origin, SchemeHostPortTriple, default_port};
use crate::utils::UriError;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// A validated absolute URI
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Uri {
    url: Url,
}

impl Uri {
    /// Parse an absolute URI
    pub fn parse(input: &str) -> Result<Self, UriError> {
        Url::parse(input)
            .map(|url| Self { url })
            .map_err(|source| UriError::Invalid {
                input: input.to_string(),
                source,
            })
    }

    /// Parse a URI reference, resolving relative references against `origin`
    pub fn parse_with_origin(origin: &Origin, input: &str) -> Result<Self, UriError> {
        match Url::parse(input) {
            Ok(url) => return Ok(Self { url }),
            Err(url::ParseError::RelativeUrlWithoutBase) => {}
            Err(source) => {
                return Err(UriError::Invalid {
                    input: input.to_string(),
                    source,
                });
            }
        }

        if origin.scheme().is_none() {
            return Err(UriError::MissingScheme(input.to_string()));
        }
        let invalid = |source| UriError::Invalid {
            input: input.to_string(),
            source,
        };
        let base = Url::parse(&origin.to_string()).map_err(invalid)?;
        let url = base.join(input).map_err(invalid)?;
        Ok(Self { url })
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    /// Host, or the empty string for hostless URIs
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or("")
    }

    /// Explicit non-default port
    pub fn port(&self) -> Option<u16> {
        self.url.port()
    }

    /// Explicit port, or the scheme default
    pub fn effective_port(&self) -> Option<u16> {
        self.port().or_else(|| default_port(self.scheme()))
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    pub fn origin(&self) -> Origin {
        SchemeHostPortTriple::new(self.scheme(), self.host(), self.port())
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl FromStr for Uri {
    type Err = UriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_absolute() {
        let uri = Uri::parse("https://CDN.example.com:8443/js/app.js?v=1").unwrap();
        assert_eq!(uri.scheme(), "https");
        assert_eq!(uri.host(), "cdn.example.com");
        assert_eq!(uri.port(), Some(8443));
        assert_eq!(uri.path(), "/js/app.js");
    }

    #[test]
    fn test_default_port_is_normalized() {
        let uri = Uri::parse("https://example.com:443/").unwrap();
        assert_eq!(uri.port(), None);
        assert_eq!(uri.effective_port(), Some(443));
    }

    #[test]
    fn test_gopher_keeps_explicit_port() {
        let uri = Uri::parse("gopher://example.com:70/").unwrap();
        assert_eq!(uri.effective_port(), Some(70));
        assert_eq!(
            uri.origin(),
            SchemeHostPortTriple::new("gopher", "example.com", None)
        );
    }

    #[test]
    fn test_relative_reference_resolves_against_origin() {
        let origin = SchemeHostPortTriple::new("https", "example.com", Some(8443));
        let uri = Uri::parse_with_origin(&origin, "/csp-report").unwrap();
        assert_eq!(uri.as_str(), "https://example.com:8443/csp-report");
    }

    #[test]
    fn test_relative_reference_needs_origin_scheme() {
        let origin = SchemeHostPortTriple::from_parts(None, "example.com", None);
        let err = Uri::parse_with_origin(&origin, "/csp-report").unwrap_err();
        assert!(matches!(err, UriError::MissingScheme(_)));
    }

    #[test]
    fn test_invalid_uri() {
        let err = Uri::parse("http://[::1").unwrap_err();
        assert!(matches!(err, UriError::Invalid { .. }));
        assert!(Uri::parse("/relative").is_err());
    }
}
