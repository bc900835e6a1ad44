//! Origins and scheme-host-port comparison
//!
//! Implements the pieces of the URL standard that source matching needs:
//! - Scheme-host-port triples with default-port normalization
//! - Network and secure scheme classification
//! - Scheme upgrade equivalence (`http:` expressions admit `https:` resources)
//! - Host wildcard and path prefix matching

mod matching;
mod uri;

pub use matching::{match_host, match_path};
pub use uri::Uri;

use crate::utils::UriError;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// The origin of the protected document
pub type Origin = SchemeHostPortTriple;

/// Canonical port for a scheme (http://www.w3.org/TR/url/#default-port).
/// `None` means the scheme has no port.
pub fn default_port(scheme: &str) -> Option<u16> {
    match scheme.to_ascii_lowercase().as_str() {
        "ftp" => Some(21),
        "file" => None,
        "gopher" => Some(70),
        "http" => Some(80),
        "https" => Some(443),
        "ws" => Some(80),
        "wss" => Some(443),
        _ => None,
    }
}

/// ftp, http, https, ws and wss
pub fn is_network_scheme(scheme: &str) -> bool {
    ["ftp", "http", "https", "ws", "wss"]
        .iter()
        .any(|network| scheme.eq_ignore_ascii_case(network))
}

/// https and wss
pub fn is_secure_scheme(scheme: &str) -> bool {
    scheme.eq_ignore_ascii_case("https") || scheme.eq_ignore_ascii_case("wss")
}

/// Whether a resource on `resource_scheme` satisfies an expression naming
/// `expression_scheme`, allowing the resource to use a stronger scheme.
pub fn matches_secure_scheme(expression_scheme: &str, resource_scheme: &str) -> bool {
    let expression = expression_scheme.to_ascii_lowercase();
    let resource = resource_scheme.to_ascii_lowercase();

    if expression == resource {
        return true;
    }
    match expression.as_str() {
        "http" => resource == "https",
        "ws" => matches!(resource.as_str(), "wss" | "http" | "https"),
        "wss" => resource == "https",
        _ => false,
    }
}

/// Normalized scheme, host and port.
///
/// Equality treats an omitted port as the scheme's default port. A triple
/// whose scheme is unknown is not equal to anything, itself included, which
/// is why the type is `PartialEq` but not `Eq`.
#[derive(Debug, Clone)]
pub struct SchemeHostPortTriple {
    scheme: Option<String>,
    host: String,
    port: Option<u16>,
}

impl SchemeHostPortTriple {
    pub fn new(scheme: &str, host: &str, port: Option<u16>) -> Self {
        Self::from_parts(Some(scheme), host, port)
    }

    pub fn from_parts(scheme: Option<&str>, host: &str, port: Option<u16>) -> Self {
        Self {
            scheme: scheme.map(str::to_ascii_lowercase),
            host: host.to_ascii_lowercase(),
            port,
        }
    }

    /// Parse an absolute URL and keep its origin
    pub fn parse(input: &str) -> Result<Self, UriError> {
        Ok(Uri::parse(input)?.origin())
    }

    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// The explicit port, if one was given
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Explicit port, or the scheme default
    pub fn effective_port(&self) -> Option<u16> {
        self.port
            .or_else(|| self.scheme.as_deref().and_then(default_port))
    }

    pub fn is_network_scheme(&self) -> bool {
        self.scheme.as_deref().is_some_and(is_network_scheme)
    }

    pub fn is_secure_scheme(&self) -> bool {
        self.scheme.as_deref().is_some_and(is_secure_scheme)
    }
}

impl PartialEq for SchemeHostPortTriple {
    fn eq(&self, other: &Self) -> bool {
        match (&self.scheme, &other.scheme) {
            (Some(scheme), Some(other_scheme)) => {
                scheme == other_scheme
                    && self.host == other.host
                    && self.effective_port() == other.effective_port()
            }
            _ => false,
        }
    }
}

impl Hash for SchemeHostPortTriple {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.scheme.hash(state);
        self.host.hash(state);
        self.effective_port().hash(state);
    }
}

impl FromStr for SchemeHostPortTriple {
    type Err = UriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SchemeHostPortTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scheme) = &self.scheme {
            write!(f, "{}://", scheme)?;
        }
        f.write_str(&self.host)?;
        if let Some(port) = self.port {
            let is_default = self.scheme.as_deref().and_then(default_port) == Some(port);
            if !is_default {
                write!(f, ":{}", port)?;
            }
        }
        Ok(())
    }
}
