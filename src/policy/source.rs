//! Source expressions and their matching rules

use super::values::Base64Value;
use crate::origin::{
    Origin, Uri, default_port, is_secure_scheme, match_host, match_path, matches_secure_scheme,
};
use crate::parser::grammar;
use std::fmt;

/// Keyword sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordSource {
    /// `'self'`
    SelfOrigin,
    UnsafeInline,
    UnsafeEval,
    /// Removed in CSP 2.0, still parsed
    UnsafeRedirect,
}

impl KeywordSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeywordSource::SelfOrigin => "'self'",
            KeywordSource::UnsafeInline => "'unsafe-inline'",
            KeywordSource::UnsafeEval => "'unsafe-eval'",
            KeywordSource::UnsafeRedirect => "'unsafe-redirect'",
        }
    }

    /// Exact, case-sensitive keyword lookup including the quotes
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "'self'" => Some(KeywordSource::SelfOrigin),
            "'unsafe-inline'" => Some(KeywordSource::UnsafeInline),
            "'unsafe-eval'" => Some(KeywordSource::UnsafeEval),
            "'unsafe-redirect'" => Some(KeywordSource::UnsafeRedirect),
            _ => None,
        }
    }

    pub fn is_deprecated(&self) -> bool {
        matches!(self, KeywordSource::UnsafeRedirect)
    }
}

/// Hash algorithms accepted by hash sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
        }
    }

    /// Select by the three digits following `sha`
    pub fn from_bits(bits: &str) -> Option<Self> {
        match bits {
            "256" => Some(HashAlgorithm::Sha256),
            "384" => Some(HashAlgorithm::Sha384),
            "512" => Some(HashAlgorithm::Sha512),
            _ => None,
        }
    }

    /// Digest length in bytes
    pub fn digest_len(&self) -> usize {
        match self {
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
        }
    }

    /// Digest `content` with this algorithm
    pub fn digest(&self, content: &[u8]) -> ring::digest::Digest {
        let algorithm = match self {
            HashAlgorithm::Sha256 => &ring::digest::SHA256,
            HashAlgorithm::Sha384 => &ring::digest::SHA384,
            HashAlgorithm::Sha512 => &ring::digest::SHA512,
        };
        ring::digest::digest(algorithm, content)
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bare scheme such as `https:`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemeSource {
    scheme: String,
}

impl SchemeSource {
    pub fn new(scheme: &str) -> Self {
        Self {
            scheme: scheme.to_string(),
        }
    }

    /// Parse a `scheme:` token
    pub fn parse(token: &str) -> Option<Self> {
        grammar::scheme_source(token).map(Self::new)
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn matches_uri(&self, resource: &Uri) -> bool {
        matches_secure_scheme(&self.scheme, resource.scheme())
    }
}

impl fmt::Display for SchemeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.scheme)
    }
}

/// Port part of a host source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PortSpec {
    /// No port given: the scheme's default port
    #[default]
    Default,
    /// `:*`
    Wildcard,
    Number(u16),
}

impl PortSpec {
    fn parse(port: &str) -> Option<Self> {
        if port == "*" {
            return Some(PortSpec::Wildcard);
        }
        port.parse().ok().map(PortSpec::Number)
    }
}

/// `[scheme "://"] host [":" port] [path]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostSource {
    scheme: Option<String>,
    host: String,
    port: PortSpec,
    path: Option<String>,
}

impl HostSource {
    pub fn new(scheme: Option<&str>, host: &str, port: PortSpec, path: Option<&str>) -> Self {
        Self {
            scheme: scheme.map(str::to_string),
            host: host.to_string(),
            port,
            path: path.map(str::to_string),
        }
    }

    /// Parse a host-source token. Ports outside the u16 range are rejected.
    pub fn parse(token: &str) -> Option<Self> {
        let parts = grammar::host_source(token)?;
        let port = match parts.port {
            Some(port) => PortSpec::parse(port)?,
            None => PortSpec::Default,
        };
        Some(Self::new(parts.scheme, parts.host, port, parts.path))
    }

    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> PortSpec {
        self.port
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// `*` on its own, with no scheme, port or path
    pub fn is_wildcard(&self) -> bool {
        self.host == "*" && self.scheme.is_none() && self.port == PortSpec::Default && self.path.is_none()
    }

    /// Whether `resource` is covered by this expression. Expressions without
    /// a scheme take the scheme of the protected document's `origin`.
    pub fn matches_uri(&self, resource: &Uri, origin: &Origin) -> bool {
        if self.is_wildcard() {
            return !matches!(
                resource.scheme().to_ascii_lowercase().as_str(),
                "blob" | "data" | "filesystem"
            );
        }

        let expression_scheme = match self.scheme.as_deref().or(origin.scheme()) {
            Some(scheme) => scheme,
            None => return false,
        };
        if !matches_secure_scheme(expression_scheme, resource.scheme()) {
            return false;
        }

        if !match_host(&self.host, resource.host()) {
            return false;
        }

        if !self.port_matches(expression_scheme, resource) {
            return false;
        }

        match &self.path {
            Some(path) => match_path(path, resource.path()),
            None => true,
        }
    }

    fn port_matches(&self, expression_scheme: &str, resource: &Uri) -> bool {
        let resource_port = resource.effective_port();
        match self.port {
            PortSpec::Wildcard => true,
            PortSpec::Default => resource_port == default_port(resource.scheme()),
            PortSpec::Number(port) => {
                if resource_port == Some(port) {
                    return true;
                }
                // :80 upgraded to the secure default port
                port == 80
                    && !is_secure_scheme(expression_scheme)
                    && is_secure_scheme(resource.scheme())
                    && resource_port == Some(443)
            }
        }
    }
}

impl fmt::Display for HostSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scheme) = &self.scheme {
            write!(f, "{}://", scheme)?;
        }
        f.write_str(&self.host)?;
        match self.port {
            PortSpec::Default => {}
            PortSpec::Wildcard => f.write_str(":*")?,
            PortSpec::Number(port) => write!(f, ":{}", port)?,
        }
        if let Some(path) = &self.path {
            f.write_str(path)?;
        }
        Ok(())
    }
}

/// A source expression in a source-list directive
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceExpression {
    /// `'none'`, matches nothing
    None,
    Keyword(KeywordSource),
    Nonce(Base64Value),
    Hash {
        algorithm: HashAlgorithm,
        value: Base64Value,
    },
    Scheme(SchemeSource),
    Host(HostSource),
}

impl SourceExpression {
    /// Whether a resource load from `resource` is allowed by this expression
    pub fn matches_uri(&self, resource: &Uri, origin: &Origin) -> bool {
        match self {
            SourceExpression::Keyword(KeywordSource::SelfOrigin) => resource.origin() == *origin,
            SourceExpression::Scheme(source) => source.matches_uri(resource),
            SourceExpression::Host(source) => source.matches_uri(resource, origin),
            SourceExpression::None
            | SourceExpression::Keyword(_)
            | SourceExpression::Nonce(_)
            | SourceExpression::Hash { .. } => false,
        }
    }

    /// Exact nonce comparison
    pub fn matches_nonce(&self, nonce: &str) -> bool {
        matches!(self, SourceExpression::Nonce(value) if value.as_str() == nonce)
    }

    /// Whether inline `content` hashes to this expression's digest
    pub fn matches_content(&self, content: &[u8]) -> bool {
        match self {
            SourceExpression::Hash { algorithm, value } => {
                algorithm.digest(content).as_ref() == value.decode().as_slice()
            }
            _ => false,
        }
    }

    pub fn is_keyword(&self, keyword: KeywordSource) -> bool {
        *self == SourceExpression::Keyword(keyword)
    }
}

impl fmt::Display for SourceExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceExpression::None => f.write_str("'none'"),
            SourceExpression::Keyword(keyword) => f.write_str(keyword.as_str()),
            SourceExpression::Nonce(value) => write!(f, "'nonce-{}'", value),
            SourceExpression::Hash { algorithm, value } => write!(f, "'{}-{}'", algorithm, value),
            SourceExpression::Scheme(source) => write!(f, "{}", source),
            SourceExpression::Host(source) => write!(f, "{}", source),
        }
    }
}

/// A `frame-ancestors` source. Keywords, nonces and hashes are not allowed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AncestorSource {
    None,
    Scheme(SchemeSource),
    Host(HostSource),
}

impl AncestorSource {
    pub fn matches_uri(&self, ancestor: &Uri, origin: &Origin) -> bool {
        match self {
            AncestorSource::None => false,
            AncestorSource::Scheme(source) => source.matches_uri(ancestor),
            AncestorSource::Host(source) => source.matches_uri(ancestor, origin),
        }
    }
}

impl fmt::Display for AncestorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AncestorSource::None => f.write_str("'none'"),
            AncestorSource::Scheme(source) => write!(f, "{}", source),
            AncestorSource::Host(source) => write!(f, "{}", source),
        }
    }
}
