//! Leaf values: base64 digests and nonces, media types, sandbox tokens

use crate::parser::grammar;
use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use std::fmt;
use thiserror::Error;

/// RFC 4648 alphabet with mandatory padding. Unused trailing bits are
/// tolerated, as many nonce generators do not zero them.
const BASE64_VALUE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::RequireCanonical),
);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Base64Error {
    #[error("base64-value must not be empty")]
    Empty,
    #[error(
        "invalid base64-value {value:?} ({source}). Consider using an RFC 4648 compliant base64 encoder"
    )]
    Invalid {
        value: String,
        #[source]
        source: base64::DecodeError,
    },
}

/// A validated `base64-value`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Base64Value {
    value: String,
}

impl Base64Value {
    pub fn new(value: &str) -> Result<Self, Base64Error> {
        if value.is_empty() {
            return Err(Base64Error::Empty);
        }
        BASE64_VALUE
            .decode(value)
            .map_err(|source| Base64Error::Invalid {
                value: value.to_string(),
                source,
            })?;
        Ok(Self {
            value: value.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Decoded bytes
    pub fn decode(&self) -> Vec<u8> {
        BASE64_VALUE.decode(&self.value).unwrap_or_default()
    }
}

impl fmt::Display for Base64Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// A `plugin-types` entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaType {
    type_: String,
    subtype: String,
}

impl MediaType {
    /// Parse `type/subtype`
    pub fn parse(value: &str) -> Option<Self> {
        let (type_, subtype) = grammar::media_type(value)?;
        Some(Self {
            type_: type_.to_string(),
            subtype: subtype.to_string(),
        })
    }

    pub fn type_(&self) -> &str {
        &self.type_
    }

    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// Media types compare case-insensitively
    pub fn matches(&self, other: &MediaType) -> bool {
        self.type_.eq_ignore_ascii_case(&other.type_)
            && self.subtype.eq_ignore_ascii_case(&other.subtype)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_, self.subtype)
    }
}

/// A `sandbox` token such as `allow-scripts`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SandboxValue(String);

impl SandboxValue {
    pub fn parse(value: &str) -> Option<Self> {
        grammar::is_sandbox_token(value).then(|| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SandboxValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
