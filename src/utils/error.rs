//! Error types for policy tokenising, parsing and URI resolution

use crate::tokeniser::Location;
use std::fmt;
use thiserror::Error;

/// Main error type for CSP operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CspError {
    /// Header text could not be split into tokens
    #[error(transparent)]
    Tokenise(#[from] TokeniserError),
    /// Token stream violated the policy grammar
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A URI could not be resolved
    #[error(transparent)]
    Uri(#[from] UriError),
}

/// Lexical error raised while splitting header text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{location}: {message}")]
pub struct TokeniserError {
    pub message: String,
    pub location: Location,
}

impl TokeniserError {
    pub fn new(message: impl Into<String>, location: Location) -> Self {
        Self {
            message: message.into(),
            location,
        }
    }
}

/// Distinguishes a grammar violation from running out of tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A token did not fit the grammar
    Syntax,
    /// The policy ended where more input was required
    UnexpectedEof,
}

/// Fatal grammar error. Parsing stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ParseError {
    kind: ParseErrorKind,
    message: String,
    location: Option<Location>,
}

impl ParseError {
    pub fn syntax(message: impl Into<String>, location: Option<Location>) -> Self {
        Self {
            kind: ParseErrorKind::Syntax,
            message: message.into(),
            location,
        }
    }

    pub fn unexpected_eof(message: impl Into<String>) -> Self {
        Self {
            kind: ParseErrorKind::UnexpectedEof,
            message: message.into(),
            location: None,
        }
    }

    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    /// The message without location prefix
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.location) {
            (ParseErrorKind::UnexpectedEof, _) => {
                write!(f, "unexpected end of policy: {}", self.message)
            }
            (ParseErrorKind::Syntax, Some(location)) => write!(f, "{}: {}", location, self.message),
            (ParseErrorKind::Syntax, None) => f.write_str(&self.message),
        }
    }
}

/// URI resolution errors. These come from the URI collaborator, never from the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UriError {
    #[error("invalid uri {input:?}: {source}")]
    Invalid {
        input: String,
        #[source]
        source: url::ParseError,
    },
    #[error("cannot resolve {0:?} against an origin without a scheme")]
    MissingScheme(String),
}

/// Convenience Result type for CSP operations
pub type Result<T> = std::result::Result<T, CspError>;
