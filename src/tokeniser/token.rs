//! Token types produced by the tokeniser

use crate::policy::DirectiveName;
use std::fmt;

/// Position of a token in the header text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Location {
    /// 1-based line
    pub line: usize,
    /// 1-based column, counted in characters
    pub column: usize,
    /// 0-based byte offset
    pub offset: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Directive names that were proposed or used historically but are rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemovedDirective {
    Referrer,
    UpgradeInsecureRequests,
    Allow,
    Options,
}

impl RemovedDirective {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemovedDirective::Referrer => "referrer",
            RemovedDirective::UpgradeInsecureRequests => "upgrade-insecure-requests",
            RemovedDirective::Allow => "allow",
            RemovedDirective::Options => "options",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "referrer" => Some(RemovedDirective::Referrer),
            "upgrade-insecure-requests" => Some(RemovedDirective::UpgradeInsecureRequests),
            "allow" => Some(RemovedDirective::Allow),
            "options" => Some(RemovedDirective::Options),
            _ => None,
        }
    }
}

/// Token classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A recognized directive name in directive-name position
    DirectiveName(DirectiveName),
    /// A rejected directive name in directive-name position
    RemovedDirectiveName(RemovedDirective),
    /// Any other word
    DirectiveValue,
    /// `;`
    Separator,
}

/// A single token with its raw text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub location: Location,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, location: Location) -> Self {
        Self {
            kind,
            value: value.into(),
            location,
        }
    }

    pub fn separator(location: Location) -> Self {
        Self::new(TokenKind::Separator, ";", location)
    }

    pub fn is_separator(&self) -> bool {
        self.kind == TokenKind::Separator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removed_directive_names() {
        assert_eq!(
            RemovedDirective::from_name("Upgrade-Insecure-Requests"),
            Some(RemovedDirective::UpgradeInsecureRequests)
        );
        assert_eq!(RemovedDirective::from_name("script-src"), None);
        assert_eq!(RemovedDirective::Options.as_str(), "options");
    }

    #[test]
    fn test_location_display() {
        let location = Location {
            line: 2,
            column: 7,
            offset: 30,
        };
        assert_eq!(location.to_string(), "2:7");
    }
}
