//! # Binix CSP - Content-Security-Policy parser and matcher
//!
//! Parses `Content-Security-Policy` header text into a typed [`Policy`] and
//! decides whether resource loads, inline content and frame embedding are
//! permitted by it.
//!
//! ## Architecture
//!
//! The crate is organized into the following modules:
//!
//! - **tokeniser**: Splits header text into located tokens
//! - **parser**: Recursive-descent grammar and parser configuration
//! - **policy**: Directives, source expressions and policy evaluation
//! - **origin**: Scheme-host-port triples, URIs and host/path matching
//! - **diagnostics**: Warnings for deprecated syntax
//! - **utils**: Shared utilities and error types
//!
//! ```
//! use binix_csp::{SchemeHostPortTriple, SourceListName, Uri, parse};
//!
//! let origin = SchemeHostPortTriple::new("https", "example.com", None);
//! let policy = parse("default-src 'self'; img-src *.cdn.test", &origin).unwrap();
//!
//! let image = Uri::parse("https://img.cdn.test/logo.png").unwrap();
//! assert!(policy.allows_uri(SourceListName::ImgSrc, &image));
//! ```

pub mod diagnostics;
pub mod origin;
pub mod parser;
pub mod policy;
pub mod tokeniser;
pub mod utils;

// Re-export main types for convenience
pub use diagnostics::{DiscardWarnings, SharedWarnings, Warning, WarningSink};
pub use origin::{Origin, SchemeHostPortTriple, Uri};
pub use parser::{Parser, ParserConfig, parse, parse_with_config, parse_with_warnings};
pub use policy::{
    AncestorSource, Base64Value, Directive, DirectiveName, HashAlgorithm, HostSource,
    KeywordSource, MediaType, Policy, PortSpec, SandboxValue, SchemeSource, SourceExpression,
    SourceListName,
};
pub use tokeniser::{Location, RemovedDirective, Token, TokenKind, tokenise};
pub use utils::error::{CspError, ParseError, ParseErrorKind, Result, TokeniserError, UriError};

/// Crate version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = "Binix CSP";
