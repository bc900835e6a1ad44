//! Shared utilities and error types

pub mod error;
mod ordered_set;

pub use error::{CspError, ParseError, ParseErrorKind, Result, TokeniserError, UriError};
pub use ordered_set::OrderedSet;
