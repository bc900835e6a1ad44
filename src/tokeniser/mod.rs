//! Tokeniser for Content-Security-Policy header text
//!
//! Splits a serialized policy into directive names, directive values and
//! `;` separators. The first word of each directive is classified against
//! the known directive names; everything else is left for the parser.

mod token;

pub use token::{Location, RemovedDirective, Token, TokenKind};

use crate::policy::DirectiveName;
use crate::utils::TokeniserError;

/// Tokenise a policy string
pub fn tokenise(text: &str) -> Result<Vec<Token>, TokeniserError> {
    let mut tokens = Vec::new();
    let mut expecting_name = true;
    let mut word: Option<(usize, Location)> = None;
    let mut line = 1;
    let mut column = 1;

    for (offset, ch) in text.char_indices() {
        let location = Location {
            line,
            column,
            offset,
        };

        if ch.is_ascii_whitespace() || ch == ';' {
            if let Some((start, start_location)) = word.take() {
                tokens.push(classify(&text[start..offset], start_location, expecting_name));
                expecting_name = false;
            }
            if ch == ';' {
                tokens.push(Token::separator(location));
                expecting_name = true;
            }
        } else if ch == ',' {
            return Err(TokeniserError::new(
                "multiple policies are not supported",
                location,
            ));
        } else if !ch.is_ascii_graphic() {
            return Err(TokeniserError::new(
                format!("expecting directive-value but found U+{:04X}", ch as u32),
                location,
            ));
        } else if word.is_none() {
            word = Some((offset, location));
        }

        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }

    if let Some((start, start_location)) = word {
        tokens.push(classify(&text[start..], start_location, expecting_name));
    }

    log::trace!("tokenised policy into {} token(s)", tokens.len());
    Ok(tokens)
}

fn classify(word: &str, location: Location, directive_position: bool) -> Token {
    if directive_position {
        if let Some(name) = DirectiveName::from_name(word) {
            return Token::new(TokenKind::DirectiveName(name), word, location);
        }
        if let Some(removed) = RemovedDirective::from_name(word) {
            return Token::new(TokenKind::RemovedDirectiveName(removed), word, location);
        }
    }
    Token::new(TokenKind::DirectiveValue, word, location)
}
