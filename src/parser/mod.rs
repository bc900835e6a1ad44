//! Recursive-descent parser for Content-Security-Policy
//!
//! The parser walks a token vector with an index cursor. Each directive name
//! selects the sub-grammar for its values. Grammar violations abort the parse
//! with a [`ParseError`]; deprecated syntax is reported to a [`WarningSink`]
//! and otherwise accepted.

pub(crate) mod grammar;

use crate::diagnostics::{DiscardWarnings, Warning, WarningSink};
use crate::origin::{Origin, Uri};
use crate::policy::{
    AncestorSource, Base64Value, Directive, DirectiveName, HashAlgorithm, HostSource,
    KeywordSource, MediaType, Policy, SandboxValue, SchemeSource, SourceExpression,
    SourceListName,
};
use crate::tokeniser::{self, Location, RemovedDirective, Token, TokenKind};
use crate::utils::{OrderedSet, ParseError};

const FRAME_SRC_DEPRECATED: &str = "The frame-src directive is deprecated as of CSP version 1.1. Authors who wish to govern nested browsing contexts SHOULD use the child-src directive instead.";
const UNSAFE_REDIRECT_REMOVED: &str =
    "'unsafe-redirect' has been removed from CSP as of version 2.0";

/// Parser configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Report deprecated directives and keywords
    pub warn_deprecated: bool,
    /// Report hash sources whose digest length does not fit the algorithm
    pub check_hash_length: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            warn_deprecated: true,
            check_hash_length: true,
        }
    }
}

/// Parse a policy, discarding warnings
pub fn parse(text: &str, origin: &Origin) -> crate::Result<Policy> {
    parse_with_config(text, origin, &mut DiscardWarnings, ParserConfig::default())
}

/// Parse a policy, reporting warnings to `warnings`
pub fn parse_with_warnings(
    text: &str,
    origin: &Origin,
    warnings: &mut dyn WarningSink,
) -> crate::Result<Policy> {
    parse_with_config(text, origin, warnings, ParserConfig::default())
}

pub fn parse_with_config(
    text: &str,
    origin: &Origin,
    warnings: &mut dyn WarningSink,
    config: ParserConfig,
) -> crate::Result<Policy> {
    let tokens = tokeniser::tokenise(text)?;
    let policy = Parser::with_config(tokens, origin.clone(), warnings, config).parse_policy()?;
    Ok(policy)
}

/// Single-use parser over one token stream
pub struct Parser<'w> {
    tokens: Vec<Token>,
    index: usize,
    origin: Origin,
    warnings: &'w mut dyn WarningSink,
    config: ParserConfig,
}

impl<'w> Parser<'w> {
    pub fn new(tokens: Vec<Token>, origin: Origin, warnings: &'w mut dyn WarningSink) -> Self {
        Self::with_config(tokens, origin, warnings, ParserConfig::default())
    }

    pub fn with_config(
        tokens: Vec<Token>,
        origin: Origin,
        warnings: &'w mut dyn WarningSink,
        config: ParserConfig,
    ) -> Self {
        Self {
            tokens,
            index: 0,
            origin,
            warnings,
            config,
        }
    }

    /// Parse the whole token stream into a policy
    pub fn parse_policy(mut self) -> Result<Policy, ParseError> {
        let mut policy = Policy::new(self.origin.clone());
        while self.has_next() {
            if self.eat_separator() {
                continue;
            }
            let directive = self.parse_directive()?;
            log::trace!("[CSP] parsed directive {}", directive);
            policy.push_directive(directive);
            if !self.eat_separator() {
                if let Some(token) = self.advance() {
                    return Err(error_at(
                        &token,
                        format!("expecting semicolon or end of policy but found {}", token.value),
                    ));
                }
            }
        }
        Ok(policy)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned()?;
        self.index += 1;
        Some(token)
    }

    fn has_next(&self) -> bool {
        self.index < self.tokens.len()
    }

    /// A token remains and it is not `;`
    fn has_next_value(&self) -> bool {
        self.peek().is_some_and(|token| !token.is_separator())
    }

    fn eat_separator(&mut self) -> bool {
        if self.peek().is_some_and(Token::is_separator) {
            self.index += 1;
            return true;
        }
        false
    }

    fn eat_value(&mut self, value: &str) -> bool {
        if self
            .peek()
            .is_some_and(|token| !token.is_separator() && token.value == value)
        {
            self.index += 1;
            return true;
        }
        false
    }

    fn warn(&mut self, message: impl Into<String>, location: Location) {
        let warning = Warning::new(message, Some(location));
        log::debug!("[CSP] warning: {}", warning);
        self.warnings.push(warning);
    }

    fn warn_deprecated(&mut self, message: &str, location: Location) {
        if self.config.warn_deprecated {
            self.warn(message, location);
        }
    }

    fn parse_directive(&mut self) -> Result<Directive, ParseError> {
        let Some(token) = self.advance() else {
            return Err(eof("expecting directive-name but found end of policy"));
        };
        match token.kind {
            TokenKind::DirectiveName(name) => self.parse_directive_value(name, &token),
            TokenKind::RemovedDirectiveName(removed) => {
                Err(error_at(&token, removed_directive_message(removed, &token.value)))
            }
            TokenKind::DirectiveValue | TokenKind::Separator => Err(error_at(
                &token,
                format!("expecting directive-name but found {}", token.value),
            )),
        }
    }

    fn parse_directive_value(
        &mut self,
        name: DirectiveName,
        token: &Token,
    ) -> Result<Directive, ParseError> {
        let list = match name {
            DirectiveName::BaseUri => SourceListName::BaseUri,
            DirectiveName::ChildSrc => SourceListName::ChildSrc,
            DirectiveName::ConnectSrc => SourceListName::ConnectSrc,
            DirectiveName::DefaultSrc => SourceListName::DefaultSrc,
            DirectiveName::FontSrc => SourceListName::FontSrc,
            DirectiveName::FormAction => SourceListName::FormAction,
            DirectiveName::FrameSrc => {
                self.warn_deprecated(FRAME_SRC_DEPRECATED, token.location);
                SourceListName::FrameSrc
            }
            DirectiveName::ImgSrc => SourceListName::ImgSrc,
            DirectiveName::MediaSrc => SourceListName::MediaSrc,
            DirectiveName::ObjectSrc => SourceListName::ObjectSrc,
            DirectiveName::ScriptSrc => SourceListName::ScriptSrc,
            DirectiveName::StyleSrc => SourceListName::StyleSrc,
            DirectiveName::FrameAncestors => {
                return Ok(Directive::FrameAncestors(self.parse_ancestor_source_list()?));
            }
            DirectiveName::PluginTypes => {
                return Ok(Directive::PluginTypes(self.parse_media_type_list()?));
            }
            DirectiveName::ReportUri => return Ok(Directive::ReportUri(self.parse_uri_list()?)),
            DirectiveName::Sandbox => {
                return Ok(Directive::Sandbox(self.parse_sandbox_token_list()?));
            }
        };
        Ok(Directive::SourceList {
            name: list,
            sources: self.parse_source_list()?,
        })
    }

    /// `'none'` ends the list; anything after it is left for the caller
    fn parse_source_list(&mut self) -> Result<OrderedSet<SourceExpression>, ParseError> {
        let mut sources = OrderedSet::new();
        if self.eat_value("'none'") {
            sources.insert(SourceExpression::None);
            return Ok(sources);
        }
        while self.has_next_value() {
            if let Some(token) = self.advance() {
                sources.insert(self.parse_source_expression(&token)?);
            }
        }
        Ok(sources)
    }

    fn parse_source_expression(&mut self, token: &Token) -> Result<SourceExpression, ParseError> {
        let value = token.value.as_str();

        if let Some(keyword) = KeywordSource::from_token(value) {
            if keyword.is_deprecated() {
                self.warn_deprecated(UNSAFE_REDIRECT_REMOVED, token.location);
            }
            return Ok(SourceExpression::Keyword(keyword));
        }

        if value.starts_with("'nonce-") {
            let nonce = quoted_interior(value, 7).ok_or_else(|| unexpected_source(token))?;
            let nonce = Base64Value::new(nonce).map_err(|e| error_at(token, e.to_string()))?;
            return Ok(SourceExpression::Nonce(nonce));
        }

        if value.starts_with("'sha") {
            return self.parse_hash_source(token);
        }

        if let Some(source) = SchemeSource::parse(value) {
            return Ok(SourceExpression::Scheme(source));
        }

        if let Some(source) = HostSource::parse(value) {
            return Ok(SourceExpression::Host(source));
        }

        Err(unexpected_source(token))
    }

    /// `'sha256-<base64>'`, `'sha384-<base64>'` or `'sha512-<base64>'`
    fn parse_hash_source(&mut self, token: &Token) -> Result<SourceExpression, ParseError> {
        let value = token.value.as_str();
        let algorithm = value
            .get(4..7)
            .and_then(HashAlgorithm::from_bits)
            .ok_or_else(|| {
                let tag = value.get(1..7).unwrap_or(&value[1..]);
                error_at(token, format!("unrecognised hash algorithm {}", tag))
            })?;

        if value.as_bytes().get(7) != Some(&b'-') {
            return Err(unexpected_source(token));
        }
        let digest = quoted_interior(value, 8).ok_or_else(|| unexpected_source(token))?;
        let digest = Base64Value::new(digest).map_err(|e| error_at(token, e.to_string()))?;

        if self.config.check_hash_length {
            let actual = digest.decode().len();
            let expected = algorithm.digest_len();
            if actual != expected {
                self.warn(
                    format!(
                        "hash source digest for {} should be {} bytes but is {} bytes",
                        algorithm, expected, actual
                    ),
                    token.location,
                );
            }
        }

        Ok(SourceExpression::Hash {
            algorithm,
            value: digest,
        })
    }

    fn parse_ancestor_source_list(&mut self) -> Result<OrderedSet<AncestorSource>, ParseError> {
        let mut sources = OrderedSet::new();
        if self.eat_value("'none'") {
            sources.insert(AncestorSource::None);
            return Ok(sources);
        }
        while self.has_next_value() {
            if let Some(token) = self.advance() {
                sources.insert(parse_ancestor_source(&token)?);
            }
        }
        Ok(sources)
    }

    fn parse_media_type_list(&mut self) -> Result<OrderedSet<MediaType>, ParseError> {
        const EMPTY: &str = "media-type-list must contain at least one media-type";
        match self.peek() {
            None => return Err(eof(EMPTY)),
            Some(token) if token.is_separator() => return Err(error_at(token, EMPTY)),
            Some(_) => {}
        }

        let mut media_types = OrderedSet::new();
        while self.has_next_value() {
            if let Some(token) = self.advance() {
                let media_type = MediaType::parse(&token.value).ok_or_else(|| {
                    error_at(&token, format!("expecting media-type but found {}", token.value))
                })?;
                media_types.insert(media_type);
            }
        }
        Ok(media_types)
    }

    fn parse_uri_list(&mut self) -> Result<OrderedSet<Uri>, ParseError> {
        const EMPTY: &str = "report-uri must contain at least one uri-reference";
        let mut uris = OrderedSet::new();
        while self.has_next_value() {
            if let Some(token) = self.advance() {
                let uri = Uri::parse_with_origin(&self.origin, &token.value).map_err(|e| {
                    log::debug!("[CSP] rejected report-uri {:?}: {}", token.value, e);
                    error_at(&token, format!("expecting uri-reference but found {}", token.value))
                })?;
                uris.insert(uri);
            }
        }
        if uris.is_empty() {
            return Err(match self.peek() {
                Some(token) => error_at(token, EMPTY),
                None => eof(EMPTY),
            });
        }
        Ok(uris)
    }

    fn parse_sandbox_token_list(&mut self) -> Result<OrderedSet<SandboxValue>, ParseError> {
        let mut tokens = OrderedSet::new();
        while self.has_next_value() {
            if let Some(token) = self.advance() {
                let sandbox = SandboxValue::parse(&token.value).ok_or_else(|| {
                    error_at(&token, format!("expecting sandbox-token but found {}", token.value))
                })?;
                tokens.insert(sandbox);
            }
        }
        Ok(tokens)
    }
}

fn parse_ancestor_source(token: &Token) -> Result<AncestorSource, ParseError> {
    if let Some(source) = SchemeSource::parse(&token.value) {
        return Ok(AncestorSource::Scheme(source));
    }
    if let Some(source) = HostSource::parse(&token.value) {
        return Ok(AncestorSource::Host(source));
    }
    Err(error_at(
        token,
        format!("expecting ancestor-source but found {}", token.value),
    ))
}

/// Text between a quoted prefix of `prefix_len` bytes and the closing quote
fn quoted_interior(value: &str, prefix_len: usize) -> Option<&str> {
    let inner = value.strip_suffix('\'')?;
    inner.get(prefix_len..)
}

fn removed_directive_message(removed: RemovedDirective, written: &str) -> String {
    match removed {
        RemovedDirective::Referrer | RemovedDirective::UpgradeInsecureRequests => format!(
            "The {} directive is not in the CSP specification yet.",
            written
        ),
        RemovedDirective::Allow => "The allow directive has been replaced with default-src and is not in the CSP specification.".to_string(),
        RemovedDirective::Options => "The options directive has been replaced with 'unsafe-inline' and 'unsafe-eval' and is not in the CSP specification.".to_string(),
    }
}

fn unexpected_source(token: &Token) -> ParseError {
    error_at(
        token,
        format!("expecting source-expression but found {}", token.value),
    )
}

fn error_at(token: &Token, message: impl Into<String>) -> ParseError {
    let error = ParseError::syntax(message, Some(token.location));
    log::debug!("[CSP] parse error: {}", error);
    error
}

fn eof(message: &str) -> ParseError {
    let error = ParseError::unexpected_eof(message);
    log::debug!("[CSP] parse error: {}", error);
    error
}
