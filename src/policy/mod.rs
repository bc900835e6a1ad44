//! Parsed policy model
//!
//! A [`Policy`] is the protected document's origin plus its directives in
//! the order they were written. Repeated directive names are kept; lookups
//! follow the first-wins rule, and fetch directives fall back to
//! `default-src` (or `child-src` for `frame-src`) when absent.

mod directive;
mod source;
mod values;

pub use directive::{Directive, DirectiveName, SourceListName};
pub use source::{
    AncestorSource, HashAlgorithm, HostSource, KeywordSource, PortSpec, SchemeSource,
    SourceExpression,
};
pub use values::{Base64Error, Base64Value, MediaType, SandboxValue};

use crate::origin::{Origin, Uri};
use crate::utils::OrderedSet;
use std::fmt;

/// Content Security Policy
#[derive(Debug, Clone, PartialEq)]
pub struct Policy {
    origin: Origin,
    directives: Vec<Directive>,
}

impl Policy {
    /// Create an empty policy for a document at `origin`
    pub fn new(origin: Origin) -> Self {
        Self {
            origin,
            directives: Vec::new(),
        }
    }

    pub fn from_directives(origin: Origin, directives: impl IntoIterator<Item = Directive>) -> Self {
        Self {
            origin,
            directives: directives.into_iter().collect(),
        }
    }

    pub(crate) fn push_directive(&mut self, directive: Directive) {
        self.directives.push(directive);
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// All directives, duplicates included
    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    /// The first directive with this name. Later duplicates have no effect.
    pub fn directive(&self, name: DirectiveName) -> Option<&Directive> {
        self.directives.iter().find(|directive| directive.name() == name)
    }

    /// Source list governing `name`, following the fallback chain
    pub fn effective_sources(&self, name: SourceListName) -> Option<&OrderedSet<SourceExpression>> {
        let mut current = Some(name);
        while let Some(name) = current {
            if let Some(sources) = self
                .directive(name.directive_name())
                .and_then(Directive::sources)
            {
                return Some(sources);
            }
            current = name.fallback();
        }
        None
    }

    /// Check whether loading `resource` is allowed for a source-list directive
    pub fn allows_uri(&self, name: SourceListName, resource: &Uri) -> bool {
        match self.effective_sources(name) {
            Some(sources) => sources
                .iter()
                .any(|source| source.matches_uri(resource, &self.origin)),
            None => true,
        }
    }

    /// Check whether an inline element carrying `nonce` is allowed
    pub fn allows_nonce(&self, name: SourceListName, nonce: &str) -> bool {
        match self.effective_sources(name) {
            Some(sources) => sources.iter().any(|source| source.matches_nonce(nonce)),
            None => true,
        }
    }

    /// Check whether inline `content` is allowed by one of the hash sources
    pub fn allows_inline_content(&self, name: SourceListName, content: &[u8]) -> bool {
        match self.effective_sources(name) {
            Some(sources) => sources.iter().any(|source| source.matches_content(content)),
            None => true,
        }
    }

    /// `'unsafe-inline'` is ignored when the list also has a nonce or hash source
    pub fn allows_unsafe_inline(&self, name: SourceListName) -> bool {
        let Some(sources) = self.effective_sources(name) else {
            return true;
        };
        let has_unsafe_inline = sources
            .iter()
            .any(|source| source.is_keyword(KeywordSource::UnsafeInline));
        let has_nonce_or_hash = sources.iter().any(|source| {
            matches!(
                source,
                SourceExpression::Nonce(_) | SourceExpression::Hash { .. }
            )
        });
        has_unsafe_inline && !has_nonce_or_hash
    }

    /// Check whether `eval()` and friends are allowed
    pub fn allows_unsafe_eval(&self) -> bool {
        match self.effective_sources(SourceListName::ScriptSrc) {
            Some(sources) => sources
                .iter()
                .any(|source| source.is_keyword(KeywordSource::UnsafeEval)),
            None => true,
        }
    }

    /// Check whether the document may be embedded by `ancestor`
    pub fn allows_frame_ancestor(&self, ancestor: &Uri) -> bool {
        match self.directive(DirectiveName::FrameAncestors) {
            Some(Directive::FrameAncestors(sources)) => sources
                .iter()
                .any(|source| source.matches_uri(ancestor, &self.origin)),
            _ => true,
        }
    }

    /// Check whether a plugin of `media_type` may be loaded
    pub fn allows_plugin_type(&self, media_type: &MediaType) -> bool {
        match self.directive(DirectiveName::PluginTypes) {
            Some(Directive::PluginTypes(types)) => types.iter().any(|t| t.matches(media_type)),
            _ => true,
        }
    }

    pub fn sandbox_tokens(&self) -> Option<&OrderedSet<SandboxValue>> {
        match self.directive(DirectiveName::Sandbox) {
            Some(Directive::Sandbox(tokens)) => Some(tokens),
            _ => None,
        }
    }

    pub fn report_uris(&self) -> Option<&OrderedSet<Uri>> {
        match self.directive(DirectiveName::ReportUri) {
            Some(Directive::ReportUri(uris)) => Some(uris),
            _ => None,
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, directive) in self.directives.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", directive)?;
        }
        Ok(())
    }
}
