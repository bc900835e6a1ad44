//! Directive names and typed directive values

use super::source::{AncestorSource, SourceExpression};
use super::values::{MediaType, SandboxValue};
use crate::origin::Uri;
use crate::utils::OrderedSet;
use std::fmt;

/// Recognized directive names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveName {
    BaseUri,
    ChildSrc,
    ConnectSrc,
    DefaultSrc,
    FontSrc,
    FormAction,
    FrameAncestors,
    /// Deprecated in favour of `child-src`
    FrameSrc,
    ImgSrc,
    MediaSrc,
    ObjectSrc,
    PluginTypes,
    ReportUri,
    Sandbox,
    ScriptSrc,
    StyleSrc,
}

impl DirectiveName {
    pub fn as_str(&self) -> &'static str {
        match self {
            DirectiveName::BaseUri => "base-uri",
            DirectiveName::ChildSrc => "child-src",
            DirectiveName::ConnectSrc => "connect-src",
            DirectiveName::DefaultSrc => "default-src",
            DirectiveName::FontSrc => "font-src",
            DirectiveName::FormAction => "form-action",
            DirectiveName::FrameAncestors => "frame-ancestors",
            DirectiveName::FrameSrc => "frame-src",
            DirectiveName::ImgSrc => "img-src",
            DirectiveName::MediaSrc => "media-src",
            DirectiveName::ObjectSrc => "object-src",
            DirectiveName::PluginTypes => "plugin-types",
            DirectiveName::ReportUri => "report-uri",
            DirectiveName::Sandbox => "sandbox",
            DirectiveName::ScriptSrc => "script-src",
            DirectiveName::StyleSrc => "style-src",
        }
    }

    /// Case-insensitive lookup
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "base-uri" => Some(DirectiveName::BaseUri),
            "child-src" => Some(DirectiveName::ChildSrc),
            "connect-src" => Some(DirectiveName::ConnectSrc),
            "default-src" => Some(DirectiveName::DefaultSrc),
            "font-src" => Some(DirectiveName::FontSrc),
            "form-action" => Some(DirectiveName::FormAction),
            "frame-ancestors" => Some(DirectiveName::FrameAncestors),
            "frame-src" => Some(DirectiveName::FrameSrc),
            "img-src" => Some(DirectiveName::ImgSrc),
            "media-src" => Some(DirectiveName::MediaSrc),
            "object-src" => Some(DirectiveName::ObjectSrc),
            "plugin-types" => Some(DirectiveName::PluginTypes),
            "report-uri" => Some(DirectiveName::ReportUri),
            "sandbox" => Some(DirectiveName::Sandbox),
            "script-src" => Some(DirectiveName::ScriptSrc),
            "style-src" => Some(DirectiveName::StyleSrc),
            _ => None,
        }
    }

    pub fn is_deprecated(&self) -> bool {
        matches!(self, DirectiveName::FrameSrc)
    }
}

impl fmt::Display for DirectiveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directives whose value is a source list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceListName {
    BaseUri,
    ChildSrc,
    ConnectSrc,
    DefaultSrc,
    FontSrc,
    FormAction,
    FrameSrc,
    ImgSrc,
    MediaSrc,
    ObjectSrc,
    ScriptSrc,
    StyleSrc,
}

impl SourceListName {
    pub fn directive_name(&self) -> DirectiveName {
        match self {
            SourceListName::BaseUri => DirectiveName::BaseUri,
            SourceListName::ChildSrc => DirectiveName::ChildSrc,
            SourceListName::ConnectSrc => DirectiveName::ConnectSrc,
            SourceListName::DefaultSrc => DirectiveName::DefaultSrc,
            SourceListName::FontSrc => DirectiveName::FontSrc,
            SourceListName::FormAction => DirectiveName::FormAction,
            SourceListName::FrameSrc => DirectiveName::FrameSrc,
            SourceListName::ImgSrc => DirectiveName::ImgSrc,
            SourceListName::MediaSrc => DirectiveName::MediaSrc,
            SourceListName::ObjectSrc => DirectiveName::ObjectSrc,
            SourceListName::ScriptSrc => DirectiveName::ScriptSrc,
            SourceListName::StyleSrc => DirectiveName::StyleSrc,
        }
    }

    /// The directive consulted when this one is absent
    pub fn fallback(&self) -> Option<SourceListName> {
        match self {
            SourceListName::FrameSrc => Some(SourceListName::ChildSrc),
            SourceListName::ChildSrc
            | SourceListName::ConnectSrc
            | SourceListName::FontSrc
            | SourceListName::ImgSrc
            | SourceListName::MediaSrc
            | SourceListName::ObjectSrc
            | SourceListName::ScriptSrc
            | SourceListName::StyleSrc => Some(SourceListName::DefaultSrc),
            SourceListName::BaseUri | SourceListName::FormAction | SourceListName::DefaultSrc => {
                None
            }
        }
    }
}

impl fmt::Display for SourceListName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.directive_name().as_str())
    }
}

/// A parsed directive. The variant fixes the value type for each name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    SourceList {
        name: SourceListName,
        sources: OrderedSet<SourceExpression>,
    },
    FrameAncestors(OrderedSet<AncestorSource>),
    PluginTypes(OrderedSet<MediaType>),
    ReportUri(OrderedSet<Uri>),
    Sandbox(OrderedSet<SandboxValue>),
}

impl Directive {
    pub fn name(&self) -> DirectiveName {
        match self {
            Directive::SourceList { name, .. } => name.directive_name(),
            Directive::FrameAncestors(_) => DirectiveName::FrameAncestors,
            Directive::PluginTypes(_) => DirectiveName::PluginTypes,
            Directive::ReportUri(_) => DirectiveName::ReportUri,
            Directive::Sandbox(_) => DirectiveName::Sandbox,
        }
    }

    pub fn sources(&self) -> Option<&OrderedSet<SourceExpression>> {
        match self {
            Directive::SourceList { sources, .. } => Some(sources),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Directive::SourceList { sources, .. } => sources.is_empty(),
            Directive::FrameAncestors(values) => values.is_empty(),
            Directive::PluginTypes(values) => values.is_empty(),
            Directive::ReportUri(values) => values.is_empty(),
            Directive::Sandbox(values) => values.is_empty(),
        }
    }
}

fn write_values<T: fmt::Display>(f: &mut fmt::Formatter<'_>, values: &OrderedSet<T>) -> fmt::Result {
    for value in values {
        write!(f, " {}", value)?;
    }
    Ok(())
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name().as_str())?;
        match self {
            Directive::SourceList { sources, .. } => write_values(f, sources),
            Directive::FrameAncestors(values) => write_values(f, values),
            Directive::PluginTypes(values) => write_values(f, values),
            Directive::ReportUri(values) => write_values(f, values),
            Directive::Sandbox(values) => write_values(f, values),
        }
    }
}
