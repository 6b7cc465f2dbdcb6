//! Placeholder tokens found in shared strings.
//!
//! Two shapes are recognised:
//!
//! - `${name}` anywhere inside a string item, possibly several per item and
//!   possibly split across rich-text runs;
//! - `${name:WxH}` as the *entire* text of a string item, which requests an
//!   image of `W`×`H` pixels anchored at every cell showing that item.

use crate::model::{ImageSize, TemplateData};
use quick_xml::escape::{escape, unescape};
use regex::{Captures, Regex};
use serde::Serialize;
use std::borrow::Cow;
use std::sync::OnceLock;

/// `${name}`, capturing everything up to the first closing brace.
fn text_placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid placeholder pattern"))
}

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"))
}

/// A placeholder occurrence, as reported by template inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PlaceholderToken {
    /// `${name}` inside text
    Text { name: String },
    /// `${key:WxH}` filling a whole string item
    Image {
        key: String,
        params: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        size: Option<ImageSize>,
    },
}

impl PlaceholderToken {
    /// The data key this placeholder reads.
    pub fn name(&self) -> &str {
        match self {
            PlaceholderToken::Text { name } => name,
            PlaceholderToken::Image { key, .. } => key,
        }
    }
}

/// An image placeholder: the data key and the remaining `:`-separated parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePlaceholder {
    pub key: String,
    pub params: Vec<String>,
}

impl ImagePlaceholder {
    /// Requested size, from the first parameter after the key.
    pub fn size(&self) -> Option<ImageSize> {
        self.params.first().and_then(|p| ImageSize::parse(p))
    }
}

/// How a shared-string item is treated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The whole item is an image placeholder
    Image(ImagePlaceholder),
    /// Ordinary text, possibly holding `${name}` placeholders
    Text,
}

/// Remove markup tags from a string.
pub fn strip_tags(text: &str) -> Cow<'_, str> {
    tag_pattern().replace_all(text, "")
}

/// Classify a string item by its text content.
///
/// An image placeholder is `${KEY:PARAM...}` filling the whole item, with a
/// key and at least one parameter, none of them empty.
pub fn classify(item_text: &str) -> Classification {
    let stripped = strip_tags(item_text);
    let inner = stripped
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
        .filter(|inner| !inner.is_empty());

    let Some(inner) = inner else {
        return Classification::Text;
    };

    let params: Vec<&str> = inner.split(':').collect();
    if params.len() < 2 || params.iter().any(|p| p.is_empty()) {
        return Classification::Text;
    }

    Classification::Image(ImagePlaceholder {
        key: params[0].to_string(),
        params: params[1..].iter().map(|p| p.to_string()).collect(),
    })
}

/// Names of all `${name}` placeholders in plain text, in order of appearance.
pub fn text_placeholder_names(text: &str) -> Vec<String> {
    text_placeholder_pattern()
        .captures_iter(text)
        .map(|caps| strip_tags(&caps[1]).into_owned())
        .collect()
}

/// Replace `${name}` occurrences in serialized item XML with escaped text values.
///
/// Markup inside the braces (a placeholder split over several runs) is
/// dropped together with the placeholder. Unknown names are left verbatim.
pub fn substitute_text<'a>(xml: &'a str, data: &TemplateData) -> Cow<'a, str> {
    text_placeholder_pattern().replace_all(xml, |caps: &Captures<'_>| {
        let stripped = strip_tags(&caps[1]);
        let name = unescape(&stripped).unwrap_or(Cow::Borrowed(stripped.as_ref()));
        match data.get_text(&name) {
            Some(value) => escape(value).into_owned(),
            None => caps[0].to_string(),
        }
    })
}
