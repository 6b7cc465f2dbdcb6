//! Placeholder scan over the shared string table.
//!
//! Each `<si>` item is classified on its own: an item that is exactly
//! `${key:WxH}` becomes an image substitution, anything else is treated as
//! text and has its `${name}` placeholders replaced in place.

use super::placeholder::{
    classify, substitute_text, text_placeholder_names, Classification, PlaceholderToken,
};
use crate::error::Result;
use crate::model::{ImageSubstitution, TemplateData};
use crate::package::Package;
use crate::render::RenderOptions;
use crate::xml::{Element, XmlTree};
use serde::Serialize;
use std::borrow::Cow;
use tracing::{debug, warn};

/// Package path of the shared string table.
pub const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";

/// A placeholder found in the shared string table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placeholder {
    /// Index of the shared-string item holding it
    pub index: usize,
    #[serde(flatten)]
    pub token: PlaceholderToken,
}

/// Substitute text placeholders and blank image placeholders in the shared strings.
///
/// Image data consumed by a placeholder is removed from `data` and stored as
/// a media part; the returned substitutions tell the drawing engine where to
/// anchor each image. Item indices never change.
pub fn scan_shared_strings(
    package: &mut Package,
    data: &mut TemplateData,
    options: &RenderOptions,
) -> Result<Vec<ImageSubstitution>> {
    if !package.has_entry(SHARED_STRINGS_PART)? {
        debug!("template has no shared strings");
        return Ok(Vec::new());
    }

    let mut substitutions = Vec::new();
    let mut media = Vec::new();
    let mut replaced = 0usize;

    {
        let tree = package.fetch_tree(SHARED_STRINGS_PART)?;
        let Some(root) = shared_string_root(tree) else {
            warn!("shared strings part has no <sst> root");
            return Ok(Vec::new());
        };

        let items = root.elements_mut().filter(|el| el.local_name() == "si");
        for (index, item) in items.enumerate() {
            match classify(&item.text_content()) {
                Classification::Image(placeholder) => {
                    let Some(size) = placeholder.size() else {
                        warn!(
                            index,
                            key = %placeholder.key,
                            params = ?placeholder.params,
                            "image placeholder has no valid WxH size"
                        );
                        continue;
                    };
                    let Some(bytes) = data.take_image(&placeholder.key) else {
                        debug!(index, key = %placeholder.key, "no image data for placeholder");
                        continue;
                    };

                    let format = options.media_format(&bytes);
                    let media_path = ImageSubstitution::media_path_for(&placeholder.key, format);
                    debug!(index, key = %placeholder.key, %size, media = %media_path, "image placeholder");

                    *item = blank_item(item);
                    media.push((media_path.clone(), bytes, format.mime_type()));
                    substitutions.push(ImageSubstitution {
                        shared_string_index: index,
                        data_key: placeholder.key,
                        size,
                        media_path,
                    });
                }
                Classification::Text => {
                    let xml = item.to_xml_string()?;
                    if !xml.contains("${") {
                        continue;
                    }
                    if let Cow::Owned(updated) = substitute_text(&xml, data) {
                        if updated != xml {
                            *item = Element::parse_fragment(&updated)?;
                            replaced += 1;
                        }
                    }
                }
            }
        }
    }

    for (path, bytes, content_type) in media {
        package.put_entry(&path, bytes, content_type);
    }

    debug!(
        text_items = replaced,
        images = substitutions.len(),
        "shared strings scanned"
    );
    Ok(substitutions)
}

/// List every placeholder in the shared string table without changing anything.
pub fn inspect_shared_strings(package: &mut Package) -> Result<Vec<Placeholder>> {
    if !package.has_entry(SHARED_STRINGS_PART)? {
        return Ok(Vec::new());
    }

    let tree = package.read_tree(SHARED_STRINGS_PART)?;
    let Some(root) = tree.root.as_ref().filter(|root| root.local_name() == "sst") else {
        return Ok(Vec::new());
    };

    let mut found = Vec::new();
    for (index, item) in root.children_named("si").enumerate() {
        let text = item.text_content();
        match classify(&text) {
            Classification::Image(placeholder) => {
                let size = placeholder.size();
                found.push(Placeholder {
                    index,
                    token: PlaceholderToken::Image {
                        key: placeholder.key,
                        params: placeholder.params,
                        size,
                    },
                });
            }
            Classification::Text => {
                found.extend(text_placeholder_names(&text).into_iter().map(|name| {
                    Placeholder {
                        index,
                        token: PlaceholderToken::Text { name },
                    }
                }));
            }
        }
    }
    Ok(found)
}

fn shared_string_root(tree: &mut XmlTree) -> Option<&mut Element> {
    tree.root.as_mut().filter(|root| root.local_name() == "sst")
}

/// A string item holding a single-space run, keeping the item's prefix.
fn blank_item(item: &Element) -> Element {
    let text_name = match item.prefix() {
        Some(prefix) => format!("{prefix}:t"),
        None => "t".to_string(),
    };
    Element::new(item.name.clone()).with_child(
        Element::new(text_name)
            .with_attr("xml:space", "preserve")
            .with_text(" "),
    )
}
