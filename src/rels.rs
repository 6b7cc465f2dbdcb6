//! Relationship (`.rels`) parts.
//!
//! Helpers to locate, create, read, and extend the relationship document
//! that belongs to a package part.

use crate::error::{Error, Result};
use crate::package::Package;
use crate::xml::{Element, XmlTree};
use std::collections::{HashMap, HashSet};
use std::path::{Component, Path};

/// Namespace of relationship documents.
pub const NS_RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Content type of relationship parts.
pub const RELATIONSHIPS_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-package.relationships+xml";

/// Relationship type: workbook → worksheet.
pub const REL_TYPE_WORKSHEET: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";

/// Relationship type: worksheet → drawing.
pub const REL_TYPE_DRAWING: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/drawing";

/// Relationship type: drawing → image.
pub const REL_TYPE_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

/// A relationship entry from a .rels file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path (relative or absolute)
    pub target: String,
    /// Whether the target is external
    pub external: bool,
}

/// Collection of relationships parsed from a .rels document.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    /// Relationships in document order
    pub entries: Vec<Relationship>,
    /// Map from relationship type to entry positions
    by_type: HashMap<String, Vec<usize>>,
}

impl Relationships {
    /// Create a new empty relationships collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read relationships from a parsed .rels document.
    pub fn from_tree(tree: &XmlTree) -> Self {
        let mut rels = Self::new();
        let Some(root) = &tree.root else {
            return rels;
        };

        for el in root.children_named("Relationship") {
            let id = el.attr("Id").unwrap_or_default();
            if id.is_empty() {
                continue;
            }
            rels.add(Relationship {
                id: id.to_string(),
                rel_type: el.attr("Type").unwrap_or_default().to_string(),
                target: el.attr("Target").unwrap_or_default().to_string(),
                external: el
                    .attr("TargetMode")
                    .is_some_and(|mode| mode.eq_ignore_ascii_case("external")),
            });
        }
        rels
    }

    /// Get a relationship by ID.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.entries.iter().find(|rel| rel.id == id)
    }

    /// Get relationships by type, in document order.
    pub fn get_by_type(&self, rel_type: &str) -> Vec<&Relationship> {
        self.by_type
            .get(rel_type)
            .map(|positions| positions.iter().map(|&i| &self.entries[i]).collect())
            .unwrap_or_default()
    }

    /// Add a relationship.
    pub fn add(&mut self, rel: Relationship) {
        self.by_type
            .entry(rel.rel_type.clone())
            .or_default()
            .push(self.entries.len());
        self.entries.push(rel);
    }

    /// Number of relationships.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Path of the relationships part that belongs to `part_path`.
///
/// `xl/workbook.xml` → `xl/_rels/workbook.xml.rels`
pub fn rels_path_for(part_path: &str) -> String {
    match part_path.rsplit_once('/') {
        Some((dir, file)) => format!("{dir}/_rels/{file}.rels"),
        None if part_path.is_empty() => "_rels/.rels".to_string(),
        None => format!("_rels/{part_path}.rels"),
    }
}

const EMPTY_RELATIONSHIPS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"/>"#;

/// Get the relationships document of a part, creating an empty one if needed.
pub fn ensure_rels_document<'a>(package: &'a mut Package, part_path: &str) -> Result<&'a mut XmlTree> {
    let rels_path = rels_path_for(part_path);
    if !package.has_entry(&rels_path)? {
        package.put_entry(
            &rels_path,
            EMPTY_RELATIONSHIPS.as_bytes().to_vec(),
            RELATIONSHIPS_CONTENT_TYPE,
        );
    }
    package.fetch_tree(&rels_path)
}

/// Append a relationship from `owner_part` to `target_part` and return its id.
///
/// The target is stored relative to the owner's directory. The id is
/// `rId{count + 1}`, moved forward past any id already in use.
pub fn add_relationship(
    rels: &mut XmlTree,
    owner_part: &str,
    rel_type: &str,
    target_part: &str,
) -> Result<String> {
    let root = rels.root.get_or_insert_with(|| {
        Element::new("Relationships").with_attr("xmlns", NS_RELATIONSHIPS)
    });
    if root.local_name() != "Relationships" {
        return Err(Error::XmlParse(format!(
            "unexpected relationships root <{}>",
            root.name
        )));
    }

    let existing: HashSet<&str> = root
        .children_named("Relationship")
        .filter_map(|el| el.attr("Id"))
        .collect();
    let mut next = root.children_named("Relationship").count() + 1;
    while existing.contains(format!("rId{next}").as_str()) {
        next += 1;
    }
    let id = format!("rId{next}");

    let name = match root.prefix() {
        Some(prefix) => format!("{prefix}:Relationship"),
        None => "Relationship".to_string(),
    };
    root.push(
        Element::new(name)
            .with_attr("Id", id.as_str())
            .with_attr("Type", rel_type)
            .with_attr("Target", relative_target(owner_part, target_part)),
    );

    Ok(id)
}

/// Raw targets of all relationships of the given type, in document order.
pub fn related_targets(rels: &XmlTree, rel_type: &str) -> Vec<String> {
    Relationships::from_tree(rels)
        .get_by_type(rel_type)
        .into_iter()
        .filter(|rel| !rel.external)
        .map(|rel| rel.target.clone())
        .collect()
}

/// Resolve a relationship target against the part that owns the relationship.
pub fn resolve_target(owner_part: &str, target: &str) -> String {
    if let Some(stripped) = target.strip_prefix('/') {
        return stripped.to_string();
    }

    let base_dir = Path::new(owner_part).parent().unwrap_or(Path::new(""));

    let mut result = base_dir.to_path_buf();
    for component in Path::new(target).components() {
        match component {
            Component::ParentDir => {
                result.pop();
            }
            Component::Normal(c) => {
                result.push(c);
            }
            _ => {}
        }
    }

    result.to_string_lossy().replace('\\', "/")
}

/// Express `target_part` relative to the directory of `owner_part`.
pub fn relative_target(owner_part: &str, target_part: &str) -> String {
    let owner_dir: Vec<&str> = match owner_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').filter(|s| !s.is_empty()).collect(),
        None => Vec::new(),
    };
    let target: Vec<&str> = target_part
        .trim_start_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    let common = owner_dir
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = std::iter::repeat_n("..", owner_dir.len() - common).collect();
    parts.extend(&target[common..]);
    parts.join("/")
}
