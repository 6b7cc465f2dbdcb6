//! ZIP package store for OOXML documents.
//!
//! [`Package`] owns the archive bytes and hands out parts lazily, either as
//! raw bytes or as a parsed [`XmlTree`]. Every part touched for mutation is
//! tracked as dirty; [`Package::commit`] rewrites only those parts, keeps the
//! `[Content_Types].xml` overrides in step with them, and copies every other
//! entry across unchanged.

use crate::error::{Error, Result};
use crate::xml::{Element, Node, XmlTree};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Cursor, Read, Seek, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Name of the content-type manifest entry.
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Content of a part as seen by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartContent {
    /// Unparsed bytes (as read from the archive or supplied by a caller)
    Raw(Vec<u8>),
    /// Parsed XML tree, serialized again at commit
    Parsed(XmlTree),
    /// No content; the entry is removed at commit
    Absent,
}

impl PartContent {
    /// Resolve to bytes. Absent and empty content both resolve to no bytes.
    fn resolve(&self) -> Result<Vec<u8>> {
        match self {
            PartContent::Raw(bytes) => Ok(bytes.clone()),
            PartContent::Parsed(tree) => tree.to_bytes(),
            PartContent::Absent => Ok(Vec::new()),
        }
    }

    /// Materialize as a tree. Absent or empty content becomes an empty tree
    /// that callers can populate.
    fn tree_mut(&mut self) -> Result<&mut XmlTree> {
        let materialized = match self {
            PartContent::Parsed(_) => None,
            PartContent::Raw(bytes) if !bytes.is_empty() => Some(XmlTree::parse(bytes)?),
            PartContent::Raw(_) | PartContent::Absent => Some(XmlTree::default()),
        };
        if let Some(tree) = materialized {
            *self = PartContent::Parsed(tree);
        }
        match self {
            PartContent::Parsed(tree) => Ok(tree),
            PartContent::Raw(_) | PartContent::Absent => Err(Error::XmlParse(
                "part content could not be materialized".to_string(),
            )),
        }
    }
}

#[derive(Debug)]
struct Part {
    content: PartContent,
    /// Content type recorded at first fetch or at `put_entry`
    content_type: Option<String>,
    dirty: bool,
}

/// Override entries of `[Content_Types].xml`, keyed by part name.
#[derive(Debug, Clone)]
pub struct ContentTypes {
    tree: XmlTree,
}

impl ContentTypes {
    /// Parse a content-type manifest.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let tree = XmlTree::parse(bytes)?;
        match &tree.root {
            Some(root) if root.local_name() == "Types" => Ok(Self { tree }),
            Some(root) => Err(Error::Format(format!(
                "unexpected content-type manifest root <{}>",
                root.name
            ))),
            None => Err(Error::Format("empty content-type manifest".to_string())),
        }
    }

    fn part_name(path: &str) -> String {
        format!("/{}", path.trim_start_matches('/'))
    }

    fn overrides(&self) -> impl Iterator<Item = &Element> {
        self.tree
            .root
            .iter()
            .flat_map(|root| root.children_named("Override"))
    }

    /// Content type declared by an Override for the given part.
    pub fn get(&self, path: &str) -> Option<&str> {
        let part_name = Self::part_name(path);
        self.overrides()
            .find(|el| el.attr("PartName") == Some(part_name.as_str()))
            .and_then(|el| el.attr("ContentType"))
    }

    /// Add an Override for the given part.
    pub fn set_override(&mut self, path: &str, content_type: &str) {
        let part_name = Self::part_name(path);
        if let Some(root) = self.tree.root.as_mut() {
            let name = match root.prefix() {
                Some(prefix) => format!("{prefix}:Override"),
                None => "Override".to_string(),
            };
            root.push(
                Element::new(name)
                    .with_attr("PartName", part_name)
                    .with_attr("ContentType", content_type),
            );
        }
    }

    /// Remove any Override for the given part.
    pub fn remove_override(&mut self, path: &str) {
        let part_name = Self::part_name(path);
        if let Some(root) = self.tree.root.as_mut() {
            root.children.retain(|node| match node {
                Node::Element(el) => {
                    !(el.local_name() == "Override"
                        && el.attr("PartName") == Some(part_name.as_str()))
                }
                _ => true,
            });
        }
    }

    /// Serialize the manifest.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.tree.to_bytes()
    }
}

/// OOXML package over a ZIP archive with lazily materialized, dirty-tracked parts.
pub struct Package {
    /// File the package was opened from; `commit` writes back here
    path: Option<PathBuf>,
    archive: ZipArchive<Cursor<Vec<u8>>>,
    parts: BTreeMap<String, Part>,
    content_types: ContentTypes,
}

impl Package {
    /// Open a package from a file path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use xlfill::package::Package;
    ///
    /// let mut package = Package::open("template.xlsx")?;
    /// assert!(package.has_entry("xl/workbook.xml")?);
    /// # Ok::<(), xlfill::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path)
            .map_err(|e| Error::Read(format!("{}: {}", path.display(), e)))?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)
            .map_err(|e| Error::Read(format!("{}: {}", path.display(), e)))?;

        let mut package = Self::from_bytes(data)?;
        package.path = Some(path.to_path_buf());
        Ok(package)
    }

    /// Create a package from archive bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(data))
            .map_err(|e| Error::Format(format!("not a ZIP archive: {e}")))?;

        let manifest = match read_entry(&mut archive, CONTENT_TYPES_PART)? {
            Some(bytes) if !bytes.is_empty() => bytes,
            _ => {
                return Err(Error::Format(format!(
                    "missing {CONTENT_TYPES_PART}, not an OOXML package"
                )))
            }
        };
        let content_types = ContentTypes::parse(&manifest).map_err(|e| match e {
            Error::XmlParse(msg) => Error::Format(format!("{CONTENT_TYPES_PART}: {msg}")),
            other => other,
        })?;

        Ok(Self {
            path: None,
            archive,
            parts: BTreeMap::new(),
            content_types,
        })
    }

    /// Load a part into the cache without marking it dirty.
    fn load(&mut self, path: &str) -> Result<&mut Part> {
        match self.parts.entry(path.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let content = match read_entry(&mut self.archive, path)? {
                    Some(bytes) => PartContent::Raw(bytes),
                    None => PartContent::Absent,
                };
                let content_type = self.content_types.get(path).map(String::from);
                Ok(entry.insert(Part {
                    content,
                    content_type,
                    dirty: false,
                }))
            }
        }
    }

    /// Fetch a part as a mutable tree, marking it dirty.
    ///
    /// A missing or empty part yields an empty tree so callers can populate it.
    pub fn fetch_tree(&mut self, path: &str) -> Result<&mut XmlTree> {
        let part = self.load(path)?;
        part.dirty = true;
        part.content.tree_mut()
    }

    /// Fetch a part as a tree for reading only; the part is not marked dirty.
    pub fn read_tree(&mut self, path: &str) -> Result<&XmlTree> {
        let part = self.load(path)?;
        part.content.tree_mut().map(|tree| &*tree)
    }

    /// Fetch a part's bytes, serializing its tree if it has been parsed.
    ///
    /// Returns `None` when the part does not exist.
    pub fn fetch_bytes(&mut self, path: &str) -> Result<Option<Vec<u8>>> {
        let part = self.load(path)?;
        match &part.content {
            PartContent::Absent => Ok(None),
            content => content.resolve().map(Some),
        }
    }

    /// Check whether a part resolves to non-empty content.
    pub fn has_entry(&mut self, path: &str) -> Result<bool> {
        Ok(self
            .fetch_bytes(path)?
            .is_some_and(|bytes| !bytes.is_empty()))
    }

    /// Register or replace a part's raw content and declared content type.
    pub fn put_entry(&mut self, path: &str, data: Vec<u8>, content_type: &str) {
        debug!(part = path, content_type, size = data.len(), "put entry");
        self.parts.insert(
            path.to_string(),
            Part {
                content: PartContent::Raw(data),
                content_type: Some(content_type.to_string()),
                dirty: true,
            },
        );
    }

    /// Mark a part as deleted; it is removed from the archive at commit.
    pub fn delete_entry(&mut self, path: &str) -> Result<()> {
        let part = self.load(path)?;
        part.content = PartContent::Absent;
        part.dirty = true;
        Ok(())
    }

    /// Content type of a part: the one recorded for it this session, else its Override.
    pub fn content_type(&self, path: &str) -> Option<&str> {
        self.parts
            .get(path)
            .and_then(|part| part.content_type.as_deref())
            .or_else(|| self.content_types.get(path))
    }

    /// Names of all parts that currently exist, in archive order followed by new parts.
    pub fn part_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .archive
            .file_names()
            .filter(|name| !name.ends_with('/'))
            .filter(|name| {
                !matches!(
                    self.parts.get(*name).map(|p| &p.content),
                    Some(PartContent::Absent)
                )
            })
            .map(String::from)
            .collect();
        names.sort_by_key(|name| self.archive.index_for_name(name));

        for (name, part) in &self.parts {
            let exists = !matches!(part.content, PartContent::Absent);
            if exists && self.archive.index_for_name(name).is_none() {
                names.push(name.clone());
            }
        }
        names
    }

    /// Commit all pending changes back to the file the package was opened from.
    pub fn commit(self) -> Result<()> {
        let path = self.path.clone().ok_or_else(|| {
            Error::Write("package was not opened from a file".to_string())
        })?;
        let file = File::create(&path)
            .map_err(|e| Error::Write(format!("{}: {}", path.display(), e)))?;
        let mut writer = self.commit_to(BufWriter::new(file))?;
        writer
            .flush()
            .map_err(|e| Error::Write(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "package committed");
        Ok(())
    }

    /// Commit all pending changes into a new in-memory archive.
    pub fn commit_to_vec(self) -> Result<Vec<u8>> {
        let cursor = self.commit_to(Cursor::new(Vec::new()))?;
        Ok(cursor.into_inner())
    }

    /// Write the committed package to any seekable writer.
    pub fn commit_to<W: Write + Seek>(mut self, writer: W) -> Result<W> {
        // Resolve dirty parts first so the manifest reflects the final state.
        let mut pending: BTreeMap<String, Option<Vec<u8>>> = BTreeMap::new();
        for (name, part) in &self.parts {
            if !part.dirty || name == CONTENT_TYPES_PART {
                continue;
            }
            let bytes = part.content.resolve().map_err(write_error)?;
            if bytes.is_empty() {
                debug!(part = %name, "removing empty part");
                self.content_types.remove_override(name);
                pending.insert(name.clone(), None);
            } else {
                if self.content_types.get(name).is_none() {
                    if let Some(content_type) =
                        part.content_type.as_deref().filter(|ct| !ct.is_empty())
                    {
                        self.content_types.set_override(name, content_type);
                    }
                }
                pending.insert(name.clone(), Some(bytes));
            }
        }
        let manifest = self.content_types.to_bytes().map_err(write_error)?;

        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut zip = ZipWriter::new(writer);

        for index in 0..self.archive.len() {
            let file = self.archive.by_index_raw(index).map_err(write_error)?;
            let name = file.name().to_string();

            if name == CONTENT_TYPES_PART {
                drop(file);
                write_file(&mut zip, &name, &manifest, options)?;
                continue;
            }

            match pending.remove(&name) {
                Some(Some(bytes)) => {
                    drop(file);
                    write_file(&mut zip, &name, &bytes, options)?;
                }
                Some(None) => {}
                None => zip.raw_copy_file(file).map_err(write_error)?,
            }
        }

        for (name, bytes) in pending {
            if let Some(bytes) = bytes {
                write_file(&mut zip, &name, &bytes, options)?;
            }
        }

        zip.finish().map_err(write_error)
    }
}

impl std::fmt::Debug for Package {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Package")
            .field("path", &self.path)
            .field("entries", &self.archive.len())
            .field("touched", &self.parts.len())
            .finish()
    }
}

fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<Option<Vec<u8>>> {
    let mut file = match archive.by_name(path) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut data = Vec::new();
    file.read_to_end(&mut data)
        .map_err(|e| Error::Format(format!("{path}: {e}")))?;
    Ok(Some(data))
}

fn write_file<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    name: &str,
    data: &[u8],
    options: SimpleFileOptions,
) -> Result<()> {
    zip.start_file(name, options).map_err(write_error)?;
    zip.write_all(data).map_err(write_error)
}

fn write_error(err: impl std::fmt::Display) -> Error {
    Error::Write(err.to_string())
}
