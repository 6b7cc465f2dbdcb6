//! Template rendering.

use super::RenderOptions;
use crate::detect::{detect_spreadsheet_kind, is_zip_file};
use crate::error::{Error, Result};
use crate::model::TemplateData;
use crate::package::Package;
use crate::xlsx::{embed_images, inspect_shared_strings, scan_shared_strings, Placeholder};
use std::fs;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Fills spreadsheet templates with data.
///
/// Every render works on a private copy of the template, which is removed
/// when the render returns, whether it succeeded or not. The template file
/// itself is only ever read.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    /// Create a renderer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer with the given options.
    pub fn with_options(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Options in use.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render a template file and return the bytes of the filled workbook.
    ///
    /// Image values consumed by image placeholders are removed from `data`.
    ///
    /// # Errors
    ///
    /// - [`Error::Read`] if the template cannot be read or copied
    /// - [`Error::Format`] if it is not an OOXML package
    /// - [`Error::Write`] if the filled package cannot be written
    pub fn render(&self, template: impl AsRef<Path>, data: &mut TemplateData) -> Result<Vec<u8>> {
        let template = template.as_ref();
        let working = self.working_copy(template)?;
        debug!(template = %template.display(), working = %working.path().display(), "rendering");

        let mut package = Package::open(working.path())?;
        self.fill(&mut package, data)?;
        package.commit()?;

        let output = fs::read(working.path())
            .map_err(|e| Error::Read(format!("{}: {}", working.path().display(), e)))?;
        info!(template = %template.display(), size = output.len(), "template rendered");
        Ok(output)
    }

    /// Render a template held in memory.
    pub fn render_bytes(&self, template: Vec<u8>, data: &mut TemplateData) -> Result<Vec<u8>> {
        if !is_zip_file(&template) {
            return Err(Error::Format("template is not a ZIP archive".to_string()));
        }
        let mut package = Package::from_bytes(template)?;
        self.fill(&mut package, data)?;
        package.commit_to_vec()
    }

    /// Apply placeholders to an open package. Returns the number of images anchored.
    pub fn fill(&self, package: &mut Package, data: &mut TemplateData) -> Result<usize> {
        match detect_spreadsheet_kind(package) {
            Some(kind) => debug!(%kind, "package kind"),
            None => warn!("package has no SpreadsheetML workbook part"),
        }

        let substitutions = scan_shared_strings(package, data, &self.options)?;
        if substitutions.is_empty() {
            return Ok(0);
        }
        embed_images(package, &substitutions, &self.options)
    }

    /// List the placeholders a template contains.
    pub fn inspect(&self, template: impl AsRef<Path>) -> Result<Vec<Placeholder>> {
        let mut package = Package::open(template)?;
        inspect_shared_strings(&mut package)
    }

    fn working_copy(&self, template: &Path) -> Result<NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("xlfill_").suffix(".xlsx");
        let working = match &self.options.work_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|e| Error::Read(format!("cannot create working copy: {e}")))?;

        fs::copy(template, working.path())
            .map_err(|e| Error::Read(format!("{}: {}", template.display(), e)))?;
        Ok(working)
    }
}
