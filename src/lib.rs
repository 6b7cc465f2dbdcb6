//! # xlfill
//!
//! Fill XLSX templates with text and images.
//!
//! A template is an ordinary workbook whose cells hold placeholders:
//!
//! - `${NAME}` anywhere in a cell's text is replaced by a text value;
//! - a cell whose whole text is `${LOGO:200x300}` becomes a 200×300 pixel
//!   picture anchored at that cell, using image bytes supplied for `LOGO`.
//!
//! Placeholders without data are left as they are.
//!
//! ## Quick Start
//!
//! ```no_run
//! use xlfill::{render_file, TemplateData};
//!
//! let data = TemplateData::new()
//!     .text("CUSTOMER", "ACME Ltd")
//!     .text("TOTAL", "1 024.00")
//!     .image("LOGO", std::fs::read("logo.jpg")?);
//!
//! let xlsx = render_file("invoice-template.xlsx", data)?;
//! std::fs::write("invoice.xlsx", xlsx)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Lower-level APIs
//!
//! [`package::Package`] gives part-level access to any OOXML package, and
//! [`xlsx`] exposes the shared-string scan and the drawing engine separately.
//!
//! ## Features
//!
//! - `async`: [`render_file_async`] on Tokio's blocking pool

pub mod cell_ref;
pub mod detect;
pub mod error;
pub mod model;
pub mod package;
pub mod rels;
pub mod render;
pub mod xlsx;
pub mod xml;

// Re-exports
pub use cell_ref::CellAddress;
pub use detect::{detect_spreadsheet_kind, SpreadsheetKind};
pub use error::{Error, Result};
pub use model::{ImageFormat, ImageSize, ImageSubstitution, TemplateData, Value};
pub use render::{RenderOptions, Renderer};
pub use xlsx::{Placeholder, PlaceholderToken};

use std::path::Path;

/// Render a template file with default options.
///
/// # Example
///
/// ```no_run
/// use xlfill::{render_file, TemplateData};
///
/// let xlsx = render_file("letter.xlsx", TemplateData::new().text("NAME", "Ann"))?;
/// # Ok::<(), xlfill::Error>(())
/// ```
pub fn render_file(template: impl AsRef<Path>, mut data: TemplateData) -> Result<Vec<u8>> {
    Renderer::new().render(template, &mut data)
}

/// Render a template file with options.
pub fn render_file_with_options(
    template: impl AsRef<Path>,
    mut data: TemplateData,
    options: &RenderOptions,
) -> Result<Vec<u8>> {
    Renderer::with_options(options.clone()).render(template, &mut data)
}

/// Render a template held in memory.
///
/// # Example
///
/// ```no_run
/// use xlfill::{render_bytes, TemplateData};
///
/// let template = std::fs::read("letter.xlsx")?;
/// let xlsx = render_bytes(template, TemplateData::new().text("NAME", "Ann"))?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn render_bytes(template: Vec<u8>, mut data: TemplateData) -> Result<Vec<u8>> {
    Renderer::new().render_bytes(template, &mut data)
}

/// List the placeholders in a template without changing it.
pub fn inspect_template(template: impl AsRef<Path>) -> Result<Vec<Placeholder>> {
    Renderer::new().inspect(template)
}

/// Render a template file on Tokio's blocking thread pool.
#[cfg(feature = "async")]
pub async fn render_file_async(
    template: impl AsRef<Path>,
    data: TemplateData,
    options: RenderOptions,
) -> Result<Vec<u8>> {
    let template = template.as_ref().to_path_buf();
    tokio::task::spawn_blocking(move || {
        let mut data = data;
        Renderer::with_options(options).render(&template, &mut data)
    })
    .await
    .map_err(|e| Error::Io(std::io::Error::other(e.to_string())))?
}
