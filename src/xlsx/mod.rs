//! SpreadsheetML template processing.
//!
//! The shared string table is scanned first ([`scan_shared_strings`]): text
//! placeholders are substituted in place and image placeholders are blanked
//! and queued. The queue is then handed to [`embed_images`], which anchors
//! each image in the drawing of every worksheet that shows it.
//!
//! # Example
//!
//! ```no_run
//! use xlfill::package::Package;
//! use xlfill::render::RenderOptions;
//! use xlfill::xlsx::{embed_images, scan_shared_strings};
//! use xlfill::TemplateData;
//!
//! let mut package = Package::open("report.xlsx")?;
//! let mut data = TemplateData::new().text("TITLE", "Q3 report");
//! let options = RenderOptions::default();
//!
//! let images = scan_shared_strings(&mut package, &mut data, &options)?;
//! embed_images(&mut package, &images, &options)?;
//! package.commit()?;
//! # Ok::<(), xlfill::Error>(())
//! ```

mod drawing;
mod placeholder;
mod shared_strings;

pub use drawing::{
    embed_images, worksheet_parts, DRAWING_CONTENT_TYPE, NS_DRAWINGML, NS_OFFICE_RELATIONSHIPS,
    NS_SPREADSHEET_DRAWING,
};
pub use placeholder::{
    classify, strip_tags, substitute_text, text_placeholder_names, Classification,
    ImagePlaceholder, PlaceholderToken,
};
pub use shared_strings::{
    inspect_shared_strings, scan_shared_strings, Placeholder, SHARED_STRINGS_PART,
};
