//! Template rendering.
//!
//! # Example
//!
//! ```no_run
//! use xlfill::render::{RenderOptions, Renderer};
//! use xlfill::TemplateData;
//!
//! let renderer = Renderer::with_options(RenderOptions::new().with_pixels_per_inch(96));
//! let mut data = TemplateData::new()
//!     .text("CUSTOMER", "ACME Ltd")
//!     .image("LOGO", std::fs::read("logo.jpg")?);
//!
//! let xlsx = renderer.render("invoice.xlsx", &mut data)?;
//! std::fs::write("invoice-acme.xlsx", xlsx)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod options;
mod renderer;

pub use options::{RenderOptions, DEFAULT_PIXELS_PER_INCH};
pub use renderer::Renderer;
