//! Data model shared by the scanner, the embedding engine, and callers.
//!
//! [`TemplateData`] is what callers hand in; [`ImageSubstitution`] is what
//! the shared-string scan hands to the drawing engine.

mod data;
mod image;
mod substitution;

pub use data::*;
pub use image::*;
pub use substitution::*;
