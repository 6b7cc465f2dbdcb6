//! Rendering options configuration.

use crate::model::ImageFormat;
use std::path::PathBuf;

/// Default pixel density used to convert image sizes to EMUs.
pub const DEFAULT_PIXELS_PER_INCH: u32 = 72;

/// Options for rendering templates.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Directory for the private working copy (None = system temp dir)
    pub work_dir: Option<PathBuf>,

    /// Declared media type for embedded images
    pub image_format: ImageFormat,

    /// Sniff each image's format from its bytes, falling back to `image_format`
    pub detect_image_format: bool,

    /// Pixel density for the pixel to EMU conversion
    pub pixels_per_inch: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            work_dir: None,
            image_format: ImageFormat::Jpeg,
            detect_image_format: false,
            pixels_per_inch: DEFAULT_PIXELS_PER_INCH,
        }
    }
}

impl RenderOptions {
    /// Create new render options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the directory for the working copy.
    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    /// Set the declared image format.
    pub fn with_image_format(mut self, format: ImageFormat) -> Self {
        self.image_format = format;
        self
    }

    /// Enable image format sniffing.
    pub fn with_detect_image_format(mut self, detect: bool) -> Self {
        self.detect_image_format = detect;
        self
    }

    /// Set pixel density (at least 1).
    pub fn with_pixels_per_inch(mut self, ppi: u32) -> Self {
        self.pixels_per_inch = ppi.max(1);
        self
    }

    /// Format to declare for a particular image.
    pub fn media_format(&self, data: &[u8]) -> ImageFormat {
        if self.detect_image_format {
            ImageFormat::from_magic(data).unwrap_or(self.image_format)
        } else {
            self.image_format
        }
    }

    /// Convert pixels to English Metric Units.
    pub fn pixels_to_emu(&self, pixels: u32) -> u64 {
        u64::from(pixels) * 914_400 / u64::from(self.pixels_per_inch.max(1))
    }
}
