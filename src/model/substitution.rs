//! Image substitutions queued by the placeholder scan.

use super::ImageFormat;
use md5::{Digest, Md5};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Image size in pixels, written as `WxH` in a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Parse `"200x300"`.
    pub fn parse(spec: &str) -> Option<Self> {
        let (width, height) = spec.trim().split_once(['x', 'X'])?;
        Some(Self {
            width: width.trim().parse().ok()?,
            height: height.trim().parse().ok()?,
        })
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for ImageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid image size: {s}"))
    }
}

/// An image placeholder that was matched with data and must be anchored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSubstitution {
    /// Index of the blanked shared-string item
    pub shared_string_index: usize,
    /// Data key the image came from
    pub data_key: String,
    /// Requested display size
    pub size: ImageSize,
    /// Package path of the media part (e.g. `xl/media/<md5>.jpeg`)
    pub media_path: String,
}

impl ImageSubstitution {
    /// Media part path derived from the MD5 of the data key.
    pub fn media_path_for(data_key: &str, format: ImageFormat) -> String {
        let digest = Md5::digest(data_key.as_bytes());
        format!("xl/media/{:x}.{}", digest, format.extension())
    }

    /// File name of the media part, used as the picture title.
    pub fn media_file_name(&self) -> &str {
        self.media_path
            .rsplit_once('/')
            .map_or(self.media_path.as_str(), |(_, name)| name)
    }
}
