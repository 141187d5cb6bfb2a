//! Compression options.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upload budget used by the app: 2 MiB.
pub const DEFAULT_MAX_SIZE_BYTES: usize = 2 * 1024 * 1024;
/// Longest edge allowed before downscaling.
pub const DEFAULT_MAX_DIMENSION: u32 = 1920;
/// First-attempt encoder quality.
pub const DEFAULT_QUALITY: f32 = 0.8;
/// Hard cap on encode attempts per image.
pub const MAX_ENCODE_ATTEMPTS: usize = 5;
/// Quality drop between attempts.
pub const QUALITY_STEP: f32 = 0.15;
/// Quality never goes below this.
pub const MIN_QUALITY: f32 = 0.1;

/// Re-encode target format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
    WebP,
}

impl OutputFormat {
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
        }
    }

    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::WebP => "webp",
        }
    }

    /// Whether the encoder honours a quality setting.
    ///
    /// The PNG and WebP encoders are lossless, so retrying them at a lower
    /// quality cannot shrink the output.
    #[must_use]
    pub const fn is_lossy(self) -> bool {
        matches!(self, Self::Jpeg)
    }

    pub(crate) const fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Png => image::ImageFormat::Png,
            Self::WebP => image::ImageFormat::WebP,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::WebP),
            other => Err(format!("unknown output format '{other}' (expected jpeg, png, webp)")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::WebP => "webp",
        })
    }
}

/// Knobs for [`compress_image`](super::compress_image).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CompressOptions {
    /// Maximum output width in pixels
    pub max_width: u32,
    /// Maximum output height in pixels
    pub max_height: u32,
    /// First-attempt quality (0.0 - 1.0)
    pub quality: f32,
    /// Byte budget the encoder aims for
    pub max_size_bytes: usize,
    /// Output format
    pub format: OutputFormat,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_DIMENSION,
            max_height: DEFAULT_MAX_DIMENSION,
            quality: DEFAULT_QUALITY,
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            format: OutputFormat::Jpeg,
        }
    }
}

impl CompressOptions {
    /// Set the bounding box.
    #[must_use]
    pub const fn with_max_dimensions(mut self, max_width: u32, max_height: u32) -> Self {
        self.max_width = max_width;
        self.max_height = max_height;
        self
    }

    /// Set the byte budget.
    #[must_use]
    pub const fn with_max_size_bytes(mut self, max_size_bytes: usize) -> Self {
        self.max_size_bytes = max_size_bytes;
        self
    }

    /// Set the first-attempt quality.
    #[must_use]
    pub const fn with_quality(mut self, quality: f32) -> Self {
        self.quality = quality;
        self
    }

    /// Set the output format.
    #[must_use]
    pub const fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }
}

/// Quality for the attempt after one encoded at `quality`.
///
/// Returns `None` once the floor has been reached, since another attempt
/// would encode at the same quality.
#[must_use]
pub fn next_quality(quality: f32) -> Option<f32> {
    let next = (quality - QUALITY_STEP).max(MIN_QUALITY);
    (next < quality).then_some(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = CompressOptions::default();
        assert_eq!(options.max_width, 1920);
        assert_eq!(options.max_height, 1920);
        assert_eq!(options.quality, 0.8);
        assert_eq!(options.max_size_bytes, 2 * 1024 * 1024);
        assert_eq!(options.format, OutputFormat::Jpeg);
    }

    #[test]
    fn test_quality_schedule() {
        let mut schedule = vec![DEFAULT_QUALITY];
        while let Some(next) = next_quality(*schedule.last().unwrap()) {
            schedule.push(next);
        }
        // 0.8, 0.65, 0.5, 0.35, 0.2, 0.1
        assert_eq!(schedule.len(), 6);
        assert!(schedule.windows(2).all(|w| w[1] < w[0]));
        assert_eq!(*schedule.last().unwrap(), MIN_QUALITY);
    }

    #[test]
    fn test_next_quality_floor() {
        assert_eq!(next_quality(0.2), Some(MIN_QUALITY));
        assert_eq!(next_quality(MIN_QUALITY), None);
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("JPG".parse::<OutputFormat>(), Ok(OutputFormat::Jpeg));
        assert_eq!("webp".parse::<OutputFormat>(), Ok(OutputFormat::WebP));
        assert!("gif".parse::<OutputFormat>().is_err());
    }
}
