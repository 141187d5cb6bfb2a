//! In-memory image files.

use crate::error::{ErrorContext, Result};
use std::path::Path;
use std::sync::Arc;

/// An in-memory file: bytes, MIME type and a display name.
///
/// Immutable. Compression produces a new asset and never touches the
/// original; clones share the underlying buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    name: String,
    mime_type: String,
    data: Arc<[u8]>,
}

impl ImageAsset {
    /// Wrap raw bytes.
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        data: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Read a file from disk, guessing its MIME type from the extension.
    ///
    /// Unknown extensions get `application/octet-stream`, which
    /// [`should_compress`](super::should_compress) never accepts.
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("reading image {}", path.display()))?;
        let mime_type = image::ImageFormat::from_path(path)
            .map(|f| f.to_mime_type())
            .unwrap_or("application/octet-stream");
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self::new(name, mime_type, data))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Whether the MIME type says this is an image.
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// Pixel dimensions read from the image header, if it can be parsed.
    #[must_use]
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        image::ImageReader::new(std::io::Cursor::new(self.data()))
            .with_guessed_format()
            .ok()?
            .into_dimensions()
            .ok()
    }

    pub(crate) fn shared_data(&self) -> Arc<[u8]> {
        Arc::clone(&self.data)
    }

    /// Whether two assets share the same buffer.
    #[must_use]
    pub fn shares_buffer_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Write the bytes to `path`.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.data())
            .with_context(|| format!("writing image {}", path.display()))
    }
}

/// Replace (or add) the file extension of a display name.
pub(crate) fn rename_extension(name: &str, extension: &str) -> String {
    let stem = match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    };
    format!("{stem}.{extension}")
}
