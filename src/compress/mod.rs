//! Client-side photo compression.
//!
//! Oversized photos are decoded, downscaled into a bounding box and
//! re-encoded at decreasing quality until they fit a byte budget or the
//! attempt cap is hit. The output is not guaranteed to fit; the guarantee is
//! at most [`MAX_ENCODE_ATTEMPTS`] encodes with strictly decreasing quality.
//!
//! Compression must never block an upload: every decode or encode failure
//! is logged and the original asset is handed back unchanged.
//!
//! Decoding and each encode run on tokio's blocking pool, so these
//! functions must be awaited inside a tokio runtime. Every one of those
//! suspension points is raced against the caller's [`CancellationToken`]
//! in [`compress_image_cancellable`].

mod asset;
mod options;

pub use asset::ImageAsset;
pub use options::{
    next_quality, CompressOptions, OutputFormat, DEFAULT_MAX_DIMENSION, DEFAULT_MAX_SIZE_BYTES,
    DEFAULT_QUALITY, MAX_ENCODE_ATTEMPTS, MIN_QUALITY, QUALITY_STEP,
};

use crate::error::{CompressionErrorKind, MilkrateError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use std::io::Cursor;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Returned when a compression run is cancelled before it finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("image compression was cancelled")]
pub struct Cancelled;

/// How a compression run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionOutcome {
    /// Already within budget; the original was returned without re-encoding
    Unchanged,
    /// Re-encoded; the result may still exceed the budget
    Compressed,
    /// Decode or encode failed; the original was returned
    Fallback,
}

/// One encoder pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodeAttempt {
    pub quality: f32,
    pub size: usize,
}

/// Result of a compression run, with the per-attempt trail.
#[derive(Debug, Clone)]
#[must_use]
pub struct CompressionReport {
    /// The asset to upload
    pub asset: ImageAsset,
    pub outcome: CompressionOutcome,
    /// Size of the input in bytes
    pub original_size: usize,
    /// Every encode, in order
    pub attempts: Vec<EncodeAttempt>,
}

impl CompressionReport {
    fn untouched(asset: ImageAsset, outcome: CompressionOutcome) -> Self {
        Self {
            original_size: asset.size(),
            asset,
            outcome,
            attempts: Vec::new(),
        }
    }

    /// Whether the returned asset fits `max_size_bytes`.
    #[must_use]
    pub fn within_budget(&self, max_size_bytes: usize) -> bool {
        self.asset.size() <= max_size_bytes
    }
}

/// Whether `asset` is an image larger than `max_bytes`.
#[must_use]
pub fn should_compress(asset: &ImageAsset, max_bytes: usize) -> bool {
    asset.is_image() && asset.size() > max_bytes
}

/// Uniformly scale `width` x `height` down to fit the bounding box.
///
/// Never scales up. Aspect ratio is preserved up to rounding and neither
/// side drops below one pixel.
#[must_use]
pub fn target_dimensions(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width <= max_width && height <= max_height {
        return (width, height);
    }

    let scale = (f64::from(max_width) / f64::from(width))
        .min(f64::from(max_height) / f64::from(height));
    let scaled = |side: u32, max: u32| -> u32 {
        ((f64::from(side) * scale).round() as u32).clamp(1, max.max(1))
    };

    (scaled(width, max_width), scaled(height, max_height))
}

/// Compress `asset` to fit `options`, falling back to the original on error.
pub async fn compress_image(asset: ImageAsset, options: &CompressOptions) -> ImageAsset {
    let original = asset.clone();
    compress_image_cancellable(asset, options, &CancellationToken::new())
        .await
        .map_or(original, |report| report.asset)
}

/// Compress `asset`, giving up as soon as `cancel` fires.
///
/// A cancelled run yields `Err(Cancelled)` and no asset, so a caller that
/// has moved on cannot receive a stale result. Any other failure still
/// resolves to `Ok` with [`CompressionOutcome::Fallback`].
pub async fn compress_image_cancellable(
    asset: ImageAsset,
    options: &CompressOptions,
    cancel: &CancellationToken,
) -> std::result::Result<CompressionReport, Cancelled> {
    if asset.size() <= options.max_size_bytes {
        return Ok(CompressionReport::untouched(
            asset,
            CompressionOutcome::Unchanged,
        ));
    }

    match run(&asset, options, cancel).await {
        Ok((compressed, attempts)) => {
            tracing::debug!(
                name = asset.name(),
                from = asset.size(),
                to = compressed.size(),
                attempts = attempts.len(),
                "image compressed"
            );
            Ok(CompressionReport {
                original_size: asset.size(),
                asset: compressed,
                outcome: CompressionOutcome::Compressed,
                attempts,
            })
        }
        Err(Interrupted::Cancelled) => {
            tracing::debug!(name = asset.name(), "image compression cancelled");
            Err(Cancelled)
        }
        Err(Interrupted::Failed(err)) => {
            tracing::warn!(
                name = asset.name(),
                error = %err,
                "image compression failed; keeping original"
            );
            Ok(CompressionReport::untouched(
                asset,
                CompressionOutcome::Fallback,
            ))
        }
    }
}

/// Compress with default options, reporting coarse progress.
///
/// Calls `on_progress(10)` before and `on_progress(100)` after the run.
/// An asset that does not need compression is returned as-is and the
/// callback is never invoked.
pub async fn progressive_compress(
    asset: ImageAsset,
    mut on_progress: Option<&mut (dyn FnMut(u8) + Send)>,
) -> ImageAsset {
    if !should_compress(&asset, DEFAULT_MAX_SIZE_BYTES) {
        return asset;
    }

    if let Some(report) = on_progress.as_deref_mut() {
        report(10);
    }
    let compressed = compress_image(asset, &CompressOptions::default()).await;
    if let Some(report) = on_progress.as_deref_mut() {
        report(100);
    }
    compressed
}

// ============================================================================
// Pipeline
// ============================================================================

enum Interrupted {
    Cancelled,
    Failed(MilkrateError),
}

async fn run(
    asset: &ImageAsset,
    options: &CompressOptions,
    cancel: &CancellationToken,
) -> std::result::Result<(ImageAsset, Vec<EncodeAttempt>), Interrupted> {
    let data = asset.shared_data();
    let (max_width, max_height) = (options.max_width, options.max_height);
    let image = run_blocking(cancel, move || decode_and_scale(&data, max_width, max_height)).await?;
    let image = Arc::new(image);

    let format = options.format;
    let mut quality = options.quality.clamp(MIN_QUALITY, 1.0);
    let mut attempts = Vec::with_capacity(MAX_ENCODE_ATTEMPTS);

    let encoded = loop {
        let source = Arc::clone(&image);
        let encoded = run_blocking(cancel, move || encode(&source, format, quality)).await?;
        attempts.push(EncodeAttempt {
            quality,
            size: encoded.len(),
        });
        tracing::debug!(attempt = attempts.len(), quality, size = encoded.len(), "encoded");

        if encoded.len() <= options.max_size_bytes
            || attempts.len() >= MAX_ENCODE_ATTEMPTS
            || !format.is_lossy()
        {
            break encoded;
        }
        match next_quality(quality) {
            Some(next) => quality = next,
            None => break encoded,
        }
    };

    let name = asset::rename_extension(asset.name(), format.extension());
    Ok((ImageAsset::new(name, format.mime_type(), encoded), attempts))
}

/// Run CPU-bound work on the blocking pool, racing it against `cancel`.
async fn run_blocking<T, F>(
    cancel: &CancellationToken,
    work: F,
) -> std::result::Result<T, Interrupted>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let task = tokio::task::spawn_blocking(work);
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(Interrupted::Cancelled),
        joined = task => match joined {
            Ok(result) => result.map_err(Interrupted::Failed),
            Err(err) => Err(Interrupted::Failed(MilkrateError::compression(
                "blocking task",
                CompressionErrorKind::Task(err.to_string()),
            ))),
        },
    }
}

fn decode_and_scale(data: &[u8], max_width: u32, max_height: u32) -> Result<DynamicImage> {
    let image = image::load_from_memory(data).map_err(|e| {
        MilkrateError::compression("decoding input", CompressionErrorKind::Decode(e.to_string()))
    })?;

    let (width, height) = (image.width(), image.height());
    let (target_width, target_height) = target_dimensions(width, height, max_width, max_height);
    if (target_width, target_height) == (width, height) {
        return Ok(image);
    }

    tracing::debug!(width, height, target_width, target_height, "downscaling");
    Ok(image.resize_exact(target_width, target_height, FilterType::Triangle))
}

fn encode(image: &DynamicImage, format: OutputFormat, quality: f32) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let encoded = match format {
        OutputFormat::Jpeg => {
            // JPEG has no alpha channel.
            let rgb = image.to_rgb8();
            JpegEncoder::new_with_quality(&mut buf, jpeg_quality(quality)).encode_image(&rgb)
        }
        OutputFormat::WebP => DynamicImage::ImageRgba8(image.to_rgba8())
            .write_to(&mut Cursor::new(&mut buf), format.image_format()),
        OutputFormat::Png => image.write_to(&mut Cursor::new(&mut buf), format.image_format()),
    };

    encoded.map_err(|e| {
        MilkrateError::compression(
            format!("encoding {format}"),
            CompressionErrorKind::Encode(e.to_string()),
        )
    })?;
    Ok(buf)
}

fn jpeg_quality(quality: f32) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}
