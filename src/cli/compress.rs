//! Compress command handler.

use crate::compress::{compress_image_cancellable, CompressOptions, CompressionOutcome, ImageAsset};
use crate::pipeline::exit_codes;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

/// Compress one image file, writing the result next to it or to `output`.
///
/// Images already within budget are left alone and nothing is written.
/// Ctrl+C cancels the run without producing output.
pub fn run_compress(
    image: &Path,
    output: Option<PathBuf>,
    options: &CompressOptions,
    quiet: bool,
) -> Result<i32> {
    let asset = ImageAsset::from_path(image)
        .with_context(|| format!("Failed to read image: {}", image.display()))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let cancel = CancellationToken::new();
    let report = runtime.block_on(async {
        let on_ctrl_c = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Received Ctrl+C, cancelling");
                on_ctrl_c.cancel();
            }
        });
        compress_image_cancellable(asset, options, &cancel).await
    });

    let Ok(report) = report else {
        tracing::warn!("Compression cancelled; nothing written");
        return Ok(exit_codes::ERROR);
    };

    match report.outcome {
        CompressionOutcome::Unchanged => {
            if !quiet {
                tracing::info!(
                    "{} is {} bytes, within the {} byte budget; nothing to do",
                    image.display(),
                    report.original_size,
                    options.max_size_bytes
                );
            }
            Ok(exit_codes::SUCCESS)
        }
        CompressionOutcome::Fallback => {
            tracing::warn!("Could not compress {}; original left as is", image.display());
            Ok(exit_codes::ERROR)
        }
        CompressionOutcome::Compressed => {
            let target = output.unwrap_or_else(|| default_output_path(image, report.asset.name()));
            report.asset.write_to(&target)?;

            if !quiet {
                let last_quality = report.attempts.last().map_or(0.0, |a| a.quality);
                tracing::info!(
                    "{} -> {}: {} -> {} bytes in {} attempt(s), final quality {:.2}",
                    image.display(),
                    target.display(),
                    report.original_size,
                    report.asset.size(),
                    report.attempts.len(),
                    last_quality
                );
            }
            if !report.within_budget(options.max_size_bytes) {
                tracing::warn!(
                    "Output is still over the {} byte budget",
                    options.max_size_bytes
                );
            }
            Ok(exit_codes::SUCCESS)
        }
    }
}

/// Sibling of `input` named `name`, prefixed when it would overwrite `input`.
fn default_output_path(input: &Path, name: &str) -> PathBuf {
    let dir = input.parent().unwrap_or_else(|| Path::new(""));
    let candidate = dir.join(name);
    if candidate == input {
        dir.join(format!("compressed-{name}"))
    } else {
        candidate
    }
}
