//! Integration tests for image compression.

#![cfg(feature = "compression")]

use image::{DynamicImage, ImageBuffer, Rgb};
use milkrate::compress::{
    compress_image, compress_image_cancellable, progressive_compress, should_compress,
    CompressOptions, CompressionOutcome, ImageAsset, OutputFormat, DEFAULT_MAX_SIZE_BYTES,
};
use std::io::Cursor;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// PNG of hashed per-pixel noise; close to incompressible.
fn noise_png(width: u32, height: u32) -> Vec<u8> {
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        let mut h = x.wrapping_mul(0x9E37_79B1) ^ y.wrapping_mul(0x85EB_CA77);
        let mut channel = || {
            h ^= h >> 13;
            h = h.wrapping_mul(0x5BD1_E995);
            h ^= h >> 15;
            (h & 0xFF) as u8
        };
        Rgb([channel(), channel(), channel()])
    });
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn photo(width: u32, height: u32) -> ImageAsset {
    ImageAsset::new("IMG_0042.png", "image/png", noise_png(width, height))
}

#[test]
fn should_compress_respects_mime_and_size() {
    let big_jpeg = ImageAsset::new("a.jpg", "image/jpeg", vec![0u8; 3 * 1024 * 1024]);
    let big_text = ImageAsset::new("a.txt", "text/plain", vec![0u8; 3 * 1024 * 1024]);
    let at_limit = ImageAsset::new("b.jpg", "image/jpeg", vec![0u8; DEFAULT_MAX_SIZE_BYTES]);

    assert!(should_compress(&big_jpeg, DEFAULT_MAX_SIZE_BYTES));
    assert!(!should_compress(&big_text, DEFAULT_MAX_SIZE_BYTES));
    assert!(!should_compress(&at_limit, DEFAULT_MAX_SIZE_BYTES));
}

#[tokio::test]
async fn file_within_budget_is_untouched() {
    let asset = photo(64, 64);
    let out = compress_image(asset.clone(), &CompressOptions::default()).await;

    assert_eq!(out.size(), asset.size());
    assert!(out.shares_buffer_with(&asset));
    assert_eq!(out.name(), "IMG_0042.png");
}

#[tokio::test]
async fn oversized_photo_gets_smaller() {
    let asset = photo(600, 400);
    let options = CompressOptions::default()
        .with_max_dimensions(300, 300)
        .with_max_size_bytes(asset.size() / 4);

    let report = compress_image_cancellable(asset.clone(), &options, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.outcome, CompressionOutcome::Compressed);
    assert_eq!(report.original_size, asset.size());
    assert!(report.asset.size() < asset.size());
    assert_eq!(report.asset.dimensions(), Some((300, 200)));
    assert!(report
        .attempts
        .windows(2)
        .all(|w| w[1].size <= w[0].size && w[1].quality < w[0].quality));
}

#[tokio::test]
async fn webp_output_is_renamed() {
    let options = CompressOptions::default()
        .with_format(OutputFormat::WebP)
        .with_max_size_bytes(1000);
    let report = compress_image_cancellable(photo(80, 60), &options, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.asset.name(), "IMG_0042.webp");
    assert_eq!(report.asset.mime_type(), "image/webp");
    // Lossless encoder: nothing to gain from a second pass.
    assert_eq!(report.attempts.len(), 1);
}

#[tokio::test]
async fn progressive_reports_start_and_finish() {
    // Raw noise at this size is over the default 2 MiB budget.
    let asset = photo(1000, 800);
    assert!(should_compress(&asset, DEFAULT_MAX_SIZE_BYTES));

    let mut seen = Vec::new();
    let mut on_progress = |pct: u8| seen.push(pct);
    let out = progressive_compress(asset.clone(), Some(&mut on_progress)).await;

    assert_eq!(seen, [10, 100]);
    assert!(out.size() < asset.size());
    assert_eq!(out.mime_type(), "image/jpeg");
}

#[tokio::test]
async fn progressive_without_callback() {
    let asset = photo(1000, 800);
    let out = progressive_compress(asset.clone(), None).await;
    assert!(out.size() < asset.size());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_compressions_are_independent() {
    let options = CompressOptions::default()
        .with_max_dimensions(100, 100)
        .with_max_size_bytes(1000);

    let (a, b) = tokio::join!(
        compress_image(photo(300, 200), &options),
        compress_image(photo(200, 300), &options),
    );

    assert_eq!(a.dimensions(), Some((100, 67)));
    assert_eq!(b.dimensions(), Some((67, 100)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn cancelling_mid_flight_discards_result() {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(1)).await;
        trigger.cancel();
    });

    // Decoding and five encodes of this image outlast the timer.
    let options = CompressOptions::default().with_max_size_bytes(100);
    let result = compress_image_cancellable(photo(1200, 900), &options, &cancel).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn undecodable_bytes_fall_back() {
    let asset = ImageAsset::new("scan.png", "image/png", vec![0x42; 10_000]);
    let options = CompressOptions::default().with_max_size_bytes(1000);

    let report = compress_image_cancellable(asset.clone(), &options, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(report.outcome, CompressionOutcome::Fallback);
    assert!(report.attempts.is_empty());
    assert!(report.asset.shares_buffer_with(&asset));
}
