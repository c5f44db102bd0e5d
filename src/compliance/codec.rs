//! Image codec trait and the pure-Rust production implementation.
//!
//! The [`ImageCodec`] trait is the seam between pipeline logic and pixel
//! work. The production implementation is [`JpegCodec`]: pure Rust via
//! the `image` crate, statically linked, no system dependencies.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP) | `image::load_from_memory` |
//! | Downscale | `image::DynamicImage::resize` with `Lanczos3` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |

use super::params::Quality;
use image::imageops::FilterType;
use image::{DynamicImage, ImageEncoder};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("encode failed: {0}")]
    Encode(String),
}

/// Trait for the byte-level image operations the pipeline needs.
///
/// Both operations take and return whole encoded buffers. The pipeline
/// never sees pixels, only byte lengths.
pub trait ImageCodec: Sync {
    /// Decode `bytes` and re-encode as lossy JPEG at `quality`.
    fn reencode(&self, bytes: &[u8], quality: Quality) -> Result<Vec<u8>, CodecError>;

    /// Decode `bytes`, downscale to at most `max_width` pixels wide
    /// (aspect preserved, never upscales), and encode once at `quality`.
    fn shrink_to_width(
        &self,
        bytes: &[u8],
        max_width: u32,
        quality: Quality,
    ) -> Result<Vec<u8>, CodecError>;
}

/// Pure Rust codec using the `image` crate.
pub struct JpegCodec;

impl JpegCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JpegCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn decode(bytes: &[u8]) -> Result<DynamicImage, CodecError> {
    image::load_from_memory(bytes).map_err(|e| CodecError::Decode(e.to_string()))
}

/// Encode as JPEG at the given quality.
///
/// JPEG has no alpha channel, so the image is flattened to RGB first.
/// PNG/WebP sources with transparency would otherwise fail to encode.
fn encode_jpeg(img: &DynamicImage, quality: Quality) -> Result<Vec<u8>, CodecError> {
    let rgb = img.to_rgb8();
    let mut buf = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality.value())
        .write_image(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| CodecError::Encode(e.to_string()))?;
    Ok(buf)
}

impl ImageCodec for JpegCodec {
    fn reencode(&self, bytes: &[u8], quality: Quality) -> Result<Vec<u8>, CodecError> {
        let img = decode(bytes)?;
        encode_jpeg(&img, quality)
    }

    fn shrink_to_width(
        &self,
        bytes: &[u8],
        max_width: u32,
        quality: Quality,
    ) -> Result<Vec<u8>, CodecError> {
        let img = decode(bytes)?;
        let img = if img.width() > max_width {
            img.resize(max_width, u32::MAX, FilterType::Lanczos3)
        } else {
            img
        };
        encode_jpeg(&img, quality)
    }
}
