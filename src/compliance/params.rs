//! Parameter types and constants for compliance runs.
//!
//! These describe *what* a compliance run should do, not *how* the pixel
//! work happens. They are the interface between the
//! [`pipeline`](super::pipeline) (which decides the fate of each image)
//! and the [`codec`](super::codec) (which re-encodes bytes). Keeping them
//! separate allows swapping the codec (e.g. for a mock in tests) without
//! touching the pipeline logic.

/// Hard byte ceiling for a single uploaded image: 976.56 KiB, the blob
/// limit imposed by the destination platform.
pub const MAX_UPLOAD_BYTES: usize = (976.56 * 1024.0) as usize;

/// First quality level tried when an image is over the ceiling.
pub const QUALITY_START: u8 = 75;

/// Amount the quality drops between re-encode passes.
pub const QUALITY_STEP: u8 = 10;

/// The ladder stops once quality would fall to this value or below.
pub const QUALITY_FLOOR: u8 = 10;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u8);

impl Quality {
    pub fn new(value: u8) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(QUALITY_START)
    }
}

/// How an oversized image gets brought under the ceiling.
///
/// The two policies trade differently: the ladder converges on the largest
/// buffer that still fits, at the cost of generational loss from repeated
/// re-encoding; the single pass is cheaper and deterministic but caps the
/// output resolution regardless of how close the original was to fitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionPolicy {
    /// Re-encode the current buffer at descending quality levels
    /// (75, 65, ... down to the floor) until it fits or the ladder runs out.
    Iterative,
    /// Downscale to at most `max_width` pixels wide, encode once at
    /// `quality`, and give up if the result is still over the ceiling.
    SinglePass { max_width: u32, quality: Quality },
}

impl Default for CompressionPolicy {
    fn default() -> Self {
        Self::Iterative
    }
}
