//! The image compliance pipeline.
//!
//! Takes an ordered batch of (image file, alt text) pairs and produces the
//! subset that fits the upload ceiling, each paired with its original alt
//! text, in the original relative order. Images that cannot be read,
//! cannot be re-encoded, or stay oversized after the quality ladder are
//! dropped per item, never for the batch. The pipeline always returns a
//! report; there is no batch-fatal error path.
//!
//! Every image is independent, so the batch runs in parallel via rayon.
//! Parallelism does not disturb ordering: outcomes are collected back into
//! candidate order, which is what keeps alt texts positionally correct
//! after drops.

use super::codec::{CodecError, ImageCodec, JpegCodec};
use super::params::{
    CompressionPolicy, MAX_UPLOAD_BYTES, QUALITY_FLOOR, QUALITY_START, QUALITY_STEP, Quality,
};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// A locally-saved image proposed for a post, before the ceiling check.
#[derive(Debug, Clone)]
pub struct ImageCandidate {
    pub source: PathBuf,
    pub alt: String,
}

impl ImageCandidate {
    pub fn new(source: impl Into<PathBuf>, alt: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            alt: alt.into(),
        }
    }
}

/// An image cleared for upload: bytes at or under the ceiling, plus the
/// alt text it entered the pipeline with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadableImage {
    pub bytes: Vec<u8>,
    pub alt: String,
}

/// Why a candidate was dropped. All variants are per-image and
/// recoverable: the rest of the batch is unaffected.
#[derive(Error, Debug)]
pub enum DropReason {
    #[error("could not read source: {0}")]
    SourceRead(#[from] std::io::Error),
    #[error("re-encode failed: {0}")]
    Reencode(#[from] CodecError),
    #[error("still {bytes} bytes after compression")]
    StillOversized { bytes: usize },
}

/// The explicit per-item result: skip-and-continue as data flow, not as a
/// swallowed exception.
#[derive(Debug)]
pub enum ItemOutcome {
    Accepted(UploadableImage),
    Dropped { source: PathBuf, reason: DropReason },
}

/// Ordered outcomes for one batch, one entry per input candidate.
#[derive(Debug, Default)]
pub struct ComplianceReport {
    pub outcomes: Vec<ItemOutcome>,
}

impl ComplianceReport {
    /// Surviving images in input order.
    pub fn images(&self) -> impl Iterator<Item = &UploadableImage> {
        self.outcomes.iter().filter_map(|o| match o {
            ItemOutcome::Accepted(img) => Some(img),
            ItemOutcome::Dropped { .. } => None,
        })
    }

    /// Consume the report, keeping only the survivors (input order).
    pub fn into_images(self) -> Vec<UploadableImage> {
        self.outcomes
            .into_iter()
            .filter_map(|o| match o {
                ItemOutcome::Accepted(img) => Some(img),
                ItemOutcome::Dropped { .. } => None,
            })
            .collect()
    }

    /// Dropped candidates with their reasons, in input order.
    pub fn dropped(&self) -> impl Iterator<Item = (&Path, &DropReason)> {
        self.outcomes.iter().filter_map(|o| match o {
            ItemOutcome::Dropped { source, reason } => Some((source.as_path(), reason)),
            ItemOutcome::Accepted(_) => None,
        })
    }

    pub fn accepted_count(&self) -> usize {
        self.images().count()
    }

    pub fn dropped_count(&self) -> usize {
        self.dropped().count()
    }

    /// True when no image survived. The caller's contract is to fall back
    /// to a text-only post in that case; this predicate is the branch.
    pub fn has_images(&self) -> bool {
        self.accepted_count() > 0
    }
}

/// Batch driver: codec + policy + ceiling.
pub struct CompliancePipeline<C: ImageCodec> {
    codec: C,
    policy: CompressionPolicy,
    max_bytes: usize,
}

impl CompliancePipeline<JpegCodec> {
    /// Production pipeline: pure-Rust codec, standard ceiling.
    pub fn with_defaults(policy: CompressionPolicy) -> Self {
        Self::new(JpegCodec::new(), policy)
    }
}

impl<C: ImageCodec> CompliancePipeline<C> {
    pub fn new(codec: C, policy: CompressionPolicy) -> Self {
        Self {
            codec,
            policy,
            max_bytes: MAX_UPLOAD_BYTES,
        }
    }

    /// Same pipeline against a different ceiling. The CLI always runs the
    /// standard ceiling; this exists for tests and platforms with other
    /// limits.
    pub fn with_ceiling(codec: C, policy: CompressionPolicy, max_bytes: usize) -> Self {
        Self {
            codec,
            policy,
            max_bytes,
        }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Run the batch. One outcome per candidate, in candidate order.
    pub fn run(&self, candidates: &[ImageCandidate]) -> ComplianceReport {
        let outcomes = candidates.par_iter().map(|c| self.run_one(c)).collect();
        ComplianceReport { outcomes }
    }

    fn run_one(&self, candidate: &ImageCandidate) -> ItemOutcome {
        let dropped = |reason: DropReason| {
            warn!(
                source = %candidate.source.display(),
                %reason,
                "image dropped from post"
            );
            ItemOutcome::Dropped {
                source: candidate.source.clone(),
                reason,
            }
        };

        let raw = match std::fs::read(&candidate.source) {
            Ok(bytes) => bytes,
            Err(e) => return dropped(DropReason::SourceRead(e)),
        };

        // Already under the ceiling: hand back untouched, no quality loss.
        if raw.len() <= self.max_bytes {
            debug!(
                source = %candidate.source.display(),
                bytes = raw.len(),
                "image already fits"
            );
            return ItemOutcome::Accepted(UploadableImage {
                bytes: raw,
                alt: candidate.alt.clone(),
            });
        }

        let compressed = match self.policy {
            CompressionPolicy::Iterative => self.quality_ladder(&candidate.source, raw),
            CompressionPolicy::SinglePass { max_width, quality } => {
                self.codec.shrink_to_width(&raw, max_width, quality)
            }
        };

        match compressed {
            Ok(bytes) if bytes.len() <= self.max_bytes => {
                ItemOutcome::Accepted(UploadableImage {
                    bytes,
                    alt: candidate.alt.clone(),
                })
            }
            Ok(bytes) => dropped(DropReason::StillOversized { bytes: bytes.len() }),
            Err(e) => dropped(DropReason::Reencode(e)),
        }
    }

    /// Descending-quality re-encode loop.
    ///
    /// Each pass re-encodes the *previous pass's output*, not the
    /// original: size is monotonically non-increasing per pass, at the
    /// cost of cumulative generational loss. Bounded at seven passes
    /// (quality 75 down to 15).
    fn quality_ladder(&self, source: &Path, mut bytes: Vec<u8>) -> Result<Vec<u8>, CodecError> {
        let mut quality = QUALITY_START;
        while bytes.len() > self.max_bytes && quality > QUALITY_FLOOR {
            bytes = self.codec.reencode(&bytes, Quality::new(quality))?;
            debug!(
                source = %source.display(),
                quality,
                bytes = bytes.len(),
                "re-encoded"
            );
            quality -= QUALITY_STEP;
        }
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::codec::tests::{MockCodec, RecordedCall};
    use std::fs;
    use tempfile::TempDir;

    const CEILING: usize = 1_000;

    fn write_file(dir: &TempDir, name: &str, len: usize) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, vec![0x42u8; len]).unwrap();
        path
    }

    fn pipeline(codec: MockCodec) -> CompliancePipeline<MockCodec> {
        CompliancePipeline::with_ceiling(codec, CompressionPolicy::Iterative, CEILING)
    }

    // =========================================================================
    // Pass-through and ordering
    // =========================================================================

    #[test]
    fn compliant_image_passes_through_byte_for_byte() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "small.jpg", 400);

        let p = pipeline(MockCodec::new());
        let report = p.run(&[ImageCandidate::new(&path, "a small one")]);

        let images: Vec<_> = report.images().collect();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].bytes, vec![0x42u8; 400]);
        assert_eq!(images[0].alt, "a small one");
        // No re-encode was attempted.
        assert!(p.codec.calls().is_empty());
    }

    #[test]
    fn image_exactly_at_ceiling_is_accepted_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "edge.jpg", CEILING);

        let report = pipeline(MockCodec::new()).run(&[ImageCandidate::new(&path, "edge")]);
        assert_eq!(report.accepted_count(), 1);
    }

    #[test]
    fn survivors_keep_input_order_and_alt_pairing() {
        let dir = TempDir::new().unwrap();
        let a = write_file(&dir, "a.jpg", 500);
        let b = write_file(&dir, "b.jpg", 5_000);
        let c = write_file(&dir, "c.jpg", 300);

        // b is the only oversized item; its ladder never gets under.
        let codec = MockCodec::with_output_sizes(&[4_000, 3_500, 3_000, 2_500, 2_000, 1_800, 1_500]);
        let p = CompliancePipeline::with_ceiling(codec, CompressionPolicy::Iterative, CEILING);
        let report = p.run(&[
            ImageCandidate::new(&a, "first"),
            ImageCandidate::new(&b, "middle"),
            ImageCandidate::new(&c, "last"),
        ]);

        let images: Vec<_> = report.images().collect();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].alt, "first");
        assert_eq!(images[0].bytes.len(), 500);
        assert_eq!(images[1].alt, "last");
        assert_eq!(images[1].bytes.len(), 300);

        let dropped: Vec<_> = report.dropped().collect();
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].0, b.as_path());
        assert!(matches!(
            dropped[0].1,
            DropReason::StillOversized { bytes: 1_500 }
        ));
    }

    // =========================================================================
    // The quality ladder
    // =========================================================================

    #[test]
    fn ladder_descends_and_chains_each_pass_onto_the_last() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "big.jpg", 5_000);

        // Still oversized after every level: the ladder must try exactly
        // seven, and each pass must consume the previous pass's output.
        let codec = MockCodec::with_output_sizes(&[4_000, 3_500, 3_000, 2_500, 2_000, 1_800, 1_500]);
        let p = CompliancePipeline::with_ceiling(codec, CompressionPolicy::Iterative, CEILING);
        let report = p.run(&[ImageCandidate::new(&path, "big")]);

        assert_eq!(report.accepted_count(), 0);
        assert_eq!(
            p.codec.calls(),
            vec![
                RecordedCall::Reencode { quality: 75, input_len: 5_000 },
                RecordedCall::Reencode { quality: 65, input_len: 4_000 },
                RecordedCall::Reencode { quality: 55, input_len: 3_500 },
                RecordedCall::Reencode { quality: 45, input_len: 3_000 },
                RecordedCall::Reencode { quality: 35, input_len: 2_500 },
                RecordedCall::Reencode { quality: 25, input_len: 2_000 },
                RecordedCall::Reencode { quality: 15, input_len: 1_800 },
            ]
        );
    }

    #[test]
    fn ladder_stops_as_soon_as_the_buffer_fits() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "big.jpg", 5_000);

        let codec = MockCodec::with_output_sizes(&[4_000, 800]);
        let p = CompliancePipeline::with_ceiling(codec, CompressionPolicy::Iterative, CEILING);
        let report = p.run(&[ImageCandidate::new(&path, "big")]);

        let images: Vec<_> = report.images().collect();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].bytes.len(), 800);
        // Only two passes: 75 then 65, then the fit check ends the loop.
        assert_eq!(p.codec.calls().len(), 2);
    }

    #[test]
    fn accepted_images_never_exceed_the_ceiling() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "big.jpg", 5_000);

        let codec = MockCodec::with_output_sizes(&[999]);
        let p = CompliancePipeline::with_ceiling(codec, CompressionPolicy::Iterative, CEILING);
        let report = p.run(&[ImageCandidate::new(&path, "big")]);

        for img in report.images() {
            assert!(img.bytes.len() <= CEILING);
        }
        assert_eq!(report.accepted_count(), 1);
    }

    // =========================================================================
    // Per-item failure tolerance
    // =========================================================================

    #[test]
    fn unreadable_source_drops_only_that_item() {
        let dir = TempDir::new().unwrap();
        let good = write_file(&dir, "good.jpg", 200);
        let missing = dir.path().join("nope.jpg");

        let p = pipeline(MockCodec::new());
        let report = p.run(&[
            ImageCandidate::new(&missing, "gone"),
            ImageCandidate::new(&good, "here"),
        ]);

        assert_eq!(report.accepted_count(), 1);
        let images: Vec<_> = report.images().collect();
        assert_eq!(images[0].alt, "here");

        let dropped: Vec<_> = report.dropped().collect();
        assert!(matches!(dropped[0].1, DropReason::SourceRead(_)));
    }

    #[test]
    fn codec_failure_drops_only_that_item() {
        let dir = TempDir::new().unwrap();
        let good = write_file(&dir, "good.jpg", 200);
        let bad = write_file(&dir, "bad.jpg", 5_000);

        let p = CompliancePipeline::with_ceiling(
            MockCodec::failing("truncated scan data"),
            CompressionPolicy::Iterative,
            CEILING,
        );
        let report = p.run(&[
            ImageCandidate::new(&bad, "corrupt"),
            ImageCandidate::new(&good, "fine"),
        ]);

        assert_eq!(report.accepted_count(), 1);
        let dropped: Vec<_> = report.dropped().collect();
        assert_eq!(dropped.len(), 1);
        assert!(matches!(dropped[0].1, DropReason::Reencode(_)));
    }

    // =========================================================================
    // Batch edges
    // =========================================================================

    #[test]
    fn empty_input_yields_empty_report() {
        let report = pipeline(MockCodec::new()).run(&[]);
        assert!(report.outcomes.is_empty());
        assert!(!report.has_images());
    }

    #[test]
    fn all_dropped_is_a_valid_state_not_an_error() {
        let dir = TempDir::new().unwrap();
        let missing_a = dir.path().join("a.jpg");
        let missing_b = dir.path().join("b.jpg");

        let report = pipeline(MockCodec::new()).run(&[
            ImageCandidate::new(&missing_a, "a"),
            ImageCandidate::new(&missing_b, "b"),
        ]);

        assert!(!report.has_images());
        assert_eq!(report.dropped_count(), 2);
        assert_eq!(report.into_images(), Vec::<UploadableImage>::new());
    }

    // =========================================================================
    // Single-pass policy
    // =========================================================================

    #[test]
    fn single_pass_shrinks_once_with_configured_parameters() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "wide.jpg", 5_000);

        let codec = MockCodec::with_output_sizes(&[700]);
        let p = CompliancePipeline::with_ceiling(
            codec,
            CompressionPolicy::SinglePass {
                max_width: 1000,
                quality: Quality::new(80),
            },
            CEILING,
        );
        let report = p.run(&[ImageCandidate::new(&path, "wide")]);

        assert_eq!(report.accepted_count(), 1);
        assert_eq!(
            p.codec.calls(),
            vec![RecordedCall::Shrink {
                max_width: 1000,
                quality: 80,
                input_len: 5_000
            }]
        );
    }

    #[test]
    fn single_pass_drops_when_still_oversized() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "wide.jpg", 5_000);

        let codec = MockCodec::with_output_sizes(&[2_000]);
        let p = CompliancePipeline::with_ceiling(
            codec,
            CompressionPolicy::SinglePass {
                max_width: 1000,
                quality: Quality::new(80),
            },
            CEILING,
        );
        let report = p.run(&[ImageCandidate::new(&path, "wide")]);

        assert!(!report.has_images());
        // Exactly one attempt, no ladder under this policy.
        assert_eq!(p.codec.calls().len(), 1);
    }
}
