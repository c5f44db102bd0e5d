//! Upload-size compliance for post images.
//!
//! Every image embedded in a post must fit the platform's hard blob
//! ceiling. This module takes locally-saved images and guarantees that:
//! already-small files pass through untouched, oversized ones are
//! re-encoded down the quality ladder (or downscaled once, depending on
//! policy), and anything that still doesn't fit is dropped from the batch
//! without failing it.
//!
//! The module is split into:
//! - **Params**: quality/policy types and the ceiling constant
//! - **Codec**: [`ImageCodec`] trait + [`JpegCodec`] (pure Rust)
//! - **Pipeline**: per-image decisions and the ordered batch report

pub mod codec;
pub mod params;
pub mod pipeline;

pub use codec::{CodecError, ImageCodec, JpegCodec};
pub use params::{CompressionPolicy, MAX_UPLOAD_BYTES, Quality};
pub use pipeline::{
    CompliancePipeline, ComplianceReport, DropReason, ImageCandidate, ItemOutcome, UploadableImage,
};
