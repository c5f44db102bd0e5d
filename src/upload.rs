//! The upload seam between compliant images and the posting API.
//!
//! Network specifics (endpoints, auth, wire shapes) belong to the caller;
//! this module only fixes the contract: each image's bytes go out as one
//! independent call, the platform hands back an opaque handle, and the
//! handle must end up attached to the alt text of the image it came from.
//! Positional zipping does that pairing, which is why
//! [`ComplianceReport`](crate::compliance::ComplianceReport) preserves
//! input order.

use crate::compliance::UploadableImage;
use rayon::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("upload rejected: {0}")]
    Rejected(String),
    #[error("transport error: {0}")]
    Transport(String),
}

/// Opaque media handle returned by the destination platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRef(pub String);

/// One network call per image. Implementations must be `Sync` because
/// the batch fans out in parallel.
pub trait MediaUploader: Sync {
    fn upload(&self, bytes: &[u8]) -> Result<MediaRef, UploadError>;
}

/// An uploaded image ready to embed: platform handle + alt text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedMedia {
    pub media: MediaRef,
    pub alt: String,
}

/// Upload every image as an independent parallel call, then zip each
/// returned handle back to its image's alt text by position.
///
/// There are no in-flight retries; the first failure aborts the batch and
/// surfaces as the call's error.
pub fn upload_batch(
    uploader: &impl MediaUploader,
    images: &[UploadableImage],
) -> Result<Vec<AttachedMedia>, UploadError> {
    images
        .par_iter()
        .map(|img| {
            uploader.upload(&img.bytes).map(|media| AttachedMedia {
                media,
                alt: img.alt.clone(),
            })
        })
        .collect()
}
