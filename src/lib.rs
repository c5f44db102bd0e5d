//! # Postfit
//!
//! Prepares locally-saved images for a social-media post. The destination
//! platform imposes a hard byte ceiling per uploaded image; postfit takes
//! an ordered batch of (image file, alt text) pairs and guarantees every
//! buffer it hands back fits that ceiling, keeping each surviving image
//! paired with its own alt text.
//!
//! # The Compliance Contract
//!
//! ```text
//! [(path, alt)…]  →  compliance  →  [(bytes ≤ ceiling, alt)…]
//! ```
//!
//! Three rules shape the pipeline:
//!
//! - **Per-image tolerance**: an unreadable file, a corrupt buffer, or an
//!   image that stays oversized after compression drops that image only.
//!   The batch always completes; a post degrades to fewer images (or to
//!   text-only) instead of failing.
//! - **Order is the pairing**: survivors keep their relative input order,
//!   which is what lets the caller zip uploaded media handles back to the
//!   right alt texts by position.
//! - **No needless quality loss**: files already under the ceiling pass
//!   through byte-for-byte; re-encoding only happens when it has to.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`compliance`] | The size-ceiling pipeline: codec seam, quality ladder, ordered batch report |
//! | [`upload`] | Uploader trait + parallel batch that zips handles to alt texts |
//! | [`post`] | Post drafts and the text-only fallback branch |
//! | [`scan`] | Expands CLI inputs (files, directories) into an ordered candidate list |
//! | [`alt_text`] | Alt-text resolution: explicit text → sidecar `.txt` → filename |
//! | [`config`] | `postfit.toml` loading, validation, policy selection |
//! | [`output`] | CLI report formatting |
//!
//! # Design Decisions
//!
//! ## Two compression policies, one contract
//!
//! Oversized images can be handled two ways: the default **iterative**
//! policy walks a descending quality ladder (75 down to 15, re-encoding
//! the previous pass's output each time), preserving resolution at the
//! cost of generational loss; the **single-pass** policy downscales to a
//! fixed width and encodes once, cheaper and deterministic, but it caps
//! resolution even for images that barely missed the ceiling. Both
//! guarantee the same ceiling invariant; `postfit.toml` picks.
//!
//! ## Pure-Rust Imaging
//!
//! All pixel work goes through the `image` crate: pure Rust decoders and
//! encoders, statically linked, no ImageMagick or libvips to install. The
//! binary is fully self-contained.
//!
//! ## Outcomes as data, not exceptions
//!
//! Each image's fate is an explicit value (accepted with bytes, or
//! dropped with a reason) collected into an ordered report. "Skip and
//! continue" is a data-flow decision the caller can inspect, log, and
//! count, not a swallowed error.

pub mod alt_text;
pub mod compliance;
pub mod config;
pub mod output;
pub mod post;
pub mod scan;
pub mod upload;
