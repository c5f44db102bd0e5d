//! CLI output formatting.
//!
//! Each candidate gets a header line (3-digit positional index + file
//! name) and an indented status line. Format functions are pure (no I/O,
//! no side effects) with thin `print_*` wrappers, so tests can assert on
//! exact lines.
//!
//! ```text
//! 001 map.png
//!     uploadable (412.3 KB)
//! 002 photo_1.jpg
//!     dropped: still 1204833 bytes after compression
//! 1 uploadable, 1 dropped
//! ```

use crate::compliance::{ComplianceReport, ImageCandidate, ItemOutcome};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Human byte size: B under a KiB, then one-decimal KB/MB.
pub fn format_bytes(n: usize) -> String {
    if n < 1024 {
        format!("{} B", n)
    } else if n < 1024 * 1024 {
        format!("{:.1} KB", n as f64 / 1024.0)
    } else {
        format!("{:.1} MB", n as f64 / (1024.0 * 1024.0))
    }
}

/// Per-candidate status lines plus a one-line batch summary.
///
/// `candidates` must be the exact batch the report came from; outcomes
/// are positional.
pub fn format_report(candidates: &[ImageCandidate], report: &ComplianceReport) -> Vec<String> {
    let mut lines = Vec::new();

    for (index, (candidate, outcome)) in candidates.iter().zip(&report.outcomes).enumerate() {
        let name = candidate
            .source
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| candidate.source.display().to_string());
        lines.push(format!("{} {}", format_index(index + 1), name));

        match outcome {
            ItemOutcome::Accepted(img) => {
                lines.push(format!("    uploadable ({})", format_bytes(img.bytes.len())));
            }
            ItemOutcome::Dropped { reason, .. } => {
                lines.push(format!("    dropped: {}", reason));
            }
        }
    }

    lines.push(format!(
        "{} uploadable, {} dropped",
        report.accepted_count(),
        report.dropped_count()
    ));
    if !report.has_images() && !candidates.is_empty() {
        lines.push("no images survived - the post should go out text-only".to_string());
    }

    lines
}

pub fn print_report(candidates: &[ImageCandidate], report: &ComplianceReport) {
    for line in format_report(candidates, report) {
        println!("{}", line);
    }
}

/// File extension for an encoded buffer, from its magic bytes.
///
/// Pass-through images keep whatever format they arrived in, so the
/// written file's extension has to come from the bytes, not from the
/// source path.
pub fn sniff_extension(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0xFF, 0xD8]) {
        "jpg"
    } else if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        "png"
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "webp"
    } else {
        "bin"
    }
}
