//! Post drafts: the piece the orchestrator hands to the posting API.
//!
//! A draft carries the text, a language tag, and whatever media survived
//! compliance and upload. When nothing survived, the draft simply has no
//! media; [`PostDraft::has_media`] is the explicit branch point for
//! degrading to a text-only post instead of failing the whole operation.

use crate::upload::AttachedMedia;

/// Language tag attached to drafts unless configured otherwise.
pub const DEFAULT_LANG: &str = "pt-BR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub text: String,
    pub lang: String,
    pub media: Vec<AttachedMedia>,
}

impl PostDraft {
    pub fn new(text: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            lang: lang.into(),
            media: Vec::new(),
        }
    }

    pub fn with_media(mut self, media: Vec<AttachedMedia>) -> Self {
        self.media = media;
        self
    }

    /// False means the caller should publish text-only.
    pub fn has_media(&self) -> bool {
        !self.media.is_empty()
    }
}
