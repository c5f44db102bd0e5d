//! Run configuration.
//!
//! Loaded from `postfit.toml` next to the images (or wherever `--config`
//! points). Config files are sparse, override just the values you want:
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [compression]
//! policy = "iterative"      # or "single-pass"
//!
//! [compression.single_pass]
//! max_width = 1000          # px; wider images get downscaled (single-pass only)
//! quality = 80              # one-shot encode quality (single-pass only)
//!
//! [post]
//! lang = "pt-BR"            # language tag attached to drafts
//! ```
//!
//! The upload byte ceiling is deliberately *not* configurable: it mirrors
//! a platform limit, not an operator preference.
//!
//! Unknown keys are rejected to catch typos early.

use crate::compliance::{CompressionPolicy, Quality};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `postfit.toml`.
///
/// All fields have defaults; user files need only specify overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub compression: CompressionConfig,
    pub post: PostConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompressionConfig {
    /// Which policy handles oversized images.
    pub policy: PolicyKind,
    /// Parameters for the single-pass policy (ignored under iterative).
    pub single_pass: SinglePassConfig,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::Iterative,
            single_pass: SinglePassConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    Iterative,
    SinglePass,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SinglePassConfig {
    pub max_width: u32,
    pub quality: u8,
}

impl Default for SinglePassConfig {
    fn default() -> Self {
        Self {
            max_width: 1000,
            quality: 80,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PostConfig {
    pub lang: String,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            lang: crate::post::DEFAULT_LANG.to_string(),
        }
    }
}

impl RunConfig {
    /// Load from `path`, or defaults when the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sp = &self.compression.single_pass;
        if sp.quality == 0 || sp.quality > 100 {
            return Err(ConfigError::Validation(
                "compression.single_pass.quality must be 1-100".into(),
            ));
        }
        if sp.max_width == 0 {
            return Err(ConfigError::Validation(
                "compression.single_pass.max_width must be non-zero".into(),
            ));
        }
        if self.post.lang.trim().is_empty() {
            return Err(ConfigError::Validation("post.lang must be non-empty".into()));
        }
        Ok(())
    }

    /// The policy value the pipeline consumes.
    pub fn policy(&self) -> CompressionPolicy {
        match self.compression.policy {
            PolicyKind::Iterative => CompressionPolicy::Iterative,
            PolicyKind::SinglePass => CompressionPolicy::SinglePass {
                max_width: self.compression.single_pass.max_width,
                quality: Quality::new(self.compression.single_pass.quality),
            },
        }
    }
}

/// The stock config file printed by `postfit gen-config`.
pub fn stock_config_toml() -> String {
    r#"# postfit configuration. All options are optional - the values below
# are the defaults.

[compression]
# How oversized images get brought under the upload ceiling:
#   "iterative"   - re-encode at descending quality (75, 65, ... 15) until
#                   the image fits; keeps resolution, accepts generational
#                   quality loss
#   "single-pass" - downscale to max_width and encode once at quality;
#                   cheaper, deterministic, caps resolution
policy = "iterative"

[compression.single_pass]
max_width = 1000
quality = 80

[post]
# Language tag attached to post drafts
lang = "pt-BR"
"#
    .to_string()
}
