//! External-generator boundary
//!
//! The pipeline never calls a hosted text generator itself; it accepts the
//! generator's response as a file of per-segment overrides. A user-edit
//! file uses the same shape and sits above it in the chain. Resolution
//! order per segment: user edit, then generated text, then the local rule.

use crate::config::GenerationMode;
use crate::error::Result;
use crate::processing::composer::CoverLetterContent;
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Partial per-segment replacement text. Absent fields leave the lower
/// tier in place. Field aliases accept the short segment names used by
/// the hosted generator's responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SegmentOverrides {
    #[serde(default, alias = "accroche")]
    pub hook: Option<String>,
    #[serde(default, alias = "entreprise")]
    pub employer_fit: Option<String>,
    #[serde(default, alias = "moi")]
    pub candidate_fit: Option<String>,
    #[serde(default, alias = "nous")]
    pub collaboration: Option<String>,
    #[serde(default, alias = "conclusion")]
    pub closing: Option<String>,
}

impl SegmentOverrides {
    /// Strict parse for the user-edit tier: a malformed edit file is a
    /// hard error, the user should see it.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Lenient parse for the generated tier: malformed or fenced-but-empty
    /// responses degrade to "no override" with a warning, never an error.
    pub fn parse_generated(raw: &str) -> Self {
        let cleaned = strip_code_fences(raw);
        match serde_json::from_str(cleaned) {
            Ok(overrides) => overrides,
            Err(e) => {
                warn!("generated content is not valid JSON, ignoring it: {}", e);
                SegmentOverrides::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hook.is_none()
            && self.employer_fit.is_none()
            && self.candidate_fit.is_none()
            && self.collaboration.is_none()
            && self.closing.is_none()
    }
}

/// Generators often wrap JSON in markdown code fences.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}

/// The assembled three-tier chain. The generated tier is dropped at
/// construction when generation is disabled in the config.
#[derive(Debug, Clone, Default)]
pub struct OverrideChain {
    user: SegmentOverrides,
    generated: SegmentOverrides,
}

impl OverrideChain {
    pub fn new(
        user: SegmentOverrides,
        generated: SegmentOverrides,
        mode: GenerationMode,
    ) -> Self {
        let generated = match mode {
            GenerationMode::Enabled => generated,
            GenerationMode::Disabled => {
                if !generated.is_empty() {
                    warn!("generation is disabled, ignoring generated content");
                }
                SegmentOverrides::default()
            }
        };
        Self { user, generated }
    }

    /// Replace segments of the locally composed letter, user edits winning
    /// over generated text. Chosen text is carried verbatim.
    pub fn resolve(&self, local: CoverLetterContent) -> CoverLetterContent {
        let pick = |user: &Option<String>, generated: &Option<String>, local: String| {
            user.clone().or_else(|| generated.clone()).unwrap_or(local)
        };
        CoverLetterContent {
            hook: pick(&self.user.hook, &self.generated.hook, local.hook),
            employer_fit: pick(
                &self.user.employer_fit,
                &self.generated.employer_fit,
                local.employer_fit,
            ),
            candidate_fit: pick(
                &self.user.candidate_fit,
                &self.generated.candidate_fit,
                local.candidate_fit,
            ),
            collaboration: pick(
                &self.user.collaboration,
                &self.generated.collaboration,
                local.collaboration,
            ),
            closing: pick(&self.user.closing, &self.generated.closing, local.closing),
        }
    }
}
