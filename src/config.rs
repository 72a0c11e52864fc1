//! Configuration management for cv-tailor
//!
//! Every behavioural toggle of the pipeline lives here as an explicit,
//! enumerated setting. The core never reads ambient process state.

use crate::error::{CvTailorError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub scoring: ScoringConfig,
    pub generation: GenerationConfig,
    pub persistence: PersistenceConfig,
    pub compile: CompileConfig,
    pub output: OutputConfig,
}

/// Relevance-scoring weights and list caps for profile adaptation.
///
/// The tier weights are empirically tuned; exact technology matches are
/// weighted heavily on purpose because they are the strongest relevance
/// signal a posting gives us.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub exact_match_weight: u32,
    pub text_match_weight: u32,
    pub keyword_weight: u32,
    pub max_selected_bullets: usize,
    pub max_skill_items: usize,
    pub max_skill_groups: usize,
    pub max_certifications: usize,
    pub fallback_skill_items: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub mode: GenerationMode,
}

/// Whether an externally generated cover-letter draft may be consulted.
/// The local composer runs either way, so `Disabled` never blocks output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    Disabled,
    Enabled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    pub mode: PersistenceMode,
    pub data_dir: PathBuf,
}

/// Where finalized application records go. `Local` appends to a JSON file
/// under `data_dir`; `Remote` emits the record next to the rendered
/// documents for an external persister to pick up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersistenceMode {
    Local,
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileConfig {
    pub timeout_secs: u64,
    pub compilers: Vec<CompilerSpec>,
}

/// One external LaTeX compiler invocation. Arguments may contain the
/// placeholders `{tex}`, `{out_dir}` and `{pdf}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilerSpec {
    pub name: String,
    pub program: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub output_dir: PathBuf,
    /// Optional JSON file overriding the built-in keyword vocabulary.
    pub vocabulary_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cv-tailor");

        Self {
            scoring: ScoringConfig {
                exact_match_weight: 5,
                text_match_weight: 2,
                keyword_weight: 1,
                max_selected_bullets: 4,
                max_skill_items: 6,
                max_skill_groups: 7,
                max_certifications: 5,
                fallback_skill_items: 5,
            },
            generation: GenerationConfig {
                mode: GenerationMode::Disabled,
            },
            persistence: PersistenceConfig {
                mode: PersistenceMode::Local,
                data_dir,
            },
            compile: CompileConfig {
                timeout_secs: 120,
                compilers: vec![
                    CompilerSpec {
                        name: "tectonic".to_string(),
                        program: "tectonic".to_string(),
                        args: vec!["-o".to_string(), "{out_dir}".to_string(), "{tex}".to_string()],
                    },
                    CompilerSpec {
                        name: "pdflatex".to_string(),
                        program: "pdflatex".to_string(),
                        args: vec![
                            "-interaction=nonstopmode".to_string(),
                            "-output-directory".to_string(),
                            "{out_dir}".to_string(),
                            "{tex}".to_string(),
                        ],
                    },
                ],
            },
            output: OutputConfig {
                output_dir: PathBuf::from("output"),
                vocabulary_path: None,
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load the configuration, creating the default file on first run.
    pub fn load_from(path: Option<PathBuf>) -> Result<Self> {
        let config_path = path.unwrap_or_else(Self::config_path);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content).map_err(|e| {
                CvTailorError::Configuration(format!("Failed to parse config: {}", e))
            })?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    fn save_to(&self, config_path: &std::path::Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            CvTailorError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("cv-tailor")
            .join("config.toml")
    }

    pub fn generation_enabled(&self) -> bool {
        self.generation.mode == GenerationMode::Enabled
    }
}
