//! Configuration management for the resume ATS scorer

use crate::error::{Result, ResumeAtsError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub models: ModelConfig,
    pub generation: GenerationConfig,
    pub scoring: ScoringConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub models_dir: PathBuf,
    /// Known model id, HuggingFace repo id, or local model folder
    pub embedding_model: String,
    pub generation_model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub endpoint: String,
    /// Name of the environment variable holding the API credential
    pub api_key_env: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub clamp_score: bool,
    pub match_mode: MatchMode,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Plain substring containment
    Substring,
    /// Skill must be delimited by non-alphanumeric characters
    Word,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub report_path: PathBuf,
    pub leaderboard_path: PathBuf,
    pub leaderboard_display: usize,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
}

pub const DEFAULT_SKILLS: [&str; 10] = [
    "python",
    "machine learning",
    "sql",
    "nlp",
    "tensorflow",
    "excel",
    "data science",
    "flask",
    "streamlit",
    "git",
];

impl Default for Config {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".resume-ats")
            .join("models");

        Self {
            models: ModelConfig {
                models_dir,
                embedding_model: "potion-base-8M".to_string(),
                generation_model: "gemini-flash-latest".to_string(),
            },
            generation: GenerationConfig {
                endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
                api_key_env: "GEMINI_API_KEY".to_string(),
                timeout_secs: 60,
            },
            scoring: ScoringConfig {
                clamp_score: true,
                match_mode: MatchMode::Substring,
                skills: DEFAULT_SKILLS.iter().map(|s| s.to_string()).collect(),
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                report_path: PathBuf::from("ATS_Report.pdf"),
                leaderboard_path: PathBuf::from("leaderboard.csv"),
                leaderboard_display: 10,
                color_output: true,
            },
        }
    }
}

impl Config {
    /// Load from `path`, writing defaults on first run
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| ResumeAtsError::Configuration(format!("Failed to parse config {}: {}", path.display(), e)))?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResumeAtsError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-ats")
            .join("config.toml")
    }

    pub fn models_dir(&self) -> &PathBuf {
        &self.models.models_dir
    }
}
