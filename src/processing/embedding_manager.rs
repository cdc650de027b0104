//! Embedding model management for downloading Model2Vec models ahead of time

use crate::error::{Result, ResumeAtsError};
use hf_hub::api::tokio::Api;
use log::{info, warn};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Information about a known embedding model
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingModelInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub repo_id: &'static str,
    pub size_mb: u64,
    pub dimensions: u32,
    pub description: &'static str,
}

const KNOWN_MODELS: [EmbeddingModelInfo; 3] = [
    EmbeddingModelInfo {
        id: "potion-base-8M",
        name: "Potion Base 8M",
        repo_id: "minishlab/potion-base-8M",
        size_mb: 33,
        dimensions: 256,
        description: "High-quality Model2Vec embeddings with 8M parameters",
    },
    EmbeddingModelInfo {
        id: "potion-base-2M",
        name: "Potion Base 2M",
        repo_id: "minishlab/potion-base-2M",
        size_mb: 8,
        dimensions: 64,
        description: "Smallest Model2Vec model, fastest load",
    },
    EmbeddingModelInfo {
        id: "m2v-base",
        name: "Model2Vec Base",
        repo_id: "minishlab/M2V_base_output",
        size_mb: 90,
        dimensions: 256,
        description: "Legacy Model2Vec base embeddings model",
    },
];

/// Files Model2Vec needs; all are required
const MODEL_FILES: [&str; 3] = ["model.safetensors", "tokenizer.json", "config.json"];

/// Manager for embedding models in the models directory
pub struct EmbeddingModelManager {
    models_dir: PathBuf,
    api: Api,
}

impl EmbeddingModelManager {
    pub async fn new(models_dir: PathBuf) -> Result<Self> {
        if !models_dir.exists() {
            fs::create_dir_all(&models_dir).await?;
        }

        let api = Api::new().map_err(|e| {
            ResumeAtsError::EmbeddingUnavailable(format!("Failed to initialize HF API: {}", e))
        })?;

        Ok(Self { models_dir, api })
    }

    pub fn known_models() -> &'static [EmbeddingModelInfo] {
        &KNOWN_MODELS
    }

    pub fn known_model(id: &str) -> Option<&'static EmbeddingModelInfo> {
        KNOWN_MODELS.iter().find(|m| m.id == id)
    }

    /// Resolve model ID from an id, repo id or display name
    pub fn resolve_known(input: &str) -> Option<&'static str> {
        let input_lower = input.to_lowercase();
        KNOWN_MODELS
            .iter()
            .find(|m| m.id == input || m.repo_id == input || m.name.to_lowercase() == input_lower)
            .map(|m| m.id)
    }

    pub fn is_valid_model_directory(path: &Path) -> bool {
        MODEL_FILES.iter().all(|file| path.join(file).is_file())
    }

    pub fn model_path(&self, model_id: &str) -> PathBuf {
        self.models_dir.join(model_id)
    }

    pub fn is_model_downloaded(&self, model_id: &str) -> bool {
        Self::is_valid_model_directory(&self.model_path(model_id))
    }

    /// Download a known model from the Hugging Face Hub
    pub async fn download_model(&self, model: &str) -> Result<PathBuf> {
        let model_id = Self::resolve_known(model)
            .ok_or_else(|| ResumeAtsError::InvalidInput(format!("Unknown embedding model: {}", model)))?;
        let info = Self::known_model(model_id)
            .ok_or_else(|| ResumeAtsError::InvalidInput(format!("Unknown embedding model: {}", model)))?;

        let model_dir = self.model_path(model_id);
        if self.is_model_downloaded(model_id) {
            info!("Embedding model {} already present at {}", model_id, model_dir.display());
            return Ok(model_dir);
        }

        info!("Downloading embedding model {} ({} MB) from {}", info.name, info.size_mb, info.repo_id);
        fs::create_dir_all(&model_dir).await?;

        let repo = self.api.model(info.repo_id.to_string());
        for file in MODEL_FILES {
            let cached = repo.get(file).await.map_err(|e| {
                warn!("Download of {} failed", file);
                ResumeAtsError::EmbeddingUnavailable(format!("Failed to download {}: {}", file, e))
            })?;
            fs::copy(&cached, model_dir.join(file)).await?;
            info!("  downloaded {}", file);
        }

        Ok(model_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_manager_creates_models_dir() {
        let temp_dir = TempDir::new().unwrap();
        let models_dir = temp_dir.path().join("models");
        let manager = EmbeddingModelManager::new(models_dir.clone()).await.unwrap();

        assert!(models_dir.is_dir());
        assert!(!manager.is_model_downloaded("potion-base-8M"));
    }

    #[test]
    fn test_resolve_known() {
        assert_eq!(EmbeddingModelManager::resolve_known("potion-base-8M"), Some("potion-base-8M"));
        assert_eq!(EmbeddingModelManager::resolve_known("minishlab/potion-base-8M"), Some("potion-base-8M"));
        assert_eq!(EmbeddingModelManager::resolve_known("potion base 8m"), Some("potion-base-8M"));
        assert_eq!(EmbeddingModelManager::resolve_known("all-MiniLM-L6-v2"), None);
    }

    #[test]
    fn test_model_directory_needs_all_files() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("model.safetensors"), b"x").unwrap();
        std::fs::write(temp_dir.path().join("tokenizer.json"), b"{}").unwrap();
        assert!(!EmbeddingModelManager::is_valid_model_directory(temp_dir.path()));

        std::fs::write(temp_dir.path().join("config.json"), b"{}").unwrap();
        assert!(EmbeddingModelManager::is_valid_model_directory(temp_dir.path()));
    }
}
