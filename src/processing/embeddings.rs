//! Embeddings generation using Model2Vec

use crate::config::Config;
use crate::error::{Result, ResumeAtsError};
use crate::processing::embedding_manager::EmbeddingModelManager;
use anyhow::Context;
use log::{debug, info};
use model2vec_rs::model::StaticModel;
use std::path::PathBuf;
use std::time::Instant;

/// Maps text to a fixed-dimension vector
pub trait Embedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>>;
    fn model_name(&self) -> &str;
}

pub struct EmbeddingEngine {
    model: StaticModel,
    model_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityScore {
    pub score: f32,
    pub embedding_dim: usize,
}

impl EmbeddingEngine {
    /// Load from a local model folder or a HuggingFace repo id
    pub fn load(source: &str, model_name: &str) -> Result<Self> {
        let start_time = Instant::now();
        info!("Loading Model2Vec embedding model from: {}", source);

        let model = StaticModel::from_pretrained(
            source,
            None, // token
            None, // normalize
            None, // subfolder
        )
        .with_context(|| format!("Failed to load model '{}'", source))?;

        info!("Embedding model loaded in {:.2?}", start_time.elapsed());

        Ok(Self {
            model,
            model_name: model_name.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let source = Self::resolve_source(config);
        Self::load(&source.to_string_lossy(), &config.models.embedding_model)
    }

    /// Prefer a downloaded copy in the models dir, then a local path, then the hub
    fn resolve_source(config: &Config) -> PathBuf {
        let requested = &config.models.embedding_model;

        if let Some(id) = EmbeddingModelManager::resolve_known(requested) {
            let local = config.models_dir().join(id);
            if EmbeddingModelManager::is_valid_model_directory(&local) {
                return local;
            }
            if let Some(info) = EmbeddingModelManager::known_model(id) {
                return PathBuf::from(info.repo_id);
            }
        }

        PathBuf::from(requested)
    }
}

impl Embedder for EmbeddingEngine {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            debug!("blank text, skipping model");
            return Ok(Vec::new());
        }
        Ok(self.model.encode_single(text))
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Calculate cosine similarity between two embeddings.
///
/// A zero-norm (or empty) vector on either side has similarity 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<SimilarityScore> {
    if a.is_empty() || b.is_empty() {
        return Ok(SimilarityScore {
            score: 0.0,
            embedding_dim: a.len().max(b.len()),
        });
    }

    if a.len() != b.len() {
        return Err(ResumeAtsError::EmbeddingUnavailable(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    let score = if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    };

    Ok(SimilarityScore {
        score: if score.is_finite() { score } else { 0.0 },
        embedding_dim: a.len(),
    })
}
