//! Resume/job scoring pipeline: embedding similarity plus keyword gaps

use crate::config::ScoringConfig;
use crate::error::Result;
use crate::processing::embeddings::{cosine_similarity, Embedder};
use crate::processing::skill_matcher::SkillMatcher;
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// How a raw cosine similarity becomes a percentage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringPolicy {
    /// Clamp to [0, 100]; when false negative similarities stay negative
    pub clamp: bool,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self { clamp: true }
    }
}

impl From<&ScoringConfig> for ScoringPolicy {
    fn from(config: &ScoringConfig) -> Self {
        Self { clamp: config.clamp_score }
    }
}

impl ScoringPolicy {
    pub fn to_percentage(&self, similarity: f32) -> f64 {
        let percent = round2(f64::from(similarity) * 100.0);
        if self.clamp {
            percent.clamp(0.0, 100.0)
        } else {
            percent
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Percentage, two decimals
    pub score: f64,
    pub similarity: f32,
    pub found: Vec<String>,
    pub missing: Vec<String>,
}

/// Combines an embedder with a skill matcher
pub struct AnalysisEngine<'a, E: Embedder> {
    embedder: &'a E,
    matcher: &'a SkillMatcher,
    policy: ScoringPolicy,
}

impl<'a, E: Embedder> AnalysisEngine<'a, E> {
    pub fn new(embedder: &'a E, matcher: &'a SkillMatcher, policy: ScoringPolicy) -> Self {
        Self {
            embedder,
            matcher,
            policy,
        }
    }

    /// Score `resume` against `job` and split the vocabulary into found and missing skills
    pub fn score_and_gap(&self, resume: &str, job: &str) -> Result<MatchResult> {
        let start_time = Instant::now();

        let resume_embedding = self.embedder.embed(resume)?;
        let job_embedding = self.embedder.embed(job)?;
        let similarity = cosine_similarity(&resume_embedding, &job_embedding)?;

        let gap = self.matcher.gap(resume);

        debug!(
            "scored with {} ({} dims) in {:.2?}: similarity {:.4}",
            self.embedder.model_name(),
            similarity.embedding_dim,
            start_time.elapsed(),
            similarity.score
        );

        Ok(MatchResult {
            score: self.policy.to_percentage(similarity.score),
            similarity: similarity.score,
            found: gap.found,
            missing: gap.missing,
        })
    }
}
