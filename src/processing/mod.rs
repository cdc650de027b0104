//! Scoring core: embeddings, skill matching and the combined pipeline

pub mod embeddings;
pub mod embedding_manager;
pub mod skill_matcher;
pub mod analyzer;

pub use analyzer::{AnalysisEngine, MatchResult, ScoringPolicy};
pub use embeddings::Embedder;
pub use skill_matcher::{SkillMatcher, SkillVocabulary};
