//! Application context built once at startup and handed to every command

use crate::config::Config;
use crate::error::{Result, ResumeAtsError};
use crate::llm::{FeedbackGenerator, GeminiClient};
use crate::processing::embeddings::EmbeddingEngine;
use crate::processing::{ScoringPolicy, SkillMatcher, SkillVocabulary};
use crate::storage::CsvLeaderboard;
use log::debug;

pub struct AppContext {
    config: Config,
    api_key: Option<String>,
}

impl AppContext {
    /// Reads the API credential from the environment, after loading `.env` if present
    pub fn from_env(config: Config) -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("loaded environment from {}", path.display());
        }

        let api_key = std::env::var(&config.generation.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());
        debug!(
            "{} is {}",
            config.generation.api_key_env,
            if api_key.is_some() { "set" } else { "not set" }
        );

        Self { config, api_key }
    }

    pub fn with_api_key(config: Config, api_key: Option<String>) -> Self {
        Self { config, api_key }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Hosted model client; fails without a credential
    pub fn generator(&self) -> Result<GeminiClient> {
        let api_key = self.api_key.clone().ok_or_else(|| {
            ResumeAtsError::Configuration(format!(
                "{} is not set; add it to the environment or a .env file",
                self.config.generation.api_key_env
            ))
        })?;
        GeminiClient::from_config(&self.config, api_key)
    }

    pub fn feedback_generator(&self) -> Result<FeedbackGenerator<GeminiClient>> {
        Ok(FeedbackGenerator::new(self.generator()?))
    }

    pub fn embedder(&self) -> Result<EmbeddingEngine> {
        EmbeddingEngine::from_config(&self.config)
    }

    pub fn skill_matcher(&self) -> Result<SkillMatcher> {
        let vocabulary = SkillVocabulary::new(&self.config.scoring.skills);
        SkillMatcher::new(vocabulary, self.config.scoring.match_mode)
    }

    pub fn scoring_policy(&self) -> ScoringPolicy {
        ScoringPolicy::from(&self.config.scoring)
    }

    pub fn leaderboard(&self) -> CsvLeaderboard {
        CsvLeaderboard::new(&self.config.output.leaderboard_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchMode;

    #[test]
    fn test_missing_key_is_configuration_error() {
        let context = AppContext::with_api_key(Config::default(), None);
        assert!(!context.has_api_key());
        assert!(matches!(context.generator(), Err(ResumeAtsError::Configuration(_))));
    }

    #[test]
    fn test_generator_uses_configured_model() {
        let mut config = Config::default();
        config.models.generation_model = "gemini-pro".to_string();
        let context = AppContext::with_api_key(config, Some("key".to_string()));

        assert_eq!(context.generator().unwrap().model(), "gemini-pro");
    }

    #[test]
    fn test_matcher_follows_scoring_config() {
        let mut config = Config::default();
        config.scoring.skills = vec![" Rust ".to_string(), "sql".to_string(), "rust".to_string()];
        config.scoring.match_mode = MatchMode::Word;
        config.scoring.clamp_score = false;
        let context = AppContext::with_api_key(config, None);

        let matcher = context.skill_matcher().unwrap();
        assert_eq!(matcher.vocabulary().skills(), ["rust", "sql"]);
        assert_eq!(matcher.extract_skills("nosqlite and Rust"), vec!["rust"]);
        assert!(!context.scoring_policy().clamp);
    }

    #[test]
    fn test_from_env_reads_named_variable() {
        let mut config = Config::default();
        config.generation.api_key_env = "RESUME_ATS_TEST_KEY_FROM_ENV".to_string();
        std::env::set_var("RESUME_ATS_TEST_KEY_FROM_ENV", "secret");

        let context = AppContext::from_env(config);
        assert!(context.has_api_key());
        std::env::remove_var("RESUME_ATS_TEST_KEY_FROM_ENV");
    }
}
