//! ATS-style keyword matching against a fixed skill vocabulary

use crate::config::MatchMode;
use crate::error::{Result, ResumeAtsError};
use aho_corasick::AhoCorasick;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ordered, lowercase, duplicate-free list of skills.
///
/// Insertion order is display order for both found and missing lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillVocabulary {
    skills: Vec<String>,
}

impl SkillVocabulary {
    pub fn new<I, S>(skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let skills = skills
            .into_iter()
            .map(|s| s.as_ref().trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .filter(|s| seen.insert(s.clone()))
            .collect();

        Self { skills }
    }

    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

impl Default for SkillVocabulary {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_SKILLS)
    }
}

/// Found/missing partition of a vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGap {
    pub found: Vec<String>,
    pub missing: Vec<String>,
}

enum Strategy {
    Substring(AhoCorasick),
    Word(Vec<Regex>),
}

pub struct SkillMatcher {
    vocabulary: SkillVocabulary,
    strategy: Strategy,
}

impl SkillMatcher {
    pub fn new(vocabulary: SkillVocabulary, mode: MatchMode) -> Result<Self> {
        let strategy = match mode {
            MatchMode::Substring => {
                let matcher = AhoCorasick::new(vocabulary.skills())
                    .map_err(|e| ResumeAtsError::InvalidInput(format!("Failed to build skill matcher: {}", e)))?;
                Strategy::Substring(matcher)
            }
            MatchMode::Word => {
                let patterns = vocabulary
                    .skills()
                    .iter()
                    .map(|skill| {
                        Regex::new(&format!(r"(?:^|[^\p{{L}}\p{{N}}]){}(?:$|[^\p{{L}}\p{{N}}])", regex::escape(skill)))
                    })
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(|e| ResumeAtsError::InvalidInput(format!("Invalid skill pattern: {}", e)))?;
                Strategy::Word(patterns)
            }
        };

        Ok(Self { vocabulary, strategy })
    }

    pub fn vocabulary(&self) -> &SkillVocabulary {
        &self.vocabulary
    }

    /// Skills present in `text`, in vocabulary order
    pub fn extract_skills(&self, text: &str) -> Vec<String> {
        self.gap(text).found
    }

    /// Partition the vocabulary into skills present in `text` and the rest
    pub fn gap(&self, text: &str) -> SkillGap {
        let lowered = text.to_lowercase();
        let present = self.present_indices(&lowered);

        let (found, missing): (Vec<_>, Vec<_>) = self
            .vocabulary
            .skills()
            .iter()
            .enumerate()
            .partition(|(i, _)| present.contains(i));

        SkillGap {
            found: found.into_iter().map(|(_, s)| s.clone()).collect(),
            missing: missing.into_iter().map(|(_, s)| s.clone()).collect(),
        }
    }

    fn present_indices(&self, lowered: &str) -> HashSet<usize> {
        match &self.strategy {
            // Overlapping search so a skill never hides another one it contains
            Strategy::Substring(matcher) => matcher
                .find_overlapping_iter(lowered)
                .map(|m| m.pattern().as_usize())
                .collect(),
            Strategy::Word(patterns) => patterns
                .iter()
                .enumerate()
                .filter(|(_, re)| re.is_match(lowered))
                .map(|(i, _)| i)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(mode: MatchMode) -> SkillMatcher {
        SkillMatcher::new(SkillVocabulary::default(), mode).unwrap()
    }

    #[test]
    fn test_vocabulary_normalization() {
        let vocab = SkillVocabulary::new(["  Python", "SQL", "python", "", "Git "]);
        assert_eq!(vocab.skills(), &["python", "sql", "git"]);
    }

    #[test]
    fn test_reference_scenario() {
        let gap = matcher(MatchMode::Substring).gap("Experienced in python, sql and git");
        assert_eq!(gap.found, vec!["python", "sql", "git"]);
        assert_eq!(
            gap.missing,
            vec!["machine learning", "nlp", "tensorflow", "excel", "data science", "flask", "streamlit"]
        );
    }

    #[test]
    fn test_case_insensitive() {
        let m = matcher(MatchMode::Substring);
        assert_eq!(m.extract_skills("PYTHON and SQL"), m.extract_skills("python and sql"));
        assert_eq!(m.extract_skills("PYTHON and SQL"), vec!["python", "sql"]);
    }

    #[test]
    fn test_substring_mode_matches_inside_words() {
        let found = matcher(MatchMode::Substring).extract_skills("Built on nosqlite and digital");
        assert!(found.contains(&"sql".to_string()));
        assert!(found.contains(&"git".to_string()));
    }

    #[test]
    fn test_word_mode_requires_boundaries() {
        let m = matcher(MatchMode::Word);
        assert!(m.extract_skills("Built on nosqlite and digital").is_empty());
        assert_eq!(m.extract_skills("SQL, Git; machine learning."), vec!["machine learning", "sql", "git"]);
    }

    #[test]
    fn test_empty_text_misses_everything() {
        let gap = matcher(MatchMode::Substring).gap("");
        assert!(gap.found.is_empty());
        assert_eq!(gap.missing, SkillVocabulary::default().skills());
    }

    #[test]
    fn test_partition_invariant() {
        let m = matcher(MatchMode::Substring);
        for text in ["", "flask streamlit excel", "Data Science with TensorFlow and NLP", "nothing relevant"] {
            let gap = m.gap(text);
            let found: HashSet<_> = gap.found.iter().collect();
            let missing: HashSet<_> = gap.missing.iter().collect();
            assert!(found.is_disjoint(&missing));
            assert_eq!(found.len() + missing.len(), m.vocabulary().len());
        }
    }

    #[test]
    fn test_empty_vocabulary() {
        let m = SkillMatcher::new(SkillVocabulary::new(Vec::<String>::new()), MatchMode::Substring).unwrap();
        let gap = m.gap("python");
        assert!(gap.found.is_empty() && gap.missing.is_empty());
    }
}
