//! Feedback, chat and mock interview requests over one generator

use crate::error::Result;
use crate::llm::client::TextGenerator;
use crate::llm::prompts::{PromptKind, PromptTemplates};
use log::info;
use std::collections::HashMap;

pub struct FeedbackGenerator<G: TextGenerator> {
    generator: G,
    templates: PromptTemplates,
}

impl<G: TextGenerator> FeedbackGenerator<G> {
    pub fn new(generator: G) -> Self {
        Self::with_templates(generator, PromptTemplates::default())
    }

    pub fn with_templates(generator: G, templates: PromptTemplates) -> Self {
        Self { generator, templates }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    async fn ask(&self, kind: PromptKind, vars: HashMap<&str, &str>) -> Result<String> {
        let prompt = self.templates.render(kind, &vars)?;
        info!("Requesting {:?} from the language model", kind);
        self.generator.generate(&prompt).await
    }

    /// ATS-style commentary on how the resume fits the job
    pub async fn feedback(&self, resume: &str, job: &str) -> Result<String> {
        self.ask(PromptKind::Feedback, HashMap::from([("resume", resume), ("job", job)]))
            .await
    }

    pub async fn chat_answer(&self, resume: &str, question: &str) -> Result<String> {
        self.ask(
            PromptKind::ChatAnswer,
            HashMap::from([("resume", resume), ("question", question)]),
        )
        .await
    }

    pub async fn mock_interview(&self, resume: &str) -> Result<String> {
        self.ask(PromptKind::MockInterview, HashMap::from([("resume", resume)]))
            .await
    }
}

/// Non-blank lines of model output, trimmed
pub fn feedback_lines(feedback: &str) -> Vec<&str> {
    feedback
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}
