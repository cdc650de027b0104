//! Prompt templates shared by feedback, chat and interview requests

use crate::error::{Result, ResumeAtsError};
use std::collections::HashMap;

/// Which prompt to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    Feedback,
    ChatAnswer,
    MockInterview,
}

impl PromptKind {
    /// Placeholders that must be substituted
    pub fn required_vars(&self) -> &'static [&'static str] {
        match self {
            PromptKind::Feedback => &["resume", "job"],
            PromptKind::ChatAnswer => &["resume", "question"],
            PromptKind::MockInterview => &["resume"],
        }
    }
}

#[derive(Debug, Clone)]
pub struct PromptTemplates {
    templates: HashMap<PromptKind, String>,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        let templates = HashMap::from([
            (PromptKind::Feedback, FEEDBACK_TEMPLATE.to_string()),
            (PromptKind::ChatAnswer, CHAT_TEMPLATE.to_string()),
            (PromptKind::MockInterview, INTERVIEW_TEMPLATE.to_string()),
        ]);
        Self { templates }
    }
}

impl PromptTemplates {
    pub fn with_template(mut self, kind: PromptKind, template: impl Into<String>) -> Self {
        self.templates.insert(kind, template.into());
        self
    }

    /// Substitute `{name}` placeholders from `vars` into the template for `kind`
    pub fn render(&self, kind: PromptKind, vars: &HashMap<&str, &str>) -> Result<String> {
        if let Some(missing) = kind.required_vars().iter().find(|name| !vars.contains_key(*name)) {
            return Err(ResumeAtsError::InvalidInput(format!(
                "{:?} prompt needs a value for '{}'",
                kind, missing
            )));
        }

        let template = self
            .templates
            .get(&kind)
            .ok_or_else(|| ResumeAtsError::Configuration(format!("no template for {:?}", kind)))?;

        // Single pass so substituted text is never re-scanned for placeholders
        let mut rendered = String::with_capacity(template.len());
        let mut rest = template.as_str();
        while let Some(open) = rest.find('{') {
            rendered.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match after.find('}') {
                Some(close) if vars.contains_key(&after[..close]) => {
                    rendered.push_str(vars[&after[..close]]);
                    rest = &after[close + 1..];
                }
                _ => {
                    rendered.push('{');
                    rest = after;
                }
            }
        }
        rendered.push_str(rest);

        Ok(rendered)
    }
}

const FEEDBACK_TEMPLATE: &str = r#"You are an ATS system.

Resume:
{resume}

Job Description:
{job}

Return:
- ATS score
- Missing skills
- Resume improvement tips in bullet points
"#;

const CHAT_TEMPLATE: &str = r#"Resume:
{resume}

Question:
{question}

Answer clearly.
"#;

const INTERVIEW_TEMPLATE: &str = r#"Resume:
{resume}

Based on this resume generate:
5 technical interview questions
3 HR questions
2 project deep dive questions
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_rendering() {
        let templates = PromptTemplates::default();
        let vars = HashMap::from([
            ("resume", "Software Engineer with Python experience at Tech Corp."),
            ("job", "Senior Software Engineer role requiring React and Python."),
        ]);

        let prompt = templates.render(PromptKind::Feedback, &vars).unwrap();
        assert!(prompt.starts_with("You are an ATS system."));
        assert!(prompt.contains("Software Engineer with Python experience at Tech Corp."));
        assert!(prompt.contains("Senior Software Engineer role requiring React and Python."));
        assert!(prompt.contains("- Missing skills"));
        assert!(!prompt.contains("{resume}"));
    }

    #[test]
    fn test_interview_includes_resume() {
        let templates = PromptTemplates::default();
        let vars = HashMap::from([("resume", "Built a Flask API")]);

        let prompt = templates.render(PromptKind::MockInterview, &vars).unwrap();
        assert!(prompt.contains("Built a Flask API"));
        assert!(prompt.contains("5 technical interview questions"));
    }

    #[test]
    fn test_missing_variable_is_rejected() {
        let templates = PromptTemplates::default();
        let vars = HashMap::from([("resume", "text")]);

        let err = templates.render(PromptKind::ChatAnswer, &vars).unwrap_err();
        assert!(matches!(err, ResumeAtsError::InvalidInput(_)));
    }

    #[test]
    fn test_braces_in_values_are_left_alone() {
        let templates = PromptTemplates::default();
        let vars = HashMap::from([
            ("resume", "fn main() { println!(\"{question}\"); }"),
            ("question", "What about {job}?"),
        ]);

        let prompt = templates.render(PromptKind::ChatAnswer, &vars).unwrap();
        assert!(prompt.contains("fn main() { println!(\"{question}\"); }"));
        assert!(prompt.contains("What about {job}?"));
    }

    #[test]
    fn test_custom_template() {
        let templates = PromptTemplates::default().with_template(PromptKind::ChatAnswer, "Q: {question} / {unknown}");
        let vars = HashMap::from([("resume", "r"), ("question", "why?")]);

        let prompt = templates.render(PromptKind::ChatAnswer, &vars).unwrap();
        assert_eq!(prompt, "Q: why? / {unknown}");
    }
}
