//! Console and JSON rendering of analyses and the leaderboard

use crate::config::OutputFormat;
use crate::error::Result;
use crate::llm::feedback::feedback_lines;
use crate::processing::MatchResult;
use crate::storage::LeaderboardRow;
use colored::{Color, Colorize};
use serde::Serialize;

/// Everything one `analyze` run produces
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutput<'a> {
    #[serde(flatten)]
    pub result: &'a MatchResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<&'a str>,
}

const SCORE_BAR_CELLS: usize = 20;

pub trait OutputFormatter {
    fn format_analysis(&self, analysis: &AnalysisOutput<'_>) -> Result<String>;
    fn format_leaderboard(&self, rows: &[LeaderboardRow]) -> Result<String>;
}

pub struct ConsoleFormatter {
    use_colors: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };
        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: f64) -> String {
        let (badge, color) = match score {
            s if s >= 80.0 => ("STRONG MATCH", Color::Green),
            s if s >= 60.0 => ("GOOD MATCH", Color::BrightGreen),
            s if s >= 40.0 => ("PARTIAL MATCH", Color::Yellow),
            _ => ("WEAK MATCH", Color::BrightRed),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    /// Fixed-width bar, one cell per 5 points
    fn format_score_bar(&self, score: f64) -> String {
        let filled = ((score.clamp(0.0, 100.0) / 100.0) * SCORE_BAR_CELLS as f64).round() as usize;
        let bar = format!("{}{}", "#".repeat(filled), "-".repeat(SCORE_BAR_CELLS - filled));
        let color = if score >= 60.0 { Color::Green } else { Color::Yellow };
        format!("[{}]", self.colorize(&bar, color))
    }

    fn format_list(&self, items: &[String], color: Color) -> String {
        if items.is_empty() {
            return format!("  {}\n", self.colorize("(none)", Color::BrightBlack));
        }
        items
            .iter()
            .map(|item| format!("  • {}\n", self.colorize(item, color)))
            .collect()
    }

    /// Model text as one bullet per non-blank line
    pub fn format_generated(&self, title: &str, text: &str) -> String {
        let mut output = self.format_header(title, 2);
        for line in feedback_lines(text) {
            output.push_str(&format!("  {}\n", line));
        }
        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_analysis(&self, analysis: &AnalysisOutput<'_>) -> Result<String> {
        let result = analysis.result;
        let mut output = String::new();

        output.push_str(&self.format_header("📊 RESUME ATS ANALYSIS", 1));
        output.push_str(&format!(
            "ATS Score: {}% {}\n",
            result.score,
            self.format_score_badge(result.score)
        ));
        output.push_str(&format!("{}\n", self.format_score_bar(result.score)));
        output.push_str(&format!(
            "{}\n",
            self.colorize(&format!("Cosine similarity: {:.4}", result.similarity), Color::BrightBlack)
        ));

        output.push_str(&self.format_header("✅ Skills Found", 2));
        output.push_str(&self.format_list(&result.found, Color::Green));

        output.push_str(&self.format_header("❌ Missing Skills", 2));
        output.push_str(&self.format_list(&result.missing, Color::Red));

        if let Some(feedback) = analysis.feedback {
            output.push_str(&self.format_generated("🤖 AI Feedback & Tips", feedback));
        }

        Ok(output)
    }

    fn format_leaderboard(&self, rows: &[LeaderboardRow]) -> Result<String> {
        let mut output = self.format_header("🏆 Leaderboard", 1);
        if rows.is_empty() {
            output.push_str("No submissions yet.\n");
            return Ok(output);
        }

        let width = rows.iter().map(|r| r.name.chars().count()).max().unwrap_or(4).max(4);
        output.push_str(&format!("{:>4}  {:<width$}  {:>7}\n", "#", "Name", "Score", width = width));
        for (rank, row) in rows.iter().enumerate() {
            let line = format!("{:>4}  {:<width$}  {:>7.2}", rank + 1, row.name, row.score, width = width);
            let line = if rank == 0 { self.colorize(&line, Color::Yellow) } else { line };
            output.push_str(&line);
            output.push('\n');
        }
        Ok(output)
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn to_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_analysis(&self, analysis: &AnalysisOutput<'_>) -> Result<String> {
        self.to_json(analysis)
    }

    fn format_leaderboard(&self, rows: &[LeaderboardRow]) -> Result<String> {
        self.to_json(rows)
    }
}

/// Formatter for the configured output format
pub fn formatter_for(format: OutputFormat, use_colors: bool) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Console => Box::new(ConsoleFormatter::new(use_colors)),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
    }
}
