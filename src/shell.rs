//! Interactive session: one analysis, then questions, interview prep, report and leaderboard

use crate::error::{Result, ResumeAtsError};
use crate::llm::{FeedbackGenerator, TextGenerator};
use crate::output::{ConsoleFormatter, OutputFormatter, ReportBuilder};
use crate::processing::MatchResult;
use crate::storage::LeaderboardRepository;
use log::warn;
use std::io::{BufRead, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Ask(String),
    Interview,
    Feedback,
    Report(Option<PathBuf>),
    Submit(String),
    Leaderboard,
    Help,
    Quit,
}

impl ShellCommand {
    /// `None` for a blank line
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match (word.to_lowercase().as_str(), rest) {
            ("ask", "") => return Err(ResumeAtsError::InvalidInput("usage: ask <question>".to_string())),
            ("ask", question) => ShellCommand::Ask(question.to_string()),
            ("interview", _) => ShellCommand::Interview,
            ("feedback", _) => ShellCommand::Feedback,
            ("report", "") => ShellCommand::Report(None),
            ("report", path) => ShellCommand::Report(Some(PathBuf::from(path))),
            ("submit", "") => return Err(ResumeAtsError::InvalidInput("usage: submit <name>".to_string())),
            ("submit", name) => ShellCommand::Submit(name.to_string()),
            ("leaderboard" | "top", _) => ShellCommand::Leaderboard,
            ("help" | "?", _) => ShellCommand::Help,
            ("quit" | "exit" | "q", _) => ShellCommand::Quit,
            (other, _) => {
                return Err(ResumeAtsError::InvalidInput(format!(
                    "unknown command '{}', type 'help' for a list",
                    other
                )))
            }
        };
        Ok(Some(command))
    }
}

const HELP: &str = "\
Commands:
  ask <question>    Ask the AI about your resume
  interview         Generate mock interview questions
  feedback          Request AI feedback again
  report [path]     Export the PDF report
  submit <name>     Add your score to the leaderboard
  leaderboard       Show the leaderboard
  help              Show this list
  quit              Leave the session
";

pub struct Session<G: TextGenerator, L: LeaderboardRepository> {
    resume: String,
    job: String,
    result: MatchResult,
    feedback: Option<String>,
    generator: Option<FeedbackGenerator<G>>,
    leaderboard: L,
    report_path: PathBuf,
    leaderboard_display: usize,
    formatter: ConsoleFormatter,
}

impl<G: TextGenerator, L: LeaderboardRepository> Session<G, L> {
    /// `generator` is `None` when no model credential is configured
    pub fn new(
        resume: String,
        job: String,
        result: MatchResult,
        generator: Option<FeedbackGenerator<G>>,
        leaderboard: L,
        report_path: PathBuf,
    ) -> Self {
        Self {
            resume,
            job,
            result,
            feedback: None,
            generator,
            leaderboard,
            report_path,
            leaderboard_display: 10,
            formatter: ConsoleFormatter::new(false),
        }
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.formatter = ConsoleFormatter::new(use_colors);
        self
    }

    pub fn with_leaderboard_display(mut self, rows: usize) -> Self {
        self.leaderboard_display = rows;
        self
    }

    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref()
    }

    fn generator(&self) -> Result<&FeedbackGenerator<G>> {
        self.generator.as_ref().ok_or_else(|| {
            ResumeAtsError::Configuration("no language model available; set the API key to use AI features".to_string())
        })
    }

    /// Ask for feedback and remember it for the report
    pub async fn refresh_feedback(&mut self) -> Result<&str> {
        let text = self.generator()?.feedback(&self.resume, &self.job).await?;
        Ok(self.feedback.insert(text).as_str())
    }

    /// Read commands until `quit` or end of input. Command failures are
    /// printed and the loop continues; only write failures end the session.
    pub async fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        write!(out, "{}", HELP)?;
        prompt(out)?;

        for line in input.lines() {
            let line = line?;
            match ShellCommand::parse(&line) {
                Ok(None) => {}
                Ok(Some(ShellCommand::Quit)) => break,
                Ok(Some(command)) => {
                    if let Err(e) = self.execute(command, out).await {
                        warn!("session command failed: {}", e);
                        writeln!(out, "Error: {}", e)?;
                    }
                }
                Err(e) => writeln!(out, "{}", e)?,
            }
            prompt(out)?;
        }

        writeln!(out)?;
        Ok(())
    }

    async fn execute<W: Write>(&mut self, command: ShellCommand, out: &mut W) -> Result<()> {
        match command {
            ShellCommand::Ask(question) => {
                let answer = self.generator()?.chat_answer(&self.resume, &question).await?;
                write!(out, "{}", self.formatter.format_generated("💬 Answer", &answer))?;
            }
            ShellCommand::Interview => {
                let questions = self.generator()?.mock_interview(&self.resume).await?;
                write!(out, "{}", self.formatter.format_generated("🎤 Mock Interview", &questions))?;
            }
            ShellCommand::Feedback => {
                let feedback = self.refresh_feedback().await?.to_string();
                write!(out, "{}", self.formatter.format_generated("🤖 AI Feedback & Tips", &feedback))?;
            }
            ShellCommand::Report(path) => {
                let path = path.unwrap_or_else(|| self.report_path.clone());
                ReportBuilder::new(&self.result, self.feedback.as_deref().unwrap_or_default()).write_to(&path)?;
                writeln!(out, "Report saved to {}", path.display())?;
            }
            ShellCommand::Submit(name) => {
                let table = self.leaderboard.submit(&name, self.result.score)?;
                writeln!(out, "Submitted {} with {}%", name.trim(), self.result.score)?;
                write!(out, "{}", self.formatter.format_leaderboard(table.top(self.leaderboard_display))?)?;
            }
            ShellCommand::Leaderboard => {
                let table = self.leaderboard.load()?;
                write!(out, "{}", self.formatter.format_leaderboard(table.top(self.leaderboard_display))?)?;
            }
            ShellCommand::Help => write!(out, "{}", HELP)?,
            ShellCommand::Quit => {}
        }
        Ok(())
    }
}

fn prompt<W: Write>(out: &mut W) -> Result<()> {
    write!(out, "> ")?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::CsvLeaderboard;
    use std::io::Cursor;
    use tempfile::TempDir;

    struct EchoGenerator;

    impl TextGenerator for EchoGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            if prompt.contains("fail please") {
                return Err(ResumeAtsError::GenerationFailed("model refused".to_string()));
            }
            Ok(format!("echo: {} chars", prompt.len()))
        }
    }

    fn result() -> MatchResult {
        MatchResult {
            score: 71.25,
            similarity: 0.7125,
            found: vec!["python".to_string()],
            missing: vec!["flask".to_string()],
        }
    }

    fn session(dir: &TempDir, generator: Option<EchoGenerator>) -> Session<EchoGenerator, CsvLeaderboard> {
        Session::new(
            "Python developer".to_string(),
            "Flask role".to_string(),
            result(),
            generator.map(FeedbackGenerator::new),
            CsvLeaderboard::new(dir.path().join("leaderboard.csv")),
            dir.path().join("ATS_Report.pdf"),
        )
    }

    async fn run_script(session: &mut Session<EchoGenerator, CsvLeaderboard>, script: &str) -> String {
        let mut out = Vec::new();
        session.run(Cursor::new(script.to_string()), &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(ShellCommand::parse("  ").unwrap(), None);
        assert_eq!(
            ShellCommand::parse("ask What should I learn next?").unwrap(),
            Some(ShellCommand::Ask("What should I learn next?".to_string()))
        );
        assert_eq!(ShellCommand::parse("REPORT").unwrap(), Some(ShellCommand::Report(None)));
        assert_eq!(
            ShellCommand::parse("report out/cv.pdf").unwrap(),
            Some(ShellCommand::Report(Some(PathBuf::from("out/cv.pdf"))))
        );
        assert_eq!(
            ShellCommand::parse("submit Jane Doe").unwrap(),
            Some(ShellCommand::Submit("Jane Doe".to_string()))
        );
        assert!(ShellCommand::parse("ask").is_err());
        assert!(ShellCommand::parse("dance").is_err());
    }

    #[tokio::test]
    async fn test_failures_leave_session_usable() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir, Some(EchoGenerator));

        let output = run_script(&mut session, "ask fail please\nbogus\nask Am I ready?\nquit\nask never reached\n").await;

        assert!(output.contains("Error: Text generation failed: model refused"));
        assert!(output.contains("unknown command 'bogus'"));
        assert_eq!(output.matches("echo:").count(), 1);
    }

    #[tokio::test]
    async fn test_submit_and_report() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir, Some(EchoGenerator));

        let output = run_script(&mut session, "feedback\nsubmit Ann\nreport\n").await;

        assert!(output.contains("Submitted Ann with 71.25%"));
        assert!(session.feedback().unwrap().starts_with("echo:"));
        let csv = std::fs::read_to_string(dir.path().join("leaderboard.csv")).unwrap();
        assert_eq!(csv, "Name,Score\nAnn,71.25\n");
        assert!(dir.path().join("ATS_Report.pdf").is_file());
    }

    #[tokio::test]
    async fn test_without_generator_ai_commands_fail_softly() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir, None);

        let output = run_script(&mut session, "interview\nsubmit  \nleaderboard\n").await;

        assert!(output.contains("Error: Configuration error"));
        assert!(output.contains("usage: submit <name>"));
        assert!(output.contains("No submissions yet."));
    }
}
