//! CLI interface for the resume ATS scorer

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-ats")]
#[command(about = "Score a resume against a job description")]
#[command(long_about = "Score resume/job similarity with embeddings, list matched and missing skills, get AI feedback, practice interview questions and keep a leaderboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a resume against a job description
    Analyze {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        #[command(flatten)]
        job: JobSource,

        /// Skip the AI feedback request
        #[arg(long)]
        no_feedback: bool,

        /// Write the PDF report (to the configured path unless one is given)
        #[arg(long)]
        report: Option<Option<PathBuf>>,

        /// Submit the score to the leaderboard under this name
        #[arg(short, long)]
        name: Option<String>,

        /// Output format: console, json
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Ask a question about a resume
    Chat {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Question to ask
        #[arg(short, long)]
        question: String,
    },

    /// Generate mock interview questions from a resume
    Interview {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,
    },

    /// Analyze once, then keep asking, reporting and submitting interactively
    Session {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        #[command(flatten)]
        job: JobSource,
    },

    /// Leaderboard commands
    Leaderboard {
        #[command(subcommand)]
        action: LeaderboardAction,
    },

    /// Embedding model management commands
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(clap::Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct JobSource {
    /// Path to job description file (TXT, MD)
    #[arg(short, long)]
    pub job: Option<PathBuf>,

    /// Job description text
    #[arg(long)]
    pub job_text: Option<String>,
}

#[derive(Subcommand)]
pub enum LeaderboardAction {
    /// Show the top entries
    Show {
        /// Number of rows to show
        #[arg(short, long)]
        top: Option<usize>,
    },

    /// Add a score by hand
    Submit {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        score: f64,
    },
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// List known embedding models
    List,

    /// Download an embedding model into the models directory
    Download {
        /// Model id, name or HuggingFace repo ID
        model: String,
    },

    /// Show model information
    Info {
        /// Model id
        model: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Reset configuration to defaults
    Reset,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        _ => Err(format!("Invalid output format: {}. Supported: console, json", format)),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("JSON"), Ok(OutputFormat::Json));
        assert_eq!(parse_output_format("console"), Ok(OutputFormat::Console));
        assert!(parse_output_format("html").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        let allowed = ["pdf", "txt", "md"];
        assert!(validate_file_extension(&PathBuf::from("cv.PDF"), &allowed).is_ok());
        assert!(validate_file_extension(&PathBuf::from("cv.docx"), &allowed).is_err());
        assert!(validate_file_extension(&PathBuf::from("cv"), &allowed).is_err());
        assert!(validate_file_extension(Path::new("notes/cv.md"), &allowed).is_ok());
    }

    #[test]
    fn test_job_source_is_exclusive() {
        let parsed = Cli::try_parse_from([
            "resume-ats", "analyze", "-r", "cv.pdf", "--job", "job.txt", "--job-text", "x",
        ]);
        assert!(parsed.is_err());

        let parsed = Cli::try_parse_from(["resume-ats", "analyze", "-r", "cv.pdf"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_report_flag_without_value() {
        let cli = Cli::try_parse_from([
            "resume-ats", "analyze", "-r", "cv.pdf", "--job-text", "Python dev", "--report",
        ])
        .unwrap();

        match cli.command {
            Commands::Analyze { report, job, .. } => {
                assert_eq!(report, Some(None));
                assert_eq!(job.job_text.as_deref(), Some("Python dev"));
            }
            _ => panic!("expected analyze"),
        }
    }
}
