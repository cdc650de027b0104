//! resume-ats: score a resume against a job description, with AI feedback

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use resume_ats::cli::{self, Cli, Commands, ConfigAction, JobSource, LeaderboardAction, ModelAction};
use resume_ats::config::{Config, OutputFormat};
use resume_ats::context::AppContext;
use resume_ats::input::InputManager;
use resume_ats::output::{formatter_for, AnalysisOutput, ConsoleFormatter, OutputFormatter, ReportBuilder};
use resume_ats::processing::embedding_manager::EmbeddingModelManager;
use resume_ats::processing::{AnalysisEngine, MatchResult};
use resume_ats::shell::Session;
use resume_ats::storage::LeaderboardRepository;
use resume_ats::{Result, ResumeAtsError};
use std::path::Path;
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Analyze {
            resume,
            job,
            no_feedback,
            report,
            name,
            output,
        } => {
            let format = match output {
                Some(output) => cli::parse_output_format(&output).map_err(ResumeAtsError::InvalidInput)?,
                None => config.output.format,
            };
            let context = AppContext::from_env(config);
            let (resume_text, job_text, result) = analyze(&context, &resume, &job).await?;

            let feedback = if no_feedback {
                None
            } else {
                request_feedback(&context, &resume_text, &job_text).await
            };

            let formatter = formatter_for(format, context.config().output.color_output);
            let analysis = AnalysisOutput {
                result: &result,
                feedback: feedback.as_deref(),
            };
            println!("{}", formatter.format_analysis(&analysis)?);

            if let Some(path) = report {
                let path = path.unwrap_or_else(|| context.config().output.report_path.clone());
                ReportBuilder::new(&result, feedback.as_deref().unwrap_or_default()).write_to(&path)?;
                if format == OutputFormat::Console {
                    println!("📄 Report saved to {}", path.display());
                }
            }

            if let Some(name) = name {
                let table = context.leaderboard().submit(&name, result.score)?;
                if format == OutputFormat::Console {
                    let top = table.top(context.config().output.leaderboard_display);
                    println!("{}", formatter.format_leaderboard(top)?);
                }
            }
        }

        Commands::Chat { resume, question } => {
            let context = AppContext::from_env(config);
            let generator = context.feedback_generator()?;
            let resume_text = read_resume(&resume).await?;

            let answer = with_spinner("Asking the AI...", generator.chat_answer(&resume_text, &question)).await?;
            let formatter = ConsoleFormatter::new(context.config().output.color_output);
            println!("{}", formatter.format_generated("💬 Answer", &answer));
        }

        Commands::Interview { resume } => {
            let context = AppContext::from_env(config);
            let generator = context.feedback_generator()?;
            let resume_text = read_resume(&resume).await?;

            let questions = with_spinner("Preparing interview questions...", generator.mock_interview(&resume_text)).await?;
            let formatter = ConsoleFormatter::new(context.config().output.color_output);
            println!("{}", formatter.format_generated("🎤 Mock Interview", &questions));
        }

        Commands::Session { resume, job } => {
            let context = AppContext::from_env(config);
            let (resume_text, job_text, result) = analyze(&context, &resume, &job).await?;

            let generator = match context.feedback_generator() {
                Ok(generator) => Some(generator),
                Err(e) => {
                    warn!("AI features disabled: {}", e);
                    None
                }
            };

            let output = &context.config().output;
            let mut session = Session::new(
                resume_text,
                job_text,
                result.clone(),
                generator,
                context.leaderboard(),
                output.report_path.clone(),
            )
            .with_colors(output.color_output)
            .with_leaderboard_display(output.leaderboard_display);

            if context.has_api_key() {
                if let Err(e) = with_spinner("Requesting AI feedback...", session.refresh_feedback()).await {
                    warn!("Feedback unavailable: {}", e);
                }
            }

            let formatter = ConsoleFormatter::new(output.color_output);
            let analysis = AnalysisOutput {
                result: &result,
                feedback: session.feedback(),
            };
            println!("{}", formatter.format_analysis(&analysis)?);

            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            session.run(stdin.lock(), &mut stdout).await?;
        }

        Commands::Leaderboard { action } => {
            let context = AppContext::with_api_key(config, None);
            let output = &context.config().output;
            let formatter = formatter_for(output.format, output.color_output);

            let (table, rows) = match action {
                LeaderboardAction::Show { top } => {
                    (context.leaderboard().load()?, top.unwrap_or(output.leaderboard_display))
                }
                LeaderboardAction::Submit { name, score } => {
                    (context.leaderboard().submit(&name, score)?, output.leaderboard_display)
                }
            };
            println!("{}", formatter.format_leaderboard(table.top(rows))?);
        }

        Commands::Models { action } => match action {
            ModelAction::List => {
                let manager = EmbeddingModelManager::new(config.models_dir().clone()).await?;
                let configured = EmbeddingModelManager::resolve_known(&config.models.embedding_model);

                println!("🧠 Embedding Models\n");
                for model in EmbeddingModelManager::known_models() {
                    let status = if manager.is_model_downloaded(model.id) {
                        "✅ Downloaded"
                    } else {
                        "⬇️  Available"
                    };
                    let marker = if configured == Some(model.id) { " (configured)" } else { "" };
                    println!("  • {} ({}) - {} MB [{}]{}", model.id, model.repo_id, model.size_mb, status, marker);
                    println!("    {}", model.description);
                }
                println!("\n💡 Models not downloaded are fetched from the Hugging Face Hub on first use.");
            }
            ModelAction::Download { model } => {
                let manager = EmbeddingModelManager::new(config.models_dir().clone()).await?;
                let path = with_spinner(&format!("Downloading {}...", model), manager.download_model(&model)).await?;
                println!("✅ Model '{}' ready at {}", model, path.display());
            }
            ModelAction::Info { model } => {
                let info = EmbeddingModelManager::resolve_known(&model)
                    .and_then(EmbeddingModelManager::known_model)
                    .ok_or_else(|| ResumeAtsError::InvalidInput(format!("Unknown embedding model: {}", model)))?;
                let local = config.models_dir().join(info.id);

                println!("🧠 {}", info.name);
                println!("  ID: {}", info.id);
                println!("  Repository: {}", info.repo_id);
                println!("  Size: {} MB", info.size_mb);
                println!("  Dimensions: {}", info.dimensions);
                println!("  {}", info.description);
                if EmbeddingModelManager::is_valid_model_directory(&local) {
                    println!("  Location: {}", local.display());
                } else {
                    println!("  Not downloaded: resume-ats models download {}", info.id);
                }
            }
        },

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                let rendered = toml::to_string_pretty(&config)
                    .map_err(|e| ResumeAtsError::Configuration(format!("Failed to serialize config: {}", e)))?;
                println!("⚙️  Current Configuration ({})\n", config_path.display());
                println!("{}", rendered);
            }
            Some(ConfigAction::Path) => println!("{}", config_path.display()),
            Some(ConfigAction::Reset) => {
                Config::default().save_to(config_path)?;
                println!("✅ Configuration reset: {}", config_path.display());
            }
        },
    }

    Ok(())
}

async fn read_resume(path: &Path) -> Result<String> {
    cli::validate_file_extension(path, &["pdf", "txt", "md"])
        .map_err(|e| ResumeAtsError::InvalidInput(format!("Resume file: {}", e)))?;
    InputManager::new().extract_text(path).await
}

/// Extract both texts, embed and score
async fn analyze(context: &AppContext, resume: &Path, job: &JobSource) -> Result<(String, String, MatchResult)> {
    let input = InputManager::new();
    let resume_text = read_resume(resume).await?;
    let job_text = input
        .job_description(job.job.as_deref(), job.job_text.as_deref())
        .await?;
    info!(
        "Resume: {} chars, job description: {} chars",
        resume_text.len(),
        job_text.len()
    );

    let spinner = spinner("Loading embedding model...");
    let embedder = context.embedder();
    spinner.finish_and_clear();
    let embedder = embedder?;

    let matcher = context.skill_matcher()?;
    let engine = AnalysisEngine::new(&embedder, &matcher, context.scoring_policy());
    let result = engine.score_and_gap(&resume_text, &job_text)?;

    Ok((resume_text, job_text, result))
}

/// Feedback is optional for `analyze`; failures are reported and skipped
async fn request_feedback(context: &AppContext, resume: &str, job: &str) -> Option<String> {
    let generator = match context.feedback_generator() {
        Ok(generator) => generator,
        Err(e) => {
            warn!("Skipping AI feedback: {}", e);
            return None;
        }
    };

    match with_spinner("Requesting AI feedback...", generator.feedback(resume, job)).await {
        Ok(feedback) => Some(feedback),
        Err(e) => {
            warn!("AI feedback failed: {}", e);
            None
        }
    }
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

async fn with_spinner<T>(message: &str, future: impl std::future::Future<Output = Result<T>>) -> Result<T> {
    let spinner = spinner(message);
    let result = future.await;
    spinner.finish_and_clear();
    result
}
