//! Input manager for handling different file types

use crate::error::{Result, ResumeAtsError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor};
use log::info;
use std::path::Path;

/// Routes a file to its extractor. Every call re-reads the file.
#[derive(Debug, Default)]
pub struct InputManager;

impl InputManager {
    pub fn new() -> Self {
        Self
    }

    pub async fn extract_text(&self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(ResumeAtsError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let text = match self.detect_file_type(path)? {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await?
            }
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Unknown => {
                return Err(ResumeAtsError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )));
            }
        };

        Ok(text)
    }

    /// Job descriptions come either inline or from a text/markdown file
    pub async fn job_description(&self, file: Option<&Path>, inline: Option<&str>) -> Result<String> {
        let text = match (file, inline) {
            (_, Some(text)) => text.to_string(),
            (Some(path), None) => {
                if self.detect_file_type(path)? == FileType::Pdf {
                    return Err(ResumeAtsError::UnsupportedFormat(
                        "job descriptions are read from .txt or .md files".to_string(),
                    ));
                }
                self.extract_text(path).await?
            }
            (None, None) => {
                return Err(ResumeAtsError::InvalidInput("no job description supplied".to_string()));
            }
        };

        if text.trim().is_empty() {
            return Err(ResumeAtsError::InvalidInput("job description is empty".to_string()));
        }
        Ok(text)
    }

    fn detect_file_type(&self, path: &Path) -> Result<FileType> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| ResumeAtsError::InvalidInput(format!("File has no extension: {}", path.display())))?;

        Ok(FileType::from_extension(extension))
    }
}
