//! Text extraction from various file formats

use crate::error::{Result, ResumeAtsError};
use crate::input::file_detector::looks_like_pdf;
use pulldown_cmark::{html, Parser};
use regex::Regex;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::OnceLock;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;
        extract_pdf_text(&bytes).map_err(|e| match e {
            ResumeAtsError::InvalidDocument(msg) => {
                ResumeAtsError::InvalidDocument(format!("'{}': {}", path.display(), msg))
            }
            other => other,
        })
    }
}

/// Concatenated text of every page of an in-memory PDF
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String> {
    if !looks_like_pdf(bytes) {
        return Err(ResumeAtsError::InvalidDocument("not a PDF document".to_string()));
    }

    // pdf-extract panics on some malformed inputs
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes)));

    match outcome {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(ResumeAtsError::InvalidDocument(format!("failed to extract text: {}", e))),
        Err(_) => Err(ResumeAtsError::InvalidDocument("PDF parser aborted on malformed input".to_string())),
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await?;
        Ok(content)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await?;
        Ok(markdown_to_text(&markdown_content))
    }
}

fn tag_regex() -> &'static Regex {
    static TAGS: OnceLock<Regex> = OnceLock::new();
    TAGS.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid tag regex"))
}

/// Render markdown and strip the markup, one non-blank line per block
pub fn markdown_to_text(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    let text = html_output
        .replace("<br>", "\n")
        .replace("</p>", "\n\n")
        .replace("</li>", "\n");

    let stripped = tag_regex().replace_all(&text, "");

    let decoded = stripped
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    decoded
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
