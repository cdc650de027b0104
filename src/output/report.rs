//! PDF export of an analysis: score, skill lists and model feedback

use crate::error::{Result, ResumeAtsError};
use crate::llm::feedback::feedback_lines;
use crate::processing::MatchResult;
use log::{debug, info};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument};
use std::path::Path;

pub const REPORT_TITLE: &str = "AI Resume ATS Report";

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const FOOTER_Y_MM: f32 = 10.0;
const PT_TO_MM: f32 = 0.3528;
const LINE_SPACING: f32 = 1.4;
const BULLET_INDENT_MM: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Title,
    Heading,
    Body,
}

impl LineStyle {
    pub fn font_size(&self) -> f32 {
        match self {
            LineStyle::Title => 18.0,
            LineStyle::Heading => 14.0,
            LineStyle::Body => 11.0,
        }
    }

    fn is_bold(&self) -> bool {
        !matches!(self, LineStyle::Body)
    }

    /// Vertical space one line takes, in millimetres
    pub fn line_height(&self) -> f32 {
        self.font_size() * PT_TO_MM * LINE_SPACING
    }

    /// Rough Helvetica capacity: average glyph is about half the point size wide
    fn columns(&self, width_mm: f32) -> usize {
        let width_pt = width_mm / PT_TO_MM;
        ((width_pt / (self.font_size() * 0.5)) as usize).max(10)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    pub text: String,
    pub style: LineStyle,
    pub indent_mm: f32,
}

impl ReportLine {
    fn new(text: impl Into<String>, style: LineStyle, indent_mm: f32) -> Self {
        Self {
            text: text.into(),
            style,
            indent_mm,
        }
    }
}

/// A line with its baseline position on a page
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub line: ReportLine,
    pub y_mm: f32,
}

pub struct ReportBuilder {
    score: f64,
    found: Vec<String>,
    missing: Vec<String>,
    feedback: String,
}

impl ReportBuilder {
    pub fn new(result: &MatchResult, feedback: &str) -> Self {
        Self {
            score: result.score,
            found: result.found.clone(),
            missing: result.missing.clone(),
            feedback: feedback.to_string(),
        }
    }

    /// Document content in reading order, already wrapped to the page width
    pub fn lines(&self) -> Vec<ReportLine> {
        let content_width = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
        let mut lines = Vec::new();

        lines.push(ReportLine::new(REPORT_TITLE, LineStyle::Title, 0.0));
        lines.push(ReportLine::new(format!("ATS Score: {}%", self.score), LineStyle::Heading, 0.0));

        let sections = [
            ("Skills Found", self.found.iter().map(String::as_str).collect::<Vec<_>>()),
            ("Missing Skills", self.missing.iter().map(String::as_str).collect()),
            ("AI Feedback & Tips", feedback_lines(&self.feedback)),
        ];

        for (heading, items) in sections {
            lines.push(ReportLine::new(heading, LineStyle::Heading, 0.0));
            let columns = LineStyle::Body.columns(content_width - BULLET_INDENT_MM);
            for item in items {
                let item = strip_bullet(item);
                for (i, chunk) in wrap(&sanitize(item), columns).into_iter().enumerate() {
                    // Continuation lines hang under the bullet text
                    let (text, indent) = if i == 0 {
                        (format!("- {}", chunk), 0.0)
                    } else {
                        (chunk, BULLET_INDENT_MM)
                    };
                    lines.push(ReportLine::new(text, LineStyle::Body, indent));
                }
            }
        }

        lines
    }

    pub fn render(&self) -> Result<Vec<u8>> {
        let pages = paginate(self.lines(), PAGE_HEIGHT_MM - MARGIN_MM, MARGIN_MM);
        let generated = chrono::Local::now().format("%Y-%m-%d %H:%M").to_string();

        let (doc, first_page, first_layer) =
            PdfDocument::new(REPORT_TITLE, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ResumeAtsError::Report(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ResumeAtsError::Report(e.to_string()))?;

        let page_count = pages.len();
        for (index, page) in pages.iter().enumerate() {
            let (page_ref, layer_ref) = if index == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1")
            };
            let layer = doc.get_page(page_ref).get_layer(layer_ref);

            for placed in page {
                let font: &IndirectFontRef = if placed.line.style.is_bold() { &bold } else { &regular };
                layer.use_text(
                    placed.line.text.as_str(),
                    placed.line.style.font_size(),
                    Mm(MARGIN_MM + placed.line.indent_mm),
                    Mm(placed.y_mm),
                    font,
                );
            }

            let footer = format!("Generated {}  |  Page {} of {}", generated, index + 1, page_count);
            layer.use_text(footer, 8.0, Mm(MARGIN_MM), Mm(FOOTER_Y_MM), &regular);
        }

        debug!("laid out report on {} page(s)", page_count);
        doc.save_to_bytes().map_err(|e| ResumeAtsError::Report(e.to_string()))
    }

    /// Render and overwrite `path`
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let bytes = self.render()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, bytes)?;
        info!("Report written to {}", path.display());
        Ok(())
    }
}

/// Split lines into pages top to bottom, starting a new page when the next
/// line would cross the bottom margin. Always yields at least one page.
pub fn paginate(lines: Vec<ReportLine>, top_mm: f32, bottom_mm: f32) -> Vec<Vec<PlacedLine>> {
    let mut pages = vec![Vec::new()];
    let mut y = top_mm;

    for line in lines {
        let height = line.style.line_height();
        // Headings get a little air above them, except at the top of a page
        let gap = if line.style == LineStyle::Heading && y < top_mm { height * 0.5 } else { 0.0 };

        let mut next_y = y - gap - height;
        if next_y < bottom_mm && !pages.last().map_or(true, Vec::is_empty) {
            pages.push(Vec::new());
            next_y = top_mm - height;
        }

        y = next_y;
        if let Some(page) = pages.last_mut() {
            page.push(PlacedLine { line, y_mm: y });
        }
    }

    pages
}

/// Model output often brings its own bullet markers
fn strip_bullet(item: &str) -> &str {
    ["- ", "* ", "\u{2022} "]
        .iter()
        .find_map(|marker| item.strip_prefix(marker))
        .map_or(item, str::trim_start)
}

/// Greedy word wrap on character count; words longer than a line are split
pub fn wrap(text: &str, columns: usize) -> Vec<String> {
    let columns = columns.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > columns {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            lines.push(word.drain(..columns).collect());
        }
        let word: String = word.into_iter().collect();
        if word.is_empty() {
            continue;
        }

        let needed = if current.is_empty() { word.chars().count() } else { current.chars().count() + 1 + word.chars().count() };
        if needed > columns && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Builtin PDF fonts only cover a single-byte encoding; keep printable ASCII
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '\u{2018}' | '\u{2019}' => Some('\''),
            '\u{201C}' | '\u{201D}' => Some('"'),
            '\u{2013}' | '\u{2014}' => Some('-'),
            '\u{2022}' | '\u{25CF}' => Some('*'),
            '\t' => Some(' '),
            c if c.is_control() => None,
            c if c.is_ascii() => Some(c),
            _ => Some('?'),
        })
        .collect()
}
