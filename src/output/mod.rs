//! Presentation: console/JSON formatting and the PDF report

pub mod formatter;
pub mod report;

pub use formatter::{formatter_for, AnalysisOutput, ConsoleFormatter, JsonFormatter, OutputFormatter};
pub use report::ReportBuilder;
