//! Resume ATS scorer library

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod input;
pub mod llm;
pub mod output;
pub mod processing;
pub mod shell;
pub mod storage;

pub use config::Config;
pub use error::{Result, ResumeAtsError};
