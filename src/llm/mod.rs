//! Hosted language model integration

pub mod prompts;
pub mod client;
pub mod feedback;

pub use client::{GeminiClient, TextGenerator};
pub use feedback::FeedbackGenerator;
