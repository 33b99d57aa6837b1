pub mod llm_service;
pub mod output_writer;
pub mod rater;

pub use llm_service::{GenerationParams, LlmService};
pub use output_writer::OutputWriter;
pub use rater::{build_rating_prompt, parse_rating, ClaudeRater, ImportanceRater};
