//! Search-then-answer pipeline.
//!
//! This module provides the `SearchAnswerer` struct, which sends a query to the
//! web-search provider, turns the returned links into a prompt context and asks
//! the language-model provider for an answer.

mod error;
mod search_answerer;
mod types;

pub use error::ServiceError;
pub use search_answerer::{SYSTEM_PROMPT, SearchAnswerer, build_context, build_prompt};
pub use types::Answer;
