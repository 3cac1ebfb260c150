//! Search-and-answer implementation.

use std::sync::Arc;

use crate::llm::{CompletionProvider, OpenAiClientBuilder};
use crate::provider::ProviderError;
use crate::search::{SearchProvider, SerperClientBuilder};

use super::error::ServiceError;
use super::types::Answer;

/// System message sent ahead of every prompt.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Answers free-text queries from web search results using an LLM.
pub struct SearchAnswerer {
    search: Arc<dyn SearchProvider>,
    llm: Arc<dyn CompletionProvider>,
}

impl SearchAnswerer {
    /// Creates a new `SearchAnswerer` from the given providers.
    #[must_use]
    pub fn new(search: Arc<dyn SearchProvider>, llm: Arc<dyn CompletionProvider>) -> Self {
        Self { search, llm }
    }

    /// Builds the production pipeline (Serper + OpenAI) from the environment.
    ///
    /// API keys are read here, once, at startup.
    ///
    /// # Errors
    ///
    /// Returns an error if either provider is misconfigured, e.g. a missing
    /// API key or an invalid URL override.
    pub fn from_env() -> Result<Self, ProviderError> {
        let search = SerperClientBuilder::new().build()?;
        let llm = OpenAiClientBuilder::new().build()?;
        tracing::info!(
            search_url = search.url(),
            llm_base_url = llm.base_url(),
            model = llm.model(),
            max_tokens = llm.max_tokens(),
            "providers configured"
        );
        Ok(Self::new(Arc::new(search), Arc::new(llm)))
    }

    /// Answers `query`.
    ///
    /// Runs search, context assembly and completion in sequence; the first
    /// failing stage ends the operation.
    pub async fn answer(&self, query: &str) -> Result<Answer, ServiceError> {
        let sources = self
            .search
            .search(query)
            .await
            .map_err(ServiceError::Search)?;

        let context = build_context(&sources);
        let prompt = build_prompt(query, &context);

        let completion = self
            .llm
            .complete(SYSTEM_PROMPT, &prompt)
            .await
            .map_err(ServiceError::Completion)?;

        Ok(Answer::new(completion.trim().to_string(), sources))
    }
}

/// Builds the prompt context: one placeholder line per source URL.
///
/// Page content is never fetched; each URL contributes `Content from {url}`.
pub fn build_context(sources: &[String]) -> String {
    sources
        .iter()
        .map(|url| format!("Content from {url}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds the user prompt from `query` and the assembled `context`.
pub fn build_prompt(query: &str, context: &str) -> String {
    format!(
        "Answer the following question based on the provided context:\n\n\
         Context: {context}\n\n\
         Question: {query}\nAnswer:"
    )
}
