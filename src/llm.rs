/// Language-model provider client module.
///
/// This module provides an async HTTP client for OpenAI-compatible chat
/// completion APIs, including error handling and timeout configuration.
mod client;

pub use client::{
    CompletionProvider, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, OpenAiClient, OpenAiClientBuilder,
    first_choice_text,
};
