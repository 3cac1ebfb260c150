/// Web search provider client module.
///
/// This module provides the Serper-backed search client used by the query
/// service to turn a free-text query into an ordered list of source links.
mod client;

pub use client::{SearchProvider, SerperClient, SerperClientBuilder, extract_links};
