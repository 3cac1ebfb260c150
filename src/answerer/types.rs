//! Types produced by the answer pipeline.

use serde::{Deserialize, Serialize};

/// A generated answer together with the links it was grounded on.
///
/// Serializes to the wire shape of `POST /api/search`:
/// `{"response": "...", "sources": ["...", ...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// The generated answer text
    response: String,
    /// Source links in search-provider order
    #[serde(default)]
    sources: Vec<String>,
}

impl Answer {
    /// Creates a new answer.
    pub fn new(response: String, sources: Vec<String>) -> Self {
        Self { response, sources }
    }

    /// Returns the answer text.
    pub fn response(&self) -> &str {
        &self.response
    }

    /// Returns the source links.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Splits the answer into its text and sources.
    pub fn into_parts(self) -> (String, Vec<String>) {
        (self.response, self.sources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_serializes_to_wire_shape() {
        let answer = Answer::new("Paris".to_string(), vec!["https://a.example".to_string()]);
        let json = serde_json::to_value(&answer).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"response": "Paris", "sources": ["https://a.example"]})
        );
    }

    #[test]
    fn answer_deserializes_without_sources() {
        let answer: Answer = serde_json::from_str(r#"{"response": "Hi"}"#).unwrap();
        assert_eq!(answer.response(), "Hi");
        assert!(answer.sources().is_empty());
    }
}
