//! Problem Model
//!
//! The output contract of the engine: one educational question, either
//! multiple choice (`select`) or free text (`write`).
//!
//! Multiple-choice options always live in the separate `options` list.
//! Prompts ask for that shape and the normalizer repairs against it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Options used when the model sent a non-list `options` value
pub const PLACEHOLDER_OPTIONS: [&str; 4] = ["Option 1", "Option 2", "Option 3", "Option 4"];

/// Options used when the model omitted `options` entirely
pub const MISSING_OPTIONS: [&str; 2] = ["Option 1", "Option 2"];

/// Category of the Parse-Error Problem
pub const ERROR_CATEGORY: &str = "Error";

/// Category of Fallback and Unsupported-Backend Problems
pub const FALLBACK_CATEGORY: &str = "Error/Fallback";

/// Kind of question
///
/// Values outside `select`/`write` are kept verbatim rather than coerced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProblemType {
    /// Multiple choice
    Select,
    /// Essay / free response
    Write,
    /// Anything else the model produced
    Other(String),
}

impl ProblemType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Select => "select",
            Self::Write => "write",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for ProblemType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "select" => Self::Select,
            "write" => Self::Write,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for ProblemType {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<ProblemType> for String {
    fn from(kind: ProblemType) -> Self {
        match kind {
            ProblemType::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ProblemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generated problem
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    /// Short title
    pub title: String,

    /// Full problem statement
    pub content: String,

    /// `select` or `write`
    #[serde(rename = "type")]
    pub kind: ProblemType,

    /// Choices for multiple-choice questions
    pub options: Vec<String>,

    /// Correct answer; a member of `options` whenever `options` is non-empty
    pub answer: String,

    /// Subject path such as `Math/Probability/Conditional`
    pub category: String,

    /// Optional difficulty label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,

    /// Fields outside the schema, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Problem {
    /// Problem returned when the model's reply was not parseable JSON
    pub fn parse_error() -> Self {
        let options = owned(&PLACEHOLDER_OPTIONS);
        Self {
            title: "Parsing Error".into(),
            content: "The language model response could not be parsed as JSON.".into(),
            kind: ProblemType::Select,
            answer: options[0].clone(),
            options,
            category: ERROR_CATEGORY.into(),
            difficulty: None,
            extra: Map::new(),
        }
    }

    /// Problem returned when the backend call itself failed
    pub fn fallback(backend: &str, error: impl std::fmt::Display) -> Self {
        let options = vec![
            "Retry with a different prompt".to_string(),
            format!("Check {backend} backend status"),
            "Use a more specific prompt".to_string(),
            "Contact system administrator".to_string(),
        ];
        Self {
            title: "LLM Error Fallback".into(),
            content: format!("An error occurred while generating a problem with {backend}: {error}"),
            kind: ProblemType::Select,
            answer: options[1].clone(),
            options,
            category: FALLBACK_CATEGORY.into(),
            difficulty: Some("N/A".into()),
            extra: Map::new(),
        }
    }

    /// Problem returned when the requested backend is not registered
    pub fn unsupported_backend(name: &str) -> Self {
        let options = vec![
            "Choose a supported backend".to_string(),
            "Contact system administrator".to_string(),
        ];
        Self {
            title: "Unsupported Backend".into(),
            content: format!("Unsupported LLM backend: {name:?}"),
            kind: ProblemType::Select,
            answer: options[0].clone(),
            options,
            category: FALLBACK_CATEGORY.into(),
            difficulty: Some("N/A".into()),
            extra: Map::new(),
        }
    }

    /// Whether this is one of the substitute problems rather than model output
    pub fn is_error(&self) -> bool {
        self.category == ERROR_CATEGORY || self.category == FALLBACK_CATEGORY
    }

    /// Whether this is the substitute for an unparseable model reply
    pub fn is_parse_error(&self) -> bool {
        *self == Self::parse_error()
    }

    /// Check the invariants the normalizer guarantees
    pub fn is_well_formed(&self) -> bool {
        !self.title.trim().is_empty()
            && (self.options.is_empty() || self.options.contains(&self.answer))
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

pub(crate) fn placeholder_options() -> Vec<String> {
    owned(&PLACEHOLDER_OPTIONS)
}

pub(crate) fn missing_options() -> Vec<String> {
    owned(&MISSING_OPTIONS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_type_roundtrip() {
        let kind: ProblemType = serde_json::from_value(serde_json::json!("select")).unwrap();
        assert_eq!(kind, ProblemType::Select);

        let kind: ProblemType = serde_json::from_value(serde_json::json!("essay")).unwrap();
        assert_eq!(kind, ProblemType::Other("essay".into()));
        assert_eq!(serde_json::to_value(&kind).unwrap(), serde_json::json!("essay"));
    }

    #[test]
    fn test_serialized_shape() {
        let mut problem = Problem::parse_error();
        problem.extra.insert("source".into(), serde_json::json!("test"));

        let value = serde_json::to_value(&problem).unwrap();
        assert_eq!(value["type"], "select");
        assert_eq!(value["category"], "Error");
        assert_eq!(value["answer"], "Option 1");
        assert_eq!(value["source"], "test");
        assert!(value.get("difficulty").is_none());
    }

    #[test]
    fn test_canned_problems_are_well_formed() {
        let fallback = Problem::fallback("ollama", "connection refused");
        assert!(fallback.is_well_formed());
        assert!(fallback.is_error());
        assert_eq!(fallback.category, "Error/Fallback");
        assert!(fallback.content.contains("connection refused"));
        assert_eq!(fallback.answer, "Check ollama backend status");

        let unsupported = Problem::unsupported_backend("gemini");
        assert!(unsupported.is_well_formed());
        assert!(unsupported.content.contains("gemini"));

        assert!(Problem::parse_error().is_well_formed());
    }

    #[test]
    fn test_model_error_category_is_not_parse_error() {
        let problem = Problem {
            title: "Error handling".into(),
            content: "Which keyword propagates an error in Rust?".into(),
            kind: ProblemType::Select,
            options: vec!["?".into(), "try".into()],
            answer: "?".into(),
            category: ERROR_CATEGORY.into(),
            difficulty: None,
            extra: Map::new(),
        };

        assert!(problem.is_error());
        assert!(!problem.is_parse_error());
        assert!(Problem::parse_error().is_parse_error());
        assert!(!Problem::fallback("ollama", "timeout").is_parse_error());
    }
}
