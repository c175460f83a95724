//! Schema Normalization
//!
//! Turns an untrusted JSON object into a [`Problem`]. The function is total:
//! every input, including an extraction failure, yields a well-formed problem.
//! Repairs are silent to the caller and only visible in debug logs.

use serde_json::{Map, Value};

use crate::error::ExtractionError;
use crate::problem::{Problem, ProblemType, missing_options, placeholder_options};

/// Normalize the extractor's output into a problem
pub fn normalize(raw: Result<Map<String, Value>, ExtractionError>) -> Problem {
    match raw {
        Ok(object) => normalize_object(object),
        Err(e) => {
            tracing::warn!(error = %e, "Model reply was not parseable, substituting parse-error problem");
            Problem::parse_error()
        }
    }
}

/// Validate and repair a parsed object against the problem schema
pub fn normalize_object(mut raw: Map<String, Value>) -> Problem {
    let mut repairs: Vec<&'static str> = Vec::new();

    let title = take_text(&mut raw, "title")
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| {
            repairs.push("title");
            sentinel("title")
        });

    let content = take_text(&mut raw, "content").unwrap_or_else(|| {
        repairs.push("content");
        sentinel("content")
    });

    let kind = take_text(&mut raw, "type").map_or_else(
        || {
            repairs.push("type");
            ProblemType::Other(sentinel("type"))
        },
        ProblemType::from,
    );

    let options = match raw.remove("options") {
        None => {
            repairs.push("options");
            missing_options()
        }
        Some(Value::Array(items)) => items.into_iter().filter_map(render).collect(),
        Some(_) => {
            repairs.push("options");
            placeholder_options()
        }
    };

    let mut answer = take_text(&mut raw, "answer").unwrap_or_else(|| {
        repairs.push("answer");
        sentinel("answer")
    });

    let category = take_text(&mut raw, "category").unwrap_or_else(|| {
        repairs.push("category");
        sentinel("category")
    });

    let difficulty = take_text(&mut raw, "difficulty");

    if let Some(first) = options.first() {
        if !options.contains(&answer) {
            repairs.push("answer");
            answer = first.clone();
        }
    }

    if !repairs.is_empty() {
        tracing::debug!(fields = ?repairs, "Repaired problem fields");
    }

    let problem = Problem {
        title,
        content,
        kind,
        options,
        answer,
        category,
        difficulty,
        extra: raw,
    };
    debug_assert!(problem.is_well_formed());
    problem
}

fn sentinel(field: &str) -> String {
    format!("Missing {field}")
}

/// Remove `key` and render it as text; `null` counts as absent
fn take_text(raw: &mut Map<String, Value>, key: &str) -> Option<String> {
    raw.remove(key).and_then(render)
}

fn render(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{MISSING_OPTIONS, PLACEHOLDER_OPTIONS};
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    fn complete() -> Value {
        json!({
            "title": "Capital cities",
            "content": "What is the capital of France?",
            "type": "select",
            "options": ["Paris", "Lyon", "Nice", "Lille"],
            "answer": "Paris",
            "category": "Geography/Europe/Capitals"
        })
    }

    #[test]
    fn test_complete_object_passes_through() {
        let problem = normalize_object(object(complete()));

        assert_eq!(problem.title, "Capital cities");
        assert_eq!(problem.kind, ProblemType::Select);
        assert_eq!(problem.options.len(), 4);
        assert_eq!(problem.answer, "Paris");
        assert_eq!(problem.category, "Geography/Europe/Capitals");
        assert!(problem.difficulty.is_none());
        assert!(problem.extra.is_empty());
    }

    #[test]
    fn test_answer_not_in_options_is_substituted() {
        let problem = normalize_object(object(json!({
            "title": "t", "content": "c", "type": "select",
            "options": ["A", "B"], "answer": "C", "category": "x"
        })));
        assert_eq!(problem.answer, "A");
    }

    #[test]
    fn test_missing_category_gets_sentinel() {
        let mut raw = complete();
        raw.as_object_mut().unwrap().remove("category");

        let problem = normalize_object(object(raw));
        assert_eq!(problem.category, "Missing category");
    }

    #[test]
    fn test_empty_object_is_fully_repaired() {
        let problem = normalize_object(Map::new());

        assert_eq!(problem.title, "Missing title");
        assert_eq!(problem.content, "Missing content");
        assert_eq!(problem.kind.as_str(), "Missing type");
        assert_eq!(problem.options, vec!["Option 1", "Option 2"]);
        assert_eq!(problem.answer, "Option 1");
        assert_eq!(problem.category, "Missing category");
        assert!(problem.is_well_formed());
    }

    #[test]
    fn test_scalar_options_replaced_with_placeholder() {
        let mut raw = complete();
        raw["options"] = json!("Paris, Lyon");
        raw["answer"] = json!("Paris");

        let problem = normalize_object(object(raw));
        assert_eq!(problem.options, vec!["Option 1", "Option 2", "Option 3", "Option 4"]);
        assert_eq!(problem.answer, "Option 1");
    }

    #[test]
    fn test_empty_options_keep_answer() {
        let problem = normalize_object(object(json!({
            "title": "Essay", "content": "Explain entropy.", "type": "write",
            "options": [], "answer": "Entropy measures disorder.", "category": "Physics"
        })));

        assert!(problem.options.is_empty());
        assert_eq!(problem.answer, "Entropy measures disorder.");
        assert_eq!(problem.kind, ProblemType::Write);
    }

    #[test]
    fn test_null_title_treated_as_missing() {
        let mut raw = complete();
        raw["title"] = Value::Null;

        assert_eq!(normalize_object(object(raw)).title, "Missing title");
    }

    #[test]
    fn test_null_options_replaced_with_placeholder() {
        let problem = normalize_object(object(json!({
            "title": "t", "content": "c", "type": "select",
            "options": null, "answer": "x", "category": "k"
        })));

        assert_eq!(problem.options, PLACEHOLDER_OPTIONS);
        assert_eq!(problem.answer, "Option 1");
    }

    #[test]
    fn test_absent_options_get_two_entry_placeholder() {
        let mut raw = object(complete());
        raw.remove("options");

        let problem = normalize_object(raw);
        assert_eq!(problem.options, MISSING_OPTIONS);
    }

    #[test]
    fn test_blank_title_gets_sentinel() {
        let mut raw = complete();
        raw["title"] = json!("   ");

        assert_eq!(normalize_object(object(raw)).title, "Missing title");
    }

    #[test]
    fn test_numeric_values_rendered_as_text() {
        let problem = normalize_object(object(json!({
            "title": "Arithmetic", "content": "1 + 1 = ?", "type": "select",
            "options": [1, 2, null, 3], "answer": 2, "category": "Math"
        })));

        assert_eq!(problem.options, vec!["1", "2", "3"]);
        assert_eq!(problem.answer, "2");
    }

    #[test]
    fn test_unexpected_type_is_not_coerced() {
        let mut raw = complete();
        raw["type"] = json!("multiple-choice");

        let problem = normalize_object(object(raw));
        assert_eq!(problem.kind, ProblemType::Other("multiple-choice".into()));
    }

    #[test]
    fn test_unknown_fields_pass_through() {
        let mut raw = complete();
        raw["difficulty"] = json!("easy");
        raw["explanation"] = json!({"why": "Paris is the capital"});

        let problem = normalize_object(object(raw));
        assert_eq!(problem.difficulty.as_deref(), Some("easy"));
        assert_eq!(problem.extra["explanation"]["why"], "Paris is the capital");
    }

    #[test]
    fn test_extraction_error_yields_parse_error_problem() {
        let problem = normalize(Err(ExtractionError::NoJsonFound));
        assert_eq!(problem, Problem::parse_error());
        assert_eq!(problem.category, "Error");

        let problem = normalize(Err(ExtractionError::MalformedJson("eof".into())));
        assert_eq!(problem.category, "Error");
    }

    #[test]
    fn test_extract_then_normalize() {
        let reply = "Here you go:\n```json\n{\"title\": \"Primes\", \"content\": \"Which is prime?\", \
                     \"type\": \"select\", \"options\": [\"4\", \"6\", \"7\", \"9\"], \
                     \"answer\": \"7\", \"category\": \"Math/Number theory\"}\n```";

        let problem = normalize(crate::extract::extract(reply));
        assert_eq!(problem.answer, "7");
        assert!(!problem.is_error());
    }

    #[test]
    fn test_totality_over_assorted_shapes() {
        let shapes = [
            json!({}),
            json!({"options": {"a": 1}}),
            json!({"options": [null, null], "answer": null}),
            json!({"title": 3.5, "content": true, "type": ["select"], "category": {}}),
            json!({"options": ["only"], "answer": "only"}),
        ];

        for shape in shapes {
            let problem = normalize_object(object(shape));
            assert!(problem.is_well_formed(), "{problem:?}");
            if !problem.options.is_empty() {
                assert!(problem.options.contains(&problem.answer));
            }
        }
    }
}
