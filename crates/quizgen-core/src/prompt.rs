//! Prompt Templates
//!
//! Each tool pairs a fixed system instruction with a delimiter; the user's
//! request is appended after the delimiter. Backends receive the composed
//! string as-is.

/// System instruction plus the separator placed before the user request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PromptTemplate {
    /// Template identifier, used in logs
    pub name: &'static str,

    /// Fixed instruction prepended to every request
    pub system: &'static str,

    /// Separator between the instruction and the user request
    pub delimiter: &'static str,
}

impl PromptTemplate {
    /// Build the full prompt sent to a backend
    pub fn compose(&self, user_prompt: &str) -> String {
        let mut prompt =
            String::with_capacity(self.system.len() + self.delimiter.len() + user_prompt.len());
        prompt.push_str(self.system);
        prompt.push_str(self.delimiter);
        prompt.push_str(user_prompt);
        prompt
    }
}

/// General-purpose generator used by `generate_problem`
pub const GENERAL: PromptTemplate = PromptTemplate {
    name: "general",
    system: GENERAL_SYSTEM,
    delimiter: "\n\n",
};

/// Simple multiple-choice generator used by `generate_problem_mistral`
pub const SIMPLE_SELECT: PromptTemplate = PromptTemplate {
    name: "simple_select",
    system: SIMPLE_SELECT_SYSTEM,
    delimiter: "\n\nUser Request: ",
};

/// Intermediate/advanced generator used by `generate_problem_with_gpt`
pub const ADVANCED: PromptTemplate = PromptTemplate {
    name: "advanced",
    system: ADVANCED_SYSTEM,
    delimiter: "\n\nUser Request: ",
};

/// Classifier used for advisory routing between the two named tools
pub const ROUTING: PromptTemplate = PromptTemplate {
    name: "routing",
    system: ROUTING_SYSTEM,
    delimiter: "\n\nUser prompt:\n",
};

const GENERAL_SYSTEM: &str = r#"You are an AI that generates educational problems.
Create a problem based on the user's request.
The problem type is one of:
- "select" for a multiple choice question
- "write" for an essay / free response question

Your response must be a single valid JSON object with exactly this structure:
{
  "title": "Brief title of the problem",
  "content": "The full problem statement or question",
  "type": "select or write",
  "options": ["choice 1", "choice 2", "choice 3", "choice 4"],
  "answer": "The correct answer",
  "category": "Subject/Topic/Subtopic (e.g. Math/Probability/Conditional probability)"
}

For a "select" problem, "options" must contain exactly four choices and "answer" must be
copied verbatim from "options". For a "write" problem, "options" must be an empty list.

Rules:
- DO NOT include any explanation or text outside the JSON object.
- DO NOT create an id field. The server assigns ids.
- The response must be parseable JSON."#;

const SIMPLE_SELECT_SYSTEM: &str = r#"You are a problem generator for educational purposes.
Create a simple multiple choice question based on the user's prompt, such as choosing the
right word for a given definition.
Your response must be in valid JSON format with the following structure:
{
  "title": "Brief title of the problem",
  "content": "The full problem statement or question",
  "type": "select",
  "options": ["choice 1", "choice 2", "choice 3", "choice 4"],
  "answer": "The correct choice, copied exactly from options",
  "category": "Subject/Topic/Subtopic"
}

DO NOT include any explanations or text outside the JSON object.
DO NOT make an id field for this data. The server will create it automatically.
Ensure your response is valid JSON that can be parsed programmatically."#;

const ADVANCED_SYSTEM: &str = r#"You are a problem generator for educational purposes.
Create an intermediate or advanced question based on the user's prompt.
The type of the question is 'select' if you create a multiple choice question,
or 'write' if you create an essay question.
Your response must be in valid JSON format with the following structure:
{
  "title": "Brief title of the problem",
  "content": "The full problem statement or question",
  "type": "Either select or write",
  "options": ["Four choices for select, empty for write"],
  "answer": "The correct answer for the question",
  "category": "Subject/Topic/Subtopic",
  "difficulty": "intermediate or advanced"
}

For a select question the answer must be copied exactly from options.
DO NOT include any explanations or text outside the JSON object.
DO NOT make an id field for this data. The server will create it automatically.
Ensure your response is valid JSON that can be parsed programmatically."#;

const ROUTING_SYSTEM: &str = r#"You are a tool router. Select the most appropriate tool to handle a user's problem generation request.

Available tools:
- generate_problem_mistral: Fast and simple problem generation using a local LLM. Suitable for basic, easy, or low-cost problems.
- generate_problem_with_gpt: Uses a hosted model for more complex, creative, or high-quality problem generation. Suitable for difficult or nuanced questions.

Return only the tool name, exactly one of:
- generate_problem_mistral
- generate_problem_with_gpt
Do not return any explanation or other text."#;
