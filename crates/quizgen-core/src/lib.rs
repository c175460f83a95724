//! # quizgen-core
//!
//! Dispatch & normalization engine for LLM-generated educational problems.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          ToolRouter                              │
//! │  {tool, input} ──▶ Dispatcher ──▶ Backend (Strategy)             │
//! │                        │            ollama / chatgpt / ...      │
//! │                        ▼                                         │
//! │                  extract ──▶ normalize ──▶ Problem               │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `Backend` trait lets the runtime crate plug in any provider without
//! changing dispatch logic. Extraction and normalization are pure functions,
//! testable without a network.

pub mod backend;
pub mod dispatch;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod problem;
pub mod prompt;
pub mod router;

pub use backend::{Backend, BackendRegistry, GenerationOptions};
pub use dispatch::{DispatchConfig, Dispatcher};
pub use error::{BackendError, BackendResult, ExtractionError};
pub use extract::extract;
pub use normalize::{normalize, normalize_object};
pub use problem::{Problem, ProblemType};
pub use prompt::PromptTemplate;
pub use router::{RouterConfig, RouterError, ToolCall, ToolName, ToolOutput, ToolRouter};
