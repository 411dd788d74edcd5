//! Slow-path planning through an LLM collaborator

pub mod client;
pub mod context;
pub mod decomposer;

pub use client::{ApiFormat, LlmClient};
pub use context::PromptContext;
pub use decomposer::{LlmDecomposer, OfflineDecomposer, PlanDecomposer};
