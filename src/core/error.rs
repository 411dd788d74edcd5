use thiserror::Error;

use crate::core::types::{Platform, PlatformTag};

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Unknown capability: {0}")]
    UnknownCapability(String),

    #[error("Capability {capability} is already bound for platform {tag}")]
    DuplicateCapability { capability: String, tag: PlatformTag },

    #[error("Capability {capability} is unavailable on {platform}: {reason}")]
    CapabilityUnavailable {
        capability: String,
        platform: Platform,
        reason: String,
    },

    #[error("Command not understood: {0}")]
    DecompositionFailure(String),

    #[error("Step {capability} failed: {cause}")]
    StepExecution { capability: String, cause: String },

    #[error("Condition could not be evaluated: {0}")]
    ConditionEvaluation(String),

    #[error("Invalid parameters for {capability}: {reason}")]
    InvalidParameters { capability: String, reason: String },

    #[error("Nested plan depth limit ({0}) exceeded")]
    NestingLimit(usize),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl AgentError {
    /// Whether this error is produced by the slow path failing to build a plan
    pub fn is_not_understood(&self) -> bool {
        matches!(self, AgentError::DecompositionFailure(_))
    }
}

pub type Result<T> = std::result::Result<T, AgentError>;
