//! Concrete bindings of capabilities to executable handlers

use async_trait::async_trait;
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::core::types::{Params, Resource};
use crate::plan::Plan;
use crate::session::SessionSnapshot;

/// Everything a handler gets to see for one invocation
#[derive(Debug, Clone)]
pub struct StepInput {
    pub capability: String,
    pub parameters: Params,
    /// Read-only session view; handlers never mutate the session
    pub session: SessionSnapshot,
}

impl StepInput {
    pub fn new(capability: impl Into<String>, parameters: Params) -> Self {
        Self {
            capability: capability.into(),
            parameters,
            session: SessionSnapshot::default(),
        }
    }

    pub fn str_param(&self, name: &str) -> Result<&str, HandlerError> {
        self.parameters
            .get(name)
            .and_then(|v| v.as_str())
            .ok_or_else(|| HandlerError::MissingParameter(name.into()))
    }

    pub fn opt_str_param(&self, name: &str) -> Option<&str> {
        self.parameters
            .get(name)
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
    }

    pub fn int_param(&self, name: &str) -> Result<i64, HandlerError> {
        self.parameters
            .get(name)
            .and_then(|v| v.as_i64())
            .ok_or_else(|| HandlerError::MissingParameter(name.into()))
    }
}

/// What a handler hands back on success
#[derive(Debug, Clone, Default)]
pub struct HandlerOutput {
    pub message: String,
    pub outputs: Params,
    /// A plan to run in place of this step's own work
    pub nested: Option<Plan>,
}

impl HandlerOutput {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_output(mut self, key: &str, value: Value) -> Self {
        self.outputs.insert(key.into(), value);
        self
    }

    /// Delegate to a nested plan executed by the engine
    pub fn delegate(plan: Plan, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            outputs: Params::new(),
            nested: Some(plan),
        }
    }
}

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("missing or mistyped parameter: {0}")]
    MissingParameter(String),

    #[error("{0}")]
    Failed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Executable action behind a capability
#[async_trait]
pub trait CapabilityHandler: Send + Sync {
    async fn invoke(&self, input: StepInput) -> Result<HandlerOutput, HandlerError>;
}

/// Adapter for plain synchronous closures
pub struct FnHandler<F>(pub F);

#[async_trait]
impl<F> CapabilityHandler for FnHandler<F>
where
    F: Fn(&StepInput) -> Result<HandlerOutput, HandlerError> + Send + Sync,
{
    async fn invoke(&self, input: StepInput) -> Result<HandlerOutput, HandlerError> {
        (self.0)(&input)
    }
}

/// Side-effect-free stand-in: reports what would have happened
pub struct SimulatedHandler;

#[async_trait]
impl CapabilityHandler for SimulatedHandler {
    async fn invoke(&self, input: StepInput) -> Result<HandlerOutput, HandlerError> {
        let params = serde_json::to_string(&input.parameters).unwrap_or_default();
        Ok(HandlerOutput::new(format!(
            "[simulated] would run {} with {}",
            input.capability, params
        ))
        .with_output("simulated", json!(true)))
    }
}

/// A handler plus the resources and time budget it needs
#[derive(Clone)]
pub struct Implementation {
    pub name: String,
    pub requires: Vec<Resource>,
    /// Overrides the engine default when set
    pub timeout: Option<Duration>,
    handler: Arc<dyn CapabilityHandler>,
}

impl Implementation {
    pub fn new(name: impl Into<String>, handler: impl CapabilityHandler + 'static) -> Self {
        Self {
            name: name.into(),
            requires: Vec::new(),
            timeout: None,
            handler: Arc::new(handler),
        }
    }

    pub fn from_fn<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&StepInput) -> Result<HandlerOutput, HandlerError> + Send + Sync + 'static,
    {
        Self::new(name, FnHandler(f))
    }

    pub fn simulated() -> Self {
        Self::new("simulated", SimulatedHandler)
    }

    pub fn requires(mut self, resource: Resource) -> Self {
        if !self.requires.contains(&resource) {
            self.requires.push(resource);
        }
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn handler(&self) -> Arc<dyn CapabilityHandler> {
        Arc::clone(&self.handler)
    }
}

impl fmt::Debug for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Implementation")
            .field("name", &self.name)
            .field("requires", &self.requires)
            .field("timeout", &self.timeout)
            .finish()
    }
}
