//! Capability definitions: canonical name, parameter schema, side effects

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::core::error::{AgentError, Result};
use crate::core::types::Params;

/// Declared type of a parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
}

impl ParamType {
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ParamType::String => value.is_string(),
            ParamType::Integer => value.is_i64() || value.is_u64(),
            ParamType::Number => value.is_number(),
            ParamType::Boolean => value.is_boolean(),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamType,
    pub required: bool,
}

/// Whether running a capability twice is harmless
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SideEffects {
    Idempotent,
    /// Never retried or substituted after a failure (e.g. deleting a file)
    NonIdempotent,
}

/// Session slot refreshed when the capability succeeds
///
/// The value comes from the step's output named `source`, falling back to
/// the parameter of that name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotBinding {
    pub slot: String,
    pub source: String,
}

/// An abstract, named unit of automation behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capability {
    pub id: String,
    pub description: String,
    pub params: Vec<ParamSpec>,
    pub effects: SideEffects,
    pub slot: Option<SlotBinding>,
}

impl Capability {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            params: Vec::new(),
            effects: SideEffects::Idempotent,
            slot: None,
        }
    }

    pub fn required(mut self, name: &str, kind: ParamType) -> Self {
        self.params.push(ParamSpec {
            name: name.into(),
            kind,
            required: true,
        });
        self
    }

    pub fn optional(mut self, name: &str, kind: ParamType) -> Self {
        self.params.push(ParamSpec {
            name: name.into(),
            kind,
            required: false,
        });
        self
    }

    pub fn non_idempotent(mut self) -> Self {
        self.effects = SideEffects::NonIdempotent;
        self
    }

    pub fn binds_slot(mut self, slot: &str, source: &str) -> Self {
        self.slot = Some(SlotBinding {
            slot: slot.into(),
            source: source.into(),
        });
        self
    }

    pub fn is_non_idempotent(&self) -> bool {
        self.effects == SideEffects::NonIdempotent
    }

    /// Check parameters against the schema
    ///
    /// Required parameters must be present, and every declared parameter that
    /// is present must have the declared type. Undeclared extras are allowed.
    pub fn validate(&self, params: &Params) -> Result<()> {
        for spec in &self.params {
            match params.get(&spec.name) {
                None | Some(Value::Null) if spec.required => {
                    return Err(self.invalid(format!("missing required parameter '{}'", spec.name)));
                }
                Some(value) if !value.is_null() && !spec.kind.matches(value) => {
                    return Err(self.invalid(format!(
                        "parameter '{}' must be a {}, got {}",
                        spec.name, spec.kind, value
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// One-line schema rendering used in prompts and listings
    pub fn signature(&self) -> String {
        let params: Vec<String> = self
            .params
            .iter()
            .map(|p| {
                if p.required {
                    format!("{}: {}", p.name, p.kind)
                } else {
                    format!("{}?: {}", p.name, p.kind)
                }
            })
            .collect();
        format!("{}({})", self.id, params.join(", "))
    }

    fn invalid(&self, reason: String) -> AgentError {
        AgentError::InvalidParameters {
            capability: self.id.clone(),
            reason,
        }
    }
}
