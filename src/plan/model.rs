//! Plan and Step: the common output of the fast and slow paths

use serde::{Deserialize, Serialize};

use crate::core::error::{AgentError, Result};
use crate::core::types::{Language, Params};
use crate::plan::condition::Condition;
use crate::plan::wire::WirePlan;

/// One parameterized invocation of a capability
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// 1-based position in the owning plan
    pub number: usize,
    /// Human-readable summary shown in feedback
    pub description: String,
    /// Canonical capability name
    pub capability: String,
    /// Final-form parameter values; nothing downstream re-parses them
    pub parameters: Params,
    /// Producer's confidence in this interpretation (0.0 - 1.0)
    pub confidence: f32,
    /// Gate evaluated right before the step runs
    pub condition: Option<Condition>,
}

impl Step {
    pub fn new(number: usize, capability: impl Into<String>, parameters: Params) -> Self {
        let capability = capability.into();
        Self {
            number,
            description: capability.replace('_', " "),
            capability,
            parameters,
            confidence: 1.0,
            condition: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the confidence, clamped into [0, 1]
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// String parameter lookup
    pub fn param_str(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).and_then(|v| v.as_str())
    }
}

/// An ordered, executable decomposition of a request
///
/// Always holds at least one step; construction enforces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WirePlan", into = "WirePlan")]
pub struct Plan {
    steps: Vec<Step>,
    language: Language,
    alternatives: Vec<Plan>,
}

impl Plan {
    /// Build a plan; steps must be numbered 1..=n in order
    pub fn new(steps: Vec<Step>, language: Language) -> Result<Self> {
        if steps.is_empty() {
            return Err(AgentError::DecompositionFailure(
                "plan has no steps".into(),
            ));
        }

        for (i, step) in steps.iter().enumerate() {
            if step.number != i + 1 {
                return Err(AgentError::DecompositionFailure(format!(
                    "step {} is numbered {}",
                    i + 1,
                    step.number
                )));
            }
            if !(0.0..=1.0).contains(&step.confidence) {
                return Err(AgentError::DecompositionFailure(format!(
                    "step {} confidence {} is outside [0, 1]",
                    step.number, step.confidence
                )));
            }
            if step.capability.trim().is_empty() {
                return Err(AgentError::DecompositionFailure(format!(
                    "step {} names no operation",
                    step.number
                )));
            }
        }

        Ok(Self {
            steps,
            language,
            alternatives: Vec::new(),
        })
    }

    /// A one-step plan; the step is renumbered to 1
    pub fn single(mut step: Step, language: Language) -> Self {
        step.number = 1;
        Self {
            steps: vec![step],
            language,
            alternatives: Vec::new(),
        }
    }

    /// Append a lower-ranked alternative interpretation
    pub fn with_alternative(mut self, alternative: Plan) -> Self {
        self.alternatives.push(alternative);
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn alternatives(&self) -> &[Plan] {
        &self.alternatives
    }

    /// Mean step confidence
    pub fn overall_confidence(&self) -> f32 {
        self.steps.iter().map(|s| s.confidence).sum::<f32>() / self.steps.len() as f32
    }

    /// Alternatives best-first: by overall confidence, ties keep declared order
    pub fn ranked_alternatives(&self) -> Vec<&Plan> {
        let mut ranked: Vec<&Plan> = self.alternatives.iter().collect();
        ranked.sort_by(|a, b| {
            b.overall_confidence()
                .partial_cmp(&a.overall_confidence())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
    }

    /// Parse the Plan JSON interchange form
    ///
    /// Any deviation from the shape is a decomposition failure; nothing is
    /// partially accepted.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| AgentError::DecompositionFailure(format!("invalid plan JSON: {}", e)))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub(crate) fn into_parts(self) -> (Vec<Step>, Language, Vec<Plan>) {
        (self.steps, self.language, self.alternatives)
    }

    pub(crate) fn from_parts(
        steps: Vec<Step>,
        language: Language,
        alternatives: Vec<Plan>,
    ) -> Result<Self> {
        let mut plan = Self::new(steps, language)?;
        plan.alternatives = alternatives;
        Ok(plan)
    }
}
