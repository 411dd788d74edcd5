//! Execution feedback: per-step results and the plan-level report

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::types::{Language, Params};

/// Terminal state of one step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Succeeded,
    Failed,
    /// Condition evaluated false (or could not be evaluated)
    Skipped,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StepStatus::Succeeded => "succeeded",
            StepStatus::Failed => "failed",
            StepStatus::Skipped => "skipped",
        })
    }
}

/// Outcome of executing (or skipping) a single step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    /// Step number within the plan that produced it
    pub step: usize,
    pub capability: String,
    pub status: StepStatus,
    /// Always present; silent outcomes are not allowed
    pub message: String,
    /// Values later steps or the caller may consume
    pub outputs: Params,
    /// Session slots refreshed by this step
    pub slots: Params,
    /// Produced by a simulated stand-in
    pub degraded: bool,
    /// Work was handed to a nested plan whose steps were recorded separately
    pub delegated: bool,
    /// 0 for the primary plan, n for the n-th ranked alternative
    pub plan_index: usize,
    /// Cause of a failure
    pub error: Option<String>,
}

impl StepResult {
    pub fn succeeded(step: usize, capability: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_status(step, capability, StepStatus::Succeeded, message)
    }

    pub fn failed(
        step: usize,
        capability: impl Into<String>,
        error: impl fmt::Display,
    ) -> Self {
        let cause = error.to_string();
        let mut result = Self::with_status(step, capability, StepStatus::Failed, cause.clone());
        result.error = Some(cause);
        result
    }

    pub fn skipped(step: usize, capability: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::with_status(step, capability, StepStatus::Skipped, reason)
    }

    fn with_status(
        step: usize,
        capability: impl Into<String>,
        status: StepStatus,
        message: impl Into<String>,
    ) -> Self {
        Self {
            step,
            capability: capability.into(),
            status,
            message: message.into(),
            outputs: Params::new(),
            slots: Params::new(),
            degraded: false,
            delegated: false,
            plan_index: 0,
            error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == StepStatus::Succeeded
    }

    pub fn is_failure(&self) -> bool {
        self.status == StepStatus::Failed
    }
}

/// How a plan run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// Every step succeeded or was skipped
    Completed,
    /// A step failed and no alternative was left (or allowed)
    Failed,
    /// Stopped between steps on request
    Cancelled,
}

/// Aggregated result of a plan run, including any alternative that was tried
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub status: PlanStatus,
    pub language: Language,
    /// Results in execution order across the primary plan and the alternative
    pub results: Vec<StepResult>,
    /// Rank of the alternative that replaced the primary plan, if any
    pub alternative_used: Option<usize>,
    pub message: String,
}

impl ExecutionReport {
    pub fn is_success(&self) -> bool {
        self.status == PlanStatus::Completed
    }

    /// True if any successful step ran in simulated mode
    pub fn is_degraded(&self) -> bool {
        self.results.iter().any(|r| r.degraded && r.is_success())
    }

    /// Results of the plan that ran last (the alternative, if one was used)
    pub fn final_results(&self) -> impl Iterator<Item = &StepResult> {
        let index = self.alternative_used.unwrap_or(0);
        self.results.iter().filter(move |r| r.plan_index == index)
    }

    /// Multi-line human-readable summary
    pub fn summary(&self) -> String {
        let mut s = String::new();
        for r in &self.results {
            let tag = if r.degraded { " (simulated)" } else { "" };
            s.push_str(&format!(
                "Step {} [{}] {}{}: {}\n",
                r.step, r.capability, r.status, tag, r.message
            ));
        }
        s.push_str(&self.message);
        s
    }
}
