//! Step gating predicates
//!
//! A condition looks at the outcomes of earlier steps in the same plan or at
//! session slots. Evaluation lives with the execution engine; this module
//! only defines the shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Predicate that gates a step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    /// An earlier step finished successfully
    StepSucceeded { step: usize },
    /// An earlier step failed
    StepFailed { step: usize },
    /// An earlier step produced `key` with exactly this value
    OutputEquals { step: usize, key: String, value: Value },
    /// The session holds a value for this slot
    SlotPresent { slot: String },
    /// The session slot holds exactly this value
    SlotEquals { slot: String, value: Value },
    All { conditions: Vec<Condition> },
    Any { conditions: Vec<Condition> },
    Not { condition: Box<Condition> },
}

impl Condition {
    /// Combine a wire-level list: empty means "no condition"
    pub fn from_list(mut conditions: Vec<Condition>) -> Option<Condition> {
        match conditions.len() {
            0 => None,
            1 => conditions.pop(),
            _ => Some(Condition::All { conditions }),
        }
    }

    /// Inverse of `from_list` for a single optional condition
    pub fn to_list(condition: Option<&Condition>) -> Vec<Condition> {
        condition.cloned().into_iter().collect()
    }
}
