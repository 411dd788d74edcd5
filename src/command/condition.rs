//! Evaluation of step conditions
//!
//! A condition may only look backwards: at steps of the same plan that
//! already ran, or at the session. Anything else is malformed, and the
//! engine treats a malformed condition as false.

use crate::core::error::{AgentError, Result};
use crate::plan::result::{StepResult, StepStatus};
use crate::plan::Condition;
use crate::session::SessionContext;

/// Evaluate `condition` for step `current` of a plan
///
/// `prior` holds the results of steps `1..current`, in order.
pub fn evaluate(
    condition: &Condition,
    current: usize,
    prior: &[StepResult],
    session: &SessionContext,
) -> Result<bool> {
    let earlier = |step: usize| -> Result<&StepResult> {
        if step == 0 || step >= current {
            return Err(AgentError::ConditionEvaluation(format!(
                "step {} refers to step {}, which has not run yet",
                current, step
            )));
        }
        prior.get(step - 1).ok_or_else(|| {
            AgentError::ConditionEvaluation(format!("no result recorded for step {}", step))
        })
    };

    match condition {
        Condition::StepSucceeded { step } => Ok(earlier(*step)?.status == StepStatus::Succeeded),
        Condition::StepFailed { step } => Ok(earlier(*step)?.status == StepStatus::Failed),
        Condition::OutputEquals { step, key, value } => {
            Ok(earlier(*step)?.outputs.get(key) == Some(value))
        }
        Condition::SlotPresent { slot } => Ok(session
            .get_slot(slot)
            .map_or(false, |v| !v.is_null() && v.as_str() != Some(""))),
        Condition::SlotEquals { slot, value } => Ok(session.get_slot(slot) == Some(value)),
        Condition::All { conditions } | Condition::Any { conditions } if conditions.is_empty() => {
            Err(AgentError::ConditionEvaluation("empty condition group".into()))
        }
        Condition::All { conditions } => {
            for c in conditions {
                if !evaluate(c, current, prior, session)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        Condition::Any { conditions } => {
            for c in conditions {
                if evaluate(c, current, prior, session)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        Condition::Not { condition } => Ok(!evaluate(condition, current, prior, session)?),
    }
}
