//! Plan JSON interchange form
//!
//! This is the exact contract the slow-path collaborator must honor:
//!
//! ```json
//! {
//!   "plan": [{"step": 1, "description": "...", "operation": "take_screenshot",
//!             "parameters": {}, "confidence": 0.9, "conditions": []}],
//!   "alternatives": [],
//!   "language": "en"
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::core::error::AgentError;
use crate::core::types::{Language, Params};
use crate::plan::condition::Condition;
use crate::plan::model::{Plan, Step};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WirePlan {
    pub plan: Vec<WireStep>,
    #[serde(default)]
    pub alternatives: Vec<WirePlan>,
    pub language: Language,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireStep {
    pub step: usize,
    pub description: String,
    pub operation: String,
    pub parameters: Params,
    pub confidence: f32,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

impl TryFrom<WirePlan> for Plan {
    type Error = AgentError;

    fn try_from(wire: WirePlan) -> Result<Self, Self::Error> {
        let steps = wire
            .plan
            .into_iter()
            .map(|s| Step {
                number: s.step,
                description: s.description,
                capability: s.operation,
                parameters: s.parameters,
                confidence: s.confidence,
                condition: Condition::from_list(s.conditions),
            })
            .collect();

        let alternatives = wire
            .alternatives
            .into_iter()
            .map(Plan::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Plan::from_parts(steps, wire.language, alternatives)
    }
}

impl From<Plan> for WirePlan {
    fn from(plan: Plan) -> Self {
        let (steps, language, alternatives) = plan.into_parts();
        WirePlan {
            plan: steps
                .into_iter()
                .map(|s| WireStep {
                    conditions: Condition::to_list(s.condition.as_ref()),
                    step: s.number,
                    description: s.description,
                    operation: s.capability,
                    parameters: s.parameters,
                    confidence: s.confidence,
                })
                .collect(),
            alternatives: alternatives.into_iter().map(WirePlan::from).collect(),
            language,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_plan() {
        let json = r#"{
            "plan": [
                {"step": 1, "description": "Open the browser", "operation": "open_url",
                 "parameters": {"url": "https://example.com"}, "confidence": 0.8, "conditions": []},
                {"step": 2, "description": "Capture it", "operation": "take_screenshot",
                 "parameters": {}, "confidence": 0.7,
                 "conditions": [{"type": "step_succeeded", "step": 1}]}
            ],
            "alternatives": [
                {"plan": [{"step": 1, "description": "Search instead", "operation": "web_search",
                           "parameters": {"query": "example"}, "confidence": 0.4}],
                 "language": "en"}
            ],
            "language": "en"
        }"#;

        let plan = Plan::from_json(json).unwrap();
        assert_eq!(plan.steps().len(), 2);
        assert_eq!(plan.steps()[0].capability, "open_url");
        assert_eq!(plan.steps()[0].parameters["url"], json!("https://example.com"));
        assert_eq!(
            plan.steps()[1].condition,
            Some(Condition::StepSucceeded { step: 1 })
        );
        assert_eq!(plan.alternatives().len(), 1);
        assert_eq!(plan.language(), Language::English);
    }

    #[test]
    fn test_missing_plan_field_fails() {
        let result = Plan::from_json(r#"{"language": "en"}"#);
        assert!(matches!(result, Err(AgentError::DecompositionFailure(_))));
    }

    #[test]
    fn test_empty_plan_array_fails() {
        let result = Plan::from_json(r#"{"plan": [], "language": "en"}"#);
        assert!(matches!(result, Err(AgentError::DecompositionFailure(_))));
    }

    #[test]
    fn test_parameters_must_be_object() {
        let json = r#"{"plan": [{"step": 1, "description": "d", "operation": "calculate",
                        "parameters": ["2+2"], "confidence": 0.9}], "language": "en"}"#;
        assert!(Plan::from_json(json).is_err());
    }

    #[test]
    fn test_out_of_range_confidence_fails() {
        let json = r#"{"plan": [{"step": 1, "description": "d", "operation": "calculate",
                        "parameters": {}, "confidence": 1.5}], "language": "en"}"#;
        assert!(Plan::from_json(json).is_err());
    }

    #[test]
    fn test_bad_alternative_fails_whole_plan() {
        let json = r#"{"plan": [{"step": 1, "description": "d", "operation": "calculate",
                        "parameters": {}, "confidence": 0.9}],
                       "alternatives": [{"plan": [], "language": "en"}],
                       "language": "en"}"#;
        assert!(Plan::from_json(json).is_err());
    }

    #[test]
    fn test_not_json_fails() {
        assert!(Plan::from_json("sure! here is your plan").is_err());
    }

    #[test]
    fn test_serialized_field_names() {
        let plan = Plan::single(
            Step::new(1, "take_screenshot", Params::new()).with_confidence(0.95),
            Language::Arabic,
        );
        let v: serde_json::Value = serde_json::from_str(&plan.to_json().unwrap()).unwrap();
        assert_eq!(v["language"], json!("ar"));
        assert_eq!(v["plan"][0]["operation"], json!("take_screenshot"));
        assert_eq!(v["plan"][0]["step"], json!(1));
        assert_eq!(v["plan"][0]["conditions"], json!([]));
        assert_eq!(v["alternatives"], json!([]));
    }
}
