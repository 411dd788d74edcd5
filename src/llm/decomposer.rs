//! Slow path: turn free text into a multi-step plan
//!
//! The decomposer only reads the session. Its reply must be the plan JSON
//! contract exactly; anything else is a decomposition failure, never a
//! partial plan.

use async_trait::async_trait;
use std::sync::Arc;

use crate::capability::registry::CapabilityRegistry;
use crate::core::error::{AgentError, Result};
use crate::core::types::Language;
use crate::llm::client::LlmClient;
use crate::llm::context::PromptContext;
use crate::plan::Plan;
use crate::session::SessionSnapshot;

/// Produces a plan for text the fast path could not match
#[async_trait]
pub trait PlanDecomposer: Send + Sync {
    async fn decompose(
        &self,
        text: &str,
        language: Language,
        session: &SessionSnapshot,
    ) -> Result<Plan>;
}

/// Decomposer backed by an LLM
pub struct LlmDecomposer {
    client: LlmClient,
    registry: Arc<CapabilityRegistry>,
}

impl LlmDecomposer {
    pub fn new(client: LlmClient, registry: Arc<CapabilityRegistry>) -> Self {
        Self { client, registry }
    }
}

#[async_trait]
impl PlanDecomposer for LlmDecomposer {
    async fn decompose(
        &self,
        text: &str,
        language: Language,
        session: &SessionSnapshot,
    ) -> Result<Plan> {
        let context = PromptContext::build(&self.registry, session);
        let reply = self
            .client
            .complete(PLAN_SYSTEM_PROMPT, &context.user_prompt(text, language))
            .await
            .map_err(|e| {
                tracing::warn!("Slow path request failed: {}", e);
                AgentError::DecompositionFailure(e.to_string())
            })?;

        let plan = parse_reply(&reply)?;
        tracing::info!(
            "Slow path produced {} step(s), {} alternative(s)",
            plan.steps().len(),
            plan.alternatives().len()
        );
        Ok(plan)
    }
}

/// Decomposer for setups without a planner; always fails
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineDecomposer;

#[async_trait]
impl PlanDecomposer for OfflineDecomposer {
    async fn decompose(&self, _text: &str, _language: Language, _session: &SessionSnapshot) -> Result<Plan> {
        Err(AgentError::DecompositionFailure(
            "no slow-path planner is configured (set LLM_API_KEY)".into(),
        ))
    }
}

/// Outermost JSON object in a model reply (handles surrounding prose)
pub fn extract_json(reply: &str) -> Result<&str> {
    let start = reply
        .find('{')
        .ok_or_else(|| AgentError::DecompositionFailure("no JSON object in reply".into()))?;
    let end = reply
        .rfind('}')
        .filter(|&end| end > start)
        .ok_or_else(|| AgentError::DecompositionFailure("unterminated JSON object in reply".into()))?;
    Ok(&reply[start..=end])
}

/// Strictly parse a model reply into a plan
pub fn parse_reply(reply: &str) -> Result<Plan> {
    let json = extract_json(reply)?;
    Plan::from_json(json).map_err(|e| {
        tracing::warn!("Rejected slow-path reply: {}", e);
        e
    })
}

/// System prompt for plan decomposition
const PLAN_SYSTEM_PROMPT: &str = r#"You plan desktop automation for a bilingual (English/Arabic) assistant.
Break the user's command into an ordered list of steps, each calling exactly
one capability from the CONTEXT list with final-form parameter values.

Rules:
- Use only capabilities from the list, with their exact names and parameter types.
- Number steps 1..n in order. Confidence is a number between 0 and 1.
- "conditions" is a list that must all hold for the step to run; omit it or use [] when unconditional.
  Condition objects: {"type":"step_succeeded","step":N}, {"type":"step_failed","step":N},
  {"type":"output_equals","step":N,"key":"...","value":...}, {"type":"slot_present","slot":"..."},
  {"type":"slot_equals","slot":"...","value":...}, {"type":"all","conditions":[...]},
  {"type":"any","conditions":[...]}, {"type":"not","condition":{...}}. Conditions may only refer to earlier steps.
- Resolve references like "it" or "that file" from the session state.
- Put other reasonable interpretations in "alternatives" (same shape, may be empty).
- "language" is "en" or "ar", the language of the command.

OUTPUT FORMAT (JSON only, no explanation):
{
  "plan": [
    {"step": 1, "description": "...", "operation": "capability_name", "parameters": {...}, "confidence": 0.0-1.0, "conditions": []}
  ],
  "alternatives": [],
  "language": "en"
}

Example:
"open safari and search for cats" ->
{"plan":[{"step":1,"description":"Open Safari","operation":"open_application","parameters":{"name":"Safari"},"confidence":0.9,"conditions":[]},{"step":2,"description":"Search for cats","operation":"web_search","parameters":{"query":"cats"},"confidence":0.85,"conditions":[{"type":"step_succeeded","step":1}]}],"alternatives":[],"language":"en"}
"#;
