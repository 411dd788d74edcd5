//! Gather agent context for slow-path prompts
//!
//! The decomposer sees the capability catalog it may plan with and a short
//! summary of the session, so the model can resolve references such as
//! "close it" or "send that file" without guessing.

use crate::capability::registry::CapabilityRegistry;
use crate::core::types::Language;
use crate::session::SessionSnapshot;

/// How many history entries are summarized
const RECENT_LIMIT: usize = 5;

/// Context for one decomposition request
#[derive(Debug, Clone, Default)]
pub struct PromptContext {
    /// One line per capability: signature and description
    pub capabilities: Vec<String>,
    /// Non-empty session slots as (name, value)
    pub slots: Vec<(String, String)>,
    /// Most recent executed steps, oldest first
    pub recent: Vec<String>,
    /// Description of the last successful step
    pub last_success: Option<String>,
}

impl PromptContext {
    /// Build a context from the registry and a session snapshot
    pub fn build(registry: &CapabilityRegistry, session: &SessionSnapshot) -> Self {
        let capabilities = registry
            .capabilities()
            .iter()
            .map(|c| format!("{} - {}", c.signature(), c.description))
            .collect();

        let slots = session
            .slots
            .iter()
            .map(|(k, v)| {
                let value = v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string());
                (k.clone(), value)
            })
            .filter(|(_, v)| !v.is_empty())
            .collect();

        let skip = session.recent.len().saturating_sub(RECENT_LIMIT);
        let recent = session
            .recent
            .iter()
            .skip(skip)
            .map(|e| format!("{} [{}]: {}", e.step.capability, e.status, e.step.description))
            .collect();

        Self {
            capabilities,
            slots,
            recent,
            last_success: session
                .last_success
                .as_ref()
                .map(|s| format!("{} ({})", s.capability, s.description)),
        }
    }

    /// Text summary for the user prompt
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str("Capabilities:\n");
        for line in &self.capabilities {
            s.push_str(&format!("- {}\n", line));
        }

        if !self.slots.is_empty() {
            s.push_str("\nSession state:\n");
            for (name, value) in &self.slots {
                s.push_str(&format!("- {}: {}\n", name, value));
            }
        }

        if let Some(last) = &self.last_success {
            s.push_str(&format!("\nLast successful action: {}\n", last));
        }

        if !self.recent.is_empty() {
            s.push_str("\nRecent steps:\n");
            for entry in &self.recent {
                s.push_str(&format!("- {}\n", entry));
            }
        }

        s
    }

    /// User prompt for a command
    pub fn user_prompt(&self, text: &str, language: Language) -> String {
        format!(
            "CONTEXT:\n{}\nCOMMAND (language: {}):\n{}\n\nReturn the plan JSON:",
            self.summary(),
            language,
            text
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::schema::{Capability, ParamType};
    use crate::core::types::Params;
    use crate::plan::result::StepResult;
    use crate::plan::Step;
    use crate::session::{slots, SessionContext};
    use serde_json::json;

    #[test]
    fn test_summary_lists_capabilities_and_state() {
        let mut registry = CapabilityRegistry::new();
        registry.declare(Capability::new("open_application", "Launch an app").required("name", ParamType::String));

        let mut session = SessionContext::new(8);
        let mut params = Params::new();
        params.insert("name".into(), json!("Safari"));
        let step = Step::new(1, "open_application", params);
        session.update(&step, &StepResult::succeeded(1, "open_application", "Opened Safari"));
        session.set_slot(slots::ACTIVE_WINDOW, json!("Safari"));

        let ctx = PromptContext::build(&registry, &session.snapshot());
        let summary = ctx.summary();
        assert!(summary.contains("open_application(name: string) - Launch an app"));
        assert!(summary.contains("active_window: Safari"));
        assert!(summary.contains("Last successful action: open_application"));
        assert!(summary.contains("[succeeded]"));
    }

    #[test]
    fn test_empty_context_has_only_header() {
        let ctx = PromptContext::default();
        assert_eq!(ctx.summary(), "Capabilities:\n");
        assert!(ctx.user_prompt("hi", Language::English).contains("language: en"));
    }

    #[test]
    fn test_recent_is_limited() {
        let mut session = SessionContext::new(16);
        for i in 0..8 {
            let step = Step::new(1, format!("cap_{}", i), Params::new());
            session.update(&step, &StepResult::succeeded(1, step.capability.clone(), "ok"));
        }
        let ctx = PromptContext::build(&CapabilityRegistry::new(), &session.snapshot());
        assert_eq!(ctx.recent.len(), RECENT_LIMIT);
        assert!(ctx.recent[0].starts_with("cap_3"));
    }
}
