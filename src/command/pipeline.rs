//! Command pipeline: text -> fast path or slow path -> engine -> feedback

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::capability::{builtin, CapabilityRegistry};
use crate::command::executor::{CancelToken, ExecutionEngine};
use crate::core::config::AgentConfig;
use crate::core::error::Result;
use crate::core::types::Language;
use crate::llm::{LlmClient, LlmDecomposer, OfflineDecomposer, PlanDecomposer};
use crate::matcher::PatternMatcher;
use crate::plan::ExecutionReport;
use crate::platform::{LivenessProbe, PlatformResolver, SystemProbe};
use crate::session::SessionContext;

/// Which path produced the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    FastPath,
    SlowPath,
}

/// What happened to one utterance
#[derive(Debug, Clone)]
pub enum CommandOutcome {
    Executed {
        route: Route,
        report: ExecutionReport,
    },
    /// Neither path produced a plan; nothing ran
    NotUnderstood { language: Language, message: String },
    /// Blank input
    Empty,
}

impl CommandOutcome {
    /// Human-readable feedback for the user
    pub fn message(&self) -> String {
        match self {
            CommandOutcome::Executed { report, .. } => report.summary(),
            CommandOutcome::NotUnderstood { message, .. } => message.clone(),
            CommandOutcome::Empty => "Nothing to do".to_string(),
        }
    }

    pub fn report(&self) -> Option<&ExecutionReport> {
        match self {
            CommandOutcome::Executed { report, .. } => Some(report),
            _ => None,
        }
    }
}

/// Owns the matcher, the decomposer, the engine and one conversation's session
pub struct Agent {
    matcher: PatternMatcher,
    decomposer: Box<dyn PlanDecomposer>,
    engine: ExecutionEngine,
    session: SessionContext,
}

impl Agent {
    pub fn new(
        config: &AgentConfig,
        resolver: Arc<PlatformResolver>,
        decomposer: Box<dyn PlanDecomposer>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            matcher: PatternMatcher::new(config.default_language)?,
            decomposer,
            engine: ExecutionEngine::new(resolver, config),
            session: SessionContext::new(config.history_capacity),
        })
    }

    /// Wire the built-in catalog, the system probe and the configured planner
    pub fn from_config(config: &AgentConfig) -> Result<Self> {
        let host = config
            .platform_override
            .unwrap_or_else(PlatformResolver::detect_host);
        let probe = SystemProbe::new(
            host,
            &config.network_probe_addr,
            Duration::from_millis(config.probe_timeout_ms),
        );
        Self::with_probe(config, Arc::new(probe))
    }

    /// Like `from_config` with a caller-supplied resource probe
    pub fn with_probe(config: &AgentConfig, probe: Arc<dyn LivenessProbe>) -> Result<Self> {
        let host = config
            .platform_override
            .unwrap_or_else(PlatformResolver::detect_host);
        let registry = Arc::new(builtin::registry(config)?);
        let resolver = Arc::new(PlatformResolver::new(Arc::clone(&registry), host, probe));

        let decomposer: Box<dyn PlanDecomposer> = match LlmClient::from_config(config) {
            Ok(client) => {
                info!("Slow path: {:?} planner ({})", client.api_format(), client.model());
                Box::new(LlmDecomposer::new(client, registry))
            }
            Err(e) => {
                warn!("Slow path disabled: {}", e);
                Box::new(OfflineDecomposer)
            }
        };

        info!("Agent ready on {} with {} capabilities", host, resolver.registry().len());
        Self::new(config, resolver, decomposer)
    }

    /// Handle one utterance end to end
    pub async fn handle(&mut self, text: &str, hint: Option<Language>) -> CommandOutcome {
        if text.trim().is_empty() {
            return CommandOutcome::Empty;
        }
        self.engine.cancel_token().clear();

        let snapshot = self.session.snapshot();
        if let Some(fast) = self.matcher.match_command(text, hint, &snapshot) {
            info!("Fast path matched rule {} ({})", fast.rule, fast.partition);
            let report = self.engine.execute(&fast.plan, &mut self.session).await;
            return CommandOutcome::Executed {
                route: Route::FastPath,
                report,
            };
        }

        let language = hint.unwrap_or_else(|| Language::detect(text));
        info!("No fast-path rule matched; asking the planner");
        match self.decomposer.decompose(text, language, &snapshot).await {
            Ok(plan) => {
                let report = self.engine.execute(&plan, &mut self.session).await;
                CommandOutcome::Executed {
                    route: Route::SlowPath,
                    report,
                }
            }
            Err(e) => {
                warn!("Decomposition failed: {}", e);
                CommandOutcome::NotUnderstood {
                    language,
                    message: not_understood(language),
                }
            }
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn registry(&self) -> &Arc<CapabilityRegistry> {
        self.engine.resolver().registry()
    }

    /// Forget history and slots; the agent keeps its configuration
    pub fn reset(&mut self) {
        self.session.reset();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.engine.cancel_token()
    }
}

fn not_understood(language: Language) -> String {
    match language {
        Language::English => "command not understood".to_string(),
        Language::Arabic => "لم أفهم الأمر (command not understood)".to_string(),
    }
}
