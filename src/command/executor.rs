//! Execution engine - runs plans step by step against resolved implementations

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::capability::{HandlerOutput, StepInput};
use crate::command::condition;
use crate::core::config::AgentConfig;
use crate::core::error::{AgentError, Result};
use crate::plan::{ExecutionReport, Plan, PlanStatus, Step, StepResult};
use crate::platform::{PlatformResolver, Resolution};
use crate::session::SessionContext;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Handle that stops a running plan before its next step
///
/// A step already in flight runs to completion (or timeout).
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Called once per command, before planning
    pub(crate) fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// How a (possibly nested) plan run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunOutcome {
    Completed,
    /// `retry_allowed` is false once a non-idempotent step has failed
    Failed { retry_allowed: bool },
    Cancelled,
}

/// One step's terminal result plus what the plan loop needs to know about it
struct StepRun {
    result: StepResult,
    retry_allowed: bool,
    cancelled: bool,
}

impl StepRun {
    fn done(result: StepResult) -> Self {
        Self {
            result,
            retry_allowed: true,
            cancelled: false,
        }
    }
}

/// Runs plans sequentially and feeds results back into the session
pub struct ExecutionEngine {
    resolver: Arc<PlatformResolver>,
    default_timeout: Duration,
    max_depth: usize,
    cancel: CancelToken,
}

impl ExecutionEngine {
    pub fn new(resolver: Arc<PlatformResolver>, config: &AgentConfig) -> Self {
        Self {
            resolver,
            default_timeout: Duration::from_millis(config.default_step_timeout_ms),
            max_depth: config.max_nesting_depth.max(1),
            cancel: CancelToken::default(),
        }
    }

    pub fn resolver(&self) -> &Arc<PlatformResolver> {
        &self.resolver
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Execute a plan; every step yields a result and the session sees each one
    ///
    /// When a step fails and the plan carries alternatives, the best ranked
    /// alternative runs once from its first step. Effects of the steps that
    /// already ran are not rolled back, so a failure of a non-idempotent
    /// capability ends the run instead.
    pub async fn execute(&self, plan: &Plan, session: &mut SessionContext) -> ExecutionReport {
        info!(
            "Executing plan: {} step(s), {} alternative(s)",
            plan.steps().len(),
            plan.alternatives().len()
        );

        let mut results = Vec::new();
        let mut language = plan.language();
        let mut alternative_used = None;

        let mut outcome = self.run_plan(plan, 0, 1, session, &mut results).await;

        if let RunOutcome::Failed { retry_allowed } = outcome {
            match plan.ranked_alternatives().first() {
                Some(alternative) if retry_allowed => {
                    warn!("Primary plan failed; trying alternative 1");
                    language = alternative.language();
                    alternative_used = Some(1);
                    outcome = self.run_plan(alternative, 1, 1, session, &mut results).await;
                }
                Some(_) => {
                    warn!("Not trying alternatives after a non-idempotent step failed");
                }
                None => {}
            }
        }

        let (status, message) = match outcome {
            RunOutcome::Completed => {
                let simulated = results.iter().filter(|r| r.degraded && r.is_success()).count();
                let mut message = match alternative_used {
                    Some(rank) => format!("Completed using alternative {}", rank),
                    None => "Completed".to_string(),
                };
                if simulated > 0 {
                    message.push_str(&format!(" ({} step(s) simulated)", simulated));
                }
                (PlanStatus::Completed, message)
            }
            RunOutcome::Failed { .. } => {
                let message = results
                    .iter()
                    .rev()
                    .find(|r| r.is_failure())
                    .map(|r| format!("Step {} ({}) failed: {}", r.step, r.capability, r.message))
                    .unwrap_or_else(|| "Plan failed".to_string());
                (PlanStatus::Failed, message)
            }
            RunOutcome::Cancelled => (
                PlanStatus::Cancelled,
                format!("Cancelled after {} step(s)", results.len()),
            ),
        };

        info!("Plan finished: {:?} - {}", status, message);
        ExecutionReport {
            status,
            language,
            results,
            alternative_used,
            message,
        }
    }

    fn run_plan<'a>(
        &'a self,
        plan: &'a Plan,
        plan_index: usize,
        depth: usize,
        session: &'a mut SessionContext,
        report: &'a mut Vec<StepResult>,
    ) -> BoxFuture<'a, RunOutcome> {
        Box::pin(async move {
            // Results of this plan only; conditions never see nested steps
            let mut prior: Vec<StepResult> = Vec::with_capacity(plan.steps().len());

            for step in plan.steps() {
                if self.cancel.is_cancelled() {
                    info!("Cancelled before step {}", step.number);
                    return RunOutcome::Cancelled;
                }

                let run = self
                    .run_step(step, &prior, plan_index, depth, session, report)
                    .await;
                let mut result = run.result;
                result.plan_index = plan_index;

                session.update(step, &result);
                report.push(result.clone());
                let failed = result.is_failure();
                prior.push(result);

                if run.cancelled {
                    return RunOutcome::Cancelled;
                }
                if failed {
                    return RunOutcome::Failed {
                        retry_allowed: run.retry_allowed,
                    };
                }
            }
            RunOutcome::Completed
        })
    }

    async fn run_step(
        &self,
        step: &Step,
        prior: &[StepResult],
        plan_index: usize,
        depth: usize,
        session: &mut SessionContext,
        report: &mut Vec<StepResult>,
    ) -> StepRun {
        let id = step.capability.as_str();

        if let Some(cond) = &step.condition {
            match condition::evaluate(cond, step.number, prior, session) {
                Ok(true) => {}
                Ok(false) => {
                    debug!("Step {} ({}) skipped: condition not met", step.number, id);
                    return StepRun::done(StepResult::skipped(step.number, id, "condition not met"));
                }
                Err(e) => {
                    warn!("Step {} ({}) skipped: {}", step.number, id, e);
                    return StepRun::done(StepResult::skipped(step.number, id, e.to_string()));
                }
            }
        }

        let resolution = match self.resolve(id).await {
            Ok(r) => r,
            Err(e) => {
                warn!("Step {} ({}) cannot run: {}", step.number, id, e);
                return StepRun::done(StepResult::failed(step.number, id, e));
            }
        };

        if let Err(e) = resolution.capability.validate(&step.parameters) {
            warn!("Step {} ({}) rejected: {}", step.number, id, e);
            return StepRun::done(StepResult::failed(step.number, id, e));
        }

        let retry_allowed = !resolution.capability.is_non_idempotent();
        debug!(
            "Step {} -> {} via {}{}",
            step.number,
            id,
            resolution.implementation.name,
            if resolution.degraded { " (simulated)" } else { "" }
        );

        let mut output = match self.invoke(step, &resolution, session).await {
            Ok(output) => output,
            Err(e) => {
                warn!("Step {} ({}) failed: {}", step.number, id, e);
                let mut result = StepResult::failed(step.number, id, e);
                result.degraded = resolution.degraded;
                return StepRun {
                    result,
                    retry_allowed,
                    cancelled: false,
                };
            }
        };

        let mut result = StepResult::succeeded(step.number, id, output.message.clone());
        result.degraded = resolution.degraded;
        if let Some(reason) = &resolution.reason {
            result.message = format!("{} [{}]", result.message, reason);
        }

        if let Some(nested) = output.nested.take() {
            result.delegated = true;
            if depth >= self.max_depth {
                warn!("Step {} ({}) exceeds nesting depth {}", step.number, id, self.max_depth);
                let mut failed =
                    StepResult::failed(step.number, id, AgentError::NestingLimit(self.max_depth));
                failed.delegated = true;
                return StepRun {
                    result: failed,
                    retry_allowed,
                    cancelled: false,
                };
            }

            debug!("Step {} delegates to a {}-step plan", step.number, nested.steps().len());
            match self
                .run_plan(&nested, plan_index, depth + 1, session, report)
                .await
            {
                RunOutcome::Completed => {}
                RunOutcome::Failed { retry_allowed: inner } => {
                    let mut failed = StepResult::failed(
                        step.number,
                        id,
                        AgentError::StepExecution {
                            capability: id.to_string(),
                            cause: "delegated plan failed".into(),
                        },
                    );
                    failed.delegated = true;
                    return StepRun {
                        result: failed,
                        retry_allowed: retry_allowed && inner,
                        cancelled: false,
                    };
                }
                RunOutcome::Cancelled => {
                    let mut skipped =
                        StepResult::skipped(step.number, id, "cancelled during delegated plan");
                    skipped.delegated = true;
                    return StepRun {
                        result: skipped,
                        retry_allowed,
                        cancelled: true,
                    };
                }
            }
        }

        if let Some(binding) = &resolution.capability.slot {
            let value = output
                .outputs
                .get(&binding.source)
                .or_else(|| step.parameters.get(&binding.source))
                .filter(|v| !v.is_null());
            if let Some(value) = value {
                result.slots.insert(binding.slot.clone(), value.clone());
            }
        }
        result.outputs = output.outputs;

        StepRun::done(result)
    }

    /// Resolution may probe the network, which blocks
    async fn resolve(&self, capability_id: &str) -> Result<Resolution> {
        let resolver = Arc::clone(&self.resolver);
        let id = capability_id.to_string();
        tokio::task::spawn_blocking(move || resolver.resolve(&id))
            .await
            .map_err(|e| AgentError::StepExecution {
                capability: capability_id.to_string(),
                cause: format!("resolution task failed: {}", e),
            })?
    }

    /// Run the handler on its own task so a hang or panic stays contained
    async fn invoke(
        &self,
        step: &Step,
        resolution: &Resolution,
        session: &SessionContext,
    ) -> Result<HandlerOutput> {
        let handler = resolution.implementation.handler();
        let input = StepInput {
            capability: step.capability.clone(),
            parameters: step.parameters.clone(),
            session: session.snapshot(),
        };
        let limit = resolution.implementation.timeout.unwrap_or(self.default_timeout);
        let fail = |cause: String| AgentError::StepExecution {
            capability: step.capability.clone(),
            cause,
        };

        let mut task = tokio::spawn(async move { handler.invoke(input).await });
        match tokio::time::timeout(limit, &mut task).await {
            Ok(Ok(Ok(output))) => Ok(output),
            Ok(Ok(Err(e))) => Err(fail(e.to_string())),
            Ok(Err(join)) if join.is_panic() => Err(fail("implementation panicked".into())),
            Ok(Err(join)) => Err(fail(format!("implementation task ended: {}", join))),
            Err(_) => {
                task.abort();
                Err(fail(format!("timed out after {} ms", limit.as_millis())))
            }
        }
    }
}
