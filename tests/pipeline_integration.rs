//! End-to-end tests: text in, plan executed, session updated
//!
//! Every agent here runs with all resources reported absent, so desktop
//! capabilities resolve to their simulated variants and nothing is launched.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use desk_agent::capability::{builtin, ids, Capability, CapabilityRegistry, HandlerOutput, Implementation};
use desk_agent::command::{Agent, CommandOutcome, Route};
use desk_agent::core::config::AgentConfig;
use desk_agent::core::error::{AgentError, Result};
use desk_agent::core::types::{Language, Platform, PlatformTag, Resource};
use desk_agent::llm::decomposer::parse_reply;
use desk_agent::llm::PlanDecomposer;
use desk_agent::plan::{PlanStatus, StepStatus};
use desk_agent::plan::Plan;
use desk_agent::platform::{PlatformResolver, StaticProbe};
use desk_agent::session::{slots, SessionSnapshot};
use serde_json::json;

/// Stands in for the LLM: replies with a fixed text and records the calls
struct ScriptedDecomposer {
    reply: String,
    calls: Arc<AtomicUsize>,
    seen_language: Arc<Mutex<Option<Language>>>,
}

impl ScriptedDecomposer {
    fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
            seen_language: Arc::new(Mutex::new(None)),
        }
    }
}

#[async_trait]
impl PlanDecomposer for ScriptedDecomposer {
    async fn decompose(&self, _text: &str, language: Language, _session: &SessionSnapshot) -> Result<Plan> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.seen_language.lock().unwrap() = Some(language);
        parse_reply(&self.reply)
    }
}

fn config() -> AgentConfig {
    AgentConfig {
        platform_override: Some(Platform::Linux),
        ..AgentConfig::default()
    }
}

fn agent_with(config: &AgentConfig, registry: CapabilityRegistry, decomposer: ScriptedDecomposer) -> Agent {
    let resolver = PlatformResolver::new(
        Arc::new(registry),
        Platform::Linux,
        Arc::new(StaticProbe::none_available()),
    );
    Agent::new(config, Arc::new(resolver), Box::new(decomposer)).unwrap()
}

fn agent(decomposer: ScriptedDecomposer) -> Agent {
    let config = config();
    let registry = builtin::registry(&config).unwrap();
    agent_with(&config, registry, decomposer)
}

fn executed(outcome: CommandOutcome) -> (Route, desk_agent::plan::ExecutionReport) {
    match outcome {
        CommandOutcome::Executed { route, report } => (route, report),
        other => panic!("expected an executed plan, got {:?}", other),
    }
}

/// Scenario A: English screenshot request takes the fast path
#[tokio::test]
async fn test_english_screenshot_fast_path() {
    let decomposer = ScriptedDecomposer::new("{}");
    let calls = Arc::clone(&decomposer.calls);
    let mut agent = agent(decomposer);

    let (route, report) = executed(agent.handle("take a screenshot", None).await);
    assert_eq!(route, Route::FastPath);
    assert_eq!(report.language, Language::English);
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].capability, ids::TAKE_SCREENSHOT);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let last = agent.session().last_success().unwrap();
    assert!(last.confidence >= 0.9);
}

/// Scenario B: Arabic screenshot request matches the Arabic partition
#[tokio::test]
async fn test_arabic_screenshot_fast_path() {
    let mut agent = agent(ScriptedDecomposer::new("{}"));

    let (route, report) = executed(agent.handle("خذ لقطة شاشة واحفظها", None).await);
    assert_eq!(route, Route::FastPath);
    assert_eq!(report.language, Language::Arabic);
    assert_eq!(report.results[0].capability, ids::TAKE_SCREENSHOT);
    assert_eq!(report.status, PlanStatus::Completed);
}

/// Scenario C: malformed collaborator output is "command not understood"
#[tokio::test]
async fn test_malformed_plan_is_not_understood() {
    let decomposer = ScriptedDecomposer::new("Sure! I'd organise them by date. {\"plan\": [oops");
    let calls = Arc::clone(&decomposer.calls);
    let mut agent = agent(decomposer);

    let outcome = agent.handle("do something clever with my files", None).await;
    match &outcome {
        CommandOutcome::NotUnderstood { language, message } => {
            assert_eq!(*language, Language::English);
            assert!(message.contains("command not understood"));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(agent.session().is_empty());
}

/// Scenario D: mac-only capability on linux fails the step and the plan
#[tokio::test]
async fn test_platform_only_capability_unavailable() {
    let config = config();
    let mut registry = builtin::registry(&config).unwrap();
    registry.declare(Capability::new("dictate", "Start macOS dictation"));
    registry
        .register(
            "dictate",
            Implementation::from_fn("dictation", |_| Ok(HandlerOutput::new("listening"))),
            PlatformTag::Mac,
        )
        .unwrap();

    let reply = r#"{"plan":[{"step":1,"description":"dictate","operation":"dictate",
        "parameters":{},"confidence":0.8}],"language":"en"}"#;
    let mut agent = agent_with(&config, registry, ScriptedDecomposer::new(reply));

    let (route, report) = executed(agent.handle("I need to dictate a note", None).await);
    assert_eq!(route, Route::SlowPath);
    assert_eq!(report.status, PlanStatus::Failed);
    assert_eq!(report.results[0].status, StepStatus::Failed);
    assert!(report.results[0].message.contains("unavailable"));
}

/// Scenario E: missing display demotes to simulated, session still updates
#[tokio::test]
async fn test_headless_open_application_is_degraded() {
    let mut agent = agent(ScriptedDecomposer::new("{}"));

    let (_, report) = executed(agent.handle("open Safari", None).await);
    assert_eq!(report.status, PlanStatus::Completed);
    assert!(report.results[0].degraded);
    assert!(report.is_degraded());
    assert_eq!(
        agent.session().get_slot(slots::ACTIVE_WINDOW),
        Some(&json!("Safari"))
    );
    assert_eq!(agent.session().len(), 1);
}

/// Anaphora: "close it" resolves against the window opened before
#[tokio::test]
async fn test_close_it_uses_active_window() {
    let mut agent = agent(ScriptedDecomposer::new("{}"));
    agent.handle("open Safari", None).await;

    let (route, report) = executed(agent.handle("close it", None).await);
    assert_eq!(route, Route::FastPath);
    assert_eq!(report.results[0].capability, ids::CLOSE_APPLICATION);
    let last = agent.session().last_success().unwrap();
    assert_eq!(last.param_str("name"), Some("Safari"));
}

/// Anaphora with nothing to refer to escalates to the slow path
#[tokio::test]
async fn test_close_it_without_context_escalates() {
    let decomposer = ScriptedDecomposer::new("not json");
    let calls = Arc::clone(&decomposer.calls);
    let mut agent = agent(decomposer);

    let outcome = agent.handle("close it", None).await;
    assert!(matches!(outcome, CommandOutcome::NotUnderstood { .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

/// Multi-step slow-path plan with a condition on the first step
#[tokio::test]
async fn test_slow_path_multi_step_plan() {
    let reply = r#"Here is the plan:
    {"plan":[
        {"step":1,"description":"work it out","operation":"calculate",
         "parameters":{"expression":"12 * 12"},"confidence":0.9},
        {"step":2,"description":"copy the answer","operation":"copy_to_clipboard",
         "parameters":{"text":"144"},"confidence":0.8,
         "conditions":[{"type":"output_equals","step":1,"key":"display","value":"144"}]},
        {"step":3,"description":"only if it failed","operation":"get_time",
         "parameters":{},"confidence":0.5,
         "conditions":[{"type":"step_failed","step":1}]}
    ],"language":"en"}"#;
    let mut agent = agent(ScriptedDecomposer::new(reply));

    let (route, report) = executed(agent.handle("square twelve and keep the answer", None).await);
    assert_eq!(route, Route::SlowPath);
    assert_eq!(report.status, PlanStatus::Completed);
    let statuses: Vec<StepStatus> = report.results.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![StepStatus::Succeeded, StepStatus::Succeeded, StepStatus::Skipped]
    );
    assert!(report.results[1].degraded);
    assert_eq!(agent.session().len(), 3);
}

/// A failed primary plan falls back to its best alternative
#[tokio::test]
async fn test_slow_path_alternative_substitution() {
    let reply = r#"{"plan":[
        {"step":1,"description":"divide","operation":"calculate",
         "parameters":{"expression":"1 / 0"},"confidence":0.6}
    ],"alternatives":[
        {"plan":[{"step":1,"description":"time","operation":"get_time",
                  "parameters":{},"confidence":0.3}],"language":"en"},
        {"plan":[{"step":1,"description":"safer","operation":"calculate",
                  "parameters":{"expression":"1 / 1"},"confidence":0.5}],"language":"en"}
    ],"language":"en"}"#;
    let mut agent = agent(ScriptedDecomposer::new(reply));

    let (_, report) = executed(agent.handle("divide one by nothing", None).await);
    assert_eq!(report.status, PlanStatus::Completed);
    assert_eq!(report.alternative_used, Some(1));
    let last = report.final_results().last().unwrap();
    assert_eq!(last.capability, ids::CALCULATE);
    assert!(last.message.contains("= 1"));
    assert!(report.results[0].is_failure());
}

/// "do that again" replays the last successful step
#[tokio::test]
async fn test_repeat_last_replays_previous_step() {
    let mut agent = agent(ScriptedDecomposer::new("{}"));
    agent.handle("calculate 2 + 3", None).await;

    let (_, report) = executed(agent.handle("do that again", None).await);
    assert_eq!(report.status, PlanStatus::Completed);
    let caps: Vec<&str> = report.results.iter().map(|r| r.capability.as_str()).collect();
    assert_eq!(caps, vec![ids::CALCULATE, ids::REPEAT_LAST]);
    assert!(report.results[0].message.contains("= 5"));
    assert_eq!(agent.session().last_success().unwrap().capability, ids::CALCULATE);
}

/// Repeat with an empty session fails with a readable message
#[tokio::test]
async fn test_repeat_without_history_fails() {
    let mut agent = agent(ScriptedDecomposer::new("{}"));
    let (_, report) = executed(agent.handle("do that again", None).await);
    assert_eq!(report.status, PlanStatus::Failed);
    assert!(report.message.contains("nothing to repeat"));
}

/// File creation feeds last_file, which "delete the same file" consumes
#[tokio::test]
async fn test_create_then_delete_same_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = AgentConfig {
        platform_override: Some(Platform::Linux),
        files_dir: dir.path().to_path_buf(),
        ..AgentConfig::default()
    };
    let registry = builtin::registry(&config).unwrap();
    let mut agent = agent_with(&config, registry, ScriptedDecomposer::new("{}"));

    let (_, created) = executed(agent.handle("create file notes.txt with hello there", None).await);
    assert_eq!(created.status, PlanStatus::Completed);
    let path = dir.path().join("notes.txt");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello there");

    let (_, deleted) = executed(agent.handle("delete the same file", None).await);
    assert_eq!(deleted.status, PlanStatus::Completed);
    assert!(!path.exists());
}

/// Arabic arithmetic with Arabic-Indic digits
#[tokio::test]
async fn test_arabic_calculation() {
    let mut agent = agent(ScriptedDecomposer::new("{}"));
    let (route, report) = executed(agent.handle("احسب ٣ + ٤", None).await);
    assert_eq!(route, Route::FastPath);
    assert_eq!(report.language, Language::Arabic);
    assert!(report.results[0].message.contains("7"));
}

/// The language hint reaches the slow path
#[tokio::test]
async fn test_language_hint_passed_to_decomposer() {
    let decomposer = ScriptedDecomposer::new("nope");
    let seen = Arc::clone(&decomposer.seen_language);
    let mut agent = agent(decomposer);

    agent.handle("organise everything", Some(Language::Arabic)).await;
    assert_eq!(*seen.lock().unwrap(), Some(Language::Arabic));
}

/// Network capabilities degrade rather than fail when offline
#[tokio::test]
async fn test_weather_offline_is_simulated() {
    let mut agent = agent(ScriptedDecomposer::new("{}"));
    let (_, report) = executed(agent.handle("what's the weather in Cairo", None).await);
    assert_eq!(report.status, PlanStatus::Completed);
    assert!(report.results[0].degraded);
    assert!(report.results[0].message.contains(&Resource::Network.to_string()));
}

/// Decomposer failures never touch the session
#[tokio::test]
async fn test_decomposition_failure_error_kind() {
    let err = parse_reply("no braces at all").unwrap_err();
    assert!(matches!(err, AgentError::DecompositionFailure(_)));
}

/// Volume needs audio; without it the simulated variant answers
#[tokio::test]
async fn test_volume_without_audio_is_simulated() {
    let mut agent = agent(ScriptedDecomposer::new("{}"));

    let (route, report) = executed(agent.handle("set the volume to 40%", None).await);
    assert_eq!(route, Route::FastPath);
    assert_eq!(report.status, PlanStatus::Completed);
    assert_eq!(report.results[0].capability, ids::SET_VOLUME);
    assert!(report.results[0].degraded);

    let registry = builtin::registry(&config()).unwrap();
    let resolver = PlatformResolver::new(
        Arc::new(registry),
        Platform::Linux,
        Arc::new(StaticProbe::all_available().without(Resource::Audio)),
    );
    let resolution = resolver.resolve(ids::SET_VOLUME).unwrap();
    assert_eq!(resolution.tag, PlatformTag::Simulated);
    assert!(resolution.reason.unwrap().contains("audio"));

    let resolver = PlatformResolver::new(
        Arc::new(builtin::registry(&config()).unwrap()),
        Platform::Linux,
        Arc::new(StaticProbe::all_available()),
    );
    let resolution = resolver.resolve(ids::READ_CLIPBOARD).unwrap();
    assert_eq!(resolution.tag, PlatformTag::Linux);
    assert!(!resolution.degraded);
}

/// Copied text reaches the clipboard step exactly as typed
#[tokio::test]
async fn test_copied_arabic_text_is_not_folded() {
    let mut agent = agent(ScriptedDecomposer::new("{}"));

    let (_, report) = executed(agent.handle("انسخ إلى اللقاء ٣", None).await);
    assert_eq!(report.results[0].capability, ids::COPY_TO_CLIPBOARD);
    let step = agent.session().last_success().unwrap();
    assert_eq!(step.param_str("text"), Some("إلى اللقاء ٣"));
}

/// A replayed step no longer carries the gate of the plan it came from
#[tokio::test]
async fn test_repeat_replays_conditional_step() {
    let reply = r#"{"plan":[
        {"step":1,"description":"work it out","operation":"calculate",
         "parameters":{"expression":"6 * 7"},"confidence":0.9},
        {"step":2,"description":"check the clock","operation":"get_time",
         "parameters":{},"confidence":0.8,
         "conditions":[{"type":"step_succeeded","step":1}]}
    ],"language":"en"}"#;
    let mut agent = agent(ScriptedDecomposer::new(reply));
    let (_, report) = executed(agent.handle("work out six sevens and check the clock", None).await);
    assert_eq!(report.status, PlanStatus::Completed);
    assert_eq!(agent.session().last_success().unwrap().capability, ids::GET_TIME);

    let (_, report) = executed(agent.handle("do that again", None).await);
    assert_eq!(report.status, PlanStatus::Completed);
    let replayed = &report.results[0];
    assert_eq!(replayed.capability, ids::GET_TIME);
    assert_eq!(replayed.status, StepStatus::Succeeded);
}
