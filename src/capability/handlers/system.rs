//! Capabilities answered from the process itself: clock and replay

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use serde_json::json;

use crate::capability::implementation::{CapabilityHandler, HandlerError, HandlerOutput, StepInput};
use crate::core::types::Language;
use crate::plan::Plan;

/// "YYYY-MM-DD HH:MM" in the timestamp's own zone
pub fn format_clock<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%Y-%m-%d %H:%M").to_string()
}

/// Reports the host's local date and time
pub struct ClockHandler;

#[async_trait]
impl CapabilityHandler for ClockHandler {
    async fn invoke(&self, _input: StepInput) -> Result<HandlerOutput, HandlerError> {
        let now = Local::now();
        let shown = format_clock(&now);
        Ok(HandlerOutput::new(format!("It is {} ({})", shown, now.format("%:z")))
            .with_output("time", json!(shown))
            .with_output("unix", json!(now.timestamp())))
    }
}

/// Replays the session's last successful step as a nested plan
pub struct RepeatHandler;

#[async_trait]
impl CapabilityHandler for RepeatHandler {
    async fn invoke(&self, input: StepInput) -> Result<HandlerOutput, HandlerError> {
        let mut last = input
            .session
            .last_success
            .clone()
            .ok_or_else(|| HandlerError::Failed("nothing to repeat yet".into()))?;
        // Its gate referred to the plan it came from and already held
        last.condition = None;
        let language = Language::detect(&last.description);
        let message = format!("Repeating {}", last.capability);
        Ok(HandlerOutput::delegate(Plan::single(last, language), message))
    }
}
