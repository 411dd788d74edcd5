//! Output volume control

use async_trait::async_trait;
use serde_json::json;

use crate::capability::handlers::launcher::CommandLine;
use crate::capability::implementation::{CapabilityHandler, HandlerError, HandlerOutput, StepInput};
use crate::core::types::Platform;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeAction {
    Set,
    Get,
}

pub struct VolumeHandler {
    action: VolumeAction,
    platform: Platform,
}

impl VolumeHandler {
    pub fn new(action: VolumeAction, platform: Platform) -> Self {
        Self { action, platform }
    }

    /// Requested level as a percentage, clamped to 0..=100
    pub fn level(input: &StepInput) -> Result<u8, HandlerError> {
        Ok(input.int_param("level")?.clamp(0, 100) as u8)
    }

    pub fn command_line(&self, input: &StepInput) -> Result<CommandLine, HandlerError> {
        let cmd = match (self.action, self.platform) {
            (VolumeAction::Set, Platform::Linux) => {
                let level = format!("{}%", Self::level(input)?);
                CommandLine::new("amixer", &["-q", "set", "Master", level.as_str()])
            }
            (VolumeAction::Set, Platform::Mac) => {
                let script = format!("set volume output volume {}", Self::level(input)?);
                CommandLine::new("osascript", &["-e", script.as_str()])
            }
            (VolumeAction::Get, Platform::Linux) => {
                CommandLine::new("amixer", &["get", "Master"]).captured()
            }
            (VolumeAction::Get, Platform::Mac) => {
                CommandLine::new("osascript", &["-e", "output volume of (get volume settings)"])
                    .captured()
            }
            (action, platform) => {
                return Err(HandlerError::Failed(format!(
                    "volume {:?} is not supported on {}",
                    action, platform
                )))
            }
        };
        Ok(cmd)
    }
}

/// First percentage in mixer output: amixer prints `[NN%]`, osascript a bare number
pub fn parse_level(stdout: &str) -> Option<u8> {
    let digits = match stdout.find('[') {
        Some(open) => &stdout[open + 1..],
        None => stdout.trim(),
    };
    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
    digits[..end].parse::<u8>().ok().filter(|level| *level <= 100)
}

#[async_trait]
impl CapabilityHandler for VolumeHandler {
    async fn invoke(&self, input: StepInput) -> Result<HandlerOutput, HandlerError> {
        let cmd = self.command_line(&input)?;
        let stdout = cmd.run().await?;
        let level = match self.action {
            VolumeAction::Set => Self::level(&input)?,
            VolumeAction::Get => parse_level(&stdout)
                .ok_or_else(|| HandlerError::Failed(format!("unreadable volume: {}", stdout.trim())))?,
        };
        let message = match self.action {
            VolumeAction::Set => format!("Volume set to {}%", level),
            VolumeAction::Get => format!("Volume is at {}%", level),
        };
        Ok(HandlerOutput::new(message).with_output("level", json!(level)))
    }
}
