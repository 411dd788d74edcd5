//! Clipboard access through the host's clipboard tools

use async_trait::async_trait;
use serde_json::json;

use crate::capability::handlers::launcher::CommandLine;
use crate::capability::implementation::{CapabilityHandler, HandlerError, HandlerOutput, StepInput};
use crate::core::types::Platform;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardAction {
    Copy,
    Paste,
    Read,
}

pub struct Clipboard {
    action: ClipboardAction,
    platform: Platform,
}

impl Clipboard {
    pub fn new(action: ClipboardAction, platform: Platform) -> Self {
        Self { action, platform }
    }

    pub fn command_line(&self, input: &StepInput) -> Result<CommandLine, HandlerError> {
        let cmd = match (self.action, self.platform) {
            (ClipboardAction::Copy, Platform::Linux) => {
                CommandLine::new("xclip", &["-i", "-selection", "clipboard"])
                    .with_stdin(input.str_param("text")?)
            }
            (ClipboardAction::Copy, Platform::Mac) => {
                CommandLine::new("pbcopy", &[]).with_stdin(input.str_param("text")?)
            }
            (ClipboardAction::Read, Platform::Linux) => {
                CommandLine::new("xclip", &["-o", "-selection", "clipboard"]).captured()
            }
            (ClipboardAction::Read, Platform::Mac) => CommandLine::new("pbpaste", &[]).captured(),
            (ClipboardAction::Paste, Platform::Linux) => {
                CommandLine::new("xdotool", &["key", "--clearmodifiers", "ctrl+v"])
            }
            (ClipboardAction::Paste, Platform::Mac) => CommandLine::new(
                "osascript",
                &["-e", r#"tell application "System Events" to keystroke "v" using command down"#],
            ),
            (action, platform) => {
                return Err(HandlerError::Failed(format!(
                    "{:?} is not supported on {}",
                    action, platform
                )))
            }
        };
        Ok(cmd)
    }
}

#[async_trait]
impl CapabilityHandler for Clipboard {
    async fn invoke(&self, input: StepInput) -> Result<HandlerOutput, HandlerError> {
        let cmd = self.command_line(&input)?;
        let stdout = cmd.run().await?;
        let out = match self.action {
            ClipboardAction::Copy => {
                let text = input.str_param("text")?;
                HandlerOutput::new(format!("Copied {} characters", text.chars().count()))
                    .with_output("text", json!(text))
            }
            ClipboardAction::Paste => HandlerOutput::new("Pasted"),
            ClipboardAction::Read if stdout.is_empty() => {
                HandlerOutput::new("The clipboard is empty").with_output("text", json!(""))
            }
            ClipboardAction::Read => {
                HandlerOutput::new(stdout.clone()).with_output("text", json!(stdout))
            }
        };
        Ok(out)
    }
}
