//! Desktop actions carried out by spawning the host's own tools
//!
//! Commands are spawned directly (never through a shell), so user text can
//! only ever be an argument.

use async_trait::async_trait;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::capability::implementation::{CapabilityHandler, HandlerError, HandlerOutput, StepInput};
use crate::core::types::Platform;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesktopAction {
    OpenApplication,
    CloseApplication,
    OpenUrl,
    TakeScreenshot,
}

/// A program invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
    /// Launch and return without waiting for exit
    pub detach: bool,
    /// Written to the program's stdin, which is then closed
    pub stdin: Option<String>,
    /// Collect stdout instead of discarding it
    pub capture: bool,
}

impl CommandLine {
    pub(crate) fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
            detach: false,
            stdin: None,
            capture: false,
        }
    }

    pub(crate) fn detached(mut self) -> Self {
        self.detach = true;
        self
    }

    pub(crate) fn with_stdin(mut self, text: impl Into<String>) -> Self {
        self.stdin = Some(text.into());
        self
    }

    pub(crate) fn captured(mut self) -> Self {
        self.capture = true;
        self
    }

    /// Spawn without a shell; returns captured stdout
    pub(crate) async fn run(&self) -> Result<String, HandlerError> {
        tracing::debug!("Running {} {:?}", self.program, self.args);
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if self.detach {
            command.spawn()?;
            return Ok(String::new());
        }

        let piped = |on: bool| if on { Stdio::piped() } else { Stdio::null() };
        command
            .kill_on_drop(true)
            .stdin(piped(self.stdin.is_some()))
            .stdout(piped(self.capture))
            .stderr(Stdio::null());
        let mut child = command.spawn()?;

        if let (Some(text), Some(mut pipe)) = (&self.stdin, child.stdin.take()) {
            pipe.write_all(text.as_bytes()).await?;
            pipe.shutdown().await?;
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(HandlerError::Failed(format!(
                "{} exited with {}",
                self.program, output.status
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

pub struct Launcher {
    action: DesktopAction,
    platform: Platform,
    screenshot_dir: PathBuf,
}

impl Launcher {
    pub fn new(action: DesktopAction, platform: Platform, screenshot_dir: impl Into<PathBuf>) -> Self {
        Self {
            action,
            platform,
            screenshot_dir: screenshot_dir.into(),
        }
    }

    /// Where a screenshot lands: relative paths are placed under the
    /// screenshot directory and ".png" is added when no extension is given
    pub fn screenshot_path(&self, requested: Option<&str>) -> PathBuf {
        let mut path = match requested {
            Some(p) if Path::new(p).is_absolute() => PathBuf::from(p),
            Some(p) => self.screenshot_dir.join(p),
            None => {
                let stamp = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or_default();
                self.screenshot_dir.join(format!("screenshot-{}", stamp))
            }
        };
        if path.extension().is_none() {
            path.set_extension("png");
        }
        path
    }

    /// The process name this platform knows an application by
    ///
    /// Opening and closing both go through here, so the name bound to the
    /// session is the one `pkill -x` will find.
    pub fn program_name(&self, name: &str) -> String {
        match self.platform {
            Platform::Linux => name.split_whitespace().collect::<Vec<_>>().join("-").to_lowercase(),
            Platform::Mac | Platform::Windows => name.trim().to_string(),
        }
    }

    /// Build the invocation for this action on this platform
    pub fn command_line(&self, input: &StepInput) -> Result<CommandLine, HandlerError> {
        let unsupported = || {
            HandlerError::Failed(format!("{:?} is not supported on {}", self.action, self.platform))
        };
        let cmd = match (self.action, self.platform) {
            (DesktopAction::OpenApplication, Platform::Mac) => {
                CommandLine::new("open", &["-a", input.str_param("name")?])
            }
            (DesktopAction::OpenApplication, Platform::Linux) => {
                let program = self.program_name(input.str_param("name")?);
                CommandLine::new(&program, &[]).detached()
            }
            (DesktopAction::CloseApplication, Platform::Mac | Platform::Linux) => {
                let program = self.program_name(input.str_param("name")?);
                CommandLine::new("pkill", &["-x", program.as_str()])
            }
            (DesktopAction::OpenUrl, platform) => {
                let program = match platform {
                    Platform::Mac => "open",
                    Platform::Linux => "xdg-open",
                    Platform::Windows => "explorer",
                };
                let url = normalize_url(input.str_param("url")?);
                CommandLine::new(program, &[url.as_str()])
            }
            (DesktopAction::TakeScreenshot, platform) => {
                let path = self.screenshot_path(input.opt_str_param("path"));
                let path = path.to_string_lossy();
                match platform {
                    Platform::Mac => CommandLine::new("screencapture", &["-x", &*path]),
                    Platform::Linux => CommandLine::new("gnome-screenshot", &["-f", &*path]),
                    Platform::Windows => return Err(unsupported()),
                }
            }
            _ => return Err(unsupported()),
        };
        Ok(cmd)
    }

    fn output(&self, input: &StepInput, cmd: &CommandLine) -> Result<HandlerOutput, HandlerError> {
        let out = match self.action {
            DesktopAction::OpenApplication => {
                let name = input.str_param("name")?;
                HandlerOutput::new(format!("Opened {}", name))
                    .with_output("name", json!(self.program_name(name)))
            }
            DesktopAction::CloseApplication => {
                let name = input.str_param("name")?;
                HandlerOutput::new(format!("Closed {}", name))
                    .with_output("name", json!(self.program_name(name)))
            }
            DesktopAction::OpenUrl => {
                let url = cmd.args.last().cloned().unwrap_or_default();
                HandlerOutput::new(format!("Opened {}", url)).with_output("url", json!(url))
            }
            DesktopAction::TakeScreenshot => {
                let path = cmd.args.last().cloned().unwrap_or_default();
                HandlerOutput::new(format!("Screenshot saved to {}", path))
                    .with_output("path", json!(path))
            }
        };
        Ok(out)
    }
}

/// Prefix bare domains with https
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    if url.contains("://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

#[async_trait]
impl CapabilityHandler for Launcher {
    async fn invoke(&self, input: StepInput) -> Result<HandlerOutput, HandlerError> {
        let cmd = self.command_line(&input)?;
        cmd.run().await?;
        self.output(&input, &cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Params;

    fn input(key: &str, value: &str) -> StepInput {
        let mut params = Params::new();
        params.insert(key.into(), json!(value));
        StepInput::new("test", params)
    }

    #[test]
    fn test_open_application_per_platform() {
        let mac = Launcher::new(DesktopAction::OpenApplication, Platform::Mac, "/tmp");
        let cmd = mac.command_line(&input("name", "Safari")).unwrap();
        assert_eq!(cmd.program, "open");
        assert_eq!(cmd.args, vec!["-a", "Safari"]);

        let linux = Launcher::new(DesktopAction::OpenApplication, Platform::Linux, "/tmp");
        let cmd = linux.command_line(&input("name", "Firefox")).unwrap();
        assert_eq!(cmd.program, "firefox");
        assert!(cmd.detach);
    }

    #[test]
    fn test_close_targets_the_program_that_was_opened() {
        let open = Launcher::new(DesktopAction::OpenApplication, Platform::Linux, "/tmp");
        let close = Launcher::new(DesktopAction::CloseApplication, Platform::Linux, "/tmp");

        let typed = input("name", "Firefox");
        let started = open.command_line(&typed).unwrap();
        let opened = open.output(&typed, &started).unwrap();
        assert_eq!(opened.message, "Opened Firefox");
        assert_eq!(opened.outputs["name"], json!("firefox"));

        // "close it" replays the bound name; "close Firefox" uses the typed one
        let bound = opened.outputs["name"].as_str().unwrap();
        for name in [bound, "Firefox"] {
            let cmd = close.command_line(&input("name", name)).unwrap();
            assert_eq!(cmd.program, "pkill");
            assert_eq!(cmd.args, vec!["-x".to_string(), started.program.clone()]);
        }

        let cmd = open.command_line(&input("name", "Gnome Calculator")).unwrap();
        assert_eq!(cmd.program, "gnome-calculator");
    }

    #[test]
    fn test_mac_keeps_application_names() {
        let close = Launcher::new(DesktopAction::CloseApplication, Platform::Mac, "/tmp");
        let cmd = close.command_line(&input("name", "Safari")).unwrap();
        assert_eq!(cmd.args, vec!["-x", "Safari"]);
    }

    #[test]
    fn test_open_url_adds_scheme() {
        let l = Launcher::new(DesktopAction::OpenUrl, Platform::Linux, "/tmp");
        let cmd = l.command_line(&input("url", "example.com")).unwrap();
        assert_eq!(cmd.program, "xdg-open");
        assert_eq!(cmd.args, vec!["https://example.com"]);
    }

    #[test]
    fn test_screenshot_paths() {
        let l = Launcher::new(DesktopAction::TakeScreenshot, Platform::Mac, "/shots");
        assert_eq!(
            l.screenshot_path(Some("Documents/report")),
            PathBuf::from("/shots/Documents/report.png")
        );
        assert_eq!(
            l.screenshot_path(Some("/abs/a.jpg")),
            PathBuf::from("/abs/a.jpg")
        );
        let default = l.screenshot_path(None);
        assert!(default.starts_with("/shots"));
        assert_eq!(default.extension().and_then(|e| e.to_str()), Some("png"));
    }

    #[test]
    fn test_unsupported_combination() {
        let l = Launcher::new(DesktopAction::CloseApplication, Platform::Windows, "/tmp");
        assert!(matches!(
            l.command_line(&input("name", "notepad")),
            Err(HandlerError::Failed(_))
        ));
    }

    #[test]
    fn test_missing_parameter() {
        let l = Launcher::new(DesktopAction::OpenApplication, Platform::Mac, "/tmp");
        assert!(matches!(
            l.command_line(&StepInput::new("open_application", Params::new())),
            Err(HandlerError::MissingParameter(_))
        ));
    }
}
