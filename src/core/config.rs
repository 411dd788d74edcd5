//! Agent configuration with documented constants
//!
//! All tunable numbers are collected here with explanations of their purpose
//! and how they interact with each other. Values load from an optional TOML
//! file; anything the file omits keeps its default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::error::{AgentError, Result};
use crate::core::types::{Language, Platform};

/// Configuration for the command agent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    // === LANGUAGE ===
    /// Language whose fast-path rules are tried first when the input's own
    /// partition has no match
    pub default_language: Language,

    // === SESSION ===
    /// Number of executed steps kept in session history
    ///
    /// Oldest entries are evicted first. Anaphora only ever look back a few
    /// turns, so a small buffer is enough.
    pub history_capacity: usize,

    // === EXECUTION ===
    /// Timeout applied to implementations that do not declare their own (ms)
    ///
    /// Exceeding it fails the step exactly like a handler error.
    pub default_step_timeout_ms: u64,

    /// Maximum depth of plans nested inside a step's own execution
    ///
    /// A step that replays or delegates to another plan counts one level.
    /// Hitting the limit fails the step instead of recursing further.
    pub max_nesting_depth: usize,

    // === PLATFORM ===
    /// Force the resolver to treat the host as this platform
    pub platform_override: Option<Platform>,

    /// Time allowed for each resource liveness probe (ms)
    pub probe_timeout_ms: u64,

    /// Address used by the network liveness probe (host:port)
    pub network_probe_addr: String,

    // === BUILT-IN CAPABILITIES ===
    /// Search URL; `{query}` is replaced with the url-encoded query
    pub search_url_template: String,

    /// Weather endpoint; the city is appended as a path segment
    pub weather_url: String,

    /// Directory screenshots are written to when no path is given
    pub screenshot_dir: PathBuf,

    /// Base directory for relative paths given to file capabilities
    pub files_dir: PathBuf,

    // === SLOW PATH ===
    /// LLM endpoint used by the decomposer (API key comes from LLM_API_KEY)
    pub llm_api_url: String,

    /// LLM model used by the decomposer
    pub llm_model: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            default_language: Language::English,
            history_capacity: 16,
            default_step_timeout_ms: 10_000,
            max_nesting_depth: 4,
            platform_override: None,
            probe_timeout_ms: 500,
            network_probe_addr: "1.1.1.1:53".into(),
            search_url_template: "https://duckduckgo.com/?q={query}".into(),
            weather_url: "https://wttr.in".into(),
            screenshot_dir: std::env::temp_dir(),
            files_dir: PathBuf::from("."),
            llm_api_url: "https://api.anthropic.com/v1/messages".into(),
            llm_model: "claude-3-haiku-20240307".into(),
        }
    }
}

impl AgentConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a TOML file and validate it
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AgentConfig = toml::from_str(&content)?;
        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.history_capacity == 0 {
            return Err(AgentError::Config(
                "history_capacity must be at least 1".into(),
            ));
        }

        if self.default_step_timeout_ms == 0 {
            return Err(AgentError::Config(
                "default_step_timeout_ms must be positive".into(),
            ));
        }

        // Depth 0 would forbid the top-level plan itself
        if self.max_nesting_depth == 0 {
            return Err(AgentError::Config(
                "max_nesting_depth must be at least 1".into(),
            ));
        }

        if !self.search_url_template.contains("{query}") {
            return Err(AgentError::Config(format!(
                "search_url_template ({}) must contain {{query}}",
                self.search_url_template
            )));
        }

        if self.network_probe_addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(AgentError::Config(format!(
                "network_probe_addr ({}) is not a socket address",
                self.network_probe_addr
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AgentConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_history_rejected() {
        let config = AgentConfig {
            history_capacity: 0,
            ..AgentConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_search_template_requires_placeholder() {
        let config = AgentConfig {
            search_url_template: "https://example.com/search".into(),
            ..AgentConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_partial_toml_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "default_language = \"ar\"\nhistory_capacity = 4\nplatform_override = \"linux\""
        )
        .unwrap();

        let config = AgentConfig::load(file.path()).unwrap();
        assert_eq!(config.default_language, Language::Arabic);
        assert_eq!(config.history_capacity, 4);
        assert_eq!(config.platform_override, Some(Platform::Linux));
        assert_eq!(config.max_nesting_depth, 4);
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "history_capacity = \"many\"").unwrap();
        assert!(matches!(
            AgentConfig::load(file.path()),
            Err(AgentError::Toml(_))
        ));
    }
}
