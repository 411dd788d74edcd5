//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Step parameters and outputs: name -> final-form JSON value
///
/// Ordered so that plans compare and serialize deterministically.
pub type Params = BTreeMap<String, serde_json::Value>;

/// Unique identifier for a conversation session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Input language of a command
///
/// Arabic covers Modern Standard Arabic and the spoken dialects; the tag
/// on the wire is the bare ISO code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Language {
    English,
    Arabic,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Arabic];

    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Arabic => "ar",
        }
    }

    /// Parse an ISO-like tag; regional suffixes ("ar-EG", "en_US") are accepted
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag
            .trim()
            .split(|c| c == '-' || c == '_')
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();
        match primary.as_str() {
            "en" | "english" => Some(Language::English),
            "ar" | "arabic" | "العربية" => Some(Language::Arabic),
            _ => None,
        }
    }

    /// Detect the language of free text: any Arabic letter makes it Arabic
    pub fn detect(text: &str) -> Self {
        if text.chars().any(is_arabic_char) {
            Language::Arabic
        } else {
            Language::English
        }
    }
}

pub(crate) fn is_arabic_char(c: char) -> bool {
    matches!(c, '\u{0600}'..='\u{06FF}' | '\u{0750}'..='\u{077F}' | '\u{FB50}'..='\u{FDFF}' | '\u{FE70}'..='\u{FEFF}')
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_tag(s).ok_or_else(|| format!("unsupported language tag: {}", s))
    }
}

impl TryFrom<String> for Language {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        language.code().to_string()
    }
}

/// Host operating environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Mac,
    Linux,
    Windows,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Platform::Mac => "mac",
            Platform::Linux => "linux",
            Platform::Windows => "windows",
        })
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mac" | "macos" | "darwin" => Ok(Platform::Mac),
            "linux" | "ubuntu" => Ok(Platform::Linux),
            "windows" | "win32" => Ok(Platform::Windows),
            other => Err(format!("unsupported platform: {}", other)),
        }
    }
}

/// Platform tag an implementation is registered under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformTag {
    Mac,
    Linux,
    Windows,
    /// Runs on every platform
    Any,
    /// Side-effect-free stand-in used when nothing concrete can run
    Simulated,
}

impl PlatformTag {
    /// The specific tag for a host platform
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Mac => PlatformTag::Mac,
            Platform::Linux => PlatformTag::Linux,
            Platform::Windows => PlatformTag::Windows,
        }
    }

    /// True for mac/linux/windows tags
    pub fn is_specific(&self) -> bool {
        matches!(self, PlatformTag::Mac | PlatformTag::Linux | PlatformTag::Windows)
    }
}

impl fmt::Display for PlatformTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlatformTag::Mac => "mac",
            PlatformTag::Linux => "linux",
            PlatformTag::Windows => "windows",
            PlatformTag::Any => "any",
            PlatformTag::Simulated => "simulated",
        })
    }
}

/// Live resources an implementation may depend on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Display,
    Audio,
    Network,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Resource::Display => "display",
            Resource::Audio => "audio",
            Resource::Network => "network",
        })
    }
}
