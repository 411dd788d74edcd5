//! The built-in capability catalog and its default implementations

use std::time::Duration;

use crate::capability::handlers::{
    CalculatorHandler, ClockHandler, Clipboard, ClipboardAction, DesktopAction, FileAction,
    FileHandler, Launcher, RepeatHandler, SearchHandler, VolumeAction, VolumeHandler,
    WeatherHandler,
};
use crate::capability::implementation::Implementation;
use crate::capability::registry::CapabilityRegistry;
use crate::capability::schema::{Capability, ParamType};
use crate::core::config::AgentConfig;
use crate::core::error::Result;
use crate::core::types::{Platform, PlatformTag, Resource};
use crate::session::slots;

/// Canonical capability names
pub mod ids {
    pub const TAKE_SCREENSHOT: &str = "take_screenshot";
    pub const MOVE_MOUSE: &str = "move_mouse";
    pub const CLICK: &str = "click";
    pub const TYPE_TEXT: &str = "type_text";
    pub const PRESS_KEY: &str = "press_key";
    pub const COPY_TO_CLIPBOARD: &str = "copy_to_clipboard";
    pub const PASTE_CLIPBOARD: &str = "paste_clipboard";
    pub const READ_CLIPBOARD: &str = "read_clipboard";
    pub const OPEN_APPLICATION: &str = "open_application";
    pub const CLOSE_APPLICATION: &str = "close_application";
    pub const OPEN_URL: &str = "open_url";
    pub const WEB_SEARCH: &str = "web_search";
    pub const CALCULATE: &str = "calculate";
    pub const GET_WEATHER: &str = "get_weather";
    pub const GET_TIME: &str = "get_time";
    pub const CREATE_FILE: &str = "create_file";
    pub const DELETE_FILE: &str = "delete_file";
    pub const REPEAT_LAST: &str = "repeat_last";
    pub const SET_VOLUME: &str = "set_volume";
    pub const GET_VOLUME: &str = "get_volume";
}

/// Every capability the agent knows, with its parameter schema
pub fn catalog() -> Vec<Capability> {
    use ParamType::*;
    vec![
        Capability::new(ids::TAKE_SCREENSHOT, "Capture the screen to an image file")
            .optional("path", String)
            .binds_slot(slots::LAST_FILE, "path"),
        Capability::new(ids::MOVE_MOUSE, "Move the mouse pointer to screen coordinates")
            .required("x", Integer)
            .required("y", Integer),
        Capability::new(ids::CLICK, "Click, optionally at screen coordinates")
            .optional("x", Integer)
            .optional("y", Integer)
            .optional("button", String),
        Capability::new(ids::TYPE_TEXT, "Type text at the keyboard focus").required("text", String),
        Capability::new(ids::PRESS_KEY, "Press a key or key combination").required("key", String),
        Capability::new(ids::COPY_TO_CLIPBOARD, "Put text on the clipboard").required("text", String),
        Capability::new(ids::PASTE_CLIPBOARD, "Paste the clipboard at the keyboard focus"),
        Capability::new(ids::READ_CLIPBOARD, "Read the clipboard contents"),
        Capability::new(ids::OPEN_APPLICATION, "Launch an application by name")
            .required("name", String)
            .binds_slot(slots::ACTIVE_WINDOW, "name"),
        Capability::new(ids::CLOSE_APPLICATION, "Quit an application by name").required("name", String),
        Capability::new(ids::OPEN_URL, "Open a web page in the default browser")
            .required("url", String)
            .binds_slot(slots::ACTIVE_TAB, "url"),
        Capability::new(ids::WEB_SEARCH, "Search the web").required("query", String),
        Capability::new(ids::CALCULATE, "Evaluate an arithmetic expression")
            .required("expression", String),
        Capability::new(ids::GET_WEATHER, "Current weather for a city").required("city", String),
        Capability::new(ids::GET_TIME, "Current date and time"),
        Capability::new(ids::CREATE_FILE, "Create a new file with optional content")
            .required("path", String)
            .optional("content", String)
            .non_idempotent()
            .binds_slot(slots::LAST_FILE, "path"),
        Capability::new(ids::DELETE_FILE, "Delete a file")
            .required("path", String)
            .non_idempotent(),
        Capability::new(ids::REPEAT_LAST, "Repeat the last successful action"),
        Capability::new(ids::SET_VOLUME, "Set the output volume, 0 to 100 percent")
            .required("level", Integer),
        Capability::new(ids::GET_VOLUME, "Current output volume in percent"),
    ]
}

/// Capabilities with a side-effect-free simulated variant
const SIMULATED: &[&str] = &[
    ids::TAKE_SCREENSHOT,
    ids::MOVE_MOUSE,
    ids::CLICK,
    ids::TYPE_TEXT,
    ids::PRESS_KEY,
    ids::COPY_TO_CLIPBOARD,
    ids::PASTE_CLIPBOARD,
    ids::READ_CLIPBOARD,
    ids::OPEN_APPLICATION,
    ids::CLOSE_APPLICATION,
    ids::OPEN_URL,
    ids::GET_WEATHER,
    ids::SET_VOLUME,
    ids::GET_VOLUME,
];

type BindingSpec = (String, PlatformTag, Implementation);

fn launcher(config: &AgentConfig, action: DesktopAction, platform: Platform) -> Implementation {
    let name = format!("{:?}/{}", action, platform).to_lowercase();
    Implementation::new(name, Launcher::new(action, platform, &config.screenshot_dir))
        .requires(Resource::Display)
}

fn native_bindings(config: &AgentConfig) -> Vec<BindingSpec> {
    let mut out = Vec::new();
    let unix = [(Platform::Mac, PlatformTag::Mac), (Platform::Linux, PlatformTag::Linux)];

    for (platform, tag) in unix {
        for (id, action) in [
            (ids::OPEN_APPLICATION, DesktopAction::OpenApplication),
            (ids::CLOSE_APPLICATION, DesktopAction::CloseApplication),
            (ids::TAKE_SCREENSHOT, DesktopAction::TakeScreenshot),
            (ids::OPEN_URL, DesktopAction::OpenUrl),
        ] {
            out.push((id.to_string(), tag, launcher(config, action, platform)));
        }
        for (id, action) in [
            (ids::COPY_TO_CLIPBOARD, ClipboardAction::Copy),
            (ids::PASTE_CLIPBOARD, ClipboardAction::Paste),
            (ids::READ_CLIPBOARD, ClipboardAction::Read),
        ] {
            let name = format!("clipboard-{:?}/{}", action, platform).to_lowercase();
            let imp = Implementation::new(name, Clipboard::new(action, platform))
                .requires(Resource::Display);
            out.push((id.to_string(), tag, imp));
        }
        for (id, action) in [
            (ids::SET_VOLUME, VolumeAction::Set),
            (ids::GET_VOLUME, VolumeAction::Get),
        ] {
            let name = format!("volume-{:?}/{}", action, platform).to_lowercase();
            let imp = Implementation::new(name, VolumeHandler::new(action, platform))
                .requires(Resource::Audio);
            out.push((id.to_string(), tag, imp));
        }
    }
    out.push((
        ids::OPEN_URL.to_string(),
        PlatformTag::Windows,
        launcher(config, DesktopAction::OpenUrl, Platform::Windows),
    ));
    out
}

fn portable_bindings(config: &AgentConfig) -> Vec<BindingSpec> {
    let any = |id: &str, imp: Implementation| (id.to_string(), PlatformTag::Any, imp);
    let http_timeout = Duration::from_millis(config.default_step_timeout_ms);
    vec![
        any(ids::CALCULATE, Implementation::new("nom-calculator", CalculatorHandler)),
        any(ids::GET_TIME, Implementation::new("system-clock", ClockHandler)),
        any(ids::REPEAT_LAST, Implementation::new("session-replay", RepeatHandler)),
        any(
            ids::WEB_SEARCH,
            Implementation::new("search-url", SearchHandler::new(&config.search_url_template)),
        ),
        any(
            ids::GET_WEATHER,
            Implementation::new("wttr", WeatherHandler::new(&config.weather_url, http_timeout))
                .requires(Resource::Network),
        ),
        any(
            ids::CREATE_FILE,
            Implementation::new("fs-create", FileHandler::new(FileAction::Create, &config.files_dir)),
        ),
        any(
            ids::DELETE_FILE,
            Implementation::new("fs-delete", FileHandler::new(FileAction::Delete, &config.files_dir)),
        ),
    ]
}

/// Default bindings for every catalog entry
pub fn bindings(config: &AgentConfig) -> Vec<BindingSpec> {
    let mut out = native_bindings(config);
    out.extend(portable_bindings(config));
    out.extend(
        SIMULATED
            .iter()
            .map(|id| (id.to_string(), PlatformTag::Simulated, Implementation::simulated())),
    );
    out
}

/// Registry holding the full catalog with default bindings
pub fn registry(config: &AgentConfig) -> Result<CapabilityRegistry> {
    CapabilityRegistry::bootstrap(catalog(), bindings(config))
}
