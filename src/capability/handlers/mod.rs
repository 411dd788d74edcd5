//! Built-in capability handlers

pub mod audio;
pub mod calculator;
pub mod clipboard;
pub mod files;
pub mod launcher;
pub mod system;
pub mod web;

pub use audio::{VolumeAction, VolumeHandler};
pub use calculator::CalculatorHandler;
pub use clipboard::{Clipboard, ClipboardAction};
pub use files::{FileAction, FileHandler};
pub use launcher::{DesktopAction, Launcher};
pub use system::{ClockHandler, RepeatHandler};
pub use web::{SearchHandler, WeatherHandler};
