//! Session context: short-lived state for resolving references across turns

pub mod context;

pub use context::{slots, HistoryEntry, SessionContext, SessionSnapshot};
