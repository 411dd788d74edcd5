//! Desk Agent - bilingual natural-language desktop automation

pub mod capability;
pub mod command;
pub mod core;
pub mod llm;
pub mod matcher;
pub mod plan;
pub mod platform;
pub mod session;
