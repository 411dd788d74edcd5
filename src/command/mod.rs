//! Command handling: condition evaluation, plan execution and the pipeline

pub mod condition;
pub mod executor;
pub mod pipeline;

pub use executor::{CancelToken, ExecutionEngine};
pub use pipeline::{Agent, CommandOutcome, Route};
