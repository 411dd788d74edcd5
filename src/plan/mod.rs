//! Plan model shared by the fast path, the slow path and the engine
//!
//! text -> (PatternMatcher | PlanDecomposer) -> Plan -> ExecutionEngine -> ExecutionReport

pub mod condition;
pub mod model;
pub mod result;
pub mod wire;

pub use condition::Condition;
pub use model::{Plan, Step};
pub use result::{ExecutionReport, PlanStatus, StepResult, StepStatus};
pub use wire::{WirePlan, WireStep};
