//! Capabilities: what the agent can do, and the implementations behind it

pub mod builtin;
pub mod handlers;
pub mod implementation;
pub mod registry;
pub mod schema;

pub use builtin::ids;
pub use implementation::{
    CapabilityHandler, HandlerError, HandlerOutput, Implementation, StepInput,
};
pub use registry::{Binding, CapabilityRegistry, Registration};
pub use schema::{Capability, ParamSpec, ParamType, SideEffects, SlotBinding};
