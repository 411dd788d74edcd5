//! Host platform detection, resource probes and implementation resolution

pub mod probe;
pub mod resolver;

pub use probe::{LivenessProbe, StaticProbe, SystemProbe};
pub use resolver::{PlatformResolver, Resolution};
