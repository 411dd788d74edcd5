//! Resource liveness probes
//!
//! Probes are idempotent and side-effect-free, so concurrent probing from
//! several agents needs no coordination.

use std::net::{SocketAddr, TcpStream};
use std::path::Path;
use std::time::Duration;

use crate::core::types::{Platform, Resource};

/// Answers whether a live resource is reachable right now
pub trait LivenessProbe: Send + Sync {
    fn is_available(&self, resource: Resource) -> bool;
}

/// Probes the real host
pub struct SystemProbe {
    platform: Platform,
    network_addr: Option<SocketAddr>,
    timeout: Duration,
}

impl SystemProbe {
    pub fn new(platform: Platform, network_addr: &str, timeout: Duration) -> Self {
        Self {
            platform,
            network_addr: network_addr.parse().ok(),
            timeout,
        }
    }

    fn display_available(&self) -> bool {
        match self.platform {
            // Headless sessions (ssh, containers, CI) have neither variable set
            Platform::Linux => ["DISPLAY", "WAYLAND_DISPLAY"]
                .iter()
                .any(|var| std::env::var(var).map_or(false, |v| !v.is_empty())),
            Platform::Mac | Platform::Windows => true,
        }
    }

    fn audio_available(&self) -> bool {
        match self.platform {
            Platform::Linux => Path::new("/dev/snd").exists(),
            Platform::Mac | Platform::Windows => true,
        }
    }

    fn network_available(&self) -> bool {
        let Some(addr) = self.network_addr else {
            return false;
        };
        TcpStream::connect_timeout(&addr, self.timeout).is_ok()
    }
}

impl LivenessProbe for SystemProbe {
    fn is_available(&self, resource: Resource) -> bool {
        let available = match resource {
            Resource::Display => self.display_available(),
            Resource::Audio => self.audio_available(),
            Resource::Network => self.network_available(),
        };
        tracing::debug!("Probe {}: {}", resource, if available { "up" } else { "down" });
        available
    }
}

/// Fixed answers, for headless runs and tests
#[derive(Debug, Clone, Default)]
pub struct StaticProbe {
    unavailable: Vec<Resource>,
}

impl StaticProbe {
    /// Every resource available
    pub fn all_available() -> Self {
        Self::default()
    }

    /// Every resource missing
    pub fn none_available() -> Self {
        Self {
            unavailable: vec![Resource::Display, Resource::Audio, Resource::Network],
        }
    }

    pub fn without(mut self, resource: Resource) -> Self {
        if !self.unavailable.contains(&resource) {
            self.unavailable.push(resource);
        }
        self
    }
}

impl LivenessProbe for StaticProbe {
    fn is_available(&self, resource: Resource) -> bool {
        !self.unavailable.contains(&resource)
    }
}
