//! Platform resolution - picks exactly one implementation per capability
//!
//! Preference: host-specific > "any" > simulated > unavailable. A concrete
//! choice whose required resource fails its probe is demoted to the
//! simulated variant instead of erroring, so a missing peripheral degrades
//! a command rather than failing the session.

use std::sync::Arc;

use crate::capability::implementation::Implementation;
use crate::capability::registry::{Binding, CapabilityRegistry};
use crate::capability::schema::Capability;
use crate::core::error::{AgentError, Result};
use crate::core::types::{Platform, PlatformTag};
use crate::platform::probe::LivenessProbe;

/// The implementation chosen for one capability lookup
#[derive(Debug, Clone)]
pub struct Resolution {
    pub capability: Arc<Capability>,
    pub implementation: Arc<Implementation>,
    pub tag: PlatformTag,
    /// A simulated stand-in was chosen
    pub degraded: bool,
    /// Why the resolution is degraded
    pub reason: Option<String>,
}

/// Resolves capabilities against the host platform
pub struct PlatformResolver {
    registry: Arc<CapabilityRegistry>,
    host: Platform,
    probe: Arc<dyn LivenessProbe>,
}

impl PlatformResolver {
    pub fn new(
        registry: Arc<CapabilityRegistry>,
        host: Platform,
        probe: Arc<dyn LivenessProbe>,
    ) -> Self {
        Self {
            registry,
            host,
            probe,
        }
    }

    /// Detect the operating environment this process runs on
    ///
    /// Other unix-likes are treated as Linux.
    pub fn detect_host() -> Platform {
        match std::env::consts::OS {
            "macos" => Platform::Mac,
            "windows" => Platform::Windows,
            _ => Platform::Linux,
        }
    }

    pub fn host(&self) -> Platform {
        self.host
    }

    pub fn registry(&self) -> &Arc<CapabilityRegistry> {
        &self.registry
    }

    /// Resolve for the configured host platform
    pub fn resolve(&self, capability_id: &str) -> Result<Resolution> {
        self.resolve_for(capability_id, self.host)
    }

    /// Resolve for an explicit host platform
    pub fn resolve_for(&self, capability_id: &str, host: Platform) -> Result<Resolution> {
        let bindings = self.registry.lookup(capability_id)?;
        let capability = self
            .registry
            .capability(capability_id)
            .ok_or_else(|| AgentError::UnknownCapability(capability_id.to_string()))?;

        let specific = PlatformTag::for_platform(host);
        let find = |tag: PlatformTag| bindings.iter().find(|b| b.tag == tag);
        let simulated = find(PlatformTag::Simulated);

        let Some(chosen) = find(specific).or_else(|| find(PlatformTag::Any)) else {
            return match simulated {
                Some(sim) => {
                    let reason = format!("no implementation for {}", host);
                    tracing::warn!("{}: {}, using simulated", capability_id, reason);
                    Ok(Self::degraded(capability, sim, reason))
                }
                None => Err(AgentError::CapabilityUnavailable {
                    capability: capability_id.to_string(),
                    platform: host,
                    reason: "no implementation for this platform".into(),
                }),
            };
        };

        let missing = chosen
            .implementation
            .requires
            .iter()
            .find(|r| !self.probe.is_available(**r));

        match (missing, simulated) {
            (None, _) => {
                tracing::debug!(
                    "{} resolved to {} ({})",
                    capability_id,
                    chosen.implementation.name,
                    chosen.tag
                );
                Ok(Resolution {
                    capability,
                    implementation: Arc::clone(&chosen.implementation),
                    tag: chosen.tag,
                    degraded: false,
                    reason: None,
                })
            }
            (Some(resource), Some(sim)) => {
                let reason = format!("{} unavailable", resource);
                tracing::warn!("{}: {}, demoting to simulated", capability_id, reason);
                Ok(Self::degraded(capability, sim, reason))
            }
            (Some(resource), None) => Err(AgentError::CapabilityUnavailable {
                capability: capability_id.to_string(),
                platform: host,
                reason: format!("{} unavailable and no simulated fallback", resource),
            }),
        }
    }

    fn degraded(capability: Arc<Capability>, sim: &Binding, reason: String) -> Resolution {
        Resolution {
            capability,
            implementation: Arc::clone(&sim.implementation),
            tag: PlatformTag::Simulated,
            degraded: true,
            reason: Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::implementation::HandlerOutput;
    use crate::core::types::Resource;
    use crate::platform::probe::StaticProbe;

    fn imp(name: &str) -> Implementation {
        Implementation::from_fn(name, |_| Ok(HandlerOutput::new("ok")))
    }

    fn resolver(registry: CapabilityRegistry, probe: StaticProbe) -> PlatformResolver {
        PlatformResolver::new(Arc::new(registry), Platform::Linux, Arc::new(probe))
    }

    fn declared(id: &str) -> CapabilityRegistry {
        let mut r = CapabilityRegistry::new();
        r.declare(Capability::new(id, "test"));
        r
    }

    #[test]
    fn test_specific_beats_any() {
        let mut r = declared("open_url");
        r.register("open_url", imp("generic"), PlatformTag::Any).unwrap();
        r.register("open_url", imp("xdg-open"), PlatformTag::Linux).unwrap();
        r.register("open_url", Implementation::simulated(), PlatformTag::Simulated)
            .unwrap();

        let res = resolver(r, StaticProbe::all_available()).resolve("open_url").unwrap();
        assert_eq!(res.implementation.name, "xdg-open");
        assert_eq!(res.tag, PlatformTag::Linux);
        assert!(!res.degraded);
    }

    #[test]
    fn test_any_used_when_no_specific() {
        let mut r = declared("calculate");
        r.register("calculate", imp("calc"), PlatformTag::Any).unwrap();
        r.register("calculate", imp("mac-calc"), PlatformTag::Mac).unwrap();

        let res = resolver(r, StaticProbe::all_available()).resolve("calculate").unwrap();
        assert_eq!(res.implementation.name, "calc");
        assert_eq!(res.tag, PlatformTag::Any);
    }

    #[test]
    fn test_simulated_when_nothing_concrete() {
        let mut r = declared("move_mouse");
        r.register("move_mouse", Implementation::simulated(), PlatformTag::Simulated)
            .unwrap();

        let res = resolver(r, StaticProbe::all_available()).resolve("move_mouse").unwrap();
        assert!(res.degraded);
        assert_eq!(res.tag, PlatformTag::Simulated);
    }

    #[test]
    fn test_unavailable_when_other_platform_only() {
        let mut r = declared("take_screenshot");
        r.register("take_screenshot", imp("screencapture"), PlatformTag::Mac)
            .unwrap();

        let err = resolver(r, StaticProbe::all_available())
            .resolve("take_screenshot")
            .unwrap_err();
        assert!(matches!(
            err,
            AgentError::CapabilityUnavailable { platform: Platform::Linux, .. }
        ));
    }

    #[test]
    fn test_failed_probe_demotes_to_simulated() {
        let mut r = declared("take_screenshot");
        r.register(
            "take_screenshot",
            imp("gnome-screenshot").requires(Resource::Display),
            PlatformTag::Linux,
        )
        .unwrap();
        r.register("take_screenshot", Implementation::simulated(), PlatformTag::Simulated)
            .unwrap();

        let res = resolver(r, StaticProbe::all_available().without(Resource::Display))
            .resolve("take_screenshot")
            .unwrap();
        assert!(res.degraded);
        assert_eq!(res.reason.as_deref(), Some("display unavailable"));
    }

    #[test]
    fn test_failed_probe_without_simulated_is_unavailable() {
        let mut r = declared("get_weather");
        r.register(
            "get_weather",
            imp("http").requires(Resource::Network),
            PlatformTag::Any,
        )
        .unwrap();

        let err = resolver(r, StaticProbe::none_available())
            .resolve("get_weather")
            .unwrap_err();
        assert!(err.to_string().contains("network unavailable"));
    }

    #[test]
    fn test_unknown_capability() {
        let err = resolver(CapabilityRegistry::new(), StaticProbe::all_available())
            .resolve("fly")
            .unwrap_err();
        assert!(matches!(err, AgentError::UnknownCapability(_)));
    }

    #[test]
    fn test_resolve_for_explicit_platform() {
        let mut r = declared("take_screenshot");
        r.register("take_screenshot", imp("screencapture"), PlatformTag::Mac)
            .unwrap();
        let resolver = resolver(r, StaticProbe::all_available());
        let res = resolver.resolve_for("take_screenshot", Platform::Mac).unwrap();
        assert_eq!(res.implementation.name, "screencapture");
    }
}
