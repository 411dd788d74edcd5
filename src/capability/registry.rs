//! Capability registry: canonical names mapped to platform-tagged implementations
//!
//! Built once at startup and then shared read-only (behind an `Arc`) by the
//! resolver, so it needs no locking.

use ahash::AHashMap;
use std::sync::Arc;

use crate::capability::implementation::Implementation;
use crate::capability::schema::Capability;
use crate::core::error::{AgentError, Result};
use crate::core::types::PlatformTag;

/// An implementation together with the tag it is registered under
#[derive(Debug, Clone)]
pub struct Binding {
    pub tag: PlatformTag,
    pub implementation: Arc<Implementation>,
}

/// What a `register` call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Bound,
    /// A repeated `any` binding for a capability that already has a specific
    /// one; the existing bindings stay as they are
    Shadowed,
}

#[derive(Debug)]
struct Entry {
    capability: Arc<Capability>,
    /// Registration order is preserved
    bindings: Vec<Binding>,
}

/// Registry of capabilities and their implementations
#[derive(Debug, Default)]
pub struct CapabilityRegistry {
    entries: AHashMap<String, Entry>,
    /// Declaration order, for stable listings
    order: Vec<String>,
}

impl CapabilityRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a catalog and the host application's
    /// (capability, tag, implementation) bindings
    pub fn bootstrap<C, B>(catalog: C, bindings: B) -> Result<Self>
    where
        C: IntoIterator<Item = Capability>,
        B: IntoIterator<Item = (String, PlatformTag, Implementation)>,
    {
        let mut registry = Self::new();
        for capability in catalog {
            registry.declare(capability);
        }
        for (id, tag, implementation) in bindings {
            registry.register(&id, implementation, tag)?;
        }
        tracing::debug!(
            "Registry bootstrapped with {} capabilities",
            registry.order.len()
        );
        Ok(registry)
    }

    /// Declare a capability schema; re-declaring replaces the schema and
    /// keeps existing bindings
    pub fn declare(&mut self, capability: Capability) {
        let id = capability.id.clone();
        match self.entries.get_mut(&id) {
            Some(entry) => entry.capability = Arc::new(capability),
            None => {
                self.order.push(id.clone());
                self.entries.insert(
                    id,
                    Entry {
                        capability: Arc::new(capability),
                        bindings: Vec::new(),
                    },
                );
            }
        }
    }

    /// Bind an implementation to a declared capability under a platform tag
    pub fn register(
        &mut self,
        capability_id: &str,
        implementation: Implementation,
        tag: PlatformTag,
    ) -> Result<Registration> {
        let entry = self
            .entries
            .get_mut(capability_id)
            .ok_or_else(|| AgentError::UnknownCapability(capability_id.to_string()))?;

        if entry.bindings.iter().any(|b| b.tag == tag) {
            let has_specific = entry.bindings.iter().any(|b| b.tag.is_specific());
            if tag == PlatformTag::Any && has_specific {
                tracing::debug!(
                    "Ignoring repeated 'any' binding for {}; specific binding wins",
                    capability_id
                );
                return Ok(Registration::Shadowed);
            }
            return Err(AgentError::DuplicateCapability {
                capability: capability_id.to_string(),
                tag,
            });
        }

        entry.bindings.push(Binding {
            tag,
            implementation: Arc::new(implementation),
        });
        Ok(Registration::Bound)
    }

    /// All bindings of a capability
    ///
    /// A declared capability with no bindings yields an empty list; an id
    /// that was never declared is an error.
    pub fn lookup(&self, capability_id: &str) -> Result<Vec<Binding>> {
        self.entries
            .get(capability_id)
            .map(|e| e.bindings.clone())
            .ok_or_else(|| AgentError::UnknownCapability(capability_id.to_string()))
    }

    pub fn capability(&self, capability_id: &str) -> Option<Arc<Capability>> {
        self.entries
            .get(capability_id)
            .map(|e| Arc::clone(&e.capability))
    }

    /// Capabilities in declaration order
    pub fn capabilities(&self) -> Vec<Arc<Capability>> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id))
            .map(|e| Arc::clone(&e.capability))
            .collect()
    }

    /// Tags a capability is bound under
    pub fn platforms(&self, capability_id: &str) -> Vec<PlatformTag> {
        self.entries
            .get(capability_id)
            .map(|e| e.bindings.iter().map(|b| b.tag).collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, capability_id: &str) -> bool {
        self.entries.contains_key(capability_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
