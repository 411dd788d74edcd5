//! Per-conversation state used to resolve references across turns
//!
//! Only the execution engine mutates a session. Matchers, decomposers and
//! handlers see an owned `SessionSnapshot`, so they cannot write through it.

use ahash::AHashMap;
use serde_json::Value;
use std::collections::{BTreeMap, VecDeque};

use crate::core::types::SessionId;
use crate::plan::result::{StepResult, StepStatus};
use crate::plan::Step;

/// Well-known slot names
pub mod slots {
    /// Application most recently opened or focused
    pub const ACTIVE_WINDOW: &str = "active_window";
    /// Page most recently opened in the browser
    pub const ACTIVE_TAB: &str = "active_tab";
    /// File most recently written, captured or created
    pub const LAST_FILE: &str = "last_file";
}

/// One executed (or skipped) step in session history
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub step: Step,
    pub status: StepStatus,
    pub degraded: bool,
}

/// Mutable, process-lifetime conversation state
#[derive(Debug)]
pub struct SessionContext {
    id: SessionId,
    capacity: usize,
    history: VecDeque<HistoryEntry>,
    last_success: Option<Step>,
    slots: AHashMap<String, Value>,
}

impl SessionContext {
    /// Create a session keeping at most `capacity` history entries
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            id: SessionId::new(),
            capacity,
            history: VecDeque::with_capacity(capacity),
            last_success: None,
            slots: AHashMap::new(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Record a step outcome
    ///
    /// Successful steps become the last success (unless they only delegated
    /// to a nested plan, whose own steps were recorded already) and apply
    /// their slot updates.
    pub fn update(&mut self, step: &Step, result: &StepResult) {
        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(HistoryEntry {
            step: step.clone(),
            status: result.status,
            degraded: result.degraded,
        });

        if result.is_success() {
            if !result.delegated {
                self.last_success = Some(step.clone());
            }
            for (name, value) in &result.slots {
                self.slots.insert(name.clone(), value.clone());
            }
        }
    }

    pub fn get_slot(&self, name: &str) -> Option<&Value> {
        self.slots.get(name)
    }

    pub fn set_slot(&mut self, name: impl Into<String>, value: Value) {
        self.slots.insert(name.into(), value);
    }

    /// The last `n` history entries, oldest first
    pub fn recent(&self, n: usize) -> Vec<&HistoryEntry> {
        let skip = self.history.len().saturating_sub(n);
        self.history.iter().skip(skip).collect()
    }

    pub fn last_success(&self) -> Option<&Step> {
        self.last_success.as_ref()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Forget everything; the session keeps its id
    pub fn reset(&mut self) {
        self.history.clear();
        self.last_success = None;
        self.slots.clear();
        tracing::debug!("Session {} reset", self.id);
    }

    /// Owned read-only copy for collaborators
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            last_success: self.last_success.clone(),
            slots: self
                .slots
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            recent: self.history.iter().cloned().collect(),
        }
    }
}

/// Read-only view of a session at one point in time
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub last_success: Option<Step>,
    /// Sorted for stable prompt rendering
    pub slots: BTreeMap<String, Value>,
    /// History entries, oldest first
    pub recent: Vec<HistoryEntry>,
}

impl SessionSnapshot {
    pub fn slot(&self, name: &str) -> Option<&Value> {
        self.slots.get(name)
    }

    /// Slot value as a non-empty string
    pub fn slot_str(&self, name: &str) -> Option<&str> {
        self.slot(name)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }
}
