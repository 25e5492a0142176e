//! Keeps the desktop and mobile control surfaces on one filter state.
//!
//! Each surface writes through [`ControlStateSync::set_field`]. The canonical
//! [`FilterState`] is updated, the other surface's control is echoed silently
//! (no change notification for the echo), and a rebuild is scheduled:
//! immediately for discrete fields, after a quiet period for free text.
//! A newer change replaces whatever rebuild was still pending, and the
//! rebuild always reads the state as it is when it fires.

use std::time::{Duration, Instant};

use super::filter::{ControlField, FilterState};
use crate::error::Result;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Which set of controls a change came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Desktop,
    Mobile,
}

impl Surface {
    pub fn other(self) -> Self {
        match self {
            Surface::Desktop => Surface::Mobile,
            Surface::Mobile => Surface::Desktop,
        }
    }

    fn index(self) -> usize {
        match self {
            Surface::Desktop => 0,
            Surface::Mobile => 1,
        }
    }
}

type Listener = Box<dyn FnMut(ControlField, &FilterState)>;

pub struct ControlStateSync {
    state: FilterState,
    /// What each surface's controls currently display
    controls: [FilterState; 2],
    listeners: Vec<Listener>,
    debounce: Duration,
    rebuild_at: Option<Instant>,
}

impl ControlStateSync {
    pub fn new(initial: FilterState, debounce: Duration) -> Self {
        Self {
            controls: [initial.clone(), initial.clone()],
            state: initial,
            listeners: Vec::new(),
            debounce,
            rebuild_at: None,
        }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// Value shown by one surface's control
    pub fn control_value(&self, surface: Surface, field: ControlField) -> String {
        self.controls[surface.index()].get(field)
    }

    /// Subscribe to canonical state changes
    pub fn on_change(&mut self, listener: impl FnMut(ControlField, &FilterState) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Record a control change from `surface`.
    ///
    /// Returns whether the canonical state changed. Setting a field to the
    /// value it already has schedules nothing.
    pub fn set_field(
        &mut self,
        surface: Surface,
        field: ControlField,
        value: &str,
        now: Instant,
    ) -> Result<bool> {
        self.controls[surface.index()].set(field, value)?;

        if !self.state.set(field, value)? {
            return Ok(false);
        }

        // Silent echo, listeners fire once below
        self.controls[surface.other().index()].set(field, value)?;

        for listener in &mut self.listeners {
            listener(field, &self.state);
        }

        let due = if field.is_free_text() {
            now + self.debounce
        } else {
            now
        };
        if self.rebuild_at.is_some() {
            tracing::debug!(%field, "superseding pending rebuild");
        }
        self.rebuild_at = Some(due);

        Ok(true)
    }

    /// Whether a rebuild is waiting to fire
    pub fn rebuild_pending(&self) -> bool {
        self.rebuild_at.is_some()
    }

    /// When the pending rebuild is due, if any
    pub fn next_deadline(&self) -> Option<Instant> {
        self.rebuild_at
    }

    /// Take the pending rebuild if it is due, returning the state to build
    /// with. At most one rebuild is handed out per burst of changes.
    pub fn poll_rebuild(&mut self, now: Instant) -> Option<FilterState> {
        match self.rebuild_at {
            Some(due) if due <= now => {
                self.rebuild_at = None;
                Some(self.state.clone())
            }
            _ => None,
        }
    }
}

impl Default for ControlStateSync {
    fn default() -> Self {
        Self::new(FilterState::default(), DEFAULT_DEBOUNCE)
    }
}
