//! Per-controller in-flight tracking
//!
//! A second submission of an action that is still waiting on the backend is
//! rejected with [`ClientError::Busy`]. The RAII guard clears the entry on
//! every exit path, which is what makes `loading` fall back to false whether
//! the call succeeded or not.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{ClientError, ClientResult};

#[derive(Debug, Default, Clone)]
pub struct InFlight {
    active: Arc<Mutex<HashSet<&'static str>>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `action` as running until the returned guard drops
    pub fn begin(&self, action: &'static str) -> ClientResult<InFlightGuard> {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if !active.insert(action) {
            tracing::debug!(action, "Rejected re-entrant submission");
            return Err(ClientError::Busy(action.to_string()));
        }

        Ok(InFlightGuard {
            active: Arc::clone(&self.active),
            action,
        })
    }

    pub fn is_active(&self, action: &str) -> bool {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(action)
    }

    /// True while any action is pending
    pub fn any(&self) -> bool {
        !self
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

#[derive(Debug)]
#[must_use = "the action is released as soon as the guard drops"]
pub struct InFlightGuard {
    active: Arc<Mutex<HashSet<&'static str>>>,
    action: &'static str,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(self.action);
    }
}
