//! Ambient location for navigation sessions.
//!
//! A single-shot render has no location at all; a long-lived session keeps
//! an in-memory history stack that navigation pushes onto.

use std::sync::{Mutex, MutexGuard};

/// Source of the current URL for a navigation session.
pub trait Location: Send + Sync {
    /// The current URL, if the host environment has one.
    fn current(&self) -> Option<String>;

    /// Record a navigation to `url`.
    fn push(&self, url: &str);

    /// Step back one entry. Returns the new current URL if it moved.
    fn back(&self) -> Option<String> {
        None
    }

    /// Step forward one entry. Returns the new current URL if it moved.
    fn forward(&self) -> Option<String> {
        None
    }
}

/// Location for one-shot server renders: there is no ambient URL.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLocation;

impl Location for NoLocation {
    fn current(&self) -> Option<String> {
        None
    }

    fn push(&self, _url: &str) {}
}

#[derive(Debug)]
struct HistoryState {
    current: String,
    past: Vec<String>,
    future: Vec<String>,
}

/// In-memory history stack for long-lived sessions.
#[derive(Debug)]
pub struct MemoryHistory {
    state: Mutex<HistoryState>,
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::with_initial_path("/")
    }
}

impl MemoryHistory {
    pub fn with_initial_path(path: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(HistoryState {
                current: path.into(),
                past: Vec::new(),
                future: Vec::new(),
            }),
        }
    }

    pub fn can_go_back(&self) -> bool {
        !self.lock().past.is_empty()
    }

    pub fn can_go_forward(&self) -> bool {
        !self.lock().future.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HistoryState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Location for MemoryHistory {
    fn current(&self) -> Option<String> {
        Some(self.lock().current.clone())
    }

    fn push(&self, url: &str) {
        let mut state = self.lock();
        // Same URL twice in a row is one entry.
        if state.current == url {
            return;
        }
        let old = std::mem::replace(&mut state.current, url.to_string());
        state.past.push(old);
        state.future.clear();
    }

    fn back(&self) -> Option<String> {
        let mut state = self.lock();
        let previous = state.past.pop()?;
        let old = std::mem::replace(&mut state.current, previous);
        state.future.push(old);
        Some(state.current.clone())
    }

    fn forward(&self) -> Option<String> {
        let mut state = self.lock();
        let next = state.future.pop()?;
        let old = std::mem::replace(&mut state.current, next);
        state.past.push(old);
        Some(state.current.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_location() {
        let loc = NoLocation;
        loc.push("/a");
        assert_eq!(loc.current(), None);
        assert_eq!(loc.back(), None);
    }

    #[test]
    fn test_memory_history_stack() {
        let history = MemoryHistory::default();
        assert_eq!(history.current().as_deref(), Some("/"));
        assert!(!history.can_go_back());

        history.push("/a");
        history.push("/a");
        history.push("/b");
        assert_eq!(history.current().as_deref(), Some("/b"));

        assert_eq!(history.back().as_deref(), Some("/a"));
        assert_eq!(history.back().as_deref(), Some("/"));
        assert_eq!(history.back(), None);
        assert!(history.can_go_forward());

        assert_eq!(history.forward().as_deref(), Some("/a"));
        history.push("/c");
        assert!(!history.can_go_forward());
        assert_eq!(history.current().as_deref(), Some("/c"));
    }
}
