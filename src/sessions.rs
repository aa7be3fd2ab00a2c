//! Server-side report state, one entry per browser session.
//!
//! The session cookie only carries a [`Uuid`]. Handlers lock the store for
//! short, non-blocking sections; remote calls happen between two locks.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::domain::report::ReportState;
use crate::domain::types::PageSize;

struct Entry {
    state: ReportState,
    touched: Instant,
}

pub struct ReportStore {
    entries: Mutex<HashMap<Uuid, Entry>>,
    idle_timeout: Duration,
    default_page_size: PageSize,
}

impl ReportStore {
    pub fn new(idle_timeout: Duration, default_page_size: PageSize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            idle_timeout,
            default_page_size,
        }
    }

    /// Runs `f` against the state of `session_id`, creating and mounting it on
    /// first use. Entries idle for longer than the timeout are evicted.
    pub fn with_state<R>(&self, session_id: Uuid, f: impl FnOnce(&mut ReportState) -> R) -> R {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        let idle_timeout = self.idle_timeout;
        let before = entries.len();
        entries.retain(|id, entry| {
            *id == session_id || now.duration_since(entry.touched) <= idle_timeout
        });
        if entries.len() < before {
            log::info!("Evicted {} idle report sessions", before - entries.len());
        }

        let default_page_size = self.default_page_size;
        let entry = entries.entry(session_id).or_insert_with(|| {
            let mut state = ReportState::new(default_page_size);
            state.mount();
            Entry { state, touched: now }
        });
        entry.touched = now;
        f(&mut entry.state)
    }

    /// Copy of the current state for rendering.
    pub fn snapshot(&self, session_id: Uuid) -> ReportState {
        self.with_state(session_id, |state| state.clone())
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
