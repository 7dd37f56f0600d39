use std::collections::HashSet;
use std::sync::{Condvar, Mutex};

/// Tracks which track ids are being downloaded right now, so concurrent
/// sessions never fetch the same track twice at once.
#[derive(Default)]
pub struct InFlight {
    active: Mutex<HashSet<String>>,
    done: Condvar,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `track_id`, waiting while another session holds it.
    pub fn acquire(&self, track_id: &str) -> InFlightGuard<'_> {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        while active.contains(track_id) {
            active = self.done.wait(active).unwrap_or_else(|e| e.into_inner());
        }
        active.insert(track_id.to_string());
        InFlightGuard {
            owner: self,
            track_id: track_id.to_string(),
        }
    }

    pub fn is_active(&self, track_id: &str) -> bool {
        self.active
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(track_id)
    }
}

pub struct InFlightGuard<'a> {
    owner: &'a InFlight,
    track_id: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut active = self.owner.active.lock().unwrap_or_else(|e| e.into_inner());
        active.remove(&self.track_id);
        drop(active);
        self.owner.done.notify_all();
    }
}
