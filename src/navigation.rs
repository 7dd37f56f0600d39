//! Per-session navigation signalling between command handlers and playback.
//!
//! A session owns one [`NavigationReceiver`]; command handlers hold cloned
//! [`NavigationSender`]s. The hand-off is a single latched slot: senders never
//! block, a newer Next/Previous replaces an unconsumed one, and a pending Stop
//! is never replaced.

use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NavigationIntent {
    /// Skip to the following track.
    Next,
    /// Go back to the track before the one currently rendering.
    Previous,
    /// End the session.
    Stop,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Compute the cursor that follows `cursor` when moving in `direction`.
///
/// Backward means "the track before the one just played", clamped at the first
/// track. Whether the result is past the end is left to the caller.
pub fn advance(cursor: usize, direction: Direction) -> usize {
    match direction {
        Direction::Forward => cursor.saturating_add(1),
        Direction::Backward => cursor.saturating_sub(1),
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("playback session has ended")]
pub struct SessionClosed;

#[derive(Default)]
struct SlotState {
    pending: Option<NavigationIntent>,
    closed: bool,
}

#[derive(Default)]
struct Slot {
    state: Mutex<SlotState>,
    ready: Condvar,
}

impl Slot {
    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Create a connected sender/receiver pair for one session.
pub fn navigation_channel() -> (NavigationSender, NavigationReceiver) {
    let slot = Arc::new(Slot::default());
    (
        NavigationSender { slot: slot.clone() },
        NavigationReceiver { slot },
    )
}

#[derive(Clone)]
pub struct NavigationSender {
    slot: Arc<Slot>,
}

impl NavigationSender {
    /// Latch `intent` for the session. Fails once the session has dropped its receiver.
    pub fn send(&self, intent: NavigationIntent) -> Result<(), SessionClosed> {
        let mut state = self.slot.lock();
        if state.closed {
            return Err(SessionClosed);
        }
        if state.pending != Some(NavigationIntent::Stop) {
            state.pending = Some(intent);
        }
        drop(state);
        self.slot.ready.notify_all();
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.slot.lock().closed
    }

    /// Whether both senders feed the same receiver.
    pub fn same_session(&self, other: &NavigationSender) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }
}

pub struct NavigationReceiver {
    slot: Arc<Slot>,
}

impl NavigationReceiver {
    /// Take the pending intent, if any, without waiting.
    pub fn try_recv(&self) -> Option<NavigationIntent> {
        self.slot.lock().pending.take()
    }

    /// Consume a pending Stop. Next/Previous stay latched for the next render.
    pub fn take_stop(&self) -> bool {
        let mut state = self.slot.lock();
        if state.pending == Some(NavigationIntent::Stop) {
            state.pending = None;
            true
        } else {
            false
        }
    }

    /// Wait up to `timeout` for an intent and consume it.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<NavigationIntent> {
        let state = self.slot.lock();
        let (mut state, _) = self
            .slot
            .ready
            .wait_timeout_while(state, timeout, |s| s.pending.is_none())
            .unwrap_or_else(|e| e.into_inner());
        state.pending.take()
    }
}

impl Drop for NavigationReceiver {
    fn drop(&mut self) {
        let mut state = self.slot.lock();
        state.closed = true;
        state.pending = None;
    }
}
