//! Frame clock with cancellable tick subscriptions
//!
//! An overlay subscribes on mount and holds the returned guard for its whole
//! lifetime. The host only keeps requesting animation frames while at least
//! one subscription is live, so a forgotten subscription shows up as a loop
//! that never stops; `TickSubscription` cancels itself on drop to rule that out.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Identifier of a tick subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// One frame handed out by the clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Frames advanced while at least one subscriber was live
    pub index: u64,
    /// Seconds since the previous frame (already clamped)
    pub dt: f32,
}

#[derive(Debug, Default)]
struct ClockState {
    next_id: u64,
    /// Live subscriptions, in subscription order
    live: Vec<SubscriptionId>,
    frames: u64,
    elapsed: f64,
}

/// Shared frame clock (single-threaded)
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    inner: Rc<RefCell<ClockState>>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register for per-frame ticks
    pub fn subscribe(&self) -> TickSubscription {
        let mut state = self.inner.borrow_mut();
        let id = SubscriptionId(state.next_id);
        state.next_id += 1;
        state.live.push(id);
        TickSubscription {
            id,
            clock: Rc::downgrade(&self.inner),
            live: true,
        }
    }

    /// Number of live subscriptions
    pub fn active_count(&self) -> usize {
        self.inner.borrow().live.len()
    }

    pub fn is_live(&self, id: SubscriptionId) -> bool {
        self.inner.borrow().live.contains(&id)
    }

    /// Advance the clock by one display refresh.
    ///
    /// Returns `None` when nobody is subscribed, which tells the host to stop
    /// requesting frames.
    pub fn advance(&self, dt: f32) -> Option<Frame> {
        let mut state = self.inner.borrow_mut();
        if state.live.is_empty() {
            return None;
        }
        let dt = dt.clamp(0.0, crate::consts::MAX_FRAME_DT);
        state.frames += 1;
        state.elapsed += dt as f64;
        Some(Frame {
            index: state.frames,
            dt,
        })
    }

    /// Frames delivered so far
    pub fn frames(&self) -> u64 {
        self.inner.borrow().frames
    }

    /// Seconds delivered so far
    pub fn elapsed(&self) -> f64 {
        self.inner.borrow().elapsed
    }
}

/// Guard for a live tick subscription
#[derive(Debug)]
pub struct TickSubscription {
    id: SubscriptionId,
    clock: Weak<RefCell<ClockState>>,
    live: bool,
}

impl TickSubscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Stop future ticks. Returns true only for the call that actually cancelled.
    pub fn cancel(&mut self) -> bool {
        if !self.live {
            return false;
        }
        self.live = false;
        if let Some(clock) = self.clock.upgrade() {
            clock.borrow_mut().live.retain(|id| *id != self.id);
        }
        true
    }
}

impl Drop for TickSubscription {
    fn drop(&mut self) {
        self.cancel();
    }
}
