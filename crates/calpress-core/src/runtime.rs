use crate::frame_clock::FrameClock;
use crate::{FrameCallbackId, SystemClock, TimerId};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::rc::{Rc, Weak};

/// Spacing of frame boundaries on the virtual clock (~60 FPS).
pub const FRAME_INTERVAL_MS: u64 = 16;

type TimerCallback = Box<dyn FnOnce() + 'static>;

struct FrameCallbackEntry {
    id: FrameCallbackId,
    callback: Option<Box<dyn FnOnce(u64) + 'static>>,
}

struct RuntimeInner {
    now_millis: Cell<u64>,
    /// Keyed by `(deadline, id)`, so iteration order is firing order.
    timers: RefCell<BTreeMap<(u64, TimerId), TimerCallback>>,
    deadlines: RefCell<FxHashMap<TimerId, u64>>,
    next_timer_id: Cell<u64>,
    frame_callbacks: RefCell<VecDeque<FrameCallbackEntry>>,
    next_frame_callback_id: Cell<u64>,
}

impl RuntimeInner {
    fn new(now_millis: u64) -> Self {
        Self {
            now_millis: Cell::new(now_millis),
            timers: RefCell::new(BTreeMap::new()),
            deadlines: RefCell::new(FxHashMap::default()),
            next_timer_id: Cell::new(1),
            frame_callbacks: RefCell::new(VecDeque::new()),
            next_frame_callback_id: Cell::new(1),
        }
    }

    fn schedule_timer(&self, delay_millis: u64, callback: TimerCallback) -> TimerId {
        let id = self.next_timer_id.get();
        self.next_timer_id.set(id + 1);
        let deadline = self.now_millis.get().saturating_add(delay_millis);
        self.timers.borrow_mut().insert((deadline, id), callback);
        self.deadlines.borrow_mut().insert(id, deadline);
        id
    }

    fn cancel_timer(&self, id: TimerId) -> bool {
        let Some(deadline) = self.deadlines.borrow_mut().remove(&id) else {
            return false;
        };
        self.timers.borrow_mut().remove(&(deadline, id)).is_some()
    }

    fn is_timer_pending(&self, id: TimerId) -> bool {
        self.deadlines.borrow().contains_key(&id)
    }

    /// Removes the earliest timer due at or before `up_to`. Ties go to the
    /// timer armed first.
    fn take_due_timer(&self, up_to: u64) -> Option<(u64, TimerCallback)> {
        let mut timers = self.timers.borrow_mut();
        let entry = timers.first_entry()?;
        let (deadline, id) = *entry.key();
        if deadline > up_to {
            return None;
        }
        let callback = entry.remove();
        drop(timers);
        self.deadlines.borrow_mut().remove(&id);
        Some((deadline, callback))
    }

    fn next_deadline(&self) -> Option<u64> {
        self.timers
            .borrow()
            .keys()
            .next()
            .map(|(deadline, _)| *deadline)
    }

    fn register_frame_callback(&self, callback: Box<dyn FnOnce(u64) + 'static>) -> FrameCallbackId {
        let id = self.next_frame_callback_id.get();
        self.next_frame_callback_id.set(id + 1);
        self.frame_callbacks
            .borrow_mut()
            .push_back(FrameCallbackEntry {
                id,
                callback: Some(callback),
            });
        id
    }

    fn cancel_frame_callback(&self, id: FrameCallbackId) {
        let mut callbacks = self.frame_callbacks.borrow_mut();
        if let Some(index) = callbacks.iter().position(|entry| entry.id == id) {
            callbacks.remove(index);
        }
    }

    fn has_frame_callbacks(&self) -> bool {
        !self.frame_callbacks.borrow().is_empty()
    }

    fn has_timers(&self) -> bool {
        !self.timers.borrow().is_empty()
    }

    fn drain_frame_callbacks(&self, frame_time_millis: u64) {
        // Callbacks registered while draining belong to the next frame.
        let mut callbacks = self.frame_callbacks.borrow_mut();
        let mut pending: SmallVec<[Box<dyn FnOnce(u64) + 'static>; 8]> =
            SmallVec::with_capacity(callbacks.len());
        while let Some(mut entry) = callbacks.pop_front() {
            if let Some(callback) = entry.callback.take() {
                pending.push(callback);
            }
        }
        drop(callbacks);
        for callback in pending {
            callback(frame_time_millis);
        }
    }

    fn fire_due_timers(&self, up_to: u64) -> usize {
        let mut fired = 0;
        while let Some((deadline, callback)) = self.take_due_timer(up_to) {
            if deadline > self.now_millis.get() {
                self.now_millis.set(deadline);
            }
            callback();
            fired += 1;
        }
        fired
    }
}

/// Owner of the virtual clock, timers and frame callbacks.
///
/// The runtime never reads wall time on its own. Tests call
/// [`Runtime::advance_to`] with synthetic timestamps and real hosts call
/// [`Runtime::pump`] with a [`SystemClock`].
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(now_millis: u64) -> Self {
        Self {
            inner: Rc::new(RuntimeInner::new(now_millis)),
        }
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn now_millis(&self) -> u64 {
        self.inner.now_millis.get()
    }

    /// Moves the clock forward to `target_millis`.
    ///
    /// Timers fire in deadline order with the clock set to their deadline.
    /// Frame callbacks run on every [`FRAME_INTERVAL_MS`] boundary that is
    /// crossed and once more at `target_millis`. Moving backwards is ignored.
    pub fn advance_to(&self, target_millis: u64) {
        let inner = &self.inner;
        let mut now = inner.now_millis.get();
        inner.fire_due_timers(now);
        if target_millis <= now {
            return;
        }
        while now < target_millis {
            let boundary = (now / FRAME_INTERVAL_MS + 1) * FRAME_INTERVAL_MS;
            let frame_time = boundary.min(target_millis);
            inner.fire_due_timers(frame_time);
            inner.now_millis.set(frame_time);
            now = frame_time;
            inner.drain_frame_callbacks(frame_time);
        }
    }

    pub fn advance_by(&self, delta_millis: u64) {
        self.advance_to(self.now_millis().saturating_add(delta_millis));
    }

    /// Advances to the wall time reported by `clock`.
    pub fn pump(&self, clock: &SystemClock) {
        self.advance_to(clock.now_millis());
    }

    /// Keeps advancing frame by frame until no timers or frame callbacks
    /// remain, or until `limit_millis` of virtual time has elapsed.
    /// Returns `true` when the runtime went idle.
    pub fn run_until_idle(&self, limit_millis: u64) -> bool {
        let stop_at = self.now_millis().saturating_add(limit_millis);
        while self.has_pending_work() {
            let now = self.now_millis();
            if now >= stop_at {
                return false;
            }
            self.advance_to((now + FRAME_INTERVAL_MS).min(stop_at));
        }
        true
    }

    /// Deadline of the earliest armed timer; hosts use it for `WaitUntil`
    /// style scheduling.
    pub fn next_deadline(&self) -> Option<u64> {
        self.inner.next_deadline()
    }

    pub fn has_pending_work(&self) -> bool {
        self.inner.has_timers() || self.inner.has_frame_callbacks()
    }

    pub fn pending_timer_count(&self) -> usize {
        self.inner.timers.borrow().len()
    }
}

/// Weak handle to a [`Runtime`]. Every operation degrades to a no-op once
/// the runtime is gone.
#[derive(Clone)]
pub struct RuntimeHandle {
    inner: Weak<RuntimeInner>,
}

impl RuntimeHandle {
    pub fn now_millis(&self) -> u64 {
        self.inner
            .upgrade()
            .map(|inner| inner.now_millis.get())
            .unwrap_or_default()
    }

    pub fn schedule_timer(
        &self,
        delay_millis: u64,
        callback: impl FnOnce() + 'static,
    ) -> Option<TimerId> {
        self.inner
            .upgrade()
            .map(|inner| inner.schedule_timer(delay_millis, Box::new(callback)))
    }

    /// Cancelling an unknown, fired or already cancelled timer is a no-op.
    pub fn cancel_timer(&self, id: TimerId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.cancel_timer(id))
            .unwrap_or(false)
    }

    pub fn is_timer_pending(&self, id: TimerId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.is_timer_pending(id))
            .unwrap_or(false)
    }

    pub fn register_frame_callback(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> Option<FrameCallbackId> {
        self.inner
            .upgrade()
            .map(|inner| inner.register_frame_callback(Box::new(callback)))
    }

    pub fn cancel_frame_callback(&self, id: FrameCallbackId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.cancel_frame_callback(id);
        }
    }

    pub fn has_frame_callbacks(&self) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.has_frame_callbacks())
            .unwrap_or(false)
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.clone())
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
