//! One-shot timers on top of the runtime queue.

use crate::runtime::RuntimeHandle;
use crate::TimerId;

/// Opaque handle returned by [`SessionTimer::arm`]. Id `0` is never issued
/// and marks a timer that could not be armed because the runtime is gone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(TimerId);

impl TimerHandle {
    pub const INACTIVE: TimerHandle = TimerHandle(0);

    pub fn id(&self) -> TimerId {
        self.0
    }
}

/// Drop guard for a single timer.
pub struct TimerRegistration {
    runtime: RuntimeHandle,
    id: Option<TimerId>,
}

impl TimerRegistration {
    pub fn schedule(
        runtime: &RuntimeHandle,
        delay_millis: u64,
        callback: impl FnOnce() + 'static,
    ) -> Self {
        Self {
            runtime: runtime.clone(),
            id: runtime.schedule_timer(delay_millis, callback),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.id
            .map(|id| self.runtime.is_timer_pending(id))
            .unwrap_or(false)
    }

    pub fn cancel(mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.cancel_timer(id);
        }
    }
}

impl Drop for TimerRegistration {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.cancel_timer(id);
        }
    }
}

/// Single-slot scheduler for one gesture session.
///
/// At most one timer is armed at a time; arming again cancels the previous
/// timer first. Cancelling is idempotent.
pub struct SessionTimer {
    runtime: RuntimeHandle,
    armed: Option<TimerHandle>,
}

impl SessionTimer {
    pub fn new(runtime: RuntimeHandle) -> Self {
        Self {
            runtime,
            armed: None,
        }
    }

    pub fn arm(&mut self, delay_millis: u64, callback: impl FnOnce() + 'static) -> TimerHandle {
        self.cancel_armed();
        match self.runtime.schedule_timer(delay_millis, callback) {
            Some(id) => {
                let handle = TimerHandle(id);
                self.armed = Some(handle);
                handle
            }
            None => {
                log::warn!("runtime dropped; timer not armed");
                TimerHandle::INACTIVE
            }
        }
    }

    pub fn cancel(&mut self, handle: TimerHandle) {
        if handle != TimerHandle::INACTIVE {
            self.runtime.cancel_timer(handle.0);
        }
        if self.armed == Some(handle) {
            self.armed = None;
        }
    }

    pub fn cancel_armed(&mut self) {
        if let Some(handle) = self.armed.take() {
            self.runtime.cancel_timer(handle.0);
        }
    }

    /// Forgets the armed handle without touching the queue. Called from the
    /// timer's own callback, after the runtime already removed it.
    pub fn mark_fired(&mut self, handle: TimerHandle) {
        if self.armed == Some(handle) {
            self.armed = None;
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
            .map(|handle| self.runtime.is_timer_pending(handle.0))
            .unwrap_or(false)
    }

    pub fn armed_handle(&self) -> Option<TimerHandle> {
        self.armed
    }
}

impl Drop for SessionTimer {
    fn drop(&mut self) {
        self.cancel_armed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Runtime;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn arming_replaces_previous_timer() {
        let runtime = Runtime::new();
        let mut timer = SessionTimer::new(runtime.handle());
        let fired = Rc::new(Cell::new(0));

        let first = Rc::clone(&fired);
        timer.arm(100, move || first.set(first.get() + 1));
        let second = Rc::clone(&fired);
        timer.arm(100, move || second.set(second.get() + 10));

        assert_eq!(runtime.pending_timer_count(), 1);
        runtime.advance_to(200);
        assert_eq!(fired.get(), 10);
    }

    #[test]
    fn cancel_is_idempotent() {
        let runtime = Runtime::new();
        let mut timer = SessionTimer::new(runtime.handle());
        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);
        let handle = timer.arm(50, move || flag.set(true));

        timer.cancel(handle);
        timer.cancel(handle);
        timer.cancel(TimerHandle::INACTIVE);
        runtime.advance_to(100);

        assert!(!fired.get());
        assert!(!timer.is_armed());
    }

    #[test]
    fn cancel_after_fire_is_harmless() {
        let runtime = Runtime::new();
        let mut timer = SessionTimer::new(runtime.handle());
        let handle = timer.arm(10, || {});
        runtime.advance_to(20);

        assert!(!timer.is_armed());
        timer.cancel(handle);
        assert!(timer.armed_handle().is_none());
    }

    #[test]
    fn dropping_registration_cancels() {
        let runtime = Runtime::new();
        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);
        let registration = TimerRegistration::schedule(&runtime.handle(), 30, move || flag.set(true));
        assert!(registration.is_pending());
        drop(registration);
        runtime.advance_to(60);
        assert!(!fired.get());
    }

    #[test]
    fn arming_without_runtime_yields_inactive_handle() {
        let runtime = Runtime::new();
        let mut timer = SessionTimer::new(runtime.handle());
        drop(runtime);
        let handle = timer.arm(10, || {});
        assert_eq!(handle, TimerHandle::INACTIVE);
        assert!(!timer.is_armed());
    }
}
