//! Re-entrancy safe pointer event queue.
//!
//! Collaborators (action handlers, listeners) may synthesize pointer events
//! while an event is still being processed. Those events are queued and
//! delivered in order once the outer dispatch unwinds.

use super::types::PointerEvent;
use std::collections::VecDeque;

#[derive(Default)]
pub struct PointerDispatcher {
    queue: VecDeque<PointerEvent>,
    dispatching: bool,
}

impl PointerDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: PointerEvent) {
        self.queue.push_back(event);
    }

    /// Claims the dispatch loop. Returns `false` when a dispatch is already
    /// running further up the stack; the caller should just enqueue.
    pub fn begin(&mut self) -> bool {
        if self.dispatching {
            return false;
        }
        self.dispatching = true;
        true
    }

    pub fn pop(&mut self) -> Option<PointerEvent> {
        self.queue.pop_front()
    }

    pub fn end(&mut self) {
        self.dispatching = false;
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PointerKind;
    use calpress_ui_graphics::Point;

    #[test]
    fn nested_begin_is_rejected_until_end() {
        let mut dispatcher = PointerDispatcher::new();
        assert!(dispatcher.begin());
        assert!(!dispatcher.begin());
        dispatcher.end();
        assert!(dispatcher.begin());
    }

    #[test]
    fn events_pop_in_fifo_order() {
        let mut dispatcher = PointerDispatcher::new();
        dispatcher.push(PointerEvent::down(1, Point::ZERO, PointerKind::Touch));
        dispatcher.push(PointerEvent::up(1, Point::ZERO));
        assert_eq!(dispatcher.len(), 2);
        assert_eq!(dispatcher.pop().map(|e| e.kind), Some(crate::PointerEventKind::Down));
        assert_eq!(dispatcher.pop().map(|e| e.kind), Some(crate::PointerEventKind::Up));
        assert!(dispatcher.is_empty());
    }
}
