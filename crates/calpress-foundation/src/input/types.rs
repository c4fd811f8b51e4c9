use calpress_ui_graphics::Point;
use std::cell::Cell;
use std::rc::Rc;

pub type PointerId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    Cancel,
    /// Pointer left the surface while pressed.
    Leave,
}

/// Physical device behind a pointer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PointerKind {
    #[default]
    Mouse,
    Pen,
    Touch,
}

impl PointerKind {
    /// Coarse pointers get the larger hold indicator footprint.
    pub fn is_coarse(&self) -> bool {
        matches!(self, PointerKind::Touch)
    }
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary = 0,
    Secondary = 1,
    Middle = 2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointerButtons(u8);

impl PointerButtons {
    pub const NONE: Self = Self(0);

    pub fn new() -> Self {
        Self::NONE
    }

    pub fn with(mut self, button: PointerButton) -> Self {
        self.insert(button);
        self
    }

    pub fn insert(&mut self, button: PointerButton) {
        self.0 |= 1 << (button as u8);
    }

    pub fn remove(&mut self, button: PointerButton) {
        self.0 &= !(1 << (button as u8));
    }

    pub fn contains(&self, button: PointerButton) -> bool {
        (self.0 & (1 << (button as u8))) != 0
    }
}

impl Default for PointerButtons {
    fn default() -> Self {
        Self::NONE
    }
}

/// Pointer event in surface-local coordinates.
///
/// Consumption is shared across clones so the host can tell whether the
/// gesture engine claimed the event (and suppress native handling).
#[derive(Clone, Debug)]
pub struct PointerEvent {
    pub id: PointerId,
    pub kind: PointerEventKind,
    pub pointer_kind: PointerKind,
    pub position: Point,
    pub buttons: PointerButtons,
    consumed: Rc<Cell<bool>>,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, position: Point) -> Self {
        Self {
            id: 0,
            kind,
            pointer_kind: PointerKind::Mouse,
            position,
            buttons: PointerButtons::NONE,
            consumed: Rc::new(Cell::new(false)),
        }
    }

    /// Primary-button press.
    pub fn down(id: PointerId, position: Point, pointer_kind: PointerKind) -> Self {
        Self::new(PointerEventKind::Down, position)
            .with_id(id)
            .with_pointer_kind(pointer_kind)
            .with_buttons(PointerButtons::NONE.with(PointerButton::Primary))
    }

    pub fn moved(id: PointerId, position: Point) -> Self {
        Self::new(PointerEventKind::Move, position).with_id(id)
    }

    pub fn up(id: PointerId, position: Point) -> Self {
        Self::new(PointerEventKind::Up, position).with_id(id)
    }

    pub fn cancel(id: PointerId) -> Self {
        Self::new(PointerEventKind::Cancel, Point::ZERO).with_id(id)
    }

    pub fn leave(id: PointerId, position: Point) -> Self {
        Self::new(PointerEventKind::Leave, position).with_id(id)
    }

    pub fn with_id(mut self, id: PointerId) -> Self {
        self.id = id;
        self
    }

    pub fn with_pointer_kind(mut self, pointer_kind: PointerKind) -> Self {
        self.pointer_kind = pointer_kind;
        self
    }

    pub fn with_buttons(mut self, buttons: PointerButtons) -> Self {
        self.buttons = buttons;
        self
    }

    /// Mouse presses only count with the primary button; touch and pen
    /// contacts always do.
    pub fn is_primary_press(&self) -> bool {
        self.kind == PointerEventKind::Down
            && (self.pointer_kind != PointerKind::Mouse
                || self.buttons.contains(PointerButton::Primary))
    }

    pub fn consume(&self) {
        self.consumed.set(true);
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secondary_mouse_button_is_not_a_primary_press() {
        let event = PointerEvent::new(PointerEventKind::Down, Point::ZERO)
            .with_buttons(PointerButtons::NONE.with(PointerButton::Secondary));
        assert!(!event.is_primary_press());

        let touch = PointerEvent::new(PointerEventKind::Down, Point::ZERO)
            .with_pointer_kind(PointerKind::Touch);
        assert!(touch.is_primary_press());
    }

    #[test]
    fn consumption_is_shared_between_clones() {
        let event = PointerEvent::down(1, Point::new(4.0, 4.0), PointerKind::Mouse);
        let copy = event.clone();
        copy.consume();
        assert!(event.is_consumed());
    }

    #[test]
    fn only_touch_is_coarse() {
        assert!(PointerKind::Touch.is_coarse());
        assert!(!PointerKind::Mouse.is_coarse());
        assert!(!PointerKind::Pen.is_coarse());
    }
}
