pub mod dispatcher;
pub mod types;

pub use dispatcher::PointerDispatcher;
pub use types::{
    PointerButton, PointerButtons, PointerEvent, PointerEventKind, PointerId, PointerKind,
};
