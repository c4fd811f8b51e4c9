//! The rendering collaborator a card is wired onto.

use crate::feedback::{EffectDescriptor, EffectFrame, EffectId};
use calpress_foundation::PointerEvent;
use calpress_ui_graphics::Size;
use std::rc::Rc;

pub type ListenerId = u64;

pub type PointerListener = Rc<dyn Fn(PointerEvent)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceError {
    /// The surface is no longer part of the rendered tree.
    Detached,
}

impl std::fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SurfaceError::Detached => write!(f, "surface is detached"),
        }
    }
}

impl std::error::Error for SurfaceError {}

/// An element that receives pointer input and hosts effect layers.
///
/// Effects are drawn above the surface background and must not take part in
/// hit testing. Coordinates are relative to the surface's top-left corner.
pub trait Surface {
    fn size(&self) -> Size;

    fn is_attached(&self) -> bool;

    fn add_pointer_listener(&self, listener: PointerListener) -> ListenerId;

    fn remove_pointer_listener(&self, id: ListenerId);

    fn mount_effect(&self, id: EffectId, descriptor: &EffectDescriptor)
        -> Result<(), SurfaceError>;

    fn update_effect(&self, id: EffectId, frame: EffectFrame);

    fn unmount_effect(&self, id: EffectId);
}
