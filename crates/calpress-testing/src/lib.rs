//! Testing utilities and harness for calpress

mod host;
mod rule;
mod surface;

pub use host::{HostCall, RecordingHost};
pub use rule::{InteractionTestRule, InteractionTestRuleBuilder};
pub use surface::{MountedEffect, SurfaceRecord, TestSurface};

pub mod prelude {
    pub use crate::host::{HostCall, RecordingHost};
    pub use crate::rule::InteractionTestRule;
    pub use crate::surface::TestSurface;
}
