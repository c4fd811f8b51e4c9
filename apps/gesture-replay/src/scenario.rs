use anyhow::{bail, Context, Result};
use calpress_actions::CardActionsConfig;
use calpress_foundation::{PointerEvent, PointerId, PointerKind};
use calpress_ui_graphics::Point;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub config: CardActionsConfig,
    #[serde(default)]
    pub surface: SurfaceSpec,
    pub events: Vec<ScenarioEvent>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct SurfaceSpec {
    pub width: f32,
    pub height: f32,
}

impl Default for SurfaceSpec {
    fn default() -> Self {
        Self {
            width: 320.0,
            height: 120.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Down,
    Move,
    Up,
    Cancel,
    Leave,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PointerSpec {
    #[default]
    Mouse,
    Touch,
    Pen,
}

impl From<PointerSpec> for PointerKind {
    fn from(spec: PointerSpec) -> Self {
        match spec {
            PointerSpec::Mouse => PointerKind::Mouse,
            PointerSpec::Touch => PointerKind::Touch,
            PointerSpec::Pen => PointerKind::Pen,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ScenarioEvent {
    pub at: u64,
    pub kind: EventKind,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub pointer: PointerSpec,
    #[serde(default = "default_pointer_id")]
    pub id: PointerId,
}

fn default_pointer_id() -> PointerId {
    1
}

impl ScenarioEvent {
    pub fn to_pointer_event(&self) -> PointerEvent {
        let position = Point::new(self.x, self.y);
        match self.kind {
            EventKind::Down => PointerEvent::down(self.id, position, self.pointer.into()),
            EventKind::Move => PointerEvent::moved(self.id, position),
            EventKind::Up => PointerEvent::up(self.id, position),
            EventKind::Cancel => PointerEvent::cancel(self.id),
            EventKind::Leave => PointerEvent::leave(self.id, position),
        }
    }
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        let scenario: Scenario = serde_json::from_str(&text)
            .with_context(|| format!("parsing scenario {}", path.display()))?;
        scenario.check()?;
        Ok(scenario)
    }

    fn check(&self) -> Result<()> {
        if !(self.surface.width > 0.0 && self.surface.height > 0.0) {
            bail!(
                "surface must have a positive size, got {}x{}",
                self.surface.width,
                self.surface.height
            );
        }
        if let Some(pair) = self.events.windows(2).find(|pair| pair[1].at < pair[0].at) {
            bail!(
                "events must be in time order: {}ms comes after {}ms",
                pair[1].at,
                pair[0].at
            );
        }
        Ok(())
    }
}
