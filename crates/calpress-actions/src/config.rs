//! Card configuration as written by users.
//!
//! Field names follow the dashboard YAML/JSON conventions (`tap_action`,
//! `navigation_path`, `service_data`, ...). Unknown action kinds are kept so
//! the dispatcher can report them instead of the whole card failing to load.

use crate::descriptor::ActionDescriptor;
use calpress_foundation::gesture_constants::{
    HOLD_THRESHOLD_MS, MOVE_THRESHOLD, MOVE_THRESHOLD_RANGE,
};
use calpress_foundation::HoldTapConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionConfig {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation_path: Option<String>,
    #[serde(default, alias = "perform_action", skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, alias = "data", skip_serializing_if = "Option::is_none")]
    pub service_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_target: Option<String>,
}

impl ActionConfig {
    pub fn of_kind(action: &str) -> Self {
        Self {
            action: action.to_string(),
            navigation_path: None,
            service: None,
            service_data: None,
            url_path: None,
            url_target: None,
        }
    }

    pub fn none() -> Self {
        Self::of_kind("none")
    }

    pub fn expand() -> Self {
        Self::of_kind("expand")
    }

    pub fn to_descriptor(&self) -> ActionDescriptor {
        match self.action.trim() {
            "more-info" => ActionDescriptor::MoreInfo,
            "navigate" => ActionDescriptor::navigate(self.navigation_path.clone().unwrap_or_default()),
            "call-service" | "perform-action" => ActionDescriptor::call_service(
                self.service.as_deref().unwrap_or_default(),
                self.service_data.clone().unwrap_or(Value::Null),
            ),
            "url" => ActionDescriptor::OpenUrl {
                url: self.url_path.clone().unwrap_or_default(),
                target: self.url_target.clone(),
            },
            "expand" => ActionDescriptor::Expand,
            "none" | "" => ActionDescriptor::None,
            other => ActionDescriptor::Unknown(other.to_string()),
        }
    }
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self::none()
    }
}

impl From<&ActionConfig> for ActionDescriptor {
    fn from(config: &ActionConfig) -> Self {
        config.to_descriptor()
    }
}

/// An entry of the `entities` list: either a bare id or `{ entity: id }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityRef {
    Id(String),
    Object { entity: String },
}

impl EntityRef {
    pub fn entity_id(&self) -> &str {
        match self {
            EntityRef::Id(id) => id,
            EntityRef::Object { entity } => entity,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub hold_threshold_ms: u64,
    pub move_threshold_px: f32,
    /// Hold indicator diameter for coarse (touch) pointers.
    pub coarse_indicator_size: f32,
    /// Hold indicator diameter for fine (mouse, pen) pointers.
    pub fine_indicator_size: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            hold_threshold_ms: HOLD_THRESHOLD_MS,
            move_threshold_px: MOVE_THRESHOLD,
            coarse_indicator_size: 80.0,
            fine_indicator_size: 50.0,
        }
    }
}

impl GestureConfig {
    /// Copy with out-of-range values pulled back to usable ones.
    pub fn validated(&self) -> Self {
        let defaults = Self::default();
        let mut out = self.clone();
        if out.hold_threshold_ms == 0 {
            log::warn!(
                "hold_threshold_ms must be positive, using {}",
                defaults.hold_threshold_ms
            );
            out.hold_threshold_ms = defaults.hold_threshold_ms;
        }
        let (min, max) = MOVE_THRESHOLD_RANGE;
        if !out.move_threshold_px.is_finite() {
            log::warn!("move_threshold_px is not finite, using {MOVE_THRESHOLD}");
            out.move_threshold_px = MOVE_THRESHOLD;
        } else if !(min..=max).contains(&out.move_threshold_px) {
            let clamped = out.move_threshold_px.clamp(min, max);
            log::warn!(
                "move_threshold_px {} outside [{min}, {max}], using {clamped}",
                out.move_threshold_px
            );
            out.move_threshold_px = clamped;
        }
        for (size, fallback) in [
            (&mut out.coarse_indicator_size, defaults.coarse_indicator_size),
            (&mut out.fine_indicator_size, defaults.fine_indicator_size),
        ] {
            if !size.is_finite() || *size <= 0.0 {
                log::warn!("indicator size {size} is not positive, using {fallback}");
                *size = fallback;
            }
        }
        out
    }

    pub fn indicator_size(&self, coarse: bool) -> f32 {
        if coarse {
            self.coarse_indicator_size
        } else {
            self.fine_indicator_size
        }
    }

    pub fn hold_tap_config(&self, hold_enabled: bool) -> HoldTapConfig {
        HoldTapConfig {
            hold_threshold_ms: self.hold_threshold_ms,
            move_threshold: self.move_threshold_px,
            hold_enabled,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardActionsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entities: Vec<EntityRef>,
    pub tap_action: ActionConfig,
    pub hold_action: ActionConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_events_to_show: Option<u32>,
    pub gesture: GestureConfig,
}

impl Default for CardActionsConfig {
    fn default() -> Self {
        Self {
            entity: None,
            entities: Vec::new(),
            tap_action: ActionConfig::expand(),
            hold_action: ActionConfig::none(),
            max_events_to_show: None,
            gesture: GestureConfig::default(),
        }
    }
}

impl CardActionsConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// `entity` if set, otherwise the first of `entities`.
    pub fn primary_entity(&self) -> Option<&str> {
        self.entity
            .as_deref()
            .filter(|id| !id.is_empty())
            .or_else(|| self.entities.first().map(EntityRef::entity_id))
    }

    pub fn tap_descriptor(&self) -> ActionDescriptor {
        self.tap_action.to_descriptor()
    }

    pub fn hold_descriptor(&self) -> ActionDescriptor {
        self.hold_action.to_descriptor()
    }

    /// Hold detection only runs when a hold does something.
    pub fn hold_enabled(&self) -> bool {
        !self.hold_descriptor().is_none()
    }
}
