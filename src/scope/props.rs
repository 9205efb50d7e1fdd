use crate::animation::variants::DEFAULT_ANIMATION;
use crate::foundation::core::Millis;
use crate::foundation::error::{IconMotionError, IconMotionResult};
use crate::scope::config::AnimateRequest;

/// Default root margin handed to the view-intersection detector.
pub const DEFAULT_VIEW_MARGIN: &str = "0px";

/// Options recognized by an icon wrapper. Every field is optional; unset fields inherit from
/// the enclosing scope or fall back to the defaults documented on [`AnimateOptions`].
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct IconProps {
    /// Merge into the single child instead of adding an element.
    pub as_child: Option<bool>,
    /// Start (or stop) as soon as the wrapper mounts or the value changes.
    pub animate: Option<AnimateRequest>,
    /// Start on pointer enter, stop on leave.
    pub animate_on_hover: Option<AnimateRequest>,
    /// Start on pointer down, stop on up or leave.
    pub animate_on_tap: Option<AnimateRequest>,
    /// Start when scrolled into view.
    pub animate_on_view: Option<AnimateRequest>,
    /// Root margin for the view detector.
    pub animate_on_view_margin: Option<String>,
    /// Only react to the first in-view report.
    pub animate_on_view_once: Option<bool>,
    /// Animation name for this scope.
    pub animation: Option<String>,
    /// Re-arm after each completed run.
    pub r#loop: Option<bool>,
    /// Pause between loop iterations.
    pub loop_delay: Option<Millis>,
    /// Snap to `initial` after each completed run.
    pub initial_on_animate_end: Option<bool>,
    /// Let a running transition finish before a stop resets.
    pub complete_on_stop: Option<bool>,
    /// Keep the last pose on stop.
    pub persist_on_animate_end: Option<bool>,
    /// Pause between a start and the first run.
    pub delay: Option<Millis>,
    /// Multiplier applied to variant timings. Must be finite and positive.
    pub speed_multiplier: Option<f64>,
}

impl IconProps {
    /// Parse wrapper options from JSON and validate them.
    pub fn from_json_str(s: &str) -> IconMotionResult<Self> {
        let props: Self =
            serde_json::from_str(s).map_err(|e| IconMotionError::config(e.to_string()))?;
        props.validate()?;
        Ok(props)
    }

    /// Reject values no scope can carry.
    pub fn validate(&self) -> IconMotionResult<()> {
        if let Some(m) = self.speed_multiplier {
            if !m.is_finite() || m <= 0.0 {
                return Err(IconMotionError::validation(format!(
                    "speedMultiplier must be finite and > 0, got {m}"
                )));
            }
        }
        if self.animation.as_deref() == Some("") {
            return Err(IconMotionError::validation("animation name must not be empty"));
        }
        Ok(())
    }

    /// `true` when any field that changes animation behaviour is set.
    ///
    /// `animation`, `speedMultiplier`, `asChild` and the view-detector tuning fields do not
    /// count: they never require a controller of their own.
    pub fn has_behavior_overrides(&self) -> bool {
        self.animate.is_some()
            || self.animate_on_hover.is_some()
            || self.animate_on_tap.is_some()
            || self.animate_on_view.is_some()
            || self.r#loop.is_some()
            || self.loop_delay.is_some()
            || self.initial_on_animate_end.is_some()
            || self.persist_on_animate_end.is_some()
            || self.delay.is_some()
            || self.complete_on_stop.is_some()
    }

    /// `true` when the wrapper sets its own speed multiplier.
    pub fn has_speed_override(&self) -> bool {
        self.speed_multiplier.is_some()
    }

    /// `true` when a wrapper without an ancestor scope must mount a controller.
    pub fn wants_root_scope(&self) -> bool {
        self.animate.is_some()
            || self.animate_on_hover.is_some()
            || self.animate_on_tap.is_some()
            || self.animate_on_view.is_some()
            || self.animation.is_some()
            || self.speed_multiplier.is_some()
    }
}

/// Fully-defaulted options of one mounted controller.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimateOptions {
    /// See [`IconProps::as_child`].
    pub as_child: bool,
    /// Request applied at mount and whenever the wrapper's `animate` changes.
    pub animate: AnimateRequest,
    /// Hover binding.
    pub animate_on_hover: AnimateRequest,
    /// Tap binding.
    pub animate_on_tap: AnimateRequest,
    /// View binding.
    pub animate_on_view: AnimateRequest,
    /// View detector root margin (default `"0px"`).
    pub animate_on_view_margin: String,
    /// Latch the first in-view report (default `true`).
    pub animate_on_view_once: bool,
    /// Animation played when a trigger carries no name (default `"default"`).
    pub animation: String,
    /// Re-arm after each completed run.
    pub r#loop: bool,
    /// Pause between loop iterations.
    pub loop_delay: Millis,
    /// Snap to `initial` after each completed run.
    pub initial_on_animate_end: bool,
    /// Let a running transition finish before a stop resets.
    pub complete_on_stop: bool,
    /// Keep the last pose on stop.
    pub persist_on_animate_end: bool,
    /// Pause between a start and the first run.
    pub delay: Millis,
}

impl Default for AnimateOptions {
    fn default() -> Self {
        Self {
            as_child: false,
            animate: AnimateRequest::Off,
            animate_on_hover: AnimateRequest::Off,
            animate_on_tap: AnimateRequest::Off,
            animate_on_view: AnimateRequest::Off,
            animate_on_view_margin: DEFAULT_VIEW_MARGIN.to_owned(),
            animate_on_view_once: true,
            animation: DEFAULT_ANIMATION.to_owned(),
            r#loop: false,
            loop_delay: Millis::ZERO,
            initial_on_animate_end: false,
            complete_on_stop: false,
            persist_on_animate_end: false,
            delay: Millis::ZERO,
        }
    }
}

impl AnimateOptions {
    /// Options of a wrapper with no ancestor scope: local values over defaults.
    pub fn from_props(props: &IconProps) -> Self {
        let d = Self::default();
        Self {
            as_child: props.as_child.unwrap_or(d.as_child),
            animate: props.animate.clone().unwrap_or(d.animate),
            animate_on_hover: props.animate_on_hover.clone().unwrap_or(d.animate_on_hover),
            animate_on_tap: props.animate_on_tap.clone().unwrap_or(d.animate_on_tap),
            animate_on_view: props.animate_on_view.clone().unwrap_or(d.animate_on_view),
            animate_on_view_margin: props
                .animate_on_view_margin
                .clone()
                .unwrap_or(d.animate_on_view_margin),
            animate_on_view_once: props.animate_on_view_once.unwrap_or(d.animate_on_view_once),
            animation: props.animation.clone().unwrap_or(d.animation),
            r#loop: props.r#loop.unwrap_or(d.r#loop),
            loop_delay: props.loop_delay.unwrap_or(d.loop_delay),
            initial_on_animate_end: props
                .initial_on_animate_end
                .unwrap_or(d.initial_on_animate_end),
            complete_on_stop: props.complete_on_stop.unwrap_or(d.complete_on_stop),
            persist_on_animate_end: props
                .persist_on_animate_end
                .unwrap_or(d.persist_on_animate_end),
            delay: props.delay.unwrap_or(d.delay),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scope/props.rs"]
mod tests;
