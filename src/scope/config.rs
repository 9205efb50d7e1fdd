use std::sync::Arc;

use crate::animation::variants::{DEFAULT_ANIMATION, uses_path_styling};
use crate::foundation::core::{ControllerId, Millis};

/// Speed multiplier used when neither the wrapper nor any ancestor sets one.
pub const DEFAULT_SPEED_MULTIPLIER: f64 = 0.7;

/// A trigger request: off, on with the scope's animation, or on with a named animation.
///
/// Serialized as `false`, `true` or the animation name, matching wrapper options such as
/// `animate` and `animateOnHover`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "RequestRepr", into = "RequestRepr")]
pub enum AnimateRequest {
    /// Trigger disabled.
    #[default]
    Off,
    /// Trigger enabled; plays the scope's default animation.
    On,
    /// Trigger enabled; plays the named animation.
    Named(String),
}

impl AnimateRequest {
    /// Build a named request.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// `true` when the trigger is enabled. An empty name counts as disabled.
    pub fn is_on(&self) -> bool {
        match self {
            Self::Off => false,
            Self::On => true,
            Self::Named(name) => !name.is_empty(),
        }
    }

    /// Explicit animation name carried by the request, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(name) if !name.is_empty() => Some(name),
            _ => None,
        }
    }
}

#[derive(Clone, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
enum RequestRepr {
    Flag(bool),
    Name(String),
}

impl From<RequestRepr> for AnimateRequest {
    fn from(repr: RequestRepr) -> Self {
        match repr {
            RequestRepr::Flag(true) => Self::On,
            RequestRepr::Flag(false) => Self::Off,
            RequestRepr::Name(name) => Self::Named(name),
        }
    }
}

impl From<AnimateRequest> for RequestRepr {
    fn from(req: AnimateRequest) -> Self {
        match req {
            AnimateRequest::Off => Self::Flag(false),
            AnimateRequest::On => Self::Flag(true),
            AnimateRequest::Named(name) => Self::Name(name),
        }
    }
}

/// Immutable configuration snapshot visible to an icon and its descendants.
///
/// A child never writes into its parent's snapshot; it derives a new one (see
/// [`resolve_scope`](crate::scope::resolve::resolve_scope)). Snapshots are shared read-only
/// through [`SharedScope`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeConfig {
    /// Controller that owns this scope, if any.
    pub controls: Option<ControllerId>,
    /// Animation name consumers should resolve.
    pub animation: String,
    /// Loop setting of the owning controller.
    pub r#loop: Option<bool>,
    /// Pause between loop iterations.
    pub loop_delay: Option<Millis>,
    /// Whether the owning controller currently holds an active trigger.
    pub active: Option<bool>,
    /// The `animate` request the owning wrapper was configured with.
    pub animate: Option<AnimateRequest>,
    /// Snap to `initial` after each completed run.
    pub initial_on_animate_end: Option<bool>,
    /// Let a running transition finish before a stop resets.
    pub complete_on_stop: Option<bool>,
    /// Keep the last pose on stop.
    pub persist_on_animate_end: Option<bool>,
    /// Start delay.
    pub delay: Option<Millis>,
    /// Multiplier applied to variant timings. Inherited when unset.
    pub speed_multiplier: Option<f64>,
}

/// Read-only handle passed down the composition tree.
pub type SharedScope = Arc<ScopeConfig>;

impl Default for ScopeConfig {
    /// The scope seen by an icon with no ancestor wrapper.
    fn default() -> Self {
        Self {
            controls: None,
            animation: DEFAULT_ANIMATION.to_owned(),
            r#loop: None,
            loop_delay: None,
            active: None,
            animate: None,
            initial_on_animate_end: None,
            complete_on_stop: None,
            persist_on_animate_end: None,
            delay: None,
            speed_multiplier: Some(DEFAULT_SPEED_MULTIPLIER),
        }
    }
}

impl ScopeConfig {
    /// `true` when the owning controller is active.
    pub fn is_active(&self) -> bool {
        self.active.unwrap_or(false)
    }

    /// `true` when renderers should apply the path dash-array fix-up.
    pub fn uses_path_styling(&self) -> bool {
        uses_path_styling(&self.animation)
    }

    /// Copy of this scope with the animation name narrowed.
    pub(crate) fn with_animation(&self, animation: Option<&str>) -> Self {
        let mut next = self.clone();
        if let Some(name) = animation {
            next.animation = name.to_owned();
        }
        next
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scope/config.rs"]
mod tests;
