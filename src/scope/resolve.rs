//! Override resolution between a wrapper's local options and its inherited scope.

use std::sync::Arc;

use crate::animation::variants::DEFAULT_ANIMATION;
use crate::controller::state::ControllerState;
use crate::foundation::core::ControllerId;
use crate::scope::config::{AnimateRequest, DEFAULT_SPEED_MULTIPLIER, ScopeConfig, SharedScope};
use crate::scope::props::{AnimateOptions, IconProps};

/// Outcome of resolving one wrapper against its parent scope.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    /// Reuse the parent's controller under a derived snapshot.
    Inherit(SharedScope),
    /// Mount a new controller.
    Spawn(SpawnPlan),
    /// No scope and no controller: the icon renders statically.
    Detached,
}

/// Configuration of a controller about to be mounted.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnPlan {
    /// Resolved options of the new controller.
    pub options: AnimateOptions,
    /// Resolved multiplier, never unset for a spawned scope.
    pub speed_multiplier: f64,
}

impl SpawnPlan {
    /// Snapshot the mounted controller publishes to its descendants.
    ///
    /// Recomputed on every read: `active` and `animation` follow the live controller state.
    pub fn scope(&self, controls: ControllerId, state: &ControllerState) -> ScopeConfig {
        let o = &self.options;
        ScopeConfig {
            controls: Some(controls),
            animation: state.current_animation().to_owned(),
            r#loop: Some(o.r#loop),
            loop_delay: Some(o.loop_delay),
            active: Some(state.is_active()),
            animate: Some(o.animate.clone()),
            initial_on_animate_end: Some(o.initial_on_animate_end),
            complete_on_stop: Some(o.complete_on_stop),
            persist_on_animate_end: Some(o.persist_on_animate_end),
            delay: Some(o.delay),
            speed_multiplier: Some(self.speed_multiplier),
        }
    }
}

/// Resolve the effective scope of a wrapper.
///
/// With a parent scope:
/// 1. only `speedMultiplier` overridden: the parent scope with a new multiplier, same controller;
/// 2. any behaviour field overridden: a new controller whose fields resolve `local ?? parent`;
///    the `animate` request defaults to the parent's animation while the parent is active and to
///    off otherwise;
/// 3. nothing overridden: the parent scope, forwarded.
///
/// In cases 1 and 3 a local `animation` narrows the animation name.
///
/// Without a parent, a wrapper mounts a root controller if it sets any trigger, an animation or
/// a speed multiplier, and otherwise stays detached.
pub fn resolve_scope(local: &IconProps, parent: Option<&ScopeConfig>) -> Resolution {
    let Some(parent) = parent else {
        if !local.wants_root_scope() {
            return Resolution::Detached;
        }
        return Resolution::Spawn(SpawnPlan {
            options: AnimateOptions::from_props(local),
            speed_multiplier: local.speed_multiplier.unwrap_or(DEFAULT_SPEED_MULTIPLIER),
        });
    };

    let speed_multiplier = local
        .speed_multiplier
        .or(parent.speed_multiplier)
        .unwrap_or(DEFAULT_SPEED_MULTIPLIER);

    if local.has_behavior_overrides() {
        return Resolution::Spawn(SpawnPlan {
            options: inherit_options(local, parent),
            speed_multiplier,
        });
    }

    let mut scope = parent.with_animation(local.animation.as_deref());
    scope.speed_multiplier = Some(speed_multiplier);
    Resolution::Inherit(Arc::new(scope))
}

fn inherit_options(local: &IconProps, parent: &ScopeConfig) -> AnimateOptions {
    let d = AnimateOptions::default();
    let animation = local
        .animation
        .clone()
        .unwrap_or_else(|| parent.animation.clone());

    let inherited_animate = if parent.is_active() {
        let name = if animation.is_empty() {
            DEFAULT_ANIMATION.to_owned()
        } else {
            animation.clone()
        };
        AnimateRequest::Named(name)
    } else {
        AnimateRequest::Off
    };

    AnimateOptions {
        as_child: true,
        animate: local
            .animate
            .clone()
            .or_else(|| parent.animate.clone())
            .unwrap_or(inherited_animate),
        animate_on_hover: local.animate_on_hover.clone().unwrap_or(d.animate_on_hover),
        animate_on_tap: local.animate_on_tap.clone().unwrap_or(d.animate_on_tap),
        animate_on_view: local.animate_on_view.clone().unwrap_or(d.animate_on_view),
        animate_on_view_margin: local
            .animate_on_view_margin
            .clone()
            .unwrap_or(d.animate_on_view_margin),
        animate_on_view_once: local.animate_on_view_once.unwrap_or(d.animate_on_view_once),
        animation,
        r#loop: local.r#loop.or(parent.r#loop).unwrap_or(d.r#loop),
        loop_delay: local
            .loop_delay
            .or(parent.loop_delay)
            .unwrap_or(d.loop_delay),
        initial_on_animate_end: local
            .initial_on_animate_end
            .or(parent.initial_on_animate_end)
            .unwrap_or(d.initial_on_animate_end),
        complete_on_stop: local
            .complete_on_stop
            .or(parent.complete_on_stop)
            .unwrap_or(d.complete_on_stop),
        persist_on_animate_end: local
            .persist_on_animate_end
            .or(parent.persist_on_animate_end)
            .unwrap_or(d.persist_on_animate_end),
        delay: local.delay.or(parent.delay).unwrap_or(d.delay),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scope/resolve.rs"]
mod tests;
