use super::*;
use crate::controller::machine::{AnimationController, ControllerConfig};
use crate::foundation::core::Millis;

fn active_parent() -> ScopeConfig {
    ScopeConfig {
        controls: Some(ControllerId(1)),
        animation: "spin".to_owned(),
        r#loop: Some(true),
        loop_delay: Some(Millis(300)),
        active: Some(true),
        animate: None,
        delay: Some(Millis(50)),
        speed_multiplier: Some(0.5),
        ..ScopeConfig::default()
    }
}

fn spawn(res: Resolution) -> SpawnPlan {
    match res {
        Resolution::Spawn(plan) => plan,
        other => panic!("expected spawn, got {other:?}"),
    }
}

fn inherit(res: Resolution) -> SharedScope {
    match res {
        Resolution::Inherit(scope) => scope,
        other => panic!("expected inherit, got {other:?}"),
    }
}

#[test]
fn speed_only_override_reuses_parent_controller() {
    let parent = active_parent();
    let local = IconProps {
        speed_multiplier: Some(2.0),
        ..IconProps::default()
    };
    let scope = inherit(resolve_scope(&local, Some(&parent)));
    assert_eq!(scope.controls, Some(ControllerId(1)));
    assert_eq!(scope.speed_multiplier, Some(2.0));
    let expected = ScopeConfig {
        speed_multiplier: Some(2.0),
        ..parent.clone()
    };
    assert_eq!(*scope, expected);
}

#[test]
fn no_override_forwards_parent_and_narrows_animation() {
    let parent = active_parent();
    let scope = inherit(resolve_scope(&IconProps::default(), Some(&parent)));
    assert_eq!(*scope, parent);

    let local = IconProps {
        animation: Some("path".to_owned()),
        ..IconProps::default()
    };
    let scope = inherit(resolve_scope(&local, Some(&parent)));
    assert_eq!(scope.animation, "path");
    assert_eq!(scope.controls, parent.controls);
    assert!(scope.uses_path_styling());
}

#[test]
fn forwarded_scope_fills_missing_multiplier() {
    let parent = ScopeConfig {
        speed_multiplier: None,
        ..active_parent()
    };
    let scope = inherit(resolve_scope(&IconProps::default(), Some(&parent)));
    assert_eq!(scope.speed_multiplier, Some(DEFAULT_SPEED_MULTIPLIER));
}

#[test]
fn behavior_override_spawns_with_inherited_fields() {
    let parent = active_parent();
    let local = IconProps {
        loop_delay: Some(Millis(10)),
        ..IconProps::default()
    };
    let plan = spawn(resolve_scope(&local, Some(&parent)));
    assert!(plan.options.r#loop);
    assert_eq!(plan.options.loop_delay, Millis(10));
    assert_eq!(plan.options.delay, Millis(50));
    assert_eq!(plan.options.animation, "spin");
    assert_eq!(plan.speed_multiplier, 0.5);
    // parent active: follow its animation
    assert_eq!(plan.options.animate, AnimateRequest::named("spin"));
}

#[test]
fn inactive_parent_defaults_animate_to_off() {
    let parent = ScopeConfig {
        active: Some(false),
        ..active_parent()
    };
    let local = IconProps {
        animate_on_hover: Some(AnimateRequest::On),
        ..IconProps::default()
    };
    let plan = spawn(resolve_scope(&local, Some(&parent)));
    assert_eq!(plan.options.animate, AnimateRequest::Off);
    assert!(plan.options.animate_on_hover.is_on());
}

#[test]
fn explicit_animate_beats_parent() {
    let parent = ScopeConfig {
        animate: Some(AnimateRequest::Off),
        ..active_parent()
    };
    let local = IconProps {
        animate: Some(AnimateRequest::named("wiggle")),
        ..IconProps::default()
    };
    let plan = spawn(resolve_scope(&local, Some(&parent)));
    assert_eq!(plan.options.animate, AnimateRequest::named("wiggle"));

    let local = IconProps {
        r#loop: Some(false),
        ..IconProps::default()
    };
    let plan = spawn(resolve_scope(&local, Some(&parent)));
    assert_eq!(plan.options.animate, AnimateRequest::Off);
    assert!(!plan.options.r#loop);
}

#[test]
fn rootless_wrapper_spawns_or_detaches() {
    assert_eq!(resolve_scope(&IconProps::default(), None), Resolution::Detached);
    let local = IconProps {
        loop_delay: Some(Millis(5)),
        ..IconProps::default()
    };
    assert_eq!(resolve_scope(&local, None), Resolution::Detached);

    let local = IconProps {
        animate_on_tap: Some(AnimateRequest::On),
        ..IconProps::default()
    };
    let plan = spawn(resolve_scope(&local, None));
    assert_eq!(plan.speed_multiplier, DEFAULT_SPEED_MULTIPLIER);
    assert!(plan.options.animate_on_tap.is_on());
}

#[test]
fn spawned_scope_follows_controller_state() {
    let plan = SpawnPlan {
        options: AnimateOptions {
            animation: "spin".to_owned(),
            r#loop: true,
            ..AnimateOptions::default()
        },
        speed_multiplier: 0.9,
    };
    let controller = AnimationController::new(ControllerConfig::from(&plan.options));
    let scope = plan.scope(ControllerId(4), controller.state());
    assert_eq!(scope.controls, Some(ControllerId(4)));
    assert_eq!(scope.animation, "spin");
    assert_eq!(scope.active, Some(false));
    assert_eq!(scope.r#loop, Some(true));
    assert_eq!(scope.speed_multiplier, Some(0.9));
}
