//! iconmotion orchestrates the animations of animated icons.
//!
//! An icon wrapper either owns an [`AnimationController`] or borrows the one of an enclosing
//! wrapper through its [`ScopeConfig`]. Triggers (hover, tap, view, explicit calls) become
//! `start`/`stop` commands; the controller sequences delays, loops and resets against an
//! external [`AnimationDriver`] and a [`Scheduler`]. Renderers pull variant trees through
//! [`resolve_variants`], scaled by the scope's speed multiplier.
//!
//! # Pieces
//!
//! 1. **Scope**: `IconProps + parent ScopeConfig -> Resolution` (inherit, spawn or detached)
//! 2. **Trigger**: `TriggerEvent -> Command` per wrapper bindings; consumer handlers are
//!    composed ahead of the wrapper's own
//! 3. **Controller**: a sans-IO state machine. Every suspension point (timer, driver
//!    transition) is a handle reported back later, guarded by a [`Generation`]
//! 4. **Variants**: `VariantMap + ScopeConfig -> serde_json::Value` with durations scaled
//!
//! [`IconHost`] wires these together over a virtual clock for tests, tools and the
//! `iconmotion` CLI.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod controller;
mod foundation;
mod runtime;
mod scope;
mod trigger;

pub use animation::speed::{scale_transition, scale_tree};
pub use animation::variants::{
    DEFAULT_ANIMATION, StaticAnimation, VariantMap, resolve_variants, uses_path_styling,
};
pub use controller::driver::{AnimationDriver, DriveCtx, DriveOutcome, DriveTarget, Scheduler};
pub use controller::events::ControllerEvent;
pub use controller::machine::{AnimationController, ControllerConfig};
pub use controller::state::{ControllerState, ControllerStatus, InFlight};
pub use foundation::core::{ControllerId, DriveTicket, Generation, Millis, NodeId, TimerId};
pub use foundation::error::{IconMotionError, IconMotionResult};
pub use runtime::host::IconHost;
pub use runtime::recording::{DriverCall, DriverCallKind, RecordingDriver};
pub use runtime::scenario::{
    Scenario, ScenarioAction, ScenarioRecord, ScenarioStep, ScenarioWrapper,
};
pub use runtime::timers::{OwnedTimers, VirtualTimers};
pub use scope::config::{AnimateRequest, DEFAULT_SPEED_MULTIPLIER, ScopeConfig, SharedScope};
pub use scope::props::{AnimateOptions, DEFAULT_VIEW_MARGIN, IconProps};
pub use scope::resolve::{Resolution, SpawnPlan, resolve_scope};
pub use trigger::binding::{Handler, compose};
pub use trigger::event::{
    Command, PointerEvent, PointerKind, TriggerBindings, TriggerEvent, ViewLatch, ViewOptions,
};
