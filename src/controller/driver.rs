//! Seams to the outside world: the animation driver and the timer source.
//!
//! The controller never blocks and never awaits. Every suspension point is modelled as a
//! handle (a [`TimerId`] or a [`DriveTicket`]) that the host reports back later through
//! [`AnimationController::on_timer`](super::machine::AnimationController::on_timer) or
//! [`AnimationController::on_settled`](super::machine::AnimationController::on_settled).

use std::time::Duration;

use crate::foundation::core::{DriveTicket, TimerId};

/// Variant key the driver animates toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveTarget {
    /// Resting pose (`initial` variant).
    Initial,
    /// Animated pose (`animate` variant).
    Animate,
}

impl DriveTarget {
    /// Name of the variant in the icon's variant trees.
    pub fn key(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Animate => "animate",
        }
    }
}

/// How a started transition ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveOutcome {
    /// Ran to its end.
    Completed,
    /// Rejected or superseded by a newer driver call.
    Interrupted,
}

/// Imperative handle onto the low-level animation engine of one icon.
pub trait AnimationDriver {
    /// Begin an animated transition toward `target`.
    ///
    /// The returned ticket is settled later with a [`DriveOutcome`].
    fn start(&mut self, target: DriveTarget) -> DriveTicket;

    /// Apply `target` instantly, without a transition.
    fn set(&mut self, target: DriveTarget);
}

/// One-shot timer source.
pub trait Scheduler {
    /// Fire once after `after`, reporting back the returned id.
    fn schedule(&mut self, after: Duration) -> TimerId;

    /// Cancel a pending timer. Cancelling an unknown or fired timer is a no-op.
    fn cancel(&mut self, id: TimerId);
}

/// Borrowed collaborators for one controller call.
pub struct DriveCtx<'a> {
    /// Driver of the icon being controlled.
    pub driver: &'a mut dyn AnimationDriver,
    /// Timer source, scoped to the controller.
    pub timers: &'a mut dyn Scheduler,
}

impl<'a> DriveCtx<'a> {
    /// Bundle a driver and a timer source.
    pub fn new(driver: &'a mut dyn AnimationDriver, timers: &'a mut dyn Scheduler) -> Self {
        Self { driver, timers }
    }
}
