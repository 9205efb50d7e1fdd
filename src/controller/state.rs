use std::collections::BTreeMap;

use crate::foundation::core::{DriveTicket, Generation, TimerId};

/// Lifecycle position of one controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerStatus {
    /// Never started.
    #[default]
    Initial,
    /// Waiting for the start delay.
    DelayPending,
    /// Animate transition running.
    Animating,
    /// Waiting between loop iterations.
    LoopDelayPending,
    /// Stopped, or finished a non-looping run.
    Stopped,
}

/// Why a timer was scheduled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerPurpose {
    /// `delay` before the first run.
    StartDelay,
    /// `loopDelay` between iterations.
    LoopDelay,
}

/// A timer owned by the controller, tagged with the generation that scheduled it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingTimer {
    /// What the timer resumes.
    pub purpose: TimerPurpose,
    /// Generation live when it was scheduled.
    pub generation: Generation,
}

/// An outstanding driver transition, tagged with the generation that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InFlight {
    /// Ticket from [`AnimationDriver::start`](crate::AnimationDriver::start).
    pub ticket: DriveTicket,
    /// Generation live when it was issued.
    pub generation: Generation,
}

/// Mutable state of one controller. Never shared between icons.
#[derive(Clone, Debug, PartialEq)]
pub struct ControllerState {
    pub(crate) status: ControllerStatus,
    pub(crate) generation: Generation,
    pub(crate) is_active: bool,
    pub(crate) current_animation: String,
    pub(crate) pending_timers: BTreeMap<TimerId, PendingTimer>,
    /// Animate transition currently running.
    pub(crate) in_flight: Option<InFlight>,
    /// Animate transition a `completeOnStop` stop waits for before resetting.
    pub(crate) awaiting_completion: Option<InFlight>,
}

impl ControllerState {
    pub(crate) fn new(animation: String) -> Self {
        Self {
            status: ControllerStatus::Initial,
            generation: Generation::default(),
            is_active: false,
            current_animation: animation,
            pending_timers: BTreeMap::new(),
            in_flight: None,
            awaiting_completion: None,
        }
    }

    /// Current lifecycle position.
    pub fn status(&self) -> ControllerStatus {
        self.status
    }

    /// Live generation.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// `true` between an accepted trigger and the matching stop.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Animation of the latest `start`.
    pub fn current_animation(&self) -> &str {
        &self.current_animation
    }

    /// Timers the controller still owns.
    pub fn pending_timers(&self) -> impl Iterator<Item = TimerId> + '_ {
        self.pending_timers.keys().copied()
    }

    /// `true` while a start or loop delay is pending.
    pub fn has_pending_timers(&self) -> bool {
        !self.pending_timers.is_empty()
    }

    /// Running animate transition, if any.
    pub fn in_flight(&self) -> Option<InFlight> {
        self.in_flight
    }

    /// Ticket the controller is waiting on, whether running or awaited by a stop.
    pub fn pending_ticket(&self) -> Option<DriveTicket> {
        self.in_flight
            .or(self.awaiting_completion)
            .map(|flight| flight.ticket)
    }

    /// Stopped with nothing left to cancel or reset.
    pub(crate) fn is_settled_stop(&self) -> bool {
        self.status == ControllerStatus::Stopped
            && !self.is_active
            && self.pending_timers.is_empty()
            && self.in_flight.is_none()
    }
}
