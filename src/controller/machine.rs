//! Per-icon animation state machine.
//!
//! The controller is sans-IO: it issues driver calls and schedules timers through a
//! [`DriveCtx`], and the host feeds timer fires and driver settlements back in. Each
//! continuation carries the [`Generation`] that created it; `start` and `stop` bump the
//! generation before anything else, so a continuation that resumes late compares its captured
//! generation against the live one and backs off instead of committing.

use crate::controller::driver::{DriveCtx, DriveOutcome, DriveTarget, Scheduler};
use crate::controller::events::ControllerEvent;
use crate::controller::state::{
    ControllerState, ControllerStatus, InFlight, PendingTimer, TimerPurpose,
};
use crate::foundation::core::{DriveTicket, Generation, Millis, TimerId};
use crate::scope::config::AnimateRequest;
use crate::scope::props::AnimateOptions;
use crate::trigger::event::Command;

/// Behaviour switches of one controller, taken from its wrapper options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Animation played when a trigger names none.
    pub animation: String,
    /// Re-arm the animation after each completed run.
    pub r#loop: bool,
    /// Pause between loop iterations.
    pub loop_delay: Millis,
    /// Pause between a start and the first run.
    pub delay: Millis,
    /// Snap back to the initial pose after each completed run.
    pub initial_on_animate_end: bool,
    /// Let a running transition finish before a stop resets the pose.
    pub complete_on_stop: bool,
    /// Keep the last pose on stop instead of driving back to initial.
    pub persist_on_animate_end: bool,
}

impl From<&AnimateOptions> for ControllerConfig {
    fn from(o: &AnimateOptions) -> Self {
        Self {
            animation: o.animation.clone(),
            r#loop: o.r#loop,
            loop_delay: o.loop_delay,
            delay: o.delay,
            initial_on_animate_end: o.initial_on_animate_end,
            complete_on_stop: o.complete_on_stop,
            persist_on_animate_end: o.persist_on_animate_end,
        }
    }
}

/// Orchestrates one icon's animation lifecycle.
#[derive(Debug)]
pub struct AnimationController {
    config: ControllerConfig,
    state: ControllerState,
    events: Vec<ControllerEvent>,
}

impl AnimationController {
    /// Create an idle controller.
    pub fn new(config: ControllerConfig) -> Self {
        let state = ControllerState::new(config.animation.clone());
        Self {
            config,
            state,
            events: Vec::new(),
        }
    }

    /// Behaviour switches the controller was created with.
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Snapshot of the lifecycle state.
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Current lifecycle position.
    pub fn status(&self) -> ControllerStatus {
        self.state.status
    }

    /// Live generation.
    pub fn generation(&self) -> Generation {
        self.state.generation
    }

    /// `true` between an accepted trigger and the matching stop.
    pub fn is_active(&self) -> bool {
        self.state.is_active
    }

    /// Animation of the latest `start`.
    pub fn current_animation(&self) -> &str {
        &self.state.current_animation
    }

    /// `true` when `id` is a timer this controller is waiting on.
    pub fn owns_timer(&self, id: TimerId) -> bool {
        self.state.pending_timers.contains_key(&id)
    }

    /// Take the lifecycle events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<ControllerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Apply a trigger command.
    pub fn dispatch(&mut self, command: Command, cx: &mut DriveCtx<'_>) {
        match command {
            Command::Start(name) => self.start(name.as_deref(), cx),
            Command::Stop => self.stop(cx),
        }
    }

    /// Follow a change of the wrapper's `animate` request.
    pub fn apply_request(&mut self, request: &AnimateRequest, cx: &mut DriveCtx<'_>) {
        if request.is_on() {
            self.start(request.name(), cx);
        } else {
            self.stop(cx);
        }
    }

    /// Start `trigger`, or the configured animation when `None`.
    ///
    /// Supersedes everything in progress: pending timers are cancelled and an outstanding
    /// driver transition becomes stale. While a start delay is pending the stale transition
    /// stays tracked so its settlement is recognised and discarded.
    pub fn start(&mut self, trigger: Option<&str>, cx: &mut DriveCtx<'_>) {
        let generation = self.bump();
        let was_running = self.state.is_active || self.state.in_flight.is_some();
        self.clear_timers(cx.timers);
        self.state.awaiting_completion = None;

        let animation = trigger
            .map(str::to_owned)
            .unwrap_or_else(|| self.config.animation.clone());
        self.state.current_animation = animation.clone();

        let delayed = self.config.delay.is_positive();
        tracing::debug!(generation = generation.0, %animation, delayed, "start");
        self.events.push(ControllerEvent::Started {
            generation,
            animation,
            delayed,
        });

        if !delayed {
            self.run(generation, cx);
            return;
        }

        self.state.is_active = false;
        if was_running && !self.config.persist_on_animate_end {
            cx.driver.start(DriveTarget::Initial);
        }
        self.state.status = ControllerStatus::DelayPending;
        self.schedule(TimerPurpose::StartDelay, self.config.delay, generation, cx.timers);
    }

    /// Stop the animation.
    ///
    /// Cancels pending timers and, unless `persist_on_animate_end`, drives the initial pose.
    /// With `complete_on_stop` a running transition is allowed to finish first. Stopping an
    /// already stopped controller changes nothing.
    pub fn stop(&mut self, cx: &mut DriveCtx<'_>) {
        if self.state.is_settled_stop() {
            return;
        }
        let generation = self.bump();
        self.clear_timers(cx.timers);
        self.state.is_active = false;
        self.state.status = ControllerStatus::Stopped;

        if let Some(flight) = self.state.in_flight.take() {
            if self.config.complete_on_stop {
                tracing::debug!(generation = generation.0, "stop waits for transition");
                self.state.awaiting_completion = Some(InFlight {
                    ticket: flight.ticket,
                    generation,
                });
                return;
            }
        }
        self.finish_stop(generation, cx);
    }

    /// Resume after a timer fired.
    pub fn on_timer(&mut self, id: TimerId, cx: &mut DriveCtx<'_>) {
        let Some(timer) = self.state.pending_timers.remove(&id) else {
            return;
        };
        if timer.generation.is_stale(self.state.generation) {
            self.discard(timer.generation, cx);
            return;
        }

        match timer.purpose {
            TimerPurpose::StartDelay => self.run(timer.generation, cx),
            TimerPurpose::LoopDelay => {
                if self.state.is_active {
                    self.events.push(ControllerEvent::Looped {
                        generation: timer.generation,
                    });
                    self.run(timer.generation, cx);
                } else {
                    self.state.status = ControllerStatus::Stopped;
                    self.finish_stop(timer.generation, cx);
                }
            }
        }
    }

    /// Resume after the driver settled a transition.
    ///
    /// Tickets the controller no longer tracks (resets, abandoned runs) are ignored.
    pub fn on_settled(
        &mut self,
        ticket: DriveTicket,
        outcome: DriveOutcome,
        cx: &mut DriveCtx<'_>,
    ) {
        if let Some(waiting) = self.state.awaiting_completion {
            if waiting.ticket == ticket {
                self.state.awaiting_completion = None;
                if waiting.generation.is_stale(self.state.generation) {
                    self.discard(waiting.generation, cx);
                } else {
                    self.finish_stop(waiting.generation, cx);
                }
                return;
            }
        }

        let Some(flight) = self.state.in_flight.filter(|f| f.ticket == ticket) else {
            return;
        };
        self.state.in_flight = None;
        let generation = flight.generation;
        if generation.is_stale(self.state.generation) {
            self.discard(generation, cx);
            return;
        }

        if outcome == DriveOutcome::Interrupted {
            tracing::debug!(generation = generation.0, "transition interrupted");
            self.state.is_active = false;
            self.state.status = ControllerStatus::Stopped;
            self.events.push(ControllerEvent::Interrupted { generation });
            self.finish_stop(generation, cx);
            return;
        }

        if self.config.initial_on_animate_end {
            cx.driver.set(DriveTarget::Initial);
        }
        self.events.push(ControllerEvent::Completed { generation });

        if !self.config.r#loop {
            self.state.status = ControllerStatus::Stopped;
            return;
        }
        if !self.state.is_active {
            self.state.status = ControllerStatus::Stopped;
            self.finish_stop(generation, cx);
            return;
        }
        if self.config.loop_delay.is_positive() {
            self.state.status = ControllerStatus::LoopDelayPending;
            self.schedule(TimerPurpose::LoopDelay, self.config.loop_delay, generation, cx.timers);
        } else {
            self.events.push(ControllerEvent::Looped { generation });
            self.run(generation, cx);
        }
    }

    /// Tear down: cancel every timer and invalidate outstanding continuations.
    pub fn dispose(&mut self, timers: &mut dyn Scheduler) {
        self.bump();
        self.clear_timers(timers);
        self.state.in_flight = None;
        self.state.awaiting_completion = None;
        self.state.is_active = false;
        self.state.status = ControllerStatus::Stopped;
    }

    fn bump(&mut self) -> Generation {
        self.state.generation = self.state.generation.next();
        self.state.generation
    }

    fn run(&mut self, generation: Generation, cx: &mut DriveCtx<'_>) {
        self.state.is_active = true;
        if self.config.r#loop {
            cx.driver.set(DriveTarget::Initial);
        }
        let ticket = cx.driver.start(DriveTarget::Animate);
        self.state.in_flight = Some(InFlight { ticket, generation });
        self.state.status = ControllerStatus::Animating;
        tracing::debug!(
            generation = generation.0,
            animation = %self.state.current_animation,
            ticket = ticket.0,
            "animating"
        );
        self.events.push(ControllerEvent::Animating {
            generation,
            animation: self.state.current_animation.clone(),
        });
    }

    fn finish_stop(&mut self, generation: Generation, cx: &mut DriveCtx<'_>) {
        let reset = !self.config.persist_on_animate_end;
        if reset {
            cx.driver.start(DriveTarget::Initial);
        }
        tracing::debug!(generation = generation.0, reset, "stopped");
        self.events.push(ControllerEvent::Stopped { generation, reset });
    }

    /// Safe fallback for a superseded continuation.
    ///
    /// Drives the initial pose only while no newer run owns the driver.
    fn discard(&mut self, captured: Generation, cx: &mut DriveCtx<'_>) {
        let live = self.state.generation;
        tracing::trace!(captured = captured.0, live = live.0, "stale continuation");
        self.events.push(ControllerEvent::Discarded { captured, live });

        let idle = !self.state.is_active
            && self.state.pending_timers.is_empty()
            && self.state.in_flight.is_none()
            && self.state.awaiting_completion.is_none();
        if idle && !self.config.persist_on_animate_end {
            cx.driver.start(DriveTarget::Initial);
        }
    }

    fn schedule(
        &mut self,
        purpose: TimerPurpose,
        after: Millis,
        generation: Generation,
        timers: &mut dyn Scheduler,
    ) {
        let id = timers.schedule(after.as_duration());
        self.state
            .pending_timers
            .insert(id, PendingTimer { purpose, generation });
    }

    fn clear_timers(&mut self, timers: &mut dyn Scheduler) {
        for id in std::mem::take(&mut self.state.pending_timers).into_keys() {
            timers.cancel(id);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/controller/machine.rs"]
mod tests;
