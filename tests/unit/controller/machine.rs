use std::time::Duration;

use super::*;
use crate::controller::driver::AnimationDriver;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Call {
    Start(DriveTarget),
    Set(DriveTarget),
}

#[derive(Default)]
struct FakeDriver {
    calls: Vec<Call>,
    next: u64,
}

impl AnimationDriver for FakeDriver {
    fn start(&mut self, target: DriveTarget) -> DriveTicket {
        self.calls.push(Call::Start(target));
        self.next += 1;
        DriveTicket(self.next)
    }

    fn set(&mut self, target: DriveTarget) {
        self.calls.push(Call::Set(target));
    }
}

#[derive(Default)]
struct FakeTimers {
    scheduled: Vec<(TimerId, Duration)>,
    cancelled: Vec<TimerId>,
    next: u64,
}

impl Scheduler for FakeTimers {
    fn schedule(&mut self, after: Duration) -> TimerId {
        self.next += 1;
        let id = TimerId(self.next);
        self.scheduled.push((id, after));
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.cancelled.push(id);
    }
}

struct Rig {
    controller: AnimationController,
    driver: FakeDriver,
    timers: FakeTimers,
}

impl Rig {
    fn new(config: ControllerConfig) -> Self {
        Self {
            controller: AnimationController::new(config),
            driver: FakeDriver::default(),
            timers: FakeTimers::default(),
        }
    }

    fn start(&mut self, name: Option<&str>) {
        let mut cx = DriveCtx::new(&mut self.driver, &mut self.timers);
        self.controller.start(name, &mut cx);
    }

    fn stop(&mut self) {
        let mut cx = DriveCtx::new(&mut self.driver, &mut self.timers);
        self.controller.stop(&mut cx);
    }

    fn fire(&mut self, id: TimerId) {
        let mut cx = DriveCtx::new(&mut self.driver, &mut self.timers);
        self.controller.on_timer(id, &mut cx);
    }

    fn settle(&mut self, ticket: DriveTicket, outcome: DriveOutcome) {
        let mut cx = DriveCtx::new(&mut self.driver, &mut self.timers);
        self.controller.on_settled(ticket, outcome, &mut cx);
    }

    fn ticket(&self) -> DriveTicket {
        self.controller
            .state()
            .pending_ticket()
            .expect("controller should wait on a ticket")
    }

    fn last_timer(&self) -> TimerId {
        self.timers.scheduled.last().expect("a timer").0
    }

    fn animate_starts(&self) -> usize {
        self.driver
            .calls
            .iter()
            .filter(|c| **c == Call::Start(DriveTarget::Animate))
            .count()
    }
}

fn config() -> ControllerConfig {
    ControllerConfig::from(&AnimateOptions::default())
}

#[test]
fn start_without_delay_drives_animate_immediately() {
    let mut rig = Rig::new(config());
    rig.start(None);

    assert_eq!(rig.driver.calls, vec![Call::Start(DriveTarget::Animate)]);
    assert_eq!(rig.controller.status(), ControllerStatus::Animating);
    assert!(rig.controller.is_active());
    assert_eq!(rig.controller.current_animation(), "default");
    assert_eq!(rig.controller.generation(), Generation(1));

    let events = rig.controller.drain_events();
    assert_eq!(
        events,
        vec![
            ControllerEvent::Started {
                generation: Generation(1),
                animation: "default".to_owned(),
                delayed: false,
            },
            ControllerEvent::Animating {
                generation: Generation(1),
                animation: "default".to_owned(),
            },
        ]
    );
    assert!(rig.controller.drain_events().is_empty());
}

#[test]
fn later_start_wins_over_earlier_one() {
    let mut rig = Rig::new(config());
    rig.start(Some("a"));
    let first = rig.ticket();
    rig.start(Some("b"));

    assert_eq!(rig.controller.current_animation(), "b");
    assert_eq!(rig.controller.generation(), Generation(2));

    // The superseded transition is no longer tracked.
    rig.controller.drain_events();
    rig.settle(first, DriveOutcome::Completed);
    assert!(rig.controller.drain_events().is_empty());
    assert_eq!(rig.controller.status(), ControllerStatus::Animating);
}

#[test]
fn stop_during_start_delay_never_animates() {
    let mut rig = Rig::new(ControllerConfig {
        delay: Millis(100),
        ..config()
    });
    rig.start(None);
    assert_eq!(rig.controller.status(), ControllerStatus::DelayPending);
    assert!(!rig.controller.is_active());
    assert_eq!(rig.timers.scheduled, vec![(TimerId(1), Duration::from_millis(100))]);
    assert!(rig.driver.calls.is_empty());

    rig.stop();
    assert_eq!(rig.timers.cancelled, vec![TimerId(1)]);
    assert!(!rig.controller.owns_timer(TimerId(1)));

    // A fire that raced the cancel is dropped.
    rig.fire(TimerId(1));
    assert_eq!(rig.animate_starts(), 0);
    assert_eq!(rig.driver.calls, vec![Call::Start(DriveTarget::Initial)]);
    assert_eq!(rig.controller.status(), ControllerStatus::Stopped);
}

#[test]
fn start_delay_elapses_into_animation() {
    let mut rig = Rig::new(ControllerConfig {
        delay: Millis(40),
        ..config()
    });
    rig.start(Some("spin"));
    let timer = rig.last_timer();
    rig.fire(timer);

    assert_eq!(rig.controller.status(), ControllerStatus::Animating);
    assert!(rig.controller.is_active());
    assert_eq!(rig.driver.calls, vec![Call::Start(DriveTarget::Animate)]);
}

#[test]
fn restart_with_delay_resets_pose_and_discards_old_transition() {
    let mut rig = Rig::new(ControllerConfig {
        delay: Millis(40),
        ..config()
    });
    rig.start(None);
    rig.fire(rig.last_timer());
    let old = rig.ticket();

    rig.start(None);
    assert_eq!(
        rig.driver.calls,
        vec![
            Call::Start(DriveTarget::Animate),
            Call::Start(DriveTarget::Initial)
        ]
    );
    rig.controller.drain_events();

    rig.settle(old, DriveOutcome::Interrupted);
    assert_eq!(
        rig.controller.drain_events(),
        vec![ControllerEvent::Discarded {
            captured: Generation(1),
            live: Generation(2),
        }]
    );
    // The pending start delay still owns the driver.
    assert_eq!(rig.driver.calls.len(), 2);
    assert_eq!(rig.controller.status(), ControllerStatus::DelayPending);
}

#[test]
fn stop_is_idempotent() {
    let mut rig = Rig::new(config());
    rig.start(None);
    rig.stop();
    let calls = rig.driver.calls.clone();
    let generation = rig.controller.generation();
    rig.controller.drain_events();

    rig.stop();
    assert_eq!(rig.driver.calls, calls);
    assert_eq!(rig.controller.generation(), generation);
    assert!(rig.controller.drain_events().is_empty());
}

#[test]
fn loop_rearms_from_initial_after_completion() {
    let mut rig = Rig::new(ControllerConfig {
        r#loop: true,
        ..config()
    });
    rig.start(None);
    assert_eq!(
        rig.driver.calls,
        vec![Call::Set(DriveTarget::Initial), Call::Start(DriveTarget::Animate)]
    );

    let ticket = rig.ticket();
    rig.controller.drain_events();
    rig.settle(ticket, DriveOutcome::Completed);

    assert_eq!(rig.animate_starts(), 2);
    assert_eq!(rig.controller.status(), ControllerStatus::Animating);
    let events = rig.controller.drain_events();
    assert!(matches!(events[0], ControllerEvent::Completed { .. }));
    assert!(matches!(events[1], ControllerEvent::Looped { .. }));
    assert!(matches!(events[2], ControllerEvent::Animating { .. }));
}

#[test]
fn loop_delay_waits_between_iterations() {
    let mut rig = Rig::new(ControllerConfig {
        r#loop: true,
        loop_delay: Millis(250),
        ..config()
    });
    rig.start(None);
    let ticket = rig.ticket();
    rig.settle(ticket, DriveOutcome::Completed);

    assert_eq!(rig.controller.status(), ControllerStatus::LoopDelayPending);
    assert_eq!(rig.timers.scheduled.last().map(|t| t.1), Some(Duration::from_millis(250)));
    assert_eq!(rig.animate_starts(), 1);

    rig.fire(rig.last_timer());
    assert_eq!(rig.animate_starts(), 2);
    assert_eq!(rig.controller.status(), ControllerStatus::Animating);
}

#[test]
fn stop_during_loop_delay_cancels_next_iteration() {
    let mut rig = Rig::new(ControllerConfig {
        r#loop: true,
        loop_delay: Millis(250),
        ..config()
    });
    rig.start(None);
    let ticket = rig.ticket();
    rig.settle(ticket, DriveOutcome::Completed);
    let timer = rig.last_timer();

    rig.stop();
    assert!(rig.timers.cancelled.contains(&timer));
    rig.fire(timer);
    assert_eq!(rig.animate_starts(), 1);
    assert_eq!(rig.driver.calls.last(), Some(&Call::Start(DriveTarget::Initial)));
}

#[test]
fn complete_on_stop_resets_after_transition_finishes() {
    let mut rig = Rig::new(ControllerConfig {
        complete_on_stop: true,
        ..config()
    });
    rig.start(None);
    let ticket = rig.ticket();
    rig.controller.drain_events();

    rig.stop();
    assert_eq!(rig.driver.calls, vec![Call::Start(DriveTarget::Animate)]);
    assert_eq!(rig.controller.state().pending_ticket(), Some(ticket));
    assert_eq!(rig.controller.status(), ControllerStatus::Stopped);

    rig.settle(ticket, DriveOutcome::Completed);
    assert_eq!(rig.driver.calls.last(), Some(&Call::Start(DriveTarget::Initial)));
    assert_eq!(
        rig.controller.drain_events(),
        vec![ControllerEvent::Stopped {
            generation: Generation(2),
            reset: true,
        }]
    );
    assert_eq!(rig.controller.state().pending_ticket(), None);
}

#[test]
fn start_abandons_a_pending_complete_on_stop() {
    let mut rig = Rig::new(ControllerConfig {
        complete_on_stop: true,
        ..config()
    });
    rig.start(None);
    let old = rig.ticket();
    rig.stop();
    rig.start(None);
    let calls = rig.driver.calls.len();

    rig.settle(old, DriveOutcome::Completed);
    assert_eq!(rig.driver.calls.len(), calls);
    assert!(rig.controller.is_active());
}

#[test]
fn persist_keeps_last_pose_on_stop() {
    let mut rig = Rig::new(ControllerConfig {
        persist_on_animate_end: true,
        ..config()
    });
    rig.start(None);
    rig.controller.drain_events();
    rig.stop();

    assert_eq!(rig.driver.calls, vec![Call::Start(DriveTarget::Animate)]);
    assert_eq!(
        rig.controller.drain_events(),
        vec![ControllerEvent::Stopped {
            generation: Generation(2),
            reset: false,
        }]
    );
}

#[test]
fn initial_on_animate_end_snaps_back_and_stays_active() {
    let mut rig = Rig::new(ControllerConfig {
        initial_on_animate_end: true,
        ..config()
    });
    rig.start(None);
    let ticket = rig.ticket();
    rig.settle(ticket, DriveOutcome::Completed);

    assert_eq!(rig.driver.calls.last(), Some(&Call::Set(DriveTarget::Initial)));
    assert_eq!(rig.controller.status(), ControllerStatus::Stopped);
    assert!(rig.controller.is_active());

    // A later stop still resets because the controller remained active.
    rig.stop();
    assert_eq!(rig.driver.calls.last(), Some(&Call::Start(DriveTarget::Initial)));
    assert!(!rig.controller.is_active());
}

#[test]
fn interrupted_transition_stops_and_resets() {
    let mut rig = Rig::new(ControllerConfig {
        r#loop: true,
        ..config()
    });
    rig.start(None);
    let ticket = rig.ticket();
    let calls = rig.driver.calls.len();
    rig.controller.drain_events();

    rig.settle(ticket, DriveOutcome::Interrupted);
    assert_eq!(rig.driver.calls.len(), calls + 1);
    assert_eq!(rig.driver.calls.last(), Some(&Call::Start(DriveTarget::Initial)));
    assert_eq!(rig.controller.status(), ControllerStatus::Stopped);
    assert!(!rig.controller.is_active());
    assert_eq!(
        rig.controller.drain_events(),
        vec![
            ControllerEvent::Interrupted {
                generation: Generation(1)
            },
            ControllerEvent::Stopped {
                generation: Generation(1),
                reset: true
            },
        ]
    );

    // Already stopped: a later stop changes nothing.
    rig.stop();
    assert_eq!(rig.driver.calls.len(), calls + 1);
}

#[test]
fn interrupted_transition_keeps_pose_when_persisting() {
    let mut rig = Rig::new(ControllerConfig {
        persist_on_animate_end: true,
        ..config()
    });
    rig.start(None);
    let ticket = rig.ticket();
    let calls = rig.driver.calls.len();

    rig.settle(ticket, DriveOutcome::Interrupted);
    assert_eq!(rig.driver.calls.len(), calls);
    assert_eq!(rig.controller.status(), ControllerStatus::Stopped);
    assert!(!rig.controller.is_active());
}

#[test]
fn dispatch_and_requests_route_to_start_and_stop() {
    let mut rig = Rig::new(config());
    {
        let mut cx = DriveCtx::new(&mut rig.driver, &mut rig.timers);
        rig.controller
            .dispatch(Command::Start(Some("wiggle".to_owned())), &mut cx);
    }
    assert_eq!(rig.controller.current_animation(), "wiggle");

    {
        let mut cx = DriveCtx::new(&mut rig.driver, &mut rig.timers);
        rig.controller
            .apply_request(&AnimateRequest::Named(String::new()), &mut cx);
    }
    assert!(!rig.controller.is_active());

    {
        let mut cx = DriveCtx::new(&mut rig.driver, &mut rig.timers);
        rig.controller.apply_request(&AnimateRequest::On, &mut cx);
    }
    assert_eq!(rig.controller.current_animation(), "default");
    assert!(rig.controller.is_active());
}

#[test]
fn dispose_cancels_timers_and_ignores_late_settlement() {
    let mut rig = Rig::new(ControllerConfig {
        r#loop: true,
        loop_delay: Millis(10),
        ..config()
    });
    rig.start(None);
    let ticket = rig.ticket();
    rig.settle(ticket, DriveOutcome::Completed);
    let timer = rig.last_timer();

    rig.controller.dispose(&mut rig.timers);
    assert!(rig.timers.cancelled.contains(&timer));
    assert!(!rig.controller.state().has_pending_timers());

    let calls = rig.driver.calls.len();
    rig.fire(timer);
    assert_eq!(rig.driver.calls.len(), calls);
    assert_eq!(rig.controller.status(), ControllerStatus::Stopped);
}
