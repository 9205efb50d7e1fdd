use crate::controller::driver::{AnimationDriver, DriveTarget};
use crate::foundation::core::DriveTicket;

/// Which driver method was called.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverCallKind {
    /// Animated transition.
    Start,
    /// Instant jump.
    Set,
}

/// One call observed by a [`RecordingDriver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DriverCall {
    /// `start` or `set`.
    pub kind: DriverCallKind,
    /// Variant driven toward.
    pub target: DriveTarget,
    /// Ticket handed out for `start` calls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket: Option<DriveTicket>,
}

/// Driver that records every call and never settles on its own.
///
/// Tickets are numbered from 1 per driver.
#[derive(Clone, Debug, Default)]
pub struct RecordingDriver {
    calls: Vec<DriverCall>,
    next_ticket: u64,
}

impl RecordingDriver {
    /// Every call so far, oldest first.
    pub fn calls(&self) -> &[DriverCall] {
        &self.calls
    }

    /// Take the recorded calls, leaving the log empty.
    pub fn take_calls(&mut self) -> Vec<DriverCall> {
        std::mem::take(&mut self.calls)
    }

    /// Number of animated transitions toward the `animate` variant.
    pub fn animate_starts(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| c.kind == DriverCallKind::Start && c.target == DriveTarget::Animate)
            .count()
    }

    /// Most recent call.
    pub fn last(&self) -> Option<&DriverCall> {
        self.calls.last()
    }
}

impl AnimationDriver for RecordingDriver {
    fn start(&mut self, target: DriveTarget) -> DriveTicket {
        self.next_ticket += 1;
        let ticket = DriveTicket(self.next_ticket);
        self.calls.push(DriverCall {
            kind: DriverCallKind::Start,
            target,
            ticket: Some(ticket),
        });
        ticket
    }

    fn set(&mut self, target: DriveTarget) {
        self.calls.push(DriverCall {
            kind: DriverCallKind::Set,
            target,
            ticket: None,
        });
    }
}
