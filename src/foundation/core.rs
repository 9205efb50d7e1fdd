use std::time::Duration;

/// Monotonic epoch counter owned by one controller.
///
/// Every `start`/`stop` bumps it synchronously; continuations capture the value current at the
/// time they were scheduled and compare it against the live one before committing.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
    serde::Deserialize,
)]
pub struct Generation(pub u64);

impl Generation {
    /// Return the next generation. Saturates instead of wrapping.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// `true` when a continuation captured at `self` has been superseded by `live`.
    pub fn is_stale(self, live: Generation) -> bool {
        self.0 < live.0
    }
}

/// Handle of one scheduled timer.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TimerId(pub u64);

/// Handle returned by the animation driver for one `start` call.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct DriveTicket(pub u64);

/// Arena handle of a mounted icon controller.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ControllerId(pub u32);

impl std::fmt::Display for ControllerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "icon#{}", self.0)
    }
}

/// Handle of one mounted icon wrapper in a host tree.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct NodeId(pub u32);

/// Whole milliseconds, the unit wrapper options use for `delay` and `loopDelay`.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct Millis(pub u64);

impl Millis {
    /// Zero milliseconds.
    pub const ZERO: Millis = Millis(0);

    /// `true` for a strictly positive duration.
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Convert to [`Duration`].
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl From<Millis> for Duration {
    fn from(value: Millis) -> Self {
        value.as_duration()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
