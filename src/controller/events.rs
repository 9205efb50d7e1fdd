use crate::foundation::core::Generation;

/// Lifecycle notifications recorded by a controller, drained by the host.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControllerEvent {
    /// `start` accepted; `delayed` when a start delay is pending.
    Started {
        /// Generation opened by the start.
        generation: Generation,
        /// Animation requested.
        animation: String,
        /// A start delay is pending.
        delayed: bool,
    },
    /// Animate transition issued to the driver.
    Animating {
        /// Generation of the run.
        generation: Generation,
        /// Animation being played.
        animation: String,
    },
    /// The running transition finished.
    Completed {
        /// Generation of the run.
        generation: Generation,
    },
    /// A loop iteration is being re-armed.
    Looped {
        /// Generation of the loop.
        generation: Generation,
    },
    /// Controller stopped. `reset` when the initial pose was driven.
    Stopped {
        /// Generation that stopped.
        generation: Generation,
        /// The initial pose was driven.
        reset: bool,
    },
    /// The driver rejected or superseded the running transition. A `Stopped` follows.
    Interrupted {
        /// Generation of the run.
        generation: Generation,
    },
    /// A continuation resumed after its generation was superseded.
    Discarded {
        /// Generation the continuation carried.
        captured: Generation,
        /// Generation live when it resumed.
        live: Generation,
    },
}
