//! Scripted timelines replayed against an [`IconHost`] with recording drivers.
//!
//! A scenario mounts a list of wrappers, then applies timed steps (triggers, pointer and view
//! reports, `animate` changes, driver settlements, unmounts). Timers that fall due between
//! steps fire at their exact deadlines. The output is the ordered list of driver calls and
//! controller events, each stamped with the virtual time it happened at.

use std::time::Duration;

use crate::controller::driver::DriveOutcome;
use crate::controller::events::ControllerEvent;
use crate::foundation::core::{ControllerId, NodeId};
use crate::foundation::error::{IconMotionError, IconMotionResult};
use crate::runtime::host::IconHost;
use crate::runtime::recording::{DriverCall, RecordingDriver};
use crate::scope::config::AnimateRequest;
use crate::scope::props::IconProps;
use crate::trigger::event::{PointerEvent, PointerKind, TriggerEvent};

/// A replayable timeline: wrappers to mount and the steps applied to them.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Scenario {
    /// Wrappers in mount order.
    pub wrappers: Vec<ScenarioWrapper>,
    /// Timed actions. Applied in time order; ties keep file order.
    pub steps: Vec<ScenarioStep>,
    /// Keep the clock running to this time (ms) after the last step.
    pub until: Option<u64>,
}

/// One wrapper to mount.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioWrapper {
    /// Wrapper options.
    pub props: IconProps,
    /// Index of an earlier wrapper to mount under.
    pub parent: Option<usize>,
}

/// An action applied to one wrapper at a given time.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScenarioStep {
    /// Virtual time in milliseconds.
    pub at: u64,
    /// Index of the wrapper the action targets.
    #[serde(default)]
    pub icon: usize,
    /// What happens, flattened into the step object under `do`.
    #[serde(flatten)]
    pub action: ScenarioAction,
}

/// Step payload, tagged by `do`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "do", rename_all = "snake_case")]
pub enum ScenarioAction {
    /// Send a trigger straight to the wrapper.
    Trigger {
        /// Trigger to send.
        event: TriggerEvent,
    },
    /// Report a pointer event through the composed handlers.
    Pointer {
        /// Pointer event kind.
        pointer: PointerKind,
    },
    /// Report a viewport intersection change.
    InView {
        /// Whether the icon is now in view.
        visible: bool,
    },
    /// Change the wrapper's `animate` option.
    Animate {
        /// New `animate` value.
        request: AnimateRequest,
    },
    /// Settle whatever transition the wrapper's controller waits on.
    Settle {
        /// How the transition ends.
        outcome: DriveOutcome,
    },
    /// Unmount the wrapper and its subtree.
    Unmount,
}

/// One observation of a scenario run.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum ScenarioRecord {
    /// A driver call.
    Call {
        /// Virtual time in milliseconds.
        at: u64,
        /// Controller that made the call.
        controller: ControllerId,
        /// The call itself.
        call: DriverCall,
    },
    /// A controller lifecycle event.
    Event {
        /// Virtual time in milliseconds.
        at: u64,
        /// Controller that recorded it.
        controller: ControllerId,
        /// The event itself.
        event: ControllerEvent,
    },
}

impl Scenario {
    /// Parse a scenario. Malformed input is a config error.
    pub fn from_json_str(s: &str) -> IconMotionResult<Self> {
        serde_json::from_str(s).map_err(|e| IconMotionError::config(e.to_string()))
    }

    /// Replay the scenario from a fresh host.
    #[tracing::instrument(skip(self), fields(wrappers = self.wrappers.len(), steps = self.steps.len()))]
    pub fn run(&self) -> IconMotionResult<Vec<ScenarioRecord>> {
        let mut host = IconHost::<RecordingDriver>::with_default_drivers();
        let mut out = Vec::new();

        let mut nodes: Vec<NodeId> = Vec::with_capacity(self.wrappers.len());
        for (index, wrapper) in self.wrappers.iter().enumerate() {
            let parent = match wrapper.parent {
                Some(p) if p < index => Some(nodes[p]),
                Some(p) => {
                    return Err(IconMotionError::validation(format!(
                        "wrapper {index}: parent {p} must be mounted before it"
                    )));
                }
                None => None,
            };
            nodes.push(host.mount(parent, wrapper.props.clone())?);
        }
        collect(&mut host, &mut out);

        let mut steps: Vec<&ScenarioStep> = self.steps.iter().collect();
        steps.sort_by_key(|step| step.at);
        for step in steps {
            advance(&mut host, Duration::from_millis(step.at), &mut out);
            let node = *nodes.get(step.icon).ok_or_else(|| {
                IconMotionError::validation(format!(
                    "step at {}ms: unknown icon {}",
                    step.at, step.icon
                ))
            })?;
            apply(&mut host, node, step)?;
            collect(&mut host, &mut out);
        }

        if let Some(until) = self.until {
            advance(&mut host, Duration::from_millis(until), &mut out);
        }
        Ok(out)
    }
}

fn apply(
    host: &mut IconHost<RecordingDriver>,
    node: NodeId,
    step: &ScenarioStep,
) -> IconMotionResult<()> {
    match &step.action {
        ScenarioAction::Trigger { event } => {
            host.trigger(node, event.clone())?;
        }
        ScenarioAction::Pointer { pointer } => {
            let mut event = PointerEvent::new(*pointer);
            host.pointer::<IconMotionError>(node, &mut event, None)?;
        }
        ScenarioAction::InView { visible } => {
            host.set_in_view(node, *visible)?;
        }
        ScenarioAction::Animate { request } => host.set_animate(node, request.clone())?,
        ScenarioAction::Settle { outcome } => {
            let cid = host.controller_of(node)?.ok_or_else(|| {
                IconMotionError::validation(format!(
                    "step at {}ms: icon {} has no controller to settle",
                    step.at, step.icon
                ))
            })?;
            host.settle_pending(cid, *outcome)?;
        }
        ScenarioAction::Unmount => host.unmount(node)?,
    }
    Ok(())
}

fn advance(host: &mut IconHost<RecordingDriver>, until: Duration, out: &mut Vec<ScenarioRecord>) {
    while let Some(due) = host.next_due().filter(|due| *due <= until) {
        host.advance_to(due);
        collect(host, out);
    }
    host.advance_to(until);
}

fn collect(host: &mut IconHost<RecordingDriver>, out: &mut Vec<ScenarioRecord>) {
    let at = u64::try_from(host.now().as_millis()).unwrap_or(u64::MAX);
    let controllers: Vec<ControllerId> = host.controllers().collect();
    for controller in controllers {
        let Some(driver) = host.driver_mut(controller) else {
            continue;
        };
        out.extend(driver.take_calls().into_iter().map(|call| ScenarioRecord::Call {
            at,
            controller,
            call,
        }));
    }
    out.extend(
        host.drain_events()
            .into_iter()
            .map(|(controller, event)| ScenarioRecord::Event {
                at,
                controller,
                event,
            }),
    );
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/scenario.rs"]
mod tests;
