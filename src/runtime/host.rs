//! Single-threaded host for a tree of icon wrappers.
//!
//! [`IconHost`] plays the part of the UI framework: it mounts wrappers under parents, resolves
//! their scopes, owns one controller and one driver per spawned wrapper, routes pointer and view
//! events, and drives a virtual clock. Drivers are settled explicitly through
//! [`IconHost::settle`], which keeps every interleaving reproducible.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::animation::variants::{VariantMap, resolve_variants};
use crate::controller::driver::{AnimationDriver, DriveCtx, DriveOutcome};
use crate::controller::events::ControllerEvent;
use crate::controller::machine::{AnimationController, ControllerConfig};
use crate::foundation::core::{ControllerId, DriveTicket, NodeId};
use crate::foundation::error::{IconMotionError, IconMotionResult};
use crate::runtime::timers::VirtualTimers;
use crate::scope::config::{AnimateRequest, ScopeConfig, SharedScope};
use crate::scope::props::IconProps;
use crate::scope::resolve::{Resolution, SpawnPlan, resolve_scope};
use crate::trigger::binding::{Handler, compose};
use crate::trigger::event::{PointerEvent, TriggerBindings, TriggerEvent, ViewLatch, ViewOptions};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum NodeKind {
    Spawned(ControllerId),
    Inherit,
    Detached,
}

#[derive(Debug)]
struct Node {
    parent: Option<NodeId>,
    props: IconProps,
    kind: NodeKind,
}

struct Slot<D> {
    controller: AnimationController,
    driver: D,
    bindings: TriggerBindings,
    view: ViewLatch,
    plan: SpawnPlan,
}

/// Arena of mounted wrappers and their controllers.
pub struct IconHost<D> {
    nodes: BTreeMap<NodeId, Node>,
    slots: BTreeMap<ControllerId, Slot<D>>,
    timers: VirtualTimers<ControllerId>,
    make_driver: Box<dyn FnMut(ControllerId) -> D>,
    log: Vec<(ControllerId, ControllerEvent)>,
    next_node: u32,
    next_controller: u32,
}

impl<D: AnimationDriver + Default + 'static> IconHost<D> {
    /// Host whose drivers are built with `D::default()`.
    pub fn with_default_drivers() -> Self {
        Self::new(|_| D::default())
    }
}

impl<D: AnimationDriver> IconHost<D> {
    /// Host building one driver per spawned controller with `make_driver`.
    pub fn new(make_driver: impl FnMut(ControllerId) -> D + 'static) -> Self {
        Self {
            nodes: BTreeMap::new(),
            slots: BTreeMap::new(),
            timers: VirtualTimers::new(),
            make_driver: Box::new(make_driver),
            log: Vec::new(),
            next_node: 0,
            next_controller: 0,
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    /// Deadline of the next pending timer, if any.
    pub fn next_due(&self) -> Option<Duration> {
        self.timers.next_due()
    }

    /// Mount a wrapper under `parent` (or at the root).
    ///
    /// The wrapper either reuses the nearest controller above it, spawns its own, or stays
    /// detached. A spawned controller whose `animate` request is on starts right away.
    #[tracing::instrument(skip(self, props))]
    pub fn mount(&mut self, parent: Option<NodeId>, props: IconProps) -> IconMotionResult<NodeId> {
        props.validate()?;
        let context = match parent {
            Some(p) => self.context(p)?,
            None => None,
        };

        self.next_node += 1;
        let id = NodeId(self.next_node);
        let (kind, autostart) = match resolve_scope(&props, context.as_deref()) {
            Resolution::Inherit(_) => (NodeKind::Inherit, None),
            Resolution::Detached => (NodeKind::Detached, None),
            Resolution::Spawn(plan) => {
                let request = plan.options.animate.clone();
                (NodeKind::Spawned(self.spawn(plan)), Some(request))
            }
        };
        self.nodes.insert(id, Node {
            parent,
            props,
            kind,
        });
        tracing::debug!(node = id.0, ?kind, "mounted");

        if let (NodeKind::Spawned(cid), Some(request)) = (kind, autostart) {
            if request.is_on() {
                self.with_controller(cid, |c, cx| c.apply_request(&request, cx))?;
            }
        }
        Ok(id)
    }

    /// Remove a wrapper and everything mounted below it, disposing their controllers.
    pub fn unmount(&mut self, id: NodeId) -> IconMotionResult<()> {
        self.node(id)?;
        let mut doomed = vec![id];
        let mut i = 0;
        while i < doomed.len() {
            let current = doomed[i];
            doomed.extend(
                self.nodes
                    .iter()
                    .filter(|(_, n)| n.parent == Some(current))
                    .map(|(k, _)| *k),
            );
            i += 1;
        }

        for node_id in doomed.into_iter().rev() {
            let Some(node) = self.nodes.remove(&node_id) else {
                continue;
            };
            if let NodeKind::Spawned(cid) = node.kind {
                if let Some(mut slot) = self.slots.remove(&cid) {
                    slot.controller.dispose(&mut self.timers.owned(cid));
                    tracing::debug!(controller = %cid, "disposed");
                }
            }
        }
        Ok(())
    }

    /// Effective scope seen by consumers below `id`.
    ///
    /// Recomputed on every read, so it reflects the owning controller's live state. Detached
    /// wrappers read the default scope.
    pub fn read_scope(&self, id: NodeId) -> IconMotionResult<SharedScope> {
        Ok(self
            .context(id)?
            .unwrap_or_else(|| Arc::new(ScopeConfig::default())))
    }

    /// Variant tree for `map` under the scope of `id`.
    pub fn resolve_variants(&self, id: NodeId, map: &VariantMap) -> IconMotionResult<Value> {
        let scope = self.read_scope(id)?;
        Ok(resolve_variants(map, &scope))
    }

    /// Controller driving `id`: its own, or the one it inherits.
    pub fn controller_of(&self, id: NodeId) -> IconMotionResult<Option<ControllerId>> {
        match self.node(id)?.kind {
            NodeKind::Spawned(cid) => Ok(Some(cid)),
            _ => Ok(self.context(id)?.and_then(|scope| scope.controls)),
        }
    }

    /// Controller behind `cid`, if still mounted.
    pub fn controller(&self, cid: ControllerId) -> Option<&AnimationController> {
        self.slots.get(&cid).map(|slot| &slot.controller)
    }

    /// Driver of `cid`.
    pub fn driver(&self, cid: ControllerId) -> Option<&D> {
        self.slots.get(&cid).map(|slot| &slot.driver)
    }

    /// Mutable driver of `cid`.
    pub fn driver_mut(&mut self, cid: ControllerId) -> Option<&mut D> {
        self.slots.get_mut(&cid).map(|slot| &mut slot.driver)
    }

    /// Ids of all live controllers, in mount order.
    pub fn controllers(&self) -> impl Iterator<Item = ControllerId> + '_ {
        self.slots.keys().copied()
    }

    /// Options handed to the external view detector for `id`.
    pub fn view_options(&self, id: NodeId) -> IconMotionResult<Option<&ViewOptions>> {
        match self.node(id)?.kind {
            NodeKind::Spawned(cid) => Ok(Some(self.slot(cid)?.view.options())),
            _ => Ok(None),
        }
    }

    /// Deliver a trigger to `id`.
    ///
    /// Wrappers with their own controller react through their bindings. Inheriting wrappers
    /// forward explicit start and stop to the controller above them and ignore the rest.
    /// Returns whether a command reached a controller.
    pub fn trigger(&mut self, id: NodeId, event: TriggerEvent) -> IconMotionResult<bool> {
        let target = match self.node(id)?.kind {
            NodeKind::Spawned(cid) => self
                .slot(cid)?
                .bindings
                .command(&event)
                .map(|command| (cid, command)),
            NodeKind::Inherit => match event {
                TriggerEvent::ExplicitStart { .. } | TriggerEvent::ExplicitStop => self
                    .context(id)?
                    .and_then(|scope| scope.controls)
                    .zip(TriggerBindings::default().command(&event)),
                _ => None,
            },
            NodeKind::Detached => None,
        };
        let Some((cid, command)) = target else {
            tracing::trace!(node = id.0, ?event, "trigger ignored");
            return Ok(false);
        };
        self.with_controller(cid, |c, cx| c.dispatch(command, cx))?;
        Ok(true)
    }

    /// Run a pointer event through the consumer's handler and then the wrapper's own.
    ///
    /// The wrapper reacts even when the consumer prevented the default. An error from the
    /// consumer's handler is returned unchanged and the wrapper does not react.
    pub fn pointer<'h, Err>(
        &mut self,
        id: NodeId,
        event: &mut PointerEvent,
        theirs: Option<Handler<'h, PointerEvent, Err>>,
    ) -> Result<bool, Err>
    where
        Err: From<IconMotionError> + 'h,
    {
        let mut seen = None;
        {
            let ours: Handler<'_, PointerEvent, Err> = Box::new(|ev: &mut PointerEvent| {
                seen = Some(ev.kind);
                Ok(())
            });
            let mut handler = compose(theirs, Some(ours));
            handler(event)?;
        }
        match seen {
            Some(kind) => Ok(self.trigger(id, TriggerEvent::from(kind))?),
            None => Ok(false),
        }
    }

    /// Report the detector's `isInView` for `id`.
    pub fn set_in_view(&mut self, id: NodeId, in_view: bool) -> IconMotionResult<bool> {
        let NodeKind::Spawned(cid) = self.node(id)?.kind else {
            return Ok(false);
        };
        let slot = self.slot_mut(cid)?;
        match slot.view.observe(in_view) {
            Some(event) => self.trigger(id, event),
            None => Ok(false),
        }
    }

    /// Change the `animate` option of a wrapper that owns a controller.
    pub fn set_animate(&mut self, id: NodeId, request: AnimateRequest) -> IconMotionResult<()> {
        let NodeKind::Spawned(cid) = self.node(id)?.kind else {
            return Err(IconMotionError::validation(format!(
                "node {} does not own a controller",
                id.0
            )));
        };
        self.slot_mut(cid)?.plan.options.animate = request.clone();
        self.with_controller(cid, |c, cx| c.apply_request(&request, cx))
    }

    /// Report that the driver of `cid` finished the transition behind `ticket`.
    pub fn settle(
        &mut self,
        cid: ControllerId,
        ticket: DriveTicket,
        outcome: DriveOutcome,
    ) -> IconMotionResult<()> {
        self.with_controller(cid, |c, cx| c.on_settled(ticket, outcome, cx))
    }

    /// Settle whatever transition `cid` is currently waiting on.
    pub fn settle_pending(
        &mut self,
        cid: ControllerId,
        outcome: DriveOutcome,
    ) -> IconMotionResult<Option<DriveTicket>> {
        let Some(ticket) = self.slot(cid)?.controller.state().pending_ticket() else {
            return Ok(None);
        };
        self.settle(cid, ticket, outcome)?;
        Ok(Some(ticket))
    }

    /// Move the clock forward by `dt`, firing due timers in order.
    pub fn advance(&mut self, dt: Duration) -> usize {
        let until = self.now().saturating_add(dt);
        self.advance_to(until)
    }

    /// Move the clock to `until`, firing due timers in order. Returns how many fired.
    #[tracing::instrument(skip(self))]
    pub fn advance_to(&mut self, until: Duration) -> usize {
        let mut fired = 0;
        while let Some((timer, owner)) = self.timers.pop_due(until) {
            fired += 1;
            if self
                .with_controller(owner, |c, cx| c.on_timer(timer, cx))
                .is_err()
            {
                tracing::trace!(controller = %owner, "timer for disposed controller");
            }
        }
        fired
    }

    /// Take controller events recorded since the last drain, in emission order.
    pub fn drain_events(&mut self) -> Vec<(ControllerId, ControllerEvent)> {
        std::mem::take(&mut self.log)
    }

    fn spawn(&mut self, plan: SpawnPlan) -> ControllerId {
        self.next_controller += 1;
        let cid = ControllerId(self.next_controller);
        let slot = Slot {
            controller: AnimationController::new(ControllerConfig::from(&plan.options)),
            driver: (self.make_driver)(cid),
            bindings: TriggerBindings::from_options(&plan.options),
            view: ViewLatch::new(ViewOptions::from_options(&plan.options)),
            plan,
        };
        self.slots.insert(cid, slot);
        cid
    }

    fn context(&self, id: NodeId) -> IconMotionResult<Option<SharedScope>> {
        let node = self.node(id)?;
        match node.kind {
            NodeKind::Spawned(cid) => {
                let slot = self.slot(cid)?;
                Ok(Some(Arc::new(slot.plan.scope(cid, slot.controller.state()))))
            }
            NodeKind::Inherit => {
                let parent = match node.parent {
                    Some(p) => self.context(p)?,
                    None => None,
                };
                match resolve_scope(&node.props, parent.as_deref()) {
                    Resolution::Inherit(scope) => Ok(Some(scope)),
                    _ => Ok(parent),
                }
            }
            NodeKind::Detached => Ok(None),
        }
    }

    fn with_controller<R>(
        &mut self,
        cid: ControllerId,
        f: impl FnOnce(&mut AnimationController, &mut DriveCtx<'_>) -> R,
    ) -> IconMotionResult<R> {
        let slot = self
            .slots
            .get_mut(&cid)
            .ok_or_else(|| IconMotionError::validation(format!("unknown controller {cid}")))?;
        let out = {
            let mut timers = self.timers.owned(cid);
            let mut cx = DriveCtx::new(&mut slot.driver, &mut timers);
            f(&mut slot.controller, &mut cx)
        };
        self.log.extend(
            slot.controller
                .drain_events()
                .into_iter()
                .map(|event| (cid, event)),
        );
        Ok(out)
    }

    fn node(&self, id: NodeId) -> IconMotionResult<&Node> {
        self.nodes
            .get(&id)
            .ok_or_else(|| IconMotionError::validation(format!("unknown node {}", id.0)))
    }

    fn slot(&self, cid: ControllerId) -> IconMotionResult<&Slot<D>> {
        self.slots
            .get(&cid)
            .ok_or_else(|| IconMotionError::validation(format!("unknown controller {cid}")))
    }

    fn slot_mut(&mut self, cid: ControllerId) -> IconMotionResult<&mut Slot<D>> {
        self.slots
            .get_mut(&cid)
            .ok_or_else(|| IconMotionError::validation(format!("unknown controller {cid}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/host.rs"]
mod tests;
