use crate::scope::config::AnimateRequest;
use crate::scope::props::AnimateOptions;

/// Pointer interaction reported by the host UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PointerKind {
    /// Pointer entered the icon.
    Enter,
    /// Pointer left the icon.
    Leave,
    /// Button pressed over the icon.
    Down,
    /// Button released.
    Up,
}

/// A pointer event as seen by composed handlers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PointerEvent {
    /// What happened.
    pub kind: PointerKind,
    default_prevented: bool,
}

impl PointerEvent {
    /// Fresh, not yet handled event.
    pub fn new(kind: PointerKind) -> Self {
        Self {
            kind,
            default_prevented: false,
        }
    }

    /// Mark the event handled. Internal handlers still run.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// `true` once a handler called [`prevent_default`](Self::prevent_default).
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Request for a controller transition.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TriggerEvent {
    /// Pointer entered.
    HoverEnter,
    /// Pointer left.
    HoverLeave,
    /// Press began.
    TapDown,
    /// Press ended.
    TapUp,
    /// Icon scrolled into view.
    ViewEnter,
    /// Icon scrolled out of view.
    ViewLeave,
    /// Imperative start.
    ExplicitStart {
        /// Animation to play; the configured one when `None`.
        #[serde(default)]
        name: Option<String>,
    },
    /// Imperative stop.
    ExplicitStop,
}

impl From<PointerKind> for TriggerEvent {
    fn from(kind: PointerKind) -> Self {
        match kind {
            PointerKind::Enter => Self::HoverEnter,
            PointerKind::Leave => Self::HoverLeave,
            PointerKind::Down => Self::TapDown,
            PointerKind::Up => Self::TapUp,
        }
    }
}

/// What a trigger asks the controller to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Start the named animation, or the configured one when `None`.
    Start(Option<String>),
    /// Stop the running animation.
    Stop,
}

/// Which trigger sources a wrapper listens to, and with which animation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TriggerBindings {
    /// `animateOnHover`.
    pub hover: AnimateRequest,
    /// `animateOnTap`.
    pub tap: AnimateRequest,
    /// `animateOnView`.
    pub view: AnimateRequest,
}

impl TriggerBindings {
    /// Bindings of a mounted controller's wrapper.
    pub fn from_options(options: &AnimateOptions) -> Self {
        Self {
            hover: options.animate_on_hover.clone(),
            tap: options.animate_on_tap.clone(),
            view: options.animate_on_view.clone(),
        }
    }

    /// Translate a trigger into a controller command, or `None` when no binding listens.
    ///
    /// Leaving the icon stops it when either hover or tap triggering is enabled, so a press
    /// that drifts off the icon still ends the animation.
    pub fn command(&self, event: &TriggerEvent) -> Option<Command> {
        let start = |req: &AnimateRequest| {
            req.is_on()
                .then(|| Command::Start(req.name().map(str::to_owned)))
        };
        match event {
            TriggerEvent::HoverEnter => start(&self.hover),
            TriggerEvent::HoverLeave => {
                (self.hover.is_on() || self.tap.is_on()).then_some(Command::Stop)
            }
            TriggerEvent::TapDown => start(&self.tap),
            TriggerEvent::TapUp => self.tap.is_on().then_some(Command::Stop),
            TriggerEvent::ViewEnter => start(&self.view),
            TriggerEvent::ViewLeave => self.view.is_on().then_some(Command::Stop),
            TriggerEvent::ExplicitStart { name } => Some(Command::Start(name.clone())),
            TriggerEvent::ExplicitStop => Some(Command::Stop),
        }
    }
}

/// Parameters forwarded to the external view-intersection detector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewOptions {
    /// Whether a detector should be attached at all.
    pub enabled: bool,
    /// Keep reporting "in view" after the first sighting.
    pub trigger_once: bool,
    /// CSS-style margin around the viewport.
    pub root_margin: String,
}

impl ViewOptions {
    /// Detector parameters for a wrapper's options.
    pub fn from_options(options: &AnimateOptions) -> Self {
        Self {
            enabled: options.animate_on_view.is_on(),
            trigger_once: options.animate_on_view_once,
            root_margin: options.animate_on_view_margin.clone(),
        }
    }
}

/// Turns the detector's `isInView` reports into view triggers.
///
/// Only changes are reported. With `trigger_once`, the first "in view" latches and later
/// "out of view" reports are ignored.
#[derive(Clone, Debug)]
pub struct ViewLatch {
    options: ViewOptions,
    in_view: bool,
    latched: bool,
}

impl ViewLatch {
    /// Latch that has seen nothing yet.
    pub fn new(options: ViewOptions) -> Self {
        Self {
            options,
            in_view: false,
            latched: false,
        }
    }

    /// Detector parameters.
    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    /// Feed one detector report; returns the trigger it causes, if any.
    pub fn observe(&mut self, in_view: bool) -> Option<TriggerEvent> {
        if !self.options.enabled || self.latched {
            return None;
        }
        if in_view == self.in_view {
            return None;
        }
        self.in_view = in_view;
        if in_view {
            self.latched = self.options.trigger_once;
            Some(TriggerEvent::ViewEnter)
        } else {
            Some(TriggerEvent::ViewLeave)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/trigger/event.rs"]
mod tests;
