//! Conditional reveal: show or hide error content for one control.
//!
//! The reveal is a level-triggered observer with two named input events:
//! the control reported a fresh error mapping, or the extra boolean
//! condition changed. Every event forces a full recompute of the derived
//! output, even when the output is unchanged; error mappings are small, so
//! no diffing or debouncing is done.
//!
//! Recomputation is strictly serialized per reveal instance in event
//! arrival order. Two events landing in the same tick produce two
//! recomputations, never one merged pass. Detaching terminates the reveal;
//! no recomputation may occur afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, trace};

use crate::error::FormErrorsError;
use crate::field_errors::FieldErrors;

/// Change events buffered per subscriber before a slow reveal starts
/// lagging and resyncs from the control's current state.
const CHANGE_BUFFER: usize = 64;

/// A validatable target a reveal can bind to.
///
/// External validation machinery pushes each fresh error mapping with
/// [`Control::set_errors`]; every push is delivered to subscribers as one
/// change event, never batched. By upstream convention a valid control
/// reports `None` (no mapping at all), which is what visibility keys off.
#[derive(Debug, Clone)]
pub struct Control {
    inner: Arc<ControlInner>,
}

#[derive(Debug)]
struct ControlInner {
    current: RwLock<Option<FieldErrors>>,
    changes: broadcast::Sender<Option<FieldErrors>>,
}

impl Control {
    /// Create a control with no recorded error state.
    #[must_use]
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_BUFFER);
        Self {
            inner: Arc::new(ControlInner {
                current: RwLock::new(None),
                changes,
            }),
        }
    }

    /// Record the control's current error mapping and notify subscribers.
    ///
    /// `None` means the control is valid (or was never evaluated); an empty
    /// mapping also counts as present for visibility purposes.
    pub fn set_errors(&self, errors: Option<FieldErrors>) {
        *self.inner.current.write() = errors.clone();
        // No subscribers is fine.
        let _ = self.inner.changes.send(errors);
    }

    /// Snapshot of the current error mapping.
    #[must_use]
    pub fn errors(&self) -> Option<FieldErrors> {
        self.inner.current.read().clone()
    }

    /// Subscribe to change notifications.
    #[must_use]
    pub fn changes(&self) -> broadcast::Receiver<Option<FieldErrors>> {
        self.inner.changes.subscribe()
    }
}

impl Default for Control {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry of named controls a reveal resolves its target from.
#[derive(Debug, Clone, Default)]
pub struct FormControls {
    controls: HashMap<String, Control>,
}

impl FormControls {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a control under a name, returning a handle to it.
    ///
    /// Registering the same name again replaces the previous control.
    pub fn register(&mut self, name: impl Into<String>) -> Control {
        let control = Control::new();
        self.controls.insert(name.into(), control.clone());
        control
    }

    /// Look up a control by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Control> {
        self.controls.get(name)
    }
}

/// Input events of the reveal state machine.
#[derive(Debug, Clone)]
pub enum RevealEvent {
    /// The extra condition changed.
    Condition(bool),
    /// The control reported a fresh error mapping.
    ControlChanged(Option<FieldErrors>),
}

/// Derived output: what the rendering target should do.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RevealOutput {
    /// Render nothing.
    #[default]
    Hidden,
    /// Render the error content with the current mapping in scope.
    Visible(FieldErrors),
}

impl RevealOutput {
    /// Whether the error content should be rendered.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        matches!(self, Self::Visible(_))
    }

    /// The exposed error mapping, when visible.
    #[must_use]
    pub const fn errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Visible(errors) => Some(errors),
            Self::Hidden => None,
        }
    }
}

/// The recomputation core of the reveal.
///
/// Visible if and only if the extra condition is currently true and the
/// control's error mapping is present.
#[derive(Debug, Clone)]
pub struct RevealState {
    condition: bool,
    errors: Option<FieldErrors>,
}

impl RevealState {
    /// Start from the control's current error mapping; the extra condition
    /// defaults to true.
    #[must_use]
    pub const fn new(errors: Option<FieldErrors>) -> Self {
        Self {
            condition: true,
            errors,
        }
    }

    /// Apply one input event and recompute the output.
    pub fn apply(&mut self, event: RevealEvent) -> RevealOutput {
        match event {
            RevealEvent::Condition(condition) => self.condition = condition,
            RevealEvent::ControlChanged(errors) => self.errors = errors,
        }
        self.output()
    }

    /// Recompute the derived output from the current inputs.
    #[must_use]
    pub fn output(&self) -> RevealOutput {
        match (&self.errors, self.condition) {
            (Some(errors), true) => RevealOutput::Visible(errors.clone()),
            _ => RevealOutput::Hidden,
        }
    }
}

/// A bound reveal: one task serializing recomputations for one control.
///
/// Dropping the reveal detaches it.
#[derive(Debug)]
pub struct Reveal {
    output: watch::Receiver<RevealOutput>,
    condition: mpsc::UnboundedSender<bool>,
    shutdown: watch::Sender<bool>,
}

impl Reveal {
    /// Bind to a named control and start recomputing.
    ///
    /// Must be called within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`FormErrorsError::ControlNotFound`] when the registry has
    /// no control under `name`. This is fatal at bind time; a reveal
    /// without a target is meaningless.
    pub fn bind(controls: &FormControls, name: &str) -> Result<Self, FormErrorsError> {
        let control = controls
            .get(name)
            .ok_or_else(|| FormErrorsError::ControlNotFound {
                control: name.to_string(),
            })?;
        debug!(control = name, "reveal bound");
        Ok(Self::attach(control))
    }

    /// Bind directly to a control handle.
    ///
    /// Must be called within a tokio runtime. The initial output reflects
    /// the control's current error mapping with the condition true.
    #[must_use]
    pub fn attach(control: &Control) -> Self {
        let mut changes = control.changes();
        let (condition_tx, mut condition_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let mut state = RevealState::new(control.errors());
        let (output_tx, output_rx) = watch::channel(state.output());
        let resync = control.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    // Checked first so a detach always wins over queued
                    // events: no recomputation after de-registration.
                    biased;
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                    condition = condition_rx.recv() => {
                        let Some(condition) = condition else { break };
                        trace!(condition, "reveal condition changed");
                        let _ = output_tx.send(state.apply(RevealEvent::Condition(condition)));
                    }
                    change = changes.recv() => {
                        match change {
                            Ok(errors) => {
                                trace!("reveal control changed");
                                let _ = output_tx
                                    .send(state.apply(RevealEvent::ControlChanged(errors)));
                            }
                            Err(broadcast::error::RecvError::Lagged(missed)) => {
                                // Catch up from the control's current state.
                                debug!(missed, "reveal lagged behind control changes");
                                let _ = output_tx.send(
                                    state.apply(RevealEvent::ControlChanged(resync.errors())),
                                );
                            }
                            Err(broadcast::error::RecvError::Closed) => break,
                        }
                    }
                }
            }
            debug!("reveal detached");
        });

        Self {
            output: output_rx,
            condition: condition_tx,
            shutdown: shutdown_tx,
        }
    }

    /// Watch the derived output.
    ///
    /// The receiver always holds the result of the latest recomputation.
    #[must_use]
    pub fn output(&self) -> watch::Receiver<RevealOutput> {
        self.output.clone()
    }

    /// Snapshot of the current output.
    #[must_use]
    pub fn current(&self) -> RevealOutput {
        self.output.borrow().clone()
    }

    /// Whether the error content should currently be rendered.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.output.borrow().is_visible()
    }

    /// Update the extra condition. Each call is one recomputation.
    pub fn set_condition(&self, condition: bool) {
        let _ = self.condition.send(condition);
    }

    /// A clonable handle for driving the extra condition.
    ///
    /// Useful when the reveal itself is owned by the rendering side while
    /// some other component decides whether its content may be shown.
    #[must_use]
    pub fn condition_setter(&self) -> ConditionSetter {
        ConditionSetter {
            condition: self.condition.clone(),
        }
    }

    /// Detach both subscriptions.
    ///
    /// The condition stream is terminated and no recomputation occurs
    /// afterwards, even if the control keeps emitting changes.
    pub fn detach(&self) {
        let _ = self.shutdown.send(true);
    }
}

impl Drop for Reveal {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

/// Detached handle for the extra-condition stream of one [`Reveal`].
///
/// Each [`set`](Self::set) is delivered as one recomputation. Setting the
/// condition after the reveal detached is a no-op.
#[derive(Debug, Clone)]
pub struct ConditionSetter {
    condition: mpsc::UnboundedSender<bool>,
}

impl ConditionSetter {
    /// Update the extra condition.
    pub fn set(&self, condition: bool) {
        let _ = self.condition.send(condition);
    }
}
