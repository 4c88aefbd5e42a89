//! Step state machine: owns the ordered step list and the current cursor, and
//! emits the lifecycle events every renderer and the key handler react to.

use serde::Deserialize;

use crate::error::Result;
use crate::observable::{Binding, EventKind, Observable};

/// Spotlight cutout shape for a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Circle,
}

/// Per-step spotlight override. Absent fields fall back to the matched
/// node's own box.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct ShapeOptions {
    pub kind: ShapeKind,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub radius: Option<f64>,
    pub offset: (f64, f64),
    pub stroke_width: f64,
}

fn default_show_progress() -> bool {
    true
}

/// One tour stop. Steps are immutable inputs owned by the caller; the model
/// only moves its cursor across the list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Step {
    /// Anchor target. `None` means "centered popup, no spotlight".
    #[serde(default)]
    pub selector: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub next_label: Option<String>,
    #[serde(default = "default_show_progress")]
    pub show_progress: bool,
    #[serde(default)]
    pub window_class: Option<String>,
    #[serde(default)]
    pub window_width: Option<f64>,
    #[serde(default)]
    pub shape: Option<ShapeOptions>,
}

impl Step {
    pub fn anchored(selector: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            selector: Some(selector.into()),
            title: title.into(),
            ..Self::unanchored("")
        }
    }

    pub fn unanchored(title: impl Into<String>) -> Self {
        Self {
            selector: None,
            title: title.into(),
            body: String::new(),
            next_label: None,
            show_progress: true,
            window_class: None,
            window_width: None,
            shape: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_shape(mut self, shape: ShapeOptions) -> Self {
        self.shape = Some(shape);
        self
    }
}

/// Lifecycle vocabulary of the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TourEventKind {
    Start,
    Step,
    Stop,
}

impl EventKind for TourEventKind {
    fn as_str(&self) -> &'static str {
        match self {
            TourEventKind::Start => "start",
            TourEventKind::Step => "step",
            TourEventKind::Stop => "stop",
        }
    }
}

/// Payload delivered to every lifecycle subscriber. `step`/`index` describe
/// the state after the transition; `last_step`/`last_index` the state before,
/// so renderers can compute deltas.
#[derive(Debug, Clone, PartialEq)]
pub struct LifecycleEvent {
    pub kind: TourEventKind,
    pub step: Option<Step>,
    pub index: Option<usize>,
    pub last_step: Option<Step>,
    pub last_index: Option<usize>,
}

impl LifecycleEvent {
    fn new(kind: TourEventKind, step: Option<Step>, index: Option<usize>) -> Self {
        Self {
            kind,
            step,
            index,
            last_step: None,
            last_index: None,
        }
    }
}

pub type ModelBinding = Binding<TourEventKind, LifecycleEvent>;

/// Single source of truth for "what step are we on".
///
/// Inactive ⇔ `cursor == None`. Active with an empty step list is a
/// documented edge case: `start` on an empty list still activates at index 0
/// with `current_step() == None`; callers are expected to guard.
pub struct TourModel {
    steps: Vec<Step>,
    cursor: Option<usize>,
    observable: Observable<TourEventKind, LifecycleEvent>,
}

impl TourModel {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps,
            cursor: None,
            observable: Observable::new(
                "tour::model",
                &[TourEventKind::Start, TourEventKind::Step, TourEventKind::Stop],
            ),
        }
    }

    pub fn get_steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn current_index(&self) -> Option<usize> {
        self.cursor
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.steps.get(self.cursor?)
    }

    pub fn is_active(&self) -> bool {
        self.cursor.is_some()
    }

    /// Activate the tour at step 0, replacing the step list if one is given.
    /// Emits `start`, then — strictly after — `step` with no previous state.
    pub fn start(&mut self, steps: Option<Vec<Step>>) -> Result<()> {
        if let Some(steps) = steps {
            self.steps = steps;
        }
        self.cursor = Some(0);
        let step = self.steps.first().cloned();
        self.observable.fire(
            TourEventKind::Start,
            &LifecycleEvent::new(TourEventKind::Start, step.clone(), Some(0)),
        )?;
        self.observable.fire(
            TourEventKind::Step,
            &LifecycleEvent::new(TourEventKind::Step, step, Some(0)),
        )?;
        Ok(())
    }

    /// Deactivate. Emits exactly one `stop` carrying the pre-stop step and
    /// index, then clears the cursor. Safe to call when already inactive.
    pub fn stop(&mut self) -> Result<()> {
        let event = LifecycleEvent::new(
            TourEventKind::Stop,
            self.current_step().cloned(),
            self.cursor,
        );
        self.observable.fire(TourEventKind::Stop, &event)?;
        self.cursor = None;
        Ok(())
    }

    /// Advance the cursor. Silent no-op (no event) when inactive or already
    /// at the last step.
    pub fn next(&mut self) -> Result<()> {
        let Some(index) = self.cursor else {
            return Ok(());
        };
        if !self.has_next() {
            return Ok(());
        }
        self.move_cursor(index, index + 1)
    }

    /// Move the cursor back. Silent no-op when inactive or at the first step.
    pub fn prev(&mut self) -> Result<()> {
        let Some(index) = self.cursor else {
            return Ok(());
        };
        if !self.has_prev() {
            return Ok(());
        }
        self.move_cursor(index, index - 1)
    }

    /// Centralized "forward gesture": `next` while more steps remain, `stop`
    /// at the last step. Keyboard handler and popup buttons both route
    /// through here so the decision cannot diverge between consumers.
    pub fn advance(&mut self) -> Result<()> {
        if self.has_next() { self.next() } else { self.stop() }
    }

    /// Centralized "backward gesture": `prev` or, at the first step, `stop`.
    pub fn retreat(&mut self) -> Result<()> {
        if self.has_prev() { self.prev() } else { self.stop() }
    }

    pub fn has_next(&self) -> bool {
        self.steps.len() > self.cursor.map_or(0, |i| i + 1)
    }

    pub fn has_prev(&self) -> bool {
        self.cursor.is_some_and(|i| i > 0)
    }

    /// Re-emit `step` for the current position without moving the cursor.
    /// Used by the resize path to re-run placement; no-op when inactive so a
    /// stale debounced recomputation cannot resurrect a stopped tour.
    pub fn refresh(&self) -> Result<()> {
        let Some(index) = self.cursor else {
            return Ok(());
        };
        let step = self.steps.get(index).cloned();
        let mut event = LifecycleEvent::new(TourEventKind::Step, step.clone(), Some(index));
        event.last_step = step;
        event.last_index = Some(index);
        self.observable.fire(TourEventKind::Step, &event)
    }

    pub fn on(
        &self,
        kind: TourEventKind,
        handler: impl FnMut(&LifecycleEvent) + 'static,
    ) -> Result<ModelBinding> {
        self.observable.on(kind, handler)
    }

    pub fn off(&self, kind: TourEventKind) -> Result<()> {
        self.observable.off(kind, None)
    }

    /// Release all subscriptions. The model owns no other resources.
    pub fn destroy(self) {
        self.observable.destroy();
    }

    fn move_cursor(&mut self, from: usize, to: usize) -> Result<()> {
        let last_step = self.steps.get(from).cloned();
        self.cursor = Some(to);
        let mut event = LifecycleEvent::new(
            TourEventKind::Step,
            self.steps.get(to).cloned(),
            Some(to),
        );
        event.last_step = last_step;
        event.last_index = Some(from);
        self.observable.fire(TourEventKind::Step, &event)
    }
}
