//! Tour coordinator: wires the model, renderers, key handler, and resize
//! debouncer together and re-emits lifecycle events to the host.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::event::KeyEvent;
use serde_json::json;

use crate::config::TourOptions;
use crate::error::Result;
use crate::geometry::Size;
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::MetricSnapshot;
use crate::model::{LifecycleEvent, ModelBinding, Step, TourEventKind, TourModel};
use crate::observable::{Binding, EventKind, Observable};
use crate::render::{
    ArrowRenderer, MaskRenderer, ProgressRenderer, SharedMetrics, WindowDefaults, WindowRenderer,
};
use crate::scene::SharedScene;
use crate::stage::SharedStage;

pub mod keys;
pub mod resize;

use keys::{Gesture, KeyGestureHandler};
use resize::ResizeDebouncer;

const LOG_TARGET: &str = "tour::runtime";

/// Events the coordinator re-emits to the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TourEvent {
    Start,
    Step,
    Stop,
    CloseClick,
}

impl EventKind for TourEvent {
    fn as_str(&self) -> &'static str {
        match self {
            TourEvent::Start => "start",
            TourEvent::Step => "step",
            TourEvent::Stop => "stop",
            TourEvent::CloseClick => "close_click",
        }
    }
}

/// Popup button presses reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowAction {
    Next,
    Prev,
    Close,
}

pub type TourBinding = Binding<TourEvent, LifecycleEvent>;

/// Runtime knobs that are not display options.
#[derive(Clone, Default)]
pub struct TourConfig {
    pub logger: Option<Logger>,
    pub metrics: Option<SharedMetrics>,
}

impl TourConfig {
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(SharedMetrics::default());
        }
    }

    pub fn metrics_handle(&self) -> Option<SharedMetrics> {
        self.metrics.clone()
    }
}

/// Facade owning one tour instance end to end.
pub struct Tour {
    options: TourOptions,
    model: TourModel,
    observable: Observable<TourEvent, LifecycleEvent>,
    mask: MaskRenderer,
    arrow: ArrowRenderer,
    window: WindowRenderer,
    progress: ProgressRenderer,
    keys: KeyGestureHandler,
    debouncer: ResizeDebouncer,
    step_count: Rc<Cell<usize>>,
    forward_bindings: Vec<ModelBinding>,
    config: TourConfig,
    constructed_at: Instant,
}

impl Tour {
    pub fn new(options: TourOptions, stage: SharedStage, scene: SharedScene) -> Result<Self> {
        Self::with_config(options, stage, scene, TourConfig::default())
    }

    pub fn with_config(
        options: TourOptions,
        stage: SharedStage,
        scene: SharedScene,
        config: TourConfig,
    ) -> Result<Self> {
        let model = TourModel::new(options.steps.clone());
        let observable = Observable::new(
            "tour::runtime",
            &[
                TourEvent::Start,
                TourEvent::Step,
                TourEvent::Stop,
                TourEvent::CloseClick,
            ],
        );

        // Host-facing re-emission and diagnostics register first so outer
        // observers see each transition before the renderers act on it.
        let mut forward_bindings = Vec::new();
        for (model_kind, tour_kind) in [
            (TourEventKind::Start, TourEvent::Start),
            (TourEventKind::Step, TourEvent::Step),
            (TourEventKind::Stop, TourEvent::Stop),
        ] {
            let observable = observable.clone();
            let logger = config.logger.clone();
            let metrics = config.metrics.clone();
            forward_bindings.push(model.on(model_kind, move |event: &LifecycleEvent| {
                log_lifecycle(logger.as_ref(), event);
                if event.kind == TourEventKind::Step {
                    if let Some(metrics) = metrics.as_ref() {
                        if let Ok(mut guard) = metrics.lock() {
                            guard.record_step();
                        }
                    }
                }
                let _ = observable.fire(tour_kind, event);
            })?);
        }

        let step_count = Rc::new(Cell::new(options.steps.len()));
        let mask = MaskRenderer::new(
            options.fill_color.clone(),
            options.fill_opacity,
            &model,
            Rc::clone(&scene),
            Rc::clone(&stage),
            config.metrics.clone(),
        )?;
        let arrow = ArrowRenderer::new(
            options.arrow_size,
            &model,
            Rc::clone(&scene),
            Rc::clone(&stage),
            config.metrics.clone(),
        )?;
        let window = WindowRenderer::new(
            WindowDefaults {
                next_label: options.next_label.clone(),
                class_name: options.window_class_name.clone(),
                width: options.window_width,
                arrow_size: options.arrow_size,
            },
            &model,
            Rc::clone(&scene),
            Rc::clone(&stage),
            config.metrics.clone(),
        )?;
        let progress = ProgressRenderer::new(
            options.window_width,
            options.animation_duration_ms,
            Rc::clone(&step_count),
            &model,
            Rc::clone(&scene),
        )?;
        let keys = KeyGestureHandler::new(&model)?;
        let debouncer = ResizeDebouncer::new(Duration::from_millis(options.resize_quiet_ms));

        Ok(Self {
            options,
            model,
            observable,
            mask,
            arrow,
            window,
            progress,
            keys,
            debouncer,
            step_count,
            forward_bindings,
            config,
            constructed_at: Instant::now(),
        })
    }

    pub fn options(&self) -> &TourOptions {
        &self.options
    }

    /// Start the tour, optionally replacing the step list for this run.
    pub fn start(&mut self, steps: Option<Vec<Step>>) -> Result<()> {
        match &steps {
            Some(list) => self.step_count.set(list.len()),
            None => self.step_count.set(self.model.get_steps().len()),
        }
        self.model.start(steps)
    }

    pub fn stop(&mut self) -> Result<()> {
        self.model.stop()
    }

    pub fn next(&mut self) -> Result<()> {
        self.model.next()
    }

    pub fn prev(&mut self) -> Result<()> {
        self.model.prev()
    }

    pub fn advance(&mut self) -> Result<()> {
        self.model.advance()
    }

    pub fn retreat(&mut self) -> Result<()> {
        self.model.retreat()
    }

    pub fn has_next(&self) -> bool {
        self.model.has_next()
    }

    pub fn has_prev(&self) -> bool {
        self.model.has_prev()
    }

    pub fn get_steps(&self) -> &[Step] {
        self.model.get_steps()
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.model.current_step()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.model.current_index()
    }

    pub fn is_active(&self) -> bool {
        self.model.is_active()
    }

    pub fn on(
        &self,
        kind: TourEvent,
        handler: impl FnMut(&LifecycleEvent) + 'static,
    ) -> Result<TourBinding> {
        self.observable.on(kind, handler)
    }

    /// Route a host key event through the gesture handler. Keys outside an
    /// active tour are ignored.
    pub fn handle_key(&mut self, key: &KeyEvent) -> Result<()> {
        match self.keys.gesture_for(key) {
            Some(Gesture::Forward) => self.model.advance(),
            Some(Gesture::Backward) => self.model.retreat(),
            Some(Gesture::Dismiss) => self.model.stop(),
            None => Ok(()),
        }
    }

    /// Route a popup button press reported by the host.
    pub fn notify_window_action(&mut self, action: WindowAction) -> Result<()> {
        match action {
            WindowAction::Next => self.model.advance(),
            WindowAction::Prev => self.model.retreat(),
            WindowAction::Close => {
                // A close leads directly to a stop, so the payload reuses
                // the stop kind and carries the step being dismissed.
                let event = LifecycleEvent {
                    kind: TourEventKind::Stop,
                    step: self.model.current_step().cloned(),
                    index: self.model.current_index(),
                    last_step: None,
                    last_index: None,
                };
                self.observable.fire(TourEvent::CloseClick, &event)?;
                self.model.stop()
            }
        }
    }

    /// Record a viewport resize. Re-placement happens on a later [`tick`]
    /// once the burst has quieted; the host is expected to have refreshed
    /// its stage by then.
    pub fn notify_resize(&mut self, size: Size) {
        self.debouncer.notify(size, Instant::now());
    }

    /// Pump the debouncer. A fired resize re-places the current step through
    /// the normal step pipeline without moving the model cursor; a resize
    /// that fires after the tour stopped or advanced past its trigger is
    /// discarded.
    pub fn tick(&mut self) -> Result<()> {
        let Some(size) = self.debouncer.poll(Instant::now()) else {
            return Ok(());
        };
        if !self.model.is_active() {
            self.log(
                LogLevel::Debug,
                "resize_discarded",
                [json_kv("width", json!(size.width)), json_kv("height", json!(size.height))],
            );
            return Ok(());
        }
        self.log(
            LogLevel::Info,
            "resize_applied",
            [json_kv("width", json!(size.width)), json_kv("height", json!(size.height))],
        );
        self.model.refresh()
    }

    pub fn snapshot_metrics(&self) -> Option<MetricSnapshot> {
        let metrics = self.config.metrics.as_ref()?;
        let guard = metrics.lock().ok()?;
        Some(guard.snapshot(self.constructed_at.elapsed()))
    }

    /// Tear everything down: renderers first, then the key handler, then the
    /// model and its event storage. Each part releases only its own
    /// bindings.
    pub fn destroy(self) {
        self.mask.destroy();
        self.arrow.destroy();
        self.window.destroy();
        self.progress.destroy();
        self.keys.destroy();
        for binding in &self.forward_bindings {
            binding.dispose();
        }
        self.observable.destroy();
        self.model.destroy();
    }

    fn log(
        &self,
        level: LogLevel,
        message: &str,
        fields: impl IntoIterator<Item = (String, serde_json::Value)>,
    ) {
        if let Some(logger) = self.config.logger.as_ref() {
            let _ = logger.log_event(event_with_fields(level, LOG_TARGET, message, fields));
        }
    }
}

fn log_lifecycle(logger: Option<&Logger>, event: &LifecycleEvent) {
    let Some(logger) = logger else {
        return;
    };
    let (message, fields) = match event.kind {
        TourEventKind::Start => (
            "tour_started",
            vec![json_kv("index", json!(event.index))],
        ),
        TourEventKind::Step => (
            "step_changed",
            vec![
                json_kv("index", json!(event.index)),
                json_kv("last_index", json!(event.last_index)),
            ],
        ),
        TourEventKind::Stop => (
            "tour_stopped",
            vec![json_kv("index", json!(event.index))],
        ),
    };
    let _ = logger.log_event(event_with_fields(LogLevel::Info, LOG_TARGET, message, fields));
}
