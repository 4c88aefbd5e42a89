//! Guided-tour overlay engine.
//!
//! Walks a user through an ordered list of steps, dimming the page behind a
//! mask, spotlighting the current step's target, pointing an arrow at it, and
//! placing an instructional popup that never leaves the viewport. The host
//! supplies the document surface (a [`Stage`]) and the drawing backend (a
//! [`Scene`]); everything in between — the step state machine, the placement
//! geometry, and the lifecycle event bus — lives here.

pub mod config;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod observable;
pub mod render;
pub mod resolver;
pub mod runtime;
pub mod scene;
pub mod stage;
pub mod width;

pub use config::{
    DEFAULT_ANIMATION_DURATION_MS, DEFAULT_ARROW_SIZE, DEFAULT_FILL_COLOR, DEFAULT_FILL_OPACITY,
    DEFAULT_NEXT_LABEL, DEFAULT_RESIZE_QUIET_MS, DEFAULT_WINDOW_WIDTH, TourOptions,
};
pub use error::{Result, TourError};
pub use geometry::{Bounds, NodeKind, Size, TargetNode, multi_box, node_box, target_box};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink, event_with_fields, json_kv, json_str,
};
pub use metrics::{MetricSnapshot, TourMetrics};
pub use model::{
    LifecycleEvent, ModelBinding, ShapeKind, ShapeOptions, Step, TourEventKind, TourModel,
};
pub use observable::{Binding, EventKind, Observable};
pub use render::{
    ArrowRenderer, MaskRenderer, ProgressRenderer, SharedMetrics, SharedStepCount, WindowDefaults,
    WindowRenderer,
};
pub use resolver::{
    Placement, PlacementKind, Quadrant, SHORT_TARGET_HEIGHT, WINDOW_EDGE_MARGIN, arrow_placement,
    centered_window_position, resolve_placement, target_quadrant, window_placement,
};
pub use runtime::keys::{Gesture, KeyGestureHandler};
pub use runtime::resize::ResizeDebouncer;
pub use runtime::{Tour, TourBinding, TourConfig, TourEvent, WindowAction};
pub use scene::{
    RecordingScene, Scene, SceneCommand, SharedScene, WindowContent, default_window_measure,
};
pub use stage::{SharedStage, Stage, StaticStage};
pub use width::display_width;
