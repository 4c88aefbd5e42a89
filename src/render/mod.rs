//! Renderer set: mask/spotlight, pointer arrow, popup window, progress bar.
//!
//! Each renderer subscribes to the model's lifecycle events with its own
//! disposers and emits scene commands. A missing target always means "skip
//! this update and leave the previous visuals alone" — never a crash, never
//! a half-updated overlay.

mod arrow;
mod mask;
mod progress;
mod window;

pub use arrow::ArrowRenderer;
pub use mask::MaskRenderer;
pub use progress::{ProgressRenderer, SharedStepCount};
pub use window::{WindowDefaults, WindowRenderer};

use std::sync::{Arc, Mutex};

use crate::metrics::TourMetrics;

pub type SharedMetrics = Arc<Mutex<TourMetrics>>;

pub(crate) fn record(metrics: &Option<SharedMetrics>, apply: impl FnOnce(&mut TourMetrics)) {
    if let Some(metrics) = metrics.as_ref() {
        if let Ok(mut guard) = metrics.lock() {
            apply(&mut guard);
        }
    }
}

/// Remembers the blake3 digest of the last payload a renderer pushed so
/// unchanged content is not re-issued on re-placement.
#[derive(Default)]
pub(crate) struct ContentCache {
    hash: Option<blake3::Hash>,
}

impl ContentCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn changed(&mut self, hash: blake3::Hash) -> bool {
        if self.hash == Some(hash) {
            return false;
        }
        self.hash = Some(hash);
        true
    }

    pub(crate) fn reset(&mut self) {
        self.hash = None;
    }
}
