//! Vector-scene contract.
//!
//! Actual drawing is an external collaborator: the renderers emit typed
//! commands and the host's [`Scene`] implementation maps them onto its SVG,
//! canvas, or terminal backend. [`RecordingScene`] captures the command
//! stream for tests and replay.

use std::cell::RefCell;
use std::rc::Rc;

use crate::geometry::{Bounds, Size};
use crate::resolver::Quadrant;
use crate::width::display_width;

/// Popup content for one step, fully resolved against the tour options.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowContent {
    pub title: String,
    pub body: String,
    pub next_label: String,
    pub prev_visible: bool,
    pub class_name: Option<String>,
    pub width: f64,
}

impl WindowContent {
    /// Stable digest used to skip re-issuing unchanged content.
    pub fn digest(&self) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        for part in [
            self.title.as_str(),
            self.body.as_str(),
            self.next_label.as_str(),
            self.class_name.as_deref().unwrap_or(""),
        ] {
            hasher.update(part.as_bytes());
            hasher.update(&[0]);
        }
        hasher.update(&[self.prev_visible as u8]);
        hasher.update(&self.width.to_bits().to_le_bytes());
        hasher.finalize()
    }
}

/// Commands the renderers emit. Durations are hints for hosts that animate;
/// hosts without transitions apply the final value directly.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneCommand {
    ShowMask { fill_color: String, fill_opacity: f64 },
    HideMask,
    ClearCutouts,
    CutoutRect { bounds: Bounds, stroke_width: f64 },
    CutoutCircle { cx: f64, cy: f64, radius: f64 },
    ShowArrow,
    HideArrow,
    MoveArrow { quadrant: Quadrant, top: f64, left: f64 },
    ShowWindow,
    HideWindow,
    SetWindowContent { content: WindowContent },
    MoveWindow { top: f64, left: f64, constrained: bool, centered: bool },
    SetProgressSteps { count: usize, step_width: f64 },
    SetProgressWidth { width: f64, duration_ms: u64 },
    HideProgress,
}

pub trait Scene {
    fn apply(&mut self, command: SceneCommand);

    /// Measure the popup box for the given content at the given width.
    /// Hosts with real text metrics should override; the default estimates
    /// from display width and greedy wrapping.
    fn measure_window(&self, content: &WindowContent, width: f64) -> Size {
        default_window_measure(content, width)
    }
}

pub type SharedScene = Rc<RefCell<dyn Scene>>;

const APPROX_GLYPH_WIDTH: f64 = 8.0;
const LINE_HEIGHT: f64 = 20.0;
const TITLE_HEIGHT: f64 = 28.0;
const BUTTON_ROW_HEIGHT: f64 = 36.0;
const WINDOW_PADDING: f64 = 16.0;

/// Estimate popup height: title row, greedily wrapped body lines, button
/// row, padding on both ends.
pub fn default_window_measure(content: &WindowContent, width: f64) -> Size {
    let usable = (width - WINDOW_PADDING * 2.0).max(APPROX_GLYPH_WIDTH);
    let columns = (usable / APPROX_GLYPH_WIDTH).max(1.0) as usize;
    let lines = wrapped_line_count(&content.body, columns);
    let height = WINDOW_PADDING * 2.0
        + TITLE_HEIGHT
        + lines as f64 * LINE_HEIGHT
        + BUTTON_ROW_HEIGHT;
    Size::new(width, height)
}

fn wrapped_line_count(text: &str, columns: usize) -> usize {
    let mut lines = 0usize;
    for raw in text.split('\n') {
        if raw.is_empty() {
            lines += 1;
            continue;
        }
        let mut current = 0usize;
        let mut line_used = false;
        for word in raw.split_whitespace() {
            let word_width = display_width(word);
            let needed = if current == 0 { word_width } else { word_width + 1 };
            if current + needed > columns && current > 0 {
                lines += 1;
                current = word_width.min(columns);
            } else {
                current += needed;
            }
            line_used = true;
        }
        if line_used || current > 0 {
            lines += 1;
        }
    }
    lines.max(1)
}

/// Records every applied command, in order.
#[derive(Default)]
pub struct RecordingScene {
    commands: Vec<SceneCommand>,
}

impl RecordingScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Rc<RefCell<RecordingScene>> {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn commands(&self) -> &[SceneCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<SceneCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl Scene for RecordingScene {
    fn apply(&mut self, command: SceneCommand) {
        self.commands.push(command);
    }
}
