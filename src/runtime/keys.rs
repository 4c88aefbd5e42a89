use std::cell::Cell;
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::error::Result;
use crate::model::{ModelBinding, TourEventKind, TourModel};

/// User intent extracted from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Forward,
    Backward,
    Dismiss,
}

/// Maps key presses onto tour gestures while a tour is running. Arms itself
/// on `start` and disarms on `stop`, so stray keys outside a tour are
/// ignored without the host having to track activity itself.
pub struct KeyGestureHandler {
    armed: Rc<Cell<bool>>,
    bindings: Vec<ModelBinding>,
}

impl KeyGestureHandler {
    pub fn new(model: &TourModel) -> Result<Self> {
        let armed = Rc::new(Cell::new(false));
        let mut bindings = Vec::new();

        let on_start = Rc::clone(&armed);
        bindings.push(model.on(TourEventKind::Start, move |_| on_start.set(true))?);
        let on_stop = Rc::clone(&armed);
        bindings.push(model.on(TourEventKind::Stop, move |_| on_stop.set(false))?);

        Ok(Self { armed, bindings })
    }

    pub fn is_armed(&self) -> bool {
        self.armed.get()
    }

    /// Gesture for a key event, or `None` when disarmed, for key releases,
    /// or for keys outside the vocabulary.
    pub fn gesture_for(&self, key: &KeyEvent) -> Option<Gesture> {
        if !self.armed.get() || key.kind != KeyEventKind::Press {
            return None;
        }
        match key.code {
            KeyCode::Right => Some(Gesture::Forward),
            KeyCode::Left => Some(Gesture::Backward),
            KeyCode::Esc | KeyCode::Backspace => Some(Gesture::Dismiss),
            _ => None,
        }
    }

    pub fn destroy(self) {
        for binding in &self.bindings {
            binding.dispose();
        }
    }
}
