//! Host surface abstraction.
//!
//! The engine never touches a real document; the host implements [`Stage`]
//! to answer "what is the viewport" and "which nodes does this selector
//! match" at call time. [`StaticStage`] is the in-crate implementation for
//! tests, demos, and hosts that push layout themselves.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::geometry::{Size, TargetNode};

pub trait Stage {
    /// Current viewport; re-read on every placement so reflows are honored.
    fn viewport(&self) -> Size;

    /// Nodes matched by a selector. `None` when nothing matches — the
    /// missing-target signal every consumer must handle by skipping.
    fn resolve(&self, selector: &str) -> Option<Vec<TargetNode>>;
}

pub type SharedStage = Rc<dyn Stage>;

/// Interior-mutable stage backed by a selector map, so the host can update
/// boxes through a shared handle while renderers read through `&self`.
pub struct StaticStage {
    viewport: Cell<Size>,
    targets: RefCell<HashMap<String, Vec<TargetNode>>>,
}

impl StaticStage {
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport: Cell::new(viewport),
            targets: RefCell::new(HashMap::new()),
        }
    }

    pub fn set_viewport(&self, viewport: Size) {
        self.viewport.set(viewport);
    }

    pub fn register(&self, selector: impl Into<String>, nodes: Vec<TargetNode>) {
        self.targets.borrow_mut().insert(selector.into(), nodes);
    }

    pub fn unregister(&self, selector: &str) {
        self.targets.borrow_mut().remove(selector);
    }

    pub fn clear(&self) {
        self.targets.borrow_mut().clear();
    }
}

impl Stage for StaticStage {
    fn viewport(&self) -> Size {
        self.viewport.get()
    }

    fn resolve(&self, selector: &str) -> Option<Vec<TargetNode>> {
        let targets = self.targets.borrow();
        let nodes = targets.get(selector)?;
        if nodes.is_empty() {
            return None;
        }
        Some(nodes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Bounds;

    #[test]
    fn resolve_misses_unknown_and_empty_selectors() {
        let stage = StaticStage::new(Size::new(800.0, 600.0));
        assert!(stage.resolve(".missing").is_none());
        stage.register(".empty", Vec::new());
        assert!(stage.resolve(".empty").is_none());
    }

    #[test]
    fn registered_nodes_round_trip() {
        let stage = StaticStage::new(Size::new(800.0, 600.0));
        stage.register(
            ".menu",
            vec![TargetNode::element(Bounds::new(10.0, 20.0, 30.0, 40.0))],
        );
        let nodes = stage.resolve(".menu").unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].bounds.left, 20.0);

        stage.unregister(".menu");
        assert!(stage.resolve(".menu").is_none());
    }

    #[test]
    fn viewport_updates_are_visible_through_the_trait() {
        let stage = StaticStage::new(Size::new(800.0, 600.0));
        stage.set_viewport(Size::new(1024.0, 768.0));
        let viewport = Stage::viewport(&stage);
        assert_eq!(viewport.width, 1024.0);
    }
}
