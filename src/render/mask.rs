use std::rc::Rc;

use crate::geometry::{Bounds, TargetNode};
use crate::model::{LifecycleEvent, ModelBinding, ShapeKind, ShapeOptions, TourEventKind, TourModel};
use crate::scene::{SceneCommand, SharedScene};
use crate::stage::SharedStage;
use crate::error::Result;

use super::{SharedMetrics, record};

/// Dims the page and cuts a spotlight out of the mask at the current step's
/// target nodes.
pub struct MaskRenderer {
    bindings: Vec<ModelBinding>,
}

impl MaskRenderer {
    pub fn new(
        fill_color: String,
        fill_opacity: f64,
        model: &TourModel,
        scene: SharedScene,
        stage: SharedStage,
        metrics: Option<SharedMetrics>,
    ) -> Result<Self> {
        let mut bindings = Vec::new();

        let start_scene = Rc::clone(&scene);
        bindings.push(model.on(TourEventKind::Start, move |_| {
            start_scene.borrow_mut().apply(SceneCommand::ShowMask {
                fill_color: fill_color.clone(),
                fill_opacity,
            });
        })?);

        let step_scene = Rc::clone(&scene);
        let step_stage = Rc::clone(&stage);
        bindings.push(model.on(TourEventKind::Step, move |event: &LifecycleEvent| {
            let Some(step) = event.step.as_ref() else {
                return;
            };
            match step.selector.as_deref() {
                // Unanchored step: dim everything, no spotlight.
                None => {
                    step_scene.borrow_mut().apply(SceneCommand::ClearCutouts);
                }
                Some(selector) => {
                    let Some(nodes) = step_stage.resolve(selector) else {
                        record(&metrics, |m| m.record_missing_target());
                        return;
                    };
                    let mut scene = step_scene.borrow_mut();
                    scene.apply(SceneCommand::ClearCutouts);
                    for node in &nodes {
                        scene.apply(cutout_for(node, step.shape.as_ref()));
                    }
                }
            }
        })?);

        let stop_scene = Rc::clone(&scene);
        bindings.push(model.on(TourEventKind::Stop, move |_| {
            stop_scene.borrow_mut().apply(SceneCommand::HideMask);
        })?);

        Ok(Self { bindings })
    }

    pub fn destroy(self) {
        for binding in &self.bindings {
            binding.dispose();
        }
    }
}

/// Build the cutout command for one node, honoring the step's shape
/// override.
fn cutout_for(node: &TargetNode, shape: Option<&ShapeOptions>) -> SceneCommand {
    let base = node.bounds;
    let Some(shape) = shape else {
        return SceneCommand::CutoutRect {
            bounds: base,
            stroke_width: 0.0,
        };
    };

    let (dx, dy) = shape.offset;
    match shape.kind {
        ShapeKind::Rectangle => SceneCommand::CutoutRect {
            bounds: Bounds::new(
                base.top + dy,
                base.left + dx,
                shape.width.unwrap_or(base.width),
                shape.height.unwrap_or(base.height),
            ),
            stroke_width: shape.stroke_width,
        },
        ShapeKind::Circle => SceneCommand::CutoutCircle {
            cx: base.left + base.width * 0.5 + dx,
            cy: base.top + base.height * 0.5 + dy,
            radius: shape.radius.unwrap_or(base.width * 0.5),
        },
    }
}
