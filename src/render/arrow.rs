use std::rc::Rc;

use crate::error::Result;
use crate::geometry::{Bounds, Size, target_box};
use crate::model::{LifecycleEvent, ModelBinding, TourEventKind, TourModel};
use crate::resolver::arrow_placement;
use crate::scene::{SceneCommand, SharedScene};
use crate::stage::SharedStage;

use super::{SharedMetrics, record};

/// Points at the current step's target from the side the resolver picked.
pub struct ArrowRenderer {
    bindings: Vec<ModelBinding>,
}

impl ArrowRenderer {
    pub fn new(
        arrow_size: Size,
        model: &TourModel,
        scene: SharedScene,
        stage: SharedStage,
        metrics: Option<SharedMetrics>,
    ) -> Result<Self> {
        let mut bindings = Vec::new();
        let arrow_bounds = Bounds::from_size(arrow_size);

        let start_scene = Rc::clone(&scene);
        bindings.push(model.on(TourEventKind::Start, move |_| {
            start_scene.borrow_mut().apply(SceneCommand::ShowArrow);
        })?);

        let step_scene = Rc::clone(&scene);
        let step_stage = Rc::clone(&stage);
        bindings.push(model.on(TourEventKind::Step, move |event: &LifecycleEvent| {
            let Some(step) = event.step.as_ref() else {
                return;
            };
            let Some(selector) = step.selector.as_deref() else {
                step_scene.borrow_mut().apply(SceneCommand::HideArrow);
                return;
            };
            let Some(nodes) = step_stage.resolve(selector) else {
                record(&metrics, |m| m.record_missing_target());
                return;
            };
            let Some(target) = target_box(&nodes) else {
                record(&metrics, |m| m.record_missing_target());
                return;
            };
            let placement = arrow_placement(&target, &arrow_bounds, step_stage.viewport());
            record(&metrics, |m| m.record_placement());
            let mut scene = step_scene.borrow_mut();
            scene.apply(SceneCommand::ShowArrow);
            scene.apply(SceneCommand::MoveArrow {
                quadrant: placement.quadrant,
                top: placement.top,
                left: placement.left,
            });
        })?);

        let stop_scene = Rc::clone(&scene);
        bindings.push(model.on(TourEventKind::Stop, move |_| {
            stop_scene.borrow_mut().apply(SceneCommand::HideArrow);
        })?);

        Ok(Self { bindings })
    }

    pub fn destroy(self) {
        for binding in &self.bindings {
            binding.dispose();
        }
    }
}
