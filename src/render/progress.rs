use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::Result;
use crate::model::{LifecycleEvent, ModelBinding, TourEventKind, TourModel};
use crate::scene::{SceneCommand, SharedScene};

use super::ContentCache;

/// Step count shared between the coordinator and the renderers that need the
/// total; refreshed whenever `start` replaces the step list.
pub type SharedStepCount = Rc<Cell<usize>>;

/// Grows a bar across the popup width as the tour advances. Inert for
/// single-step tours.
pub struct ProgressRenderer {
    bindings: Vec<ModelBinding>,
}

impl ProgressRenderer {
    pub fn new(
        window_width: f64,
        animation_duration: u64,
        step_count: SharedStepCount,
        model: &TourModel,
        scene: SharedScene,
    ) -> Result<Self> {
        let mut bindings = Vec::new();
        let cache = Rc::new(RefCell::new(ContentCache::new()));

        let start_scene = Rc::clone(&scene);
        let start_count = Rc::clone(&step_count);
        let start_cache = Rc::clone(&cache);
        bindings.push(model.on(TourEventKind::Start, move |_| {
            let count = start_count.get();
            if count <= 1 {
                return;
            }
            start_cache.borrow_mut().reset();
            start_scene.borrow_mut().apply(SceneCommand::SetProgressSteps {
                count,
                step_width: window_width / count as f64,
            });
        })?);

        let step_scene = Rc::clone(&scene);
        let step_count_handle = Rc::clone(&step_count);
        let step_cache = Rc::clone(&cache);
        bindings.push(model.on(TourEventKind::Step, move |event: &LifecycleEvent| {
            let count = step_count_handle.get();
            if count <= 1 {
                return;
            }
            let Some(step) = event.step.as_ref() else {
                return;
            };
            if !step.show_progress {
                step_cache.borrow_mut().reset();
                step_scene.borrow_mut().apply(SceneCommand::HideProgress);
                return;
            }
            let index = event.index.unwrap_or(0);
            let width = window_width * (index + 1) as f64 / count as f64;
            if !step_cache
                .borrow_mut()
                .changed(blake3::hash(&width.to_bits().to_le_bytes()))
            {
                return;
            }
            step_scene.borrow_mut().apply(SceneCommand::SetProgressWidth {
                width,
                duration_ms: animation_duration,
            });
        })?);

        let stop_scene = Rc::clone(&scene);
        bindings.push(model.on(TourEventKind::Stop, move |_| {
            stop_scene.borrow_mut().apply(SceneCommand::HideProgress);
        })?);

        Ok(Self { bindings })
    }

    pub fn destroy(self) {
        for binding in &self.bindings {
            binding.dispose();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Step;
    use crate::scene::RecordingScene;

    fn steps(n: usize) -> Vec<Step> {
        (0..n)
            .map(|i| Step::unanchored(format!("Step {i}")))
            .collect()
    }

    fn renderer(model: &TourModel, scene: crate::scene::SharedScene, n: usize) -> ProgressRenderer {
        ProgressRenderer::new(400.0, 200, Rc::new(Cell::new(n)), model, scene).unwrap()
    }

    #[test]
    fn progress_advances_proportionally() {
        let scene = RecordingScene::shared();
        let mut model = TourModel::new(steps(4));
        let _progress = renderer(&model, scene.clone(), 4);

        model.start(None).unwrap();
        model.next().unwrap();
        let commands = scene.borrow_mut().take_commands();
        assert_eq!(
            commands[0],
            SceneCommand::SetProgressSteps {
                count: 4,
                step_width: 100.0
            }
        );
        assert_eq!(
            commands[1],
            SceneCommand::SetProgressWidth {
                width: 100.0,
                duration_ms: 200
            }
        );
        assert_eq!(
            commands[2],
            SceneCommand::SetProgressWidth {
                width: 200.0,
                duration_ms: 200
            }
        );
    }

    #[test]
    fn single_step_tours_emit_nothing() {
        let scene = RecordingScene::shared();
        let mut model = TourModel::new(steps(1));
        let _progress = renderer(&model, scene.clone(), 1);
        model.start(None).unwrap();
        assert!(scene.borrow().commands().is_empty());
    }

    #[test]
    fn per_step_opt_out_hides_the_bar() {
        let scene = RecordingScene::shared();
        let mut list = steps(3);
        list[1].show_progress = false;
        let mut model = TourModel::new(list);
        let _progress = renderer(&model, scene.clone(), 3);

        model.start(None).unwrap();
        model.next().unwrap();
        let commands = scene.borrow_mut().take_commands();
        assert_eq!(commands.last(), Some(&SceneCommand::HideProgress));

        // Returning to a visible step re-emits the width.
        model.next().unwrap();
        let commands = scene.borrow_mut().take_commands();
        assert!(matches!(
            commands.last(),
            Some(SceneCommand::SetProgressWidth { width, .. }) if *width == 400.0
        ));
    }

    #[test]
    fn refresh_does_not_re_emit_an_unchanged_width() {
        let scene = RecordingScene::shared();
        let mut model = TourModel::new(steps(3));
        let _progress = renderer(&model, scene.clone(), 3);
        model.start(None).unwrap();
        scene.borrow_mut().take_commands();
        model.refresh().unwrap();
        assert!(scene.borrow().commands().is_empty());
    }

    #[test]
    fn stop_hides_the_bar() {
        let scene = RecordingScene::shared();
        let mut model = TourModel::new(steps(2));
        let _progress = renderer(&model, scene.clone(), 2);
        model.start(None).unwrap();
        scene.borrow_mut().take_commands();
        model.stop().unwrap();
        assert_eq!(scene.borrow().commands(), &[SceneCommand::HideProgress]);
    }
}
