use std::cell::RefCell;
use std::rc::Rc;

use crate::error::Result;
use crate::geometry::{Bounds, Size, target_box};
use crate::model::{LifecycleEvent, ModelBinding, Step, TourEventKind, TourModel};
use crate::resolver::{centered_window_position, window_placement};
use crate::scene::{SceneCommand, SharedScene, WindowContent};
use crate::stage::SharedStage;

use super::{ContentCache, SharedMetrics, record};

/// Defaults the window renderer resolves per-step overrides against.
#[derive(Debug, Clone)]
pub struct WindowDefaults {
    pub next_label: String,
    pub class_name: Option<String>,
    pub width: f64,
    pub arrow_size: Size,
}

/// Positions the instructional popup next to the target — or centered for
/// unanchored steps — re-issuing content only when it actually changed.
pub struct WindowRenderer {
    bindings: Vec<ModelBinding>,
}

impl WindowRenderer {
    pub fn new(
        defaults: WindowDefaults,
        model: &TourModel,
        scene: SharedScene,
        stage: SharedStage,
        metrics: Option<SharedMetrics>,
    ) -> Result<Self> {
        let mut bindings = Vec::new();
        let cache = Rc::new(RefCell::new(ContentCache::new()));

        let start_scene = Rc::clone(&scene);
        bindings.push(model.on(TourEventKind::Start, move |_| {
            start_scene.borrow_mut().apply(SceneCommand::ShowWindow);
        })?);

        let step_scene = Rc::clone(&scene);
        let step_stage = Rc::clone(&stage);
        let step_cache = Rc::clone(&cache);
        bindings.push(model.on(TourEventKind::Step, move |event: &LifecycleEvent| {
            let Some(step) = event.step.as_ref() else {
                return;
            };
            let content = resolve_content(step, event.index.unwrap_or(0), &defaults);
            let measured = step_scene
                .borrow()
                .measure_window(&content, content.width);
            let window_bounds = Bounds::from_size(measured);

            let placement = match step.selector.as_deref() {
                None => {
                    let (top, left) =
                        centered_window_position(&window_bounds, step_stage.viewport());
                    ResolvedWindow {
                        top,
                        left,
                        constrained: false,
                        centered: true,
                    }
                }
                Some(selector) => {
                    let Some(nodes) = step_stage.resolve(selector) else {
                        record(&metrics, |m| m.record_missing_target());
                        return;
                    };
                    let Some(target) = target_box(&nodes) else {
                        record(&metrics, |m| m.record_missing_target());
                        return;
                    };
                    let arrow_bounds = Bounds::from_size(defaults.arrow_size);
                    let placement = window_placement(
                        &target,
                        &window_bounds,
                        &arrow_bounds,
                        step_stage.viewport(),
                    );
                    record(&metrics, |m| m.record_placement());
                    ResolvedWindow {
                        top: placement.top,
                        left: placement.left,
                        constrained: placement.constrained,
                        centered: false,
                    }
                }
            };

            let mut scene = step_scene.borrow_mut();
            if step_cache.borrow_mut().changed(content.digest()) {
                scene.apply(SceneCommand::SetWindowContent { content });
            }
            scene.apply(SceneCommand::MoveWindow {
                top: placement.top,
                left: placement.left,
                constrained: placement.constrained,
                centered: placement.centered,
            });
        })?);

        let stop_scene = Rc::clone(&scene);
        bindings.push(model.on(TourEventKind::Stop, move |_| {
            stop_scene.borrow_mut().apply(SceneCommand::HideWindow);
        })?);

        Ok(Self { bindings })
    }

    pub fn destroy(self) {
        for binding in &self.bindings {
            binding.dispose();
        }
    }
}

struct ResolvedWindow {
    top: f64,
    left: f64,
    constrained: bool,
    centered: bool,
}

fn resolve_content(step: &Step, index: usize, defaults: &WindowDefaults) -> WindowContent {
    WindowContent {
        title: step.title.clone(),
        body: step.body.clone(),
        next_label: step
            .next_label
            .clone()
            .unwrap_or_else(|| defaults.next_label.clone()),
        prev_visible: index > 0,
        class_name: step.window_class.clone().or_else(|| defaults.class_name.clone()),
        width: step.window_width.unwrap_or(defaults.width),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::TargetNode;
    use crate::scene::RecordingScene;
    use crate::stage::StaticStage;

    fn defaults() -> WindowDefaults {
        WindowDefaults {
            next_label: "Next".to_string(),
            class_name: None,
            width: 400.0,
            arrow_size: Size::new(24.0, 24.0),
        }
    }

    fn stage_with_menu() -> Rc<StaticStage> {
        let stage = Rc::new(StaticStage::new(Size::new(1000.0, 800.0)));
        stage.register(
            ".menu",
            vec![TargetNode::element(Bounds::new(10.0, 10.0, 200.0, 100.0))],
        );
        stage
    }

    fn moves(commands: &[SceneCommand]) -> Vec<&SceneCommand> {
        commands
            .iter()
            .filter(|c| matches!(c, SceneCommand::MoveWindow { .. }))
            .collect()
    }

    #[test]
    fn anchored_step_places_window_past_the_arrow() {
        let scene = RecordingScene::shared();
        let mut model = TourModel::new(vec![Step::anchored(".menu", "Menu")]);
        let _window =
            WindowRenderer::new(defaults(), &model, scene.clone(), stage_with_menu(), None)
                .unwrap();
        model.start(None).unwrap();

        let commands = scene.borrow_mut().take_commands();
        let content = commands
            .iter()
            .find_map(|c| match c {
                SceneCommand::SetWindowContent { content } => Some(content),
                _ => None,
            })
            .expect("content emitted");
        assert_eq!(content.next_label, "Next");
        assert!(!content.prev_visible);

        match moves(&commands)[0] {
            SceneCommand::MoveWindow { left, centered, .. } => {
                assert_eq!(*left, 10.0 + 100.0 + 24.0);
                assert!(!centered);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn unanchored_step_is_centered() {
        let scene = RecordingScene::shared();
        let stage = Rc::new(StaticStage::new(Size::new(1000.0, 800.0)));
        let mut model = TourModel::new(vec![Step::unanchored("Welcome").with_body("Hi.")]);
        let _window = WindowRenderer::new(defaults(), &model, scene.clone(), stage, None).unwrap();
        model.start(None).unwrap();

        let commands = scene.borrow_mut().take_commands();
        match moves(&commands)[0] {
            SceneCommand::MoveWindow { left, centered, constrained, .. } => {
                assert_eq!(*left, 300.0);
                assert!(*centered);
                assert!(!constrained);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn unchanged_content_is_not_re_emitted_on_refresh() {
        let scene = RecordingScene::shared();
        let mut model = TourModel::new(vec![Step::anchored(".menu", "Menu")]);
        let _window =
            WindowRenderer::new(defaults(), &model, scene.clone(), stage_with_menu(), None)
                .unwrap();
        model.start(None).unwrap();
        scene.borrow_mut().take_commands();

        model.refresh().unwrap();
        let commands = scene.borrow_mut().take_commands();
        assert!(
            commands
                .iter()
                .all(|c| !matches!(c, SceneCommand::SetWindowContent { .. }))
        );
        assert_eq!(moves(&commands).len(), 1);
    }

    #[test]
    fn missing_target_skips_the_whole_update() {
        let scene = RecordingScene::shared();
        let stage = Rc::new(StaticStage::new(Size::new(1000.0, 800.0)));
        let mut model = TourModel::new(vec![Step::anchored(".gone", "Gone")]);
        let _window = WindowRenderer::new(defaults(), &model, scene.clone(), stage, None).unwrap();
        model.start(None).unwrap();

        let commands = scene.borrow_mut().take_commands();
        assert_eq!(commands, vec![SceneCommand::ShowWindow]);
    }

    #[test]
    fn per_step_overrides_flow_into_the_content() {
        let scene = RecordingScene::shared();
        let mut step = Step::anchored(".menu", "Menu");
        step.next_label = Some("Finish".to_string());
        step.window_width = Some(320.0);
        step.window_class = Some("fancy".to_string());
        let mut model = TourModel::new(vec![step]);
        let _window =
            WindowRenderer::new(defaults(), &model, scene.clone(), stage_with_menu(), None)
                .unwrap();
        model.start(None).unwrap();

        let commands = scene.borrow_mut().take_commands();
        let content = commands
            .iter()
            .find_map(|c| match c {
                SceneCommand::SetWindowContent { content } => Some(content),
                _ => None,
            })
            .unwrap();
        assert_eq!(content.next_label, "Finish");
        assert_eq!(content.width, 320.0);
        assert_eq!(content.class_name.as_deref(), Some("fancy"));
    }

    #[test]
    fn stop_hides_the_window() {
        let scene = RecordingScene::shared();
        let mut model = TourModel::new(vec![Step::anchored(".menu", "Menu")]);
        let _window =
            WindowRenderer::new(defaults(), &model, scene.clone(), stage_with_menu(), None)
                .unwrap();
        model.start(None).unwrap();
        scene.borrow_mut().take_commands();
        model.stop().unwrap();
        assert_eq!(scene.borrow().commands(), &[SceneCommand::HideWindow]);
    }
}
