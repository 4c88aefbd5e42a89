use std::rc::Rc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tourkit::{
    Bounds, RecordingScene, Result, Size, StaticStage, Step, TargetNode, Tour, TourOptions,
    arrow_placement, window_placement,
};

const VIEWPORT: Size = Size::new(1440.0, 900.0);

fn placement_sweep(c: &mut Criterion) {
    let arrow = Bounds::new(0.0, 0.0, 24.0, 24.0);
    let window = Bounds::new(0.0, 0.0, 400.0, 260.0);
    let targets: Vec<Bounds> = (0..64)
        .map(|i| {
            let col = (i % 8) as f64;
            let row = (i / 8) as f64;
            Bounds::new(row * 110.0, col * 170.0, 120.0, 40.0 + row * 10.0)
        })
        .collect();

    c.bench_function("placement_sweep", |b| {
        b.iter(|| {
            for target in &targets {
                let arrow_pos = arrow_placement(black_box(target), &arrow, VIEWPORT);
                let window_pos = window_placement(black_box(target), &window, &arrow, VIEWPORT);
                black_box((arrow_pos, window_pos));
            }
        });
    });
}

fn scripted_tour(c: &mut Criterion) {
    c.bench_function("scripted_tour", |b| {
        b.iter(|| {
            let mut tour = build_tour().expect("tour");
            tour.start(None).expect("start");
            while tour.has_next() {
                tour.next().expect("next");
            }
            tour.stop().expect("stop");
        });
    });
}

fn build_tour() -> Result<Tour> {
    let stage = Rc::new(StaticStage::new(VIEWPORT));
    let mut steps = Vec::new();
    for i in 0..16usize {
        let selector = format!("#anchor-{i}");
        let col = (i % 4) as f64;
        let row = (i / 4) as f64;
        stage.register(
            selector.clone(),
            vec![TargetNode::element(Bounds::new(
                row * 200.0,
                col * 320.0,
                140.0,
                60.0,
            ))],
        );
        steps.push(
            Step::anchored(selector, format!("Stop {i}"))
                .with_body("A short explanation of this part of the page."),
        );
    }
    let options = TourOptions::default().with_steps(steps);
    Tour::new(options, stage, RecordingScene::shared())
}

criterion_group!(benches, placement_sweep, scripted_tour);
criterion_main!(benches);
