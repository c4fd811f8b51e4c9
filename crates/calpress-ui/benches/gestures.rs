use calpress_actions::{ActionConfig, CardActionsConfig};
use calpress_foundation::{HoldTapConfig, HoldTapDetector, PointerEvent, PointerKind};
use calpress_testing::InteractionTestRule;
use calpress_ui_graphics::Point;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const MOVE_SAMPLES: &[usize] = &[4, 64];

fn card_config() -> CardActionsConfig {
    CardActionsConfig {
        entity: Some("calendar.family".into()),
        tap_action: ActionConfig::of_kind("more-info"),
        hold_action: ActionConfig {
            navigation_path: Some("/calendar".into()),
            ..ActionConfig::of_kind("navigate")
        },
        ..CardActionsConfig::default()
    }
}

fn bench_detector(c: &mut Criterion) {
    let mut group = c.benchmark_group("detector");
    for &moves in MOVE_SAMPLES {
        group.bench_with_input(BenchmarkId::new("moves", moves), &moves, |b, &moves| {
            let mut detector = HoldTapDetector::new(HoldTapConfig::default());
            b.iter(|| {
                let start = Point::new(40.0, 40.0);
                detector.on_pointer(&PointerEvent::down(1, start, PointerKind::Touch), 0);
                for step in 0..moves {
                    let offset = (step % 8) as f32;
                    let event = PointerEvent::moved(1, Point::new(40.0 + offset, 40.0));
                    black_box(detector.on_pointer(&event, step as u64));
                }
                black_box(detector.on_pointer(&PointerEvent::up(1, start), moves as u64))
            });
        });
    }
    group.finish();
}

fn bench_tap_to_settle(c: &mut Criterion) {
    c.bench_function("tap_to_settle", |b| {
        b.iter(|| {
            let rule = InteractionTestRule::new(card_config());
            rule.press_for(40.0, 40.0, 120);
            rule.settle();
            black_box(rule.host().calls().len())
        });
    });
}

fn bench_hold_to_settle(c: &mut Criterion) {
    c.bench_function("hold_to_settle", |b| {
        b.iter(|| {
            let rule = InteractionTestRule::new(card_config());
            rule.press_for(40.0, 40.0, 650);
            rule.settle();
            black_box(rule.host().location())
        });
    });
}

criterion_group!(gestures, bench_detector, bench_tap_to_settle, bench_hold_to_settle);
criterion_main!(gestures);
