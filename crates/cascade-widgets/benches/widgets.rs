//! Benchmarks for the select widget's per-frame work.

use cascade_core::{Brick, RecordingCanvas, State, Theme, Widget};
use cascade_widgets::{row_visuals, trigger_visual, Select, SelectMessage, SelectState};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn open_state() -> SelectState {
    let mut state = SelectState::new(cascade_widgets::default_options());
    state.update(SelectMessage::Open);
    state.update(SelectMessage::Select(1));
    state
}

fn bench_row_visuals(c: &mut Criterion) {
    let state = open_state();
    let theme = Theme::default();

    c.bench_function("row_visuals_open", |b| {
        b.iter(|| row_visuals(black_box(&state), &theme))
    });
}

fn bench_trigger_visual(c: &mut Criterion) {
    let state = open_state();
    let theme = Theme::default();

    c.bench_function("trigger_visual_crossfade", |b| {
        b.iter(|| trigger_visual(black_box(&state), &theme, "Select a Laracon"))
    });
}

fn bench_open_animation(c: &mut Criterion) {
    c.bench_function("select_open_to_settled", |b| {
        b.iter(|| {
            let mut select = Select::new();
            select.open();
            let mut frames = 0;
            while select.is_animating() {
                select.advance(16);
                frames += 1;
            }
            black_box(frames)
        })
    });
}

fn bench_paint(c: &mut Criterion) {
    let mut select = Select::new().value("Denver, USA");
    select.open();
    select.advance(120);
    let mut canvas = RecordingCanvas::new();

    c.bench_function("select_paint_mid_animation", |b| {
        b.iter(|| {
            canvas.clear();
            select.paint(&mut canvas);
            black_box(canvas.command_count())
        })
    });
}

fn bench_to_html(c: &mut Criterion) {
    let select = Select::new().with_accessible_name("Laracon city");

    c.bench_function("select_to_html", |b| b.iter(|| black_box(select.to_html())));
}

criterion_group!(
    benches,
    bench_row_visuals,
    bench_trigger_visual,
    bench_open_animation,
    bench_paint,
    bench_to_html,
);
criterion_main!(benches);
