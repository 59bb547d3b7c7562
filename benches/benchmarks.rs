//! Benchmarks for the page view engine

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use page_view::layout::measure_blocks;
use page_view::render::html::render_document;
use page_view::{
    compute_pages, resolve, BlockKind, Document, PageSettings, PageView, SyntheticMeasurer,
    ViewMode,
};

/// Document of `count` blocks with a manual break every 50 blocks
fn large_document(count: usize) -> (Document, SyntheticMeasurer) {
    let mut document = Document::new("Conclusions");
    let mut heights = Vec::with_capacity(count);
    for i in 0..count {
        if i % 50 == 49 {
            document.push_block(BlockKind::PageBreak);
            heights.push(20.0);
        } else {
            document.push_block(BlockKind::paragraph(&format!(
                "Paragraph {} contains enough text to span several lines of a page.",
                i
            )));
            heights.push(40.0 + (i % 7) as f32 * 12.0);
        }
    }
    (document, SyntheticMeasurer::new(heights))
}

fn bench_compute_pages(c: &mut Criterion) {
    let (document, measurer) = large_document(5000);
    let usable = PageSettings::default().usable_height();

    c.bench_function("compute_pages_5000_blocks", |b| {
        b.iter(|| {
            let blocks = measure_blocks(&measurer, &document).unwrap_or_default();
            black_box(compute_pages(&blocks, &document.manual_breaks(), usable));
        });
    });
}

fn bench_build_frames(c: &mut Criterion) {
    let settings = PageSettings {
        view_mode: ViewMode::Page,
        ..PageSettings::default()
    };
    let (document, measurer) = large_document(2000);
    let mut view = PageView::with_document(settings, document);
    view.on_resize(1600.0, 900.0);
    view.on_animation_frame(0.0, &measurer);

    c.bench_function("build_frames", |b| {
        b.iter(|| {
            black_box(view.frames());
        });
    });
}

fn bench_resolve_template(c: &mut Criterion) {
    c.bench_function("resolve_template", |b| {
        b.iter(|| {
            black_box(resolve(
                black_box("{{document.title}} - Page {{page.current}} / {{page.total}} - {{date.format(\"DD/MM/YYYY\")}}"),
                12,
                40,
                "Conclusions",
            ));
        });
    });
}

fn bench_render_mirror(c: &mut Criterion) {
    let (document, _) = large_document(500);

    c.bench_function("render_mirror_500_blocks", |b| {
        b.iter(|| {
            black_box(render_document(&document));
        });
    });
}

fn bench_scroll_frames(c: &mut Criterion) {
    c.bench_function("navigate_and_animate", |b| {
        let settings = PageSettings {
            view_mode: ViewMode::Continuous,
            ..PageSettings::default()
        };
        let (document, measurer) = large_document(1000);
        let mut view = PageView::with_document(settings, document);
        view.on_resize(1200.0, 900.0);
        view.on_animation_frame(0.0, &measurer);
        let mut now = 1.0;

        b.iter(|| {
            let target = view.navigate_to_page(black_box(7), now);
            for _ in 0..20 {
                now += 16.0;
                black_box(view.on_animation_frame(now, &measurer));
            }
            view.navigate_to_page(0, now);
            black_box(target);
        });
    });
}

criterion_group!(
    benches,
    bench_compute_pages,
    bench_build_frames,
    bench_resolve_template,
    bench_render_mirror,
    bench_scroll_frames,
);

criterion_main!(benches);
