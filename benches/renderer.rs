use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use napkin_diagrams::fallback::{customize_for_style, fallback_data};
use napkin_diagrams::layout::compute_layout;
use napkin_diagrams::normalize::normalize;
use napkin_diagrams::{DiagramKind, Theme, VariationStyle, render_svg};
use serde_json::{Value, json};
use std::hint::black_box;

const TOPIC: &str = "neighborhood bike repair shop";

/// Wide inputs that stress the fixed-formula engines past their usual sizes.
fn dense_input(kind: DiagramKind, count: usize) -> Value {
    match kind {
        DiagramKind::Flowchart => {
            let steps: serde_json::Map<String, Value> = (0..count)
                .map(|i| (format!("Step {i}"), json!([format!("Do part {i}")])))
                .collect();
            json!({ "steps": steps })
        }
        DiagramKind::Network => {
            let nodes: serde_json::Map<String, Value> = (0..count)
                .map(|i| (format!("Host {i}"), json!("Server")))
                .collect();
            let connections: Vec<Value> = (1..count)
                .map(|i| json!({ "from": format!("Host {}", i - 1), "to": format!("Host {i}"), "label": "link" }))
                .collect();
            json!({ "nodes": nodes, "connections": connections })
        }
        DiagramKind::Mindmap => {
            let branches: serde_json::Map<String, Value> = (0..count)
                .map(|i| (format!("Branch {i}"), json!([format!("Leaf {i}a"), format!("Leaf {i}b")])))
                .collect();
            json!({ "central_topic": "Topic", "branches": branches })
        }
        _ => Value::Null,
    }
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    for kind in DiagramKind::ALL {
        let data = fallback_data(kind, TOPIC);
        group.bench_with_input(BenchmarkId::from_parameter(kind.as_str()), &data, |b, data| {
            b.iter(|| {
                let layout = compute_layout(black_box(data)).expect("layout failed");
                black_box(layout.elements.len());
            });
        });
    }
    group.finish();
}

fn bench_layout_dense(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_dense");
    for kind in [DiagramKind::Flowchart, DiagramKind::Network, DiagramKind::Mindmap] {
        for count in [8usize, 24, 64] {
            let data = normalize(&dense_input(kind, count), kind).expect("normalize failed");
            group.bench_with_input(BenchmarkId::new(kind.as_str(), count), &data, |b, data| {
                b.iter(|| {
                    let layout = compute_layout(black_box(data)).expect("layout failed");
                    black_box(layout.elements.len());
                });
            });
        }
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_svg");
    for kind in DiagramKind::ALL {
        let theme = Theme::for_kind(kind);
        let layout = compute_layout(&fallback_data(kind, TOPIC)).expect("layout failed");
        group.bench_with_input(BenchmarkId::from_parameter(kind.as_str()), &layout, |b, layout| {
            b.iter(|| {
                let svg = render_svg(black_box(layout), &theme);
                black_box(svg.len());
            });
        });
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_to_end");
    for kind in DiagramKind::ALL {
        for style in VariationStyle::ALL {
            let theme = Theme::for_style(style);
            group.bench_function(BenchmarkId::new(kind.as_str(), style.as_str()), |b| {
                b.iter(|| {
                    let data = customize_for_style(fallback_data(kind, black_box(TOPIC)), style, TOPIC);
                    let layout = compute_layout(&data).expect("layout failed");
                    let svg = render_svg(&layout, &theme);
                    black_box(svg.len());
                });
            });
        }
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_layout,
    bench_layout_dense,
    bench_render,
    bench_end_to_end
);
criterion_main!(benches);
