use std::path::Path;

use napkin_diagrams::layout::{Layout, compute_layout};
use napkin_diagrams::normalize::normalize;
use napkin_diagrams::{DiagramKind, Theme, render_svg};
use rstest::rstest;

fn assert_valid_svg(svg: &str, fixture: &str) {
    assert!(svg.starts_with("<svg"), "{fixture}: missing <svg tag");
    assert!(svg.ends_with("</svg>"), "{fixture}: missing </svg tag");
}

fn fixture_layout(name: &str) -> Layout {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(format!("{name}.json"));
    let input = std::fs::read_to_string(&path).expect("fixture read failed");
    let raw: serde_json::Value = serde_json::from_str(&input).expect("fixture is not JSON");
    let kind = DiagramKind::resolve(name);
    let data = normalize(&raw, kind).expect("normalize failed");
    compute_layout(&data).expect("layout failed")
}

#[rstest]
#[case("flowchart", "step", 4)]
#[case("sequence", "actor", 3)]
#[case("sequence", "message", 3)]
#[case("state", "state", 4)]
#[case("mindmap", "branch", 5)]
#[case("swot", "quadrant", 4)]
#[case("timeline", "event-card", 4)]
#[case("gantt", "bar", 4)]
#[case("journey", "touchpoint", 4)]
#[case("erd", "entity", 4)]
#[case("erd", "relationship", 3)]
#[case("class", "class-box", 4)]
#[case("network", "node", 4)]
#[case("network", "connection", 3)]
#[case("architecture", "component", 5)]
#[case("architecture", "relationship", 4)]
fn fixture_element_counts(#[case] fixture: &str, #[case] class: &str, #[case] expected: usize) {
    let layout = fixture_layout(fixture);
    assert_eq!(layout.count_class(class), expected, "{fixture}: `{class}` count");
}

#[test]
fn render_all_fixtures() {
    // Keep this list explicit so new diagram types must be added intentionally.
    let candidates = [
        ("flowchart", DiagramKind::Flowchart),
        ("sequence", DiagramKind::Sequence),
        ("state", DiagramKind::State),
        ("mindmap", DiagramKind::Mindmap),
        ("swot", DiagramKind::Swot),
        ("timeline", DiagramKind::Timeline),
        ("gantt", DiagramKind::Gantt),
        ("journey", DiagramKind::Journey),
        ("erd", DiagramKind::Erd),
        ("class", DiagramKind::Class),
        ("network", DiagramKind::Network),
        ("architecture", DiagramKind::Architecture),
    ];
    assert_eq!(candidates.len(), DiagramKind::ALL.len());

    for (name, kind) in candidates {
        let layout = fixture_layout(name);
        assert_eq!(layout.kind, kind, "{name}: wrong kind");
        let svg = render_svg(&layout, &Theme::for_kind(kind));
        assert_valid_svg(&svg, name);
        assert!(
            svg.contains(&format!("data-diagram-type=\"{}\"", kind.as_str())),
            "{name}: missing diagram type attribute"
        );
    }
}

#[test]
fn sequence_fixture_draws_messages_by_order() {
    let layout = fixture_layout("sequence");
    let svg = render_svg(&layout, &Theme::for_kind(DiagramKind::Sequence));
    let first = svg.find("Orders latte").expect("first message");
    let second = svg.find("Rings up order").expect("second message");
    let third = svg.find("Hands over drink").expect("third message");
    assert!(first < second && second < third);
    assert!(!svg.contains("dangling"));
}

#[test]
fn class_fixture_links_typed_attributes() {
    let layout = fixture_layout("class");
    // Order -> OrderItem, Order -> Customer, OrderItem -> Product
    assert_eq!(layout.count_class("association"), 3);
}
