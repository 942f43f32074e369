mod architecture;
mod class;
mod erd;
mod flowchart;
mod gantt;
mod journey;
mod mindmap;
mod network;
mod radial;
mod sequence;
mod state;
mod swot;
pub(crate) mod text;
mod timeline;
pub(crate) mod types;
pub use types::*;
use architecture::*;
use class::*;
use erd::*;
use flowchart::*;
use gantt::*;
use journey::*;
use mindmap::*;
use network::*;
use radial::*;
use sequence::*;
use state::*;
use swot::*;
use text::*;
use timeline::*;

use crate::error::RenderError;
use crate::ir::*;
use std::collections::HashMap;

/// Title band height reserved above every diagram body.
const HEADER_HEIGHT: f32 = 90.0;
const EDGE_LABEL_FONT: f32 = 11.0;

pub fn compute_layout(data: &DiagramData) -> Result<Layout, RenderError> {
    match data {
        DiagramData::Flowchart(d) => compute_flowchart_layout(d),
        DiagramData::Sequence(d) => compute_sequence_layout(d),
        DiagramData::State(d) => compute_state_layout(d),
        DiagramData::Mindmap(d) => compute_mindmap_layout(d),
        DiagramData::Swot(d) => compute_swot_layout(d),
        DiagramData::Timeline(d) => compute_timeline_layout(d),
        DiagramData::Gantt(d) => compute_gantt_layout(d),
        DiagramData::Journey(d) => compute_journey_layout(d),
        DiagramData::Erd(d) => compute_erd_layout(d),
        DiagramData::Class(d) => compute_class_layout(d),
        DiagramData::Network(d) => compute_network_layout(d),
        DiagramData::Architecture(d) => compute_architecture_layout(d),
    }
}

/// Pill-shaped caption centered on a connector.
fn push_edge_label(layout: &mut Layout, at: (f32, f32), label: &str, max_chars: usize) {
    let label = truncate(label, max_chars);
    if label.is_empty() {
        return;
    }
    let width = text_width(&label, EDGE_LABEL_FONT) + 14.0;
    layout.push(
        RectShape::centered(at.0, at.1, width, 20.0)
            .rx(10.0)
            .fill(Paint::Surface)
            .stroke(Paint::Accent, 1.0)
            .opacity(0.95)
            .class("edge-label"),
    );
    layout.push(
        TextShape::new(at.0, at.1 + 4.0, label)
            .size(EDGE_LABEL_FONT)
            .weight(600)
            .fill(Paint::Accent)
            .class("edge-label-text"),
    );
}

/// Centered multi-line text where `y` is the vertical middle of the block.
fn centered_lines(x: f32, y: f32, lines: Vec<String>, font_size: f32) -> TextShape {
    let line_height = 1.3;
    let total = (lines.len().saturating_sub(1)) as f32 * font_size * line_height;
    TextShape::lines(x, y - total / 2.0 + font_size * 0.35, lines)
        .size(font_size)
        .line_height(line_height)
}

/// Node name to index, for resolving edge endpoints.
fn index_of<'a, I>(names: I) -> HashMap<&'a str, usize>
where
    I: IntoIterator<Item = &'a String>,
{
    names
        .into_iter()
        .enumerate()
        .map(|(idx, name)| (name.as_str(), idx))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    #[test]
    fn dispatch_matches_kind() {
        let data = crate::fallback::fallback_data(DiagramKind::Network, "cafe wifi");
        let layout = compute_layout(&data).unwrap();
        assert_eq!(layout.kind, DiagramKind::Network);
        assert!(!layout.elements.is_empty());
    }

    #[test]
    fn empty_inputs_report_insufficient_data() {
        let empty = DiagramData::Erd(ErdData {
            entities: IndexMap::new(),
        });
        assert!(matches!(
            compute_layout(&empty),
            Err(RenderError::InsufficientData { kind: DiagramKind::Erd, .. })
        ));
    }
}
