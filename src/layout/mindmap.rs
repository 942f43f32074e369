use super::*;

const MIN_WIDTH: f32 = 1400.0;
const MIN_HEIGHT: f32 = 900.0;
const CENTER_RADIUS: f32 = 60.0;
const BASE_RADIUS: f32 = 200.0;
const BRANCH_FONT: f32 = 13.0;
const CONCEPT_FONT: f32 = 10.0;
const VISIBLE_CONCEPTS: usize = 3;

pub(super) fn compute_mindmap_layout(data: &MindmapData) -> Result<Layout, RenderError> {
    if data.branches.is_empty() {
        return Err(RenderError::insufficient(DiagramKind::Mindmap, "at least one branch"));
    }

    let longest = data
        .branches
        .keys()
        .map(|name| text_width(&truncate(name, 24), BRANCH_FONT))
        .fold(0.0, f32::max);
    let branch_width = (longest + 36.0).clamp(110.0, 220.0);
    let tallest_concepts = data
        .branches
        .values()
        .map(|concepts| concepts.len().min(VISIBLE_CONCEPTS + 1))
        .max()
        .unwrap_or(0);
    let branch_height = 40.0 + tallest_concepts as f32 * 15.0;

    let count = data.branches.len();
    let radius = BASE_RADIUS
        .max(CENTER_RADIUS + 40.0 + longest)
        .max(count as f32 * (branch_width + 24.0) / std::f32::consts::TAU);
    let width = MIN_WIDTH.max(2.0 * (radius + branch_width / 2.0 + 60.0));
    let height = MIN_HEIGHT.max(HEADER_HEIGHT + 2.0 * (radius + branch_height / 2.0 + 40.0));
    let center = (width / 2.0, HEADER_HEIGHT + (height - HEADER_HEIGHT) / 2.0);
    let mut layout = Layout::new(DiagramKind::Mindmap, width, height);

    let positions = ring_positions(count, center, radius);
    let hub = Footprint::Circle(CENTER_RADIUS);
    let leaf = Footprint::rect(branch_width, branch_height);
    for position in &positions {
        if let Some((start, end)) = clipped_segment(center, hub, *position, leaf) {
            layout.push(
                LineShape::new(start, end)
                    .stroke(Paint::Accent, 3.0)
                    .opacity(0.6)
                    .class("branch-link"),
            );
        }
    }

    layout.push(
        CircleShape::new(center.0, center.1, CENTER_RADIUS)
            .fill(Paint::Gradient)
            .effect(Effect::Glow)
            .class("central-topic"),
    );
    layout.push(
        centered_lines(center.0, center.1 - 8.0, wrap_chars(&data.central_topic, 12, 2), 18.0)
            .weight(700)
            .fill(Paint::OnPrimary),
    );
    layout.push(
        TextShape::new(center.0, center.1 + 26.0, "Central Topic")
            .size(11.0)
            .fill(Paint::color("#E5E7EB")),
    );

    for ((name, concepts), (x, y)) in data.branches.iter().zip(&positions) {
        layout.push(
            RectShape::centered(*x, *y, branch_width, branch_height)
                .rx(10.0)
                .fill(Paint::Gradient)
                .effect(Effect::Shadow)
                .class("branch"),
        );
        let top = y - branch_height / 2.0;
        layout.push(
            TextShape::new(*x, top + 24.0, truncate(name, chars_fitting(branch_width - 16.0, BRANCH_FONT)))
                .size(BRANCH_FONT)
                .weight(700)
                .fill(Paint::OnPrimary)
                .class("branch-name"),
        );
        let concept_chars = chars_fitting(branch_width - 14.0, CONCEPT_FONT);
        let mut lines: Vec<String> = concepts
            .iter()
            .take(VISIBLE_CONCEPTS)
            .map(|concept| truncate(concept, concept_chars))
            .collect();
        if concepts.len() > VISIBLE_CONCEPTS {
            lines.push(format!("+{} more", concepts.len() - VISIBLE_CONCEPTS));
        }
        if !lines.is_empty() {
            layout.push(
                TextShape::lines(*x, top + 42.0, lines)
                    .size(CONCEPT_FONT)
                    .line_height(1.5)
                    .fill(Paint::color("#E5E7EB"))
                    .class("concept"),
            );
        }
    }

    Ok(layout)
}
