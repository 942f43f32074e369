use super::*;

const WIDTH: f32 = 1400.0;
const NODE_WIDTH: f32 = 320.0;
const NODE_HEIGHT: f32 = 120.0;
const FIRST_ROW_Y: f32 = 140.0;
const ROW_PITCH: f32 = 280.0;
const TITLE_FONT: f32 = 18.0;
const DESCRIPTION_FONT: f32 = 13.0;

pub(super) fn compute_flowchart_layout(data: &FlowchartData) -> Result<Layout, RenderError> {
    let count = data.steps.len();
    if count < 2 {
        return Err(RenderError::insufficient(DiagramKind::Flowchart, "at least 2 steps"));
    }

    let height = 180.0 + count as f32 * ROW_PITCH;
    let mut layout = Layout::new(DiagramKind::Flowchart, WIDTH, height);
    let center_x = WIDTH / 2.0;
    let node_x = center_x - NODE_WIDTH / 2.0;

    for idx in 0..count - 1 {
        let from_y = FIRST_ROW_Y + idx as f32 * ROW_PITCH + NODE_HEIGHT;
        let to_y = FIRST_ROW_Y + (idx + 1) as f32 * ROW_PITCH;
        let mid_y = (from_y + to_y) / 2.0;
        let d = format!(
            "M {center_x:.2} {from_y:.2} Q {:.2} {mid_y:.2} {center_x:.2} {:.2}",
            center_x + 30.0,
            to_y - 25.0
        );
        layout.push(
            PathShape::new(d)
                .stroke(Paint::Accent, 3.0)
                .marker(Marker::Arrow)
                .class("connector"),
        );
    }

    for (idx, (name, description)) in data.steps.iter().enumerate() {
        let y = FIRST_ROW_Y + idx as f32 * ROW_PITCH;
        let terminal = idx == 0 || idx == count - 1;
        let mut node = RectShape::new(node_x, y, NODE_WIDTH, NODE_HEIGHT)
            .rx(if terminal { 60.0 } else { 16.0 })
            .fill(Paint::Gradient)
            .effect(Effect::Shadow)
            .class("step");
        if terminal {
            node = node.stroke(Paint::Accent, 3.0);
        }
        layout.push(node);

        let badge = (node_x + 34.0, y + 34.0);
        layout.push(
            CircleShape::new(badge.0, badge.1, 16.0)
                .fill(Paint::Surface)
                .opacity(0.9)
                .class("step-badge"),
        );
        layout.push(
            TextShape::new(badge.0, badge.1 + 5.0, (idx + 1).to_string())
                .size(14.0)
                .weight(800)
                .fill(Paint::Primary),
        );

        let title = wrap_chars(name, 25, 2);
        let joined = description.join(" ");
        let details = if joined.trim().is_empty() {
            Vec::new()
        } else {
            wrap_chars(&joined, 40, 2)
        };
        let title_height = title.len() as f32 * TITLE_FONT * 1.3;
        let details_height = details.len() as f32 * DESCRIPTION_FONT * 1.3;
        let gap = if details.is_empty() { 0.0 } else { 8.0 };
        let block_top = y + (NODE_HEIGHT - title_height - gap - details_height) / 2.0;

        layout.push(
            TextShape::lines(center_x, block_top + TITLE_FONT, title)
                .size(TITLE_FONT)
                .weight(700)
                .fill(Paint::OnPrimary)
                .class("step-title"),
        );
        if !details.is_empty() {
            layout.push(
                TextShape::lines(
                    center_x,
                    block_top + title_height + gap + DESCRIPTION_FONT,
                    details,
                )
                .size(DESCRIPTION_FONT)
                .fill(Paint::color("#E0E7FF"))
                .class("step-description"),
            );
        }
    }

    Ok(layout)
}
