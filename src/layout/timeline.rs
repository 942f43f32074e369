use super::*;

const MIN_WIDTH: f32 = 1400.0;
const MIN_HEIGHT: f32 = 600.0;
const EVENT_SLOT: f32 = 180.0;
const MARKER_RADIUS: f32 = 20.0;
const CARD_WIDTH: f32 = 160.0;
const CARD_BASE_HEIGHT: f32 = 50.0;
const CARD_GAP: f32 = 40.0;
const DESCRIPTION_FONT: f32 = 11.0;

pub(super) fn compute_timeline_layout(data: &TimelineData) -> Result<Layout, RenderError> {
    let count = data.events.len();
    if count == 0 {
        return Err(RenderError::insufficient(DiagramKind::Timeline, "at least one event"));
    }

    let descriptions: Vec<Vec<String>> = data
        .events
        .values()
        .map(|description| wrap_chars(description, 24, 4))
        .collect();
    let card_heights: Vec<f32> = descriptions
        .iter()
        .map(|lines| CARD_BASE_HEIGHT + lines.len() as f32 * DESCRIPTION_FONT * 1.4)
        .collect();
    let tallest = card_heights.iter().copied().fold(80.0, f32::max);

    let width = MIN_WIDTH.max(200.0 + count as f32 * EVENT_SLOT);
    let height = MIN_HEIGHT.max(HEADER_HEIGHT + 2.0 * (tallest + CARD_GAP + MARKER_RADIUS) + 60.0);
    let axis_y = HEADER_HEIGHT + (height - HEADER_HEIGHT) / 2.0;
    let spacing = (width - 200.0) / count as f32;
    let mut layout = Layout::new(DiagramKind::Timeline, width, height);

    layout.push(
        RectShape::new(80.0, axis_y - 3.0, width - 160.0, 6.0)
            .rx(3.0)
            .fill(Paint::Gradient)
            .class("axis"),
    );

    for (idx, ((name, _), lines)) in data.events.iter().zip(descriptions).enumerate() {
        let x = 100.0 + idx as f32 * spacing + spacing / 2.0;
        let card_height = card_heights[idx];
        let above = idx % 2 == 0;
        let card_y = if above {
            axis_y - MARKER_RADIUS - CARD_GAP - card_height
        } else {
            axis_y + MARKER_RADIUS + CARD_GAP
        };
        let (stub_from, stub_to) = if above {
            (axis_y - MARKER_RADIUS, card_y + card_height)
        } else {
            (axis_y + MARKER_RADIUS, card_y)
        };
        layout.push(
            LineShape::new((x, stub_from), (x, stub_to))
                .stroke(Paint::Accent, 2.0)
                .dashed()
                .class("event-stub"),
        );
        layout.push(
            CircleShape::new(x, axis_y, MARKER_RADIUS)
                .fill(Paint::Gradient)
                .stroke(Paint::Surface, 4.0)
                .effect(Effect::Shadow)
                .class("event-marker"),
        );
        layout.push(
            TextShape::new(x, axis_y + 5.0, (idx + 1).to_string())
                .size(13.0)
                .weight(800)
                .fill(Paint::OnPrimary),
        );

        let card_width = CARD_WIDTH.min(spacing - 12.0).max(90.0);
        layout.push(
            RectShape::new(x - card_width / 2.0, card_y, card_width, card_height)
                .rx(12.0)
                .fill(Paint::Surface)
                .stroke(Paint::Primary, 2.0)
                .effect(Effect::Shadow)
                .class("event-card"),
        );
        layout.push(
            TextShape::new(x, card_y + 26.0, truncate(name, chars_fitting(card_width - 16.0, 13.0)))
                .size(13.0)
                .weight(700)
                .fill(Paint::Primary)
                .class("event-title"),
        );
        if !lines.is_empty() {
            layout.push(
                TextShape::lines(x, card_y + 46.0, lines)
                    .size(DESCRIPTION_FONT)
                    .line_height(1.4)
                    .fill(Paint::Muted)
                    .class("event-description"),
            );
        }
    }

    Ok(layout)
}
