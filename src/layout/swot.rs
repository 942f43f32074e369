use super::*;

const WIDTH: f32 = 1400.0;
const HEIGHT: f32 = 900.0;
const MARGIN: f32 = 40.0;
const GUTTER: f32 = 20.0;
const BAND_HEIGHT: f32 = 52.0;
const ITEM_PITCH: f32 = 40.0;
const VISIBLE_ITEMS: usize = 5;

fn quadrant_style(key: &str) -> (&'static str, &'static str, &'static str) {
    match key {
        "strengths" => ("Strengths", "#10B981", "S"),
        "weaknesses" => ("Weaknesses", "#EF4444", "W"),
        "opportunities" => ("Opportunities", "#3B82F6", "O"),
        _ => ("Threats", "#F59E0B", "T"),
    }
}

pub(super) fn compute_swot_layout(data: &SwotData) -> Result<Layout, RenderError> {
    if data.item_count() == 0 {
        return Err(RenderError::insufficient(
            DiagramKind::Swot,
            "at least one strength, weakness, opportunity or threat",
        ));
    }

    let mut layout = Layout::new(DiagramKind::Swot, WIDTH, HEIGHT);
    let top = HEADER_HEIGHT + 20.0;
    let cell_width = (WIDTH - 2.0 * MARGIN - GUTTER) / 2.0;
    let cell_height = (HEIGHT - top - MARGIN - GUTTER) / 2.0;
    let item_chars = chars_fitting(cell_width - 70.0, 14.0);

    for (idx, (key, items)) in data.quadrants().into_iter().enumerate() {
        let (label, color, letter) = quadrant_style(key);
        let x = MARGIN + (idx % 2) as f32 * (cell_width + GUTTER);
        let y = top + (idx / 2) as f32 * (cell_height + GUTTER);

        layout.push(
            RectShape::new(x, y, cell_width, cell_height)
                .rx(16.0)
                .fill(Paint::color(color))
                .opacity(0.1)
                .class("quadrant-fill"),
        );
        layout.push(
            RectShape::new(x, y, cell_width, cell_height)
                .rx(16.0)
                .fill(Paint::None)
                .stroke(Paint::color(color), 2.0)
                .class("quadrant"),
        );
        layout.push(
            RectShape::new(x, y, cell_width, BAND_HEIGHT)
                .rx(16.0)
                .fill(Paint::color(color))
                .effect(Effect::Shadow)
                .class("quadrant-band"),
        );
        layout.push(
            CircleShape::new(x + 32.0, y + BAND_HEIGHT / 2.0, 16.0)
                .fill(Paint::Surface)
                .opacity(0.9),
        );
        layout.push(
            TextShape::new(x + 32.0, y + BAND_HEIGHT / 2.0 + 6.0, letter)
                .size(16.0)
                .weight(800)
                .fill(Paint::color(color)),
        );
        layout.push(
            TextShape::new(x + 60.0, y + BAND_HEIGHT / 2.0 + 7.0, label)
                .size(20.0)
                .weight(700)
                .anchor(Anchor::Start)
                .fill(Paint::OnPrimary)
                .class("quadrant-title"),
        );
        layout.push(
            TextShape::new(x + cell_width - 24.0, y + BAND_HEIGHT / 2.0 + 6.0, items.len().to_string())
                .size(14.0)
                .weight(700)
                .anchor(Anchor::End)
                .fill(Paint::OnPrimary),
        );

        for (row, item) in items.iter().take(VISIBLE_ITEMS).enumerate() {
            let item_y = y + BAND_HEIGHT + 36.0 + row as f32 * ITEM_PITCH;
            layout.push(
                CircleShape::new(x + 34.0, item_y - 5.0, 5.0)
                    .fill(Paint::color(color))
                    .class("swot-bullet"),
            );
            layout.push(
                TextShape::new(x + 50.0, item_y, truncate(item, item_chars))
                    .size(14.0)
                    .anchor(Anchor::Start)
                    .class("swot-item"),
            );
        }
        if items.len() > VISIBLE_ITEMS {
            let more_y = y + BAND_HEIGHT + 36.0 + VISIBLE_ITEMS as f32 * ITEM_PITCH;
            layout.push(
                TextShape::new(x + 50.0, more_y, format!("+{} more", items.len() - VISIBLE_ITEMS))
                    .size(12.0)
                    .weight(600)
                    .anchor(Anchor::Start)
                    .fill(Paint::Muted),
            );
        }
    }

    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_four_quadrants_even_when_some_are_empty() {
        let data = SwotData {
            strengths: vec!["Loyal regulars".to_string()],
            ..SwotData::default()
        };
        let layout = compute_swot_layout(&data).unwrap();
        assert_eq!(layout.count_class("quadrant"), 4);
        assert_eq!(layout.count_class("swot-item"), 1);
    }

    #[test]
    fn caps_visible_items() {
        let data = SwotData {
            threats: (0..8).map(|i| format!("threat {i}")).collect(),
            ..SwotData::default()
        };
        let layout = compute_swot_layout(&data).unwrap();
        assert_eq!(layout.count_class("swot-item"), VISIBLE_ITEMS);
    }

    #[test]
    fn empty_swot_is_insufficient() {
        assert!(compute_swot_layout(&SwotData::default()).is_err());
    }
}
