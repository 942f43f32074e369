use super::*;

const MIN_WIDTH: f32 = 1400.0;
const HEIGHT: f32 = 700.0;
const STAGE_SLOT: f32 = 190.0;
const MARKER_RADIUS: f32 = 30.0;
const CARD_WIDTH: f32 = 150.0;
const CARD_HEIGHT: f32 = 112.0;
const CARD_GAP: f32 = 36.0;

/// Rough sentiment score in 1..=5 for a free-text emotion.
fn emotion_score(emotion: &str) -> f32 {
    const BANDS: [(&[&str], f32); 5] = [
        (
            &["delight", "excite", "thrill", "love", "happy", "joy", "satisf"],
            5.0,
        ),
        (
            &["confident", "pleased", "relieved", "hopeful", "engaged", "optimistic", "trust"],
            4.0,
        ),
        (&["curious", "interest", "analytical", "neutral", "calm", "focused"], 3.0),
        (&["uncertain", "hesitant", "confus", "overwhelm", "impatient", "bored", "skeptic"], 2.0),
        (&["frustrat", "angry", "anxious", "annoy", "disappoint", "upset", "stress"], 1.0),
    ];
    let lower = emotion.to_ascii_lowercase();
    BANDS
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| lower.contains(needle)))
        .map(|(_, score)| *score)
        .unwrap_or(3.0)
}

fn journey_score_color(score: f32) -> String {
    let clamped = score.clamp(1.0, 5.0);
    let t = (clamped - 1.0) / 4.0;
    let start = (248.0, 113.0, 113.0);
    let end = (74.0, 222.0, 128.0);
    let r = (start.0 + (end.0 - start.0) * t).round() as i32;
    let g = (start.1 + (end.1 - start.1) * t).round() as i32;
    let b = (start.2 + (end.2 - start.2) * t).round() as i32;
    format!("#{:02X}{:02X}{:02X}", r, g, b)
}

pub(super) fn compute_journey_layout(data: &JourneyData) -> Result<Layout, RenderError> {
    let count = data.touchpoints.len();
    if count == 0 {
        return Err(RenderError::insufficient(DiagramKind::Journey, "at least one touchpoint"));
    }

    let mut ordered: Vec<(&String, &Touchpoint)> = data.touchpoints.iter().collect();
    ordered.sort_by_key(|(_, touchpoint)| touchpoint.order);

    let width = MIN_WIDTH.max(200.0 + count as f32 * STAGE_SLOT);
    let axis_y = HEADER_HEIGHT + (HEIGHT - HEADER_HEIGHT) / 2.0;
    let spacing = (width - 200.0) / count as f32;
    let xs: Vec<f32> = (0..count)
        .map(|i| 100.0 + i as f32 * spacing + spacing / 2.0)
        .collect();
    let mut layout = Layout::new(DiagramKind::Journey, width, HEIGHT);

    let scores: Vec<f32> = ordered.iter().map(|(_, tp)| emotion_score(&tp.emotion)).collect();
    layout.push(
        LineShape::new((80.0, axis_y), (width - 80.0, axis_y))
            .stroke(Paint::Line, 4.0)
            .opacity(0.6)
            .class("journey-path"),
    );
    if count > 1 {
        // Sentiment trace: higher scores sit closer to the top of the band.
        let trace: Vec<String> = xs
            .iter()
            .zip(&scores)
            .map(|(x, score)| format!("{x:.2} {:.2}", axis_y - (score - 3.0) * 14.0))
            .collect();
        layout.push(
            PathShape::new(format!("M {}", trace.join(" L ")))
                .stroke(Paint::Accent, 2.0)
                .dashed()
                .opacity(0.7)
                .class("sentiment"),
        );
    }

    let card_width = CARD_WIDTH.min(spacing - 12.0).max(96.0);
    let text_chars = chars_fitting(card_width - 16.0, 11.0);
    for (idx, ((name, touchpoint), x)) in ordered.iter().zip(&xs).enumerate() {
        let above = idx % 2 == 0;
        let card_y = if above {
            axis_y - MARKER_RADIUS - CARD_GAP - CARD_HEIGHT
        } else {
            axis_y + MARKER_RADIUS + CARD_GAP
        };
        let stub = if above {
            ((*x, axis_y - MARKER_RADIUS), (*x, card_y + CARD_HEIGHT))
        } else {
            ((*x, axis_y + MARKER_RADIUS), (*x, card_y))
        };
        layout.push(
            LineShape::new(stub.0, stub.1)
                .stroke(Paint::Line, 1.5)
                .dashed()
                .class("touchpoint-stub"),
        );

        let color = journey_score_color(scores[idx]);
        layout.push(
            CircleShape::new(*x, axis_y, MARKER_RADIUS)
                .fill(Paint::color(color.clone()))
                .stroke(Paint::Surface, 4.0)
                .effect(Effect::Shadow)
                .class("touchpoint"),
        );
        layout.push(
            TextShape::new(*x, axis_y + 6.0, (idx + 1).to_string())
                .size(18.0)
                .weight(800)
                .fill(Paint::OnPrimary),
        );

        layout.push(
            RectShape::new(x - card_width / 2.0, card_y, card_width, CARD_HEIGHT)
                .rx(12.0)
                .fill(Paint::Surface)
                .stroke(Paint::Primary, 2.0)
                .effect(Effect::Shadow)
                .class("touchpoint-card"),
        );
        layout.push(
            TextShape::new(*x, card_y + 22.0, truncate(name, chars_fitting(card_width - 16.0, 13.0)))
                .size(13.0)
                .weight(700)
                .fill(Paint::Primary)
                .class("touchpoint-name"),
        );
        let mut lines = wrap_chars(&touchpoint.action, text_chars, 2);
        if lines.is_empty() {
            lines.push(String::new());
        }
        layout.push(
            TextShape::lines(*x, card_y + 42.0, lines)
                .size(11.0)
                .fill(Paint::Text),
        );
        layout.push(
            TextShape::new(*x, card_y + 78.0, truncate(&format!("Feeling: {}", touchpoint.emotion), text_chars))
                .size(11.0)
                .weight(600)
                .fill(Paint::color(color)),
        );
        if let Some(pain) = touchpoint.pain_points.first() {
            layout.push(
                TextShape::new(*x, card_y + 96.0, truncate(&format!("! {pain}"), text_chars))
                    .size(10.0)
                    .fill(Paint::color("#DC2626"))
                    .class("pain-point"),
            );
        }
    }

    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn touchpoint(order: i64, emotion: &str) -> Touchpoint {
        Touchpoint {
            action: "do something".to_string(),
            emotion: emotion.to_string(),
            pain_points: vec!["slow".to_string()],
            order,
        }
    }

    #[test]
    fn emotions_map_to_colors() {
        assert_eq!(journey_score_color(emotion_score("Delighted")), "#4ADE80");
        assert_eq!(journey_score_color(emotion_score("Frustrated")), "#F87171");
        assert_eq!(emotion_score("something else"), 3.0);
    }

    #[test]
    fn touchpoints_follow_order_field() {
        let mut touchpoints = IndexMap::new();
        touchpoints.insert("Pay".to_string(), touchpoint(3, "Confident"));
        touchpoints.insert("Discover".to_string(), touchpoint(1, "Curious"));
        touchpoints.insert("Compare".to_string(), touchpoint(2, "Analytical"));
        let layout = compute_journey_layout(&JourneyData { touchpoints }).unwrap();
        let names: Vec<&str> = layout
            .elements
            .iter()
            .filter_map(|el| match el {
                Element::Text(t) if t.class == Some("touchpoint-name") => Some(t.lines[0].as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["Discover", "Compare", "Pay"]);
        assert_eq!(layout.count_class("pain-point"), 3);
    }
}
