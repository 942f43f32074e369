use super::*;

const WIDTH: f32 = 1400.0;
const MIN_HEIGHT: f32 = 800.0;
const ACTOR_WIDTH: f32 = 120.0;
const ACTOR_HEIGHT: f32 = 60.0;
const ACTOR_Y: f32 = 100.0;
const FIRST_MESSAGE_Y: f32 = 220.0;
const MESSAGE_PITCH: f32 = 80.0;

pub(super) fn compute_sequence_layout(data: &SequenceData) -> Result<Layout, RenderError> {
    if data.actors.is_empty() || data.interactions.is_empty() {
        return Err(RenderError::insufficient(
            DiagramKind::Sequence,
            "at least one actor and one interaction",
        ));
    }

    let index = index_of(data.actors.keys());
    let mut ordered: Vec<&Interaction> = data.interactions.iter().collect();
    ordered.sort_by_key(|interaction| interaction.order);
    let drawable: Vec<(usize, usize, &Interaction)> = ordered
        .into_iter()
        .filter_map(|interaction| {
            let from = *index.get(interaction.from.as_str())?;
            let to = *index.get(interaction.to.as_str())?;
            Some((from, to, interaction))
        })
        .collect();

    let rows = drawable.len().max(1) as f32;
    let height = MIN_HEIGHT.max(FIRST_MESSAGE_Y + rows * MESSAGE_PITCH + 60.0);
    let mut layout = Layout::new(DiagramKind::Sequence, WIDTH, height);

    let spacing = (WIDTH - 100.0) / data.actors.len() as f32;
    let actor_width = ACTOR_WIDTH.min(spacing - 12.0).max(48.0);
    let xs: Vec<f32> = (0..data.actors.len())
        .map(|i| 50.0 + i as f32 * spacing + spacing / 2.0)
        .collect();
    let lifeline_end = height - 50.0;

    for x in &xs {
        layout.push(
            LineShape::new((*x, ACTOR_Y + ACTOR_HEIGHT), (*x, lifeline_end))
                .stroke(Paint::Line, 2.0)
                .dashed()
                .opacity(0.7)
                .class("lifeline"),
        );
    }

    for (row, (from, to, interaction)) in drawable.iter().enumerate() {
        let y = FIRST_MESSAGE_Y + row as f32 * MESSAGE_PITCH;
        let (x1, x2) = (xs[*from], xs[*to]);
        let label = truncate(&interaction.message, 30);
        if from == to {
            let d = format!(
                "M {x1:.2} {y:.2} H {:.2} V {:.2} H {:.2}",
                x1 + 50.0,
                y + 26.0,
                x1 + 6.0
            );
            layout.push(
                PathShape::new(d)
                    .stroke(Paint::Accent, 2.5)
                    .marker(Marker::Arrow)
                    .class("message"),
            );
            layout.push(
                TextShape::new(x1 + 60.0, y + 17.0, label)
                    .size(13.0)
                    .weight(600)
                    .anchor(Anchor::Start)
                    .class("message-label"),
            );
        } else {
            let direction = if x2 > x1 { 1.0 } else { -1.0 };
            layout.push(
                LineShape::new((x1, y), (x2 - direction * 4.0, y))
                    .stroke(Paint::Accent, 2.5)
                    .marker(Marker::Arrow)
                    .class("message"),
            );
            layout.push(
                TextShape::new((x1 + x2) / 2.0, y - 10.0, label)
                    .size(13.0)
                    .weight(600)
                    .class("message-label"),
            );
        }
        layout.push(
            CircleShape::new(x1, y, 11.0)
                .fill(Paint::Primary)
                .class("message-order"),
        );
        layout.push(
            TextShape::new(x1, y + 4.0, (row + 1).to_string())
                .size(11.0)
                .weight(700)
                .fill(Paint::OnPrimary),
        );
    }

    for ((name, description), x) in data.actors.iter().zip(&xs) {
        let actor = RectShape::centered(*x, ACTOR_Y + ACTOR_HEIGHT / 2.0, actor_width, ACTOR_HEIGHT)
            .rx(12.0)
            .fill(Paint::Gradient)
            .effect(Effect::Shadow)
            .class("actor");
        layout.push(actor);
        let max_chars = chars_fitting(actor_width - 12.0, 14.0);
        layout.push(
            TextShape::new(*x, ACTOR_Y + 27.0, truncate(name, max_chars))
                .size(14.0)
                .weight(700)
                .fill(Paint::OnPrimary)
                .class("actor-name"),
        );
        layout.push(
            TextShape::new(*x, ACTOR_Y + 45.0, truncate(description, chars_fitting(actor_width - 12.0, 10.0)))
                .size(10.0)
                .fill(Paint::color("#E0E7FF")),
        );
    }

    Ok(layout)
}
