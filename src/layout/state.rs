use super::*;

const MIN_WIDTH: f32 = 1400.0;
const MIN_HEIGHT: f32 = 900.0;
const STATE_RADIUS: f32 = 70.0;
const CURVE_BEND: f32 = 28.0;

pub(super) fn compute_state_layout(data: &StateData) -> Result<Layout, RenderError> {
    let count = data.states.len();
    if count == 0 {
        return Err(RenderError::insufficient(DiagramKind::State, "at least one state"));
    }

    let body = MIN_HEIGHT - HEADER_HEIGHT;
    let ring = (MIN_WIDTH.min(body) * 0.3).max(count as f32 * (STATE_RADIUS * 2.0 + 30.0) / std::f32::consts::TAU);
    let width = MIN_WIDTH.max(2.0 * (ring + STATE_RADIUS + 80.0));
    let height = MIN_HEIGHT.max(HEADER_HEIGHT + 2.0 * (ring + STATE_RADIUS + 60.0));
    let center = (width / 2.0, HEADER_HEIGHT + (height - HEADER_HEIGHT) / 2.0);
    let positions = if count == 1 {
        vec![center]
    } else {
        ring_positions(count, center, ring)
    };
    let mut layout = Layout::new(DiagramKind::State, width, height);

    let index = index_of(data.states.keys());
    let shape = Footprint::Circle(STATE_RADIUS);
    let mut ordered: Vec<&Transition> = data.transitions.iter().collect();
    ordered.sort_by_key(|transition| transition.order);

    for transition in ordered {
        let (Some(&from), Some(&to)) = (
            index.get(transition.from.as_str()),
            index.get(transition.to.as_str()),
        ) else {
            continue;
        };
        if from == to {
            let top = positions[from];
            layout.push(
                PathShape::new(self_loop_path(top, STATE_RADIUS - 6.0))
                    .stroke(Paint::Accent, 2.5)
                    .marker(Marker::Arrow)
                    .class("transition"),
            );
            push_edge_label(
                &mut layout,
                (top.0, top.1 - STATE_RADIUS - 52.0),
                &transition.trigger,
                15,
            );
            continue;
        }
        let Some((start, end)) = clipped_segment(positions[from], shape, positions[to], shape) else {
            continue;
        };
        let (mid_x, mid_y) = midpoint(start, end);
        let (dx, dy) = (end.0 - start.0, end.1 - start.1);
        let length = (dx * dx + dy * dy).sqrt().max(1.0);
        let control = (mid_x - dy / length * CURVE_BEND, mid_y + dx / length * CURVE_BEND);
        let d = format!(
            "M {:.2} {:.2} Q {:.2} {:.2} {:.2} {:.2}",
            start.0, start.1, control.0, control.1, end.0, end.1
        );
        layout.push(
            PathShape::new(d)
                .stroke(Paint::Accent, 2.5)
                .marker(Marker::Arrow)
                .class("transition"),
        );
        let on_curve = (
            0.25 * start.0 + 0.5 * control.0 + 0.25 * end.0,
            0.25 * start.1 + 0.5 * control.1 + 0.25 * end.1,
        );
        push_edge_label(&mut layout, on_curve, &transition.trigger, 15);
    }

    for (idx, ((name, description), (x, y))) in data.states.iter().zip(&positions).enumerate() {
        let mut node = CircleShape::new(*x, *y, STATE_RADIUS)
            .fill(Paint::Gradient)
            .effect(Effect::Shadow)
            .class("state");
        if idx == 0 {
            node = node.stroke(Paint::Accent, 4.0);
        }
        layout.push(node);
        let name_lines = wrap_chars(name, 14, 2);
        let offset = if name_lines.len() > 1 { 16.0 } else { 6.0 };
        layout.push(
            centered_lines(*x, *y - offset, name_lines, 15.0)
                .weight(700)
                .fill(Paint::OnPrimary)
                .class("state-name"),
        );
        if !description.is_empty() {
            layout.push(
                centered_lines(*x, *y + 26.0, wrap_chars(description, 18, 2), 10.0)
                    .fill(Paint::color("#FEE2E2"))
                    .class("state-description"),
            );
        }
    }

    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn data(transitions: &[(&str, &str)]) -> StateData {
        let mut states = IndexMap::new();
        for name in ["Idle", "Brewing", "Ready"] {
            states.insert(name.to_string(), format!("{name} state"));
        }
        StateData {
            states,
            transitions: transitions
                .iter()
                .enumerate()
                .map(|(idx, (from, to))| Transition {
                    from: from.to_string(),
                    to: to.to_string(),
                    trigger: "go".to_string(),
                    order: idx as i64,
                })
                .collect(),
        }
    }

    #[test]
    fn transitions_start_on_circle_boundary() {
        let layout = compute_state_layout(&data(&[("Idle", "Brewing")])).unwrap();
        let circles: Vec<&CircleShape> = layout
            .elements
            .iter()
            .filter_map(|el| match el {
                Element::Circle(c) if c.class == Some("state") => Some(c),
                _ => None,
            })
            .collect();
        let Some(Element::Path(path)) = layout.elements.first() else {
            panic!("transition should be drawn before states");
        };
        let coords: Vec<f32> = path
            .d
            .split_whitespace()
            .filter_map(|token| token.parse().ok())
            .collect();
        let dx = coords[0] - circles[0].cx;
        let dy = coords[1] - circles[0].cy;
        assert!(((dx * dx + dy * dy).sqrt() - STATE_RADIUS).abs() < 0.05);
    }

    #[test]
    fn dangling_and_self_transitions() {
        let layout = compute_state_layout(&data(&[("Idle", "Nowhere"), ("Ready", "Ready")])).unwrap();
        assert_eq!(layout.count_class("transition"), 1);
        assert_eq!(layout.count_class("state"), 3);
    }

    #[test]
    fn ring_grows_with_state_count() {
        let mut many = data(&[]);
        for i in 0..20 {
            many.states.insert(format!("S{i}"), String::new());
        }
        let layout = compute_state_layout(&many).unwrap();
        assert!(layout.width > MIN_WIDTH);
    }
}
