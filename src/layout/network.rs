use super::*;

const WIDTH: f32 = 1400.0;
const HEIGHT: f32 = 900.0;
const NODE_RADIUS: f32 = 48.0;
const NODE_SLOT: f32 = 150.0;

pub(super) fn compute_network_layout(data: &NetworkData) -> Result<Layout, RenderError> {
    let count = data.nodes.len();
    if count == 0 {
        return Err(RenderError::insufficient(DiagramKind::Network, "at least one node"));
    }

    let radius = (0.35 * WIDTH.min(HEIGHT - HEADER_HEIGHT))
        .max(count as f32 * NODE_SLOT / std::f32::consts::TAU);
    let width = WIDTH.max(2.0 * (radius + NODE_RADIUS + 80.0));
    let height = HEIGHT.max(HEADER_HEIGHT + 2.0 * (radius + NODE_RADIUS + 50.0));
    let center = (width / 2.0, HEADER_HEIGHT + (height - HEADER_HEIGHT) / 2.0);
    let positions = if count == 1 {
        vec![center]
    } else {
        ring_positions(count, center, radius)
    };
    let index = index_of(data.nodes.keys());
    let mut layout = Layout::new(DiagramKind::Network, width, height);

    let node = Footprint::Circle(NODE_RADIUS);
    for link in &data.connections {
        let (Some(&from), Some(&to)) = (index.get(link.from.as_str()), index.get(link.to.as_str())) else {
            continue;
        };
        if from == to {
            continue;
        }
        let Some((start, end)) = clipped_segment(positions[from], node, positions[to], node) else {
            continue;
        };
        layout.push(
            LineShape::new(start, end)
                .stroke(Paint::Accent, 2.5)
                .opacity(0.8)
                .class("connection"),
        );
        push_edge_label(&mut layout, midpoint(start, end), &link.label, 18);
    }

    for ((name, node_type), (x, y)) in data.nodes.iter().zip(&positions) {
        layout.push(
            CircleShape::new(*x, *y, NODE_RADIUS)
                .stroke(Paint::Surface, 4.0)
                .effect(Effect::Shadow)
                .class("node"),
        );
        layout.push(
            centered_lines(*x, y - 6.0, wrap_chars(name, 11, 2), 13.0)
                .weight(700)
                .fill(Paint::OnPrimary)
                .class("node-name"),
        );
        layout.push(
            TextShape::new(*x, y + NODE_RADIUS + 18.0, truncate(node_type, 22))
                .size(11.0)
                .weight(600)
                .fill(Paint::Muted)
                .class("node-type"),
        );
    }

    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn link(from: &str, to: &str) -> Link {
        Link {
            from: from.to_string(),
            to: to.to_string(),
            label: "ethernet".to_string(),
        }
    }

    #[test]
    fn dangling_and_self_connections_are_skipped() {
        let mut nodes = IndexMap::new();
        nodes.insert("Router".to_string(), "Gateway".to_string());
        nodes.insert("POS".to_string(), "Terminal".to_string());
        nodes.insert("Printer".to_string(), "Peripheral".to_string());
        let data = NetworkData {
            nodes,
            connections: vec![
                link("Router", "POS"),
                link("Router", "Ghost"),
                link("POS", "POS"),
                link("POS", "Printer"),
            ],
        };
        let layout = compute_network_layout(&data).unwrap();
        assert_eq!(layout.count_class("connection"), 2);
        assert_eq!(layout.count_class("edge-label"), 2);
        assert_eq!(layout.count_class("node"), 3);
    }

    #[test]
    fn nodes_sit_on_a_ring() {
        let mut nodes = IndexMap::new();
        for i in 0..6 {
            nodes.insert(format!("n{i}"), "Device".to_string());
        }
        let layout = compute_network_layout(&NetworkData {
            nodes,
            connections: Vec::new(),
        })
        .unwrap();
        let center = (layout.width / 2.0, HEADER_HEIGHT + (layout.height - HEADER_HEIGHT) / 2.0);
        let distances: Vec<f32> = layout
            .elements
            .iter()
            .filter_map(|el| match el {
                Element::Circle(c) if c.class == Some("node") => {
                    Some(((c.cx - center.0).powi(2) + (c.cy - center.1).powi(2)).sqrt())
                }
                _ => None,
            })
            .collect();
        assert_eq!(distances.len(), 6);
        assert!(distances.iter().all(|d| (d - distances[0]).abs() < 0.5));
    }
}
