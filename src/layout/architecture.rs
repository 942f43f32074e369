use super::*;

const WIDTH: f32 = 1400.0;
const HEIGHT: f32 = 1000.0;
const LAYERS: [&str; 4] = ["Presentation", "Business", "Data", "Infrastructure"];
const BAND_TOP: f32 = HEADER_HEIGHT + 20.0;
const BAND_GAP: f32 = 16.0;
const AREA_LEFT: f32 = 220.0;
const AREA_RIGHT: f32 = 1360.0;
const COMPONENT_WIDTH: f32 = 200.0;
const MIN_COMPONENT_WIDTH: f32 = 40.0;
const COMPONENT_HEIGHT: f32 = 80.0;

fn band_height() -> f32 {
    (HEIGHT - BAND_TOP - 40.0 - BAND_GAP * (LAYERS.len() - 1) as f32) / LAYERS.len() as f32
}

/// Components fill the layers top to bottom in declaration order.
fn assign_layers(count: usize) -> Vec<usize> {
    let per_layer = count.div_ceil(LAYERS.len()).max(1);
    (0..count).map(|idx| (idx / per_layer).min(LAYERS.len() - 1)).collect()
}

pub(super) fn compute_architecture_layout(data: &ArchitectureData) -> Result<Layout, RenderError> {
    let count = data.components.len();
    if count == 0 {
        return Err(RenderError::insufficient(DiagramKind::Architecture, "at least one component"));
    }

    let layers = assign_layers(count);
    let band = band_height();
    let mut layout = Layout::new(DiagramKind::Architecture, WIDTH, HEIGHT);

    for (idx, name) in LAYERS.iter().enumerate() {
        let y = BAND_TOP + idx as f32 * (band + BAND_GAP);
        layout.push(
            RectShape::new(40.0, y, WIDTH - 80.0, band)
                .rx(14.0)
                .fill(Paint::Primary)
                .opacity(0.06 + 0.03 * idx as f32)
                .class("layer"),
        );
        layout.push(
            TextShape::new(64.0, y + band / 2.0 + 6.0, format!("{name} Layer"))
                .size(15.0)
                .weight(700)
                .anchor(Anchor::Start)
                .fill(Paint::Primary)
                .class("layer-name"),
        );
    }

    let mut positions = vec![(0.0, 0.0); count];
    for layer in 0..LAYERS.len() {
        let members: Vec<usize> = (0..count).filter(|idx| layers[*idx] == layer).collect();
        if members.is_empty() {
            continue;
        }
        let slot = (AREA_RIGHT - AREA_LEFT) / members.len() as f32;
        let cy = BAND_TOP + layer as f32 * (band + BAND_GAP) + band / 2.0;
        for (col, idx) in members.into_iter().enumerate() {
            positions[idx] = (AREA_LEFT + col as f32 * slot + slot / 2.0, cy);
        }
    }

    let index = index_of(data.components.keys());
    let component_width: Vec<f32> = (0..count)
        .map(|idx| {
            let per_layer = layers.iter().filter(|layer| **layer == layers[idx]).count();
            COMPONENT_WIDTH
                .min((AREA_RIGHT - AREA_LEFT) / per_layer as f32 - 20.0)
                .max(MIN_COMPONENT_WIDTH)
        })
        .collect();
    for link in &data.relationships {
        let (Some(&from), Some(&to)) = (index.get(link.from.as_str()), index.get(link.to.as_str())) else {
            continue;
        };
        if from == to {
            continue;
        }
        let Some((start, end)) = clipped_segment(
            positions[from],
            Footprint::rect(component_width[from], COMPONENT_HEIGHT),
            positions[to],
            Footprint::rect(component_width[to], COMPONENT_HEIGHT),
        ) else {
            continue;
        };
        layout.push(
            LineShape::new(start, end)
                .stroke(Paint::Accent, 2.0)
                .marker(Marker::Arrow)
                .class("relationship"),
        );
        push_edge_label(&mut layout, midpoint(start, end), &link.label, 18);
    }

    for (idx, (name, description)) in data.components.iter().enumerate() {
        let (cx, cy) = positions[idx];
        let width = component_width[idx];
        layout.push(
            RectShape::centered(cx, cy, width, COMPONENT_HEIGHT)
                .rx(12.0)
                .fill(Paint::Gradient)
                .effect(Effect::Shadow)
                .class("component"),
        );
        layout.push(
            TextShape::new(cx, cy - 6.0, truncate(name, chars_fitting(width - 16.0, 14.0)))
                .size(14.0)
                .weight(700)
                .fill(Paint::OnPrimary)
                .class("component-name"),
        );
        if !description.is_empty() {
            layout.push(
                TextShape::new(cx, cy + 16.0, truncate(description, chars_fitting(width - 16.0, 10.0)))
                    .size(10.0)
                    .fill(Paint::color("#E5E7EB")),
            );
        }
    }

    Ok(layout)
}
