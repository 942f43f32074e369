use super::*;

const MIN_WIDTH: f32 = 1400.0;
const MIN_HEIGHT: f32 = 800.0;
const MAX_COLUMNS: usize = 3;
const BOX_WIDTH: f32 = 320.0;
const NAME_BAND: f32 = 40.0;
const MEMBER_PITCH: f32 = 18.0;
const COLUMN_GAP: f32 = 120.0;
const ROW_GAP: f32 = 80.0;

struct ClassBox {
    x: f32,
    y: f32,
    height: f32,
}

impl ClassBox {
    fn center(&self) -> (f32, f32) {
        (self.x + BOX_WIDTH / 2.0, self.y + self.height / 2.0)
    }
}

fn box_height(members: &ClassMembers) -> f32 {
    let rows = members.attributes.len().max(members.methods.len()).max(1);
    NAME_BAND + 16.0 + rows as f32 * MEMBER_PITCH + 14.0
}

/// `name: Type` annotations naming another class become associations.
fn associated_type(attribute: &str) -> Option<String> {
    let (_, ty) = attribute.split_once(':')?;
    let mut ty = ty.trim();
    for wrapper in ["Option<", "Vec<", "List<", "Set<"] {
        if let Some(inner) = ty.strip_prefix(wrapper) {
            ty = inner.trim_end_matches('>');
        }
    }
    let ty = ty.trim_end_matches("[]").trim_end_matches('?').trim();
    if ty.is_empty() {
        None
    } else {
        Some(ty.to_ascii_lowercase())
    }
}

fn method_signature(method: &str) -> String {
    if method.trim_end().ends_with(')') {
        method.to_string()
    } else {
        format!("{method}()")
    }
}

fn associations(data: &ClassData) -> Vec<(usize, usize, String)> {
    let names: Vec<String> = data.classes.keys().map(|name| name.to_ascii_lowercase()).collect();
    let mut links = Vec::new();
    for (owner, members) in data.classes.values().enumerate() {
        for attribute in &members.attributes {
            let Some(ty) = associated_type(attribute) else {
                continue;
            };
            let Some(target) = names.iter().position(|name| *name == ty) else {
                continue;
            };
            if target != owner && !links.iter().any(|(a, b, _)| *a == owner && *b == target) {
                let label = attribute
                    .split(':')
                    .next()
                    .unwrap_or(attribute)
                    .trim()
                    .to_string();
                links.push((owner, target, label));
            }
        }
    }
    links
}

pub(super) fn compute_class_layout(data: &ClassData) -> Result<Layout, RenderError> {
    let count = data.classes.len();
    if count == 0 {
        return Err(RenderError::insufficient(DiagramKind::Class, "at least one class"));
    }

    let columns = count.min(MAX_COLUMNS);
    let grid_width = columns as f32 * BOX_WIDTH + (columns - 1) as f32 * COLUMN_GAP;
    let width = MIN_WIDTH.max(grid_width + 160.0);
    let left = (width - grid_width) / 2.0;

    let heights: Vec<f32> = data.classes.values().map(box_height).collect();
    let mut boxes = Vec::with_capacity(count);
    let mut row_top = HEADER_HEIGHT + 40.0;
    for row in heights.chunks(columns) {
        let tallest = row.iter().copied().fold(0.0, f32::max);
        for (col, height) in row.iter().enumerate() {
            boxes.push(ClassBox {
                x: left + col as f32 * (BOX_WIDTH + COLUMN_GAP),
                y: row_top,
                height: *height,
            });
        }
        row_top += tallest + ROW_GAP;
    }
    let height = MIN_HEIGHT.max(row_top - ROW_GAP + 60.0);
    let mut layout = Layout::new(DiagramKind::Class, width, height);

    for (owner, target, label) in associations(data) {
        let (from, to) = (&boxes[owner], &boxes[target]);
        let Some((start, end)) = clipped_segment(
            from.center(),
            Footprint::rect(BOX_WIDTH, from.height),
            to.center(),
            Footprint::rect(BOX_WIDTH, to.height),
        ) else {
            continue;
        };
        layout.push(
            LineShape::new(start, end)
                .stroke(Paint::Accent, 2.0)
                .marker(Marker::Hollow)
                .class("association"),
        );
        push_edge_label(&mut layout, midpoint(start, end), &label, 16);
    }

    let member_chars = chars_fitting(BOX_WIDTH / 2.0 - 20.0, 11.0);
    for ((name, members), class_box) in data.classes.iter().zip(&boxes) {
        let ClassBox { x, y, height } = *class_box;
        layout.push(
            RectShape::new(x, y, BOX_WIDTH, height)
                .rx(10.0)
                .fill(Paint::Surface)
                .stroke(Paint::Primary, 2.0)
                .effect(Effect::Shadow)
                .class("class-box"),
        );
        layout.push(
            RectShape::new(x, y, BOX_WIDTH, NAME_BAND)
                .rx(10.0)
                .fill(Paint::Gradient)
                .class("class-header"),
        );
        layout.push(
            TextShape::new(x + BOX_WIDTH / 2.0, y + 26.0, truncate(name, 30))
                .size(16.0)
                .weight(700)
                .fill(Paint::OnPrimary)
                .class("class-name"),
        );
        layout.push(
            LineShape::new((x + BOX_WIDTH / 2.0, y + NAME_BAND + 6.0), (x + BOX_WIDTH / 2.0, y + height - 8.0))
                .stroke(Paint::Line, 1.0)
                .opacity(0.6),
        );

        let first_row = y + NAME_BAND + 22.0;
        for (row, attribute) in members.attributes.iter().enumerate() {
            layout.push(
                TextShape::new(x + 12.0, first_row + row as f32 * MEMBER_PITCH, truncate(&format!("+ {attribute}"), member_chars))
                    .size(11.0)
                    .anchor(Anchor::Start)
                    .class("class-attribute"),
            );
        }
        for (row, method) in members.methods.iter().enumerate() {
            layout.push(
                TextShape::new(
                    x + BOX_WIDTH / 2.0 + 12.0,
                    first_row + row as f32 * MEMBER_PITCH,
                    truncate(&method_signature(method), member_chars),
                )
                .size(11.0)
                .anchor(Anchor::Start)
                .fill(Paint::Primary)
                .class("class-method"),
            );
        }
    }

    Ok(layout)
}
