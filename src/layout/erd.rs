use super::*;

const MIN_WIDTH: f32 = 1400.0;
const MIN_HEIGHT: f32 = 900.0;
const ENTITY_WIDTH: f32 = 220.0;
const ENTITY_HEIGHT: f32 = 124.0;
const HEADER_BAND: f32 = 36.0;
const ENTITY_SLOT: f32 = 260.0;
const VISIBLE_ATTRIBUTES: usize = 3;

fn attribute_name(attribute: &str) -> String {
    attribute
        .split(|c: char| c.is_whitespace() || c == ':' || c == '(')
        .next()
        .unwrap_or("")
        .to_ascii_lowercase()
}

fn normalized_entity(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_' && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

fn key_marker(attribute: &str) -> Option<&'static str> {
    let lower = attribute.to_ascii_lowercase();
    let name = attribute_name(attribute);
    if name == "id" || lower.contains("(pk)") || lower.contains("primary key") {
        Some("PK")
    } else if name.ends_with("_id") || lower.contains("(fk)") {
        Some("FK")
    } else {
        None
    }
}

/// One-to-many links implied by `<entity>_id` attributes, as (one, many) index pairs.
fn inferred_relationships(data: &ErdData) -> Vec<(usize, usize)> {
    let names: Vec<String> = data.entities.keys().map(|name| normalized_entity(name)).collect();
    let mut links = Vec::new();
    for (many, attributes) in data.entities.values().enumerate() {
        for attribute in attributes {
            let name = attribute_name(attribute);
            let Some(stem) = name.strip_suffix("_id") else {
                continue;
            };
            let stem = normalized_entity(stem);
            if stem.is_empty() {
                continue;
            }
            let target = names.iter().position(|candidate| {
                *candidate == stem
                    || candidate.strip_suffix('s') == Some(stem.as_str())
                    || stem.strip_suffix('s') == Some(candidate.as_str())
            });
            if let Some(one) = target {
                if one != many && !links.contains(&(one, many)) {
                    links.push((one, many));
                }
            }
        }
    }
    links
}

pub(super) fn compute_erd_layout(data: &ErdData) -> Result<Layout, RenderError> {
    let count = data.entities.len();
    if count == 0 {
        return Err(RenderError::insufficient(DiagramKind::Erd, "at least one entity"));
    }

    let radius = (0.35 * MIN_WIDTH.min(MIN_HEIGHT - HEADER_HEIGHT))
        .max(count as f32 * ENTITY_SLOT / std::f32::consts::TAU);
    let width = MIN_WIDTH.max(2.0 * (radius + ENTITY_WIDTH / 2.0 + 60.0));
    let height = MIN_HEIGHT.max(HEADER_HEIGHT + 2.0 * (radius + ENTITY_HEIGHT / 2.0 + 40.0));
    let center = (width / 2.0, HEADER_HEIGHT + (height - HEADER_HEIGHT) / 2.0);
    let positions = if count == 1 {
        vec![center]
    } else {
        ring_positions(count, center, radius)
    };
    let mut layout = Layout::new(DiagramKind::Erd, width, height);

    let footprint = Footprint::rect(ENTITY_WIDTH, ENTITY_HEIGHT);
    for (one, many) in inferred_relationships(data) {
        let Some((start, end)) = clipped_segment(positions[one], footprint, positions[many], footprint) else {
            continue;
        };
        layout.push(
            LineShape::new(start, end)
                .stroke(Paint::Accent, 2.0)
                .marker(Marker::Arrow)
                .class("relationship"),
        );
        push_edge_label(&mut layout, midpoint(start, end), "1:N", 6);
    }

    let attribute_chars = chars_fitting(ENTITY_WIDTH - 56.0, 11.0);
    for ((name, attributes), (cx, cy)) in data.entities.iter().zip(&positions) {
        let x = cx - ENTITY_WIDTH / 2.0;
        let y = cy - ENTITY_HEIGHT / 2.0;
        layout.push(
            RectShape::new(x, y, ENTITY_WIDTH, ENTITY_HEIGHT)
                .rx(10.0)
                .fill(Paint::Surface)
                .stroke(Paint::Primary, 2.0)
                .effect(Effect::Shadow)
                .class("entity"),
        );
        layout.push(
            RectShape::new(x, y, ENTITY_WIDTH, HEADER_BAND)
                .rx(10.0)
                .fill(Paint::Gradient)
                .class("entity-header"),
        );
        layout.push(
            TextShape::new(*cx, y + 24.0, truncate(name, chars_fitting(ENTITY_WIDTH - 20.0, 15.0)))
                .size(15.0)
                .weight(700)
                .fill(Paint::OnPrimary)
                .class("entity-name"),
        );

        for (row, attribute) in attributes.iter().take(VISIBLE_ATTRIBUTES).enumerate() {
            let row_y = y + HEADER_BAND + 22.0 + row as f32 * 18.0;
            if let Some(marker) = key_marker(attribute) {
                layout.push(
                    TextShape::new(x + 12.0, row_y, marker)
                        .size(9.0)
                        .weight(800)
                        .anchor(Anchor::Start)
                        .fill(Paint::Accent)
                        .class("key-marker"),
                );
            }
            layout.push(
                TextShape::new(x + 36.0, row_y, truncate(attribute, attribute_chars))
                    .size(11.0)
                    .anchor(Anchor::Start)
                    .class("attribute"),
            );
        }
        if attributes.len() > VISIBLE_ATTRIBUTES {
            layout.push(
                TextShape::new(
                    x + 36.0,
                    y + HEADER_BAND + 22.0 + VISIBLE_ATTRIBUTES as f32 * 18.0,
                    format!("+{} more", attributes.len() - VISIBLE_ATTRIBUTES),
                )
                .size(10.0)
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
    use indexmap::IndexMap;

    fn erd(entities: &[(&str, &[&str])]) -> ErdData {
        let mut map = IndexMap::new();
        for (name, attributes) in entities {
            map.insert(
                name.to_string(),
                attributes.iter().map(|a| a.to_string()).collect(),
            );
        }
        ErdData { entities: map }
    }

    #[test]
    fn foreign_keys_become_relationships() {
        let data = erd(&[
            ("Customer", &["id", "name"]),
            ("Order", &["id", "customer_id", "total"]),
            ("Order_Item", &["id", "order_id", "product_id"]),
            ("Products", &["id", "price"]),
        ]);
        assert_eq!(inferred_relationships(&data), vec![(0, 1), (1, 2), (3, 2)]);
        let layout = compute_erd_layout(&data).unwrap();
        assert_eq!(layout.count_class("relationship"), 3);
        assert_eq!(layout.count_class("entity"), 4);
    }

    #[test]
    fn self_references_and_unknown_keys_are_ignored() {
        let data = erd(&[("Employee", &["id", "employee_id", "badge_id"])]);
        assert!(inferred_relationships(&data).is_empty());
        let layout = compute_erd_layout(&data).unwrap();
        assert_eq!(layout.count_class("relationship"), 0);
    }

    #[test]
    fn marks_primary_and_foreign_keys() {
        assert_eq!(key_marker("id"), Some("PK"));
        assert_eq!(key_marker("customer_id"), Some("FK"));
        assert_eq!(key_marker("email"), None);
    }

    #[test]
    fn long_attribute_lists_are_capped() {
        let data = erd(&[("Wide", &["a", "b", "c", "d", "e"])]);
        let layout = compute_erd_layout(&data).unwrap();
        assert_eq!(layout.count_class("attribute"), VISIBLE_ATTRIBUTES);
    }
}
