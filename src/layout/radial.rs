use std::f32::consts::PI;

/// Node outline used to clip connectors to the node boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum Footprint {
    Circle(f32),
    Rect { half_width: f32, half_height: f32 },
}

impl Footprint {
    pub(super) fn rect(width: f32, height: f32) -> Self {
        Footprint::Rect {
            half_width: width / 2.0,
            half_height: height / 2.0,
        }
    }
}

/// Position `i` of `count` at angle `i * 360/count` degrees around `center`.
pub(super) fn ring_positions(count: usize, center: (f32, f32), radius: f32) -> Vec<(f32, f32)> {
    if count == 0 {
        return Vec::new();
    }
    let step = 360.0 / count as f32;
    (0..count)
        .map(|i| {
            let angle = (i as f32 * step) * PI / 180.0;
            (center.0 + radius * angle.cos(), center.1 + radius * angle.sin())
        })
        .collect()
}

pub(super) fn boundary_point(center: (f32, f32), toward: (f32, f32), footprint: Footprint) -> (f32, f32) {
    let dx = toward.0 - center.0;
    let dy = toward.1 - center.1;
    let distance = (dx * dx + dy * dy).sqrt();
    if distance <= f32::EPSILON {
        return center;
    }
    let (ux, uy) = (dx / distance, dy / distance);
    let reach = match footprint {
        Footprint::Circle(r) => r,
        Footprint::Rect {
            half_width,
            half_height,
        } => {
            let tx = if ux.abs() > f32::EPSILON { half_width / ux.abs() } else { f32::INFINITY };
            let ty = if uy.abs() > f32::EPSILON { half_height / uy.abs() } else { f32::INFINITY };
            tx.min(ty)
        }
    };
    (center.0 + ux * reach, center.1 + uy * reach)
}

/// Endpoints of a connector between two node outlines, or `None` when they overlap.
pub(super) fn clipped_segment(
    from: (f32, f32),
    from_shape: Footprint,
    to: (f32, f32),
    to_shape: Footprint,
) -> Option<((f32, f32), (f32, f32))> {
    let start = boundary_point(from, to, from_shape);
    let end = boundary_point(to, from, to_shape);
    let forward = (to.0 - from.0, to.1 - from.1);
    let gap = (end.0 - start.0, end.1 - start.1);
    if forward.0 * gap.0 + forward.1 * gap.1 <= 0.0 {
        return None;
    }
    Some((start, end))
}

/// Loop drawn above a node for edges that start and end on the same node.
pub(super) fn self_loop_path(center: (f32, f32), top_offset: f32) -> String {
    let (x, y) = (center.0, center.1 - top_offset);
    format!(
        "M {:.2} {:.2} C {:.2} {:.2} {:.2} {:.2} {:.2} {:.2}",
        x - 18.0,
        y + 4.0,
        x - 40.0,
        y - 60.0,
        x + 40.0,
        y - 60.0,
        x + 18.0,
        y + 4.0
    )
}

pub(super) fn midpoint(a: (f32, f32), b: (f32, f32)) -> (f32, f32) {
    ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0)
}
