use super::*;

const WIDTH: f32 = 1400.0;
const MIN_HEIGHT: f32 = 600.0;
const CHART_X: f32 = 300.0;
const RIGHT_MARGIN: f32 = 50.0;
const AXIS_UNITS: i64 = 12;
const FIRST_ROW_Y: f32 = 140.0;
const ROW_PITCH: f32 = 60.0;
const BAR_HEIGHT: f32 = 40.0;

struct Bar<'a> {
    name: &'a str,
    task: &'a GanttTask,
    x: f32,
    width: f32,
    y: f32,
}

/// Dependencies may name a task by its full key or the part before " (".
fn resolve_dependency(bars: &[Bar<'_>], dependency: &str) -> Option<usize> {
    let wanted = dependency.trim();
    bars.iter()
        .position(|bar| bar.name == wanted)
        .or_else(|| bars.iter().position(|bar| short_name(bar.name) == short_name(wanted)))
}

fn short_name(name: &str) -> &str {
    name.split(" (").next().unwrap_or(name).trim()
}

/// Start and duration in axis units, kept inside the 12-unit axis.
fn clamp_to_axis(task: &GanttTask) -> (i64, i64) {
    let start = task.start.clamp(1, AXIS_UNITS);
    let duration = task.duration.clamp(1, AXIS_UNITS - start + 1);
    (start, duration)
}

pub(super) fn compute_gantt_layout(data: &GanttData) -> Result<Layout, RenderError> {
    let count = data.tasks.len();
    if count == 0 {
        return Err(RenderError::insufficient(DiagramKind::Gantt, "at least one task"));
    }

    let unit_width = (WIDTH - CHART_X - RIGHT_MARGIN) / AXIS_UNITS as f32;
    let height = MIN_HEIGHT.max(FIRST_ROW_Y + count as f32 * ROW_PITCH + 60.0);
    let chart_bottom = FIRST_ROW_Y + count as f32 * ROW_PITCH;
    let mut layout = Layout::new(DiagramKind::Gantt, WIDTH, height);

    for tick in 0..=AXIS_UNITS {
        let x = CHART_X + tick as f32 * unit_width;
        layout.push(
            LineShape::new((x, FIRST_ROW_Y - 16.0), (x, chart_bottom))
                .stroke(Paint::Line, 1.0)
                .dashed()
                .opacity(0.4)
                .class("grid"),
        );
        layout.push(
            TextShape::new(x, FIRST_ROW_Y - 24.0, format!("M{}", tick + 1))
                .size(11.0)
                .weight(600)
                .fill(Paint::Muted)
                .class("tick"),
        );
    }

    let bars: Vec<Bar<'_>> = data
        .tasks
        .iter()
        .enumerate()
        .map(|(idx, (name, task))| {
            let (start, duration) = clamp_to_axis(task);
            Bar {
                name: name.as_str(),
                task,
                x: CHART_X + (start - 1) as f32 * unit_width,
                width: duration as f32 * unit_width,
                y: FIRST_ROW_Y + idx as f32 * ROW_PITCH + (ROW_PITCH - BAR_HEIGHT) / 2.0,
            }
        })
        .collect();

    for (idx, bar) in bars.iter().enumerate() {
        if idx % 2 == 1 {
            layout.push(
                RectShape::new(20.0, FIRST_ROW_Y + idx as f32 * ROW_PITCH, WIDTH - 40.0, ROW_PITCH)
                    .fill(Paint::Primary)
                    .opacity(0.05)
                    .class("row-band"),
            );
        }
        let label_y = bar.y + BAR_HEIGHT / 2.0;
        layout.push(
            TextShape::new(40.0, label_y - 2.0, truncate(bar.name, 30))
                .size(14.0)
                .weight(700)
                .anchor(Anchor::Start)
                .class("task-name"),
        );
        if !bar.task.description.is_empty() {
            layout.push(
                TextShape::new(40.0, label_y + 14.0, truncate(&bar.task.description, 38))
                    .size(11.0)
                    .anchor(Anchor::Start)
                    .fill(Paint::Muted),
            );
        }
    }

    for (idx, bar) in bars.iter().enumerate() {
        for dependency in &bar.task.dependencies {
            let Some(parent) = resolve_dependency(&bars, dependency) else {
                continue;
            };
            if parent == idx {
                continue;
            }
            let from = &bars[parent];
            let (x1, y1) = (from.x + from.width, from.y + BAR_HEIGHT / 2.0);
            let (x2, y2) = (bar.x, bar.y + BAR_HEIGHT / 2.0);
            let elbow = x1 + 12.0;
            let d = format!(
                "M {x1:.2} {y1:.2} H {elbow:.2} V {y2:.2} H {:.2}",
                x2.max(elbow + 8.0) - 2.0
            );
            layout.push(
                PathShape::new(d)
                    .stroke(Paint::Accent, 1.8)
                    .dashed()
                    .marker(Marker::Arrow)
                    .class("dependency"),
            );
        }
    }

    for bar in &bars {
        layout.push(
            RectShape::new(bar.x, bar.y, bar.width, BAR_HEIGHT)
                .rx(8.0)
                .fill(Paint::Gradient)
                .effect(Effect::Shadow)
                .class("bar"),
        );
        layout.push(
            TextShape::new(
                bar.x + bar.width / 2.0,
                bar.y + BAR_HEIGHT / 2.0 + 5.0,
                format!("{}M", clamp_to_axis(bar.task).1),
            )
            .size(13.0)
            .weight(700)
            .fill(Paint::OnPrimary)
            .class("bar-label"),
        );
    }

    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn task(start: i64, duration: i64, dependencies: &[&str]) -> GanttTask {
        GanttTask {
            description: "work".to_string(),
            dependencies: dependencies.iter().map(|d| d.to_string()).collect(),
            start,
            duration,
        }
    }

    fn bars(layout: &Layout) -> Vec<(f32, f32)> {
        layout
            .elements
            .iter()
            .filter_map(|el| match el {
                Element::Rect(r) if r.class == Some("bar") => Some((r.x, r.width)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn bars_follow_the_time_axis() {
        let mut tasks = IndexMap::new();
        tasks.insert("Planning (2 weeks)".to_string(), task(1, 2, &[]));
        tasks.insert("Design (3 weeks)".to_string(), task(3, 3, &["Planning"]));
        let layout = compute_gantt_layout(&GanttData { tasks }).unwrap();
        let unit = (WIDTH - CHART_X - RIGHT_MARGIN) / 12.0;
        assert_eq!(bars(&layout), vec![(CHART_X, 2.0 * unit), (CHART_X + 2.0 * unit, 3.0 * unit)]);
        assert_eq!(layout.count_class("tick"), 13);
        assert_eq!(layout.count_class("dependency"), 1);
    }

    #[test]
    fn unknown_dependencies_are_skipped_and_values_clamped() {
        let mut tasks = IndexMap::new();
        tasks.insert("Build".to_string(), task(0, -3, &["Missing", "Build"]));
        let layout = compute_gantt_layout(&GanttData { tasks }).unwrap();
        let unit = (WIDTH - CHART_X - RIGHT_MARGIN) / 12.0;
        assert_eq!(bars(&layout), vec![(CHART_X, unit)]);
        assert_eq!(layout.count_class("dependency"), 0);
    }

    #[test]
    fn late_tasks_are_clipped_to_the_axis() {
        let mut tasks = IndexMap::new();
        tasks.insert("Long".to_string(), task(10, 8, &[]));
        tasks.insert("Far".to_string(), task(100_000, 2, &[]));
        let layout = compute_gantt_layout(&GanttData { tasks }).unwrap();
        assert_eq!(layout.count_class("tick"), 13);
        let unit = (WIDTH - CHART_X - RIGHT_MARGIN) / 12.0;
        let spans = bars(&layout);
        assert!((spans[0].0 + spans[0].1 - (WIDTH - RIGHT_MARGIN)).abs() < 0.01);
        assert_eq!(spans[1], (CHART_X + 11.0 * unit, unit));
        assert!(layout.elements.len() < 60);
    }

    #[test]
    fn saturated_values_do_not_overflow() {
        let raw = serde_json::json!({"tasks": {"A": {"start": 1e300, "duration": 1e300}, "B": {"start": -1e300}}});
        let data = crate::normalize::normalize(&raw, DiagramKind::Gantt).unwrap();
        let DiagramData::Gantt(gantt) = &data else {
            panic!("expected gantt");
        };
        let layout = compute_gantt_layout(gantt).unwrap();
        let unit = (WIDTH - CHART_X - RIGHT_MARGIN) / 12.0;
        assert_eq!(bars(&layout), vec![(CHART_X + 11.0 * unit, unit), (CHART_X, 2.0 * unit)]);
        assert_eq!(layout.count_class("tick"), 13);
    }
}
