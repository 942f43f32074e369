//! Canned, topic-flavored diagram data used whenever the model is unavailable
//! or its answer cannot be repaired.

use crate::ir::*;
use indexmap::IndexMap;

pub fn fallback_data(kind: DiagramKind, topic: &str) -> DiagramData {
    (crate::registry::spec_for(kind).fallback)(topic.trim())
}

fn steps(entries: &[(&str, String)]) -> IndexMap<String, Vec<String>> {
    entries
        .iter()
        .map(|(name, description)| (name.to_string(), vec![description.clone()]))
        .collect()
}

fn text_map(entries: &[(&str, String)]) -> IndexMap<String, String> {
    entries
        .iter()
        .map(|(name, text)| (name.to_string(), text.clone()))
        .collect()
}

fn link(from: &str, to: &str, label: &str) -> Link {
    Link {
        from: from.to_string(),
        to: to.to_string(),
        label: label.to_string(),
    }
}

pub(crate) fn flowchart(topic: &str) -> DiagramData {
    DiagramData::Flowchart(FlowchartData {
        steps: steps(&[
            ("Start", format!("Begin {topic} process")),
            ("Plan", format!("Plan and prepare for {topic}")),
            ("Execute", format!("Execute {topic} activities")),
            ("Review", format!("Review {topic} results")),
            ("Complete", format!("Complete {topic} process")),
        ]),
    })
}

pub(crate) fn sequence(topic: &str) -> DiagramData {
    let interaction = |from: &str, to: &str, message: String, order| Interaction {
        from: from.to_string(),
        to: to.to_string(),
        message,
        order,
    };
    DiagramData::Sequence(SequenceData {
        actors: text_map(&[
            ("User", format!("Person using {topic}")),
            ("System", format!("System handling {topic}")),
            ("Database", format!("Data store for {topic}")),
        ]),
        interactions: vec![
            interaction("User", "System", format!("Request {topic}"), 1),
            interaction("System", "Database", "Query data".to_string(), 2),
            interaction("Database", "System", "Return results".to_string(), 3),
            interaction("System", "User", format!("Display {topic}"), 4),
        ],
    })
}

pub(crate) fn state(topic: &str) -> DiagramData {
    let transition = |from: &str, to: &str, trigger: &str, order| Transition {
        from: from.to_string(),
        to: to.to_string(),
        trigger: trigger.to_string(),
        order,
    };
    DiagramData::State(StateData {
        states: text_map(&[
            ("Initial", format!("Starting state for {topic}")),
            ("Processing", format!("Processing {topic}")),
            ("Complete", format!("Completed {topic}")),
            ("Error", format!("Error in {topic}")),
        ]),
        transitions: vec![
            transition("Initial", "Processing", "Start", 1),
            transition("Processing", "Complete", "Success", 2),
            transition("Processing", "Error", "Failure", 3),
        ],
    })
}

pub(crate) fn mindmap(topic: &str) -> DiagramData {
    DiagramData::Mindmap(MindmapData {
        central_topic: topic.split_whitespace().next().unwrap_or("Topic").to_string(),
        branches: steps(&[
            ("Key Features", format!("Main features of {topic}")),
            ("Benefits", format!("Benefits of {topic}")),
            ("Challenges", format!("Challenges with {topic}")),
            ("Implementation", format!("How to implement {topic}")),
            ("Future", format!("Future of {topic}")),
        ]),
    })
}

pub(crate) fn swot(topic: &str) -> DiagramData {
    DiagramData::Swot(SwotData {
        strengths: vec![
            format!("Strong foundation in {topic}"),
            format!("Clear vision for {topic}"),
        ],
        weaknesses: vec![
            format!("Limited experience with {topic}"),
            format!("Resource constraints for {topic}"),
        ],
        opportunities: vec![
            format!("Growing market for {topic}"),
            format!("Innovation potential in {topic}"),
        ],
        threats: vec![
            format!("Competition in {topic} space"),
            format!("Regulatory changes affecting {topic}"),
        ],
    })
}

pub(crate) fn timeline(topic: &str) -> DiagramData {
    DiagramData::Timeline(TimelineData {
        events: text_map(&[
            ("Phase 1", format!("Initial planning for {topic}")),
            ("Phase 2", format!("Development of {topic}")),
            ("Phase 3", format!("Testing {topic}")),
            ("Phase 4", format!("Launch {topic}")),
            ("Phase 5", format!("Monitor {topic}")),
        ]),
    })
}

fn gantt_task(description: String, dependencies: &[&str], start: i64, duration: i64) -> GanttTask {
    GanttTask {
        description,
        dependencies: dependencies.iter().map(|d| d.to_string()).collect(),
        start,
        duration,
    }
}

pub(crate) fn gantt(topic: &str) -> DiagramData {
    let mut tasks = IndexMap::new();
    tasks.insert(
        "Planning (2 weeks)".to_string(),
        gantt_task(format!("Plan {topic} project"), &[], 1, 2),
    );
    tasks.insert(
        "Design (3 weeks)".to_string(),
        gantt_task(format!("Design {topic} solution"), &["Planning"], 3, 3),
    );
    tasks.insert(
        "Development (4 weeks)".to_string(),
        gantt_task(format!("Develop {topic}"), &["Design"], 6, 4),
    );
    tasks.insert(
        "Testing (2 weeks)".to_string(),
        gantt_task(format!("Test {topic}"), &["Development"], 10, 2),
    );
    tasks.insert(
        "Deployment (1 week)".to_string(),
        gantt_task(format!("Deploy {topic}"), &["Testing"], 12, 1),
    );
    DiagramData::Gantt(GanttData { tasks })
}

pub(crate) fn journey(topic: &str) -> DiagramData {
    let stages = [
        ("Awareness", format!("Learn about {topic}"), "Curious", "Information overload"),
        ("Consideration", format!("Evaluate {topic}"), "Analytical", "Too many options"),
        ("Purchase", format!("Choose {topic}"), "Confident", "Complex process"),
        ("Usage", format!("Use {topic}"), "Satisfied", "Learning curve"),
    ];
    let touchpoints = stages
        .into_iter()
        .enumerate()
        .map(|(idx, (name, action, emotion, pain))| {
            (
                name.to_string(),
                Touchpoint {
                    action,
                    emotion: emotion.to_string(),
                    pain_points: vec![pain.to_string()],
                    order: idx as i64 + 1,
                },
            )
        })
        .collect();
    DiagramData::Journey(JourneyData { touchpoints })
}

fn attributes(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

pub(crate) fn erd(topic: &str) -> DiagramData {
    let mut entities = IndexMap::new();
    entities.insert("User".to_string(), attributes(&["user_id", "name", "email", "created_date"]));
    entities.insert(
        topic.replace(' ', "_"),
        attributes(&["id", "name", "description", "status"]),
    );
    entities.insert("Category".to_string(), attributes(&["category_id", "name", "description"]));
    entities.insert(
        "Transaction".to_string(),
        attributes(&["transaction_id", "user_id", "amount", "date"]),
    );
    DiagramData::Erd(ErdData { entities })
}

pub(crate) fn class(topic: &str) -> DiagramData {
    let stem: String = topic.chars().filter(|c| *c != ' ').collect();
    let members = |attrs: &[&str], methods: &[&str]| ClassMembers {
        attributes: attributes(attrs),
        methods: attributes(methods),
    };
    let mut classes = IndexMap::new();
    classes.insert(
        format!("{stem}Manager"),
        members(
            &["id: int", "name: string", "status: string"],
            &["create()", "update()", "delete()", "find()"],
        ),
    );
    classes.insert(
        format!("{stem}Model"),
        members(&["data: object", "validation: rules"], &["validate()", "save()", "load()"]),
    );
    classes.insert(
        format!("{stem}View"),
        members(&["template: string", "context: object"], &["render()", "update()", "refresh()"]),
    );
    DiagramData::Class(ClassData { classes })
}

pub(crate) fn network(topic: &str) -> DiagramData {
    DiagramData::Network(NetworkData {
        nodes: text_map(&[
            ("Client", "User device".to_string()),
            ("Router", "Network router".to_string()),
            ("Server", format!("{topic} server")),
            ("Database", "Data storage".to_string()),
        ]),
        connections: vec![
            link("Client", "Router", "HTTP"),
            link("Router", "Server", "TCP/IP"),
            link("Server", "Database", "SQL"),
        ],
    })
}

pub(crate) fn architecture(topic: &str) -> DiagramData {
    DiagramData::Architecture(ArchitectureData {
        components: text_map(&[
            ("Presentation Layer", format!("User interface for {topic}")),
            ("Business Logic", format!("Core logic for {topic}")),
            ("Data Access", format!("Data layer for {topic}")),
            ("Database", format!("Storage for {topic}")),
        ]),
        relationships: vec![
            link("Presentation Layer", "Business Logic", "calls"),
            link("Business Logic", "Data Access", "uses"),
            link("Data Access", "Database", "queries"),
        ],
    })
}

/// Reshapes canned data so the four variation styles differ in structure,
/// not only in color. Kinds without a rule pass through unchanged.
pub fn customize_for_style(data: DiagramData, style: VariationStyle, topic: &str) -> DiagramData {
    match (data, style) {
        (data, VariationStyle::Standard) => data,
        (DiagramData::Flowchart(d), style) => DiagramData::Flowchart(flowchart_style(d, style, topic)),
        (DiagramData::Mindmap(d), style) => DiagramData::Mindmap(mindmap_style(d, style, topic)),
        (DiagramData::Sequence(d), style) => DiagramData::Sequence(sequence_style(d, style, topic)),
        (DiagramData::Swot(d), style) => DiagramData::Swot(swot_style(d, style, topic)),
        (DiagramData::Timeline(d), style) => DiagramData::Timeline(timeline_style(d, style, topic)),
        (DiagramData::Gantt(d), style) => DiagramData::Gantt(gantt_style(d, style, topic)),
        (data, _) => data,
    }
}

fn flowchart_style(mut data: FlowchartData, style: VariationStyle, topic: &str) -> FlowchartData {
    let is_start = |key: &str| key.contains("Start") || key.contains("Initialize");
    let is_work = |key: &str| key.contains("Process") || key.contains("Implement");
    let is_end = |key: &str| key.contains("End") || key.contains("Complete");
    match style {
        VariationStyle::Detailed => {
            let mut detailed = IndexMap::new();
            for (key, value) in data.steps {
                let lower = key.to_lowercase();
                let mut extra = Vec::new();
                if is_start(key.as_str()) {
                    extra.push((format!("{key} - Pre-checks"), format!("Validate prerequisites for {topic}")));
                }
                if is_work(key.as_str()) {
                    extra.push((format!("{key} - Validation"), format!("Quality check for {lower}")));
                    extra.push((format!("{key} - Documentation"), format!("Document progress of {lower}")));
                }
                if is_end(key.as_str()) {
                    extra.push((format!("{key} - Cleanup"), format!("Finalize and cleanup after {topic}")));
                }
                detailed.insert(key, value);
                for (name, description) in extra {
                    detailed.insert(name, vec![description]);
                }
            }
            data.steps = detailed;
        }
        VariationStyle::Compact => {
            data.steps = data
                .steps
                .into_iter()
                .enumerate()
                .filter(|(idx, (key, _))| *idx < 3 || is_end(key.as_str()))
                .map(|(_, entry)| entry)
                .collect();
        }
        VariationStyle::Enhanced => {
            for (name, description) in [
                ("Risk Assessment", format!("Evaluate potential risks for {topic}")),
                ("Quality Gate", format!("Quality checkpoint for {topic}")),
                ("Alternative Path", format!("Backup approach for {topic}")),
                ("Success Metrics", format!("Define success criteria for {topic}")),
            ] {
                data.steps.insert(name.to_string(), vec![description]);
            }
        }
        VariationStyle::Standard => {}
    }
    data
}

fn mindmap_style(mut data: MindmapData, style: VariationStyle, topic: &str) -> MindmapData {
    match style {
        VariationStyle::Detailed => {
            for (name, concepts) in data.branches.iter_mut() {
                if concepts.is_empty() {
                    continue;
                }
                let lower = name.to_lowercase();
                concepts.push(format!("Detailed analysis of {lower}"));
                concepts.push(format!("Implementation steps for {lower}"));
                concepts.push(format!("Success metrics for {lower}"));
            }
        }
        VariationStyle::Compact => {
            data.branches = data
                .branches
                .into_iter()
                .take(3)
                .map(|(name, mut concepts)| {
                    concepts.truncate(2);
                    (name, concepts)
                })
                .collect();
        }
        VariationStyle::Enhanced => {
            for (name, concept) in [
                ("Innovation Opportunities", format!("Creative solutions for {topic}")),
                ("Future Vision", format!("Long-term goals for {topic}")),
                ("Risk Mitigation", format!("Potential challenges in {topic}")),
                ("Success Factors", format!("Key elements for success in {topic}")),
            ] {
                data.branches.insert(name.to_string(), vec![concept]);
            }
        }
        VariationStyle::Standard => {}
    }
    data
}

fn sequence_style(mut data: SequenceData, style: VariationStyle, topic: &str) -> SequenceData {
    let additions: Vec<(&str, &str, String)> = match style {
        VariationStyle::Detailed => {
            data.actors.entry("System".to_string()).or_insert_with(|| "Core System".to_string());
            data.actors.entry("Logger".to_string()).or_insert_with(|| "Audit Logger".to_string());
            vec![
                ("System", "Logger", format!("Log start of {topic}")),
                ("Logger", "System", "Confirm logging".to_string()),
                ("System", "Logger", format!("Log completion of {topic}")),
            ]
        }
        VariationStyle::Enhanced => {
            data.actors
                .entry("ErrorHandler".to_string())
                .or_insert_with(|| "Error Management".to_string());
            data.actors
                .entry("Monitor".to_string())
                .or_insert_with(|| "Performance Monitor".to_string());
            vec![
                ("System", "ErrorHandler", "Handle exceptions".to_string()),
                ("ErrorHandler", "System", "Return error response".to_string()),
                ("System", "Monitor", format!("Track performance of {topic}")),
            ]
        }
        VariationStyle::Compact => {
            data.interactions.truncate(4);
            Vec::new()
        }
        VariationStyle::Standard => Vec::new(),
    };
    // Added messages continue after the last existing order.
    let mut order = data.interactions.iter().map(|i| i.order).max().unwrap_or(0);
    for (from, to, message) in additions {
        order += 1;
        data.interactions.push(Interaction {
            from: from.to_string(),
            to: to.to_string(),
            message,
            order,
        });
    }
    data
}

fn swot_style(mut data: SwotData, style: VariationStyle, topic: &str) -> SwotData {
    for (key, items) in data.quadrants_mut() {
        let singular = match key {
            "strengths" => "strength",
            "weaknesses" => "weakness",
            "opportunities" => "opportunity",
            _ => "threat",
        };
        match style {
            VariationStyle::Detailed => {
                items.push(format!("Internal {singular} factor for {topic}"));
                items.push(format!("Market-related {singular} in {topic}"));
                items.push(format!("Long-term {singular} consideration"));
            }
            VariationStyle::Compact => items.truncate(2),
            VariationStyle::Enhanced => {
                items.push(format!("Strategic action for {key}: Leverage for {topic}"));
            }
            VariationStyle::Standard => {}
        }
    }
    data
}

fn timeline_style(mut data: TimelineData, style: VariationStyle, topic: &str) -> TimelineData {
    match style {
        VariationStyle::Detailed => {
            let originals: Vec<(String, String)> = data
                .events
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            for (key, value) in originals {
                data.events.insert(format!("{key} - Preparation"), format!("Prepare for {value}"));
                data.events.insert(format!("{key} - Review"), format!("Review outcomes of {value}"));
            }
        }
        VariationStyle::Compact => data.events.truncate(4),
        VariationStyle::Enhanced => {
            for (name, description) in [
                ("Risk Checkpoint", format!("Assess risks for {topic}")),
                ("Quality Gate", format!("Quality review for {topic}")),
                ("Success Validation", format!("Validate success of {topic}")),
            ] {
                data.events.insert(name.to_string(), description);
            }
        }
        VariationStyle::Standard => {}
    }
    data
}

fn gantt_style(mut data: GanttData, style: VariationStyle, topic: &str) -> GanttData {
    match style {
        VariationStyle::Detailed => {
            let originals: Vec<(String, i64, i64)> = data
                .tasks
                .iter()
                .map(|(name, task)| (name.clone(), task.start.max(1), task.duration.max(1)))
                .collect();
            for (name, start, duration) in originals {
                data.tasks.insert(
                    format!("{name} - Planning"),
                    gantt_task(format!("Plan for {name}"), &[], start, 1),
                );
                data.tasks.insert(
                    format!("{name} - Review"),
                    gantt_task(format!("Review {name}"), &[name.as_str()], start + duration, 1),
                );
            }
        }
        VariationStyle::Compact => data.tasks.truncate(3),
        VariationStyle::Enhanced => {
            data.tasks.insert(
                "Risk Management".to_string(),
                gantt_task(format!("Manage risks for {topic}"), &[], 1, 12),
            );
            data.tasks.insert(
                "Quality Assurance".to_string(),
                gantt_task(format!("Ensure quality for {topic}"), &[], 1, 12),
            );
        }
        VariationStyle::Standard => {}
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flowchart_steps(data: &DiagramData) -> Vec<String> {
        match data {
            DiagramData::Flowchart(d) => d.steps.keys().cloned().collect(),
            other => panic!("expected flowchart, got {:?}", other.kind()),
        }
    }

    #[test]
    fn flowchart_mentions_topic() {
        let DiagramData::Flowchart(data) = fallback_data(DiagramKind::Flowchart, "widget manufacturing") else {
            panic!("wrong kind");
        };
        assert!(data
            .steps
            .values()
            .flatten()
            .any(|description| description.contains("widget manufacturing")));
    }

    #[test]
    fn mindmap_center_is_first_word() {
        let DiagramData::Mindmap(data) = fallback_data(DiagramKind::Mindmap, "urban gardening") else {
            panic!("wrong kind");
        };
        assert_eq!(data.central_topic, "urban");
        let DiagramData::Mindmap(empty) = mindmap("") else {
            panic!("wrong kind");
        };
        assert_eq!(empty.central_topic, "Topic");
    }

    #[test]
    fn flowchart_styles_change_structure() {
        let base = fallback_data(DiagramKind::Flowchart, "payroll");
        let detailed = customize_for_style(base.clone(), VariationStyle::Detailed, "payroll");
        assert_eq!(
            flowchart_steps(&detailed),
            vec![
                "Start",
                "Start - Pre-checks",
                "Plan",
                "Execute",
                "Review",
                "Complete",
                "Complete - Cleanup"
            ]
        );
        let compact = customize_for_style(base.clone(), VariationStyle::Compact, "payroll");
        assert_eq!(flowchart_steps(&compact), vec!["Start", "Plan", "Execute", "Complete"]);
        let enhanced = customize_for_style(base.clone(), VariationStyle::Enhanced, "payroll");
        assert_eq!(flowchart_steps(&enhanced).len(), 9);
        assert_eq!(customize_for_style(base.clone(), VariationStyle::Standard, "payroll"), base);
    }

    #[test]
    fn sequence_additions_keep_ascending_order() {
        let data = customize_for_style(fallback_data(DiagramKind::Sequence, "checkout"), VariationStyle::Enhanced, "checkout");
        let DiagramData::Sequence(seq) = data else {
            panic!("wrong kind");
        };
        let orders: Vec<i64> = seq.interactions.iter().map(|i| i.order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4, 5, 6, 7]);
        assert!(seq.actors.contains_key("ErrorHandler"));
        assert!(seq.actors.contains_key("Monitor"));
    }

    #[test]
    fn gantt_detail_tasks_are_scheduled() {
        let data = customize_for_style(fallback_data(DiagramKind::Gantt, "app"), VariationStyle::Detailed, "app");
        let DiagramData::Gantt(gantt) = data else {
            panic!("wrong kind");
        };
        let review = &gantt.tasks["Design (3 weeks) - Review"];
        assert_eq!((review.start, review.duration), (6, 1));
        assert_eq!(review.dependencies, vec!["Design (3 weeks)".to_string()]);
        assert_eq!(gantt.tasks.len(), 15);
    }

    #[test]
    fn kinds_without_rules_pass_through() {
        let erd = fallback_data(DiagramKind::Erd, "library");
        assert_eq!(customize_for_style(erd.clone(), VariationStyle::Compact, "library"), erd);
    }
}
