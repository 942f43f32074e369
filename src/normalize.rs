use crate::error::SchemaError;
use crate::ir::*;
use indexmap::IndexMap;
use serde_json::{Map, Value};

type Object = Map<String, Value>;

pub fn normalize(raw: &Value, kind: DiagramKind) -> Result<DiagramData, SchemaError> {
    let obj = raw.as_object().ok_or(SchemaError::NotAnObject { kind })?;
    (crate::registry::spec_for(kind).normalize)(obj)
}

pub(crate) fn flowchart(obj: &Object) -> Result<DiagramData, SchemaError> {
    let kind = DiagramKind::Flowchart;
    let source = mapping_or_missing(obj, &["steps", "blocks", "nodes"], kind, "steps")?;
    let steps: IndexMap<String, Vec<String>> = named_entries(source)
        .map(|(name, value)| (name, string_list(value)))
        .collect();
    if steps.len() < 2 {
        return Err(SchemaError::TooFew {
            kind,
            key: "steps",
            min: 2,
            found: steps.len(),
        });
    }
    Ok(DiagramData::Flowchart(FlowchartData { steps }))
}

pub(crate) fn sequence(obj: &Object) -> Result<DiagramData, SchemaError> {
    let kind = DiagramKind::Sequence;
    if obj.contains_key("actors") && obj.contains_key("interactions") {
        let actors = expect_mapping(obj, "actors", kind)?;
        let interactions = expect_list(obj, "interactions", kind)?;
        let actors = named_entries(actors)
            .map(|(name, value)| (name, text_of(value).unwrap_or_default()))
            .collect();
        let interactions = edge_records(interactions)
            .map(|edge| Interaction {
                message: edge.text(&["message", "label", "trigger"]),
                from: edge.from,
                to: edge.to,
                order: edge.order,
            })
            .collect();
        return Ok(DiagramData::Sequence(SequenceData { actors, interactions }));
    }

    let Some(steps) = steps_outline(obj) else {
        let key = if obj.contains_key("actors") { "interactions" } else { "actors" };
        return Err(SchemaError::MissingKey { kind, key });
    };
    let mut actors = IndexMap::new();
    let mut interactions = Vec::new();
    for (idx, (name, first_line)) in steps.iter().enumerate() {
        actors.insert(name.clone(), first_line.clone().unwrap_or_else(|| name.clone()));
        if idx > 0 {
            interactions.push(Interaction {
                from: steps[idx - 1].0.clone(),
                to: name.clone(),
                message: first_line.clone().unwrap_or_else(|| name.clone()),
                order: idx as i64,
            });
        }
    }
    Ok(DiagramData::Sequence(SequenceData { actors, interactions }))
}

pub(crate) fn state(obj: &Object) -> Result<DiagramData, SchemaError> {
    let kind = DiagramKind::State;
    if obj.contains_key("states") && obj.contains_key("transitions") {
        let states = expect_mapping(obj, "states", kind)?;
        let transitions = expect_list(obj, "transitions", kind)?;
        let states = named_entries(states)
            .map(|(name, value)| (name, text_of(value).unwrap_or_default()))
            .collect();
        let transitions = edge_records(transitions)
            .map(|edge| Transition {
                trigger: edge.text(&["trigger", "event", "label", "message"]),
                from: edge.from,
                to: edge.to,
                order: edge.order,
            })
            .collect();
        return Ok(DiagramData::State(StateData { states, transitions }));
    }

    let Some(steps) = steps_outline(obj) else {
        let key = if obj.contains_key("states") { "transitions" } else { "states" };
        return Err(SchemaError::MissingKey { kind, key });
    };
    let mut states = IndexMap::new();
    let mut transitions = Vec::new();
    for (idx, (name, first_line)) in steps.iter().enumerate() {
        states.insert(name.clone(), first_line.clone().unwrap_or_else(|| name.clone()));
        if idx > 0 {
            transitions.push(Transition {
                from: steps[idx - 1].0.clone(),
                to: name.clone(),
                trigger: "Next step".to_string(),
                order: idx as i64,
            });
        }
    }
    Ok(DiagramData::State(StateData { states, transitions }))
}

pub(crate) fn mindmap(obj: &Object) -> Result<DiagramData, SchemaError> {
    let kind = DiagramKind::Mindmap;
    let central_topic = ["central_topic", "center"]
        .iter()
        .find_map(|key| obj.get(*key).and_then(text_of))
        .ok_or(SchemaError::MissingKey {
            kind,
            key: "central_topic",
        })?;
    let branches = mapping_or_missing(obj, &["branches", "topics"], kind, "branches")?;
    let branches = named_entries(branches)
        .map(|(name, value)| (name, string_list(value)))
        .collect();
    Ok(DiagramData::Mindmap(MindmapData {
        central_topic,
        branches,
    }))
}

pub(crate) fn swot(obj: &Object) -> Result<DiagramData, SchemaError> {
    let mut data = SwotData::default();
    let mut seen = false;
    for (key, items) in data.quadrants_mut() {
        if let Some(value) = obj.get(key) {
            seen = true;
            *items = string_list(value);
        }
    }
    if !seen {
        return Err(SchemaError::MissingKey {
            kind: DiagramKind::Swot,
            key: "strengths|weaknesses|opportunities|threats",
        });
    }
    Ok(DiagramData::Swot(data))
}

pub(crate) fn timeline(obj: &Object) -> Result<DiagramData, SchemaError> {
    let kind = DiagramKind::Timeline;
    let source = mapping_or_missing(obj, &["events", "phases", "milestones"], kind, "events")?;
    let events = named_entries(source)
        .map(|(name, value)| (name, text_of(value).unwrap_or_default()))
        .collect();
    Ok(DiagramData::Timeline(TimelineData { events }))
}

pub(crate) fn gantt(obj: &Object) -> Result<DiagramData, SchemaError> {
    let kind = DiagramKind::Gantt;
    if let Some(source) = first_mapping(obj, &["tasks"]) {
        let tasks = named_entries(source)
            .map(|(name, value)| {
                let task = match value.as_object() {
                    Some(task) => GanttTask {
                        description: task.get("description").and_then(text_of).unwrap_or_default(),
                        dependencies: task.get("dependencies").map(string_list).unwrap_or_default(),
                        start: task.get("start").and_then(integer).unwrap_or(1),
                        duration: task.get("duration").and_then(integer).unwrap_or(2),
                    },
                    None => synthesized_task(text_of(value).unwrap_or_default()),
                };
                (name, task)
            })
            .collect();
        return Ok(DiagramData::Gantt(GanttData { tasks }));
    }
    if let Some(events) = first_mapping(obj, &["events"]) {
        let tasks = named_entries(events)
            .map(|(name, value)| (name, synthesized_task(text_of(value).unwrap_or_default())))
            .collect();
        return Ok(DiagramData::Gantt(GanttData { tasks }));
    }
    Err(missing_or_wrong(obj, kind, "tasks"))
}

fn synthesized_task(description: String) -> GanttTask {
    GanttTask {
        description,
        dependencies: Vec::new(),
        start: 1,
        duration: 2,
    }
}

pub(crate) fn journey(obj: &Object) -> Result<DiagramData, SchemaError> {
    let kind = DiagramKind::Journey;
    if let Some(source) = first_mapping(obj, &["touchpoints", "stages"]) {
        let touchpoints = named_entries(source)
            .enumerate()
            .map(|(idx, (name, value))| {
                let fallback_order = idx as i64 + 1;
                let touchpoint = match value.as_object() {
                    Some(tp) => Touchpoint {
                        action: tp.get("action").and_then(text_of).unwrap_or_default(),
                        emotion: tp
                            .get("emotion")
                            .and_then(text_of)
                            .unwrap_or_else(|| "Neutral".to_string()),
                        pain_points: tp.get("pain_points").map(string_list).unwrap_or_default(),
                        order: tp.get("order").and_then(integer).unwrap_or(fallback_order),
                    },
                    None => neutral_touchpoint(text_of(value).unwrap_or_default(), fallback_order),
                };
                (name, touchpoint)
            })
            .collect();
        return Ok(DiagramData::Journey(JourneyData { touchpoints }));
    }
    if let Some(events) = first_mapping(obj, &["events"]) {
        let touchpoints = named_entries(events)
            .enumerate()
            .map(|(idx, (name, value))| {
                let action = text_of(value).unwrap_or_default();
                (name, neutral_touchpoint(action, idx as i64 + 1))
            })
            .collect();
        return Ok(DiagramData::Journey(JourneyData { touchpoints }));
    }
    Err(missing_or_wrong(obj, kind, "touchpoints"))
}

fn neutral_touchpoint(action: String, order: i64) -> Touchpoint {
    Touchpoint {
        action,
        emotion: "Neutral".to_string(),
        pain_points: Vec::new(),
        order,
    }
}

pub(crate) fn erd(obj: &Object) -> Result<DiagramData, SchemaError> {
    let kind = DiagramKind::Erd;
    let source = mapping_or_missing(obj, &["entities", "tables"], kind, "entities")?;
    let mut entities = IndexMap::new();
    for (name, value) in named_entries(source) {
        let Some(attributes) = value.as_array() else {
            return Err(SchemaError::WrongShape {
                kind,
                key: name,
                expected: "a list of attributes",
            });
        };
        entities.insert(name, attributes.iter().filter_map(text_of).collect());
    }
    Ok(DiagramData::Erd(ErdData { entities }))
}

pub(crate) fn class(obj: &Object) -> Result<DiagramData, SchemaError> {
    let kind = DiagramKind::Class;
    let source = mapping_or_missing(obj, &["classes"], kind, "classes")?;
    let mut classes = IndexMap::new();
    for (name, value) in named_entries(source) {
        let members = value.as_object().and_then(|members| {
            let attributes = members.get("attributes")?.as_array()?;
            let methods = members.get("methods")?.as_array()?;
            Some(ClassMembers {
                attributes: attributes.iter().filter_map(text_of).collect(),
                methods: methods.iter().filter_map(text_of).collect(),
            })
        });
        let Some(members) = members else {
            return Err(SchemaError::WrongShape {
                kind,
                key: name,
                expected: "an object with `attributes` and `methods` lists",
            });
        };
        classes.insert(name, members);
    }
    Ok(DiagramData::Class(ClassData { classes }))
}

pub(crate) fn network(obj: &Object) -> Result<DiagramData, SchemaError> {
    let kind = DiagramKind::Network;
    let nodes = mapping_or_missing(obj, &["nodes"], kind, "nodes")?;
    let nodes = named_entries(nodes)
        .map(|(name, value)| (name, text_of(value).unwrap_or_default()))
        .collect();
    let connections = optional_links(obj, "connections");
    Ok(DiagramData::Network(NetworkData { nodes, connections }))
}

pub(crate) fn architecture(obj: &Object) -> Result<DiagramData, SchemaError> {
    let kind = DiagramKind::Architecture;
    let components = mapping_or_missing(obj, &["components"], kind, "components")?;
    let components = named_entries(components)
        .map(|(name, value)| (name, text_of(value).unwrap_or_default()))
        .collect();
    let relationships = optional_links(obj, "relationships");
    Ok(DiagramData::Architecture(ArchitectureData {
        components,
        relationships,
    }))
}

fn optional_links(obj: &Object, key: &str) -> Vec<Link> {
    let Some(list) = obj.get(key).and_then(Value::as_array) else {
        return Vec::new();
    };
    edge_records(list)
        .map(|edge| Link {
            label: edge.text(&["label", "protocol", "type", "message"]),
            from: edge.from,
            to: edge.to,
        })
        .collect()
}

struct EdgeRecord<'a> {
    from: String,
    to: String,
    order: i64,
    fields: &'a Object,
}

impl EdgeRecord<'_> {
    fn text(&self, keys: &[&str]) -> String {
        keys.iter()
            .find_map(|key| self.fields.get(*key).and_then(text_of))
            .unwrap_or_default()
    }
}

/// Records without both endpoints are dropped; a missing order is the 1-based position.
fn edge_records(list: &[Value]) -> impl Iterator<Item = EdgeRecord<'_>> {
    list.iter()
        .filter_map(Value::as_object)
        .enumerate()
        .filter_map(|(idx, fields)| {
            let from = fields.get("from").and_then(text_of)?;
            let to = fields.get("to").and_then(text_of)?;
            let order = fields.get("order").and_then(integer).unwrap_or(idx as i64 + 1);
            Some(EdgeRecord {
                from,
                to,
                order,
                fields,
            })
        })
}

fn steps_outline(obj: &Object) -> Option<Vec<(String, Option<String>)>> {
    let steps = first_mapping(obj, &["steps"])?;
    Some(
        named_entries(steps)
            .map(|(name, value)| {
                let first_line = string_list(value).into_iter().next();
                (name, first_line)
            })
            .collect(),
    )
}

fn named_entries(map: &Object) -> impl Iterator<Item = (String, &Value)> {
    map.iter().filter_map(|(name, value)| {
        let name = name.trim();
        (!name.is_empty()).then(|| (name.to_string(), value))
    })
}

fn first_mapping<'a>(obj: &'a Object, keys: &[&str]) -> Option<&'a Object> {
    keys.iter().find_map(|key| obj.get(*key).and_then(Value::as_object))
}

fn mapping_or_missing<'a>(
    obj: &'a Object,
    keys: &[&str],
    kind: DiagramKind,
    canonical: &'static str,
) -> Result<&'a Object, SchemaError> {
    first_mapping(obj, keys).ok_or_else(|| missing_or_wrong(obj, kind, canonical))
}

fn missing_or_wrong(obj: &Object, kind: DiagramKind, key: &'static str) -> SchemaError {
    if obj.contains_key(key) {
        SchemaError::WrongShape {
            kind,
            key: key.to_string(),
            expected: "a mapping",
        }
    } else {
        SchemaError::MissingKey { kind, key }
    }
}

fn expect_mapping<'a>(
    obj: &'a Object,
    key: &'static str,
    kind: DiagramKind,
) -> Result<&'a Object, SchemaError> {
    obj.get(key)
        .and_then(Value::as_object)
        .ok_or_else(|| SchemaError::WrongShape {
            kind,
            key: key.to_string(),
            expected: "a mapping",
        })
}

fn expect_list<'a>(
    obj: &'a Object,
    key: &'static str,
    kind: DiagramKind,
) -> Result<&'a [Value], SchemaError> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| SchemaError::WrongShape {
            kind,
            key: key.to_string(),
            expected: "a list",
        })
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(text_of).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        Value::Null | Value::Object(_) => None,
    }
}

fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(text_of).collect(),
        other => text_of(other).into_iter().collect(),
    }
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f.round() as i64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flowchart_accepts_blocks_alias() {
        let raw = json!({"blocks": {"A": ["first"], "B": "second"}});
        let DiagramData::Flowchart(data) = normalize(&raw, DiagramKind::Flowchart).unwrap() else {
            panic!("expected flowchart");
        };
        assert_eq!(data.steps["A"], vec!["first".to_string()]);
        assert_eq!(data.steps["B"], vec!["second".to_string()]);
    }

    #[test]
    fn flowchart_rejects_single_step() {
        let err = normalize(&json!({"steps": {"Only": ["one"]}}), DiagramKind::Flowchart).unwrap_err();
        assert_eq!(
            err,
            SchemaError::TooFew {
                kind: DiagramKind::Flowchart,
                key: "steps",
                min: 2,
                found: 1
            }
        );
        let err = normalize(&json!({"title": "x"}), DiagramKind::Flowchart).unwrap_err();
        assert!(matches!(err, SchemaError::MissingKey { key: "steps", .. }));
    }

    #[test]
    fn sequence_synthesized_from_steps() {
        let raw = json!({"steps": {"Order": ["Customer orders"], "Brew": ["Barista brews"], "Serve": []}});
        let DiagramData::Sequence(data) = normalize(&raw, DiagramKind::Sequence).unwrap() else {
            panic!("expected sequence");
        };
        assert_eq!(data.actors.len(), 3);
        assert_eq!(data.actors["Order"], "Customer orders");
        assert_eq!(data.interactions.len(), 2);
        assert_eq!(data.interactions[0].from, "Order");
        assert_eq!(data.interactions[0].to, "Brew");
        assert_eq!(data.interactions[0].message, "Barista brews");
        assert_eq!(data.interactions[1].message, "Serve");
        assert_eq!(data.interactions[1].order, 2);
    }

    #[test]
    fn sequence_without_steps_fails() {
        let err = normalize(&json!({"actors": {"A": "a"}}), DiagramKind::Sequence).unwrap_err();
        assert!(matches!(err, SchemaError::MissingKey { key: "interactions", .. }));
    }

    #[test]
    fn state_synthesis_uses_next_step_trigger() {
        let raw = json!({"steps": {"Idle": ["waiting"], "Busy": ["working"]}});
        let DiagramData::State(data) = normalize(&raw, DiagramKind::State).unwrap() else {
            panic!("expected state");
        };
        assert_eq!(data.states["Busy"], "working");
        assert_eq!(data.transitions.len(), 1);
        assert_eq!(data.transitions[0].trigger, "Next step");
    }

    #[test]
    fn edges_without_endpoints_are_dropped() {
        let raw = json!({
            "nodes": {"A": "client", "B": "server"},
            "connections": [{"from": "A", "to": "B", "label": "HTTP"}, {"from": "A"}, "junk"]
        });
        let DiagramData::Network(data) = normalize(&raw, DiagramKind::Network).unwrap() else {
            panic!("expected network");
        };
        assert_eq!(data.connections.len(), 1);
        assert_eq!(data.connections[0].label, "HTTP");
    }

    #[test]
    fn malformed_relationships_default_to_empty() {
        let raw = json!({"components": {"API": "gateway"}, "relationships": "none"});
        let DiagramData::Architecture(data) = normalize(&raw, DiagramKind::Architecture).unwrap() else {
            panic!("expected architecture");
        };
        assert!(data.relationships.is_empty());
    }

    #[test]
    fn mindmap_aliases() {
        let raw = json!({"center": "Coffee", "topics": {"Beans": "Arabica", "Gear": ["Grinder", "Kettle"]}});
        let DiagramData::Mindmap(data) = normalize(&raw, DiagramKind::Mindmap).unwrap() else {
            panic!("expected mind map");
        };
        assert_eq!(data.central_topic, "Coffee");
        assert_eq!(data.branches["Beans"], vec!["Arabica".to_string()]);
        assert_eq!(data.branches["Gear"].len(), 2);
    }

    #[test]
    fn swot_requires_one_category() {
        assert!(normalize(&json!({"notes": []}), DiagramKind::Swot).is_err());
        let DiagramData::Swot(data) = normalize(&json!({"threats": ["rivals"]}), DiagramKind::Swot).unwrap() else {
            panic!("expected swot");
        };
        assert!(data.strengths.is_empty());
        assert_eq!(data.threats, vec!["rivals".to_string()]);
    }

    #[test]
    fn gantt_from_events_uses_defaults() {
        let raw = json!({"events": {"Kickoff": "Meet the team"}});
        let DiagramData::Gantt(data) = normalize(&raw, DiagramKind::Gantt).unwrap() else {
            panic!("expected gantt");
        };
        let task = &data.tasks["Kickoff"];
        assert_eq!((task.start, task.duration), (1, 2));
        assert!(task.dependencies.is_empty());
        assert_eq!(task.description, "Meet the team");
    }

    #[test]
    fn gantt_coerces_numeric_strings() {
        let raw = json!({"tasks": {"Build": {"description": "b", "start": "3", "duration": 2.6}}});
        let DiagramData::Gantt(data) = normalize(&raw, DiagramKind::Gantt).unwrap() else {
            panic!("expected gantt");
        };
        assert_eq!(data.tasks["Build"].start, 3);
        assert_eq!(data.tasks["Build"].duration, 3);
    }

    #[test]
    fn journey_from_events_is_neutral_and_ordered() {
        let raw = json!({"events": {"Visit": "Walk in", "Order": "Ask for latte"}});
        let DiagramData::Journey(data) = normalize(&raw, DiagramKind::Journey).unwrap() else {
            panic!("expected journey");
        };
        assert_eq!(data.touchpoints["Visit"].emotion, "Neutral");
        assert_eq!(data.touchpoints["Order"].order, 2);
    }

    #[test]
    fn erd_attribute_lists_are_mandatory() {
        let ok = normalize(&json!({"tables": {"User": ["id", "name"]}}), DiagramKind::Erd);
        assert!(ok.is_ok());
        let err = normalize(&json!({"entities": {"User": "id, name"}}), DiagramKind::Erd).unwrap_err();
        assert!(matches!(err, SchemaError::WrongShape { ref key, .. } if key == "User"));
    }

    #[test]
    fn class_members_are_strict() {
        let raw = json!({"classes": {"Cup": {"attributes": ["size: int"]}}});
        let err = normalize(&raw, DiagramKind::Class).unwrap_err();
        assert!(matches!(err, SchemaError::WrongShape { ref key, .. } if key == "Cup"));
    }

    #[test]
    fn non_object_input_is_rejected() {
        for kind in DiagramKind::ALL {
            assert_eq!(
                normalize(&json!(["steps"]), kind).unwrap_err(),
                SchemaError::NotAnObject { kind }
            );
        }
    }
}
