use crate::error::SchemaError;
use crate::ir::{DiagramData, DiagramKind};
use crate::{fallback, normalize};
use serde_json::{Map, Value};

/// Everything that varies per diagram kind, in one place.
#[derive(Debug)]
pub struct DiagramSpec {
    pub kind: DiagramKind,
    pub title: &'static str,
    pub subtitle: &'static str,
    /// Opening line of the generation prompt, completed with the topic.
    pub task: &'static str,
    /// Requirement bullets; `{topic}` is replaced by the user's topic.
    pub requirements: &'static [&'static str],
    /// JSON shape the model is asked to return.
    pub format: &'static str,
    /// Primary, secondary and accent colors.
    pub palette: [&'static str; 3],
    pub normalize: fn(&Map<String, Value>) -> Result<DiagramData, SchemaError>,
    pub fallback: fn(&str) -> DiagramData,
}

static SPECS: [DiagramSpec; 12] = [
    DiagramSpec {
        kind: DiagramKind::Flowchart,
        title: "Flowchart",
        subtitle: "Step-by-step workflow visualization",
        task: "Create a detailed, professional flowchart for",
        requirements: &[
            "Identify 6-8 key sequential steps that are logical and actionable",
            "Each step should have a clear, concise description (1-2 sentences)",
            "Steps should be specific to the topic \"{topic}\"",
            "Include decision points or branches if applicable",
            "Focus on practical, implementable steps",
            "Use professional terminology appropriate for the domain",
        ],
        format: r#"{"steps": {"Step 1 Name": ["Brief description"], "Step 2 Name": ["Brief description"], ...}}"#,
        palette: ["#4F46E5", "#7C3AED", "#6366F1"],
        normalize: normalize::flowchart,
        fallback: fallback::flowchart,
    },
    DiagramSpec {
        kind: DiagramKind::Sequence,
        title: "Sequence Diagram",
        subtitle: "Message flow between participants",
        task: "Create a sequence diagram for",
        requirements: &[
            "Identify 5-7 actors/entities involved in \"{topic}\"",
            "Show message flow and interactions between entities",
            "Include timing and order of operations",
            "Focus on communication patterns",
            "Use sequence diagram terminology",
        ],
        format: r#"{"actors": {"Actor1": "Role/Description", "Actor2": "Role/Description", ...}, "interactions": [{"from": "Actor1", "to": "Actor2", "message": "Message description", "order": 1}, ...]}"#,
        palette: ["#4F46E5", "#7C3AED", "#6366F1"],
        normalize: normalize::sequence,
        fallback: fallback::sequence,
    },
    DiagramSpec {
        kind: DiagramKind::State,
        title: "State Diagram",
        subtitle: "States and the transitions between them",
        task: "Create a state diagram for",
        requirements: &[
            "Identify 5-7 states in the \"{topic}\" process",
            "Show transitions and triggers between states",
            "Include initial and final states",
            "Focus on state changes and conditions",
            "Use state machine terminology",
        ],
        format: r#"{"states": {"StateName": "State description", ...}, "transitions": [{"from": "State1", "to": "State2", "trigger": "Event/Condition", "order": 1}, ...]}"#,
        palette: ["#DC2626", "#EF4444", "#B91C1C"],
        normalize: normalize::state,
        fallback: fallback::state,
    },
    DiagramSpec {
        kind: DiagramKind::Mindmap,
        title: "Mind Map",
        subtitle: "Key ideas branching from a central topic",
        task: "Create a comprehensive mind map for",
        requirements: &[
            "Central topic should be concise and clear (1-3 words) related to \"{topic}\"",
            "Create 6-8 main branches representing key aspects or categories",
            "Each branch should have a relevant concept, detail, or subtopic",
            "Focus on logical categorization and relationships specific to \"{topic}\"",
            "Use professional terminology appropriate for the domain",
            "Make branches comprehensive and meaningful",
        ],
        format: r#"{"central_topic": "Main Topic", "branches": {"Branch 1": ["Concept"], "Branch 2": ["Concept"], ...}}"#,
        palette: ["#7C3AED", "#8B5CF6", "#6D28D9"],
        normalize: normalize::mindmap,
        fallback: fallback::mindmap,
    },
    DiagramSpec {
        kind: DiagramKind::Swot,
        title: "SWOT Analysis",
        subtitle: "Strengths, weaknesses, opportunities and threats",
        task: "Create a thorough SWOT analysis for",
        requirements: &[
            "Provide 5-7 items per category (Strengths, Weaknesses, Opportunities, Threats)",
            "Be specific and actionable, directly related to \"{topic}\"",
            "Consider both internal factors (strengths/weaknesses) and external factors (opportunities/threats)",
            "Use professional business terminology",
            "Focus on realistic, relevant factors specific to the context of \"{topic}\"",
            "Make each point detailed and meaningful",
        ],
        format: r#"{"strengths": ["Item 1", "Item 2", ...], "weaknesses": ["Item 1", "Item 2", ...], "opportunities": ["Item 1", "Item 2", ...], "threats": ["Item 1", "Item 2", ...]}"#,
        palette: ["#7C3AED", "#8B5CF6", "#6D28D9"],
        normalize: normalize::swot,
        fallback: fallback::swot,
    },
    DiagramSpec {
        kind: DiagramKind::Timeline,
        title: "Timeline",
        subtitle: "Chronological milestones and phases",
        task: "Create a realistic timeline for",
        requirements: &[
            "Identify 6-8 key phases, milestones, or time periods",
            "Use logical sequence or chronological order appropriate for \"{topic}\"",
            "Each event should be clearly described and actionable",
            "Include realistic timeframes or phases (weeks, months, quarters as appropriate)",
            "Focus on chronological progression specific to the context",
            "Make timeline practical and achievable",
        ],
        format: r#"{"events": {"Phase 1/Timeframe": "Description", "Phase 2/Timeframe": "Description", ...}}"#,
        palette: ["#0891B2", "#06B6D4", "#0E7490"],
        normalize: normalize::timeline,
        fallback: fallback::timeline,
    },
    DiagramSpec {
        kind: DiagramKind::Gantt,
        title: "Gantt Chart",
        subtitle: "Project schedule and task dependencies",
        task: "Create a Gantt chart structure for",
        requirements: &[
            "Identify 6-8 parallel and sequential tasks",
            "Include duration estimates for \"{topic}\"",
            "Show task dependencies and overlaps",
            "Focus on resource allocation",
            "Use project management terminology",
        ],
        format: r#"{"tasks": {"Task Name (Duration)": {"description": "Task description", "dependencies": ["Dependency1"], "start": 1, "duration": 4}, ...}}"#,
        palette: ["#9333EA", "#A855F7", "#7C3AED"],
        normalize: normalize::gantt,
        fallback: fallback::gantt,
    },
    DiagramSpec {
        kind: DiagramKind::Journey,
        title: "User Journey",
        subtitle: "Touchpoints, emotions and pain points",
        task: "Create a user journey map for",
        requirements: &[
            "Identify 6-8 touchpoints in the \"{topic}\" experience",
            "Include user emotions and pain points",
            "Show user actions and system responses",
            "Focus on user experience optimization",
            "Use UX terminology",
        ],
        format: r#"{"touchpoints": {"Touchpoint Name": {"action": "User action", "emotion": "User feeling", "pain_points": ["Issue 1"], "order": 1}, ...}}"#,
        palette: ["#BE185D", "#DB2777", "#9D174D"],
        normalize: normalize::journey,
        fallback: fallback::journey,
    },
    DiagramSpec {
        kind: DiagramKind::Erd,
        title: "Entity Relationship Diagram",
        subtitle: "Entities, attributes and relationships",
        task: "Create an Entity Relationship Diagram for",
        requirements: &[
            "Identify 4-6 main entities for \"{topic}\" system",
            "List 4-6 attributes per entity",
            "Consider primary keys and relationships",
            "Use database design principles",
            "Focus on data structure",
        ],
        format: r#"{"entities": {"EntityName": ["attribute1", "attribute2", ...], ...}}"#,
        palette: ["#059669", "#10B981", "#047857"],
        normalize: normalize::erd,
        fallback: fallback::erd,
    },
    DiagramSpec {
        kind: DiagramKind::Class,
        title: "Class Diagram",
        subtitle: "Classes with their attributes and methods",
        task: "Create a class diagram for",
        requirements: &[
            "Identify 4-6 classes for \"{topic}\" system",
            "List 3-5 attributes and methods per class",
            "Show inheritance and composition relationships",
            "Use object-oriented design principles",
            "Focus on system architecture",
        ],
        format: r#"{"classes": {"ClassName": {"attributes": ["attr: type", ...], "methods": ["method()", ...]}, ...}}"#,
        palette: ["#7C2D12", "#9A3412", "#5C1911"],
        normalize: normalize::class,
        fallback: fallback::class,
    },
    DiagramSpec {
        kind: DiagramKind::Network,
        title: "Network Diagram",
        subtitle: "Nodes and their connections",
        task: "Create a network diagram for",
        requirements: &[
            "Identify 5-7 network components for \"{topic}\"",
            "Show connections and protocols",
            "Include security and performance considerations",
            "Use networking terminology",
            "Focus on system topology",
        ],
        format: r#"{"nodes": {"NodeName": "Type/Role", ...}, "connections": [{"from": "Node1", "to": "Node2", "label": "Connection"}, ...]}"#,
        palette: ["#1E40AF", "#2563EB", "#1D4ED8"],
        normalize: normalize::network,
        fallback: fallback::network,
    },
    DiagramSpec {
        kind: DiagramKind::Architecture,
        title: "System Architecture",
        subtitle: "Layered components and their dependencies",
        task: "Create a system architecture diagram for",
        requirements: &[
            "Identify 5-7 architectural components for \"{topic}\"",
            "Show layers and service boundaries",
            "Include data flow and dependencies",
            "Use architectural patterns",
            "Focus on system design",
        ],
        format: r#"{"components": {"ComponentName": "Purpose/Type", ...}, "relationships": [{"from": "Comp1", "to": "Comp2", "label": "Relationship"}, ...]}"#,
        palette: ["#6D28D9", "#7C3AED", "#5B21B6"],
        normalize: normalize::architecture,
        fallback: fallback::architecture,
    },
];

pub fn spec_for(kind: DiagramKind) -> &'static DiagramSpec {
    // The table follows `DiagramKind::ALL` order.
    &SPECS[kind as usize]
}

pub fn all_specs() -> &'static [DiagramSpec] {
    &SPECS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_indexed_by_kind() {
        for kind in DiagramKind::ALL {
            assert_eq!(spec_for(kind).kind, kind);
        }
        assert_eq!(all_specs().len(), DiagramKind::ALL.len());
    }

    #[test]
    fn every_fallback_normalizes() {
        for spec in all_specs() {
            let data = (spec.fallback)("espresso bar");
            assert_eq!(data.kind(), spec.kind);
            let raw = data.to_json();
            let normalized = crate::normalize::normalize(&raw, spec.kind).unwrap();
            assert_eq!(normalized, data, "{} fallback should survive normalization", spec.kind);
        }
    }
}
