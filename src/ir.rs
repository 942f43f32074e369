use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagramKind {
    #[serde(rename = "flowchart")]
    Flowchart,
    #[serde(rename = "sequence")]
    Sequence,
    #[serde(rename = "state")]
    State,
    #[serde(rename = "mind map")]
    Mindmap,
    #[serde(rename = "swot analysis")]
    Swot,
    #[serde(rename = "timeline")]
    Timeline,
    #[serde(rename = "gantt")]
    Gantt,
    #[serde(rename = "journey")]
    Journey,
    #[serde(rename = "erd")]
    Erd,
    #[serde(rename = "class")]
    Class,
    #[serde(rename = "network")]
    Network,
    #[serde(rename = "architecture")]
    Architecture,
}

impl DiagramKind {
    pub const ALL: [DiagramKind; 12] = [
        DiagramKind::Flowchart,
        DiagramKind::Sequence,
        DiagramKind::State,
        DiagramKind::Mindmap,
        DiagramKind::Swot,
        DiagramKind::Timeline,
        DiagramKind::Gantt,
        DiagramKind::Journey,
        DiagramKind::Erd,
        DiagramKind::Class,
        DiagramKind::Network,
        DiagramKind::Architecture,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DiagramKind::Flowchart => "flowchart",
            DiagramKind::Sequence => "sequence",
            DiagramKind::State => "state",
            DiagramKind::Mindmap => "mind map",
            DiagramKind::Swot => "swot analysis",
            DiagramKind::Timeline => "timeline",
            DiagramKind::Gantt => "gantt",
            DiagramKind::Journey => "journey",
            DiagramKind::Erd => "erd",
            DiagramKind::Class => "class",
            DiagramKind::Network => "network",
            DiagramKind::Architecture => "architecture",
        }
    }

    /// Exact or case-insensitive match on the wire name, then keyword match.
    pub fn from_name(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        if let Some(kind) = Self::ALL.iter().copied().find(|k| k.as_str() == trimmed) {
            return Some(kind);
        }
        let lower = trimmed.to_ascii_lowercase();
        if let Some(kind) = Self::ALL.iter().copied().find(|k| k.as_str() == lower) {
            return Some(kind);
        }
        const KEYWORDS: [(&str, DiagramKind); 12] = [
            ("flow", DiagramKind::Flowchart),
            ("seq", DiagramKind::Sequence),
            ("mind", DiagramKind::Mindmap),
            ("swot", DiagramKind::Swot),
            ("gantt", DiagramKind::Gantt),
            ("time", DiagramKind::Timeline),
            ("journey", DiagramKind::Journey),
            ("entity", DiagramKind::Erd),
            ("class", DiagramKind::Class),
            ("network", DiagramKind::Network),
            ("architect", DiagramKind::Architecture),
            ("state", DiagramKind::State),
        ];
        if lower == "er" || lower == "erd diagram" {
            return Some(DiagramKind::Erd);
        }
        KEYWORDS
            .iter()
            .find(|(needle, _)| lower.contains(needle))
            .map(|(_, kind)| *kind)
    }

    /// Unknown names fall back to flowchart handling.
    pub fn resolve(name: &str) -> Self {
        Self::from_name(name).unwrap_or(DiagramKind::Flowchart)
    }
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariationStyle {
    Standard,
    Detailed,
    Compact,
    Enhanced,
}

impl VariationStyle {
    pub const ALL: [VariationStyle; 4] = [
        VariationStyle::Standard,
        VariationStyle::Detailed,
        VariationStyle::Compact,
        VariationStyle::Enhanced,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VariationStyle::Standard => "standard",
            VariationStyle::Detailed => "detailed",
            VariationStyle::Compact => "compact",
            VariationStyle::Enhanced => "enhanced",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        Self::ALL.iter().copied().find(|s| s.as_str() == lower)
    }

    pub fn title(self) -> &'static str {
        match self {
            VariationStyle::Standard => "Standard",
            VariationStyle::Detailed => "Detailed",
            VariationStyle::Compact => "Compact",
            VariationStyle::Enhanced => "Enhanced",
        }
    }

    pub fn color_theme(self) -> &'static str {
        match self {
            VariationStyle::Standard => "blue",
            VariationStyle::Detailed => "green",
            VariationStyle::Compact => "purple",
            VariationStyle::Enhanced => "orange",
        }
    }
}

impl fmt::Display for VariationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowchartData {
    pub steps: IndexMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub from: String,
    pub to: String,
    pub message: String,
    pub order: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceData {
    pub actors: IndexMap<String, String>,
    pub interactions: Vec<Interaction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub from: String,
    pub to: String,
    pub trigger: String,
    pub order: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateData {
    pub states: IndexMap<String, String>,
    pub transitions: Vec<Transition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindmapData {
    pub central_topic: String,
    pub branches: IndexMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwotData {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub opportunities: Vec<String>,
    pub threats: Vec<String>,
}

impl SwotData {
    pub fn quadrants(&self) -> [(&'static str, &[String]); 4] {
        [
            ("strengths", &self.strengths),
            ("weaknesses", &self.weaknesses),
            ("opportunities", &self.opportunities),
            ("threats", &self.threats),
        ]
    }

    pub fn quadrants_mut(&mut self) -> [(&'static str, &mut Vec<String>); 4] {
        [
            ("strengths", &mut self.strengths),
            ("weaknesses", &mut self.weaknesses),
            ("opportunities", &mut self.opportunities),
            ("threats", &mut self.threats),
        ]
    }

    pub fn item_count(&self) -> usize {
        self.quadrants().iter().map(|(_, items)| items.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineData {
    pub events: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GanttTask {
    pub description: String,
    pub dependencies: Vec<String>,
    pub start: i64,
    pub duration: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GanttData {
    pub tasks: IndexMap<String, GanttTask>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Touchpoint {
    pub action: String,
    pub emotion: String,
    pub pain_points: Vec<String>,
    pub order: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneyData {
    pub touchpoints: IndexMap<String, Touchpoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErdData {
    pub entities: IndexMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassMembers {
    pub attributes: Vec<String>,
    pub methods: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassData {
    pub classes: IndexMap<String, ClassMembers>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub from: String,
    pub to: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkData {
    pub nodes: IndexMap<String, String>,
    pub connections: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureData {
    pub components: IndexMap<String, String>,
    pub relationships: Vec<Link>,
}

/// Canonical content of one diagram. Serializes to the JSON shape of its kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DiagramData {
    Flowchart(FlowchartData),
    Sequence(SequenceData),
    State(StateData),
    Mindmap(MindmapData),
    Swot(SwotData),
    Timeline(TimelineData),
    Gantt(GanttData),
    Journey(JourneyData),
    Erd(ErdData),
    Class(ClassData),
    Network(NetworkData),
    Architecture(ArchitectureData),
}

impl DiagramData {
    pub fn kind(&self) -> DiagramKind {
        match self {
            DiagramData::Flowchart(_) => DiagramKind::Flowchart,
            DiagramData::Sequence(_) => DiagramKind::Sequence,
            DiagramData::State(_) => DiagramKind::State,
            DiagramData::Mindmap(_) => DiagramKind::Mindmap,
            DiagramData::Swot(_) => DiagramKind::Swot,
            DiagramData::Timeline(_) => DiagramKind::Timeline,
            DiagramData::Gantt(_) => DiagramKind::Gantt,
            DiagramData::Journey(_) => DiagramKind::Journey,
            DiagramData::Erd(_) => DiagramKind::Erd,
            DiagramData::Class(_) => DiagramKind::Class,
            DiagramData::Network(_) => DiagramKind::Network,
            DiagramData::Architecture(_) => DiagramKind::Architecture,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip() {
        for kind in DiagramKind::ALL {
            assert_eq!(DiagramKind::from_name(kind.as_str()), Some(kind));
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn resolves_loose_names() {
        assert_eq!(DiagramKind::resolve("Mind Map"), DiagramKind::Mindmap);
        assert_eq!(DiagramKind::resolve("mindmap"), DiagramKind::Mindmap);
        assert_eq!(DiagramKind::resolve("SWOT"), DiagramKind::Swot);
        assert_eq!(DiagramKind::resolve("state machine"), DiagramKind::State);
        assert_eq!(DiagramKind::resolve("pie"), DiagramKind::Flowchart);
        assert_eq!(DiagramKind::resolve(""), DiagramKind::Flowchart);
    }

    #[test]
    fn data_serializes_to_canonical_shape() {
        let mut steps = IndexMap::new();
        steps.insert("Start".to_string(), vec!["Begin".to_string()]);
        let data = DiagramData::Flowchart(FlowchartData { steps });
        assert_eq!(data.to_json(), serde_json::json!({"steps": {"Start": ["Begin"]}}));
        assert_eq!(data.kind(), DiagramKind::Flowchart);
    }
}
