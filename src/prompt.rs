use crate::ir::{DiagramKind, VariationStyle};
use crate::registry::spec_for;

pub const REGENERATE_SYSTEM_PROMPT: &str = "You are a professional diagram data analyst. Return only valid JSON.";

/// User prompt asking the model for one diagram's JSON.
pub fn diagram_prompt(kind: DiagramKind, topic: &str) -> String {
    let spec = spec_for(kind);
    let mut prompt = format!("{} {topic}\nRequirements:\n", spec.task);
    for requirement in spec.requirements {
        prompt.push_str("- ");
        prompt.push_str(&requirement.replace("{topic}", topic));
        prompt.push('\n');
    }
    prompt.push_str("\nReturn ONLY valid JSON in this exact format:\n");
    prompt.push_str(spec.format);
    prompt.push_str(&format!("\n\nTopic: {topic}"));
    prompt
}

pub fn system_prompt(kind: DiagramKind) -> String {
    format!(
        "You are a {kind} expert. Return only valid JSON that matches the specified format exactly. \
         Do not include any explanatory text, just the JSON. \
         Focus on {kind}-specific terminology and best practices."
    )
}

pub fn variation_system_prompt(kind: DiagramKind, style: VariationStyle) -> String {
    format!(
        "You are a {kind} expert. Return only valid JSON that matches the specified format exactly. Focus on {style} style."
    )
}

fn style_instruction(style: VariationStyle) -> (&'static str, &'static str) {
    match style {
        VariationStyle::Standard => (
            "Create a balanced, professional approach",
            "Include core elements with standard level of detail",
        ),
        VariationStyle::Detailed => (
            "Create a comprehensive, in-depth approach",
            "Add sub-processes, validation steps, quality checkpoints, and detailed breakdowns",
        ),
        VariationStyle::Compact => (
            "Create a streamlined, essential-only approach",
            "Focus on only the core 3-4 most critical elements, eliminate non-essential details",
        ),
        VariationStyle::Enhanced => (
            "Create an advanced, strategic approach",
            "Add innovation elements, risk management, alternative paths, and strategic considerations",
        ),
    }
}

fn kind_instruction(kind: DiagramKind, style: VariationStyle) -> &'static str {
    use DiagramKind::*;
    use VariationStyle::*;
    match (kind, style) {
        (Flowchart, Detailed) => {
            "Include pre-checks, validation steps, documentation points, and cleanup phases for each major step."
        }
        (Flowchart, Compact) => {
            "Show only the 3-4 most essential steps in the process, combining related activities."
        }
        (Flowchart, Enhanced) => {
            "Add decision diamonds, parallel processes, error handling paths, and quality gates."
        }
        (Mindmap, Detailed) => {
            "For each main branch, add 3-4 sub-branches with specific implementation details and considerations."
        }
        (Mindmap, Compact) => "Limit to 3-4 main branches only, with 1-2 simple items per branch.",
        (Mindmap, Enhanced) => {
            "Add strategic branches like 'Innovation Opportunities', 'Risk Factors', 'Success Metrics', and 'Future Vision'."
        }
        (Sequence, Detailed) => {
            "Add logging actors, validation steps, and detailed error handling interactions."
        }
        (Sequence, Compact) => {
            "Show only the core actor interactions, limit to 4-5 main message exchanges."
        }
        (Sequence, Enhanced) => {
            "Include error handlers, monitoring systems, and alternative flow paths."
        }
        (Swot, Detailed) => {
            "Provide 4-6 items per category with specific examples and market context."
        }
        (Swot, Compact) => "Limit to 2-3 most critical items per SWOT category.",
        (Swot, Enhanced) => {
            "Add strategic action items and cross-category relationships for each SWOT element."
        }
        _ => "",
    }
}

/// Base prompt extended with the style's structural instructions.
pub fn variation_prompt(base: &str, kind: DiagramKind, style: VariationStyle, topic: &str) -> String {
    let (approach, specifics) = style_instruction(style);
    format!(
        "{base}\n\nVARIATION STYLE: {}\n{approach} with the following specifications:\n{specifics}\n\n{}\n\n\
         IMPORTANT: Create a structurally DIFFERENT diagram than other variations - not just different colors or themes, \
         but different content, complexity, and approach for the topic: {topic}",
        style.as_str().to_uppercase(),
        kind_instruction(kind, style)
    )
}
