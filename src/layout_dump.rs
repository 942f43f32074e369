use crate::layout::{Element, Layout};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump<'a> {
    pub kind: &'static str,
    pub title: &'a str,
    pub width: f32,
    pub height: f32,
    /// Element count per CSS class; unclassed primitives are not counted.
    pub classes: BTreeMap<&'static str, usize>,
    pub elements: &'a [Element],
}

impl<'a> LayoutDump<'a> {
    pub fn from_layout(layout: &'a Layout) -> Self {
        let mut classes = BTreeMap::new();
        for class in layout.elements.iter().filter_map(Element::class) {
            *classes.entry(class).or_insert(0) += 1;
        }
        LayoutDump {
            kind: layout.kind.as_str(),
            title: &layout.title,
            width: layout.width,
            height: layout.height,
            classes,
            elements: &layout.elements,
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::fallback_data;
    use crate::ir::DiagramKind;
    use crate::layout::compute_layout;

    #[test]
    fn dump_counts_classes() {
        let layout = compute_layout(&fallback_data(DiagramKind::Flowchart, "tea")).unwrap();
        let dump = LayoutDump::from_layout(&layout);
        assert_eq!(dump.kind, "flowchart");
        assert_eq!(dump.classes.get("step"), Some(&5));
        assert_eq!(dump.classes.get("connector"), Some(&4));
        let json = serde_json::to_value(&dump).unwrap();
        assert_eq!(json["elements"][0]["type"], "path");
    }
}
