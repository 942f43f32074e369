use crate::ir::DiagramKind;
use serde::Serialize;

/// Fill or stroke reference, resolved against the theme at serialization time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Paint {
    None,
    Gradient,
    Primary,
    Secondary,
    Accent,
    Surface,
    Background,
    Text,
    Muted,
    Line,
    OnPrimary,
    Color(String),
}

impl Paint {
    pub fn color(value: impl Into<String>) -> Self {
        Paint::Color(value.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    Arrow,
    Hollow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    Shadow,
    Glow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RectShape {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rx: f32,
    pub fill: Paint,
    pub stroke: Paint,
    pub stroke_width: f32,
    pub dashed: bool,
    pub opacity: f32,
    pub effect: Option<Effect>,
    pub class: Option<&'static str>,
}

impl RectShape {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rx: 0.0,
            fill: Paint::Surface,
            stroke: Paint::None,
            stroke_width: 0.0,
            dashed: false,
            opacity: 1.0,
            effect: None,
            class: None,
        }
    }

    pub fn centered(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }

    pub fn rx(mut self, rx: f32) -> Self {
        self.rx = rx;
        self
    }

    pub fn fill(mut self, fill: Paint) -> Self {
        self.fill = fill;
        self
    }

    pub fn stroke(mut self, stroke: Paint, width: f32) -> Self {
        self.stroke = stroke;
        self.stroke_width = width;
        self
    }

    pub fn dashed(mut self) -> Self {
        self.dashed = true;
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn effect(mut self, effect: Effect) -> Self {
        self.effect = Some(effect);
        self
    }

    pub fn class(mut self, class: &'static str) -> Self {
        self.class = Some(class);
        self
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircleShape {
    pub cx: f32,
    pub cy: f32,
    pub r: f32,
    pub fill: Paint,
    pub stroke: Paint,
    pub stroke_width: f32,
    pub opacity: f32,
    pub effect: Option<Effect>,
    pub class: Option<&'static str>,
}

impl CircleShape {
    pub fn new(cx: f32, cy: f32, r: f32) -> Self {
        Self {
            cx,
            cy,
            r,
            fill: Paint::Gradient,
            stroke: Paint::None,
            stroke_width: 0.0,
            opacity: 1.0,
            effect: None,
            class: None,
        }
    }

    pub fn fill(mut self, fill: Paint) -> Self {
        self.fill = fill;
        self
    }

    pub fn stroke(mut self, stroke: Paint, width: f32) -> Self {
        self.stroke = stroke;
        self.stroke_width = width;
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn effect(mut self, effect: Effect) -> Self {
        self.effect = Some(effect);
        self
    }

    pub fn class(mut self, class: &'static str) -> Self {
        self.class = Some(class);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineShape {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub stroke: Paint,
    pub stroke_width: f32,
    pub dashed: bool,
    pub opacity: f32,
    pub marker: Option<Marker>,
    pub class: Option<&'static str>,
}

impl LineShape {
    pub fn new(from: (f32, f32), to: (f32, f32)) -> Self {
        Self {
            x1: from.0,
            y1: from.1,
            x2: to.0,
            y2: to.1,
            stroke: Paint::Line,
            stroke_width: 2.0,
            dashed: false,
            opacity: 1.0,
            marker: None,
            class: None,
        }
    }

    pub fn stroke(mut self, stroke: Paint, width: f32) -> Self {
        self.stroke = stroke;
        self.stroke_width = width;
        self
    }

    pub fn dashed(mut self) -> Self {
        self.dashed = true;
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.marker = Some(marker);
        self
    }

    pub fn class(mut self, class: &'static str) -> Self {
        self.class = Some(class);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathShape {
    pub d: String,
    pub fill: Paint,
    pub stroke: Paint,
    pub stroke_width: f32,
    pub dashed: bool,
    pub opacity: f32,
    pub marker: Option<Marker>,
    pub class: Option<&'static str>,
}

impl PathShape {
    pub fn new(d: String) -> Self {
        Self {
            d,
            fill: Paint::None,
            stroke: Paint::Line,
            stroke_width: 2.0,
            dashed: false,
            opacity: 1.0,
            marker: None,
            class: None,
        }
    }

    pub fn fill(mut self, fill: Paint) -> Self {
        self.fill = fill;
        self
    }

    pub fn stroke(mut self, stroke: Paint, width: f32) -> Self {
        self.stroke = stroke;
        self.stroke_width = width;
        self
    }

    pub fn dashed(mut self) -> Self {
        self.dashed = true;
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.marker = Some(marker);
        self
    }

    pub fn class(mut self, class: &'static str) -> Self {
        self.class = Some(class);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextShape {
    pub x: f32,
    pub y: f32,
    pub lines: Vec<String>,
    pub font_size: f32,
    pub font_weight: u16,
    pub fill: Paint,
    pub anchor: Anchor,
    pub line_height: f32,
    pub class: Option<&'static str>,
}

impl TextShape {
    pub fn new(x: f32, y: f32, text: impl Into<String>) -> Self {
        Self::lines(x, y, vec![text.into()])
    }

    pub fn lines(x: f32, y: f32, lines: Vec<String>) -> Self {
        Self {
            x,
            y,
            lines,
            font_size: 14.0,
            font_weight: 400,
            fill: Paint::Text,
            anchor: Anchor::Middle,
            line_height: 1.3,
            class: None,
        }
    }

    pub fn size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn weight(mut self, font_weight: u16) -> Self {
        self.font_weight = font_weight;
        self
    }

    pub fn fill(mut self, fill: Paint) -> Self {
        self.fill = fill;
        self
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn line_height(mut self, line_height: f32) -> Self {
        self.line_height = line_height;
        self
    }

    pub fn class(mut self, class: &'static str) -> Self {
        self.class = Some(class);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Rect(RectShape),
    Circle(CircleShape),
    Line(LineShape),
    Path(PathShape),
    Text(TextShape),
}

impl From<RectShape> for Element {
    fn from(value: RectShape) -> Self {
        Element::Rect(value)
    }
}

impl From<CircleShape> for Element {
    fn from(value: CircleShape) -> Self {
        Element::Circle(value)
    }
}

impl From<LineShape> for Element {
    fn from(value: LineShape) -> Self {
        Element::Line(value)
    }
}

impl From<PathShape> for Element {
    fn from(value: PathShape) -> Self {
        Element::Path(value)
    }
}

impl From<TextShape> for Element {
    fn from(value: TextShape) -> Self {
        Element::Text(value)
    }
}

impl Element {
    pub fn class(&self) -> Option<&'static str> {
        match self {
            Element::Rect(shape) => shape.class,
            Element::Circle(shape) => shape.class,
            Element::Line(shape) => shape.class,
            Element::Path(shape) => shape.class,
            Element::Text(shape) => shape.class,
        }
    }
}

/// Drawing primitives of one diagram in painter's order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub kind: DiagramKind,
    pub width: f32,
    pub height: f32,
    pub title: String,
    pub subtitle: Option<String>,
    pub elements: Vec<Element>,
}

impl Layout {
    pub fn new(kind: DiagramKind, width: f32, height: f32) -> Self {
        let spec = crate::registry::spec_for(kind);
        Self {
            kind,
            width,
            height,
            title: spec.title.to_string(),
            subtitle: Some(spec.subtitle.to_string()),
            elements: Vec::new(),
        }
    }

    pub fn push(&mut self, element: impl Into<Element>) {
        self.elements.push(element.into());
    }

    pub fn count_class(&self, class: &str) -> usize {
        self.elements
            .iter()
            .filter(|element| element.class() == Some(class))
            .count()
    }
}
