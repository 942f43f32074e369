#[cfg(feature = "png")]
use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::ir::DiagramData;
use crate::layout::{
    Anchor, CircleShape, Effect, Element, Layout, LineShape, Marker, Paint, PathShape, RectShape,
    TextShape, text::wrap_chars,
};
use crate::theme::Theme;
use anyhow::Result;
use std::fmt::Write as _;
use std::path::Path;

/// Layout and serialize one diagram.
pub fn render_diagram(data: &DiagramData, theme: &Theme) -> std::result::Result<String, RenderError> {
    let layout = crate::layout::compute_layout(data)?;
    Ok(render_svg(&layout, theme))
}

pub fn render_svg(layout: &Layout, theme: &Theme) -> String {
    let mut svg = String::new();
    let width = layout.width.max(200.0);
    let height = layout.height.max(200.0);

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {width} {height}\" width=\"100%\" preserveAspectRatio=\"xMidYMid meet\" data-diagram-type=\"{}\">",
        layout.kind.as_str()
    ));
    push_defs(&mut svg, theme);

    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));
    svg.push_str(&format!(
        "<text x=\"{:.2}\" y=\"48\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"28\" font-weight=\"800\" fill=\"{}\" class=\"diagram-title\">{}</text>",
        width / 2.0,
        theme.font_family,
        theme.primary,
        escape_xml(&layout.title)
    ));
    if let Some(subtitle) = &layout.subtitle {
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"75\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"14\" fill=\"{}\" class=\"diagram-subtitle\">{}</text>",
            width / 2.0,
            theme.font_family,
            theme.muted_text_color,
            escape_xml(subtitle)
        ));
    }

    for element in &layout.elements {
        match element {
            Element::Rect(rect) => push_rect(&mut svg, rect, theme),
            Element::Circle(circle) => push_circle(&mut svg, circle, theme),
            Element::Line(line) => push_line(&mut svg, line, theme),
            Element::Path(path) => push_path(&mut svg, path, theme),
            Element::Text(text) => push_text(&mut svg, text, theme),
        }
    }

    svg.push_str("</svg>");
    svg
}

/// Fixed-size card shown in place of a diagram that could not be drawn.
pub fn render_error_svg(message: &str) -> String {
    let mut svg = String::new();
    svg.push_str("<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 400 200\" width=\"100%\">");
    svg.push_str("<rect width=\"400\" height=\"200\" fill=\"#FEF2F2\"/>");
    svg.push_str("<rect x=\"20\" y=\"20\" width=\"360\" height=\"160\" rx=\"12\" ry=\"12\" fill=\"#FFFFFF\" stroke=\"#EF4444\" stroke-width=\"2\"/>");
    svg.push_str("<text x=\"200\" y=\"62\" text-anchor=\"middle\" font-family=\"Inter, sans-serif\" font-size=\"18\" font-weight=\"700\" fill=\"#DC2626\">Diagram Generation Error</text>");

    let mut lines = wrap_chars(message, 48, 2);
    if lines.is_empty() {
        lines.push("Unknown error".to_string());
    }
    svg.push_str("<text x=\"200\" y=\"100\" text-anchor=\"middle\" font-family=\"Inter, sans-serif\" font-size=\"12\" fill=\"#7F1D1D\">");
    for (idx, line) in lines.iter().enumerate() {
        let dy = if idx == 0 { 0.0 } else { 16.0 };
        let _ = write!(svg, "<tspan x=\"200\" dy=\"{dy}\">{}</tspan>", escape_xml(line));
    }
    svg.push_str("</text>");
    svg.push_str("<text x=\"200\" y=\"158\" text-anchor=\"middle\" font-family=\"Inter, sans-serif\" font-size=\"11\" fill=\"#6B7280\">Please try again or contact support</text>");
    svg.push_str("</svg>");
    svg
}

fn push_defs(svg: &mut String, theme: &Theme) {
    svg.push_str("<defs>");
    svg.push_str(&format!(
        "<linearGradient id=\"primaryGrad\" x1=\"0%\" y1=\"0%\" x2=\"100%\" y2=\"100%\"><stop offset=\"0%\" stop-color=\"{}\"/><stop offset=\"100%\" stop-color=\"{}\"/></linearGradient>",
        theme.primary, theme.secondary
    ));
    svg.push_str(&format!(
        "<marker id=\"arrow\" viewBox=\"0 0 10 10\" refX=\"9\" refY=\"5\" markerWidth=\"8\" markerHeight=\"8\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{}\"/></marker>",
        theme.accent
    ));
    svg.push_str(&format!(
        "<marker id=\"hollowArrow\" viewBox=\"0 0 12 12\" refX=\"11\" refY=\"6\" markerWidth=\"10\" markerHeight=\"10\" orient=\"auto-start-reverse\"><path d=\"M 1 1 L 11 6 L 1 11 z\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1.5\"/></marker>",
        theme.surface, theme.accent
    ));
    svg.push_str("<filter id=\"shadow\" x=\"-20%\" y=\"-20%\" width=\"140%\" height=\"140%\"><feDropShadow dx=\"0\" dy=\"4\" stdDeviation=\"6\" flood-color=\"#0F172A\" flood-opacity=\"0.15\"/></filter>");
    svg.push_str("<filter id=\"glow\" x=\"-50%\" y=\"-50%\" width=\"200%\" height=\"200%\"><feGaussianBlur stdDeviation=\"6\" result=\"blur\"/><feMerge><feMergeNode in=\"blur\"/><feMergeNode in=\"SourceGraphic\"/></feMerge></filter>");
    svg.push_str("</defs>");
}

fn paint<'a>(paint: &'a Paint, theme: &'a Theme) -> &'a str {
    match paint {
        Paint::None => "none",
        Paint::Gradient => "url(#primaryGrad)",
        Paint::Primary => &theme.primary,
        Paint::Secondary => &theme.secondary,
        Paint::Accent => &theme.accent,
        Paint::Surface => &theme.surface,
        Paint::Background => &theme.background,
        Paint::Text => &theme.text_color,
        Paint::Muted => &theme.muted_text_color,
        Paint::Line => &theme.line_color,
        Paint::OnPrimary => &theme.on_primary,
        Paint::Color(value) => value,
    }
}

/// Shared presentation attributes, each with a leading space.
#[allow(clippy::too_many_arguments)]
fn decoration(
    stroke: &Paint,
    stroke_width: f32,
    dashed: bool,
    opacity: f32,
    marker: Option<Marker>,
    effect: Option<Effect>,
    class: Option<&str>,
    theme: &Theme,
) -> String {
    let mut attrs = String::new();
    if *stroke != Paint::None && stroke_width > 0.0 {
        let _ = write!(
            attrs,
            " stroke=\"{}\" stroke-width=\"{stroke_width:.2}\"",
            paint(stroke, theme)
        );
    }
    if dashed {
        attrs.push_str(" stroke-dasharray=\"6 4\"");
    }
    if opacity < 1.0 {
        let _ = write!(attrs, " opacity=\"{opacity:.2}\"");
    }
    match marker {
        Some(Marker::Arrow) => attrs.push_str(" marker-end=\"url(#arrow)\""),
        Some(Marker::Hollow) => attrs.push_str(" marker-end=\"url(#hollowArrow)\""),
        None => {}
    }
    match effect {
        Some(Effect::Shadow) => attrs.push_str(" filter=\"url(#shadow)\""),
        Some(Effect::Glow) => attrs.push_str(" filter=\"url(#glow)\""),
        None => {}
    }
    if let Some(class) = class {
        let _ = write!(attrs, " class=\"{class}\"");
    }
    attrs
}

fn push_rect(svg: &mut String, rect: &RectShape, theme: &Theme) {
    let _ = write!(
        svg,
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{:.2}\" ry=\"{:.2}\" fill=\"{}\"{}/>",
        rect.x,
        rect.y,
        rect.width.max(0.0),
        rect.height.max(0.0),
        rect.rx,
        rect.rx,
        paint(&rect.fill, theme),
        decoration(
            &rect.stroke,
            rect.stroke_width,
            rect.dashed,
            rect.opacity,
            None,
            rect.effect,
            rect.class,
            theme
        )
    );
}

fn push_circle(svg: &mut String, circle: &CircleShape, theme: &Theme) {
    let _ = write!(
        svg,
        "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{}\"{}/>",
        circle.cx,
        circle.cy,
        circle.r,
        paint(&circle.fill, theme),
        decoration(
            &circle.stroke,
            circle.stroke_width,
            false,
            circle.opacity,
            None,
            circle.effect,
            circle.class,
            theme
        )
    );
}

fn push_line(svg: &mut String, line: &LineShape, theme: &Theme) {
    let _ = write!(
        svg,
        "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\"{}/>",
        line.x1,
        line.y1,
        line.x2,
        line.y2,
        decoration(
            &line.stroke,
            line.stroke_width,
            line.dashed,
            line.opacity,
            line.marker,
            None,
            line.class,
            theme
        )
    );
}

fn push_path(svg: &mut String, path: &PathShape, theme: &Theme) {
    let _ = write!(
        svg,
        "<path d=\"{}\" fill=\"{}\"{}/>",
        path.d,
        paint(&path.fill, theme),
        decoration(
            &path.stroke,
            path.stroke_width,
            path.dashed,
            path.opacity,
            path.marker,
            None,
            path.class,
            theme
        )
    );
}

fn push_text(svg: &mut String, text: &TextShape, theme: &Theme) {
    let anchor = match text.anchor {
        Anchor::Start => "start",
        Anchor::Middle => "middle",
        Anchor::End => "end",
    };
    let class = text
        .class
        .map(|class| format!(" class=\"{class}\""))
        .unwrap_or_default();
    let _ = write!(
        svg,
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"{anchor}\" font-family=\"{}\" font-size=\"{}\" font-weight=\"{}\" fill=\"{}\"{class}>",
        text.x,
        text.y,
        theme.font_family,
        text.font_size,
        text.font_weight,
        paint(&text.fill, theme)
    );
    if text.lines.len() == 1 {
        svg.push_str(&escape_xml(&text.lines[0]));
    } else {
        let dy = text.font_size * text.line_height;
        for (idx, line) in text.lines.iter().enumerate() {
            if idx == 0 {
                let _ = write!(svg, "<tspan x=\"{:.2}\" dy=\"0\">{}", text.x, escape_xml(line));
            } else {
                let _ = write!(svg, "<tspan x=\"{:.2}\" dy=\"{dy:.2}\">{}", text.x, escape_xml(line));
            }
            svg.push_str("</tspan>");
        }
    }
    svg.push_str("</text>");
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();
    if let Some(size) = usvg::Size::from_wh(render_cfg.width, render_cfg.height) {
        opt.default_size = size;
    }

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;
    if let Some(background) = parse_hex_color(&render_cfg.background) {
        pixmap.fill(background);
    }

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(feature = "png")]
fn parse_hex_color(value: &str) -> Option<resvg::tiny_skia::Color> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some(resvg::tiny_skia::Color::from_rgba8(
        channel(0..2)?,
        channel(2..4)?,
        channel(4..6)?,
        255,
    ))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
