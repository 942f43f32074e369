use crate::config::{Config, load_config};
use crate::fallback::{customize_for_style, fallback_data};
use crate::ir::{DiagramData, DiagramKind, VariationStyle};
use crate::layout::compute_layout;
use crate::layout_dump::write_layout_dump;
use crate::normalize::normalize;
#[cfg(feature = "png")]
use crate::render::write_output_png;
use crate::render::{render_svg, write_output_svg};
use crate::theme::Theme;
use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "napkin", version, about = "Topic-to-diagram service and renderer")]
pub struct Args {
    /// Config JSON file (camelCase keys)
    #[arg(short = 'c', long = "configFile", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP service
    Serve(ServeArgs),
    /// Render one diagram from JSON data or a topic's canned data
    Render(RenderArgs),
}

#[derive(ClapArgs, Debug)]
pub struct ServeArgs {
    #[arg(long)]
    pub host: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(ClapArgs, Debug)]
pub struct RenderArgs {
    /// Diagram type, e.g. flowchart, "mind map", erd
    #[arg(short = 't', long = "type")]
    pub diagram_type: String,

    /// Diagram JSON file or '-' for stdin
    #[arg(short = 'i', long = "input", conflicts_with = "topic")]
    pub input: Option<PathBuf>,

    /// Render the canned data for this topic instead of JSON input
    #[arg(long)]
    pub topic: Option<String>,

    /// Variation style (standard, detailed, compact, enhanced)
    #[arg(long, value_parser = parse_style)]
    pub style: Option<VariationStyle>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Write the computed layout as JSON
    #[arg(long = "dump-layout")]
    pub dump_layout: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
}

fn parse_style(value: &str) -> std::result::Result<VariationStyle, String> {
    VariationStyle::from_name(value).ok_or_else(|| format!("unknown style `{value}`"))
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    init_tracing(&config.log_level);

    match args.command {
        Command::Serve(serve) => {
            if let Some(host) = serve.host {
                config.server.host = host;
            }
            if let Some(port) = serve.port {
                config.server.port = port;
            }
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(crate::server::serve(&config))
        }
        Command::Render(render) => run_render(&render, &config),
    }
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run_render(args: &RenderArgs, config: &Config) -> Result<()> {
    let kind = DiagramKind::from_name(&args.diagram_type)
        .ok_or_else(|| anyhow::anyhow!("Unknown diagram type `{}`", args.diagram_type))?;
    let data = load_data(args, kind)?;
    let theme = match args.style {
        Some(style) => Theme::for_style(style),
        None => Theme::for_kind(kind),
    };

    let layout = compute_layout(&data)?;
    if let Some(path) = &args.dump_layout {
        write_layout_dump(path, &layout)?;
    }
    let svg = render_svg(&layout, &theme);
    match args.output_format {
        OutputFormat::Svg => write_output_svg(&svg, args.output.as_deref()),
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_png(&svg, &output, config)
        }
    }
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, config: &Config) -> Result<()> {
    write_output_png(svg, output, &config.render)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn load_data(args: &RenderArgs, kind: DiagramKind) -> Result<DiagramData> {
    if let Some(topic) = &args.topic {
        let data = fallback_data(kind, topic);
        return Ok(match args.style {
            Some(style) => customize_for_style(data, style, topic),
            None => data,
        });
    }
    let input = read_input(args.input.as_deref())?;
    let raw: serde_json::Value = serde_json::from_str(&input).context("Diagram input is not valid JSON")?;
    Ok(normalize(&raw, kind)?)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path.filter(|path| *path != Path::new("-")) {
        return std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()));
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_render_arguments() {
        let args = Args::try_parse_from([
            "napkin", "render", "-t", "mind map", "--topic", "tea", "--style", "Compact", "-e", "png", "-o",
            "out.png",
        ])
        .unwrap();
        let Command::Render(render) = args.command else {
            panic!("expected render");
        };
        assert_eq!(render.diagram_type, "mind map");
        assert_eq!(render.style, Some(VariationStyle::Compact));
        assert_eq!(render.output_format, OutputFormat::Png);
    }

    #[test]
    fn input_and_topic_conflict() {
        let parsed = Args::try_parse_from(["napkin", "render", "-t", "erd", "-i", "a.json", "--topic", "x"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn topic_renders_styled_fallback() {
        let args = RenderArgs {
            diagram_type: "flowchart".to_string(),
            input: None,
            topic: Some("tea".to_string()),
            style: Some(VariationStyle::Compact),
            output: None,
            output_format: OutputFormat::Svg,
            dump_layout: None,
        };
        let data = load_data(&args, DiagramKind::Flowchart).unwrap();
        let plain = fallback_data(DiagramKind::Flowchart, "tea");
        assert_ne!(data, plain);
    }

    #[test]
    fn png_requires_output_path() {
        assert!(ensure_output(&None, "png").is_err());
    }
}
