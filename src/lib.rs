#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod fallback;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod llm;
pub mod normalize;
pub mod pipeline;
pub mod prompt;
pub mod registry;
pub mod render;
#[cfg(feature = "server")]
pub mod server;
pub mod theme;
pub mod variations;

#[cfg(feature = "cli")]
pub use cli::run;
pub use error::{Error, Result};
pub use ir::{DiagramData, DiagramKind, VariationStyle};
pub use pipeline::{DiagramOrchestrator, DiagramRequest, RenderWarning, RenderedDiagram};
pub use render::{render_diagram, render_error_svg, render_svg};
pub use theme::Theme;
