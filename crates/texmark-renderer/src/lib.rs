//! Markdown to LaTeX rendering.
//!
//! This crate turns markdown into LaTeX source that compiles with a stock
//! `pdflatex` installation.
//!
//! # Architecture
//!
//! - [`LatexRenderer`]: one operation per markdown construct, each appending
//!   LaTeX to a `String` sink. Headings, lists and paragraphs take a
//!   continuation and are rolled back when it writes nothing.
//! - [`Node`]: closed set of constructs, dispatched exhaustively through
//!   [`LatexRenderer::render`].
//! - [`MarkdownRenderer`]: walks a `pulldown-cmark` event stream and feeds
//!   the constructs it finds to a [`LatexRenderer`].
//!
//! # Example
//!
//! ```
//! use texmark_renderer::{MarkdownRenderer, RendererConfig};
//!
//! let config = RendererConfig::new("Release notes", "Docs team");
//! let result = MarkdownRenderer::new(config)
//!     .render_markdown("# Hello\n\n**Bold** text")
//!     .unwrap();
//! assert!(result.latex.contains("\\section{Hello}"));
//! assert!(result.latex.ends_with("\\end{document}\n"));
//! ```

mod config;
mod error;
mod escape;
mod latex;
mod node;
mod renderer;
mod util;

pub use config::{DEFAULT_GENERATOR, RenderFlags, RendererConfig};
pub use error::RenderError;
pub use escape::{escape_latex, push_escaped};
pub use latex::LatexRenderer;
pub use node::{Body, Emission, LinkKind, ListKind, Node};
pub use pulldown_cmark::{Alignment, HeadingLevel};
pub use renderer::{MarkdownRenderer, RenderResult};
pub use util::strip_extension;
