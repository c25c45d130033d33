//! Mermaid diagram extraction and remote rendering.
//!
//! This crate is the first stage of the markdown-to-document pipeline: it
//! scans raw markdown for fenced ```` ```mermaid ```` blocks, renders each
//! one to PNG via a remote rendering service, persists the image, and
//! substitutes an image reference into the text. Any per-diagram failure
//! (timeout, non-200, wrong content type, decode error) degrades that
//! block to a plain code fence so the source is never lost.
//!
//! # Example
//!
//! ```no_run
//! use md2docx_diagrams::{DiagramRenderer, Theme};
//! use md2docx_renderer::ConversionStats;
//!
//! let mut renderer = DiagramRenderer::new("output/images", Theme::Default)?;
//! let mut stats = ConversionStats::default();
//! let substituted = renderer.substitute("```mermaid\ngraph TD\n  A --> B\n```", &mut stats);
//! # Ok::<(), md2docx_diagrams::DiagramError>(())
//! ```

mod consts;
mod error;
mod renderer;
mod theme;

pub use consts::DEFAULT_ENDPOINT;
pub use error::DiagramError;
pub use renderer::{DiagramBlock, DiagramRenderer, RenderedImage};
pub use theme::Theme;
