//! Markdown to word-processing document conversion core.
//!
//! Ties the pipeline together: fenced mermaid diagrams are rendered to
//! images and substituted into the text ([`md2docx_diagrams`]), the result
//! is parsed with pulldown-cmark and walked into ordered document blocks
//! ([`md2docx_renderer`]), and the blocks are applied to a
//! [`DocumentBuilder`] which serializes the final file.
//!
//! # Example
//!
//! ```no_run
//! use md2docx_core::{Converter, ConvertOptions, MemoryBuilder};
//!
//! let converter = Converter::new(ConvertOptions::default());
//! let mut builder = MemoryBuilder::new();
//! let report = converter.convert("# Hello\n\nWorld.", &mut builder, "output/hello")?;
//! println!("saved {} ({} headings)", report.output_path.display(), report.stats.headings);
//! # Ok::<(), md2docx_core::ConvertError>(())
//! ```

mod builder;
mod config;
mod converter;
mod writer;

pub use builder::{BuilderOp, DocumentBuilder, MemoryBuilder, StyleNotFound};
pub use config::{ConfigError, ConvertOptions};
pub use converter::{ConversionReport, ConvertError, Converter};
pub use writer::{CODE_FONT, CODE_FONT_SIZE_PT, CODE_STYLE, write_blocks};

pub use md2docx_diagrams::{DiagramError, DiagramRenderer, Theme};
pub use md2docx_renderer::{ConversionStats, DocBlock, InlineRun, TableCell, Walker};
