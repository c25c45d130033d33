//! Markdown walker producing word-processor document blocks.
//!
//! This crate is the structural half of the markdown-to-document pipeline:
//! it consumes a pulldown-cmark event stream (diagram fences already
//! substituted upstream) and emits an ordered sequence of [`DocBlock`]s for
//! a document builder to consume, while updating [`ConversionStats`].
//!
//! The walker has zero diagram-specific logic: by the time it runs, every
//! diagram has been replaced with either ordinary image syntax or an
//! ordinary code fence.
//!
//! # Example
//!
//! ```
//! use md2docx_renderer::{ConversionStats, Walker};
//! use pulldown_cmark::{Options, Parser};
//!
//! let parser = Parser::new_ext("# Title\n\nHello.", Options::ENABLE_TABLES);
//! let mut stats = ConversionStats::default();
//! let blocks = Walker::new(".").walk(parser, &mut stats);
//! ```

mod block;
mod state;
mod stats;
mod walker;

pub use block::{DocBlock, InlineRun, TableCell};
pub use stats::ConversionStats;
pub use walker::Walker;
