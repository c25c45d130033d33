//! The conversion pipeline.
//!
//! Data flow: raw markdown → diagram substitution → pulldown-cmark →
//! walker → block writer → builder save. Soft failures (a diagram that
//! would not render, an image file that does not exist) degrade locally;
//! only unrecoverable I/O surfaces as an error.

use std::path::{Path, PathBuf};

use md2docx_diagrams::{DiagramError, DiagramRenderer};
use md2docx_renderer::{ConversionStats, InlineRun, Walker};
use pulldown_cmark::{Options, Parser};

use crate::builder::DocumentBuilder;
use crate::config::ConvertOptions;
use crate::writer::write_blocks;

/// Placeholder paragraph inserted under the table-of-contents heading;
/// the word processor generates the real one on open.
const TOC_PLACEHOLDER: &str =
    "(Table of contents will be generated when you open the document in your word processor)";

/// Hard failure aborting a conversion run.
///
/// Per-diagram and per-image failures are not represented here; they
/// degrade in place and are only visible through lower statistics.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// Diagram renderer setup failed (image directory unavailable).
    #[error("diagram renderer setup: {0}")]
    Diagrams(#[from] DiagramError),

    /// The output document could not be written.
    #[error("failed to save document: {0}")]
    Save(#[from] std::io::Error),
}

/// Result of a completed conversion.
#[derive(Debug, Clone)]
pub struct ConversionReport {
    /// Where the document was saved, extension normalized.
    pub output_path: PathBuf,
    /// Read-only counters snapshot for the run.
    pub stats: ConversionStats,
}

/// Converts markdown documents through a [`DocumentBuilder`].
///
/// The converter itself is stateless across runs; every call to
/// [`convert`](Self::convert) starts from fresh statistics and a fresh
/// diagram ordinal space, so independent conversions never share mutable
/// state.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: ConvertOptions,
}

impl Converter {
    #[must_use]
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// Convert `markdown` and save the document at `output_path`.
    ///
    /// The path gets the builder's native extension appended when absent.
    /// Returns the saved path together with the statistics snapshot.
    pub fn convert<B: DocumentBuilder>(
        &self,
        markdown: &str,
        builder: &mut B,
        output_path: impl AsRef<Path>,
    ) -> Result<ConversionReport, ConvertError> {
        let mut stats = ConversionStats::default();

        if let Some(title) = extract_title(markdown) {
            builder.add_heading(&title, 0);
        }
        if self.options.include_toc {
            add_toc_placeholder(builder);
        }

        let mut diagrams = DiagramRenderer::with_endpoint(
            &self.options.render_url,
            &self.options.image_dir,
            self.options.theme,
        )?;
        let substituted = diagrams.substitute(markdown, &mut stats);

        let parser = Parser::new_ext(
            &substituted,
            Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS,
        );
        let blocks = Walker::new(&self.options.base_dir).walk(parser, &mut stats);
        write_blocks(builder, &blocks);

        let output_path = normalize_extension(output_path.as_ref(), B::EXTENSION);
        builder.save(&output_path)?;
        tracing::info!(path = %output_path.display(), ?stats, "document saved");

        Ok(ConversionReport { output_path, stats })
    }
}

/// First `# ` line of the document, used as the title heading.
fn extract_title(content: &str) -> Option<String> {
    content
        .lines()
        .find_map(|line| line.trim().strip_prefix("# "))
        .map(|title| title.trim().to_owned())
}

fn add_toc_placeholder<B: DocumentBuilder>(builder: &mut B) {
    builder.add_heading("Table of Contents", 1);
    builder.add_paragraph(&[InlineRun::Italic(TOC_PLACEHOLDER.to_owned())]);
    builder.add_page_break();
}

/// Append the builder's native extension unless already present.
fn normalize_extension(path: &Path, extension: &str) -> PathBuf {
    if path.extension().and_then(|e| e.to_str()) == Some(extension) {
        path.to_path_buf()
    } else {
        let mut with_ext = path.as_os_str().to_owned();
        with_ext.push(".");
        with_ext.push(extension);
        PathBuf::from(with_ext)
    }
}
