//! Document block model.
//!
//! [`DocBlock`] is the single channel between the walker and a document
//! builder: one discrete, ordered instruction ("add a heading", "add a
//! table"). [`InlineRun`] carries the formatted spans of one paragraph.

use std::path::PathBuf;

/// A contiguous span of inline-formatted text within one paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineRun {
    /// Plain text.
    Text(String),
    /// Bold (strong) text.
    Bold(String),
    /// Italic (emphasis) text.
    Italic(String),
    /// Inline code span, rendered in a monospace font.
    Code(String),
    /// Link text. The URL is not carried through; links render as plain
    /// text in the output document.
    Link(String),
}

impl InlineRun {
    /// The textual content of this run, regardless of formatting.
    #[must_use]
    pub fn content(&self) -> &str {
        match self {
            Self::Text(s) | Self::Bold(s) | Self::Italic(s) | Self::Code(s) | Self::Link(s) => s,
        }
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        match self {
            Self::Text(s) | Self::Bold(s) | Self::Italic(s) | Self::Code(s) | Self::Link(s) => {
                s.push_str(text);
            }
        }
    }
}

/// One table cell with its header flag.
///
/// Header cells are distinguished by node kind (the parser's table-head
/// section), not by row position, and are rendered bold downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableCell {
    /// Trimmed cell text.
    pub text: String,
    /// Whether the cell belongs to the header row.
    pub header: bool,
}

/// One structural operation against the document builder.
///
/// Blocks are emitted in strict document order; the walker never reorders
/// or buffers across siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocBlock {
    /// A heading at levels 1-6.
    Heading { level: u8, text: String },
    /// A paragraph of ordered inline runs.
    Paragraph { runs: Vec<InlineRun> },
    /// A table. All rows are padded to the same width; short rows get
    /// trailing blank cells.
    Table { rows: Vec<Vec<TableCell>> },
    /// A preformatted code block, no syntax highlighting.
    CodeBlock { text: String },
    /// One list item with flattened plain-text content.
    ListItem { text: String, ordered: bool },
    /// A blockquote with flattened text.
    Quote { text: String },
    /// An embedded image. `path` points at an existing file; missing
    /// images are skipped before a block is ever produced.
    Image {
        path: PathBuf,
        caption: Option<String>,
    },
}
