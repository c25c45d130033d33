//! Shared state structs for walking markdown events.
//!
//! These track context while the walker processes the event stream: the
//! open-paragraph accumulator, table row collection, code block and image
//! alt-text capture, heading capture, and blockquote/list-item flattening.

use crate::block::{InlineRun, TableCell};

/// Inline formatting applied to text inside a paragraph.
///
/// Nested formatting is flattened to the innermost style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RunStyle {
    Bold,
    Italic,
    Link,
}

/// The open-paragraph accumulator.
///
/// `None` means no paragraph is open; appending text opens one. Closing
/// never emits an empty paragraph, so a paragraph containing only an image
/// produces no `Paragraph` block at all.
#[derive(Default)]
pub(crate) struct ParagraphState {
    runs: Option<Vec<InlineRun>>,
    styles: Vec<RunStyle>,
}

impl ParagraphState {
    pub fn open(&mut self) {
        if self.runs.is_none() {
            self.runs = Some(Vec::new());
        }
    }

    pub fn is_open(&self) -> bool {
        self.runs.is_some()
    }

    pub fn push_style(&mut self, style: RunStyle) {
        self.styles.push(style);
    }

    pub fn pop_style(&mut self) {
        self.styles.pop();
    }

    /// Append text under the current style, merging into the previous run
    /// when the style matches.
    pub fn push_text(&mut self, text: &str) {
        // Whitespace-only text never opens a paragraph on its own.
        if self.runs.is_none() && text.trim().is_empty() {
            return;
        }
        let run = self.make_run(text);
        let runs = self.runs.get_or_insert_with(Vec::new);
        match runs.last_mut() {
            Some(last) if std::mem::discriminant(last) == std::mem::discriminant(&run) => {
                last.push_str(text);
            }
            _ => runs.push(run),
        }
    }

    /// Append an inline code span as a `Code` run.
    pub fn push_code(&mut self, code: &str) {
        self.open();
        if let Some(runs) = self.runs.as_mut() {
            runs.push(InlineRun::Code(code.to_owned()));
        }
    }

    /// Close the paragraph, returning its runs if any were accumulated.
    pub fn take(&mut self) -> Option<Vec<InlineRun>> {
        self.runs.take().filter(|runs| !runs.is_empty())
    }

    fn make_run(&self, text: &str) -> InlineRun {
        let text = text.to_owned();
        match self.styles.last() {
            Some(RunStyle::Bold) => InlineRun::Bold(text),
            Some(RunStyle::Italic) => InlineRun::Italic(text),
            Some(RunStyle::Link) => InlineRun::Link(text),
            None => InlineRun::Text(text),
        }
    }
}

/// State for collecting table rows.
#[derive(Default)]
pub(crate) struct TableState {
    in_head: bool,
    rows: Vec<Vec<TableCell>>,
    cell: Option<String>,
}

impl TableState {
    pub fn start(&mut self) {
        self.in_head = false;
        self.rows.clear();
        self.cell = None;
    }

    pub fn start_head(&mut self) {
        self.in_head = true;
        self.rows.push(Vec::new());
    }

    pub fn end_head(&mut self) {
        self.in_head = false;
    }

    pub fn start_row(&mut self) {
        self.rows.push(Vec::new());
    }

    pub fn start_cell(&mut self) {
        self.cell = Some(String::new());
    }

    pub fn in_cell(&self) -> bool {
        self.cell.is_some()
    }

    pub fn push_str(&mut self, text: &str) {
        if let Some(cell) = self.cell.as_mut() {
            cell.push_str(text);
        }
    }

    pub fn end_cell(&mut self) {
        let text = self.cell.take().unwrap_or_default();
        let header = self.in_head;
        if let Some(row) = self.rows.last_mut() {
            row.push(TableCell {
                text: text.trim().to_owned(),
                header,
            });
        }
    }

    /// Finish the table: rows padded to the widest row with blank cells.
    ///
    /// Returns `None` for a table with no rows.
    pub fn finish(&mut self) -> Option<Vec<Vec<TableCell>>> {
        let mut rows = std::mem::take(&mut self.rows);
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if width == 0 {
            return None;
        }
        for row in &mut rows {
            row.resize(width, TableCell::default());
        }
        Some(rows)
    }
}

/// State for capturing code block content.
#[derive(Default)]
pub(crate) struct CodeBlockState {
    active: bool,
    buffer: String,
}

impl CodeBlockState {
    pub fn start(&mut self) {
        self.active = true;
        self.buffer.clear();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    pub fn push_newline(&mut self) {
        self.buffer.push('\n');
    }

    pub fn end(&mut self) -> String {
        self.active = false;
        std::mem::take(&mut self.buffer)
    }
}

/// Pending image: destination plus alt text collected from inner events.
pub(crate) struct ImageCapture {
    pub dest: String,
    pub alt: String,
}

/// Pending heading: level plus flattened text.
pub(crate) struct HeadingCapture {
    pub level: u8,
    pub text: String,
}

/// State for flattening blockquote content to plain text.
///
/// Depth tracks nesting; all inner structure is flattened into one buffer
/// until the outermost quote closes.
#[derive(Default)]
pub(crate) struct QuoteState {
    depth: usize,
    buffer: String,
}

impl QuoteState {
    pub fn enter(&mut self) {
        if self.depth == 0 {
            self.buffer.clear();
        }
        self.depth += 1;
    }

    /// Leave one quote level; at the outermost level returns the text.
    pub fn leave(&mut self) -> Option<String> {
        self.depth = self.depth.saturating_sub(1);
        (self.depth == 0).then(|| std::mem::take(&mut self.buffer).trim().to_owned())
    }

    pub fn is_active(&self) -> bool {
        self.depth > 0
    }

    pub fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }
}
