//! The document builder seam.
//!
//! The word-processor serializer is an external collaborator consumed
//! behind the blind [`DocumentBuilder`] trait: the pipeline only ever
//! appends structural operations and finally saves. [`MemoryBuilder`] is
//! the in-memory implementation used by tests and dry runs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use md2docx_renderer::{InlineRun, TableCell};

use crate::writer::CODE_STYLE;

/// Raised by a builder when a named paragraph style is unavailable.
#[derive(Debug, thiserror::Error)]
#[error("style '{0}' not found")]
pub struct StyleNotFound(pub String);

/// Append-only handle onto one output document.
///
/// Implementations own the "current document" and are stateless between
/// calls otherwise. Operations arrive in document order and are never
/// reordered by the pipeline.
pub trait DocumentBuilder {
    /// Native file extension of the output format, without the dot.
    const EXTENSION: &'static str;

    /// Add a heading. Level 0 is the document title style; 1-6 are
    /// section headings.
    fn add_heading(&mut self, text: &str, level: u8);

    /// Add a paragraph of ordered inline runs.
    fn add_paragraph(&mut self, runs: &[InlineRun]);

    /// Add a paragraph using a named style.
    ///
    /// Returns `Err` only when the style is absent from the document;
    /// the caller decides the fallback.
    fn add_styled_paragraph(&mut self, text: &str, style: &str) -> Result<(), StyleNotFound>;

    /// Add a code paragraph with manually set font attributes. This is the
    /// fallback when the preferred code style is unavailable.
    fn add_plain_code(&mut self, text: &str, font: &str, size_pt: u8);

    /// Add a table. Rows are pre-padded to equal width; header cells are
    /// flagged on the cells themselves and rendered bold.
    fn add_table(&mut self, rows: &[Vec<TableCell>]);

    /// Add one list item, bulleted or numbered.
    fn add_list_item(&mut self, text: &str, ordered: bool);

    /// Add a quote paragraph.
    fn add_quote(&mut self, text: &str);

    /// Embed a picture at the builder's default width, with an optional
    /// italic caption below.
    fn add_picture(&mut self, path: &Path, caption: Option<&str>);

    /// Insert a page break.
    fn add_page_break(&mut self);

    /// Serialize the document to `path`.
    fn save(&mut self, path: &Path) -> io::Result<()>;
}

/// One recorded builder call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuilderOp {
    Heading {
        level: u8,
        text: String,
    },
    Paragraph {
        runs: Vec<InlineRun>,
    },
    StyledParagraph {
        style: String,
        text: String,
    },
    PlainCode {
        text: String,
        font: String,
        size_pt: u8,
    },
    Table {
        rows: Vec<Vec<TableCell>>,
    },
    ListItem {
        text: String,
        ordered: bool,
    },
    Quote {
        text: String,
    },
    Picture {
        path: PathBuf,
        caption: Option<String>,
    },
    PageBreak,
}

/// In-memory builder recording every operation in order.
///
/// `save` writes a plain-text dump of the recorded operations, which makes
/// hard I/O failures (unwritable output path) observable in tests.
#[derive(Debug)]
pub struct MemoryBuilder {
    /// Operations in the order they were applied.
    pub ops: Vec<BuilderOp>,
    styles: Vec<String>,
}

impl MemoryBuilder {
    /// Builder with the preferred code style available.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            styles: vec![CODE_STYLE.to_owned()],
        }
    }

    /// Builder with no named styles, forcing the fallback path.
    #[must_use]
    pub fn without_styles() -> Self {
        Self {
            ops: Vec::new(),
            styles: Vec::new(),
        }
    }
}

impl Default for MemoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentBuilder for MemoryBuilder {
    const EXTENSION: &'static str = "docx";

    fn add_heading(&mut self, text: &str, level: u8) {
        self.ops.push(BuilderOp::Heading {
            level,
            text: text.to_owned(),
        });
    }

    fn add_paragraph(&mut self, runs: &[InlineRun]) {
        self.ops.push(BuilderOp::Paragraph {
            runs: runs.to_vec(),
        });
    }

    fn add_styled_paragraph(&mut self, text: &str, style: &str) -> Result<(), StyleNotFound> {
        if self.styles.iter().any(|s| s == style) {
            self.ops.push(BuilderOp::StyledParagraph {
                style: style.to_owned(),
                text: text.to_owned(),
            });
            Ok(())
        } else {
            Err(StyleNotFound(style.to_owned()))
        }
    }

    fn add_plain_code(&mut self, text: &str, font: &str, size_pt: u8) {
        self.ops.push(BuilderOp::PlainCode {
            text: text.to_owned(),
            font: font.to_owned(),
            size_pt,
        });
    }

    fn add_table(&mut self, rows: &[Vec<TableCell>]) {
        self.ops.push(BuilderOp::Table {
            rows: rows.to_vec(),
        });
    }

    fn add_list_item(&mut self, text: &str, ordered: bool) {
        self.ops.push(BuilderOp::ListItem {
            text: text.to_owned(),
            ordered,
        });
    }

    fn add_quote(&mut self, text: &str) {
        self.ops.push(BuilderOp::Quote {
            text: text.to_owned(),
        });
    }

    fn add_picture(&mut self, path: &Path, caption: Option<&str>) {
        self.ops.push(BuilderOp::Picture {
            path: path.to_path_buf(),
            caption: caption.map(str::to_owned),
        });
    }

    fn add_page_break(&mut self) {
        self.ops.push(BuilderOp::PageBreak);
    }

    fn save(&mut self, path: &Path) -> io::Result<()> {
        let mut dump = String::new();
        for op in &self.ops {
            dump.push_str(&format!("{op:?}\n"));
        }
        fs::write(path, dump)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn styled_paragraph_errs_when_style_absent() {
        let mut builder = MemoryBuilder::without_styles();
        let result = builder.add_styled_paragraph("code", CODE_STYLE);
        assert!(result.is_err());
        assert_eq!(builder.ops, vec![]);
    }

    #[test]
    fn styled_paragraph_records_when_style_known() {
        let mut builder = MemoryBuilder::new();
        builder
            .add_styled_paragraph("code", CODE_STYLE)
            .expect("style available");
        assert_eq!(
            builder.ops,
            vec![BuilderOp::StyledParagraph {
                style: CODE_STYLE.to_owned(),
                text: "code".to_owned(),
            }]
        );
    }

    #[test]
    fn save_writes_and_fails_on_bad_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut builder = MemoryBuilder::new();
        builder.add_page_break();

        let good = dir.path().join("doc.docx");
        builder.save(&good).expect("save");
        assert!(good.is_file());

        let bad = dir.path().join("no-such-dir").join("doc.docx");
        assert!(builder.save(&bad).is_err());
    }
}
