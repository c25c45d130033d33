//! Markdown event walker.
//!
//! Consumes a pulldown-cmark event stream and emits [`DocBlock`]s in strict
//! document order. Dispatch is a closed match over the event and tag kinds
//! with explicit default arms, so node kinds this walker does not understand
//! degrade to no-ops instead of errors.

use std::path::{Path, PathBuf};

use pulldown_cmark::{Event, HeadingLevel, Tag, TagEnd};

use crate::block::DocBlock;
use crate::state::{
    CodeBlockState, HeadingCapture, ImageCapture, ParagraphState, QuoteState, RunStyle, TableState,
};
use crate::stats::ConversionStats;

/// Walks a parsed markdown event stream into document blocks.
///
/// One walker is scoped to a single conversion run. Relative image paths
/// are resolved against `base_dir`, which is pinned at construction so
/// resolution cannot drift if the working directory changes mid-run.
///
/// # Example
///
/// ```
/// use md2docx_renderer::{ConversionStats, DocBlock, Walker};
/// use pulldown_cmark::Parser;
///
/// let mut stats = ConversionStats::default();
/// let blocks = Walker::new(".").walk(Parser::new("## Section"), &mut stats);
/// assert!(matches!(&blocks[0], DocBlock::Heading { level: 2, .. }));
/// assert_eq!(stats.headings, 1);
/// ```
pub struct Walker {
    base_dir: PathBuf,
    blocks: Vec<DocBlock>,
    paragraph: ParagraphState,
    heading: Option<HeadingCapture>,
    image: Option<ImageCapture>,
    code: CodeBlockState,
    table: TableState,
    quote: QuoteState,
    /// Stack of list ordered-flags for nested lists.
    lists: Vec<bool>,
    /// Stack of open list-item text buffers.
    items: Vec<String>,
}

impl Walker {
    /// Create a walker resolving relative image paths against `base_dir`.
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            blocks: Vec::new(),
            paragraph: ParagraphState::default(),
            heading: None,
            image: None,
            code: CodeBlockState::default(),
            table: TableState::default(),
            quote: QuoteState::default(),
            lists: Vec::new(),
            items: Vec::new(),
        }
    }

    /// Walk the event stream, updating `stats`, and return the blocks.
    pub fn walk<'a, I>(mut self, events: I, stats: &mut ConversionStats) -> Vec<DocBlock>
    where
        I: Iterator<Item = Event<'a>>,
    {
        for event in events {
            self.process_event(event, stats);
        }
        self.blocks
    }

    fn process_event(&mut self, event: Event<'_>, stats: &mut ConversionStats) {
        match event {
            Event::Start(tag) => self.start_tag(&tag),
            Event::End(tag) => self.end_tag(tag, stats),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.hard_break(),
            // Raw HTML, rules, math, footnotes: no counterpart in the
            // document model.
            _ => {}
        }
    }

    fn start_tag(&mut self, tag: &Tag<'_>) {
        // Blockquote content is flattened to text; only quote nesting and
        // image alt capture (so alt text stays out of the quote) matter.
        if self.quote.is_active() {
            match tag {
                Tag::BlockQuote(_) => self.quote.enter(),
                Tag::Image { .. } => self.start_image(tag),
                _ => {}
            }
            return;
        }

        // List items flatten their inline content the same way, but nested
        // lists still need their ordered flags tracked.
        if !self.items.is_empty() {
            match tag {
                Tag::List(start) => {
                    // The parent item's text must precede its children.
                    self.flush_open_item();
                    self.lists.push(start.is_some());
                }
                Tag::Item => self.items.push(String::new()),
                Tag::Image { .. } => self.start_image(tag),
                _ => {}
            }
            return;
        }

        match tag {
            Tag::Paragraph => {}
            Tag::Heading { level, .. } => {
                self.heading = Some(HeadingCapture {
                    level: heading_level_to_num(*level),
                    text: String::new(),
                });
            }
            Tag::BlockQuote(_) => self.quote.enter(),
            Tag::CodeBlock(_) => self.code.start(),
            Tag::List(start) => self.lists.push(start.is_some()),
            Tag::Item => self.items.push(String::new()),
            Tag::Table(_) => self.table.start(),
            Tag::TableHead => self.table.start_head(),
            Tag::TableRow => self.table.start_row(),
            Tag::TableCell => self.table.start_cell(),
            Tag::Strong => self.paragraph.push_style(RunStyle::Bold),
            Tag::Emphasis => self.paragraph.push_style(RunStyle::Italic),
            Tag::Link { .. } => self.paragraph.push_style(RunStyle::Link),
            Tag::Image { .. } => self.start_image(tag),
            // Forward-compatible default: unknown kinds are no-ops.
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd, stats: &mut ConversionStats) {
        if self.quote.is_active() {
            match tag {
                TagEnd::BlockQuote(_) => {
                    if let Some(text) = self.quote.leave()
                        && !text.is_empty()
                    {
                        self.blocks.push(DocBlock::Quote { text });
                    }
                }
                TagEnd::Paragraph => self.quote.push_str("\n"),
                TagEnd::Image => {
                    self.image = None;
                }
                _ => {}
            }
            return;
        }

        if !self.items.is_empty() {
            match tag {
                TagEnd::Item => self.end_item(),
                TagEnd::List(_) => {
                    self.lists.pop();
                }
                TagEnd::Image => {
                    self.image = None;
                }
                _ => {}
            }
            return;
        }

        match tag {
            TagEnd::Paragraph => self.flush_paragraph(),
            TagEnd::Heading(_) => self.end_heading(stats),
            TagEnd::CodeBlock => {
                let text = self.code.end();
                self.blocks.push(DocBlock::CodeBlock { text });
                stats.code_blocks += 1;
            }
            TagEnd::List(_) => {
                self.lists.pop();
            }
            TagEnd::Table => {
                if let Some(rows) = self.table.finish() {
                    self.blocks.push(DocBlock::Table { rows });
                    stats.tables += 1;
                }
            }
            TagEnd::TableHead => self.table.end_head(),
            TagEnd::TableRow => {}
            TagEnd::TableCell => self.table.end_cell(),
            TagEnd::Strong | TagEnd::Emphasis | TagEnd::Link => self.paragraph.pop_style(),
            TagEnd::Image => {
                // Images inside headings and table cells are dropped; the
                // capture only exists to keep the alt text out of them.
                if self.heading.is_some() || self.table.in_cell() {
                    self.image = None;
                } else {
                    self.end_image(stats);
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        // Priority: code > image alt > heading > table cell > item > quote.
        if self.code.is_active() {
            self.code.push_str(text);
        } else if let Some(image) = self.image.as_mut() {
            image.alt.push_str(text);
        } else if let Some(heading) = self.heading.as_mut() {
            heading.text.push_str(text);
        } else if self.table.in_cell() {
            self.table.push_str(text);
        } else if let Some(item) = self.items.last_mut() {
            item.push_str(text);
        } else if self.quote.is_active() {
            self.quote.push_str(text);
        } else {
            self.paragraph.push_text(text);
        }
    }

    fn inline_code(&mut self, code: &str) {
        if let Some(image) = self.image.as_mut() {
            image.alt.push_str(code);
        } else if let Some(heading) = self.heading.as_mut() {
            heading.text.push_str(code);
        } else if self.table.in_cell() {
            self.table.push_str(code);
        } else if let Some(item) = self.items.last_mut() {
            item.push_str(code);
        } else if self.quote.is_active() {
            self.quote.push_str(code);
        } else {
            self.paragraph.push_code(code);
        }
    }

    fn soft_break(&mut self) {
        if self.code.is_active() {
            self.code.push_newline();
        } else if self.quote.is_active() && self.image.is_none() && self.heading.is_none() {
            self.quote.push_str("\n");
        } else {
            self.text(" ");
        }
    }

    fn hard_break(&mut self) {
        self.soft_break();
    }

    fn start_image(&mut self, tag: &Tag<'_>) {
        if let Tag::Image { dest_url, .. } = tag {
            self.image = Some(ImageCapture {
                dest: dest_url.to_string(),
                alt: String::new(),
            });
        }
    }

    /// Embed a standalone or inline image, splitting any open paragraph.
    ///
    /// Missing files are skipped silently: no block, no error. The open
    /// paragraph is only flushed when the image actually embeds, so a
    /// skipped image leaves surrounding text joined.
    fn end_image(&mut self, stats: &mut ConversionStats) {
        let Some(capture) = self.image.take() else {
            return;
        };
        let src = Path::new(&capture.dest);
        let resolved = if src.is_absolute() {
            src.to_path_buf()
        } else {
            self.base_dir.join(src)
        };
        if resolved.is_file() {
            self.flush_paragraph();
            let alt = capture.alt.trim();
            let caption = (!alt.is_empty()).then(|| alt.to_owned());
            self.blocks.push(DocBlock::Image {
                path: resolved,
                caption,
            });
            stats.images += 1;
        } else {
            tracing::debug!(src = %capture.dest, "image file not found, skipping");
        }
    }

    fn end_heading(&mut self, stats: &mut ConversionStats) {
        let Some(capture) = self.heading.take() else {
            return;
        };
        // The first heading, when it is an H1, was already consumed as the
        // document title upstream: count it but emit no block.
        let suppressed = capture.level == 1 && stats.headings == 0;
        if !suppressed {
            self.blocks.push(DocBlock::Heading {
                level: capture.level,
                text: capture.text.trim().to_owned(),
            });
        }
        stats.headings += 1;
    }

    /// Emit the innermost open item's text so far, keeping its buffer open.
    ///
    /// Called when a nested list starts inside an item; whatever the item
    /// buffer holds at that point belongs before the child items.
    fn flush_open_item(&mut self) {
        if let Some(buffer) = self.items.last_mut() {
            let text = std::mem::take(buffer);
            self.emit_item_text(&text);
        }
    }

    fn end_item(&mut self) {
        if let Some(text) = self.items.pop() {
            self.emit_item_text(&text);
        }
    }

    /// Nothing is emitted for an empty buffer, which covers both blank
    /// items and items already flushed before a nested list.
    fn emit_item_text(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let ordered = self.lists.last().copied().unwrap_or(false);
        self.blocks.push(DocBlock::ListItem {
            text: text.to_owned(),
            ordered,
        });
    }

    fn flush_paragraph(&mut self) {
        if let Some(runs) = self.paragraph.take() {
            self.blocks.push(DocBlock::Paragraph { runs });
        }
    }
}

fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use pulldown_cmark::{Options, Parser};

    use super::*;
    use crate::block::{InlineRun, TableCell};

    fn walk(markdown: &str) -> (Vec<DocBlock>, ConversionStats) {
        walk_in(markdown, Path::new("."))
    }

    fn walk_in(markdown: &str, base_dir: &Path) -> (Vec<DocBlock>, ConversionStats) {
        let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
        let parser = Parser::new_ext(markdown, options);
        let mut stats = ConversionStats::default();
        let blocks = Walker::new(base_dir).walk(parser, &mut stats);
        (blocks, stats)
    }

    #[test]
    fn basic_paragraph() {
        let (blocks, stats) = walk("Hello, world!");
        assert_eq!(
            blocks,
            vec![DocBlock::Paragraph {
                runs: vec![InlineRun::Text("Hello, world!".into())],
            }]
        );
        assert_eq!(stats, ConversionStats::default());
    }

    #[test]
    fn inline_formatting_order_is_preserved() {
        let (blocks, _) = walk("plain **bold** *italic* `code` [link](https://example.com)");
        let DocBlock::Paragraph { runs } = &blocks[0] else {
            panic!("expected paragraph, got {blocks:?}");
        };
        assert_eq!(
            runs,
            &vec![
                InlineRun::Text("plain ".into()),
                InlineRun::Bold("bold".into()),
                InlineRun::Text(" ".into()),
                InlineRun::Italic("italic".into()),
                InlineRun::Text(" ".into()),
                InlineRun::Code("code".into()),
                InlineRun::Text(" ".into()),
                InlineRun::Link("link".into()),
            ]
        );
    }

    #[test]
    fn first_h1_is_suppressed_but_counted() {
        let (blocks, stats) = walk("# Title\n\n## Sec\n");
        assert_eq!(
            blocks,
            vec![DocBlock::Heading {
                level: 2,
                text: "Sec".into(),
            }]
        );
        assert_eq!(stats.headings, 2);
    }

    #[test]
    fn h1_after_another_heading_is_not_suppressed() {
        let (blocks, stats) = walk("## A\n\n# B\n");
        assert_eq!(blocks.len(), 2);
        assert_eq!(
            blocks[1],
            DocBlock::Heading {
                level: 1,
                text: "B".into(),
            }
        );
        assert_eq!(stats.headings, 2);
    }

    #[test]
    fn heading_with_inline_code() {
        let (blocks, _) = walk("## Install `npm`\n");
        assert_eq!(
            blocks,
            vec![DocBlock::Heading {
                level: 2,
                text: "Install npm".into(),
            }]
        );
    }

    #[test]
    fn title_table_scenario() {
        let (blocks, stats) = walk("# Title\n\n## Sec\n\n| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert_eq!(stats.headings, 2);
        assert_eq!(stats.tables, 1);
        assert_eq!(stats.code_blocks, 0);
        assert_eq!(stats.diagrams, 0);

        let Some(DocBlock::Table { rows }) = blocks.last() else {
            panic!("expected table, got {blocks:?}");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 2);
        assert_eq!(
            rows[0][0],
            TableCell {
                text: "a".into(),
                header: true,
            }
        );
        assert_eq!(
            rows[1][1],
            TableCell {
                text: "2".into(),
                header: false,
            }
        );
    }

    #[test]
    fn code_block_is_emitted_and_counted() {
        let (blocks, stats) = walk("```rust\nfn main() {}\n```\n");
        assert_eq!(stats.code_blocks, 1);
        let DocBlock::CodeBlock { text } = &blocks[0] else {
            panic!("expected code block, got {blocks:?}");
        };
        assert!(text.contains("fn main() {}"));
    }

    #[test]
    fn plain_fence_counts_too() {
        let (_, stats) = walk("```\ngraph TD\n  A --> B\n```\n");
        assert_eq!(stats.code_blocks, 1);
    }

    #[test]
    fn unordered_and_ordered_lists() {
        let (blocks, _) = walk("- one\n- two\n\n1. first\n2. second\n");
        assert_eq!(
            blocks,
            vec![
                DocBlock::ListItem {
                    text: "one".into(),
                    ordered: false,
                },
                DocBlock::ListItem {
                    text: "two".into(),
                    ordered: false,
                },
                DocBlock::ListItem {
                    text: "first".into(),
                    ordered: true,
                },
                DocBlock::ListItem {
                    text: "second".into(),
                    ordered: true,
                },
            ]
        );
    }

    #[test]
    fn nested_list_items_stay_in_document_order() {
        let (blocks, _) = walk("- one\n  - sub\n- two\n");
        assert_eq!(
            blocks,
            vec![
                DocBlock::ListItem {
                    text: "one".into(),
                    ordered: false,
                },
                DocBlock::ListItem {
                    text: "sub".into(),
                    ordered: false,
                },
                DocBlock::ListItem {
                    text: "two".into(),
                    ordered: false,
                },
            ]
        );
    }

    #[test]
    fn nested_list_keeps_each_levels_ordered_flag() {
        let (blocks, _) = walk("1. first\n   - sub\n2. second\n");
        assert_eq!(
            blocks,
            vec![
                DocBlock::ListItem {
                    text: "first".into(),
                    ordered: true,
                },
                DocBlock::ListItem {
                    text: "sub".into(),
                    ordered: false,
                },
                DocBlock::ListItem {
                    text: "second".into(),
                    ordered: true,
                },
            ]
        );
    }

    #[test]
    fn list_item_formatting_is_flattened() {
        let (blocks, _) = walk("- has **bold** and `code`\n");
        assert_eq!(
            blocks,
            vec![DocBlock::ListItem {
                text: "has bold and code".into(),
                ordered: false,
            }]
        );
    }

    #[test]
    fn blockquote_is_flattened() {
        let (blocks, _) = walk("> Note with **emphasis**\n");
        assert_eq!(
            blocks,
            vec![DocBlock::Quote {
                text: "Note with emphasis".into(),
            }]
        );
    }

    #[test]
    fn missing_image_is_skipped_silently() {
        let (blocks, stats) = walk("![alt](missing.png)\n");
        assert_eq!(blocks, vec![]);
        assert_eq!(stats.images, 0);
    }

    #[test]
    fn image_only_paragraph_emits_image_and_no_paragraph() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("pic.png"), b"\x89PNG\r\n\x1a\n").expect("write");

        let (blocks, stats) = walk_in("![A caption](pic.png)\n", dir.path());
        assert_eq!(blocks.len(), 1);
        let DocBlock::Image { path, caption } = &blocks[0] else {
            panic!("expected image, got {blocks:?}");
        };
        assert_eq!(path, &dir.path().join("pic.png"));
        assert_eq!(caption.as_deref(), Some("A caption"));
        assert_eq!(stats.images, 1);
    }

    #[test]
    fn image_with_empty_alt_has_no_caption() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("pic.png"), b"\x89PNG\r\n\x1a\n").expect("write");

        let (blocks, _) = walk_in("![](pic.png)\n", dir.path());
        let DocBlock::Image { caption, .. } = &blocks[0] else {
            panic!("expected image, got {blocks:?}");
        };
        assert_eq!(caption, &None);
    }

    #[test]
    fn inline_image_splits_paragraph_in_place() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("mid.png"), b"\x89PNG\r\n\x1a\n").expect("write");

        let (blocks, stats) = walk_in("before ![x](mid.png) after\n", dir.path());
        assert_eq!(blocks.len(), 3);
        assert!(matches!(&blocks[0], DocBlock::Paragraph { runs }
            if runs == &vec![InlineRun::Text("before ".into())]));
        assert!(matches!(&blocks[1], DocBlock::Image { .. }));
        assert!(matches!(&blocks[2], DocBlock::Paragraph { runs }
            if runs == &vec![InlineRun::Text(" after".into())]));
        assert_eq!(stats.images, 1);
    }

    #[test]
    fn skipped_inline_image_keeps_paragraph_whole() {
        let (blocks, stats) = walk("before ![x](gone.png) after\n");
        assert_eq!(blocks.len(), 1);
        assert!(matches!(&blocks[0], DocBlock::Paragraph { runs }
            if runs == &vec![InlineRun::Text("before  after".into())]));
        assert_eq!(stats.images, 0);
    }

    #[test]
    fn image_inside_table_cell_is_dropped() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("pic.png"), b"\x89PNG\r\n\x1a\n").expect("write");

        let markdown = "| ![alt](pic.png) cell |\n|---|\n| x |\n";
        let (blocks, stats) = walk_in(markdown, dir.path());
        assert_eq!(stats.images, 0);
        assert!(!blocks.iter().any(|b| matches!(b, DocBlock::Image { .. })));

        let Some(DocBlock::Table { rows }) = blocks.first() else {
            panic!("expected table, got {blocks:?}");
        };
        assert_eq!(rows[0][0].text, "cell");
    }

    #[test]
    fn image_inside_heading_is_dropped() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("pic.png"), b"\x89PNG\r\n\x1a\n").expect("write");

        let (blocks, stats) = walk_in("## Head ![a](pic.png)\n", dir.path());
        assert_eq!(stats.images, 0);
        assert_eq!(
            blocks,
            vec![DocBlock::Heading {
                level: 2,
                text: "Head".into(),
            }]
        );
    }

    #[test]
    fn absolute_image_path_is_used_as_is() {
        let dir = tempfile::tempdir().expect("tempdir");
        let abs = dir.path().join("abs.png");
        std::fs::write(&abs, b"\x89PNG\r\n\x1a\n").expect("write");

        let markdown = format!("![pic]({})\n", abs.display());
        let (blocks, _) = walk_in(&markdown, Path::new("/nonexistent-base"));
        assert!(matches!(&blocks[0], DocBlock::Image { path, .. } if path == &abs));
    }

    #[test]
    fn blocks_stay_in_document_order() {
        let (blocks, stats) = walk("# T\n\n## A\n\npara\n\n```\ncode\n```\n\n> q\n\n- li\n");
        let kinds: Vec<&'static str> = blocks
            .iter()
            .map(|b| match b {
                DocBlock::Heading { .. } => "heading",
                DocBlock::Paragraph { .. } => "paragraph",
                DocBlock::Table { .. } => "table",
                DocBlock::CodeBlock { .. } => "code",
                DocBlock::ListItem { .. } => "item",
                DocBlock::Quote { .. } => "quote",
                DocBlock::Image { .. } => "image",
            })
            .collect();
        assert_eq!(kinds, vec!["heading", "paragraph", "code", "quote", "item"]);
        assert_eq!(stats.headings, 2);
        assert_eq!(stats.code_blocks, 1);
    }

    #[test]
    fn soft_break_becomes_space_in_paragraph() {
        let (blocks, _) = walk("line one\nline two\n");
        assert_eq!(
            blocks,
            vec![DocBlock::Paragraph {
                runs: vec![InlineRun::Text("line one line two".into())],
            }]
        );
    }
}
