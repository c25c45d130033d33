//! Block writer: maps walker output onto the document builder.

use md2docx_renderer::DocBlock;

use crate::builder::DocumentBuilder;

/// Preferred paragraph style for code blocks.
pub const CODE_STYLE: &str = "Code Block";

/// Monospace font used when the preferred style is unavailable.
pub const CODE_FONT: &str = "Consolas";

/// Font size in points for the code fallback path.
pub const CODE_FONT_SIZE_PT: u8 = 9;

/// Apply blocks to the builder in order.
pub fn write_blocks<B: DocumentBuilder>(builder: &mut B, blocks: &[DocBlock]) {
    for block in blocks {
        match block {
            DocBlock::Heading { level, text } => builder.add_heading(text, *level),
            DocBlock::Paragraph { runs } => builder.add_paragraph(runs),
            DocBlock::Table { rows } => builder.add_table(rows),
            DocBlock::CodeBlock { text } => write_code_block(builder, text),
            DocBlock::ListItem { text, ordered } => builder.add_list_item(text, *ordered),
            DocBlock::Quote { text } => builder.add_quote(text),
            DocBlock::Image { path, caption } => builder.add_picture(path, caption.as_deref()),
        }
    }
}

/// Two-tier code block styling: the preferred named style first, then a
/// plain paragraph with the font attributes set by hand. Only the
/// style-absent condition takes the fallback.
fn write_code_block<B: DocumentBuilder>(builder: &mut B, text: &str) {
    if let Err(missing) = builder.add_styled_paragraph(text, CODE_STYLE) {
        tracing::debug!(%missing, "falling back to manual code formatting");
        builder.add_plain_code(text, CODE_FONT, CODE_FONT_SIZE_PT);
    }
}
