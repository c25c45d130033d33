//! Conversion statistics.

/// Counters updated as a side effect of diagram substitution and walking.
///
/// One instance is scoped to a single conversion run: created fresh at the
/// start, incremented only at the documented points, and exposed as a
/// read-only snapshot afterwards. Nothing is shared across runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionStats {
    /// All heading nodes seen, including the suppressed title heading.
    pub headings: usize,
    /// Tables emitted, one per table node regardless of size.
    pub tables: usize,
    /// Code blocks emitted, including diagram fallback fences.
    pub code_blocks: usize,
    /// Diagrams successfully rendered and substituted (not attempts).
    pub diagrams: usize,
    /// Images embedded into the document (missing files are not counted).
    pub images: usize,
}
