//! Fenced diagram extraction and remote rendering.
//!
//! Substitution happens before markdown parsing, so the downstream walker
//! only ever sees ordinary image syntax or ordinary code fences: a rendered
//! diagram becomes `![Diagram N](/abs/path/diagram_N.png)`, a failed one is
//! re-emitted as a plain fence with the source verbatim.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use base64::Engine;
use base64::prelude::BASE64_URL_SAFE;
use md2docx_renderer::ConversionStats;
use regex::{Captures, Regex};
use ureq::Agent;

use crate::consts::{DEFAULT_ENDPOINT, RENDER_TIMEOUT, USER_AGENT};
use crate::error::DiagramError;
use crate::theme::Theme;

/// Fenced mermaid block, tolerant of trailing whitespace after the tag,
/// non-greedy to the closing fence.
static MERMAID_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```mermaid\s*\n(.*?)\n\s*```").expect("hardcoded regex compiles")
});

/// One fenced diagram occurrence, in document order.
///
/// Ordinals are assigned monotonically from 1, scoped to one renderer (one
/// conversion run), and never reused - a failed render still consumes its
/// ordinal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramBlock {
    /// 1-based position among the document's diagram fences.
    pub ordinal: usize,
    /// Trimmed diagram source.
    pub source: String,
}

/// Result of successfully rendering one diagram. Written once, never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    /// Ordinal of the diagram this image belongs to.
    pub ordinal: usize,
    /// Absolute path of the persisted PNG file.
    pub path: PathBuf,
    /// Size of the persisted file in bytes.
    pub byte_size: u64,
}

/// Renders fenced mermaid blocks to PNG files via a remote service.
///
/// One renderer is scoped to a single conversion run: the ordinal counter
/// and image directory are instance state, so independent conversions can
/// run concurrently with no shared mutable state.
///
/// Rendering is strictly sequential - block N+1 is only requested after
/// block N's response and file write complete - which keeps ordinals and
/// filenames deterministic.
pub struct DiagramRenderer {
    agent: Agent,
    endpoint: String,
    theme: Theme,
    image_dir: PathBuf,
    ordinal: usize,
}

impl DiagramRenderer {
    /// Create a renderer against the default rendering service.
    ///
    /// The image directory is created if absent and resolved to an
    /// absolute path up front, so embedded references stay valid even if
    /// the working directory changes later in the run.
    pub fn new(image_dir: impl AsRef<Path>, theme: Theme) -> Result<Self, DiagramError> {
        Self::with_endpoint(DEFAULT_ENDPOINT, image_dir, theme)
    }

    /// Create a renderer against a custom endpoint (used by tests and
    /// self-hosted deployments).
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        image_dir: impl AsRef<Path>,
        theme: Theme,
    ) -> Result<Self, DiagramError> {
        let image_dir = std::path::absolute(image_dir.as_ref())?;
        fs::create_dir_all(&image_dir)?;
        let endpoint = endpoint.into().trim_end_matches('/').to_owned();
        Ok(Self {
            agent: create_agent(RENDER_TIMEOUT),
            endpoint,
            theme,
            image_dir,
            ordinal: 0,
        })
    }

    /// Replace every fenced mermaid block in `text`.
    ///
    /// Successful renders become image references with alt text
    /// `Diagram <ordinal>`; failures re-emit the source inside a plain
    /// fence. Per-diagram failures are isolated: one failing diagram never
    /// affects its siblings. Input without diagram fences is returned
    /// unchanged.
    ///
    /// `stats.diagrams` is incremented once per successful substitution,
    /// not per attempt.
    pub fn substitute(&mut self, text: &str, stats: &mut ConversionStats) -> String {
        MERMAID_FENCE
            .replace_all(text, |caps: &Captures<'_>| {
                self.ordinal += 1;
                let block = DiagramBlock {
                    ordinal: self.ordinal,
                    source: caps[1].trim().to_owned(),
                };
                match self.render_block(&block) {
                    Some(image) => {
                        stats.diagrams += 1;
                        format!(
                            "\n![Diagram {}]({})\n",
                            block.ordinal,
                            image.path.display()
                        )
                    }
                    None => format!("\n```\n{}\n```\n", block.source),
                }
            })
            .into_owned()
    }

    /// Render one block, degrading any failure to `None`.
    fn render_block(&self, block: &DiagramBlock) -> Option<RenderedImage> {
        match self.render_remote(block) {
            Ok(image) => {
                tracing::debug!(
                    ordinal = block.ordinal,
                    bytes = image.byte_size,
                    path = %image.path.display(),
                    "diagram rendered"
                );
                Some(image)
            }
            Err(error) => {
                tracing::warn!(
                    ordinal = block.ordinal,
                    %error,
                    "diagram rendering failed, falling back to code fence"
                );
                None
            }
        }
    }

    fn render_remote(&self, block: &DiagramBlock) -> Result<RenderedImage, DiagramError> {
        let data = self.fetch(&block.source)?;
        self.persist(block.ordinal, &data)
    }

    /// GET the rendered image for one diagram source.
    fn fetch(&self, source: &str) -> Result<Vec<u8>, DiagramError> {
        let encoded = BASE64_URL_SAFE.encode(source);
        let url = format!(
            "{}/img/{}?theme={}",
            self.endpoint,
            encoded,
            self.theme.as_str()
        );

        let response = self
            .agent
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| DiagramError::Http(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        let mut body = response.into_body();

        if status != 200 {
            let error_body = body
                .read_to_string()
                .unwrap_or_else(|_| String::from("(unable to read error body)"));
            return Err(DiagramError::Http(format!("HTTP {status}: {error_body}")));
        }
        if !content_type.contains("image") {
            return Err(DiagramError::ContentType(content_type));
        }

        body.read_to_vec()
            .map_err(|e| DiagramError::Http(e.to_string()))
    }

    /// Write the image as `diagram_<ordinal>.png`, re-encoding to PNG when
    /// the service returned another raster format.
    fn persist(&self, ordinal: usize, data: &[u8]) -> Result<RenderedImage, DiagramError> {
        let path = self.image_dir.join(format!("diagram_{ordinal}.png"));
        if png_dimensions(data).is_some() {
            fs::write(&path, data)?;
        } else {
            let decoded = image::load_from_memory(data)
                .map_err(|e| DiagramError::Decode(e.to_string()))?;
            decoded
                .save_with_format(&path, image::ImageFormat::Png)
                .map_err(|e| DiagramError::Decode(e.to_string()))?;
        }
        Ok(RenderedImage {
            ordinal,
            byte_size: fs::metadata(&path)?.len(),
            path,
        })
    }
}

/// Create HTTP agent with the specified timeout.
///
/// Statuses are not mapped to transport errors; non-200 responses are
/// handled explicitly so the error body can be reported.
fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// Extract width and height from PNG image data.
///
/// PNG format: 8-byte signature, then IHDR chunk with width/height at bytes 16-24.
fn png_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    if data.len() < 24 {
        return None;
    }

    if &data[0..8] != b"\x89PNG\r\n\x1a\n" {
        return None;
    }

    let width = u32::from_be_bytes([data[16], data[17], data[18], data[19]]);
    let height = u32::from_be_bytes([data[20], data[21], data[22], data[23]]);
    Some((width, height))
}
