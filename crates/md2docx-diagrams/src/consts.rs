//! Internal constants for diagram rendering.

use std::time::Duration;

/// Default mermaid.ink rendering endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://mermaid.ink";

/// HTTP timeout for a single rendering request.
pub const RENDER_TIMEOUT: Duration = Duration::from_secs(15);

/// User-Agent header sent with rendering requests.
pub const USER_AGENT: &str = concat!("md2docx/", env!("CARGO_PKG_VERSION"));
