//! Diagram color themes supported by the rendering service.

use serde::Deserialize;

/// Rendering theme, passed to the service as a query parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Standard light theme.
    #[default]
    Default,
    /// Grayscale theme.
    Neutral,
    /// Dark background theme.
    Dark,
    /// Green-tinted theme.
    Forest,
}

impl Theme {
    /// Parse a theme name. Returns `None` for unknown names.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Self::Default),
            "neutral" => Some(Self::Neutral),
            "dark" => Some(Self::Dark),
            "forest" => Some(Self::Forest),
            _ => None,
        }
    }

    /// The query-parameter value for this theme.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Neutral => "neutral",
            Self::Dark => "dark",
            Self::Forest => "forest",
        }
    }
}
