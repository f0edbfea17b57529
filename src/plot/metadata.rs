//! Plot identity and provenance.

use chrono::{DateTime, Utc};

use super::ZoomLevel;
use crate::error::ParseError;

/// Where a plot is displayed by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlotLocation {
    /// An editor pane.
    Editor,
    /// The plots view.
    #[default]
    View,
}

impl PlotLocation {
    /// Get display name.
    pub fn name(self) -> &'static str {
        match self {
            PlotLocation::Editor => "Editor",
            PlotLocation::View => "View",
        }
    }
}

impl std::str::FromStr for PlotLocation {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "editor" => Ok(PlotLocation::Editor),
            "view" => Ok(PlotLocation::View),
            _ => Err(ParseError::new("plot location", s)),
        }
    }
}

/// Immutable description of a plot, supplied when its client is created.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotMetadata {
    /// Unique plot identifier.
    pub id: String,
    /// When the plot was created.
    pub created: DateTime<Utc>,
    /// Plot this one replaces or derives from.
    pub parent_id: Option<String>,
    /// Code that produced the plot.
    pub code: String,
    /// Session that owns the plot.
    pub session_id: String,
    /// Zoom level to start with.
    pub zoom_level: Option<ZoomLevel>,
    /// Language of `code`.
    pub language: Option<String>,
}

impl PlotMetadata {
    /// Create metadata stamped with the current time.
    pub fn new(id: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created: Utc::now(),
            parent_id: None,
            code: String::new(),
            session_id: session_id.into(),
            zoom_level: None,
            language: None,
        }
    }

    /// Set the parent plot id.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Set the originating code and its language.
    pub fn with_code(mut self, code: impl Into<String>, language: Option<String>) -> Self {
        self.code = code.into();
        self.language = language;
        self
    }

    /// Set the initial zoom level.
    pub fn with_zoom_level(mut self, zoom_level: ZoomLevel) -> Self {
        self.zoom_level = Some(zoom_level);
        self
    }
}
