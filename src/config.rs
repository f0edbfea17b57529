//! Host configuration for new plot clients.

use crate::plot::{PlotLocation, PlotRenderSettings};

/// Settings applied to every client a host creates.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Session the plots belong to.
    pub session_id: String,
    /// Where plots are displayed.
    pub location: PlotLocation,
    /// Render settings used for the Fit zoom level.
    pub render: PlotRenderSettings,
}

impl ClientConfig {
    /// Create a configuration for the given session with default settings.
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            location: PlotLocation::default(),
            render: PlotRenderSettings::default(),
        }
    }

    /// Set the display location.
    pub fn with_location(mut self, location: PlotLocation) -> Self {
        self.location = location;
        self
    }

    /// Set the render settings.
    pub fn with_render(mut self, render: PlotRenderSettings) -> Self {
        self.render = render;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("local")
    }
}
