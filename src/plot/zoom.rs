//! Zoom levels.

/// Discrete display-scale mode of a plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ZoomLevel {
    /// Scale the plot to fill its container.
    #[default]
    Fit,
    /// Show the plot at its intrinsic size.
    OneHundred,
}

impl ZoomLevel {
    /// Get display name.
    pub fn name(self) -> &'static str {
        match self {
            ZoomLevel::Fit => "Fit",
            ZoomLevel::OneHundred => "100%",
        }
    }
}

impl std::fmt::Display for ZoomLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
