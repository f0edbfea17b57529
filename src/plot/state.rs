//! Render lifecycle of a plot client.

/// Where a plot client is in its lifecycle.
///
/// `Closed` is terminal: once entered, no other state is reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderState {
    /// No render has completed yet and none is running.
    #[default]
    Unrendered,
    /// A render request is in flight.
    Rendering,
    /// At least one render has completed and none is running.
    Rendered,
    /// The client has been closed.
    Closed,
}

impl RenderState {
    /// Check if the client is closed.
    pub fn is_closed(self) -> bool {
        matches!(self, RenderState::Closed)
    }

    /// Check if a render is in flight.
    pub fn is_rendering(self) -> bool {
        matches!(self, RenderState::Rendering)
    }

    /// State to return to once a render settles without a new result.
    pub(crate) fn settled(has_result: bool) -> Self {
        if has_result {
            RenderState::Rendered
        } else {
            RenderState::Unrendered
        }
    }

    /// Get display name.
    pub fn name(self) -> &'static str {
        match self {
            RenderState::Unrendered => "Unrendered",
            RenderState::Rendering => "Rendering",
            RenderState::Rendered => "Rendered",
            RenderState::Closed => "Closed",
        }
    }
}
