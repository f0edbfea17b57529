//! Application state and logic.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::comm::FrontendEvent;
use crate::error::ClientError;
use crate::plot::{
    IntrinsicSize, PlotClient, PlotEvent, PlotRenderSettings, RenderedPlot, ZoomLevel,
};
use crate::registry::{PlotRegistry, RegistryUpdate};
use crate::ui::format_bytes;

/// Application theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    /// Gruvbox dark theme.
    GruvboxDark,
    /// Gruvbox light theme.
    GruvboxLight,
}

impl Theme {
    /// Get the next theme in the cycle.
    pub fn next(self) -> Self {
        match self {
            Theme::GruvboxDark => Theme::GruvboxLight,
            Theme::GruvboxLight => Theme::GruvboxDark,
        }
    }

    /// Get the theme name.
    pub fn name(self) -> &'static str {
        match self {
            Theme::GruvboxDark => "Gruvbox Dark",
            Theme::GruvboxLight => "Gruvbox Light",
        }
    }
}

/// A render that failed in a background task.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFailure {
    /// Plot id.
    pub id: String,
    /// Why the render failed.
    pub error: ClientError,
}

/// Render settings for a zoom level.
///
/// Fit uses the configured settings as-is. 100% renders at the intrinsic
/// size when one is known.
pub fn settings_for(
    zoom: ZoomLevel,
    intrinsic: Option<&IntrinsicSize>,
    base: PlotRenderSettings,
) -> PlotRenderSettings {
    match (zoom, intrinsic) {
        (ZoomLevel::OneHundred, Some(size)) => base.with_size(size.to_size()),
        _ => base,
    }
}

async fn render_at_zoom(
    client: &PlotClient,
    base: PlotRenderSettings,
) -> Result<Arc<RenderedPlot>, ClientError> {
    let zoom = client.zoom_level();
    let intrinsic = match zoom {
        ZoomLevel::Fit => None,
        ZoomLevel::OneHundred => match client.intrinsic_size() {
            Some(size) => Some(size),
            None => client.query_intrinsic_size().await?,
        },
    };
    let settings = settings_for(zoom, intrinsic.as_ref(), base);
    client.request_render(&settings).await
}

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Plots of the session.
    pub registry: PlotRegistry,
    /// Index of the selected plot.
    pub selected: usize,
    /// Status message.
    pub status: String,
    /// Current theme.
    pub theme: Theme,
    /// Error message.
    pub error_message: Option<String>,
    failures: UnboundedSender<RenderFailure>,
}

impl App {
    /// Create a new application instance.
    pub fn new(registry: PlotRegistry, failures: UnboundedSender<RenderFailure>) -> Self {
        Self {
            registry,
            selected: 0,
            status: "Waiting for plots".to_string(),
            theme: Theme::GruvboxDark,
            error_message: None,
            failures,
        }
    }

    /// Get the selected client.
    pub fn selected_client(&self) -> Option<&PlotClient> {
        self.registry.clients().get(self.selected)
    }

    /// Move the selection down.
    pub fn select_next(&mut self) {
        if self.selected + 1 < self.registry.len() {
            self.selected += 1;
        }
    }

    /// Move the selection up.
    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.registry.len().saturating_sub(1));
    }

    /// Render a plot in the background at its current zoom level.
    ///
    /// Success shows up as a [`PlotEvent::Rendered`]; failures are sent to
    /// the failure channel.
    pub fn render(&mut self, client: PlotClient) {
        let base = self.registry.config().render;
        let failures = self.failures.clone();
        self.status = if client.render_state().is_rendering() {
            format!("Joining render of {}...", client.id())
        } else {
            format!("Rendering {}...", client.id())
        };
        tokio::spawn(async move {
            if let Err(error) = render_at_zoom(&client, base).await {
                let _ = failures.send(RenderFailure {
                    id: client.id().to_string(),
                    error,
                });
            }
        });
    }

    /// Render the selected plot.
    pub fn render_selected(&mut self) {
        match self.selected_client().cloned() {
            Some(client) => self.render(client),
            None => self.status = "No plot selected".to_string(),
        }
    }

    fn zoom_selected(&mut self, zoom: fn(&PlotClient) -> Result<ZoomLevel, ClientError>) {
        let Some(client) = self.selected_client().cloned() else {
            self.status = "No plot selected".to_string();
            return;
        };
        match zoom(&client) {
            Ok(_) => self.render(client),
            Err(err) => self.error_message = Some(err.to_string()),
        }
    }

    /// Zoom the selected plot in and re-render it.
    pub fn zoom_in(&mut self) {
        self.zoom_selected(PlotClient::zoom_in);
    }

    /// Zoom the selected plot out and re-render it.
    pub fn zoom_out(&mut self) {
        self.zoom_selected(PlotClient::zoom_out);
    }

    /// Fit the selected plot and re-render it.
    pub fn zoom_to_fit(&mut self) {
        self.zoom_selected(PlotClient::zoom_to_fit);
    }

    /// Close the selected plot.
    pub fn close_selected(&mut self) {
        let Some(id) = self.selected_client().map(|client| client.id().to_string()) else {
            self.status = "No plot selected".to_string();
            return;
        };
        if let Err(err) = self.registry.close(&id) {
            self.error_message = Some(err.to_string());
        }
        self.clamp_selection();
    }

    /// Cycle to the next theme.
    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next();
        self.status = format!("Theme: {}", self.theme.name());
    }

    /// Apply a backend notification.
    pub fn handle_frontend(&mut self, comm_id: &str, event: FrontendEvent) {
        match self.registry.apply(comm_id, event) {
            RegistryUpdate::Shown(client) => {
                if let Some(index) = self
                    .registry
                    .clients()
                    .iter()
                    .position(|c| c.id() == client.id())
                {
                    self.selected = index;
                }
                self.status = format!("Plot {} shown", client.id());
                self.render(client);
            }
            RegistryUpdate::Updated(client) => self.render(client),
            RegistryUpdate::Cleared(count) => {
                self.selected = 0;
                self.status = format!("Plots cleared ({count})");
            }
            RegistryUpdate::Ignored => {}
        }
    }

    /// Reflect a client event in the status line.
    pub fn handle_plot_event(&mut self, event: PlotEvent) {
        self.status = match event {
            PlotEvent::Rendered { id, plot } => {
                self.error_message = None;
                format!(
                    "Rendered {id}: {} ({})",
                    plot.mime_type,
                    format_bytes(plot.payload_len())
                )
            }
            PlotEvent::ZoomChanged { id, level } => format!("Zoom {id}: {level}"),
            PlotEvent::Closed { id } => format!("Closed {id}"),
        };
    }

    /// Report a failed background render.
    pub fn handle_failure(&mut self, failure: RenderFailure) {
        tracing::warn!(id = %failure.id, error = %failure.error, "render failed");
        self.status = format!("Render of {} failed", failure.id);
        self.error_message = Some(failure.error.to_string());
    }
}
