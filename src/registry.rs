//! Bookkeeping of the plot clients of one session.
//!
//! The registry turns backend notifications into client lifecycle: a shown
//! plot gets a client, an update is reported so the host can re-render, and
//! a clear closes everything.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::comm::{CommConnection, FrontendEvent};
use crate::config::ClientConfig;
use crate::error::{PlotError, Result};
use crate::plot::{PlotClient, PlotEvent, PlotMetadata, RenderChannel};

/// Source of render channels for new clients.
pub trait ChannelProvider: Send + Sync {
    /// Channel that renders the plot on the given comm.
    fn channel_for(&self, comm_id: &str) -> Arc<dyn RenderChannel>;
}

impl ChannelProvider for CommConnection {
    fn channel_for(&self, comm_id: &str) -> Arc<dyn RenderChannel> {
        Arc::new(self.channel(comm_id))
    }
}

/// What applying a frontend event did to the registry.
#[derive(Debug, Clone)]
pub enum RegistryUpdate {
    /// A plot was shown; the client is new unless the id was already known.
    Shown(PlotClient),
    /// A known plot changed on the backend.
    Updated(PlotClient),
    /// All plots were closed and removed.
    Cleared(usize),
    /// The event referred to an unknown plot.
    Ignored,
}

/// Ordered collection of live plot clients.
pub struct PlotRegistry {
    provider: Arc<dyn ChannelProvider>,
    config: ClientConfig,
    clients: Vec<PlotClient>,
    event_sink: Option<UnboundedSender<PlotEvent>>,
}

impl std::fmt::Debug for PlotRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlotRegistry")
            .field("config", &self.config)
            .field("clients", &self.clients)
            .finish()
    }
}

impl PlotRegistry {
    /// Create an empty registry.
    pub fn new(provider: Arc<dyn ChannelProvider>, config: ClientConfig) -> Self {
        Self {
            provider,
            config,
            clients: Vec::new(),
            event_sink: None,
        }
    }

    /// Forward the events of every client created from now on.
    pub fn with_event_sink(mut self, sink: UnboundedSender<PlotEvent>) -> Self {
        self.event_sink = Some(sink);
        self
    }

    /// Configuration applied to new clients.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Apply a notification received on `comm_id`.
    pub fn apply(&mut self, comm_id: &str, event: FrontendEvent) -> RegistryUpdate {
        match event {
            FrontendEvent::ShowPlot(params) => {
                if let Some(client) = self.get(&params.id) {
                    tracing::debug!(id = %params.id, "plot shown again");
                    return RegistryUpdate::Shown(client.clone());
                }
                let mut metadata = PlotMetadata::new(&params.id, &self.config.session_id);
                if let Some(parent) = params.parent_id {
                    metadata = metadata.with_parent(parent);
                }
                let client = self.insert(comm_id, metadata);
                tracing::info!(id = %client.id(), mime_type = %params.mime_type, "plot shown");
                RegistryUpdate::Shown(client)
            }
            FrontendEvent::UpdatePlot(params) => match self.get(&params.id) {
                Some(client) => {
                    tracing::debug!(id = %params.id, "plot updated");
                    RegistryUpdate::Updated(client.clone())
                }
                None => {
                    tracing::debug!(id = %params.id, "update for unknown plot");
                    RegistryUpdate::Ignored
                }
            },
            FrontendEvent::ClearPlots => RegistryUpdate::Cleared(self.clear()),
        }
    }

    /// Create a client for `metadata` whose renders go to `comm_id`.
    pub fn insert(&mut self, comm_id: &str, metadata: PlotMetadata) -> PlotClient {
        let channel = self.provider.channel_for(comm_id);
        let client = PlotClient::new(metadata, self.config.location, channel);
        if let Some(sink) = &self.event_sink {
            client.attach_events(sink.clone());
        }
        self.clients.push(client.clone());
        client
    }

    /// Look up a client by plot id.
    pub fn get(&self, id: &str) -> Option<&PlotClient> {
        self.clients.iter().find(|client| client.id() == id)
    }

    /// Clients in the order they were shown.
    pub fn clients(&self) -> &[PlotClient] {
        &self.clients
    }

    /// Number of live clients.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Check if there are no clients.
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Close and remove one client.
    pub fn close(&mut self, id: &str) -> Result<()> {
        let index = self
            .clients
            .iter()
            .position(|client| client.id() == id)
            .ok_or_else(|| PlotError::plot_not_found(id))?;
        let client = self.clients.remove(index);
        client.close();
        Ok(())
    }

    /// Close and remove every client. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let count = self.clients.len();
        for client in self.clients.drain(..) {
            client.close();
        }
        if count > 0 {
            tracing::info!(count, "plots cleared");
        }
        count
    }
}
