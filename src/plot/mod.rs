//! Plot client core.
//!
//! This module holds the client that tracks one plot's identity, zoom level,
//! last render and in-flight render, together with the types it exchanges
//! with render channels and host observers.

mod channel;
mod client;
mod events;
mod metadata;
mod render;
mod state;
mod zoom;

pub use channel::RenderChannel;
pub use client::{PendingRender, PlotClient, RenderOutcome};
pub use events::{Emitter, PlotEvent};
pub use metadata::{PlotLocation, PlotMetadata};
pub use render::{
    IntrinsicSize, PlotRenderSettings, PlotSize, PlotUnit, RenderFormat, RenderRequest,
    RenderedPlot,
};
pub use state::RenderState;
pub use zoom::ZoomLevel;
