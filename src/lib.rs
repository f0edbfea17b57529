//! plotclient - client-side plot state for an interactive plotting backend.
//!
//! A [`PlotClient`](plot::PlotClient) tracks one plot: its identity, zoom
//! level, last render, and at most one render in flight. Concurrent render
//! requests are coalesced onto that single backend call.
//!
//! # Features
//!
//! - Render coordination with request coalescing and a sticky last result
//! - Two-level zoom state machine (Fit / 100%)
//! - Close, render and zoom events over tokio channels
//! - JSON-RPC comm transport to a backend process
//! - Terminal plots view with Gruvbox color themes
//!
//! # Example
//!
//! ```ignore
//! use plotclient::comm;
//! use plotclient::plot::{PlotClient, PlotLocation, PlotMetadata, PlotRenderSettings};
//! use std::sync::Arc;
//!
//! let (connection, _events) = comm::run(backend_stdout, backend_stdin);
//! let client = PlotClient::new(
//!     PlotMetadata::new("plot-1", "session"),
//!     PlotLocation::View,
//!     Arc::new(connection.channel("plot-1")),
//! );
//! let plot = client.request_render(&PlotRenderSettings::default()).await?;
//! println!("{} ({} bytes)", plot.mime_type, plot.payload_len());
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]
#![deny(unsafe_code)]

pub mod app;
pub mod comm;
pub mod config;
pub mod error;
pub mod plot;
pub mod registry;
pub mod ui;

pub use error::{ChannelError, ClientError, ParseError, PlotError, Result};
