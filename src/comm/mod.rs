//! Plot comm transport.
//!
//! Connects plot clients to a backend that speaks line-delimited JSON-RPC
//! 2.0 wrapped in comm envelopes.

mod channel;
mod connection;
mod message;

pub use channel::CommChannel;
pub use connection::{run, CommConnection, FrontendEvents};
pub use message::{
    decode_line, encode_error, encode_notification, encode_request, encode_response,
    FrontendEvent, Incoming, PlotBackendRequest, RenderResult, RpcError, ShowPlotParams,
    UpdatePlotParams, JSONRPC_VERSION,
};
