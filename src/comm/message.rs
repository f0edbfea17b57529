//! Wire messages of the plot comm.
//!
//! Every line on the wire is one JSON object:
//!
//! ```text
//! {"comm_id": "<plot id>", "data": <JSON-RPC 2.0 message>}
//! ```
//!
//! The frontend sends requests (`render`, `get_intrinsic_size`), the backend
//! answers them by id and pushes notifications (`show_plot`, `update_plot`,
//! `clear_plots`) without an id.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ChannelError;
use crate::plot::{IntrinsicSize, RenderRequest};

/// JSON-RPC version written on every outgoing message.
pub const JSONRPC_VERSION: &str = "2.0";

/// Requests the frontend can send to a plot comm.
#[derive(Debug, Clone, PartialEq)]
pub enum PlotBackendRequest {
    /// Get the plot's natural size.
    GetIntrinsicSize,
    /// Render the plot.
    Render(RenderRequest),
}

impl PlotBackendRequest {
    /// JSON-RPC method name.
    pub fn method(&self) -> &'static str {
        match self {
            PlotBackendRequest::GetIntrinsicSize => "get_intrinsic_size",
            PlotBackendRequest::Render(_) => "render",
        }
    }

    fn params(&self) -> Result<Option<Value>, serde_json::Error> {
        match self {
            PlotBackendRequest::GetIntrinsicSize => Ok(None),
            PlotBackendRequest::Render(request) => serde_json::to_value(request).map(Some),
        }
    }
}

/// Error object of a JSON-RPC response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcError {
    /// Error code.
    pub code: i64,
    /// Error message.
    pub message: String,
}

impl From<RpcError> for ChannelError {
    fn from(err: RpcError) -> Self {
        ChannelError::with_code(err.code, err.message)
    }
}

/// Result of a `render` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderResult {
    /// Base64 encoded plot.
    pub data: String,
    /// Content MIME type.
    pub mime_type: String,
    /// Natural plot dimensions, if the backend knows them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intrinsic_size: Option<IntrinsicSize>,
}

/// Parameters of `show_plot`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowPlotParams {
    /// Unique plot identifier.
    pub id: String,
    /// Parent plot identifier for updates.
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Plot content data.
    pub data: String,
    /// Content MIME type.
    pub mime_type: String,
}

/// Parameters of `update_plot`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePlotParams {
    /// Plot identifier to update.
    pub id: String,
    /// New plot data.
    pub data: String,
    /// Updated content type.
    pub mime_type: String,
}

/// Notifications the backend pushes to the frontend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontendEvent {
    /// A new plot is available.
    ShowPlot(ShowPlotParams),
    /// An existing plot changed.
    UpdatePlot(UpdatePlotParams),
    /// All plots were cleared.
    ClearPlots,
}

impl FrontendEvent {
    /// JSON-RPC method name.
    pub fn method(&self) -> &'static str {
        match self {
            FrontendEvent::ShowPlot(_) => "show_plot",
            FrontendEvent::UpdatePlot(_) => "update_plot",
            FrontendEvent::ClearPlots => "clear_plots",
        }
    }

    /// Parse a notification. Unknown methods yield `Ok(None)`.
    pub fn from_notification(
        method: &str,
        params: Option<Value>,
    ) -> Result<Option<Self>, serde_json::Error> {
        let params = params.unwrap_or(Value::Null);
        let event = match method {
            "show_plot" => FrontendEvent::ShowPlot(serde_json::from_value(params)?),
            "update_plot" => FrontendEvent::UpdatePlot(serde_json::from_value(params)?),
            "clear_plots" => FrontendEvent::ClearPlots,
            _ => return Ok(None),
        };
        Ok(Some(event))
    }

    fn params(&self) -> Result<Option<Value>, serde_json::Error> {
        match self {
            FrontendEvent::ShowPlot(params) => serde_json::to_value(params).map(Some),
            FrontendEvent::UpdatePlot(params) => serde_json::to_value(params).map(Some),
            FrontendEvent::ClearPlots => Ok(None),
        }
    }
}

#[derive(Debug, Serialize)]
struct Envelope<'a, T> {
    comm_id: &'a str,
    data: T,
}

#[derive(Debug, Serialize)]
struct OutgoingRpc<'a> {
    jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    method: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
}

impl OutgoingRpc<'_> {
    fn empty() -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id: None,
            method: None,
            params: None,
            result: None,
            error: None,
        }
    }
}

fn encode(comm_id: &str, data: OutgoingRpc<'_>) -> Result<String, serde_json::Error> {
    serde_json::to_string(&Envelope { comm_id, data })
}

/// Encode a frontend request as one wire line (without the newline).
pub fn encode_request(
    comm_id: &str,
    id: u64,
    request: &PlotBackendRequest,
) -> Result<String, serde_json::Error> {
    encode(
        comm_id,
        OutgoingRpc {
            id: Some(id),
            method: Some(request.method()),
            params: request.params()?,
            ..OutgoingRpc::empty()
        },
    )
}

/// Encode a successful backend response.
pub fn encode_response(comm_id: &str, id: u64, result: Value) -> Result<String, serde_json::Error> {
    encode(
        comm_id,
        OutgoingRpc {
            id: Some(id),
            result: Some(result),
            ..OutgoingRpc::empty()
        },
    )
}

/// Encode a failed backend response.
pub fn encode_error(comm_id: &str, id: u64, error: RpcError) -> Result<String, serde_json::Error> {
    encode(
        comm_id,
        OutgoingRpc {
            id: Some(id),
            error: Some(error),
            ..OutgoingRpc::empty()
        },
    )
}

/// Encode a backend notification.
pub fn encode_notification(comm_id: &str, event: &FrontendEvent) -> Result<String, serde_json::Error> {
    encode(
        comm_id,
        OutgoingRpc {
            method: Some(event.method()),
            params: event.params()?,
            ..OutgoingRpc::empty()
        },
    )
}

#[derive(Debug, Deserialize)]
struct IncomingEnvelope {
    comm_id: String,
    data: IncomingRpc,
}

#[derive(Debug, Default, Deserialize)]
struct IncomingRpc {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    params: Option<Value>,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

/// A decoded incoming line.
#[derive(Debug, Clone, PartialEq)]
pub enum Incoming {
    /// Answer to an earlier request.
    Response {
        /// Comm the answer belongs to.
        comm_id: String,
        /// Request id.
        id: u64,
        /// Result value or backend error.
        result: Result<Value, ChannelError>,
    },
    /// Message pushed by the backend.
    Notification {
        /// Comm the notification belongs to.
        comm_id: String,
        /// Method name.
        method: String,
        /// Method parameters.
        params: Option<Value>,
    },
}

/// Decode one wire line.
///
/// A message with a `method` is a notification; otherwise it must carry an
/// `id` and is a response. A response with neither `result` nor `error`
/// resolves to `null`.
pub fn decode_line(line: &str) -> Result<Incoming, serde_json::Error> {
    let IncomingEnvelope { comm_id, data } = serde_json::from_str(line)?;
    if let Some(method) = data.method {
        return Ok(Incoming::Notification {
            comm_id,
            method,
            params: data.params,
        });
    }
    let Some(id) = data.id else {
        return Err(serde::de::Error::custom(
            "message has neither a method nor an id",
        ));
    };
    let result = match data.error {
        Some(error) => Err(error.into()),
        None => Ok(data.result.unwrap_or(Value::Null)),
    };
    Ok(Incoming::Response {
        comm_id,
        id,
        result,
    })
}
