//! [`RenderChannel`] over a plot comm.

use futures::future::{BoxFuture, FutureExt};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::connection::CommConnection;
use super::message::{PlotBackendRequest, RenderResult};
use crate::error::ChannelError;
use crate::plot::{IntrinsicSize, RenderChannel, RenderRequest, RenderedPlot};

/// Render channel bound to one comm of a [`CommConnection`].
#[derive(Debug, Clone)]
pub struct CommChannel {
    connection: CommConnection,
    comm_id: String,
}

impl CommChannel {
    pub(crate) fn new(connection: CommConnection, comm_id: impl Into<String>) -> Self {
        Self {
            connection,
            comm_id: comm_id.into(),
        }
    }
}

fn parse<T: DeserializeOwned>(method: &str, value: Value) -> Result<T, ChannelError> {
    serde_json::from_value(value)
        .map_err(|err| ChannelError::new(format!("invalid {method} result: {err}")))
}

impl RenderChannel for CommChannel {
    fn render(&self, request: RenderRequest) -> BoxFuture<'static, Result<RenderedPlot, ChannelError>> {
        let response = self
            .connection
            .request(&self.comm_id, &PlotBackendRequest::Render(request));
        async move {
            let result: RenderResult = parse("render", response.await?)?;
            Ok(RenderedPlot {
                request,
                data: result.data,
                mime_type: result.mime_type,
                intrinsic_size: result.intrinsic_size,
            })
        }
        .boxed()
    }

    fn intrinsic_size(&self) -> BoxFuture<'static, Result<Option<IntrinsicSize>, ChannelError>> {
        let response = self
            .connection
            .request(&self.comm_id, &PlotBackendRequest::GetIntrinsicSize);
        async move { parse("get_intrinsic_size", response.await?) }.boxed()
    }
}
