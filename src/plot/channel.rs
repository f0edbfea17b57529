//! The seam between a plot client and whatever renders plots.

use futures::future::BoxFuture;

use super::{IntrinsicSize, RenderRequest, RenderedPlot};
use crate::error::ChannelError;

/// Asynchronous interface to a rendering backend.
///
/// Returned futures are `'static` so a client can hold them past the call
/// that created them. Implementations should issue the request when the
/// method is called and only wait for the answer inside the future.
pub trait RenderChannel: Send + Sync {
    /// Render the plot with the given parameters.
    fn render(&self, request: RenderRequest) -> BoxFuture<'static, Result<RenderedPlot, ChannelError>>;

    /// Ask the backend for the plot's natural size.
    fn intrinsic_size(&self) -> BoxFuture<'static, Result<Option<IntrinsicSize>, ChannelError>> {
        Box::pin(async { Ok(None) })
    }
}
