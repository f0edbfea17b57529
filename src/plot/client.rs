//! The plot client: identity, zoom state, cached render and render
//! coordination for one plot.
//!
//! At most one render is in flight per client. Callers that ask for a render
//! while one is running get a clone of the same [`PendingRender`], so they
//! all settle with the same outcome and the backend sees a single call. The
//! in-flight slot is cleared as soon as the call settles, before the cached
//! result or any event is updated, so a failed render can be retried with a
//! fresh call.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use futures::future::{self, BoxFuture, FutureExt, Shared};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use super::{
    Emitter, IntrinsicSize, PlotEvent, PlotLocation, PlotMetadata, PlotRenderSettings,
    RenderChannel, RenderState, RenderedPlot, ZoomLevel,
};
use crate::error::{ChannelError, ClientError};

/// Outcome of a render, shared by every coalesced caller.
pub type RenderOutcome = Result<Arc<RenderedPlot>, ClientError>;

/// Handle to a render operation. Cloning it does not issue another render.
pub type PendingRender = Shared<BoxFuture<'static, RenderOutcome>>;

#[derive(Default)]
struct ClientState {
    render_state: RenderState,
    zoom_level: ZoomLevel,
    last_render: Option<Arc<RenderedPlot>>,
    in_flight: Option<PendingRender>,
}

struct ClientShared {
    metadata: PlotMetadata,
    location: PlotLocation,
    channel: Arc<dyn RenderChannel>,
    state: Mutex<ClientState>,
    // Outlives the client so an orphaned render can still see the close.
    closed: Arc<AtomicBool>,
    on_close: Emitter<()>,
    on_render: Emitter<Arc<RenderedPlot>>,
    on_zoom: Emitter<ZoomLevel>,
    on_event: Emitter<PlotEvent>,
}

impl ClientShared {
    fn id(&self) -> &str {
        &self.metadata.id
    }

    fn lock_state(&self) -> MutexGuard<'_, ClientState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the outcome of the in-flight render.
    ///
    /// Events are fired while the state lock is held so that settlement and
    /// close are totally ordered.
    fn settle(&self, outcome: Result<RenderedPlot, ChannelError>) -> RenderOutcome {
        let mut state = self.lock_state();
        state.in_flight = None;

        if state.render_state.is_closed() {
            tracing::debug!(id = %self.id(), "discarding render that settled after close");
            return Err(ClientError::closed(self.id()));
        }

        match outcome {
            Ok(plot) => {
                let plot = Arc::new(plot);
                state.last_render = Some(Arc::clone(&plot));
                state.render_state = RenderState::Rendered;
                tracing::debug!(
                    id = %self.id(),
                    mime_type = %plot.mime_type,
                    "render completed"
                );
                self.on_render.fire(Arc::clone(&plot));
                self.on_event.fire(PlotEvent::Rendered {
                    id: self.id().to_string(),
                    plot: Arc::clone(&plot),
                });
                Ok(plot)
            }
            Err(err) => {
                let has_result = state.last_render.is_some();
                state.render_state = RenderState::settled(has_result);
                tracing::warn!(id = %self.id(), error = %err, "render failed");
                Err(ClientError::Channel(err))
            }
        }
    }

    fn set_zoom(&self, level: ZoomLevel) -> Result<ZoomLevel, ClientError> {
        let mut state = self.lock_state();
        if state.render_state.is_closed() {
            return Err(ClientError::closed(self.id()));
        }
        state.zoom_level = level;
        tracing::debug!(id = %self.id(), level = %level, "zoom changed");
        self.on_zoom.fire(level);
        self.on_event.fire(PlotEvent::ZoomChanged {
            id: self.id().to_string(),
            level,
        });
        Ok(level)
    }
}

/// Stateful handle for one displayable plot.
///
/// Cloning a client yields another handle to the same plot.
#[derive(Clone)]
pub struct PlotClient {
    shared: Arc<ClientShared>,
}

impl PlotClient {
    /// Create a client. No backend call happens until a render is requested.
    pub fn new(
        metadata: PlotMetadata,
        location: PlotLocation,
        channel: Arc<dyn RenderChannel>,
    ) -> Self {
        let state = ClientState {
            zoom_level: metadata.zoom_level.unwrap_or_default(),
            ..ClientState::default()
        };
        Self {
            shared: Arc::new(ClientShared {
                metadata,
                location,
                channel,
                state: Mutex::new(state),
                closed: Arc::new(AtomicBool::new(false)),
                on_close: Emitter::new(),
                on_render: Emitter::new(),
                on_zoom: Emitter::new(),
                on_event: Emitter::new(),
            }),
        }
    }

    /// Plot id, equal to the metadata id.
    pub fn id(&self) -> &str {
        self.shared.id()
    }

    /// Where the plot is displayed.
    pub fn location(&self) -> PlotLocation {
        self.shared.location
    }

    /// Metadata supplied at construction.
    pub fn metadata(&self) -> &PlotMetadata {
        &self.shared.metadata
    }

    /// Current zoom level.
    pub fn zoom_level(&self) -> ZoomLevel {
        self.shared.lock_state().zoom_level
    }

    /// Current lifecycle state.
    pub fn render_state(&self) -> RenderState {
        self.shared.lock_state().render_state
    }

    /// Check if the client is closed.
    pub fn is_closed(&self) -> bool {
        self.render_state().is_closed()
    }

    /// Most recent successful render.
    pub fn last_render_result(&self) -> Option<Arc<RenderedPlot>> {
        self.shared.lock_state().last_render.clone()
    }

    /// Natural size reported with the most recent successful render.
    pub fn intrinsic_size(&self) -> Option<IntrinsicSize> {
        self.shared
            .lock_state()
            .last_render
            .as_ref()
            .and_then(|plot| plot.intrinsic_size.clone())
    }

    /// Request a render.
    ///
    /// When a render is already in flight the returned handle is that
    /// render, whatever `settings` say. On a closed client the handle
    /// resolves to [`ClientError::Closed`] without touching the channel.
    pub fn request_render(&self, settings: &PlotRenderSettings) -> PendingRender {
        let mut state = self.shared.lock_state();

        if state.render_state.is_closed() {
            let closed = ClientError::closed(self.id());
            return future::ready(Err(closed)).boxed().shared();
        }

        if let Some(pending) = &state.in_flight {
            tracing::debug!(id = %self.id(), "joining in-flight render");
            return pending.clone();
        }

        let request = settings.to_request();
        tracing::debug!(
            id = %self.id(),
            format = request.format.extension(),
            pixel_ratio = ?request.pixel_ratio,
            "issuing render"
        );
        let call = self.shared.channel.render(request);
        let client: Weak<ClientShared> = Arc::downgrade(&self.shared);
        let closed = Arc::clone(&self.shared.closed);
        let id = self.id().to_string();
        let pending = async move {
            let outcome = call.await;
            match client.upgrade() {
                Some(shared) => shared.settle(outcome),
                None if closed.load(Ordering::Acquire) => {
                    tracing::debug!(%id, "discarding render that settled after close");
                    Err(ClientError::closed(id))
                }
                None => outcome.map(Arc::new).map_err(ClientError::from),
            }
        }
        .boxed()
        .shared();

        state.in_flight = Some(pending.clone());
        state.render_state = RenderState::Rendering;
        pending
    }

    /// Ask the backend for the plot's natural size without rendering.
    pub async fn query_intrinsic_size(&self) -> Result<Option<IntrinsicSize>, ClientError> {
        if self.is_closed() {
            return Err(ClientError::closed(self.id()));
        }
        let call = self.shared.channel.intrinsic_size();
        Ok(call.await?)
    }

    /// Show the plot at its intrinsic size.
    pub fn zoom_in(&self) -> Result<ZoomLevel, ClientError> {
        self.shared.set_zoom(ZoomLevel::OneHundred)
    }

    /// Show the plot at its intrinsic size.
    // Both directions snap to the single fixed level.
    pub fn zoom_out(&self) -> Result<ZoomLevel, ClientError> {
        self.shared.set_zoom(ZoomLevel::OneHundred)
    }

    /// Scale the plot to its container.
    pub fn zoom_to_fit(&self) -> Result<ZoomLevel, ClientError> {
        self.shared.set_zoom(ZoomLevel::Fit)
    }

    /// Close the client.
    ///
    /// Fires the close event once, then tears down every emitter. A render
    /// still in flight is not cancelled; its result is discarded when it
    /// settles. Closing again does nothing.
    pub fn close(&self) {
        let mut state = self.shared.lock_state();
        if state.render_state.is_closed() {
            return;
        }
        let abandoned = state.in_flight.take().is_some();
        state.render_state = RenderState::Closed;
        self.shared.closed.store(true, Ordering::Release);
        tracing::debug!(id = %self.id(), abandoned, "plot client closed");

        self.shared.on_close.fire(());
        self.shared.on_event.fire(PlotEvent::Closed {
            id: self.id().to_string(),
        });

        self.shared.on_close.dispose();
        self.shared.on_render.dispose();
        self.shared.on_zoom.dispose();
        self.shared.on_event.dispose();
    }

    /// Receive the close event.
    pub fn subscribe_close(&self) -> UnboundedReceiver<()> {
        self.shared.on_close.subscribe()
    }

    /// Receive every successful render.
    pub fn subscribe_render(&self) -> UnboundedReceiver<Arc<RenderedPlot>> {
        self.shared.on_render.subscribe()
    }

    /// Receive every zoom change.
    pub fn subscribe_zoom(&self) -> UnboundedReceiver<ZoomLevel> {
        self.shared.on_zoom.subscribe()
    }

    /// Receive all events of this client as [`PlotEvent`]s.
    pub fn subscribe_events(&self) -> UnboundedReceiver<PlotEvent> {
        self.shared.on_event.subscribe()
    }

    /// Forward all events of this client into an existing channel.
    pub fn attach_events(&self, sender: UnboundedSender<PlotEvent>) {
        self.shared.on_event.attach(sender);
    }
}

impl fmt::Debug for PlotClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.lock_state();
        f.debug_struct("PlotClient")
            .field("id", &self.shared.metadata.id)
            .field("location", &self.shared.location)
            .field("render_state", &state.render_state)
            .field("zoom_level", &state.zoom_level)
            .field("has_render", &state.last_render.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::{PlotSize, PlotUnit, RenderFormat, RenderRequest};
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::mpsc::error::TryRecvError;
    use tokio::sync::oneshot;

    type Reply = Result<RenderedPlot, ChannelError>;

    /// Channel whose renders stay pending until the test answers them.
    #[derive(Default)]
    struct ScriptedChannel {
        calls: AtomicUsize,
        requests: Mutex<Vec<RenderRequest>>,
        waiting: Mutex<Vec<oneshot::Sender<Reply>>>,
    }

    impl ScriptedChannel {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn reply(&self, reply: Reply) {
            let tx = self.waiting.lock().unwrap().remove(0);
            tx.send(reply).unwrap();
        }
    }

    impl RenderChannel for ScriptedChannel {
        fn render(&self, request: RenderRequest) -> BoxFuture<'static, Reply> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request);
            let (tx, rx) = oneshot::channel();
            self.waiting.lock().unwrap().push(tx);
            async move { rx.await.unwrap_or_else(|_| Err(ChannelError::disconnected())) }.boxed()
        }

        fn intrinsic_size(&self) -> BoxFuture<'static, Result<Option<IntrinsicSize>, ChannelError>> {
            async {
                Ok(Some(IntrinsicSize {
                    width: 7.0,
                    height: 5.0,
                    unit: PlotUnit::Inches,
                    source: "Matplotlib".to_string(),
                }))
            }
            .boxed()
        }
    }

    fn client_with(channel: &Arc<ScriptedChannel>) -> PlotClient {
        let channel: Arc<dyn RenderChannel> = channel.clone();
        PlotClient::new(
            PlotMetadata::new("plot-1", "session-1"),
            PlotLocation::View,
            channel,
        )
    }

    fn rendered(data: &str) -> RenderedPlot {
        RenderedPlot {
            request: PlotRenderSettings::default().to_request(),
            data: data.to_string(),
            mime_type: "image/png".to_string(),
            intrinsic_size: Some(IntrinsicSize {
                width: 800.0,
                height: 600.0,
                unit: PlotUnit::Pixels,
                source: "Matplotlib".to_string(),
            }),
        }
    }

    fn png() -> PlotRenderSettings {
        PlotRenderSettings::default().with_format(RenderFormat::Png)
    }

    #[tokio::test]
    async fn new_client_is_unrendered_and_fit() {
        let channel = Arc::new(ScriptedChannel::default());
        let client = client_with(&channel);

        assert_eq!(client.id(), "plot-1");
        assert_eq!(client.location(), PlotLocation::View);
        assert_eq!(client.metadata().session_id, "session-1");
        assert_eq!(client.zoom_level(), ZoomLevel::Fit);
        assert_eq!(client.render_state(), RenderState::Unrendered);
        assert!(client.last_render_result().is_none());
        assert!(client.intrinsic_size().is_none());
        assert_eq!(channel.calls(), 0);
    }

    #[tokio::test]
    async fn initial_zoom_comes_from_metadata() {
        let channel: Arc<dyn RenderChannel> = Arc::new(ScriptedChannel::default());
        let metadata = PlotMetadata::new("plot-2", "s").with_zoom_level(ZoomLevel::OneHundred);
        let client = PlotClient::new(metadata, PlotLocation::Editor, channel);
        assert_eq!(client.zoom_level(), ZoomLevel::OneHundred);
        assert_eq!(client.location(), PlotLocation::Editor);
    }

    #[tokio::test]
    async fn concurrent_requests_share_one_backend_call() {
        let channel = Arc::new(ScriptedChannel::default());
        let client = client_with(&channel);
        let mut renders = client.subscribe_render();

        let first = client.request_render(&png());
        let second = client.request_render(&png());
        let third = client.request_render(&png().with_size(PlotSize::pixels(10.0, 10.0)));
        assert_eq!(channel.calls(), 1);
        assert_eq!(client.render_state(), RenderState::Rendering);

        channel.reply(Ok(rendered("aGVsbG8=")));
        let (a, b, c) = futures::join!(first, second, third);
        let (a, b, c) = (a.unwrap(), b.unwrap(), c.unwrap());

        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&a, &c));
        assert_eq!(channel.calls(), 1);
        assert_eq!(channel.requests.lock().unwrap()[0].format, RenderFormat::Png);

        assert!(Arc::ptr_eq(&renders.try_recv().unwrap(), &a));
        assert!(renders.try_recv().is_err());
        assert_eq!(client.render_state(), RenderState::Rendered);
        assert!(Arc::ptr_eq(&client.last_render_result().unwrap(), &a));
        assert_eq!(client.intrinsic_size().unwrap().width, 800.0);
    }

    #[tokio::test]
    async fn concurrent_callers_share_a_failure() {
        let channel = Arc::new(ScriptedChannel::default());
        let client = client_with(&channel);

        let first = client.request_render(&png());
        let second = client.request_render(&png());
        channel.reply(Err(ChannelError::with_code(-32603, "device error")));
        let (a, b) = futures::join!(first, second);

        let expected = ClientError::Channel(ChannelError::with_code(-32603, "device error"));
        assert_eq!(a.unwrap_err(), expected);
        assert_eq!(b.unwrap_err(), expected);
        assert_eq!(channel.calls(), 1);
    }

    #[tokio::test]
    async fn failed_render_frees_the_slot_for_a_retry() {
        let channel = Arc::new(ScriptedChannel::default());
        let client = client_with(&channel);
        let mut renders = client.subscribe_render();

        let attempt = client.request_render(&png());
        channel.reply(Err(ChannelError::new("kernel busy")));
        assert!(matches!(attempt.await, Err(ClientError::Channel(_))));
        assert!(client.last_render_result().is_none());
        assert_eq!(client.render_state(), RenderState::Unrendered);
        assert!(renders.try_recv().is_err());

        let retry = client.request_render(&png());
        assert_eq!(channel.calls(), 2);
        channel.reply(Ok(rendered("aGk=")));
        assert_eq!(retry.await.unwrap().data, "aGk=");
    }

    #[tokio::test]
    async fn cached_render_survives_a_later_failure() {
        let channel = Arc::new(ScriptedChannel::default());
        let client = client_with(&channel);

        let ok = client.request_render(&png());
        channel.reply(Ok(rendered("Zmlyc3Q=")));
        let first = ok.await.unwrap();

        let failing = client.request_render(&png());
        channel.reply(Err(ChannelError::new("boom")));
        assert!(failing.await.is_err());

        assert!(Arc::ptr_eq(&client.last_render_result().unwrap(), &first));
        assert_eq!(client.render_state(), RenderState::Rendered);
    }

    #[tokio::test]
    async fn sequential_renders_replace_the_cache() {
        let channel = Arc::new(ScriptedChannel::default());
        let client = client_with(&channel);

        let one = client.request_render(&png());
        channel.reply(Ok(rendered("b25l")));
        one.await.unwrap();

        let two = client.request_render(&png().with_format(RenderFormat::Svg));
        channel.reply(Ok(rendered("dHdv")));
        two.await.unwrap();

        assert_eq!(channel.calls(), 2);
        assert_eq!(client.last_render_result().unwrap().data, "dHdv");
        assert_eq!(channel.requests.lock().unwrap()[1].format, RenderFormat::Svg);
    }

    #[tokio::test]
    async fn zoom_in_and_out_snap_to_one_hundred() {
        let channel = Arc::new(ScriptedChannel::default());
        let client = client_with(&channel);
        let mut zooms = client.subscribe_zoom();

        assert_eq!(client.zoom_in(), Ok(ZoomLevel::OneHundred));
        assert_eq!(client.zoom_level(), ZoomLevel::OneHundred);
        assert_eq!(zooms.try_recv().unwrap(), ZoomLevel::OneHundred);
        assert!(zooms.try_recv().is_err());

        assert_eq!(client.zoom_out(), Ok(ZoomLevel::OneHundred));
        assert_eq!(client.zoom_level(), ZoomLevel::OneHundred);
        assert_eq!(zooms.try_recv().unwrap(), ZoomLevel::OneHundred);
        assert!(zooms.try_recv().is_err());
    }

    #[tokio::test]
    async fn zoom_to_fit_then_back() {
        let channel = Arc::new(ScriptedChannel::default());
        let client = client_with(&channel);
        let mut zooms = client.subscribe_zoom();

        client.zoom_in().unwrap();
        assert_eq!(zooms.try_recv().unwrap(), ZoomLevel::OneHundred);

        client.zoom_to_fit().unwrap();
        assert_eq!(client.zoom_level(), ZoomLevel::Fit);
        assert_eq!(zooms.try_recv().unwrap(), ZoomLevel::Fit);

        // Setting the same level again still emits.
        client.zoom_to_fit().unwrap();
        assert_eq!(zooms.try_recv().unwrap(), ZoomLevel::Fit);
        assert!(zooms.try_recv().is_err());
    }

    #[tokio::test]
    async fn zoom_does_not_render_and_works_mid_flight() {
        let channel = Arc::new(ScriptedChannel::default());
        let client = client_with(&channel);

        client.zoom_in().unwrap();
        assert_eq!(channel.calls(), 0);

        let pending = client.request_render(&png());
        client.zoom_to_fit().unwrap();
        assert_eq!(client.render_state(), RenderState::Rendering);
        channel.reply(Ok(rendered("eA==")));
        pending.await.unwrap();
        assert_eq!(client.zoom_level(), ZoomLevel::Fit);
        assert_eq!(channel.calls(), 1);
    }

    #[tokio::test]
    async fn close_fires_once_and_tears_down_events() {
        let channel = Arc::new(ScriptedChannel::default());
        let client = client_with(&channel);
        let mut closes = client.subscribe_close();
        let mut renders = client.subscribe_render();
        let mut zooms = client.subscribe_zoom();
        let mut events = client.subscribe_events();

        client.close();
        client.close();

        assert_eq!(closes.try_recv(), Ok(()));
        assert_eq!(closes.try_recv(), Err(TryRecvError::Disconnected));
        assert_eq!(
            events.try_recv().unwrap(),
            PlotEvent::Closed {
                id: "plot-1".to_string()
            }
        );
        assert_eq!(events.try_recv(), Err(TryRecvError::Disconnected));
        assert_eq!(renders.try_recv(), Err(TryRecvError::Disconnected));
        assert_eq!(zooms.try_recv(), Err(TryRecvError::Disconnected));
        assert_eq!(client.render_state(), RenderState::Closed);
    }

    #[tokio::test]
    async fn late_render_is_discarded_after_close() {
        let channel = Arc::new(ScriptedChannel::default());
        let client = client_with(&channel);
        let mut renders = client.subscribe_render();
        let mut closes = client.subscribe_close();

        let pending = client.request_render(&png());
        client.close();
        channel.reply(Ok(rendered("bGF0ZQ==")));

        assert_eq!(pending.await, Err(ClientError::closed("plot-1")));
        assert!(client.last_render_result().is_none());
        assert_eq!(client.render_state(), RenderState::Closed);
        assert_eq!(closes.try_recv(), Ok(()));
        assert_eq!(renders.try_recv(), Err(TryRecvError::Disconnected));
    }

    #[tokio::test]
    async fn late_render_is_discarded_after_close_and_drop() {
        let channel = Arc::new(ScriptedChannel::default());
        let client = client_with(&channel);

        let pending = client.request_render(&png());
        client.close();
        drop(client);
        channel.reply(Ok(rendered("bGF0ZQ==")));

        assert_eq!(pending.await, Err(ClientError::closed("plot-1")));
    }

    #[tokio::test]
    async fn dropped_client_still_delivers_render_when_open() {
        let channel = Arc::new(ScriptedChannel::default());
        let client = client_with(&channel);

        let pending = client.request_render(&png());
        drop(client);
        channel.reply(Ok(rendered("b3Blbg==")));

        assert_eq!(pending.await.unwrap().data, "b3Blbg==");
    }

    #[tokio::test]
    async fn closed_client_rejects_renders_and_zoom() {
        let channel = Arc::new(ScriptedChannel::default());
        let client = client_with(&channel);
        let mut events = client.subscribe_events();
        client.close();
        assert!(events.try_recv().is_ok());

        let outcome = client.request_render(&png()).await;
        assert!(outcome.unwrap_err().is_closed());
        assert_eq!(channel.calls(), 0);

        assert!(client.zoom_in().unwrap_err().is_closed());
        assert!(client.zoom_to_fit().unwrap_err().is_closed());
        assert_eq!(client.zoom_level(), ZoomLevel::Fit);
        assert!(client.query_intrinsic_size().await.unwrap_err().is_closed());

        let mut late = client.subscribe_zoom();
        assert_eq!(late.try_recv(), Err(TryRecvError::Disconnected));
        assert_eq!(events.try_recv(), Err(TryRecvError::Disconnected));
    }

    #[tokio::test]
    async fn unified_events_follow_call_order() {
        let channel = Arc::new(ScriptedChannel::default());
        let client = client_with(&channel);
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        client.attach_events(tx);

        client.zoom_in().unwrap();
        let pending = client.request_render(&png());
        channel.reply(Ok(rendered("eQ==")));
        let plot = pending.await.unwrap();
        client.close();

        assert_eq!(
            rx.recv().await,
            Some(PlotEvent::ZoomChanged {
                id: "plot-1".to_string(),
                level: ZoomLevel::OneHundred
            })
        );
        assert_eq!(
            rx.recv().await,
            Some(PlotEvent::Rendered {
                id: "plot-1".to_string(),
                plot
            })
        );
        assert_eq!(
            rx.recv().await,
            Some(PlotEvent::Closed {
                id: "plot-1".to_string()
            })
        );
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn intrinsic_size_query_passes_through() {
        let channel = Arc::new(ScriptedChannel::default());
        let client = client_with(&channel);
        let size = client.query_intrinsic_size().await.unwrap().unwrap();
        assert_eq!(size.unit, PlotUnit::Inches);
        assert_eq!(channel.calls(), 0);
        assert_eq!(client.render_state(), RenderState::Unrendered);
    }
}
