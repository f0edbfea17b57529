//! Observable events of a plot client.
//!
//! An [`Emitter`] keeps a list of subscriber channels. Each call to
//! [`Emitter::fire`] delivers the value to every live subscriber in
//! emission order. Dropping a receiver unsubscribes it; the dead sender is
//! pruned on the next emission. Once [`Emitter::dispose`] has run, the
//! emitter delivers nothing and new subscribers get an already-terminated
//! receiver.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::{RenderedPlot, ZoomLevel};

/// Event emitted by a plot client, tagged with the plot id so that one
/// host can observe many clients on a single channel.
#[derive(Debug, Clone, PartialEq)]
pub enum PlotEvent {
    /// A render completed successfully.
    Rendered {
        /// Plot id.
        id: String,
        /// The new render.
        plot: Arc<RenderedPlot>,
    },
    /// The zoom level was set.
    ZoomChanged {
        /// Plot id.
        id: String,
        /// The new zoom level.
        level: ZoomLevel,
    },
    /// The client was closed.
    Closed {
        /// Plot id.
        id: String,
    },
}

impl PlotEvent {
    /// Id of the plot the event belongs to.
    pub fn plot_id(&self) -> &str {
        match self {
            PlotEvent::Rendered { id, .. }
            | PlotEvent::ZoomChanged { id, .. }
            | PlotEvent::Closed { id } => id,
        }
    }
}

#[derive(Debug)]
struct EmitterInner<T> {
    subscribers: Vec<UnboundedSender<T>>,
    disposed: bool,
}

/// Publish/subscribe primitive backed by unbounded tokio channels.
#[derive(Debug)]
pub struct Emitter<T> {
    inner: Mutex<EmitterInner<T>>,
}

impl<T: Clone> Emitter<T> {
    /// Create an emitter with no subscribers.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(EmitterInner {
                subscribers: Vec::new(),
                disposed: false,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, EmitterInner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Subscribe to future emissions.
    pub fn subscribe(&self) -> UnboundedReceiver<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.attach(tx);
        rx
    }

    /// Deliver future emissions to an existing sender.
    ///
    /// After disposal the sender is dropped immediately.
    pub fn attach(&self, sender: UnboundedSender<T>) {
        let mut inner = self.lock();
        if !inner.disposed {
            inner.subscribers.push(sender);
        }
    }

    /// Emit a value to every live subscriber. Returns how many received it.
    pub fn fire(&self, value: T) -> usize {
        let mut inner = self.lock();
        if inner.disposed {
            return 0;
        }
        inner
            .subscribers
            .retain(|sub| sub.send(value.clone()).is_ok());
        inner.subscribers.len()
    }

    /// Drop every subscriber and refuse new ones.
    pub fn dispose(&self) {
        let mut inner = self.lock();
        inner.disposed = true;
        inner.subscribers.clear();
    }

    #[cfg(test)]
    pub(crate) fn is_disposed(&self) -> bool {
        self.lock().disposed
    }

    #[cfg(test)]
    pub(crate) fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }
}

impl<T: Clone> Default for Emitter<T> {
    fn default() -> Self {
        Self::new()
    }
}
