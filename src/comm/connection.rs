//! Line-delimited JSON-RPC connection to a plot backend.
//!
//! One connection multiplexes any number of plot comms. Requests get
//! monotonically increasing ids starting at 1 and are matched to responses
//! by id, so answers may arrive in any order. Notifications are forwarded
//! to the frontend event receiver returned by [`run`].

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{self, BoxFuture, FutureExt};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{mpsc, oneshot};

use super::channel::CommChannel;
use super::message::{self, FrontendEvent, Incoming, PlotBackendRequest};
use crate::error::ChannelError;

/// Notifications received from the backend, tagged with their comm id.
pub type FrontendEvents = mpsc::UnboundedReceiver<(String, FrontendEvent)>;

type Waiter = oneshot::Sender<Result<Value, ChannelError>>;

#[derive(Debug, Default)]
struct PendingRequests {
    disconnected: bool,
    waiters: HashMap<u64, Waiter>,
}

type SharedPending = Arc<Mutex<PendingRequests>>;

fn lock(pending: &Mutex<PendingRequests>) -> MutexGuard<'_, PendingRequests> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fail every outstanding request and refuse new ones.
fn disconnect(pending: &Mutex<PendingRequests>) {
    let waiters = {
        let mut pending = lock(pending);
        pending.disconnected = true;
        std::mem::take(&mut pending.waiters)
    };
    if !waiters.is_empty() {
        tracing::debug!(count = waiters.len(), "failing pending backend requests");
    }
    for (_, waiter) in waiters {
        let _ = waiter.send(Err(ChannelError::disconnected()));
    }
}

/// Handle to a running backend connection. Cheap to clone.
#[derive(Clone)]
pub struct CommConnection {
    outgoing: mpsc::UnboundedSender<String>,
    next_id: Arc<AtomicU64>,
    pending: SharedPending,
}

impl fmt::Debug for CommConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pending = lock(&self.pending);
        f.debug_struct("CommConnection")
            .field("pending", &pending.waiters.len())
            .field("disconnected", &pending.disconnected)
            .finish()
    }
}

impl CommConnection {
    /// Send a request on `comm_id` and wait for its answer.
    ///
    /// The request is written before this returns; the future only waits
    /// for the response.
    pub fn request(
        &self,
        comm_id: &str,
        request: &PlotBackendRequest,
    ) -> BoxFuture<'static, Result<Value, ChannelError>> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let line = match message::encode_request(comm_id, id, request) {
            Ok(line) => line,
            Err(err) => {
                let err = ChannelError::new(format!("failed to encode request: {err}"));
                return future::ready(Err(err)).boxed();
            }
        };

        let (tx, rx) = oneshot::channel();
        {
            let mut pending = lock(&self.pending);
            if pending.disconnected {
                return future::ready(Err(ChannelError::disconnected())).boxed();
            }
            pending.waiters.insert(id, tx);
        }
        if self.outgoing.send(line).is_err() {
            lock(&self.pending).waiters.remove(&id);
            return future::ready(Err(ChannelError::disconnected())).boxed();
        }
        tracing::debug!(comm_id, id, method = request.method(), "sent backend request");

        async move {
            rx.await
                .unwrap_or_else(|_| Err(ChannelError::disconnected()))
        }
        .boxed()
    }

    /// A render channel bound to one plot comm.
    pub fn channel(&self, comm_id: impl Into<String>) -> CommChannel {
        CommChannel::new(self.clone(), comm_id)
    }

    #[cfg(test)]
    pub(crate) fn pending_count(&self) -> usize {
        lock(&self.pending).waiters.len()
    }

    #[cfg(test)]
    pub(crate) fn is_disconnected(&self) -> bool {
        lock(&self.pending).disconnected
    }
}

/// Start the connection over a reader/writer pair.
///
/// Spawns a writer task and a reader task on the current tokio runtime.
/// When the reader hits end of input (or an I/O error), every pending and
/// future request fails with "backend disconnected".
pub fn run<R, W>(reader: R, writer: W) -> (CommConnection, FrontendEvents)
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (outgoing, outgoing_rx) = mpsc::unbounded_channel();
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let pending: SharedPending = Arc::default();

    tokio::spawn(write_loop(writer, outgoing_rx, pending.clone()));
    tokio::spawn(read_loop(reader, events_tx, pending.clone()));

    let connection = CommConnection {
        outgoing,
        next_id: Arc::new(AtomicU64::new(1)),
        pending,
    };
    (connection, events_rx)
}

async fn write_loop<W>(
    mut writer: W,
    mut outgoing: mpsc::UnboundedReceiver<String>,
    pending: SharedPending,
) where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = outgoing.recv().await {
        let written = async {
            writer.write_all(line.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await
        }
        .await;
        if let Err(err) = written {
            tracing::warn!(error = %err, "failed to write to backend");
            disconnect(&pending);
            return;
        }
    }
    tracing::debug!("backend writer finished");
}

async fn read_loop<R>(
    reader: R,
    events: mpsc::UnboundedSender<(String, FrontendEvent)>,
    pending: SharedPending,
) where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => dispatch(&line, &events, &pending),
            Ok(None) => {
                tracing::debug!("backend closed its output");
                break;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to read from backend");
                break;
            }
        }
    }
    disconnect(&pending);
}

fn dispatch(
    line: &str,
    events: &mpsc::UnboundedSender<(String, FrontendEvent)>,
    pending: &Mutex<PendingRequests>,
) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }
    let incoming = match message::decode_line(line) {
        Ok(incoming) => incoming,
        Err(err) => {
            tracing::warn!(error = %err, "ignoring malformed backend message");
            return;
        }
    };

    match incoming {
        Incoming::Response {
            comm_id,
            id,
            result,
        } => {
            let waiter = lock(pending).waiters.remove(&id);
            match waiter {
                Some(waiter) => {
                    let _ = waiter.send(result);
                }
                None => tracing::debug!(comm_id, id, "response to unknown request"),
            }
        }
        Incoming::Notification {
            comm_id,
            method,
            params,
        } => match FrontendEvent::from_notification(&method, params) {
            Ok(Some(event)) => {
                tracing::debug!(comm_id, method, "backend notification");
                let _ = events.send((comm_id, event));
            }
            Ok(None) => tracing::debug!(comm_id, method, "ignoring unknown notification"),
            Err(err) => {
                tracing::warn!(comm_id, method, error = %err, "invalid notification params")
            }
        },
    }
}
