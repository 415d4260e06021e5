//! Browser side of the realtime channel: owns the websocket, timers and the
//! reactive row store, and drives the `ChannelSession` state machine.

use crate::shared::config::FrontendConfig;
use contracts::domain::a001_sales_order::aggregate::SalesSnapshot;
use contracts::domain::a001_sales_order::workflow::OrderChannel;
use contracts::shared::channel::{
    ChannelMessage, ChannelSession, ConnectionState, PushError, RowStore, SessionEvent,
};
use futures::channel::{mpsc, oneshot};
use futures::future::{select, Either};
use futures::{FutureExt, SinkExt, StreamExt};
use gloo_net::websocket::{futures::WebSocket, Message};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::Value;
use std::collections::HashMap;

type ReplySender = oneshot::Sender<Result<Value, PushError>>;

/// Items for the socket writer, in send order.
enum Outgoing {
    Frame(String),
    /// Closes the socket once every frame queued before it has been written.
    Close,
}

struct ChannelInner {
    config: FrontendConfig,
    session: ChannelSession,
    outgoing: Option<mpsc::UnboundedSender<Outgoing>>,
    replies: HashMap<String, ReplySender>,
    stop: Option<oneshot::Sender<()>>,
    running: bool,
    /// A leave frame was queued; the run loop ends once the socket closes.
    stopping: bool,
    /// Bumped on every socket close so stale rejoin timers do nothing.
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exit {
    Closed,
    Stopped,
}

/// Explicitly constructed client for the `dashboard:main` channel.
///
/// Call [`DashboardChannel::connect`] once after construction and
/// [`DashboardChannel::disconnect`] when the owner goes away.
#[derive(Clone, Copy)]
pub struct DashboardChannel {
    store: RwSignal<RowStore>,
    state: RwSignal<ConnectionState>,
    inner: StoredValue<ChannelInner, LocalStorage>,
}

impl DashboardChannel {
    pub fn new(config: FrontendConfig) -> Self {
        Self {
            store: RwSignal::new(RowStore::default()),
            state: RwSignal::new(ConnectionState::Disconnected),
            inner: StoredValue::new_local(ChannelInner {
                config,
                session: ChannelSession::dashboard(),
                outgoing: None,
                replies: HashMap::new(),
                stop: None,
                running: false,
                stopping: false,
                generation: 0,
            }),
        }
    }

    pub fn store(&self) -> ReadSignal<RowStore> {
        self.store.read_only()
    }

    pub fn connection_state(&self) -> ReadSignal<ConnectionState> {
        self.state.read_only()
    }

    pub fn connect(&self) {
        let (stop_tx, stop_rx) = oneshot::channel();
        let started = self
            .inner
            .try_update_value(|inner| {
                if inner.running {
                    return false;
                }
                inner.running = true;
                inner.stopping = false;
                inner.stop = Some(stop_tx);
                true
            })
            .unwrap_or(false);
        if !started {
            return;
        }

        let this = *self;
        spawn_local(async move { this.run(stop_rx).await });
    }

    /// Leaves the channel, closes the socket and stops reconnecting.
    /// Pending pushes fail with `Disconnected`.
    pub fn disconnect(&self) {
        let stop = self
            .inner
            .try_update_value(|inner| {
                if !inner.running || inner.stopping {
                    return None;
                }
                if let (Some(tx), Some(leave)) = (inner.outgoing.clone(), inner.session.leave()) {
                    match leave.encode() {
                        Ok(frame) => {
                            let queued = tx.unbounded_send(Outgoing::Frame(frame)).is_ok()
                                && tx.unbounded_send(Outgoing::Close).is_ok();
                            if queued {
                                inner.stopping = true;
                                return None;
                            }
                        }
                        Err(e) => log::warn!("cannot encode leave frame: {}", e),
                    }
                }
                inner.stop.take()
            })
            .flatten();

        log::info!("channel disconnect requested");
        if let Some(stop) = stop {
            let _ = stop.send(());
        }
    }

    async fn run(self, mut stop: oneshot::Receiver<()>) {
        loop {
            let url = self.inner.with_value(|inner| inner.config.socket_url());
            self.inner.update_value(|inner| inner.session.begin_connect());
            self.sync_state();

            match WebSocket::open(&url) {
                Ok(ws) => {
                    log::info!("socket opened");
                    let exit = self.serve(ws, &mut stop).await;
                    self.close_session();
                    if exit == Exit::Stopped {
                        break;
                    }
                }
                Err(e) => {
                    log::warn!("socket open failed: {}", e);
                    self.close_session();
                }
            }

            let stopping = self.inner.try_with_value(|inner| inner.stopping).unwrap_or(true);
            if stopping {
                break;
            }
            let Some(delay) = self
                .inner
                .try_update_value(|inner| inner.session.next_reconnect_delay_ms())
            else {
                break;
            };
            log::info!("reconnecting in {} ms", delay);
            let wait = Box::pin(TimeoutFuture::new(delay as u32));
            if let Either::Left(_) = select(&mut stop, wait).await {
                break;
            }
        }

        self.inner.update_value(|inner| {
            inner.running = false;
            inner.stopping = false;
            inner.stop = None;
        });
        log::info!("channel stopped");
    }

    async fn serve(&self, ws: WebSocket, mut stop: &mut oneshot::Receiver<()>) -> Exit {
        let (mut sink, mut stream) = ws.split();
        let (tx, mut rx) = mpsc::unbounded::<Outgoing>();
        let heartbeat_ms = self.inner.with_value(|inner| inner.config.heartbeat_interval_ms);

        let join = self
            .inner
            .try_update_value(|inner| {
                inner.outgoing = Some(tx.clone());
                inner.session.join()
            });
        self.sync_state();
        if let Some(join) = join {
            self.send_frame(&tx, &join);
        }

        let writer = async {
            while let Some(item) = rx.next().await {
                match item {
                    Outgoing::Frame(text) => {
                        if let Err(e) = sink.send(Message::Text(text)).await {
                            log::warn!("socket write failed: {}", e);
                            return Exit::Closed;
                        }
                    }
                    Outgoing::Close => {
                        if let Err(e) = sink.close().await {
                            log::debug!("socket close failed: {}", e);
                        }
                        log::info!("left channel, socket closed");
                        return Exit::Stopped;
                    }
                }
            }
            Exit::Closed
        }
        .fuse();

        let heartbeat_tx = tx.clone();
        let heartbeat = async move {
            loop {
                TimeoutFuture::new(heartbeat_ms).await;
                let frame = self.inner.try_update_value(|inner| inner.session.heartbeat());
                match frame {
                    Some(frame) => self.send_frame(&heartbeat_tx, &frame),
                    None => break,
                }
            }
        }
        .fuse();

        let reader = async {
            while let Some(message) = stream.next().await {
                match message {
                    Ok(Message::Text(text)) => self.on_frame(&text),
                    Ok(Message::Bytes(_)) => log::debug!("ignoring binary frame"),
                    Err(e) => {
                        log::warn!("socket closed: {}", e);
                        break;
                    }
                }
            }
        }
        .fuse();

        futures::pin_mut!(writer, heartbeat, reader);
        futures::select! {
            exit = writer => exit,
            _ = heartbeat => Exit::Closed,
            _ = reader => Exit::Closed,
            _ = stop => Exit::Stopped,
        }
    }

    fn send_frame(&self, tx: &mpsc::UnboundedSender<Outgoing>, message: &ChannelMessage) {
        match message.encode() {
            Ok(text) => {
                if tx.unbounded_send(Outgoing::Frame(text)).is_err() {
                    log::debug!("socket writer gone, dropping {}", message.event);
                }
            }
            Err(e) => log::warn!("cannot encode {} frame: {}", message.event, e),
        }
    }

    fn on_frame(&self, text: &str) {
        let message = match ChannelMessage::decode(text) {
            Ok(message) => message,
            Err(e) => {
                log::warn!("dropping malformed frame: {}", e);
                return;
            }
        };

        let event = self
            .inner
            .try_update_value(|inner| inner.session.handle(message))
            .flatten();
        self.sync_state();

        match event {
            Some(SessionEvent::Joined(snapshot)) => {
                log::info!("joined dashboard channel");
                self.replace_snapshot(snapshot);
            }
            Some(SessionEvent::Snapshot(snapshot)) => self.replace_snapshot(snapshot),
            Some(SessionEvent::Reply { push_ref, result }) => {
                let waiter = self
                    .inner
                    .try_update_value(|inner| inner.replies.remove(&push_ref))
                    .flatten();
                if let Some(waiter) = waiter {
                    let _ = waiter.send(result);
                }
            }
            Some(SessionEvent::JoinRejected(reason)) => {
                log::warn!("join rejected: {}", reason);
                self.schedule_rejoin();
            }
            Some(SessionEvent::ChannelErrored) => self.schedule_rejoin(),
            None => {}
        }
    }

    fn replace_snapshot(&self, snapshot: SalesSnapshot) {
        log::debug!("snapshot received: {} rows", snapshot.rows.len());
        self.store.update(|store| store.replace(snapshot));
    }

    fn schedule_rejoin(&self) {
        let scheduled = self.inner.try_update_value(|inner| {
            (inner.generation, inner.session.next_rejoin_delay_ms())
        });
        let Some((generation, delay)) = scheduled else {
            return;
        };
        log::info!("rejoining in {} ms", delay);

        let this = *self;
        spawn_local(async move {
            TimeoutFuture::new(delay as u32).await;
            let rejoin = this
                .inner
                .try_update_value(|inner| {
                    let same_socket = inner.generation == generation && inner.outgoing.is_some();
                    if same_socket && inner.session.state() == ConnectionState::Errored {
                        inner
                            .outgoing
                            .clone()
                            .map(|tx| (tx, inner.session.join()))
                    } else {
                        None
                    }
                })
                .flatten();
            if let Some((tx, join)) = rejoin {
                this.sync_state();
                this.send_frame(&tx, &join);
            }
        });
    }

    fn close_session(&self) {
        let abandoned: Vec<ReplySender> = self
            .inner
            .try_update_value(|inner| {
                inner.outgoing = None;
                inner.generation += 1;
                inner.session.on_close();
                inner.replies.drain().map(|(_, waiter)| waiter).collect()
            })
            .unwrap_or_default();
        if !abandoned.is_empty() {
            log::warn!("socket closed with {} pending pushes", abandoned.len());
        }
        for waiter in abandoned {
            let _ = waiter.send(Err(PushError::Disconnected));
        }
        self.sync_state();
    }

    fn sync_state(&self) {
        let Some(state) = self.inner.try_with_value(|inner| inner.session.state()) else {
            return;
        };
        if self.state.get_untracked() != state {
            log::debug!("connection state: {}", state.label());
            self.state.set(state);
        }
    }

    /// Registers the reply waiter and queues the frame.
    fn start_push(
        &self,
        event: &str,
        payload: Value,
        waiter: ReplySender,
    ) -> Result<String, PushError> {
        self.inner
            .try_update_value(|inner| -> Result<String, PushError> {
                let outgoing = inner.outgoing.clone().ok_or(PushError::NotJoined)?;
                let (push_ref, message) = inner.session.push(event, payload)?;
                let frame = match message.encode() {
                    Ok(frame) => frame,
                    Err(e) => {
                        inner.session.expire(&push_ref);
                        return Err(PushError::Encode(e.to_string()));
                    }
                };
                if outgoing.unbounded_send(Outgoing::Frame(frame)).is_err() {
                    inner.session.expire(&push_ref);
                    return Err(PushError::Disconnected);
                }
                inner.replies.insert(push_ref.clone(), waiter);
                Ok(push_ref)
            })
            .unwrap_or(Err(PushError::Disconnected))
    }
}

impl OrderChannel for DashboardChannel {
    fn with_store<R>(&self, f: impl FnOnce(&RowStore) -> R) -> R {
        self.store.with_untracked(f)
    }

    fn manual_update(&self, transform: impl FnOnce(&mut SalesSnapshot)) {
        self.store.update(|store| store.manual_update(transform));
    }

    async fn push(&self, event: &str, payload: Value) -> Result<Value, PushError> {
        let (waiter, reply) = oneshot::channel();
        let push_ref = self.start_push(event, payload, waiter)?;
        let timeout_ms = self.inner.with_value(|inner| inner.config.push_timeout_ms);
        log::debug!("pushed {} (ref {})", event, push_ref);

        match select(reply, Box::pin(TimeoutFuture::new(timeout_ms))).await {
            Either::Left((Ok(result), _)) => result,
            Either::Left((Err(_), _)) => Err(PushError::Disconnected),
            Either::Right(_) => {
                self.inner.update_value(|inner| {
                    inner.session.expire(&push_ref);
                    inner.replies.remove(&push_ref);
                });
                log::warn!("{} timed out after {} ms", event, timeout_ms);
                Err(PushError::Timeout)
            }
        }
    }
}
