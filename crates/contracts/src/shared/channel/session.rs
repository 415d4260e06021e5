//! Transport-independent state of one channel over one socket.
//!
//! The session builds outgoing frames and interprets incoming ones; the
//! caller owns the socket, timers and the row store.

use super::error::PushError;
use super::message::{
    ChannelMessage, EVENT_CLOSE, EVENT_ERROR, EVENT_HEARTBEAT, EVENT_JOIN, EVENT_LEAVE,
    EVENT_REPLY, PHOENIX_TOPIC,
};
use crate::domain::a001_sales_order::aggregate::SalesSnapshot;
use serde_json::{json, Value};
use std::collections::HashMap;

pub const DASHBOARD_TOPIC: &str = "dashboard:main";

/// Both events carry a full replacement snapshot.
pub const SNAPSHOT_EVENTS: [&str; 2] = ["new_data", "data_updated"];

const REJOIN_SCHEDULE_MS: [u64; 3] = [1_000, 2_000, 5_000];
const REJOIN_MAX_MS: u64 = 10_000;
const RECONNECT_SCHEDULE_MS: [u64; 9] = [10, 50, 100, 150, 200, 250, 500, 1_000, 2_000];
const RECONNECT_MAX_MS: u64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    /// Socket open, join sent and not yet confirmed.
    Joining,
    Joined,
    /// Socket open but the join was refused or the channel crashed.
    Errored,
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Joined)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "Desconectado",
            ConnectionState::Connecting => "Conectando",
            ConnectionState::Joining => "Entrando no canal",
            ConnectionState::Joined => "Conectado",
            ConnectionState::Errored => "Canal indisponível",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Joined(SalesSnapshot),
    JoinRejected(Value),
    Reply {
        push_ref: String,
        result: Result<Value, PushError>,
    },
    Snapshot(SalesSnapshot),
    ChannelErrored,
}

#[derive(Debug)]
pub struct ChannelSession {
    topic: String,
    join_payload: Value,
    state: ConnectionState,
    next_ref: u64,
    join_ref: Option<String>,
    /// ref -> event name of pushes awaiting a reply
    pending: HashMap<String, String>,
    rejoin_attempts: u32,
    /// Sockets opened since the last successful join.
    reconnect_attempts: u32,
}

impl ChannelSession {
    pub fn new(topic: &str, join_payload: Value) -> Self {
        Self {
            topic: topic.to_string(),
            join_payload,
            state: ConnectionState::Disconnected,
            next_ref: 0,
            join_ref: None,
            pending: HashMap::new(),
            rejoin_attempts: 0,
            reconnect_attempts: 0,
        }
    }

    pub fn dashboard() -> Self {
        Self::new(DASHBOARD_TOPIC, json!({}))
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_joined(&self) -> bool {
        self.state.is_connected()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn begin_connect(&mut self) {
        self.state = ConnectionState::Connecting;
    }

    /// Join frame; also used for rejoins after a channel error.
    pub fn join(&mut self) -> ChannelMessage {
        let join_ref = self.make_ref();
        self.join_ref = Some(join_ref.clone());
        self.state = ConnectionState::Joining;
        log::debug!("joining {} (ref {})", self.topic, join_ref);
        ChannelMessage {
            join_ref: Some(join_ref.clone()),
            msg_ref: Some(join_ref),
            topic: self.topic.clone(),
            event: EVENT_JOIN.to_string(),
            payload: self.join_payload.clone(),
        }
    }

    pub fn push(
        &mut self,
        event: &str,
        payload: Value,
    ) -> Result<(String, ChannelMessage), PushError> {
        if !self.is_joined() {
            return Err(PushError::NotJoined);
        }
        let push_ref = self.make_ref();
        self.pending.insert(push_ref.clone(), event.to_string());
        let message = ChannelMessage {
            join_ref: self.join_ref.clone(),
            msg_ref: Some(push_ref.clone()),
            topic: self.topic.clone(),
            event: event.to_string(),
            payload,
        };
        Ok((push_ref, message))
    }

    /// Leave frame for a joined channel, sent before an intentional close.
    pub fn leave(&mut self) -> Option<ChannelMessage> {
        if !self.is_joined() {
            return None;
        }
        log::debug!("leaving {}", self.topic);
        Some(ChannelMessage {
            join_ref: self.join_ref.clone(),
            msg_ref: Some(self.make_ref()),
            topic: self.topic.clone(),
            event: EVENT_LEAVE.to_string(),
            payload: json!({}),
        })
    }

    pub fn heartbeat(&mut self) -> ChannelMessage {
        ChannelMessage {
            join_ref: None,
            msg_ref: Some(self.make_ref()),
            topic: PHOENIX_TOPIC.to_string(),
            event: EVENT_HEARTBEAT.to_string(),
            payload: json!({}),
        }
    }

    /// Forgets a push whose reply did not arrive in time; a late reply is then ignored.
    pub fn expire(&mut self, push_ref: &str) -> bool {
        self.pending.remove(push_ref).is_some()
    }

    /// Socket closed: every pending push is abandoned and returned to the caller.
    pub fn on_close(&mut self) -> Vec<String> {
        self.state = ConnectionState::Disconnected;
        self.join_ref = None;
        self.pending.drain().map(|(push_ref, _)| push_ref).collect()
    }

    /// Delay before reopening the socket. The schedule only restarts after a
    /// join succeeds, so a server that accepts and drops connections still backs off.
    pub fn next_reconnect_delay_ms(&mut self) -> u64 {
        let delay = reconnect_delay_ms(self.reconnect_attempts);
        self.reconnect_attempts = self.reconnect_attempts.saturating_add(1);
        delay
    }

    /// Delay before the next rejoin attempt; each call counts as one attempt.
    pub fn next_rejoin_delay_ms(&mut self) -> u64 {
        let delay = REJOIN_SCHEDULE_MS
            .get(self.rejoin_attempts as usize)
            .copied()
            .unwrap_or(REJOIN_MAX_MS);
        self.rejoin_attempts += 1;
        delay
    }

    pub fn handle(&mut self, message: ChannelMessage) -> Option<SessionEvent> {
        if message.topic == PHOENIX_TOPIC {
            return None;
        }
        if message.topic != self.topic {
            log::debug!("ignoring frame for foreign topic {}", message.topic);
            return None;
        }

        if message.event == EVENT_REPLY {
            return self.handle_reply(message);
        }

        // Frames from an earlier join of this topic are stale.
        if message.join_ref.is_some() && message.join_ref != self.join_ref {
            log::debug!("ignoring stale {} frame", message.event);
            return None;
        }

        if message.event == EVENT_ERROR || message.event == EVENT_CLOSE {
            if matches!(
                self.state,
                ConnectionState::Joined | ConnectionState::Joining
            ) {
                log::warn!("channel {} reported {}", self.topic, message.event);
                self.state = ConnectionState::Errored;
                return Some(SessionEvent::ChannelErrored);
            }
            return None;
        }

        if SNAPSHOT_EVENTS.contains(&message.event.as_str()) {
            return match serde_json::from_value::<SalesSnapshot>(message.payload) {
                Ok(snapshot) => Some(SessionEvent::Snapshot(snapshot)),
                Err(e) => {
                    log::warn!("dropping undecodable {} payload: {}", message.event, e);
                    None
                }
            };
        }

        log::debug!("unhandled channel event {}", message.event);
        None
    }

    fn handle_reply(&mut self, message: ChannelMessage) -> Option<SessionEvent> {
        let reply = message.reply()?;
        let msg_ref = message.msg_ref?;

        if self.state == ConnectionState::Joining
            && self.join_ref.as_deref() == Some(msg_ref.as_str())
        {
            return Some(self.finish_join(reply));
        }

        if self.pending.remove(&msg_ref).is_some() {
            return Some(SessionEvent::Reply {
                push_ref: msg_ref,
                result: reply.map_err(PushError::Rejected),
            });
        }

        None
    }

    fn finish_join(&mut self, reply: Result<Value, Value>) -> SessionEvent {
        match reply {
            Ok(response) => match serde_json::from_value::<SalesSnapshot>(response) {
                Ok(snapshot) => {
                    log::debug!("joined {} with {} rows", self.topic, snapshot.rows.len());
                    self.state = ConnectionState::Joined;
                    self.rejoin_attempts = 0;
                    self.reconnect_attempts = 0;
                    SessionEvent::Joined(snapshot)
                }
                Err(e) => {
                    log::warn!("join reply is not a snapshot: {}", e);
                    self.state = ConnectionState::Errored;
                    SessionEvent::JoinRejected(json!({"reason": "invalid snapshot"}))
                }
            },
            Err(response) => {
                log::warn!("join of {} refused: {}", self.topic, response);
                self.state = ConnectionState::Errored;
                SessionEvent::JoinRejected(response)
            }
        }
    }

    fn make_ref(&mut self) -> String {
        self.next_ref += 1;
        self.next_ref.to_string()
    }
}

/// Socket-level reconnect delay for the given number of failed attempts.
pub fn reconnect_delay_ms(tries: u32) -> u64 {
    RECONNECT_SCHEDULE_MS
        .get(tries as usize)
        .copied()
        .unwrap_or(RECONNECT_MAX_MS)
}
