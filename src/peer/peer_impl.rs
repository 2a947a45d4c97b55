use super::action::Action;
use super::rtt::RttEstimator;
use super::state::PeerState;
use super::stats::TrafficStats;
use crate::clock::Clock;
use crate::codec::{self, tag, EventData, OperationRequest, OperationResponse, Parameters, Value};
use crate::config::PeerConfig;
use crate::listener::{DebugLevel, Listener, StatusCode};
use crate::net::{message, Connection, FrameSink};
use slog::Logger;
use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

/// The peer state machine: connection lifecycle, outgoing queue, incoming
/// queue, ping/RTT tracker, initialization handshake, and message
/// classification/dispatch.
///
/// Always lives behind an `Arc` — the receive thread needs a `Arc<dyn
/// FrameSink>` handle back into the peer, so `connect`/`disconnect`/`stop`
/// take an explicit `&Arc<Peer>` rather than `&self`.
pub struct Peer {
    state: Mutex<PeerState>,
    config: PeerConfig,
    listener: Mutex<Arc<dyn Listener>>,
    debug_level: Mutex<DebugLevel>,
    clock: Arc<dyn Clock>,
    logger: Logger,

    connection: Mutex<Option<Connection>>,
    connection_start_ms: Mutex<u64>,

    action_queue: Mutex<VecDeque<Action>>,
    incoming_list: Mutex<VecDeque<Vec<u8>>>,
    outgoing_op_list: Mutex<VecDeque<Vec<u8>>>,

    rtt: Mutex<RttEstimator>,
    last_ping_sent_local_ms: Mutex<u64>,

    stats: Option<TrafficStats>,
}

impl Peer {
    pub fn new(config: PeerConfig, listener: Arc<dyn Listener>, clock: Arc<dyn Clock>, logger: Logger) -> Arc<Peer> {
        let stats = if config.traffic_stats_enabled { Some(TrafficStats::new()) } else { None };

        Arc::new(Peer {
            state: Mutex::new(PeerState::Disconnected),
            config,
            listener: Mutex::new(listener),
            debug_level: Mutex::new(DebugLevel::Error),
            clock,
            logger,
            connection: Mutex::new(None),
            connection_start_ms: Mutex::new(0),
            action_queue: Mutex::new(VecDeque::new()),
            incoming_list: Mutex::new(VecDeque::new()),
            outgoing_op_list: Mutex::new(VecDeque::new()),
            rtt: Mutex::new(RttEstimator::new()),
            last_ping_sent_local_ms: Mutex::new(0),
            stats,
        })
    }

    pub fn state(&self) -> PeerState {
        *self.state.lock().expect("state mutex poisoned")
    }

    pub fn stats(&self) -> Option<&TrafficStats> {
        self.stats.as_ref()
    }

    fn listener(&self) -> Arc<dyn Listener> {
        self.listener.lock().expect("listener mutex poisoned").clone()
    }

    pub fn set_listener(&self, listener: Arc<dyn Listener>) {
        *self.listener.lock().expect("listener mutex poisoned") = listener;
    }

    pub fn debug_level(&self) -> DebugLevel {
        *self.debug_level.lock().expect("debug_level mutex poisoned")
    }

    pub fn set_debug_level(&self, level: DebugLevel) {
        *self.debug_level.lock().expect("debug_level mutex poisoned") = level;
    }

    fn debug_return(&self, level: DebugLevel, message: &str) {
        if self.debug_level() >= level {
            self.listener().debug_return(level, message);
        }
    }

    pub fn last_round_trip_time(&self) -> f64 {
        self.rtt.lock().expect("rtt mutex poisoned").last_round_trip_time()
    }

    /// Peer-local milliseconds: `clock() - connection_start`.
    fn local_ms(&self) -> u64 {
        let start = *self.connection_start_ms.lock().expect("connection_start_ms mutex poisoned");
        self.clock.now_ms().saturating_sub(start)
    }

    fn reset_queues(&self) {
        self.incoming_list.lock().expect("incoming_list mutex poisoned").clear();
        self.outgoing_op_list.lock().expect("outgoing_op_list mutex poisoned").clear();
        self.action_queue.lock().expect("action_queue mutex poisoned").clear();
    }

    fn enqueue_action(&self, action: Action) {
        self.action_queue.lock().expect("action_queue mutex poisoned").push_back(action);
    }

    fn enqueue_message_as_payload(&self, mut message: Vec<u8>, reliable: bool, channel_id: u8) {
        message::patch_channel_and_reliable(&mut message, channel_id, reliable);
        self.outgoing_op_list.lock().expect("outgoing_op_list mutex poisoned").push_back(message);
    }

    /// `Disconnected -> Connecting`. Starts the receive task and enqueues
    /// the handshake. Returns false (and logs a warning) if the peer is
    /// not currently `Disconnected`.
    pub fn connect(this: &Arc<Peer>, host: &str, port: u16, app_id: Option<&str>) -> bool {
        {
            let mut state = this.state.lock().expect("state mutex poisoned");
            if *state != PeerState::Disconnected {
                this.debug_return(
                    DebugLevel::Warning,
                    "Connect() can't be called if peer is not Disconnected. Not connecting.",
                );
                return false;
            }
            *state = PeerState::Connecting;
        }

        this.reset_queues();
        *this.connection_start_ms.lock().expect("connection_start_ms mutex poisoned") = this.clock.now_ms();

        let sink: Arc<dyn FrameSink> = this.clone();
        let conn = match Connection::start((host, port), sink, this.logger.clone()) {
            Ok(conn) => conn,
            Err(e) => {
                *this.state.lock().expect("state mutex poisoned") = PeerState::Disconnected;
                this.debug_return(DebugLevel::Error, &format!("{}", e));
                this.listener().on_status_changed(StatusCode::ExceptionOnConnect);
                return false;
            }
        };

        *this.connection.lock().expect("connection mutex poisoned") = Some(conn);

        let app_id = app_id.unwrap_or(&this.config.app_id);
        let init_message = message::build_init_message(app_id);
        this.enqueue_message_as_payload(init_message, true, 0);

        true
    }

    /// `Connected -> Disconnecting -> Disconnected`. Clears the outgoing
    /// queue and closes the connection task; a no-op if already
    /// disconnected or disconnecting.
    pub fn disconnect(this: &Arc<Peer>) {
        {
            let mut state = this.state.lock().expect("state mutex poisoned");
            if *state == PeerState::Disconnected || *state == PeerState::Disconnecting {
                return;
            }
            *state = PeerState::Disconnecting;
        }

        this.outgoing_op_list.lock().expect("outgoing_op_list mutex poisoned").clear();

        if let Some(conn) = this.connection.lock().expect("connection mutex poisoned").as_mut() {
            conn.stop();
        }

        *this.state.lock().expect("state mutex poisoned") = PeerState::Disconnected;
        this.listener().on_status_changed(StatusCode::Disconnect);
    }

    /// Unconditionally tears down the connection task. Idempotent.
    pub fn stop(this: &Arc<Peer>) {
        if let Some(conn) = this.connection.lock().expect("connection mutex poisoned").as_mut() {
            conn.stop();
        }
        *this.state.lock().expect("state mutex poisoned") = PeerState::Disconnected;
    }

    /// Enqueues an operation request. Fails (logging and firing
    /// `SendError`) unless the peer is `Connected` and the channel is in
    /// range.
    pub fn enqueue_operation(&self, op_code: u8, params: Parameters, reliable: bool, channel_id: u8) -> bool {
        if self.state() != PeerState::Connected {
            self.debug_return(
                DebugLevel::Error,
                &format!("Cannot send op: {}. Not connected. PeerState: {:?}", op_code, self.state()),
            );
            self.listener().on_status_changed(StatusCode::SendError);
            return false;
        }

        if channel_id >= self.config.channel_count {
            self.debug_return(
                DebugLevel::Error,
                &format!(
                    "Cannot send op: Selected channel ({}) >= channelCount ({})",
                    channel_id, self.config.channel_count
                ),
            );
            self.listener().on_status_changed(StatusCode::SendError);
            return false;
        }

        let mut op_bytes = Vec::new();
        let request = Value::OperationRequest(OperationRequest { op_code, parameters: params });
        if let Err(e) = codec::serialize_value(&mut op_bytes, &request, false) {
            self.debug_return(DebugLevel::Error, &format!("Error serializing operation! {}", e));
            return false;
        }

        let message = message::build_operation_message(&op_bytes);
        if let Some(stats) = &self.stats {
            stats.record_operation_sent(message.len());
        }
        self.enqueue_message_as_payload(message, reliable, channel_id);

        true
    }

    /// Drains the action queue, then pops and dispatches one queued
    /// incoming payload. Returns false when there was nothing to
    /// dispatch — the facade loops this until it returns false.
    pub fn dispatch_incoming_commands(&self) -> bool {
        loop {
            let action = self.action_queue.lock().expect("action_queue mutex poisoned").pop_front();
            match action {
                Some(Action::DebugMessage { level, text }) => self.debug_return(level, &text),
                Some(Action::StatusChange { code }) => self.listener().on_status_changed(code),
                None => break,
            }
        }

        let payload = self.incoming_list.lock().expect("incoming_list mutex poisoned").pop_front();

        match payload {
            None => false,
            Some(payload) => {
                self.deserialize_message_and_callback(&payload);
                true
            }
        }
    }

    /// Sends one ping if the interval has elapsed, then flushes the
    /// entire outgoing queue.
    pub fn send_outgoing_commands(&self) -> bool {
        if self.state() == PeerState::Disconnected {
            return false;
        }

        let conn_guard = self.connection.lock().expect("connection mutex poisoned");
        let conn = match conn_guard.as_ref() {
            Some(conn) => conn,
            None => return false,
        };

        if !conn.is_running() {
            return false;
        }

        if self.state() == PeerState::Connected {
            let now = self.local_ms();
            let last_ping = *self.last_ping_sent_local_ms.lock().expect("last_ping_sent_local_ms mutex poisoned");
            if now.saturating_sub(last_ping) > u64::from(self.config.ping_interval_ms) {
                self.send_ping(conn);
            }
        }

        let to_send: Vec<Vec<u8>> =
            self.outgoing_op_list.lock().expect("outgoing_op_list mutex poisoned").drain(..).collect();

        for data in to_send {
            if let Err(e) = conn.send(&data) {
                self.debug_return(DebugLevel::Error, &format!("{}", e));
            }
        }

        true
    }

    fn send_ping(&self, conn: &Connection) {
        let t0 = self.local_ms() as u32;
        let frame = message::build_ping_frame(t0);
        *self.last_ping_sent_local_ms.lock().expect("last_ping_sent_local_ms mutex poisoned") = self.local_ms();

        if let Some(stats) = &self.stats {
            stats.record_ping_sent();
        }

        let _ = conn.send(&frame);
    }

    fn read_ping_result(&self, payload: &[u8]) {
        if payload.len() < message::PING_REPLY_SIZE {
            return;
        }

        let client_sent = u32::from_be_bytes([payload[5], payload[6], payload[7], payload[8]]);
        let now = self.local_ms();
        let sample = now as f64 - client_sent as f64;

        self.rtt.lock().expect("rtt mutex poisoned").update(sample);
    }

    /// Classifies a reassembled payload by its message-type byte (byte 1,
    /// after the 2-byte header prefix) and dispatches accordingly.
    fn deserialize_message_and_callback(&self, payload: &[u8]) {
        if payload.len() < 2 {
            self.debug_return(DebugLevel::Error, "deserialize_message_and_callback() - payload too short");
            return;
        }

        let type_byte = payload[1];
        let encrypted = type_byte & 0x80 != 0;
        let message_type = type_byte & 0x7F;

        if encrypted && message_type != 1 {
            self.debug_return(
                DebugLevel::Warning,
                "encryption flag set on a message this core does not support; dropping frame",
            );
            return;
        }

        match message_type {
            1 => {
                *self.state.lock().expect("state mutex poisoned") = PeerState::Connected;
                self.listener().on_status_changed(StatusCode::Connect);
            }
            3 => {
                let mut cursor = Cursor::new(&payload[2..]);
                match codec::deserialize_value(&mut cursor, Some(tag::OPERATION_RESPONSE)) {
                    Ok(Value::OperationResponse(response)) => self.listener().on_operation_response(response),
                    Ok(_) => unreachable!("type hint always yields the matching variant"),
                    Err(e) => self.debug_return(DebugLevel::Error, &format!("{}", e)),
                }
            }
            4 => {
                let mut cursor = Cursor::new(&payload[2..]);
                match codec::deserialize_value(&mut cursor, Some(tag::EVENT_DATA)) {
                    Ok(Value::EventData(event)) => self.listener().on_event(event),
                    Ok(_) => unreachable!("type hint always yields the matching variant"),
                    Err(e) => self.debug_return(DebugLevel::Error, &format!("{}", e)),
                }
            }
            7 => {
                self.debug_return(DebugLevel::Warning, "shared-key message received; unsupported, ignoring");
            }
            other => {
                self.debug_return(DebugLevel::Error, &format!("unknown message type {}", other));
            }
        }
    }
}

impl FrameSink for Peer {
    fn receive_incoming_commands(&self, payload: Vec<u8>) {
        if payload.is_empty() {
            self.enqueue_action(Action::DebugMessage {
                level: DebugLevel::Error,
                text: "receive_incoming_commands() - data is empty".to_string(),
            });
            return;
        }

        if let Some(stats) = &self.stats {
            stats.record_frame_received(payload.len());
        }

        match payload[0] {
            message::MAGIC_OP | message::MAGIC_OP_ALT => {
                let warn = {
                    let mut incoming = self.incoming_list.lock().expect("incoming_list mutex poisoned");
                    incoming.push_back(payload);
                    incoming.len() % self.config.warning_size == 0
                };

                if warn {
                    self.enqueue_action(Action::StatusChange { code: StatusCode::QueueIncomingReliableWarning });
                }
            }
            message::MAGIC_PING => self.read_ping_result(&payload),
            other => {
                self.enqueue_action(Action::DebugMessage {
                    level: DebugLevel::Error,
                    text: format!(
                        "receiveIncomingCommands() MagicNumber should be 0xF0, 0xF3 or 0xF4. Is: {:02x}",
                        other
                    ),
                });
            }
        }
    }

    fn on_transport_error(&self, err: &crate::error::Error) {
        self.enqueue_action(Action::DebugMessage { level: DebugLevel::Error, text: format!("{}", err) });
        self.enqueue_action(Action::StatusChange { code: StatusCode::Exception });
        self.enqueue_action(Action::StatusChange { code: StatusCode::Disconnect });
        *self.state.lock().expect("state mutex poisoned") = PeerState::Disconnected;
    }
}
