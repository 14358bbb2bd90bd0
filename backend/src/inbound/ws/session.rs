//! Per-connection WebSocket handler.
//!
//! One task per connection runs a select loop over three sources: the
//! heartbeat ticker, inbound client frames and the bounded outbound queue.
//! Requests are served synchronously through the driving ports and their
//! responses are pushed onto the queue, so a slow client can only ever cost
//! dropped messages, never a blocked draw.
//!
//! The public contract pings every 30s, closes a connection idle for 60s and
//! gives up on a write after 10s. Tests shorten these intervals.

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use tokio::sync::mpsc::Receiver;
use tokio::time;
use tracing::{debug, warn};

use crate::domain::{Error, Player, TraceId};
use crate::inbound::ws::messages::{ClientRequest, Outbound, ServerEvent};
use crate::inbound::ws::outbound_queue::OutboundQueue;
use crate::inbound::ws::state::WsState;

/// Time between heartbeats to the client.
#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

/// Max idle time before disconnecting the client.
#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(60);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(250);

/// Max time a single frame write may take.
#[cfg(not(test))]
const WRITE_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const WRITE_TIMEOUT: Duration = Duration::from_secs(1);

pub(super) async fn handle_ws_session(
    state: WsState,
    player: Player,
    session: Session,
    stream: MessageStream,
) {
    let (queue, outbound) =
        OutboundQueue::bounded(state.queue_capacity, Arc::clone(&state.dropped_messages));
    WsSession::new(state, player, queue)
        .run(session, stream, outbound)
        .await;
}

enum SessionError {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    HeartbeatTimeout,
    WriteTimeout,
    Protocol(ProtocolError),
    Network(Closed),
}

enum CloseAction {
    None,
    Close(Option<CloseReason>),
}

struct WsSession {
    state: WsState,
    player: Player,
    queue: OutboundQueue,
}

impl WsSession {
    const fn new(state: WsState, player: Player, queue: OutboundQueue) -> Self {
        Self {
            state,
            player,
            queue,
        }
    }

    async fn run(
        &self,
        mut session: Session,
        mut stream: MessageStream,
        mut outbound: Receiver<Outbound>,
    ) {
        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);

        TraceId::scope(TraceId::generate(), async { self.push_user_info() }).await;

        loop {
            let result = tokio::select! {
                _ = heartbeat.tick() => {
                    handle_heartbeat_tick(&mut session, &last_heartbeat).await
                }
                message = stream.recv() => {
                    self.handle_stream_message(&mut session, &mut last_heartbeat, message)
                        .await
                }
                Some(message) = outbound.recv() => {
                    write_frame(&mut session, &message).await
                }
            };

            if let Err(error) = result {
                self.log_shutdown_reason(&error);
                close_session_if_needed(session, close_action_for(&error)).await;
                return;
            }
        }
    }

    async fn handle_stream_message(
        &self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        next: Option<Result<Message, ProtocolError>>,
    ) -> Result<(), SessionError> {
        let frame = next
            .ok_or(SessionError::StreamClosed)?
            .map_err(SessionError::Protocol)?;
        self.handle_message(session, last_heartbeat, frame).await
    }

    async fn handle_message(
        &self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        message: Message,
    ) -> Result<(), SessionError> {
        *last_heartbeat = Instant::now();
        match message {
            Message::Ping(payload) => session.pong(&payload).await.map_err(SessionError::Network),
            Message::Text(text) => {
                TraceId::scope(TraceId::generate(), async { self.dispatch(text.as_ref()) }).await;
                Ok(())
            }
            Message::Pong(_) | Message::Binary(_) | Message::Continuation(_) | Message::Nop => {
                Ok(())
            }
            Message::Close(reason) => Err(SessionError::ClientClosed(reason)),
        }
    }

    /// Serve one text frame. Failures become error events and the
    /// connection stays open.
    fn dispatch(&self, text: &str) {
        let request = match ClientRequest::parse(text) {
            Ok(request) => request,
            Err(error) => {
                debug!(player = %self.player, error = %error.message(), "rejected WebSocket frame");
                self.queue.push(error);
                return;
            }
        };

        let response = self.serve(&request);
        let refresh = response.is_ok() && request.changes_balance();
        self.queue
            .push(response.map_or_else(Outbound::from, Outbound::from));
        if refresh {
            self.push_user_info();
        }
    }

    fn serve(&self, request: &ClientRequest) -> Result<ServerEvent, Error> {
        let gacha = &self.state.gacha;
        let query = &self.state.gacha_query;
        match request {
            ClientRequest::SinglePull => gacha.single_draw(&self.player).map(ServerEvent::GachaResult),
            ClientRequest::TenPull => gacha.ten_draw(&self.player).map(ServerEvent::GachaResult),
            ClientRequest::GetUserInfo => query.user_info(&self.player).map(ServerEvent::UserInfo),
            ClientRequest::GetInventory => query.inventory(&self.player).map(ServerEvent::Inventory),
            ClientRequest::GetPool => Ok(ServerEvent::PoolInfo(query.pool_info())),
            ClientRequest::AddCurrency { amount } => gacha
                .add_currency(&self.player, *amount)
                .map(ServerEvent::CurrencyUpdate),
            ClientRequest::Register { username } => {
                gacha.register(username).map(ServerEvent::UserInfo)
            }
            ClientRequest::Ping => Ok(ServerEvent::Pong),
        }
    }

    fn push_user_info(&self) {
        let info = self.state.gacha_query.user_info(&self.player);
        self.queue.push(info.map_or_else(Outbound::from, |snapshot| {
            Outbound::from(ServerEvent::UserInfo(snapshot))
        }));
    }

    fn log_shutdown_reason(&self, cause: &SessionError) {
        match cause {
            SessionError::HeartbeatTimeout => {
                warn!(player = %self.player, "WebSocket heartbeat timeout; closing connection");
            }
            SessionError::WriteTimeout => {
                warn!(player = %self.player, "WebSocket write timed out; closing connection");
            }
            SessionError::Protocol(error) => {
                warn!(player = %self.player, error = %error, "WebSocket protocol error");
            }
            SessionError::Network(error) => {
                warn!(player = %self.player, error = %error, "WebSocket send failed; closing connection");
            }
            SessionError::ClientClosed(_) | SessionError::StreamClosed => {
                debug!(
                    player = %self.player,
                    dropped_total = self.queue.dropped(),
                    "WebSocket session closed"
                );
            }
        }
    }
}

async fn handle_heartbeat_tick(
    session: &mut Session,
    last_heartbeat: &Instant,
) -> Result<(), SessionError> {
    if Instant::now().duration_since(*last_heartbeat) > CLIENT_TIMEOUT {
        return Err(SessionError::HeartbeatTimeout);
    }

    time::timeout(WRITE_TIMEOUT, session.ping(b""))
        .await
        .map_err(|_| SessionError::WriteTimeout)?
        .map_err(SessionError::Network)
}

async fn write_frame(session: &mut Session, message: &Outbound) -> Result<(), SessionError> {
    let body = match serde_json::to_string(message) {
        Ok(body) => body,
        Err(error) => {
            warn!(error = %error, "Failed to serialize WebSocket payload");
            return Ok(());
        }
    };

    time::timeout(WRITE_TIMEOUT, session.text(body))
        .await
        .map_err(|_| SessionError::WriteTimeout)?
        .map_err(SessionError::Network)
}

fn close_action_for(error: &SessionError) -> CloseAction {
    match error {
        SessionError::HeartbeatTimeout => CloseAction::Close(Some(CloseReason {
            code: CloseCode::Normal,
            description: Some("heartbeat timeout".to_owned()),
        })),
        SessionError::Protocol(_) => CloseAction::Close(Some(CloseReason {
            code: CloseCode::Protocol,
            description: Some("protocol error".to_owned()),
        })),
        SessionError::ClientClosed(reason) => CloseAction::Close(reason.clone()),
        SessionError::StreamClosed | SessionError::Network(_) | SessionError::WriteTimeout => {
            CloseAction::None
        }
    }
}

async fn close_session_if_needed(session: Session, close_action: CloseAction) {
    if let CloseAction::Close(reason) = close_action
        && let Err(error) = session.close(reason).await
    {
        warn!(error = %error, "Failed to close WebSocket session");
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
