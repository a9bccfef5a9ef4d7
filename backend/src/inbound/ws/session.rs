//! Per-connection live-channel handler.
//!
//! Forwards hub events to the browser as JSON text frames and keeps the
//! connection alive with pings. The public contract pings every 5s and
//! considers a connection idle after 10s without client traffic. Tests
//! shorten these intervals. Client text frames carry no commands and are
//! ignored apart from counting as traffic.

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use tokio::time;
use tracing::{debug, warn};

use crate::domain::LedgerEvent;
use crate::inbound::ws::messages::LedgerMessage;
use crate::outbound::broadcast::Subscription;

/// Time between heartbeats to the client (5s in production, shorter in tests).
#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

/// Max idle time before disconnecting the client (10s in production, shorter in tests).
#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(100);

pub(super) async fn handle_ws_session(
    subscription: Subscription,
    session: Session,
    stream: MessageStream,
) {
    WsSession::new(subscription).run(session, stream).await;
}

enum SessionError {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    HeartbeatTimeout,
    Protocol(ProtocolError),
    Unsubscribed,
    Network(Closed),
}

enum CloseAction {
    None,
    Close(Option<CloseReason>),
}

struct WsSession {
    subscription: Subscription,
}

impl WsSession {
    fn new(subscription: Subscription) -> Self {
        Self { subscription }
    }

    async fn run(mut self, mut session: Session, mut stream: MessageStream) {
        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);

        loop {
            let result = tokio::select! {
                _ = heartbeat.tick() => {
                    handle_heartbeat_tick(&mut session, &last_heartbeat).await
                }
                message = stream.recv() => {
                    handle_stream_message(&mut session, &mut last_heartbeat, message).await
                }
                event = self.subscription.recv() => {
                    forward_event(&mut session, event).await
                }
            };

            if let Err(error) = result {
                log_shutdown_reason(self.subscription.id(), &error);
                close_session_if_needed(session, close_action_for(&error)).await;
                return;
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

    session.ping(b"").await.map_err(SessionError::Network)
}

async fn handle_stream_message(
    session: &mut Session,
    last_heartbeat: &mut Instant,
    message: Option<Result<Message, ProtocolError>>,
) -> Result<(), SessionError> {
    let Some(message) = message else {
        return Err(SessionError::StreamClosed);
    };

    match message {
        Ok(Message::Ping(payload)) => {
            *last_heartbeat = Instant::now();
            session.pong(&payload).await.map_err(SessionError::Network)
        }
        Ok(Message::Close(reason)) => Err(SessionError::ClientClosed(reason)),
        Ok(
            Message::Text(_)
            | Message::Pong(_)
            | Message::Binary(_)
            | Message::Continuation(_)
            | Message::Nop,
        ) => {
            *last_heartbeat = Instant::now();
            Ok(())
        }
        Err(error) => Err(SessionError::Protocol(error)),
    }
}

async fn forward_event(
    session: &mut Session,
    event: Option<Arc<LedgerEvent>>,
) -> Result<(), SessionError> {
    let Some(event) = event else {
        return Err(SessionError::Unsubscribed);
    };
    let message = LedgerMessage::from(event.as_ref());
    match serde_json::to_string(&message) {
        Ok(body) => session.text(body).await.map_err(SessionError::Network),
        Err(error) => {
            warn!(error = %error, kind = event.kind(), "Failed to serialize ledger push");
            Ok(())
        }
    }
}

fn log_shutdown_reason(subscriber: u64, error: &SessionError) {
    match error {
        SessionError::HeartbeatTimeout => {
            warn!(subscriber, "WebSocket heartbeat timeout; closing connection");
        }
        SessionError::Protocol(error) => {
            warn!(subscriber, error = %error, "WebSocket protocol error");
        }
        SessionError::Network(error) => {
            warn!(subscriber, error = %error, "WebSocket send failed; closing connection");
        }
        SessionError::Unsubscribed => {
            warn!(subscriber, "session dropped by hub; closing so the client resyncs");
        }
        SessionError::ClientClosed(_) | SessionError::StreamClosed => {
            debug!(subscriber, "live session closed by client");
        }
    }
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
        SessionError::Unsubscribed => CloseAction::Close(Some(CloseReason {
            code: CloseCode::Again,
            description: Some("resync required".to_owned()),
        })),
        SessionError::ClientClosed(reason) => CloseAction::Close(reason.clone()),
        SessionError::StreamClosed | SessionError::Network(_) => CloseAction::None,
    }
}

async fn close_session_if_needed(session: Session, close_action: CloseAction) {
    if let CloseAction::Close(reason) = close_action {
        if let Err(error) = session.close(reason).await {
            warn!(error = %error, "Failed to close WebSocket session");
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
