use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::StreamExt;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::broadcast::OutboundMessage;

/// Simple WebSocket abstraction - all we care about is send/receive
#[async_trait]
pub trait SocketWrapper: Send {
    /// Send a text message to the client
    async fn send_message(&mut self, message: String) -> Result<(), SocketError>;

    /// Receive the next text message from the client (None if connection closed)
    async fn receive_message(&mut self) -> Result<Option<String>, SocketError>;

    /// Close the connection
    async fn close(&mut self) -> Result<(), SocketError>;
}

#[derive(Debug)]
pub enum SocketError {
    SendFailed(String),
    ReceiveFailed(String),
}

/// Direct implementation on axum's WebSocket
#[async_trait]
impl SocketWrapper for WebSocket {
    async fn send_message(&mut self, message: String) -> Result<(), SocketError> {
        self.send(Message::Text(message))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }

    async fn receive_message(&mut self) -> Result<Option<String>, SocketError> {
        loop {
            match self.next().await {
                Some(Ok(Message::Text(text))) => return Ok(Some(text)),
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => continue, // binary/ping/pong
                Some(Err(e)) => return Err(SocketError::ReceiveFailed(e.to_string())),
            }
        }
    }

    async fn close(&mut self) -> Result<(), SocketError> {
        self.send(Message::Close(None))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }
}

/// One viewer's push connection: pumps channel messages to the socket until
/// the client disconnects. Viewers are read-only; inbound text is logged and
/// dropped.
pub struct ViewerConnection {
    socket: Box<dyn SocketWrapper>,
    receiver: broadcast::Receiver<OutboundMessage>,
}

impl ViewerConnection {
    pub fn new(
        socket: Box<dyn SocketWrapper>,
        receiver: broadcast::Receiver<OutboundMessage>,
    ) -> Self {
        Self { socket, receiver }
    }

    /// Send the initial message (if any), then pump deltas until disconnect.
    pub async fn run(mut self, initial: Option<OutboundMessage>) -> Result<(), SocketError> {
        if let Some(message) = initial {
            self.send(message).await?;
        }

        loop {
            tokio::select! {
                delta = self.receiver.recv() => {
                    match delta {
                        Ok(message) => self.send(message).await?,
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            // Slow consumer: deltas are dropped rather than
                            // stalling the scorer; the client can refetch.
                            warn!(skipped, "Viewer lagged behind the channel");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }

                inbound = self.socket.receive_message() => {
                    match inbound {
                        Ok(Some(text)) => {
                            debug!(message = %text, "Dropping inbound viewer message");
                        }
                        Ok(None) => break, // Client disconnected
                        Err(e) => return Err(e),
                    }
                }
            }
        }

        // Clean disconnect
        let _ = self.socket.close().await;
        Ok(())
    }

    async fn send(&mut self, message: OutboundMessage) -> Result<(), SocketError> {
        match serde_json::to_string(&message) {
            Ok(json) => self.socket.send_message(json).await,
            Err(e) => {
                warn!(error = %e, "Failed to serialize outbound message");
                Ok(())
            }
        }
    }
}
