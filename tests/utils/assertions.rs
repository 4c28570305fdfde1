use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::timeout;

use cricscore::{MessageType, OutboundMessage};

// ============================================================================
// Channel Assertions
// ============================================================================

const RECV_TIMEOUT: Duration = Duration::from_secs(1);

/// Drives a viewer's receiver and asserts on the message stream.
pub struct MessageAssertion {
    receiver: broadcast::Receiver<OutboundMessage>,
}

impl MessageAssertion {
    pub fn new(receiver: broadcast::Receiver<OutboundMessage>) -> Self {
        Self { receiver }
    }

    /// The next message must have the expected type; its payload is returned
    /// for further inspection.
    pub async fn next_is(&mut self, expected: MessageType) -> serde_json::Value {
        let message = timeout(RECV_TIMEOUT, self.receiver.recv())
            .await
            .expect("timed out waiting for a channel message")
            .expect("channel closed while waiting for a message");
        assert_eq!(
            message.message_type, expected,
            "unexpected message type, payload: {}",
            message.payload
        );
        message.payload
    }

    /// Drain messages until one of the expected type arrives.
    pub async fn eventually(&mut self, expected: MessageType) -> serde_json::Value {
        loop {
            let message = timeout(RECV_TIMEOUT, self.receiver.recv())
                .await
                .expect("timed out waiting for a channel message")
                .expect("channel closed while waiting for a message");
            if message.message_type == expected {
                return message.payload;
            }
        }
    }

    pub fn assert_silent(&mut self) {
        assert!(
            self.receiver.try_recv().is_err(),
            "expected no further messages"
        );
    }
}
