use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use super::messages::OutboundMessage;

/// Capacity of each match channel; a lagging viewer drops messages instead
/// of stalling the scorer.
const CHANNEL_CAPACITY: usize = 256;

/// Fans state-deltas out to every viewer subscribed to a match, plus a
/// global channel for list views. Publishing never blocks the writer.
#[derive(Debug, Clone)]
pub struct BroadcastHub {
    /// match_id -> sender
    match_channels: Arc<RwLock<HashMap<String, broadcast::Sender<OutboundMessage>>>>,
    global: broadcast::Sender<OutboundMessage>,
}

impl BroadcastHub {
    pub fn new() -> Self {
        let (global, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            match_channels: Arc::new(RwLock::new(HashMap::new())),
            global,
        }
    }

    /// Deliver a message to all current subscribers of a match channel.
    pub async fn publish(&self, match_id: &str, message: OutboundMessage) {
        let channels = self.match_channels.read().await;

        if let Some(sender) = channels.get(match_id) {
            match sender.send(message) {
                Ok(receivers) => {
                    debug!(match_id = %match_id, receivers, "Match delta published");
                }
                Err(_) => {
                    debug!(match_id = %match_id, "Match delta published with no receivers");
                }
            }
        } else {
            drop(channels);

            // Create the channel so a subscriber arriving next gets a live one
            let mut channels = self.match_channels.write().await;
            let sender = channels
                .entry(match_id.to_string())
                .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
                .clone();
            if sender.send(message).is_err() {
                debug!(match_id = %match_id, "Match delta published to fresh channel with no receivers");
            }
        }
    }

    /// Subscribe to one match's channel.
    pub async fn subscribe(&self, match_id: &str) -> broadcast::Receiver<OutboundMessage> {
        {
            let channels = self.match_channels.read().await;
            if let Some(sender) = channels.get(match_id) {
                return sender.subscribe();
            }
        }

        debug!(match_id = %match_id, "Creating match channel for subscription");
        let mut channels = self.match_channels.write().await;
        channels
            .entry(match_id.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Publish to the all-live-matches list channel.
    pub fn publish_global(&self, message: OutboundMessage) {
        if self.global.send(message).is_err() {
            debug!("Global delta published with no receivers");
        }
    }

    pub fn subscribe_global(&self) -> broadcast::Receiver<OutboundMessage> {
        self.global.subscribe()
    }

    /// Drop a match channel once its session is gone.
    pub async fn remove_channel(&self, match_id: &str) {
        let mut channels = self.match_channels.write().await;
        channels.remove(match_id);
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::messages::MessageType;
    use crate::model::TossDecision;

    fn message(n: u32) -> OutboundMessage {
        OutboundMessage::inning_end("m1", 1, n, 0, None)
    }

    #[tokio::test]
    async fn subscribers_receive_messages_in_publish_order() {
        let hub = BroadcastHub::new();
        let mut rx = hub.subscribe("m1").await;

        for n in 0..20 {
            hub.publish("m1", message(n)).await;
        }

        for n in 0..20 {
            let received = rx.recv().await.unwrap();
            let payload: crate::broadcast::messages::InningEndPayload =
                serde_json::from_value(received.payload).unwrap();
            assert_eq!(payload.total_runs, n);
        }
    }

    #[tokio::test]
    async fn channels_are_isolated_per_match() {
        let hub = BroadcastHub::new();
        let mut rx_m1 = hub.subscribe("m1").await;
        let mut rx_m2 = hub.subscribe("m2").await;

        hub.publish("m1", message(1)).await;

        assert!(rx_m1.recv().await.is_ok());
        assert!(rx_m2.try_recv().is_err());
    }

    #[tokio::test]
    async fn publish_without_subscribers_does_not_block() {
        let hub = BroadcastHub::new();
        hub.publish("m1", message(1)).await;
        // a later subscriber sees only what comes after
        let mut rx = hub.subscribe("m1").await;
        hub.publish("m1", message(2)).await;
        let received = rx.recv().await.unwrap();
        let payload: crate::broadcast::messages::InningEndPayload =
            serde_json::from_value(received.payload).unwrap();
        assert_eq!(payload.total_runs, 2);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn global_channel_reaches_all_subscribers() {
        let hub = BroadcastHub::new();
        let mut rx_a = hub.subscribe_global();
        let mut rx_b = hub.subscribe_global();

        hub.publish_global(OutboundMessage::toss_update("m1", "team-a", TossDecision::Bat));

        assert_eq!(rx_a.recv().await.unwrap().message_type, MessageType::TossUpdate);
        assert_eq!(rx_b.recv().await.unwrap().message_type, MessageType::TossUpdate);
    }
}
