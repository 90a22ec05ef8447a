//! Real-time notification fan-out
//!
//! Bridges the change-event bus onto a WebSocket. The feed is one-way
//! and purely observational: inbound frames are ignored, and a slow
//! subscriber that misses events is told nothing beyond a log line.

use futures_util::sink::SinkExt;
use futures_util::stream::StreamExt;
use log::{debug, error, info, warn};
use tokio::sync::broadcast::error::RecvError;
use warp::ws::{Message, WebSocket};

use crate::events::EventBus;

/// Handle a subscriber connection on /ws
pub async fn handle_ws_client(ws: WebSocket, events: EventBus) {
    let (mut ws_tx, mut ws_rx) = ws.split();
    let mut rx = events.subscribe();

    info!("Notification subscriber connected");

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Ok(event) => {
                    let payload = match serde_json::to_string(&event) {
                        Ok(payload) => payload,
                        Err(e) => {
                            error!("Failed to serialize change event: {}", e);
                            continue;
                        }
                    };
                    if let Err(e) = ws_tx.send(Message::text(payload)).await {
                        debug!("Subscriber send failed, dropping connection: {}", e);
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Notification subscriber lagged, {} events skipped", skipped);
                }
                Err(RecvError::Closed) => break,
            },
            incoming = ws_rx.next() => match incoming {
                Some(Ok(msg)) if msg.is_close() => break,
                // The feed is one-way; inbound frames are ignored
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!("WebSocket error from subscriber: {}", e);
                    break;
                }
                None => break,
            },
        }
    }

    info!("Notification subscriber disconnected");
}
