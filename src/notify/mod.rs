//! Notifications
//!
//! Success/failure signal shown to the operator after a submit. At most one
//! notification is visible; each auto-dismisses after a fixed interval unless
//! a newer one has replaced it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tracing::debug;

pub const DEFAULT_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
            raised_at: Utc::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
            raised_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationEvent {
    Shown(Notification),
    Dismissed,
}

type Visible = Arc<Mutex<Option<(u64, Notification)>>>;

/// Holds the visible notification and broadcasts show/dismiss events.
#[derive(Clone)]
pub struct NotificationCenter {
    current: Visible,
    generation: Arc<AtomicU64>,
    tx: broadcast::Sender<NotificationEvent>,
    ttl: Duration,
}

impl NotificationCenter {
    pub fn new(ttl: Duration) -> Self {
        let (tx, _) = broadcast::channel(64);
        Self {
            current: Arc::new(Mutex::new(None)),
            generation: Arc::new(AtomicU64::new(0)),
            tx,
            ttl,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.tx.subscribe()
    }

    pub async fn current(&self) -> Option<Notification> {
        self.current.lock().await.as_ref().map(|(_, n)| n.clone())
    }

    /// Show `notification`, replacing any visible one, and schedule its
    /// dismissal. Must be called from within a tokio runtime.
    pub async fn show(&self, notification: Notification) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(kind = ?notification.kind, "Showing notification: {}", notification.message);

        *self.current.lock().await = Some((generation, notification.clone()));
        let _ = self.tx.send(NotificationEvent::Shown(notification));

        let current = self.current.clone();
        let tx = self.tx.clone();
        let ttl = self.ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let mut slot = current.lock().await;
            if matches!(*slot, Some((g, _)) if g == generation) {
                *slot = None;
                let _ = tx.send(NotificationEvent::Dismissed);
            }
        });
    }

    /// Close the visible notification early.
    pub async fn dismiss(&self) {
        if self.current.lock().await.take().is_some() {
            let _ = self.tx.send(NotificationEvent::Dismissed);
        }
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
