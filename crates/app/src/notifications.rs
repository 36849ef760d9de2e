//! Push notifications
//!
//! A branch receives short text messages whenever one of its orders changes.
//! Bursts of messages are collapsed into a single refresh request, and every
//! refresh carries a ticket so a slow, older response can never overwrite a
//! newer one.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use futures::{Stream, StreamExt};
use tokio::{sync::mpsc, time::timeout};
use tracing::debug;

/// Orders refreshes so only the newest response is applied.
#[derive(Debug, Default)]
pub struct RefreshSequencer {
    issued: AtomicU64,
    applied: AtomicU64,
}

/// Sequence number handed out when a refresh starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

impl RefreshSequencer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp a refresh that is about to start.
    pub fn issue(&self) -> RefreshTicket {
        RefreshTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether the response for `ticket` may be applied.
    ///
    /// Returns `false` when a newer refresh has already been applied.
    pub fn accept(&self, ticket: RefreshTicket) -> bool {
        self.applied.fetch_max(ticket.0, Ordering::SeqCst) < ticket.0
    }
}

/// A batch of push messages that should trigger one refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshRequest {
    pub messages: Vec<String>,
}

/// Collapse bursts of messages into refresh requests.
///
/// A request is sent once no new message has arrived for `window`. Returns
/// when the message stream ends or the receiver is dropped.
pub async fn debounce<S>(messages: S, window: Duration, requests: mpsc::Sender<RefreshRequest>)
where
    S: Stream<Item = String>,
{
    let mut messages = std::pin::pin!(messages);

    while let Some(first) = messages.next().await {
        let mut batch = vec![first];
        let mut ended = false;

        loop {
            match timeout(window, messages.next()).await {
                Ok(Some(message)) => batch.push(message),
                Ok(None) => {
                    ended = true;
                    break;
                }
                Err(_quiet) => break,
            }
        }

        debug!(messages = batch.len(), "push burst settled");

        if requests
            .send(RefreshRequest { messages: batch })
            .await
            .is_err()
            || ended
        {
            return;
        }
    }
}
