//! Channel-backed feed backend
//!
//! [`ChannelBackend`] hands commands to a bounded tokio channel without
//! blocking the caller. On the receiving side [`spawn_feed_pump`] drains the
//! channel, filters out commands that change nothing via a [`FeedLedger`] and
//! forwards the rest to the realtime client.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;

use crate::broadcast::EventKey;

use super::error::BackendError;
use super::feeds::{FeedKind, RequiredFeedSets};
use super::manager::FeedBackend;

/// A subscription change for the realtime client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedCommand {
    Subscribe(FeedKind, EventKey),
    Unsubscribe(FeedKind, EventKey),
}

/// Feed backend that queues commands on a tokio channel
#[derive(Debug, Clone)]
pub struct ChannelBackend {
    tx: mpsc::Sender<FeedCommand>,
}

impl ChannelBackend {
    /// Create a backend and the receiver its commands arrive on
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<FeedCommand>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    fn send(&self, command: FeedCommand) -> Result<(), BackendError> {
        self.tx.try_send(command).map_err(|e| match e {
            TrySendError::Full(_) => BackendError::ChannelFull,
            TrySendError::Closed(_) => BackendError::ChannelClosed,
        })
    }
}

impl FeedBackend for ChannelBackend {
    fn subscribe(&self, kind: FeedKind, key: &EventKey) -> Result<(), BackendError> {
        self.send(FeedCommand::Subscribe(kind, key.clone()))
    }

    fn unsubscribe(&self, kind: FeedKind, key: &EventKey) -> Result<(), BackendError> {
        self.send(FeedCommand::Unsubscribe(kind, key.clone()))
    }
}

/// Set of feeds the realtime client actually has open
#[derive(Debug, Clone, Default)]
pub struct FeedLedger {
    open: RequiredFeedSets,
}

impl FeedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self) -> &RequiredFeedSets {
        &self.open
    }

    /// Apply a command
    ///
    /// Returns `false` when the command changes nothing (subscribe to an open
    /// feed, unsubscribe from a closed one).
    pub fn apply(&mut self, command: &FeedCommand) -> bool {
        match command {
            FeedCommand::Subscribe(kind, key) => self.open.keys_mut(*kind).insert(key.clone()),
            FeedCommand::Unsubscribe(kind, key) => self.open.keys_mut(*kind).remove(key),
        }
    }
}

/// Spawn a task that forwards effective feed commands to `sink`
///
/// Runs until every sender is dropped and returns the final ledger.
pub fn spawn_feed_pump<F>(mut rx: mpsc::Receiver<FeedCommand>, mut sink: F) -> JoinHandle<FeedLedger>
where
    F: FnMut(&FeedCommand) + Send + 'static,
{
    tokio::spawn(async move {
        let mut ledger = FeedLedger::new();

        while let Some(command) = rx.recv().await {
            if ledger.apply(&command) {
                sink(&command);
            } else {
                tracing::debug!(command = ?command, "Redundant feed command skipped");
            }
        }

        tracing::debug!(
            match_feeds = ledger.open.match_feed_keys.len(),
            live_score_feeds = ledger.open.live_score_feed_keys.len(),
            "Feed pump stopped"
        );
        ledger
    })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tokio_test::{assert_err, assert_ok};

    use super::*;

    fn key(k: &str) -> EventKey {
        EventKey::new(k)
    }

    #[test]
    fn test_ledger_idempotent() {
        let mut ledger = FeedLedger::new();

        assert!(ledger.apply(&FeedCommand::Subscribe(FeedKind::Match, key("a"))));
        assert!(!ledger.apply(&FeedCommand::Subscribe(FeedKind::Match, key("a"))));
        assert!(ledger.apply(&FeedCommand::Subscribe(FeedKind::LiveScore, key("a"))));
        assert!(ledger.apply(&FeedCommand::Unsubscribe(FeedKind::Match, key("a"))));
        assert!(!ledger.apply(&FeedCommand::Unsubscribe(FeedKind::Match, key("a"))));

        assert!(ledger.open().contains(FeedKind::LiveScore, &key("a")));
        assert!(!ledger.open().contains(FeedKind::Match, &key("a")));
    }

    #[test]
    fn test_channel_full_and_closed() {
        let (backend, rx) = ChannelBackend::new(1);

        assert_ok!(backend.subscribe(FeedKind::Match, &key("a")));
        assert_eq!(
            backend.subscribe(FeedKind::Match, &key("b")),
            Err(BackendError::ChannelFull)
        );

        drop(rx);
        assert_err!(backend.unsubscribe(FeedKind::Match, &key("a")));
        assert_eq!(
            backend.unsubscribe(FeedKind::Match, &key("a")),
            Err(BackendError::ChannelClosed)
        );
    }

    #[tokio::test]
    async fn test_pump_forwards_effective_commands() {
        let (backend, rx) = ChannelBackend::new(16);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = Arc::clone(&seen);

        let pump = spawn_feed_pump(rx, move |command| {
            sink_seen.lock().unwrap().push(command.clone());
        });

        backend.subscribe(FeedKind::Match, &key("a")).unwrap();
        backend.subscribe(FeedKind::Match, &key("a")).unwrap();
        backend.subscribe(FeedKind::LiveScore, &key("a")).unwrap();
        backend.unsubscribe(FeedKind::Match, &key("b")).unwrap();
        backend.unsubscribe(FeedKind::LiveScore, &key("a")).unwrap();
        drop(backend);

        let ledger = pump.await.unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                FeedCommand::Subscribe(FeedKind::Match, key("a")),
                FeedCommand::Subscribe(FeedKind::LiveScore, key("a")),
                FeedCommand::Unsubscribe(FeedKind::LiveScore, key("a")),
            ]
        );
        assert!(ledger.open().contains(FeedKind::Match, &key("a")));
        assert!(ledger.open().live_score_feed_keys.is_empty());
    }
}
