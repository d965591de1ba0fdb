//! Feed reconciliation
//!
//! Diffs the required feeds against the open ones and issues the difference
//! to a [`FeedBackend`]. The open set is an explicit value passed in and
//! returned, so a pass can be run and inspected in isolation.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::broadcast::{BroadcastRegistry, EventKey};
use crate::placement::PlacementState;

use super::error::BackendError;
use super::feeds::{compute_required_feeds, FeedKind, RequiredFeedSets};

/// Client of the realtime backend
///
/// Calls are fire-and-forget: an `Ok` means the command was handed off, not
/// that the backend acknowledged it. Subscribing to an open key and
/// unsubscribing a closed one must both be harmless.
pub trait FeedBackend {
    fn subscribe(&self, kind: FeedKind, key: &EventKey) -> Result<(), BackendError>;

    fn unsubscribe(&self, kind: FeedKind, key: &EventKey) -> Result<(), BackendError>;
}

impl<B: FeedBackend + ?Sized> FeedBackend for Arc<B> {
    fn subscribe(&self, kind: FeedKind, key: &EventKey) -> Result<(), BackendError> {
        (**self).subscribe(kind, key)
    }

    fn unsubscribe(&self, kind: FeedKind, key: &EventKey) -> Result<(), BackendError> {
        (**self).unsubscribe(kind, key)
    }
}

/// Bring the backend from `open` to `required`
///
/// For each feed kind, unsubscribes `open - required` and subscribes
/// `required - open`. Returns the set now believed open: a subscribe that
/// failed to dispatch is left out and an unsubscribe that failed is kept, so
/// the next pass issues them again.
pub fn reconcile<B: FeedBackend + ?Sized>(
    open: &RequiredFeedSets,
    required: &RequiredFeedSets,
    backend: &B,
) -> RequiredFeedSets {
    let mut now_open = required.clone();

    for kind in FeedKind::ALL {
        let previous = open.keys(kind);
        let next = required.keys(kind);

        let removed: BTreeSet<&EventKey> = previous.difference(next).collect();
        for key in removed {
            match backend.unsubscribe(kind, key) {
                Ok(()) => {
                    tracing::debug!(kind = ?kind, event_key = %key, "Feed unsubscribed");
                }
                Err(e) => {
                    tracing::warn!(kind = ?kind, event_key = %key, error = %e, "Feed unsubscribe failed");
                    now_open.keys_mut(kind).insert(key.clone());
                }
            }
        }

        let added: BTreeSet<&EventKey> = next.difference(previous).collect();
        for key in added {
            match backend.subscribe(kind, key) {
                Ok(()) => {
                    tracing::debug!(kind = ?kind, event_key = %key, "Feed subscribed");
                }
                Err(e) => {
                    tracing::warn!(kind = ?kind, event_key = %key, error = %e, "Feed subscribe failed");
                    now_open.keys_mut(kind).remove(key);
                }
            }
        }
    }

    now_open
}

/// Keeps the backend's subscriptions in line with successive placements
pub struct SubscriptionManager<B> {
    backend: B,
    open: RequiredFeedSets,
}

impl<B: FeedBackend> SubscriptionManager<B> {
    /// Create a manager with nothing open
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            open: RequiredFeedSets::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Feeds currently believed open
    pub fn open_feeds(&self) -> &RequiredFeedSets {
        &self.open
    }

    /// Recompute the required feeds for `state` and reconcile
    pub fn sync(&mut self, state: &PlacementState, registry: &BroadcastRegistry) {
        let required = compute_required_feeds(state, registry);
        if required == self.open {
            return;
        }

        self.open = reconcile(&self.open, &required, &self.backend);

        tracing::debug!(
            match_feeds = self.open.match_feed_keys.len(),
            live_score_feeds = self.open.live_score_feed_keys.len(),
            "Feeds reconciled"
        );
    }

    /// Forget what is open and subscribe everything `state` needs again
    ///
    /// For use after the backend lost its subscriptions, e.g. a reconnect.
    pub fn resubscribe_all(&mut self, state: &PlacementState, registry: &BroadcastRegistry) {
        self.open = RequiredFeedSets::new();
        self.sync(state, registry);
    }
}
