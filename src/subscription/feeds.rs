//! Required feed derivation

use std::collections::BTreeSet;

use crate::broadcast::{BroadcastRegistry, EventKey};
use crate::placement::PlacementState;

/// Granularity of a realtime feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeedKind {
    /// Match-state updates, needed for every displayed broadcast
    Match,
    /// Live-score overlay, needed only where live-score mode is on
    LiveScore,
}

impl FeedKind {
    pub const ALL: [FeedKind; 2] = [FeedKind::Match, FeedKind::LiveScore];
}

/// Event keys whose feeds must be open, per feed kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredFeedSets {
    pub match_feed_keys: BTreeSet<EventKey>,
    pub live_score_feed_keys: BTreeSet<EventKey>,
}

impl RequiredFeedSets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys of one feed kind
    pub fn keys(&self, kind: FeedKind) -> &BTreeSet<EventKey> {
        match kind {
            FeedKind::Match => &self.match_feed_keys,
            FeedKind::LiveScore => &self.live_score_feed_keys,
        }
    }

    pub(crate) fn keys_mut(&mut self, kind: FeedKind) -> &mut BTreeSet<EventKey> {
        match kind {
            FeedKind::Match => &mut self.match_feed_keys,
            FeedKind::LiveScore => &mut self.live_score_feed_keys,
        }
    }

    pub fn contains(&self, kind: FeedKind, key: &EventKey) -> bool {
        self.keys(kind).contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.match_feed_keys.is_empty() && self.live_score_feed_keys.is_empty()
    }
}

/// Derive the feeds a placement needs
///
/// Every displayed broadcast needs its event's match feed; those whose slot
/// has live-score mode on also need the live-score feed. Broadcasts without
/// an event key, or missing from the registry, need nothing.
pub fn compute_required_feeds(
    state: &PlacementState,
    registry: &BroadcastRegistry,
) -> RequiredFeedSets {
    let mut required = RequiredFeedSets::new();

    for id in state.displayed_order() {
        let Some(descriptor) = registry.get(id) else {
            tracing::warn!(broadcast = %id, "Displayed broadcast not in registry");
            continue;
        };
        let Some(key) = descriptor.event_key.as_ref() else {
            continue;
        };

        required.match_feed_keys.insert(key.clone());

        let live_score = state
            .slot_of(id)
            .map(|slot| state.live_score_on(slot))
            .unwrap_or(false);
        if live_score {
            required.live_score_feed_keys.insert(key.clone());
        }
    }

    required
}
