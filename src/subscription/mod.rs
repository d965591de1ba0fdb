//! Realtime feed subscriptions
//!
//! The feeds a viewer needs are derived from the placement, never tracked
//! incrementally. On every placement change the full required set is
//! recomputed and diffed against what is open:
//!
//! ```text
//!   Arc<PlacementState> ──► compute_required_feeds() ──► RequiredFeedSets (next)
//!                                                              │
//!   RequiredFeedSets (open) ─────────────────────────► reconcile() ──► FeedBackend
//!            ▲                                                 │   subscribe / unsubscribe
//!            └──────────────── returned open set ◄─────────────┘
//! ```
//!
//! A key stays subscribed as long as any displayed broadcast needs it, so two
//! broadcasts of the same event share one feed and the feed is dropped only
//! when the last of them leaves.

pub mod backend;
pub mod error;
pub mod feeds;
pub mod manager;

pub use backend::{spawn_feed_pump, ChannelBackend, FeedCommand, FeedLedger};
pub use error::BackendError;
pub use feeds::{compute_required_feeds, FeedKind, RequiredFeedSets};
pub use manager::{reconcile, FeedBackend, SubscriptionManager};
