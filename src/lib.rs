//! Placement and feed-subscription core for a multi-stream broadcast grid
//!
//! A viewer arranges several live broadcasts in a grid and can switch any
//! cell to a live-score overlay. This crate decides which broadcast goes
//! where and which realtime feeds must be open, without ever forcing a
//! playing embed to remount.
//!
//! # Architecture
//!
//! ```text
//!   user action
//!        │
//!        ▼
//!   PlacementStore ──► Arc<PlacementState> ──► rendered_cells() ──► renderer
//!   (pure transitions)          │                                  (one embed per slot)
//!                               ▼
//!                     SubscriptionManager
//!                   compute + reconcile feeds
//!                               │
//!                               ▼
//!                          FeedBackend ──► ChannelBackend ──► feed pump ──► realtime client
//! ```
//!
//! [`Multiview`] ties these together for a single viewer.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use multiview::broadcast::{BroadcastDescriptor, BroadcastId, BroadcastKind};
//! use multiview::layout::{LayoutCatalog, LayoutId};
//! use multiview::subscription::ChannelBackend;
//! use multiview::{Multiview, MultiviewConfig};
//!
//! # fn main() -> multiview::error::Result<()> {
//! let registry = vec![BroadcastDescriptor::new(
//!     "champs-1",
//!     "2024cmptx",
//!     BroadcastKind::Twitch,
//!     "firstinspires",
//!     "Championship",
//! )]
//! .into_iter()
//! .collect();
//!
//! let config = MultiviewConfig::default().default_layout(LayoutId(3));
//! let (backend, _feed_rx) = ChannelBackend::new(config.feed_channel_capacity);
//! let mut multiview = Multiview::new(config, Arc::new(LayoutCatalog::default()), registry, backend)?;
//!
//! multiview.add(&BroadcastId::new("champs-1"))?;
//! multiview.toggle_live_score(0);
//! assert_eq!(multiview.rendered_cells().len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod broadcast;
pub mod config;
pub mod error;
pub mod layout;
pub mod multiview;
pub mod placement;
pub mod snapshot;
pub mod subscription;

pub use config::MultiviewConfig;
pub use error::{Error, Result};
pub use multiview::Multiview;
pub use placement::{PlacementState, PlacementStore, MAX_SLOTS};
pub use snapshot::PlacementSnapshot;
