//! Multiview controller
//!
//! Owns the current placement and applies user actions to it one at a time.
//! After each action that produced a new placement, the required feeds are
//! recomputed and reconciled exactly once. Backend failures are logged by the
//! subscription manager and never undo a placement change.

use std::sync::Arc;

use crate::broadcast::{BroadcastId, BroadcastRegistry};
use crate::config::MultiviewConfig;
use crate::error::{Error, Result};
use crate::layout::{LayoutCatalog, LayoutId};
use crate::placement::{rendered_cells, PlacementState, PlacementStore, RenderedCell};
use crate::snapshot::PlacementSnapshot;
use crate::subscription::{FeedBackend, RequiredFeedSets, SubscriptionManager};

/// A viewer's grid of broadcasts and the feeds it keeps open
pub struct Multiview<B> {
    config: MultiviewConfig,
    store: PlacementStore,
    registry: BroadcastRegistry,
    state: Arc<PlacementState>,
    feeds: SubscriptionManager<B>,
}

impl<B: FeedBackend> Multiview<B> {
    /// Create an empty multiview on the configured default layout
    pub fn new(
        config: MultiviewConfig,
        catalog: Arc<LayoutCatalog>,
        registry: BroadcastRegistry,
        backend: B,
    ) -> Result<Self> {
        let store = PlacementStore::new(catalog);
        let state = store.initial(config.default_layout)?;

        Ok(Self {
            config,
            store,
            registry,
            state,
            feeds: SubscriptionManager::new(backend),
        })
    }

    pub fn config(&self) -> &MultiviewConfig {
        &self.config
    }

    /// Current placement
    pub fn state(&self) -> &Arc<PlacementState> {
        &self.state
    }

    pub fn registry(&self) -> &BroadcastRegistry {
        &self.registry
    }

    pub fn backend(&self) -> &B {
        self.feeds.backend()
    }

    /// Feeds currently believed open
    pub fn open_feeds(&self) -> &RequiredFeedSets {
        self.feeds.open_feeds()
    }

    /// Occupied cells for the rendering layer
    pub fn rendered_cells(&self) -> Vec<RenderedCell<'_>> {
        rendered_cells(&self.state, self.store.catalog(), &self.registry)
    }

    /// Add a broadcast to the first empty cell
    pub fn add(&mut self, id: &BroadcastId) -> Result<()> {
        self.check_known(id)?;
        let next = self.store.add_auto_place(&self.state, id)?;
        self.commit(next);
        Ok(())
    }

    /// Show a broadcast at a specific cell
    ///
    /// Whatever the cell showed is removed first. A broadcast already shown
    /// elsewhere is moved by swapping cells, keeping its embed.
    pub fn add_at_cell(&mut self, id: &BroadcastId, cell: usize) -> Result<()> {
        self.check_known(id)?;

        let next = match self.state.cell_of(id) {
            Some(current) => self.store.swap_cells(&self.state, current, cell)?,
            None => {
                let vacated = match self.state.broadcast_at_cell(cell) {
                    Some(occupant) => self.store.remove(&self.state, occupant),
                    None => Arc::clone(&self.state),
                };
                self.store.add_at_cell(&vacated, id, cell)?
            }
        };

        self.commit(next);
        Ok(())
    }

    /// Remove a broadcast; absent broadcasts are ignored
    pub fn remove(&mut self, id: &BroadcastId) {
        let next = self.store.remove(&self.state, id);
        self.commit(next);
    }

    pub fn swap_cells(&mut self, cell_a: usize, cell_b: usize) -> Result<()> {
        let next = self.store.swap_cells(&self.state, cell_a, cell_b)?;
        self.commit(next);
        Ok(())
    }

    /// Flip live-score mode at a cell; empty cells are ignored
    pub fn toggle_live_score(&mut self, cell: usize) {
        let next = self.store.toggle_live_score(&self.state, cell);
        self.commit(next);
    }

    pub fn set_layout(&mut self, layout: LayoutId) -> Result<()> {
        let next = self.store.change_layout(&self.state, layout)?;
        self.commit(next);
        Ok(())
    }

    /// Remove every broadcast, keeping the layout
    pub fn clear(&mut self) {
        let next = self.store.clear(&self.state);
        self.commit(next);
    }

    /// Capture the placement for a shareable link
    pub fn snapshot(&self) -> PlacementSnapshot {
        PlacementSnapshot::from_state(&self.state)
    }

    /// Replace the placement with one rebuilt from a snapshot
    pub fn restore(&mut self, snapshot: &PlacementSnapshot) -> Result<()> {
        let next = snapshot.restore(&self.store, &self.registry, self.config.default_layout)?;
        self.commit(next);
        Ok(())
    }

    /// Subscribe everything the placement needs from scratch
    ///
    /// Call after the realtime backend reconnected and lost its feeds.
    pub fn resync(&mut self) {
        self.feeds.resubscribe_all(&self.state, &self.registry);
    }

    fn check_known(&self, id: &BroadcastId) -> Result<()> {
        if self.registry.contains(id) {
            Ok(())
        } else {
            tracing::warn!(broadcast = %id, "Unknown broadcast rejected");
            Err(Error::UnknownBroadcast(id.clone()))
        }
    }

    /// Install a new placement; returns whether it differed
    fn commit(&mut self, next: Arc<PlacementState>) -> bool {
        if Arc::ptr_eq(&self.state, &next) {
            return false;
        }

        self.state = next;
        self.feeds.sync(&self.state, &self.registry);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::{BroadcastDescriptor, BroadcastKind, EventKey};
    use crate::subscription::manager::tests::RecordingBackend;
    use crate::subscription::FeedKind;

    fn multiview() -> Multiview<RecordingBackend> {
        let registry = vec![
            BroadcastDescriptor::new("cmp-1", "2024cmptx", BroadcastKind::Twitch, "firstinspires1", "Champs 1"),
            BroadcastDescriptor::new("cmp-2", "2024cmptx", BroadcastKind::Twitch, "firstinspires2", "Champs 2"),
            BroadcastDescriptor::new("isr", "2024isde1", BroadcastKind::Youtube, "x9", "Israel"),
            BroadcastDescriptor::standalone("studio", BroadcastKind::Html5, "stream", "Studio"),
        ]
        .into_iter()
        .collect();

        Multiview::new(
            MultiviewConfig::default().default_layout(LayoutId(3)),
            Arc::new(LayoutCatalog::default()),
            registry,
            RecordingBackend::default(),
        )
        .unwrap()
    }

    fn id(name: &str) -> BroadcastId {
        BroadcastId::new(name)
    }

    fn sub(kind: FeedKind, key: &str) -> (&'static str, FeedKind, EventKey) {
        ("subscribe", kind, EventKey::new(key))
    }

    fn unsub(kind: FeedKind, key: &str) -> (&'static str, FeedKind, EventKey) {
        ("unsubscribe", kind, EventKey::new(key))
    }

    #[test]
    fn test_new_unknown_layout() {
        let result = Multiview::new(
            MultiviewConfig::default().default_layout(LayoutId(42)),
            Arc::new(LayoutCatalog::default()),
            BroadcastRegistry::new(),
            RecordingBackend::default(),
        );

        assert!(matches!(result, Err(Error::LayoutNotFound(LayoutId(42)))));
    }

    #[test]
    fn test_shared_feed_unsubscribed_after_last() {
        let mut mv = multiview();

        mv.add(&id("cmp-1")).unwrap();
        assert_eq!(mv.backend().take_calls(), vec![sub(FeedKind::Match, "2024cmptx")]);

        mv.add(&id("cmp-2")).unwrap();
        assert!(mv.backend().take_calls().is_empty());

        mv.remove(&id("cmp-1"));
        assert!(mv.backend().take_calls().is_empty());

        mv.remove(&id("cmp-2"));
        assert_eq!(mv.backend().take_calls(), vec![unsub(FeedKind::Match, "2024cmptx")]);
        assert!(mv.open_feeds().is_empty());
    }

    #[test]
    fn test_live_score_feed_lifecycle() {
        let mut mv = multiview();
        mv.add(&id("isr")).unwrap();
        mv.backend().take_calls();

        mv.toggle_live_score(0);
        assert_eq!(mv.backend().take_calls(), vec![sub(FeedKind::LiveScore, "2024isde1")]);

        mv.swap_cells(0, 3).unwrap();
        assert!(mv.backend().take_calls().is_empty());
        assert!(mv.state().live_score_at_cell(3));

        mv.remove(&id("isr"));
        assert_eq!(
            mv.backend().take_calls(),
            vec![
                unsub(FeedKind::Match, "2024isde1"),
                unsub(FeedKind::LiveScore, "2024isde1"),
            ]
        );
    }

    #[test]
    fn test_noop_actions_keep_state() {
        let mut mv = multiview();
        mv.add(&id("cmp-1")).unwrap();
        let before = Arc::clone(mv.state());

        mv.remove(&id("isr"));
        mv.toggle_live_score(2);
        mv.add(&id("cmp-1")).unwrap();
        mv.set_layout(LayoutId(3)).unwrap();

        assert!(Arc::ptr_eq(&before, mv.state()));
    }

    #[test]
    fn test_unknown_broadcast_rejected() {
        let mut mv = multiview();

        assert_eq!(mv.add(&id("ghost")), Err(Error::UnknownBroadcast(id("ghost"))));
        assert!(mv.state().is_empty());
    }

    #[test]
    fn test_add_at_cell_replaces_occupant() {
        let mut mv = multiview();
        mv.add_at_cell(&id("cmp-1"), 1).unwrap();
        mv.backend().take_calls();

        mv.add_at_cell(&id("isr"), 1).unwrap();

        assert_eq!(mv.state().broadcast_at_cell(1), Some(&id("isr")));
        assert!(!mv.state().is_displayed(&id("cmp-1")));
        assert_eq!(
            mv.backend().take_calls(),
            vec![unsub(FeedKind::Match, "2024cmptx"), sub(FeedKind::Match, "2024isde1")]
        );
        mv.state().assert_invariants();
    }

    #[test]
    fn test_add_at_cell_same_event_no_churn() {
        let mut mv = multiview();
        mv.add_at_cell(&id("cmp-1"), 0).unwrap();
        mv.backend().take_calls();

        mv.add_at_cell(&id("cmp-2"), 0).unwrap();

        assert!(mv.backend().take_calls().is_empty());
    }

    #[test]
    fn test_add_at_cell_moves_displayed_broadcast() {
        let mut mv = multiview();
        mv.add(&id("cmp-1")).unwrap();
        mv.add(&id("isr")).unwrap();
        let slot = mv.state().slot_of(&id("isr"));

        mv.add_at_cell(&id("isr"), 3).unwrap();

        assert_eq!(mv.state().cell_of(&id("isr")), Some(3));
        assert_eq!(mv.state().slot_of(&id("isr")), slot);
        assert_eq!(mv.state().broadcast_at_cell(1), None);
    }

    #[test]
    fn test_capacity_error_leaves_state() {
        let mut mv = multiview();
        mv.set_layout(LayoutId(0)).unwrap();
        mv.add(&id("cmp-1")).unwrap();
        let before = Arc::clone(mv.state());

        assert!(matches!(mv.add(&id("isr")), Err(Error::CapacityExceeded { .. })));
        assert!(Arc::ptr_eq(&before, mv.state()));
    }

    #[test]
    fn test_shrink_drops_feeds_of_evicted() {
        let mut mv = multiview();
        mv.add(&id("cmp-1")).unwrap();
        mv.add(&id("isr")).unwrap();
        mv.toggle_live_score(1);
        mv.backend().take_calls();

        mv.set_layout(LayoutId(0)).unwrap();

        assert_eq!(mv.state().displayed_order(), &[id("cmp-1")]);
        assert_eq!(
            mv.backend().take_calls(),
            vec![
                unsub(FeedKind::Match, "2024isde1"),
                unsub(FeedKind::LiveScore, "2024isde1"),
            ]
        );
    }

    #[test]
    fn test_clear_and_restore() {
        let mut mv = multiview();
        mv.add(&id("cmp-1")).unwrap();
        mv.add(&id("studio")).unwrap();
        mv.toggle_live_score(0);
        let snapshot = mv.snapshot();

        mv.clear();
        assert!(mv.state().is_empty());
        assert!(mv.open_feeds().is_empty());
        mv.backend().take_calls();

        mv.restore(&snapshot).unwrap();

        assert_eq!(mv.state().broadcast_at_cell(1), Some(&id("studio")));
        assert!(mv.state().live_score_at_cell(0));
        assert_eq!(
            mv.backend().take_calls(),
            vec![sub(FeedKind::Match, "2024cmptx"), sub(FeedKind::LiveScore, "2024cmptx")]
        );
    }

    #[test]
    fn test_resync_resubscribes() {
        let mut mv = multiview();
        mv.add(&id("cmp-1")).unwrap();
        mv.backend().take_calls();

        mv.resync();

        assert_eq!(mv.backend().take_calls(), vec![sub(FeedKind::Match, "2024cmptx")]);
    }

    #[test]
    fn test_backend_failure_does_not_block_placement() {
        let mut mv = multiview();
        mv.backend().failing.borrow_mut().insert(EventKey::new("2024isde1"));

        mv.add(&id("isr")).unwrap();
        assert!(mv.state().is_displayed(&id("isr")));
        assert!(mv.open_feeds().is_empty());

        mv.backend().failing.borrow_mut().clear();
        mv.add(&id("studio")).unwrap();

        // The next change retries the missing feed
        assert_eq!(mv.backend().take_calls(), vec![sub(FeedKind::Match, "2024isde1")]);
    }

    #[test]
    fn test_rendered_cells() {
        let mut mv = multiview();
        mv.add(&id("cmp-1")).unwrap();
        mv.add(&id("isr")).unwrap();
        mv.swap_cells(0, 1).unwrap();

        let cells = mv.rendered_cells();

        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].descriptor.id, id("cmp-1"));
        assert_eq!(cells[0].cell, 1);
    }
}
