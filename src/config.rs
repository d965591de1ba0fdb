//! Multiview configuration

use crate::layout::LayoutId;

/// Configuration for a [`crate::Multiview`]
#[derive(Debug, Clone)]
pub struct MultiviewConfig {
    /// Layout selected at startup and when a snapshot names none
    pub default_layout: LayoutId,

    /// Capacity of the feed command channel
    pub feed_channel_capacity: usize,
}

impl Default for MultiviewConfig {
    fn default() -> Self {
        Self {
            default_layout: LayoutId(0),
            feed_channel_capacity: 64,
        }
    }
}

impl MultiviewConfig {
    /// Set the startup layout
    pub fn default_layout(mut self, layout: LayoutId) -> Self {
        self.default_layout = layout;
        self
    }

    /// Set the feed command channel capacity (at least 1)
    pub fn feed_channel_capacity(mut self, capacity: usize) -> Self {
        self.feed_channel_capacity = capacity.max(1);
        self
    }
}
