//! Broadcast descriptors and registry
//!
//! Descriptors are supplied by an external source and are read-only to the
//! placement core. Several descriptors may share an event key, for example two
//! camera feeds of the same competition.

use std::collections::HashMap;

/// Opaque, unique broadcast identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BroadcastId(String);

impl BroadcastId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BroadcastId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Competition/event identifier that realtime feeds are keyed by
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventKey(String);

impl EventKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EventKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Embed family the rendering layer mounts for a broadcast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BroadcastKind {
    Youtube,
    Twitch,
    Livestream,
    Dacast,
    Iframe,
    Html5,
    DirectLink,
    Other,
}

/// A broadcast available for placement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastDescriptor {
    pub id: BroadcastId,
    /// Event this broadcast covers; `None` for broadcasts with no live data
    pub event_key: Option<EventKey>,
    pub kind: BroadcastKind,
    /// Channel or video identifier understood by the embed
    pub channel: String,
    pub display_name: String,
}

impl BroadcastDescriptor {
    /// Create a descriptor tied to an event
    pub fn new(
        id: impl Into<String>,
        event_key: impl Into<String>,
        kind: BroadcastKind,
        channel: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            id: BroadcastId::new(id),
            event_key: Some(EventKey::new(event_key)),
            kind,
            channel: channel.into(),
            display_name: display_name.into(),
        }
    }

    /// Create a descriptor not tied to any event
    pub fn standalone(
        id: impl Into<String>,
        kind: BroadcastKind,
        channel: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            id: BroadcastId::new(id),
            event_key: None,
            kind,
            channel: channel.into(),
            display_name: display_name.into(),
        }
    }
}

/// Read-only lookup of broadcast descriptors by id
#[derive(Debug, Clone, Default)]
pub struct BroadcastRegistry {
    broadcasts: HashMap<BroadcastId, BroadcastDescriptor>,
}

impl BroadcastRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a descriptor
    pub fn insert(&mut self, descriptor: BroadcastDescriptor) {
        self.broadcasts.insert(descriptor.id.clone(), descriptor);
    }

    pub fn get(&self, id: &BroadcastId) -> Option<&BroadcastDescriptor> {
        self.broadcasts.get(id)
    }

    pub fn contains(&self, id: &BroadcastId) -> bool {
        self.broadcasts.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.broadcasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.broadcasts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BroadcastDescriptor> {
        self.broadcasts.values()
    }
}

impl FromIterator<BroadcastDescriptor> for BroadcastRegistry {
    fn from_iter<I: IntoIterator<Item = BroadcastDescriptor>>(iter: I) -> Self {
        let mut registry = Self::new();
        for descriptor in iter {
            registry.insert(descriptor);
        }
        registry
    }
}
