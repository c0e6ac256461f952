//! Event builders for fluent API.

use crate::events::Event;
use crate::types::Metrics;
use serde_json::Value;

/// Event kinds the builder can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EventKind {
    UserRegistered,
    UserLoggedIn,
    UserPaid,
    SubscriptionChanged,
    FeatureUsed,
    ErrorOccurred,
    MetricRecorded,
    PageviewTracked,
    VisitorTracked,
    SessionTracked,
}

/// Builder for event data.
///
/// Values passed to the facade method itself (an amount, a tier, a count)
/// are pinned and win over properties with the same key. Seeded values
/// are defaults that properties may replace.
#[derive(Debug)]
pub struct EventBuilder {
    kind: EventKind,
    seeded: Metrics,
    properties: Metrics,
    pinned: Metrics,
}

impl EventBuilder {
    pub(crate) fn new(kind: EventKind) -> Self {
        Self {
            kind,
            seeded: Metrics::new(),
            properties: Metrics::new(),
            pinned: Metrics::new(),
        }
    }

    /// Set a value that later properties cannot override.
    pub(crate) fn pin(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.pinned.insert(key.into(), value.into());
        self
    }

    /// Set a default value that later properties may override.
    pub(crate) fn seed(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.seeded.insert(key.into(), value.into());
        self
    }

    /// Add a property.
    pub fn property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Add several properties at once.
    pub fn properties(mut self, extra: Metrics) -> Self {
        self.properties.extend(extra);
        self
    }

    /// Build the event.
    pub(crate) fn build(self) -> Event {
        let mut data = self.seeded;
        data.extend(self.properties);
        data.extend(self.pinned);

        match self.kind {
            EventKind::UserRegistered => Event::UserRegistered(data),
            EventKind::UserLoggedIn => Event::UserLoggedIn(data),
            EventKind::UserPaid => Event::UserPaid(data),
            EventKind::SubscriptionChanged => Event::SubscriptionChanged(data),
            EventKind::FeatureUsed => Event::FeatureUsed(data),
            EventKind::ErrorOccurred => Event::ErrorOccurred(data),
            EventKind::MetricRecorded => Event::MetricRecorded(data),
            EventKind::PageviewTracked => Event::PageviewTracked(data),
            EventKind::VisitorTracked => Event::VisitorTracked(data),
            EventKind::SessionTracked => Event::SessionTracked(data),
        }
    }
}
