//! Shorttags client implementation.

use crate::builders::{EventBuilder, EventKind};
use crate::config::{Config, ShorttagsBuilder};
use crate::transport::HttpTransport;
use crate::types::{Metrics, TrackResult};
use crate::Error;
use serde_json::Value;
use tracing::instrument;

/// Shorttags metrics client.
///
/// Holds the configuration and an HTTP transport. Every call sends one
/// request and nothing is retried. The client can be shared
/// across tasks behind an `Arc`.
///
/// # Example
///
/// ```rust,no_run
/// use shorttags::Shorttags;
///
/// #[tokio::main]
/// async fn main() -> Result<(), shorttags::Error> {
///     let client = Shorttags::builder("api_key", "my-site").build()?;
///
///     client.signup().send().await?;
///
///     client.payment(99.0)
///         .property("mrr", 99.0)
///         .property("plan", "pro")
///         .send()
///         .await?;
///
///     client.pageview().property("path", "/pricing").send().await?;
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Shorttags {
    config: Config,
    transport: HttpTransport,
}

impl Shorttags {
    /// Create a new builder with the given credentials.
    pub fn builder(api_key: impl Into<String>, site_id: impl Into<String>) -> ShorttagsBuilder {
        ShorttagsBuilder::new(api_key, site_id)
    }

    /// Create a client configured from `SHORTTAGS_*` environment variables.
    pub fn from_env() -> Result<Self, Error> {
        ShorttagsBuilder::from_env().build()
    }

    /// Create a new client from config.
    pub fn new(config: Config) -> Result<Self, Error> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self { config, transport })
    }

    /// Get the client configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    // ============================================
    // RAW METRICS
    // ============================================

    /// Send a raw metrics map without normalization.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use shorttags::Shorttags;
    /// # use serde_json::json;
    /// # async fn example(client: &Shorttags) -> Result<(), shorttags::Error> {
    /// let metrics = json!({ "page_views": 1, "unique_visitors": 1 });
    /// client.track(metrics.as_object().cloned().unwrap_or_default()).await?;
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self, metrics))]
    pub async fn track(&self, metrics: Metrics) -> Result<TrackResult, Error> {
        self.transport.send(&self.config, &metrics).await
    }

    // ============================================
    // USER EVENTS
    // ============================================

    /// Track a user signup.
    pub fn signup(&self) -> SendableEvent<'_> {
        self.sendable(EventBuilder::new(EventKind::UserRegistered))
    }

    /// Track a user login.
    pub fn login(&self) -> SendableEvent<'_> {
        self.sendable(EventBuilder::new(EventKind::UserLoggedIn))
    }

    /// Track a payment; `amount` is reported as `revenue`.
    pub fn payment(&self, amount: f64) -> SendableEvent<'_> {
        self.sendable(EventBuilder::new(EventKind::UserPaid).pin("amount", amount))
    }

    /// Track a move to a subscription tier.
    pub fn subscription(&self, tier: impl Into<String>) -> SendableEvent<'_> {
        self.sendable(EventBuilder::new(EventKind::SubscriptionChanged).pin("tier", tier.into()))
    }

    /// Track usage of a feature.
    pub fn feature_used(&self, feature: impl Into<String>) -> SendableEvent<'_> {
        self.sendable(EventBuilder::new(EventKind::FeatureUsed).pin("feature", feature.into()))
    }

    /// Track an error of the given category.
    pub fn error(&self, error_type: impl Into<String>) -> SendableEvent<'_> {
        self.sendable(EventBuilder::new(EventKind::ErrorOccurred).pin("type", error_type.into()))
    }

    /// Track one occurrence of the custom metric `name`.
    pub fn event(&self, name: impl Into<String>) -> SendableEvent<'_> {
        self.event_with_value(name, 1)
    }

    /// Track a custom metric `name` with `value`.
    ///
    /// Properties are sent alongside, and may replace the seeded value.
    pub fn event_with_value(
        &self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> SendableEvent<'_> {
        self.sendable(EventBuilder::new(EventKind::MetricRecorded).seed(name, value))
    }

    // ============================================
    // TRAFFIC
    // ============================================

    /// Track a single pageview.
    pub fn pageview(&self) -> SendableEvent<'_> {
        self.pageviews(1)
    }

    /// Track `count` pageviews.
    pub fn pageviews(&self, count: u64) -> SendableEvent<'_> {
        self.sendable(EventBuilder::new(EventKind::PageviewTracked).pin("count", count))
    }

    /// Track a single visitor.
    pub fn visitor(&self) -> SendableEvent<'_> {
        self.visitors(1)
    }

    /// Track `count` visitors.
    pub fn visitors(&self, count: u64) -> SendableEvent<'_> {
        self.sendable(EventBuilder::new(EventKind::VisitorTracked).pin("count", count))
    }

    /// Track a single session.
    pub fn session(&self) -> SendableEvent<'_> {
        self.sessions(1)
    }

    /// Track `count` sessions.
    pub fn sessions(&self, count: u64) -> SendableEvent<'_> {
        self.sendable(EventBuilder::new(EventKind::SessionTracked).pin("count", count))
    }

    fn sendable(&self, builder: EventBuilder) -> SendableEvent<'_> {
        SendableEvent {
            builder,
            client: self,
        }
    }
}

impl ShorttagsBuilder {
    /// Build the Shorttags client.
    pub fn build(self) -> Result<Shorttags, Error> {
        Shorttags::new(self.build_config())
    }
}

/// Sendable event builder.
pub struct SendableEvent<'a> {
    builder: EventBuilder,
    client: &'a Shorttags,
}

impl<'a> SendableEvent<'a> {
    /// Add a property.
    pub fn property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.builder = self.builder.property(key, value);
        self
    }

    /// Add several properties at once.
    pub fn properties(mut self, extra: Metrics) -> Self {
        self.builder = self.builder.properties(extra);
        self
    }

    /// Normalize the event and send it.
    pub async fn send(self) -> Result<TrackResult, Error> {
        let event = self.builder.build();
        send_event(self.client, event.name(), event.normalize()).await
    }
}

#[instrument(skip(client, name, metrics), fields(event = name))]
async fn send_event(
    client: &Shorttags,
    name: &'static str,
    metrics: Metrics,
) -> Result<TrackResult, Error> {
    client.transport.send(&client.config, &metrics).await
}
