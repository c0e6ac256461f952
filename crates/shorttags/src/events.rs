//! Business events and their normalization into flat metrics.

use crate::types::Metrics;
use serde_json::{json, Value};

/// A business event carrying the caller's data.
///
/// Each variant turns into a flat [`Metrics`] map through [`Event::normalize`].
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    UserRegistered(Metrics),
    UserLoggedIn(Metrics),
    UserPaid(Metrics),
    SubscriptionChanged(Metrics),
    FeatureUsed(Metrics),
    ErrorOccurred(Metrics),
    MetricRecorded(Metrics),
    PageviewTracked(Metrics),
    VisitorTracked(Metrics),
    SessionTracked(Metrics),
}

impl Event {
    /// Snake-case name of the event kind.
    pub fn name(&self) -> &'static str {
        match self {
            Event::UserRegistered(_) => "user_registered",
            Event::UserLoggedIn(_) => "user_logged_in",
            Event::UserPaid(_) => "user_paid",
            Event::SubscriptionChanged(_) => "subscription_changed",
            Event::FeatureUsed(_) => "feature_used",
            Event::ErrorOccurred(_) => "error_occurred",
            Event::MetricRecorded(_) => "metric_recorded",
            Event::PageviewTracked(_) => "pageview_tracked",
            Event::VisitorTracked(_) => "visitor_tracked",
            Event::SessionTracked(_) => "session_tracked",
        }
    }

    /// The raw data attached to the event.
    pub fn data(&self) -> &Metrics {
        match self {
            Event::UserRegistered(data)
            | Event::UserLoggedIn(data)
            | Event::UserPaid(data)
            | Event::SubscriptionChanged(data)
            | Event::FeatureUsed(data)
            | Event::ErrorOccurred(data)
            | Event::MetricRecorded(data)
            | Event::PageviewTracked(data)
            | Event::VisitorTracked(data)
            | Event::SessionTracked(data) => data,
        }
    }

    /// Convert the event into the metrics sent to the API.
    ///
    /// Caller data is merged last, so it overrides the generated counters.
    /// Only signups and logins drop non-numeric fields; every other kind
    /// passes its remaining fields through untouched.
    pub fn normalize(self) -> Metrics {
        match self {
            Event::UserRegistered(data) => counted("signups", numeric(data)),
            Event::UserLoggedIn(data) => counted("logins", numeric(data)),
            Event::UserPaid(mut data) => {
                let mut metrics = Metrics::new();
                metrics.insert("payments".into(), json!(1));
                if let Some(amount) = take_present(&mut data, "amount") {
                    metrics.insert("revenue".into(), amount);
                }
                if let Some(mrr) = take_present(&mut data, "mrr") {
                    metrics.insert("mrr".into(), mrr);
                }
                merge(metrics, data)
            }
            Event::SubscriptionChanged(mut data) => {
                let mut metrics = Metrics::new();
                metrics.insert("subscriptions".into(), json!(1));
                if let Some(tier) = take_present(&mut data, "tier") {
                    metrics.insert(format!("tier_{}", label(&tier)), json!(1));
                }
                if let Some(mrr) = take_present(&mut data, "mrr") {
                    metrics.insert("mrr".into(), mrr);
                }
                merge(metrics, data)
            }
            Event::FeatureUsed(mut data) => {
                let feature = take_label(&mut data, "feature");
                counted(&format!("feature_{feature}"), data)
            }
            Event::ErrorOccurred(mut data) => {
                let error_type = take_label(&mut data, "type");
                let mut metrics = Metrics::new();
                metrics.insert("errors".into(), json!(1));
                metrics.insert(format!("error_{error_type}"), json!(1));
                merge(metrics, data)
            }
            Event::MetricRecorded(data) => data,
            Event::PageviewTracked(data) => tallied("pageviews", data),
            Event::VisitorTracked(data) => tallied("visitors", data),
            Event::SessionTracked(data) => tallied("sessions", data),
        }
    }
}

/// `{key: 1}` merged with `data`.
fn counted(key: &str, data: Metrics) -> Metrics {
    let mut metrics = Metrics::new();
    metrics.insert(key.into(), json!(1));
    merge(metrics, data)
}

/// `{key: count}` merged with `data`, where `count` defaults to 1.
fn tallied(key: &str, mut data: Metrics) -> Metrics {
    let count = data.remove("count").unwrap_or_else(|| json!(1));
    let mut metrics = Metrics::new();
    metrics.insert(key.into(), count);
    merge(metrics, data)
}

fn merge(mut base: Metrics, data: Metrics) -> Metrics {
    base.extend(data);
    base
}

fn numeric(data: Metrics) -> Metrics {
    data.into_iter().filter(|(_, v)| v.is_number()).collect()
}

/// Remove `key`, treating `null` and `false` as absent.
fn take_present(data: &mut Metrics, key: &str) -> Option<Value> {
    data.remove(key)
        .filter(|v| !matches!(v, Value::Null | Value::Bool(false)))
}

fn take_label(data: &mut Metrics, key: &str) -> String {
    take_present(data, key)
        .map(|v| label(&v))
        .unwrap_or_else(|| "unknown".into())
}

/// Text used when a value becomes part of a metric name.
pub(crate) fn label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
