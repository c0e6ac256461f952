//! Payload and result types.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// Flat mapping from metric name to value, as sent to the API.
pub type Metrics = Map<String, Value>;

/// Reason reported when tracking is switched off.
pub const TRACKING_DISABLED: &str = "tracking disabled";

/// Outcome of a successful track call.
///
/// Serializes as `{"skipped": true, "reason": ...}` when skipped, and as the
/// response body when delivered.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackResult {
    /// Tracking is disabled; nothing was sent.
    Skipped { reason: String },
    /// The API accepted the metrics; holds its parsed response body.
    Delivered(Value),
}

impl TrackResult {
    pub(crate) fn disabled() -> Self {
        TrackResult::Skipped {
            reason: TRACKING_DISABLED.into(),
        }
    }

    /// True when nothing was sent.
    pub fn is_skipped(&self) -> bool {
        matches!(self, TrackResult::Skipped { .. })
    }

    /// The API response body, if the metrics were delivered.
    pub fn response(&self) -> Option<&Value> {
        match self {
            TrackResult::Delivered(body) => Some(body),
            TrackResult::Skipped { .. } => None,
        }
    }
}

impl Serialize for TrackResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TrackResult::Skipped { reason } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("skipped", &true)?;
                map.serialize_entry("reason", reason)?;
                map.end()
            }
            TrackResult::Delivered(body) => body.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_skipped_serialization() {
        let json = serde_json::to_value(TrackResult::disabled()).unwrap();
        assert_eq!(json, json!({ "skipped": true, "reason": "tracking disabled" }));
    }

    #[test]
    fn test_skipped_carries_only_reason() {
        let result = TrackResult::Skipped {
            reason: "sampling".into(),
        };

        assert!(result.is_skipped());
        assert_eq!(result.response(), None);
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "skipped": true, "reason": "sampling" })
        );
    }

    #[test]
    fn test_delivered_serializes_as_body() {
        let result = TrackResult::Delivered(json!({ "success": true }));

        assert!(!result.is_skipped());
        assert_eq!(result.response(), Some(&json!({ "success": true })));
        assert_eq!(serde_json::to_value(&result).unwrap(), json!({ "success": true }));
    }
}
