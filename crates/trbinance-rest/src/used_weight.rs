//! Passive usage-weight tracking
//!
//! Every response from the exchange may carry `X-MBX-USED-*` headers
//! reporting rate-limit consumption per timeframe. The tracker records the
//! most recently observed value for each timeframe as a side effect of
//! response handling — advisory bookkeeping for client-side throttling
//! decisions, not an enforcement mechanism. It never blocks or delays a
//! request, and values have no expiry: the map always reflects the last
//! response seen.

use parking_lot::Mutex;
use reqwest::header::HeaderMap;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// Header-name fragment identifying a usage-weight header
const USED_WEIGHT_MARKER: &str = "x-mbx-used-";

/// Timeframe label the exchange uses for the generic weight counter
const GENERIC_WEIGHT_LABEL: &str = "weight";

/// Label the generic counter is recorded under
const TOTAL_LABEL: &str = "total";

/// Most recently observed rate-limit usage, per timeframe label
///
/// Cloning shares the underlying map, so every clone of a client observes
/// the same values. Updates are serialized by a single mutex; that is the
/// only locking the client needs for concurrent response handling.
#[derive(Debug, Clone, Default)]
pub struct UsedWeightTracker {
    inner: Arc<Mutex<HashMap<String, f64>>>,
}

impl UsedWeightTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Record usage headers from one response, overwriting prior values
    ///
    /// Non-matching headers and unparsable values are ignored; the generic
    /// `...-used-weight` header is recorded under the `total` label.
    pub fn record(&self, headers: &HeaderMap) {
        let mut observed: Vec<(String, f64)> = Vec::new();

        for (name, value) in headers {
            let name = name.as_str().to_ascii_lowercase();
            if !name.contains(USED_WEIGHT_MARKER) {
                continue;
            }

            let Some(label) = name.rsplit('-').next() else {
                continue;
            };
            let label = if label == GENERIC_WEIGHT_LABEL {
                TOTAL_LABEL
            } else {
                label
            };

            if let Some(weight) = value.to_str().ok().and_then(|v| v.parse::<f64>().ok()) {
                observed.push((label.to_string(), weight));
            }
        }

        if observed.is_empty() {
            return;
        }

        let mut map = self.inner.lock();
        for (label, weight) in observed {
            trace!(timeframe = %label, weight, "recorded usage weight");
            map.insert(label, weight);
        }
    }

    /// The last observed value for a timeframe label
    pub fn get(&self, timeframe: &str) -> Option<f64> {
        self.inner.lock().get(timeframe).copied()
    }

    /// A copy of the whole timeframe map
    pub fn snapshot(&self) -> HashMap<String, f64> {
        self.inner.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderName, HeaderValue};

    fn headers(entries: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in entries {
            map.insert(
                HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn test_generic_weight_renamed_to_total() {
        let tracker = UsedWeightTracker::new();
        tracker.record(&headers(&[("x-mbx-used-weight", "12")]));

        assert_eq!(tracker.get("total"), Some(12.0));
        assert_eq!(tracker.get("weight"), None);
    }

    #[test]
    fn test_timeframe_labels_and_overwrite() {
        let tracker = UsedWeightTracker::new();
        tracker.record(&headers(&[
            ("x-mbx-used-weight-1m", "40"),
            ("x-mbx-used-weight", "40"),
        ]));
        tracker.record(&headers(&[("x-mbx-used-weight-1m", "55")]));

        assert_eq!(tracker.get("1m"), Some(55.0));
        assert_eq!(tracker.get("total"), Some(40.0));
        assert_eq!(tracker.snapshot().len(), 2);
    }

    #[test]
    fn test_unrelated_headers_ignored() {
        let tracker = UsedWeightTracker::new();
        tracker.record(&headers(&[
            ("content-type", "application/json"),
            ("x-mbx-used-weight-1m", "not-a-number"),
        ]));

        assert!(tracker.snapshot().is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let tracker = UsedWeightTracker::new();
        let clone = tracker.clone();
        tracker.record(&headers(&[("x-mbx-used-weight-1h", "7")]));

        assert_eq!(clone.get("1h"), Some(7.0));
    }
}
