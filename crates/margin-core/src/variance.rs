//! Variance classifier.
//!
//! Buckets an actual-vs-target variance into one of three status classes:
//! 1. `ON_TRACK`: at or better than target
//! 2. `MONITOR`: worse than target, within the monitor band
//! 3. `NEEDS_ATTENTION`: worse than target, beyond the monitor band
//!
//! "Better" depends on direction: for inverse metrics (labor %, COGS %)
//! a negative variance is good.

use serde::{Deserialize, Serialize};

use crate::types::variance_pct;

/// Default width of the monitor band, in percentage points.
pub const DEFAULT_MONITOR_BAND: f64 = 5.0;

/// Status class of a classified variance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VarianceStatus {
    OnTrack,
    Monitor,
    NeedsAttention,
}

impl VarianceStatus {
    pub fn label(&self) -> &'static str {
        match self {
            VarianceStatus::OnTrack => "On Track",
            VarianceStatus::Monitor => "Monitor",
            VarianceStatus::NeedsAttention => "Needs Attention",
        }
    }

    pub fn is_on_track(&self) -> bool {
        matches!(self, VarianceStatus::OnTrack)
    }
}

/// Band policy for the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VarianceBands {
    /// Worst-direction variance (in points) still classified as `MONITOR`
    #[serde(default = "default_monitor_band")]
    pub monitor_band: f64,
}

fn default_monitor_band() -> f64 {
    DEFAULT_MONITOR_BAND
}

impl Default for VarianceBands {
    fn default() -> Self {
        Self {
            monitor_band: DEFAULT_MONITOR_BAND,
        }
    }
}

/// Result of classifying one actual/target pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub variance_pct: f64,
    pub status: VarianceStatus,
}

/// Classify with the default five-point band.
pub fn classify(actual: f64, target: f64, inverse: bool) -> Classification {
    classify_with(actual, target, inverse, &VarianceBands::default())
}

/// Classify with explicit bands.
pub fn classify_with(actual: f64, target: f64, inverse: bool, bands: &VarianceBands) -> Classification {
    let pct = variance_pct(actual, target);
    Classification {
        variance_pct: pct,
        status: status_for(pct, inverse, bands),
    }
}

/// Status for an already computed variance percentage.
///
/// A NaN variance cannot be placed on either side of target and is
/// reported as `Monitor`.
pub fn status_for(variance_pct: f64, inverse: bool, bands: &VarianceBands) -> VarianceStatus {
    if variance_pct.is_nan() {
        return VarianceStatus::Monitor;
    }

    // Flip inverse metrics so "shortfall" is always negative.
    let shortfall = if inverse { -variance_pct } else { variance_pct };

    if shortfall >= 0.0 {
        VarianceStatus::OnTrack
    } else if shortfall >= -bands.monitor_band {
        VarianceStatus::Monitor
    } else {
        VarianceStatus::NeedsAttention
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_higher_is_better_bands() {
        assert_eq!(classify(100.0, 100.0, false).status, VarianceStatus::OnTrack);
        assert_eq!(classify(110.0, 100.0, false).status, VarianceStatus::OnTrack);
        assert_eq!(classify(97.0, 100.0, false).status, VarianceStatus::Monitor);
        assert_eq!(classify(96.0, 100.0, false).status, VarianceStatus::Monitor);
        assert_eq!(classify(94.0, 100.0, false).status, VarianceStatus::NeedsAttention);
    }

    #[test]
    fn test_lower_is_better_bands() {
        assert_eq!(classify(90.0, 100.0, true).status, VarianceStatus::OnTrack);
        assert_eq!(classify(103.0, 100.0, true).status, VarianceStatus::Monitor);
        assert_eq!(classify(104.5, 100.0, true).status, VarianceStatus::Monitor);
        assert_eq!(classify(106.0, 100.0, true).status, VarianceStatus::NeedsAttention);
    }

    #[test]
    fn test_zero_target_is_on_track() {
        let result = classify(50.0, 0.0, false);
        assert_eq!(result.variance_pct, 0.0);
        assert_eq!(result.status, VarianceStatus::OnTrack);
    }

    #[test]
    fn test_custom_band() {
        let bands = VarianceBands { monitor_band: 10.0 };
        assert_eq!(
            classify_with(92.0, 100.0, false, &bands).status,
            VarianceStatus::Monitor
        );
        assert_eq!(
            classify_with(92.0, 100.0, false, &VarianceBands::default()).status,
            VarianceStatus::NeedsAttention
        );
    }

    #[test]
    fn test_cogs_scenario() {
        let result = classify(31.0, 24.0, true);
        assert!((result.variance_pct - 29.1666).abs() < 0.01);
        assert_eq!(result.status, VarianceStatus::NeedsAttention);
    }

    #[test]
    fn test_nan_is_monitor_not_attention() {
        assert_eq!(classify(f64::NAN, 10.0, false).status, VarianceStatus::Monitor);
        assert_eq!(classify(f64::NAN, 10.0, true).status, VarianceStatus::Monitor);
        assert_eq!(classify(12.0, f64::NAN, false).status, VarianceStatus::Monitor);
    }

    #[test]
    fn test_status_serializes_screaming_snake() {
        let json = serde_json::to_string(&VarianceStatus::NeedsAttention).unwrap();
        assert_eq!(json, "\"NEEDS_ATTENTION\"");
    }
}
