//! Loading metric series documents from YAML/JSON.
//!
//! A document is a list of series. Points only need `period`, `actual` and
//! `target`; variance fields are derived on load.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::types::MetricTrendSeries;

lazy_static! {
    /// Kebab-case metric id: `net-income`, `prime-cost`, `cogs`
    pub static ref METRIC_ID_PATTERN: Regex = Regex::new(
        r"^[a-z][a-z0-9]*(-[a-z0-9]+)*$"
    ).unwrap();
}

/// Errors that can occur when loading series.
#[derive(Error, Debug)]
pub enum SeriesError {
    #[error("Failed to read series file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid metric id '{0}': expected kebab-case like 'prime-cost'")]
    InvalidMetricId(String),

    #[error("Duplicate metric id: {0}")]
    DuplicateMetricId(String),

    #[error("Metric '{metric}' has a non-finite value in period '{period}'")]
    NonFiniteValue { metric: String, period: String },
}

/// Whether an id is a well-formed metric id.
pub fn is_valid_metric_id(id: &str) -> bool {
    METRIC_ID_PATTERN.is_match(id)
}

/// Parse series from a YAML string.
pub fn from_yaml(yaml: &str) -> Result<Vec<MetricTrendSeries>, SeriesError> {
    let series: Vec<MetricTrendSeries> = serde_yaml::from_str(yaml)?;
    validate(&series)?;
    Ok(series)
}

/// Parse series from a JSON string.
pub fn from_json(json: &str) -> Result<Vec<MetricTrendSeries>, SeriesError> {
    let series: Vec<MetricTrendSeries> = serde_json::from_str(json)?;
    validate(&series)?;
    Ok(series)
}

/// Load a series file; `.json` files parse as JSON, anything else as YAML.
pub fn from_file(path: impl AsRef<Path>) -> Result<Vec<MetricTrendSeries>, SeriesError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => from_json(&contents),
        _ => from_yaml(&contents),
    }
}

/// Check ids are well-formed and unique, and values are finite.
///
/// Empty series are allowed: they mean "no data yet", not an error.
pub fn validate(series: &[MetricTrendSeries]) -> Result<(), SeriesError> {
    let mut seen = HashSet::new();

    for s in series {
        if !is_valid_metric_id(&s.id) {
            return Err(SeriesError::InvalidMetricId(s.id.clone()));
        }
        if !seen.insert(s.id.as_str()) {
            return Err(SeriesError::DuplicateMetricId(s.id.clone()));
        }
        if let Some(point) = s
            .data
            .iter()
            .find(|p| !p.actual.is_finite() || !p.target.is_finite())
        {
            return Err(SeriesError::NonFiniteValue {
                metric: s.id.clone(),
                period: point.period.clone(),
            });
        }
    }

    Ok(())
}
