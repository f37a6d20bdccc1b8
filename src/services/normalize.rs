//! Observation normalization.
//!
//! Raw probe output is shell listing text full of noise that varies
//! between members (mount options, timestamps, ordering). Comparison
//! only cares about which marker files each member sees, so the
//! normalizer reduces raw text to a sorted marker token list. The
//! heuristic is pluggable; the comparison algorithm never changes.

use crate::domain::models::ProbeConfig;

/// Reduces raw probe text to an ordered token list for comparison.
pub trait ObservationNormalizer: Send + Sync {
    fn normalize(&self, raw: &str) -> Vec<String>;
}

/// Default normalizer: keep the last whitespace token of every line
/// that contains the marker substring, after dropping blank lines,
/// lines matching an ignore substring, and `.`/`..` listing artifacts.
/// The surviving tokens are sorted lexically.
#[derive(Debug, Clone)]
pub struct MarkerNormalizer {
    marker: String,
    ignore_substrings: Vec<String>,
}

impl MarkerNormalizer {
    pub fn new(marker: impl Into<String>, ignore_substrings: Vec<String>) -> Self {
        Self {
            marker: marker.into(),
            ignore_substrings,
        }
    }

    pub fn from_probe_config(probe: &ProbeConfig) -> Self {
        Self::new(probe.marker_prefix.clone(), probe.ignore_substrings.clone())
    }
}

impl ObservationNormalizer for MarkerNormalizer {
    fn normalize(&self, raw: &str) -> Vec<String> {
        let mut tokens: Vec<String> = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter(|line| !self.ignore_substrings.iter().any(|p| line.contains(p.as_str())))
            .filter_map(|line| line.split_whitespace().last())
            .filter(|token| *token != "." && *token != "..")
            .filter(|token| token.contains(self.marker.as_str()))
            .map(ToString::to_string)
            .collect();
        tokens.sort_unstable();
        tokens
    }
}
