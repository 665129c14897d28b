//! Configuration types for the segmentation pipeline.

use serde::{Deserialize, Serialize};

use crate::error::SegmenterError;
use crate::{
    DEFAULT_BREAKPOINT_PERCENTILE, DEFAULT_CAPTION_SCAN_WINDOW, DEFAULT_HEADING_DEPTH,
    DEFAULT_LIST_INLINE_MAX, DEFAULT_LIST_PART_MAX, DEFAULT_MIN_CHUNK_CHARS,
    DEFAULT_NEIGHBOR_CAP, DEFAULT_WINDOW_RADIUS,
};

/// Tunable parameters for a pipeline pass.
///
/// Invalid values are rejected at construction time via [`PipelineConfig::validated`],
/// never at per-document runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Percentile of the adjacent-sentence distance distribution above which
    /// a chunk boundary is inserted (0 < p <= 100)
    pub breakpoint_percentile: f64,

    /// Number of neighboring sentences on each side included in the
    /// combined embedding window
    pub window_radius: usize,

    /// Heading depth assumed when a Title carries none
    pub default_heading_depth: u8,

    /// Bullet lists whose joined text is shorter than this are emitted
    /// as a single unlabeled node
    pub list_inline_max: usize,

    /// Character budget per labeled list part when bin-packing long lists
    pub list_part_max: usize,

    /// How many preceding elements to scan backwards for a table caption
    pub caption_scan_window: usize,

    /// Neighbor texts longer than this are excluded from window context
    pub neighbor_cap: usize,

    /// Chunks shorter than this are dropped from the final sequence
    pub min_chunk_chars: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            breakpoint_percentile: DEFAULT_BREAKPOINT_PERCENTILE,
            window_radius: DEFAULT_WINDOW_RADIUS,
            default_heading_depth: DEFAULT_HEADING_DEPTH,
            list_inline_max: DEFAULT_LIST_INLINE_MAX,
            list_part_max: DEFAULT_LIST_PART_MAX,
            caption_scan_window: DEFAULT_CAPTION_SCAN_WINDOW,
            neighbor_cap: DEFAULT_NEIGHBOR_CAP,
            min_chunk_chars: DEFAULT_MIN_CHUNK_CHARS,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            breakpoint_percentile: std::env::var("BREAKPOINT_PERCENTILE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_BREAKPOINT_PERCENTILE),
            window_radius: std::env::var("WINDOW_RADIUS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_WINDOW_RADIUS),
            default_heading_depth: std::env::var("DEFAULT_HEADING_DEPTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_HEADING_DEPTH),
            list_inline_max: std::env::var("LIST_INLINE_MAX")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_LIST_INLINE_MAX),
            list_part_max: std::env::var("LIST_PART_MAX")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_LIST_PART_MAX),
            caption_scan_window: std::env::var("CAPTION_SCAN_WINDOW")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_CAPTION_SCAN_WINDOW),
            neighbor_cap: std::env::var("NEIGHBOR_WINDOW_CAP")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_NEIGHBOR_CAP),
            min_chunk_chars: std::env::var("MIN_CHUNK_CHARS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MIN_CHUNK_CHARS),
        }
    }

    /// Set the breakpoint percentile.
    pub fn with_breakpoint_percentile(mut self, percentile: f64) -> Self {
        self.breakpoint_percentile = percentile;
        self
    }

    /// Set the minimum chunk length.
    pub fn with_min_chunk_chars(mut self, min: usize) -> Self {
        self.min_chunk_chars = min;
        self
    }

    /// Validate the configuration, rejecting unusable values.
    pub fn validated(self) -> Result<Self, SegmenterError> {
        if !self.breakpoint_percentile.is_finite()
            || self.breakpoint_percentile <= 0.0
            || self.breakpoint_percentile > 100.0
        {
            return Err(SegmenterError::Config(format!(
                "breakpoint_percentile must be in (0, 100], got {}",
                self.breakpoint_percentile
            )));
        }

        if self.list_part_max == 0 {
            return Err(SegmenterError::Config(
                "list_part_max must be non-zero".to_string(),
            ));
        }

        if self.list_inline_max > self.list_part_max {
            return Err(SegmenterError::Config(format!(
                "list_inline_max ({}) must not exceed list_part_max ({})",
                self.list_inline_max, self.list_part_max
            )));
        }

        if self.neighbor_cap == 0 {
            return Err(SegmenterError::Config(
                "neighbor_cap must be non-zero".to_string(),
            ));
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(PipelineConfig::default().validated().is_ok());
    }

    #[test]
    fn test_percentile_out_of_range() {
        let config = PipelineConfig::default().with_breakpoint_percentile(0.0);
        assert!(config.validated().is_err());

        let config = PipelineConfig::default().with_breakpoint_percentile(101.0);
        assert!(config.validated().is_err());
    }

    #[test]
    fn test_inline_max_above_part_max() {
        let mut config = PipelineConfig::default();
        config.list_inline_max = 2000;
        config.list_part_max = 1500;
        assert!(config.validated().is_err());
    }
}
