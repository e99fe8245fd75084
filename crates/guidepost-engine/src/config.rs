#![forbid(unsafe_code)]

//! Tour configuration.
//!
//! Every tunable of the engine lives in [`TourConfig`]. Values are in host
//! units (pixels for a browser host, cells for a terminal host), so the two
//! presets [`TourConfig::default`] and [`TourConfig::terminal`] differ only in
//! scale.
//!
//! Sources, in increasing precedence:
//!
//! 1. Built-in defaults
//! 2. A JSON document (`file-persistence` feature)
//! 3. `GUIDEPOST_*` environment variables

use std::time::Duration;

use guidepost_core::debug;

use crate::mask::MaskStyle;
use crate::placement::PlacementMetrics;

/// Default durable storage key for the "tour completed" marker.
pub const DEFAULT_STORAGE_KEY: &str = "onboarding_done";

/// Tunables for the tour engine.
#[derive(Debug, Clone, PartialEq)]
pub struct TourConfig {
    /// Key of the durable "tour completed" marker.
    pub storage_key: String,
    /// Spacing between the target and the tooltip, and the viewport margin.
    pub gap: f64,
    pub tooltip_width: f64,
    /// Height assumed for the tooltip when the host has not measured it.
    pub estimated_tooltip_height: f64,
    /// Padding between the target and the mask cut-out.
    pub mask_inset: f64,
    pub corner_radius: f64,
    /// Glow pulse frequency in Hz.
    pub glow_frequency_hz: f32,
    /// Backdrop fade-in after a step change.
    pub fade_in: Duration,
    /// Delay before a first-time visitor sees the tour.
    pub auto_show_delay: Duration,
    /// Settle delay before measuring after a step change.
    pub step_settle_delay: Duration,
    /// Settle delay before measuring after a viewport resize.
    pub resize_settle_delay: Duration,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            gap: 20.0,
            tooltip_width: 480.0,
            estimated_tooltip_height: 200.0,
            mask_inset: 8.0,
            corner_radius: 12.0,
            glow_frequency_hz: 0.5,
            fade_in: Duration::from_millis(200),
            auto_show_delay: Duration::from_millis(1000),
            step_settle_delay: Duration::from_millis(100),
            resize_settle_delay: Duration::from_millis(150),
        }
    }
}

impl TourConfig {
    /// Preset for hosts measuring in terminal cells.
    #[must_use]
    pub fn terminal() -> Self {
        Self {
            gap: 2.0,
            tooltip_width: 36.0,
            estimated_tooltip_height: 8.0,
            mask_inset: 1.0,
            corner_radius: 0.0,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    #[must_use]
    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }

    #[must_use]
    pub fn with_tooltip_width(mut self, width: f64) -> Self {
        self.tooltip_width = width;
        self
    }

    #[must_use]
    pub fn with_auto_show_delay(mut self, delay: Duration) -> Self {
        self.auto_show_delay = delay;
        self
    }

    /// Use one settle delay for both step changes and resizes.
    #[must_use]
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.step_settle_delay = delay;
        self.resize_settle_delay = delay;
        self
    }

    /// Metrics shared by the placement solver.
    #[must_use]
    pub fn placement_metrics(&self) -> PlacementMetrics {
        PlacementMetrics {
            gap: self.gap,
            tooltip_width: self.tooltip_width,
            tooltip_height: self.estimated_tooltip_height,
        }
    }

    /// Style shared by the highlight mask.
    #[must_use]
    pub fn mask_style(&self) -> MaskStyle {
        MaskStyle {
            inset: self.mask_inset,
            corner_radius: self.corner_radius,
        }
    }

    /// Apply `GUIDEPOST_*` environment variables on top of the current values.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup. Unparseable values are
    /// ignored and the current value is kept.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("GUIDEPOST_STORAGE_KEY")
            && !key.trim().is_empty()
        {
            self.storage_key = key.trim().to_string();
        }
        override_f64(&lookup, "GUIDEPOST_GAP", &mut self.gap);
        override_f64(&lookup, "GUIDEPOST_TOOLTIP_WIDTH", &mut self.tooltip_width);
        override_f64(
            &lookup,
            "GUIDEPOST_TOOLTIP_HEIGHT",
            &mut self.estimated_tooltip_height,
        );
        override_f64(&lookup, "GUIDEPOST_MASK_INSET", &mut self.mask_inset);
        override_ms(&lookup, "GUIDEPOST_AUTO_SHOW_MS", &mut self.auto_show_delay);
        override_ms(&lookup, "GUIDEPOST_STEP_SETTLE_MS", &mut self.step_settle_delay);
        override_ms(
            &lookup,
            "GUIDEPOST_RESIZE_SETTLE_MS",
            &mut self.resize_settle_delay,
        );
    }
}

/// Lengths and rates must be finite and non-negative.
fn is_valid_length(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

fn override_f64(lookup: &impl Fn(&str) -> Option<String>, key: &str, slot: &mut f64) {
    if let Some(raw) = lookup(key) {
        match raw.trim().parse::<f64>() {
            Ok(v) if is_valid_length(v) => *slot = v,
            _ => {
                debug!(key, value = %raw, "ignoring invalid tour config override");
            }
        }
    }
}

fn override_ms(lookup: &impl Fn(&str) -> Option<String>, key: &str, slot: &mut Duration) {
    if let Some(raw) = lookup(key) {
        match raw.trim().parse::<u64>() {
            Ok(ms) => *slot = Duration::from_millis(ms),
            Err(_) => {
                debug!(key, value = %raw, "ignoring invalid tour config override");
            }
        }
    }
}

#[cfg(feature = "file-persistence")]
mod json {
    use super::*;
    use crate::error::{PersistenceError, PersistenceResult};
    use serde::Deserialize;

    /// On-disk shape; every field is optional and durations are milliseconds.
    #[derive(Debug, Default, Deserialize)]
    #[serde(default, deny_unknown_fields)]
    struct ConfigFile {
        storage_key: Option<String>,
        gap: Option<f64>,
        tooltip_width: Option<f64>,
        estimated_tooltip_height: Option<f64>,
        mask_inset: Option<f64>,
        corner_radius: Option<f64>,
        glow_frequency_hz: Option<f32>,
        fade_in_ms: Option<u64>,
        auto_show_delay_ms: Option<u64>,
        step_settle_delay_ms: Option<u64>,
        resize_settle_delay_ms: Option<u64>,
    }

    fn invalid(field: &str, reason: &str) -> PersistenceError {
        PersistenceError::Serialization(format!("invalid tour config `{field}`: {reason}"))
    }

    fn length(field: &str, value: f64) -> PersistenceResult<f64> {
        if is_valid_length(value) {
            Ok(value)
        } else {
            Err(invalid(field, "must be a finite, non-negative number"))
        }
    }

    impl TourConfig {
        /// Layer a JSON document over `base`. Lengths are held to the same
        /// rules as the environment overrides, but a bad value is an error
        /// here rather than being skipped.
        pub fn from_json_str(base: TourConfig, json: &str) -> PersistenceResult<TourConfig> {
            let file: ConfigFile = serde_json::from_str(json).map_err(|e| {
                PersistenceError::Serialization(format!("failed to parse tour config: {e}"))
            })?;
            let mut config = base;
            if let Some(v) = file.storage_key {
                if v.trim().is_empty() {
                    return Err(invalid("storage_key", "must not be blank"));
                }
                config.storage_key = v.trim().to_string();
            }
            if let Some(v) = file.gap {
                config.gap = length("gap", v)?;
            }
            if let Some(v) = file.tooltip_width {
                config.tooltip_width = length("tooltip_width", v)?;
            }
            if let Some(v) = file.estimated_tooltip_height {
                config.estimated_tooltip_height = length("estimated_tooltip_height", v)?;
            }
            if let Some(v) = file.mask_inset {
                config.mask_inset = length("mask_inset", v)?;
            }
            if let Some(v) = file.corner_radius {
                config.corner_radius = length("corner_radius", v)?;
            }
            if let Some(v) = file.glow_frequency_hz {
                length("glow_frequency_hz", f64::from(v))?;
                config.glow_frequency_hz = v;
            }
            if let Some(ms) = file.fade_in_ms {
                config.fade_in = Duration::from_millis(ms);
            }
            if let Some(ms) = file.auto_show_delay_ms {
                config.auto_show_delay = Duration::from_millis(ms);
            }
            if let Some(ms) = file.step_settle_delay_ms {
                config.step_settle_delay = Duration::from_millis(ms);
            }
            if let Some(ms) = file.resize_settle_delay_ms {
                config.resize_settle_delay = Duration::from_millis(ms);
            }
            Ok(config)
        }

        /// Read and layer a JSON config file over `base`.
        pub fn from_json_file(
            base: TourConfig,
            path: impl AsRef<std::path::Path>,
        ) -> PersistenceResult<TourConfig> {
            let text = std::fs::read_to_string(path)?;
            Self::from_json_str(base, &text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = TourConfig::default();
        assert_eq!(config.storage_key, "onboarding_done");
        assert_eq!(config.gap, 20.0);
        assert_eq!(config.tooltip_width, 480.0);
        assert_eq!(config.resize_settle_delay, Duration::from_millis(150));
    }

    #[test]
    fn metrics_and_style_mirror_config() {
        let config = TourConfig::default().with_gap(12.0).with_tooltip_width(300.0);
        let metrics = config.placement_metrics();
        assert_eq!(metrics.gap, 12.0);
        assert_eq!(metrics.tooltip_width, 300.0);
        assert_eq!(metrics.tooltip_height, config.estimated_tooltip_height);
        assert_eq!(config.mask_style().inset, config.mask_inset);
    }

    #[test]
    fn overrides_apply_and_ignore_garbage() {
        let mut config = TourConfig::default();
        config.apply_overrides(lookup_from(&[
            ("GUIDEPOST_GAP", "16"),
            ("GUIDEPOST_TOOLTIP_WIDTH", "wide"),
            ("GUIDEPOST_MASK_INSET", "-3"),
            ("GUIDEPOST_AUTO_SHOW_MS", "250"),
            ("GUIDEPOST_STORAGE_KEY", "thesis_tour_seen"),
        ]));
        assert_eq!(config.gap, 16.0);
        assert_eq!(config.tooltip_width, 480.0);
        assert_eq!(config.mask_inset, 8.0);
        assert_eq!(config.auto_show_delay, Duration::from_millis(250));
        assert_eq!(config.storage_key, "thesis_tour_seen");
    }

    #[test]
    fn blank_storage_key_override_is_ignored() {
        let mut config = TourConfig::default();
        config.apply_overrides(lookup_from(&[("GUIDEPOST_STORAGE_KEY", "  ")]));
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn terminal_preset_keeps_timings() {
        let term = TourConfig::terminal();
        let base = TourConfig::default();
        assert!(term.tooltip_width < base.tooltip_width);
        assert_eq!(term.step_settle_delay, base.step_settle_delay);
        assert_eq!(term.storage_key, base.storage_key);
    }

    #[cfg(feature = "file-persistence")]
    #[test]
    fn json_layers_over_base() {
        let config = TourConfig::from_json_str(
            TourConfig::terminal(),
            r#"{ "gap": 3, "resize_settle_delay_ms": 40 }"#,
        )
        .expect("valid json");
        assert_eq!(config.gap, 3.0);
        assert_eq!(config.resize_settle_delay, Duration::from_millis(40));
        assert_eq!(config.tooltip_width, 36.0);
    }

    #[cfg(feature = "file-persistence")]
    #[test]
    fn json_rejects_unknown_fields() {
        let err = TourConfig::from_json_str(TourConfig::default(), r#"{ "gapp": 3 }"#);
        assert!(err.is_err());
    }

    #[cfg(feature = "file-persistence")]
    #[test]
    fn json_and_env_reject_the_same_lengths() {
        for field in ["gap", "tooltip_width", "estimated_tooltip_height", "mask_inset"] {
            let json = format!(r#"{{ "{field}": -4 }}"#);
            let err = TourConfig::from_json_str(TourConfig::default(), &json)
                .expect_err("negative length");
            assert!(err.to_string().contains(field), "{err}");
        }

        let mut config = TourConfig::default();
        config.apply_overrides(lookup_from(&[
            ("GUIDEPOST_GAP", "-4"),
            ("GUIDEPOST_TOOLTIP_WIDTH", "-4"),
            ("GUIDEPOST_MASK_INSET", "-4"),
        ]));
        assert_eq!(config, TourConfig::default());
    }

    #[cfg(feature = "file-persistence")]
    #[test]
    fn json_accepts_zero_and_rejects_blank_key() {
        let config = TourConfig::from_json_str(TourConfig::default(), r#"{ "mask_inset": 0 }"#)
            .expect("zero inset");
        assert_eq!(config.mask_inset, 0.0);
        assert!(
            TourConfig::from_json_str(TourConfig::default(), r#"{ "storage_key": "  " }"#)
                .is_err()
        );
    }
}
