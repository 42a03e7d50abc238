//! Tunables for the scroll model and its DOM wiring.
//!
//! The page may override any subset of fields with a JSON object in the
//! wrapper's `data-scroll-config` attribute, e.g.
//! `{"ease": 0.08, "logLevel": "debug"}`. Missing fields keep their defaults.

use log::LevelFilter;
use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrollConfig {
    /// Fraction of the remaining distance covered per frame.
    pub ease: f64,
    /// Below this distance (px) `current` snaps onto `target`.
    pub snap_tolerance: f64,
    /// Distance (px) above which skew attacks to `max_skew`.
    pub skew_threshold: f64,
    /// Skew magnitude in degrees.
    pub max_skew: f64,
    /// Per-frame low-pass factor pulling skew back to zero.
    pub skew_release: f64,
    /// Rotation applied per degree of skew.
    pub rotate_ratio: f64,
    pub wheel_multiplier: f64,
    pub touch_multiplier: f64,
    /// Pixels moved per arrow key press.
    pub key_step: f64,
    /// Viewports narrower than this (px) use native layout.
    pub mobile_breakpoint: f64,
    /// Brand mark shows once `current` passes this fraction of the viewport width.
    pub brand_reveal_ratio: f64,
    /// Scroll hint is dismissed once `current` passes this offset (px).
    pub hint_dismiss_offset: f64,
    /// Scroll hint is only revealed while `current` is below this offset (px).
    pub hint_show_below: f64,
    pub settle_delay_ms: u32,
    pub hint_delay_ms: u32,
    pub contact_scroll_delay_ms: u32,
    /// Horizontal look-ahead for lazy images (px).
    pub preload_margin_px: u32,
    pub log_level: LevelFilter,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            ease: 0.05,
            snap_tolerance: 0.5,
            skew_threshold: 60.0,
            max_skew: 0.7,
            skew_release: 0.03,
            rotate_ratio: 0.1,
            wheel_multiplier: 1.2,
            touch_multiplier: 1.2,
            key_step: 200.0,
            mobile_breakpoint: 768.0,
            brand_reveal_ratio: 0.69,
            hint_dismiss_offset: 10.0,
            hint_show_below: 50.0,
            settle_delay_ms: 100,
            hint_delay_ms: 10_000,
            contact_scroll_delay_ms: 500,
            preload_margin_px: 3000,
            log_level: LevelFilter::Info,
        }
    }
}

impl ScrollConfig {
    /// Parses and validates a (possibly partial) JSON override.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // ease must stay in (0, 1] or the residual can grow between frames
        if !(self.ease > 0.0 && self.ease <= 1.0) {
            return Err(out_of_range("ease", self.ease, "0 < ease <= 1"));
        }
        if !(0.0..=1.0).contains(&self.skew_release) {
            return Err(out_of_range(
                "skewRelease",
                self.skew_release,
                "0 <= skewRelease <= 1",
            ));
        }

        let non_negative = [
            ("snapTolerance", self.snap_tolerance),
            ("skewThreshold", self.skew_threshold),
            ("maxSkew", self.max_skew),
            ("rotateRatio", self.rotate_ratio),
            ("wheelMultiplier", self.wheel_multiplier),
            ("touchMultiplier", self.touch_multiplier),
            ("keyStep", self.key_step),
            ("mobileBreakpoint", self.mobile_breakpoint),
            ("brandRevealRatio", self.brand_reveal_ratio),
            ("hintDismissOffset", self.hint_dismiss_offset),
            ("hintShowBelow", self.hint_show_below),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(out_of_range(field, value, "a finite value >= 0"));
            }
        }
        Ok(())
    }
}

fn out_of_range(field: &'static str, value: f64, expected: &'static str) -> ConfigError {
    ConfigError::OutOfRange {
        field,
        value,
        expected,
    }
}
