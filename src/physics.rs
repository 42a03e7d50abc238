//! Eased 1-D scroll model with velocity-driven skew.
//!
//! Input moves `target`; every frame `current` glides toward it and the
//! remaining distance decides the shear. Nothing here touches the DOM, so
//! the whole model can be stepped directly in tests.

use crate::config::ScrollConfig;

/// Snapshot of the scroll model.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollState {
    /// Rendered offset in px, 0 = start.
    pub current: f64,
    /// Offset being eased toward, always within `[0, max_scroll]`.
    pub target: f64,
    /// Shear in degrees, within `[-max_skew, max_skew]`.
    pub skew: f64,
    /// `track width - viewport width`, never negative.
    pub max_scroll: f64,
    pub enabled: bool,
}

/// Arrow-key navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyNav {
    Forward,
    Back,
}

impl KeyNav {
    /// Maps a `KeyboardEvent.key` value.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowRight" | "ArrowDown" => Some(Self::Forward),
            "ArrowLeft" | "ArrowUp" => Some(Self::Back),
            _ => None,
        }
    }
}

/// Output of one [`ScrollPhysics::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub offset: f64,
    pub skew: f64,
    pub rotation: f64,
    pub brand_visible: bool,
    /// Set on the first frame past the dismiss offset after the hint was (re)armed.
    pub dismiss_hint: bool,
}

impl Frame {
    /// CSS `transform` value for the track.
    pub fn transform(&self) -> String {
        format!(
            "translate3d(-{}px, 0, 0) skewX({}deg) rotate({}deg)",
            self.offset, self.skew, self.rotation
        )
    }
}

#[derive(Debug, Clone)]
pub struct ScrollPhysics {
    config: ScrollConfig,
    state: ScrollState,
    viewport_width: f64,
    mobile: bool,
    last_touch: Option<(f64, f64)>,
    hint_dismissed: bool,
}

impl ScrollPhysics {
    pub fn new(config: ScrollConfig, viewport_width: f64, max_scroll: f64) -> Self {
        let mobile = viewport_width < config.mobile_breakpoint;
        Self {
            config,
            state: ScrollState {
                max_scroll: max_scroll.max(0.0),
                ..ScrollState::default()
            },
            viewport_width,
            mobile,
            last_touch: None,
            hint_dismissed: false,
        }
    }

    pub fn state(&self) -> ScrollState {
        self.state
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.state.enabled
    }

    pub fn is_mobile(&self) -> bool {
        self.mobile
    }

    /// Turns input handling on. Returns `false` if it already was.
    pub fn enable(&mut self) -> bool {
        !std::mem::replace(&mut self.state.enabled, true)
    }

    /// Refreshes the scroll bound, pulling `target` and `current` under it if it shrank.
    pub fn set_max_scroll(&mut self, max_scroll: f64) {
        if !max_scroll.is_finite() {
            return;
        }
        let max = max_scroll.max(0.0);
        self.state.max_scroll = max;
        self.state.target = self.state.target.clamp(0.0, max);
        self.state.current = self.state.current.clamp(0.0, max);
    }

    pub fn wheel(&mut self, delta_y: f64) -> bool {
        if !self.state.enabled || self.mobile {
            return false;
        }
        self.nudge(delta_y * self.config.wheel_multiplier);
        true
    }

    pub fn touch_start(&mut self, x: f64, y: f64) {
        if self.state.enabled {
            self.last_touch = Some((x, y));
        }
    }

    /// Applies the drag since the previous sample along whichever axis moved more.
    pub fn touch_move(&mut self, x: f64, y: f64) {
        if !self.state.enabled {
            return;
        }
        let Some((last_x, last_y)) = self.last_touch.replace((x, y)) else {
            return;
        };
        let (dx, dy) = (last_x - x, last_y - y);
        let delta = if dx.abs() >= dy.abs() { dx } else { dy };
        self.nudge(delta * self.config.touch_multiplier);
    }

    pub fn touch_end(&mut self) {
        self.last_touch = None;
    }

    pub fn key(&mut self, nav: KeyNav) -> bool {
        if !self.state.enabled || self.mobile {
            return false;
        }
        match nav {
            KeyNav::Forward => self.nudge(self.config.key_step),
            KeyNav::Back => self.nudge(-self.config.key_step),
        }
        true
    }

    pub fn resize(&mut self, viewport_width: f64, max_scroll: f64) {
        self.viewport_width = viewport_width;
        self.mobile = viewport_width < self.config.mobile_breakpoint;
        self.set_max_scroll(max_scroll);
    }

    /// Heads for the end of the track whether or not input is enabled.
    pub fn jump_to_end(&mut self) {
        self.state.target = self.state.max_scroll;
    }

    /// Start-up settle: an untouched model is pinned to the origin.
    pub fn settle(&mut self) {
        if self.state.target == 0.0 {
            self.state.current = 0.0;
        }
    }

    pub fn hint_eligible(&self) -> bool {
        self.state.current < self.config.hint_show_below
    }

    /// A freshly revealed hint gets hidden again once scrolling passes the offset.
    pub fn rearm_hint_dismissal(&mut self) {
        self.hint_dismissed = false;
    }

    /// Advances one frame. `None` while disabled or on a mobile viewport.
    pub fn step(&mut self) -> Option<Frame> {
        if !self.state.enabled || self.mobile {
            return None;
        }
        let config = &self.config;
        let state = &mut self.state;

        if (state.target - state.current).abs() < config.snap_tolerance {
            state.current = state.target;
        } else {
            state.current += (state.target - state.current) * config.ease;
        }

        let diff = state.target - state.current;
        if diff.abs() > config.skew_threshold {
            state.skew = if diff > 0.0 {
                -config.max_skew
            } else {
                config.max_skew
            };
        } else {
            state.skew += (0.0 - state.skew) * config.skew_release;
        }

        let dismiss_hint = !self.hint_dismissed && state.current > config.hint_dismiss_offset;
        self.hint_dismissed |= dismiss_hint;

        Some(Frame {
            offset: state.current,
            skew: state.skew,
            rotation: state.skew * config.rotate_ratio,
            brand_visible: state.current > self.viewport_width * config.brand_reveal_ratio,
            dismiss_hint,
        })
    }

    fn nudge(&mut self, delta: f64) {
        if !delta.is_finite() {
            return;
        }
        self.state.target = (self.state.target + delta).clamp(0.0, self.state.max_scroll);
    }
}
