use crate::config::TreeConfig;
use crate::layout::TreeBounds;
use serde::{Deserialize, Serialize};

const WHEEL_ZOOM_STEP: f32 = 0.1;
const BUTTON_ZOOM_STEP: f32 = 0.2;

/// Pan and zoom state of a view onto a laid-out tree.
///
/// Screen coordinates are `layout * scale + translate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
    pub translate_x: f32,
    pub translate_y: f32,
    pub min_scale: f32,
    pub max_scale: f32,
}

impl Viewport {
    /// Non-finite zoom limits fall back to the defaults.
    pub fn new(width: f32, height: f32, config: &TreeConfig) -> Self {
        let defaults = TreeConfig::default();
        let (lo, hi) = if config.min_scale.is_finite() && config.max_scale.is_finite() {
            (config.min_scale, config.max_scale)
        } else {
            (defaults.min_scale, defaults.max_scale)
        };
        let min_scale = lo.min(hi);
        let max_scale = hi.max(lo);
        Self {
            width,
            height,
            scale: 1.0_f32.clamp(min_scale, max_scale),
            translate_x: 0.0,
            translate_y: 0.0,
            min_scale,
            max_scale,
        }
    }

    /// Moves the bounds' center to the middle of the view. Degenerate bounds
    /// (an empty layout) leave the view untouched.
    pub fn center_on(&mut self, bounds: &TreeBounds) {
        if bounds.is_degenerate() {
            return;
        }
        let (center_x, center_y) = bounds.center();
        self.translate_x = self.width / 2.0 - center_x;
        self.translate_y = self.height / 2.0 - center_y;
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.translate_x += dx;
        self.translate_y += dy;
    }

    /// Wheel zoom: scrolling up (negative `delta_y`) zooms in. The layout
    /// point under the cursor stays put.
    pub fn zoom_at(&mut self, delta_y: f32, cursor_x: f32, cursor_y: f32) {
        let delta = if delta_y > 0.0 {
            -WHEEL_ZOOM_STEP
        } else {
            WHEEL_ZOOM_STEP
        };
        let next = self.clamp_scale(self.scale + delta);
        if next == self.scale {
            return;
        }
        let factor = next / self.scale;
        self.translate_x = cursor_x - (cursor_x - self.translate_x) * factor;
        self.translate_y = cursor_y - (cursor_y - self.translate_y) * factor;
        self.scale = next;
    }

    pub fn zoom_in(&mut self) {
        self.scale = self.clamp_scale(self.scale + BUTTON_ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.scale = self.clamp_scale(self.scale - BUTTON_ZOOM_STEP);
    }

    pub fn reset(&mut self, bounds: &TreeBounds) {
        self.scale = self.clamp_scale(1.0);
        self.center_on(bounds);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn to_screen(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x * self.scale + self.translate_x,
            y * self.scale + self.translate_y,
        )
    }

    pub fn css_transform(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.translate_x, self.translate_y, self.scale
        )
    }

    // Must not panic on NaN or inverted limits.
    fn clamp_scale(&self, scale: f32) -> f32 {
        scale.max(self.min_scale).min(self.max_scale)
    }
}
