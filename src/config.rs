//! Tunables for the tear gesture, the sheet geometry, and the photo set.
//! Defaults are the shipped values; hosts may deserialize overrides from
//! JSON (see `src/bin/demo.rs`) or build these by hand.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// State-machine tunables: thresholds, distances, and phase durations.
/// Immutable once handed to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TearConfig {
    /// Tear amount at release that commits to a throw instead of a reset.
    pub complete_threshold: f32,
    /// Upper clamp on the drag-driven tear amount.
    pub max_tear: f32,
    /// Tear amount at which a drag auto-triggers the throw mid-gesture.
    pub throw_start_threshold: f32,
    /// Vertical drag span (points) that maps onto the full tear range.
    /// Deliberately independent of window size; scale the delta yourself
    /// if you want per-device sensitivity.
    pub drag_distance: f32,
    /// Range the per-throw tear target is drawn from.
    pub throw_tear_min: f32,
    pub throw_tear_max: f32,
    /// Y the sheet drops in from during the intro.
    pub intro_start_y: f32,

    pub throw_duration: Duration,
    pub reset_duration: Duration,
    pub intro_delay: Duration,
    pub intro_duration: Duration,
}

impl Default for TearConfig {
    fn default() -> Self {
        Self {
            complete_threshold: 1.10,
            max_tear: 2.0,
            throw_start_threshold: 1.5,
            drag_distance: 400.0,
            throw_tear_min: 1.5,
            throw_tear_max: 3.0,
            intro_start_y: 10.0,
            throw_duration: Duration::from_millis(700),
            reset_duration: Duration::from_millis(200),
            intro_delay: Duration::from_millis(100),
            intro_duration: Duration::from_millis(1100),
        }
    }
}

/// Sheet geometry and shading constants consumed by the renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// World-space width of the assembled sheet.
    pub full_width: f32,
    pub sheet_height: f32,
    /// Width of the torn strip the two panels overlap on.
    pub tear_width: f32,
    pub x_segments: u32,
    pub y_segments: u32,
    pub left_shade_base: f32,
    pub right_shade_base: f32,
}

impl SheetConfig {
    /// Width of one panel's plane: half the sheet plus half the tear strip,
    /// so both panels cover the strip and the rip edge can overlap.
    pub fn plane_width(&self) -> f32 {
        (self.full_width / 2.0) + (self.tear_width / 2.0)
    }
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            full_width: 3.0,
            sheet_height: 2.0,
            tear_width: 0.4,
            x_segments: 30,
            y_segments: 50,
            left_shade_base: 0.2,
            right_shade_base: 0.3,
        }
    }
}

/// Ordered photo names plus the rip-edge overlay, all resolved to textures
/// by name through the [`TextureCache`](crate::texture_cache::TextureCache).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Assets {
    pub photos: Vec<String>,
    pub rip_name: String,
}

impl Assets {
    /// Everything worth prewarming before first paint.
    pub fn texture_names(&self) -> Vec<String> {
        let mut names = self.photos.clone();
        names.push(self.rip_name.clone());
        names
    }
}

impl Default for Assets {
    fn default() -> Self {
        Self {
            photos: vec!["banana".to_string(), "mango".to_string()],
            rip_name: "rip".to_string(),
        }
    }
}
