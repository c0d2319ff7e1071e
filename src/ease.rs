use std::time::Duration;

pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

pub fn ease_in(t: f32) -> f32 {
    let x = t.clamp(0.0, 1.0);
    x * x
}

pub fn ease_out(t: f32) -> f32 {
    let x = t.clamp(0.0, 1.0);
    1.0 - (1.0 - x) * (1.0 - x)
}

pub fn ease_in_out(t: f32) -> f32 {
    let x = t.clamp(0.0, 1.0);
    if x < 0.5 {
        2.0 * x * x
    } else {
        1.0 - (-2.0 * x + 2.0).powi(2) / 2.0
    }
}

/// Normalized progress of `elapsed` through `duration`, clamped to [0, 1].
/// A zero (or degenerate) duration counts as already complete.
pub fn progress(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    clamp(elapsed.as_secs_f32() / duration.as_secs_f32(), 0.0, 1.0)
}
