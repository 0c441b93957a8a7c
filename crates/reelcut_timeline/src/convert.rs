use reelcut_core::types::Frames;

/// Horizontal pixel offset of a frame at the given rate and zoom level.
pub fn time_to_pixels(frame: Frames, fps: f64, pixels_per_second: f64) -> f64 {
    (frame.0 as f64 / fps) * pixels_per_second
}

/// Nearest whole frame for a pixel offset at the given rate and zoom level.
/// Frames are indivisible, so the fractional result is rounded.
pub fn pixels_to_time(pixels: f64, fps: f64, pixels_per_second: f64) -> Frames {
    Frames(((pixels / pixels_per_second) * fps).round() as i64)
}
