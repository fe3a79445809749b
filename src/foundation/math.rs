use std::f64::consts::PI;

/// Degrees to radians.
pub fn radians(degrees: f64) -> f64 {
    PI * degrees / 180.0
}

/// Radians to degrees.
pub fn degrees(radians: f64) -> f64 {
    180.0 * radians / PI
}

/// Wrap an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(v: f64) -> f64 {
    let n = v.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if n >= 360.0 { 0.0 } else { n }
}

/// Re-express `target` so that turning from `current` to it never exceeds 180 degrees.
///
/// The engine interpolates headings by raw difference, so callers that want the short way
/// round submit the corrected value.
pub fn shortest_turn_target(current: f64, target: f64) -> f64 {
    let mut t = normalize_degrees(target);
    let c = normalize_degrees(current);
    if t - c > 180.0 {
        t -= 360.0;
    } else if t - c < -180.0 {
        t += 360.0;
    }
    current + (t - c)
}

pub(crate) fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

pub(crate) fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
