//! Robinson pseudo-cylindrical projection.
//!
//! Robinson is defined by a table of parallel lengths (`X`) and distances
//! from the equator (`Y`) at 5 degree latitude steps. Points between table
//! rows are linearly interpolated. Output is on a unit sphere:
//!
//! ```text
//! x = 0.8487 * X(lat) * (lon - lon0)   [radians]
//! y = 1.3523 * Y(lat) * sign(lat)
//! ```

use std::f64::consts::PI;

const X_SCALE: f64 = 0.8487;
const Y_SCALE: f64 = 1.3523;
const TABLE_STEP_DEG: f64 = 5.0;

/// Parallel length relative to the equator, for 0, 5, ..., 90 degrees.
const PARALLEL_LENGTH: [f64; 19] = [
    1.0000, 0.9986, 0.9954, 0.9900, 0.9822, 0.9730, 0.9600, 0.9427, 0.9216, 0.8962, 0.8679,
    0.8350, 0.7986, 0.7597, 0.7186, 0.6732, 0.6213, 0.5722, 0.5322,
];

/// Distance of the parallel from the equator, for 0, 5, ..., 90 degrees.
const PARALLEL_DISTANCE: [f64; 19] = [
    0.0000, 0.0620, 0.1240, 0.1860, 0.2480, 0.3100, 0.3720, 0.4340, 0.4958, 0.5571, 0.6176,
    0.6769, 0.7346, 0.7903, 0.8435, 0.8936, 0.9394, 0.9761, 1.0000,
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Robinson {
    /// Central meridian in degrees
    pub central_longitude: f64,
}

impl Robinson {
    pub fn new(central_longitude: f64) -> Self {
        Self { central_longitude }
    }

    /// Project (offset from the central meridian, latitude), both in degrees.
    pub fn project_relative(&self, dlon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let lat = lat_deg.clamp(-90.0, 90.0);
        let (length, distance) = interpolate_tables(lat.abs());
        let x = X_SCALE * length * dlon_deg.to_radians();
        let y = Y_SCALE * distance * lat.signum();
        (x, y)
    }

    /// Inverse of [`Robinson::project_relative`], `None` off the globe.
    pub fn inverse_relative(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let distance = y.abs() / Y_SCALE;
        if distance > 1.0 + 1e-12 {
            return None;
        }
        let abs_lat = latitude_for_distance(distance.min(1.0));
        let (length, _) = interpolate_tables(abs_lat);
        let dlon = x / (X_SCALE * length);
        if dlon.abs() > PI + 1e-12 {
            return None;
        }
        Some((dlon.to_degrees(), abs_lat.copysign(y)))
    }
}

/// Interpolated (X, Y) table values for a latitude in [0, 90].
fn interpolate_tables(abs_lat: f64) -> (f64, f64) {
    let pos = abs_lat / TABLE_STEP_DEG;
    let idx = (pos.floor() as usize).min(PARALLEL_LENGTH.len() - 2);
    let frac = pos - idx as f64;
    let lerp = |table: &[f64; 19]| table[idx] + (table[idx + 1] - table[idx]) * frac;
    (lerp(&PARALLEL_LENGTH), lerp(&PARALLEL_DISTANCE))
}

/// Latitude in [0, 90] whose interpolated Y value equals `distance`.
fn latitude_for_distance(distance: f64) -> f64 {
    let idx = PARALLEL_DISTANCE
        .windows(2)
        .position(|w| distance <= w[1])
        .unwrap_or(PARALLEL_DISTANCE.len() - 2);
    let (lo, hi) = (PARALLEL_DISTANCE[idx], PARALLEL_DISTANCE[idx + 1]);
    let frac = (distance - lo) / (hi - lo);
    (idx as f64 + frac) * TABLE_STEP_DEG
}
