//! Equirectangular (Plate Carrée) projection.
//!
//! Projected coordinates are plain degrees: x is the longitude offset from
//! the central meridian, y is latitude.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlateCarree {
    /// Central meridian in degrees
    pub central_longitude: f64,
}

impl PlateCarree {
    pub fn new(central_longitude: f64) -> Self {
        Self { central_longitude }
    }

    pub fn project_relative(&self, dlon_deg: f64, lat_deg: f64) -> (f64, f64) {
        (dlon_deg, lat_deg.clamp(-90.0, 90.0))
    }

    pub fn inverse_relative(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        if x.abs() > 180.0 || y.abs() > 90.0 {
            return None;
        }
        Some((x, y))
    }
}
