//! Map projections for gridded climate data.
//!
//! Implements map projections from scratch without external dependencies.
//! All projections work on a unit sphere; callers scale projected
//! coordinates into pixels.

pub mod plate_carree;
pub mod robinson;

pub use plate_carree::PlateCarree;
pub use robinson::Robinson;

/// Wrap a longitude into [-180, 180).
pub fn normalize_longitude(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped >= 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// A projection centered on a meridian.
///
/// `project_relative` takes the longitude offset from the central meridian
/// without wrapping it, so geometry that crosses the map edge can be drawn
/// twice (shifted by 360 degrees) and clipped by the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapProjection {
    Robinson(Robinson),
    PlateCarree(PlateCarree),
}

impl MapProjection {
    pub fn robinson(central_longitude: f64) -> Self {
        MapProjection::Robinson(Robinson::new(central_longitude))
    }

    pub fn plate_carree(central_longitude: f64) -> Self {
        MapProjection::PlateCarree(PlateCarree::new(central_longitude))
    }

    pub fn name(&self) -> &'static str {
        match self {
            MapProjection::Robinson(_) => "robinson",
            MapProjection::PlateCarree(_) => "plate_carree",
        }
    }

    pub fn central_longitude(&self) -> f64 {
        match self {
            MapProjection::Robinson(p) => p.central_longitude,
            MapProjection::PlateCarree(p) => p.central_longitude,
        }
    }

    /// Offset of `lon` from the central meridian, wrapped into [-180, 180).
    pub fn relative_longitude(&self, lon: f64) -> f64 {
        normalize_longitude(lon - self.central_longitude())
    }

    /// Project a point given as (longitude offset, latitude), unwrapped.
    pub fn project_relative(&self, dlon: f64, lat: f64) -> (f64, f64) {
        match self {
            MapProjection::Robinson(p) => p.project_relative(dlon, lat),
            MapProjection::PlateCarree(p) => p.project_relative(dlon, lat),
        }
    }

    /// Project a geographic point (degrees).
    pub fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        self.project_relative(self.relative_longitude(lon), lat)
    }

    /// Geographic point (degrees, lon in [-180, 180)) for projected
    /// coordinates, `None` outside the projected globe.
    pub fn inverse(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let (dlon, lat) = match self {
            MapProjection::Robinson(p) => p.inverse_relative(x, y)?,
            MapProjection::PlateCarree(p) => p.inverse_relative(x, y)?,
        };
        Some((normalize_longitude(self.central_longitude() + dlon), lat))
    }

    /// Projected bounds of the whole globe as (min_x, min_y, max_x, max_y).
    pub fn globe_bounds(&self) -> (f64, f64, f64, f64) {
        let (max_x, _) = self.project_relative(180.0, 0.0);
        let (_, max_y) = self.project_relative(0.0, 90.0);
        (-max_x, -max_y, max_x, max_y)
    }

    /// Closed outline of the projected globe, traced along the two edge
    /// meridians with `samples` points each.
    pub fn globe_outline(&self, samples: usize) -> Vec<(f64, f64)> {
        let samples = samples.max(2);
        let step = 180.0 / (samples - 1) as f64;
        let mut outline = Vec::with_capacity(samples * 2);
        for i in 0..samples {
            outline.push(self.project_relative(180.0, -90.0 + i as f64 * step));
        }
        for i in 0..samples {
            outline.push(self.project_relative(-180.0, 90.0 - i as f64 * step));
        }
        outline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_longitude() {
        assert_eq!(normalize_longitude(0.0), 0.0);
        assert_eq!(normalize_longitude(180.0), -180.0);
        assert_eq!(normalize_longitude(270.0), -90.0);
        assert_eq!(normalize_longitude(-190.0), 170.0);
        assert_eq!(normalize_longitude(360.0), 0.0);
    }

    #[test]
    fn test_relative_longitude_with_center() {
        let proj = MapProjection::robinson(180.0);
        assert_eq!(proj.relative_longitude(180.0), 0.0);
        assert_eq!(proj.relative_longitude(0.0), -180.0);
        assert_eq!(proj.relative_longitude(90.0), -90.0);
    }

    #[test]
    fn test_globe_bounds_symmetric() {
        let proj = MapProjection::plate_carree(0.0);
        assert_eq!(proj.globe_bounds(), (-180.0, -90.0, 180.0, 90.0));
    }

    #[test]
    fn test_outline_is_closed_loop() {
        let proj = MapProjection::robinson(0.0);
        let outline = proj.globe_outline(19);
        assert_eq!(outline.len(), 38);
        let (x0, _) = outline[0];
        let (xn, _) = outline[outline.len() - 1];
        assert!((x0 + xn).abs() < 1e-12);
    }
}
