//! Geographic bounding box types and operations.

use serde::{Deserialize, Serialize};

/// A geographic bounding box in degrees.
///
/// `min_x`/`max_x` are longitudes, `min_y`/`max_y` are latitudes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Build from longitude and latitude limits, as `xlim`/`ylim` pairs.
    pub fn from_limits(xlim: (f64, f64), ylim: (f64, f64)) -> Self {
        Self::new(xlim.0, ylim.0, xlim.1, ylim.1)
    }

    /// Width of the bounding box in degrees of longitude.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in degrees of latitude.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Check that the box is non-degenerate and lies on the sphere.
    pub fn validate(&self) -> Result<(), String> {
        let finite = [self.min_x, self.min_y, self.max_x, self.max_y]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err("bounding box contains non-finite values".to_string());
        }
        if self.min_x >= self.max_x {
            return Err(format!(
                "longitude limits must increase: {} >= {}",
                self.min_x, self.max_x
            ));
        }
        if self.min_y >= self.max_y {
            return Err(format!(
                "latitude limits must increase: {} >= {}",
                self.min_y, self.max_y
            ));
        }
        if self.min_y < -90.0 || self.max_y > 90.0 {
            return Err("latitude limits must lie within [-90, 90]".to_string());
        }
        if self.width() > 360.0 {
            return Err("longitude span exceeds 360 degrees".to_string());
        }
        Ok(())
    }

    /// Check if a point is contained within this bbox.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_point_includes_edges() {
        let bbox = BoundingBox::from_limits((-30.0, 30.0), (20.0, 60.0));
        assert!(bbox.contains_point(-30.0, 60.0));
        assert!(bbox.contains_point(0.0, 40.0));
        assert!(!bbox.contains_point(31.0, 40.0));
    }

    #[test]
    fn test_validate() {
        assert!(BoundingBox::from_limits((-30.0, 30.0), (20.0, 60.0)).validate().is_ok());
        assert!(BoundingBox::from_limits((30.0, -30.0), (20.0, 60.0)).validate().is_err());
        assert!(BoundingBox::from_limits((0.0, 10.0), (-95.0, 10.0)).validate().is_err());
    }
}
