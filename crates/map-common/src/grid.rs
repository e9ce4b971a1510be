//! Gridded scalar fields and their geographic coordinates.

use serde::{Deserialize, Serialize};

use crate::error::{MapError, MapResult};

/// A 2-D scalar field in row-major order.
///
/// Rows run along latitude (or the `j` axis of a curvilinear grid), columns
/// along longitude (`i`). NaN marks missing data.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    values: Vec<f32>,
    rows: usize,
    cols: usize,
}

impl ScalarField {
    /// Create a field from row-major values.
    pub fn new(values: Vec<f32>, rows: usize, cols: usize) -> MapResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(MapError::InvalidInput(format!(
                "field must have at least one row and column, got {}x{}",
                rows, cols
            )));
        }
        if values.len() != rows * cols {
            return Err(MapError::InvalidInput(format!(
                "field has {} values but shape {}x{} needs {}",
                values.len(),
                rows,
                cols,
                rows * cols
            )));
        }
        Ok(Self { values, rows, cols })
    }

    /// Build a field by evaluating `f(row, col)` at every cell.
    pub fn from_fn(rows: usize, cols: usize, f: impl Fn(usize, usize) -> f32) -> MapResult<Self> {
        let mut values = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                values.push(f(row, col));
            }
        }
        Self::new(values, rows, cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Shape as (rows, cols).
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Value at (row, col), `None` outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.values[row * self.cols + col])
    }

    /// Min and max over finite values, `None` when the field is all NaN.
    pub fn finite_range(&self) -> Option<(f32, f32)> {
        let (min, max) = self
            .values
            .iter()
            .filter(|v| v.is_finite())
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        (min <= max).then_some((min, max))
    }

    /// Summary statistics over finite values.
    pub fn stats(&self) -> FieldStats {
        let mut count = 0usize;
        let mut sum = 0.0f64;
        for &v in self.values.iter().filter(|v| v.is_finite()) {
            count += 1;
            sum += v as f64;
        }
        let (min, max) = self.finite_range().unwrap_or((f32::NAN, f32::NAN));
        FieldStats {
            min,
            max,
            mean: if count > 0 { sum / count as f64 } else { f64::NAN },
            valid_count: count,
            missing_count: self.values.len() - count,
        }
    }
}

/// Summary statistics for logging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    pub min: f32,
    pub max: f32,
    pub mean: f64,
    pub valid_count: usize,
    pub missing_count: usize,
}

/// Longitude/latitude coordinates matching a [`ScalarField`].
#[derive(Debug, Clone, PartialEq)]
pub enum Coordinates {
    /// 1-D coordinate vectors of a regular grid (`lat.len()` rows, `lon.len()` columns).
    Regular { lon: Vec<f64>, lat: Vec<f64> },

    /// 2-D coordinate arrays of a curvilinear grid, both `rows x cols`, row-major.
    Curvilinear {
        lon: Vec<f64>,
        lat: Vec<f64>,
        rows: usize,
        cols: usize,
    },
}

impl Coordinates {
    pub fn regular(lon: Vec<f64>, lat: Vec<f64>) -> Self {
        Coordinates::Regular { lon, lat }
    }

    /// 2-D coordinates; fails when the two arrays do not hold `rows * cols` values.
    pub fn curvilinear(lon: Vec<f64>, lat: Vec<f64>, rows: usize, cols: usize) -> MapResult<Self> {
        if lon.len() != rows * cols || lat.len() != rows * cols {
            return Err(MapError::InvalidInput(format!(
                "2-D coordinates need {} values for shape {}x{}, got lon={} lat={}",
                rows * cols,
                rows,
                cols,
                lon.len(),
                lat.len()
            )));
        }
        Ok(Coordinates::Curvilinear {
            lon,
            lat,
            rows,
            cols,
        })
    }

    /// The grid shape implied by the coordinates, as (rows, cols).
    pub fn shape(&self) -> (usize, usize) {
        match self {
            Coordinates::Regular { lon, lat } => (lat.len(), lon.len()),
            Coordinates::Curvilinear { rows, cols, .. } => (*rows, *cols),
        }
    }

    pub fn is_regular(&self) -> bool {
        matches!(self, Coordinates::Regular { .. })
    }

    /// Longitude and latitude of grid node (row, col).
    pub fn node(&self, row: usize, col: usize) -> (f64, f64) {
        match self {
            Coordinates::Regular { lon, lat } => (lon[col], lat[row]),
            Coordinates::Curvilinear { lon, lat, cols, .. } => {
                (lon[row * cols + col], lat[row * cols + col])
            }
        }
    }

    /// Check that these coordinates describe the same grid as `field`.
    pub fn check_congruent(&self, field: &ScalarField) -> MapResult<()> {
        let (rows, cols) = self.shape();
        if (rows, cols) != field.shape() {
            let kind = if self.is_regular() { "1-D" } else { "2-D" };
            return Err(MapError::InvalidInput(format!(
                "{} coordinates describe a {}x{} grid but the field is {}x{}",
                kind,
                rows,
                cols,
                field.rows(),
                field.cols()
            )));
        }

        let (lon, lat) = match self {
            Coordinates::Regular { lon, lat } => (lon, lat),
            Coordinates::Curvilinear { lon, lat, .. } => {
                if lon.len() != rows * cols || lat.len() != rows * cols {
                    return Err(MapError::InvalidInput(format!(
                        "2-D coordinates need {} values for shape {}x{}, got lon={} lat={}",
                        rows * cols,
                        rows,
                        cols,
                        lon.len(),
                        lat.len()
                    )));
                }
                (lon, lat)
            }
        };
        if lon.iter().chain(lat.iter()).any(|v| !v.is_finite()) {
            return Err(MapError::InvalidInput(
                "coordinates contain non-finite values".to_string(),
            ));
        }
        Ok(())
    }
}

/// Append a copy of the first longitude column at +360 degrees.
///
/// Removes the visible seam where a global map wraps around. Longitudes
/// `[0, 90, 180, 270]` become `[0, 90, 180, 270, 360]`, and the new last
/// column repeats the first column's values.
pub fn add_cyclic_point(
    field: &ScalarField,
    coords: &Coordinates,
) -> MapResult<(ScalarField, Coordinates)> {
    coords.check_congruent(field)?;

    let rows = field.rows();
    let cols = field.cols();
    let mut values = Vec::with_capacity(rows * (cols + 1));
    for row in field.values().chunks_exact(cols) {
        values.extend_from_slice(row);
        values.push(row[0]);
    }
    let padded = ScalarField::new(values, rows, cols + 1)?;

    let padded_coords = match coords {
        Coordinates::Regular { lon, lat } => {
            let mut lon = lon.clone();
            lon.push(lon[0] + 360.0);
            Coordinates::Regular {
                lon,
                lat: lat.clone(),
            }
        }
        Coordinates::Curvilinear { lon, lat, .. } => {
            let mut new_lon = Vec::with_capacity(rows * (cols + 1));
            let mut new_lat = Vec::with_capacity(rows * (cols + 1));
            for (lon_row, lat_row) in lon.chunks_exact(cols).zip(lat.chunks_exact(cols)) {
                new_lon.extend_from_slice(lon_row);
                new_lon.push(lon_row[0] + 360.0);
                new_lat.extend_from_slice(lat_row);
                new_lat.push(lat_row[0]);
            }
            Coordinates::curvilinear(new_lon, new_lat, rows, cols + 1)?
        }
    };

    Ok((padded, padded_coords))
}
