//! Synthetic fields and grids for tests.
//!
//! The generators build predictable data so tests can check colors and
//! boundaries against known values instead of sample files.

use map_common::{BoundingBox, Coordinates, ScalarField};

/// Longitudes `0, d, 2d, ...` covering the globe once, `d = 360 / count`.
pub fn regular_lon(count: usize) -> Vec<f64> {
    let step = 360.0 / count as f64;
    (0..count).map(|i| i as f64 * step).collect()
}

/// Latitudes from 90 down to -90 inclusive, the order reanalysis files use.
pub fn regular_lat(count: usize) -> Vec<f64> {
    if count == 1 {
        return vec![0.0];
    }
    let step = 180.0 / (count - 1) as f64;
    (0..count).map(|j| 90.0 - j as f64 * step).collect()
}

/// Global 1-D coordinates for a `rows x cols` grid.
pub fn global_coordinates(rows: usize, cols: usize) -> Coordinates {
    Coordinates::regular(regular_lon(cols), regular_lat(rows))
}

/// Cell-centered 1-D coordinates covering `bbox`.
pub fn regional_coordinates(bbox: BoundingBox, rows: usize, cols: usize) -> Coordinates {
    let dx = bbox.width() / cols as f64;
    let dy = bbox.height() / rows as f64;
    Coordinates::regular(
        (0..cols).map(|i| bbox.min_x + (i as f64 + 0.5) * dx).collect(),
        (0..rows).map(|j| bbox.min_y + (j as f64 + 0.5) * dy).collect(),
    )
}

/// Temperature-like field in degrees Celsius.
///
/// Warm at the equator, cold at the poles, with a weak zonal wave so
/// neighbouring columns differ. Values stay within about -25..32.
pub fn temperature_field(rows: usize, cols: usize) -> ScalarField {
    let lat = regular_lat(rows);
    let lon = regular_lon(cols);
    ScalarField::from_fn(rows, cols, |row, col| {
        let phi = lat[row].to_radians();
        let lambda = lon[col].to_radians();
        (-22.0 + 52.0 * phi.cos().powi(2) + 3.0 * (2.0 * lambda).sin()) as f32
    })
    .expect("non-empty grid")
}

/// Field increasing linearly in reading order from `min` to `max`.
///
/// The first cell holds exactly `min` and the last exactly `max`, so the
/// auto-ranged boundaries are known in advance.
pub fn ramp_field(rows: usize, cols: usize, min: f32, max: f32) -> ScalarField {
    let last = (rows * cols).saturating_sub(1).max(1) as f32;
    ScalarField::from_fn(rows, cols, |row, col| {
        let t = (row * cols + col) as f32 / last;
        if row * cols + col == rows * cols - 1 {
            max
        } else {
            min + (max - min) * t
        }
    })
    .expect("non-empty grid")
}

/// Field holding the same value everywhere.
pub fn constant_field(rows: usize, cols: usize, value: f32) -> ScalarField {
    ScalarField::new(vec![value; rows * cols], rows, cols).expect("non-empty grid")
}

/// Copy of `field` with a rectangular block of cells set to NaN.
pub fn with_nan_block(
    field: &ScalarField,
    row_range: std::ops::Range<usize>,
    col_range: std::ops::Range<usize>,
) -> ScalarField {
    let cols = field.cols();
    let mut values = field.values().to_vec();
    for row in row_range {
        for col in col_range.clone() {
            if let Some(v) = values.get_mut(row * cols + col) {
                *v = f32::NAN;
            }
        }
    }
    ScalarField::new(values, field.rows(), cols).expect("shape unchanged")
}

/// A sheared 2-D grid over `bbox`, like an ocean model's tripolar patch.
///
/// Longitudes drift by `shear` degrees per row so the grid is genuinely
/// curvilinear while staying inside the box.
pub fn curvilinear_coordinates(
    bbox: BoundingBox,
    rows: usize,
    cols: usize,
    shear: f64,
) -> Coordinates {
    let span = bbox.width() - shear.abs() * rows as f64;
    let dx = span / cols as f64;
    let dy = bbox.height() / rows as f64;
    let base = if shear < 0.0 {
        bbox.min_x - shear * rows as f64
    } else {
        bbox.min_x
    };

    let mut lon = Vec::with_capacity(rows * cols);
    let mut lat = Vec::with_capacity(rows * cols);
    for j in 0..rows {
        for i in 0..cols {
            lon.push(base + (i as f64 + 0.5) * dx + shear * j as f64);
            lat.push(bbox.min_y + (j as f64 + 0.5) * dy);
        }
    }
    Coordinates::curvilinear(lon, lat, rows, cols).expect("arrays sized rows * cols")
}

/// RGBA gradient pixels: red follows x, green follows y.
pub fn create_test_rgba_pixels(width: usize, height: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            let r = ((x as f32 / width as f32) * 255.0) as u8;
            let g = ((y as f32 / height as f32) * 255.0) as u8;
            pixels.extend_from_slice(&[r, g, 128, 255]);
        }
    }
    pixels
}

/// RGBA pixels drawn from a 10-color banded palette, the shape of a
/// classified map, for exercising indexed PNG output.
pub fn create_banded_pixels(width: usize, height: usize) -> Vec<u8> {
    let palette: [(u8, u8, u8); 10] = [
        (59, 76, 192),
        (98, 130, 234),
        (141, 176, 254),
        (184, 208, 249),
        (221, 221, 221),
        (245, 196, 173),
        (244, 154, 123),
        (222, 96, 77),
        (180, 4, 38),
        (255, 255, 255),
    ];

    let mut pixels = Vec::with_capacity(width * height * 4);
    for _y in 0..height {
        for x in 0..width {
            let idx = (x * palette.len() / width.max(1)).min(palette.len() - 1);
            let (r, g, b) = palette[idx];
            pixels.extend_from_slice(&[r, g, b, 255]);
        }
    }
    pixels
}
