//! Test support for the climate-maps crates.
//!
//! - [`generators`]: synthetic fields and lon/lat grids with known values
//! - [`fixtures`]: named bounding boxes, grid shapes, CF time constants and
//!   GeoJSON snippets
//! - [`paths`]: locating optional sample files and scratch directories
//!
//! Pulled in as a dev-dependency (`test-utils = { path = "../test-utils" }`).

pub mod fixtures;
pub mod generators;
pub mod paths;

pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Path of an optional sample file, or an early `return` from the test.
///
/// Reanalysis extracts and model output are too large to check in; tests
/// reading them are skipped with a note on stderr when the file is absent.
///
/// ```ignore
/// let path = require_test_file!("air.sig995.2019.nc");
/// ```
#[macro_export]
macro_rules! require_test_file {
    ($name:expr) => {{
        match $crate::find_test_file($name) {
            Some(path) => path,
            None => {
                eprintln!("skipping: sample file '{}' not found (set TEST_DATA_DIR)", $name);
                return;
            }
        }
    }};
}

/// Assert `|left - right| <= epsilon`, comparing as `f64`.
///
/// ```ignore
/// assert_approx_eq!(field.get(0, 0).unwrap(), 273.15, 1e-3);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: {:?} and {:?} differ by {:?} (epsilon {:?})",
                left, right, diff, epsilon
            );
        }
    }};
}

/// [`assert_approx_eq!`] on both members of a `(lon, lat)` pair.
#[macro_export]
macro_rules! assert_coords_approx_eq {
    (($x1:expr, $y1:expr), ($x2:expr, $y2:expr), $epsilon:expr) => {{
        $crate::assert_approx_eq!($x1, $x2, $epsilon);
        $crate::assert_approx_eq!($y1, $y2, $epsilon);
    }};
}
