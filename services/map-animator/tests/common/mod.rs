//! NetCDF fixtures for the animator tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use map_animator::AnimatorConfig;
use test_utils::{regular_lat, regular_lon, temperature_field, time};

pub const ROWS: usize = 19;
pub const COLS: usize = 36;
pub const STEPS: usize = 4;

/// `air(time, level, lat, lon)` with a singleton level. Each step is the
/// synthetic temperature field shifted by the step index.
pub fn write_air(dir: &Path, with_units: bool) -> PathBuf {
    let path = dir.join("air.500.nc");
    let mut file = netcdf::create(&path).unwrap();
    file.add_dimension("time", STEPS).unwrap();
    file.add_dimension("level", 1).unwrap();
    file.add_dimension("lat", ROWS).unwrap();
    file.add_dimension("lon", COLS).unwrap();

    let mut time_var = file.add_variable::<f64>("time", &["time"]).unwrap();
    time_var.put_attribute("units", time::NCEP_UNITS).unwrap();
    let offsets: Vec<f64> = (0..STEPS)
        .map(|t| time::NCEP_2019_START + 6.0 * t as f64)
        .collect();
    time_var.put_values(&offsets, ..).unwrap();

    let mut level_var = file.add_variable::<f32>("level", &["level"]).unwrap();
    level_var.put_values(&[500.0f32], ..).unwrap();

    let mut lat_var = file.add_variable::<f64>("lat", &["lat"]).unwrap();
    lat_var.put_attribute("units", "degrees_north").unwrap();
    lat_var.put_values(&regular_lat(ROWS), ..).unwrap();

    let mut lon_var = file.add_variable::<f64>("lon", &["lon"]).unwrap();
    lon_var.put_attribute("units", "degrees_east").unwrap();
    lon_var.put_values(&regular_lon(COLS), ..).unwrap();

    let mut air = file
        .add_variable::<f32>("air", &["time", "level", "lat", "lon"])
        .unwrap();
    if with_units {
        air.put_attribute("units", "degC").unwrap();
    }
    air.put_attribute("long_name", "Air temperature").unwrap();

    let base = temperature_field(ROWS, COLS);
    let mut values = Vec::with_capacity(STEPS * ROWS * COLS);
    for t in 0..STEPS {
        values.extend(base.values().iter().map(|v| v + t as f32));
    }
    air.put_values(&values, ..).unwrap();
    path
}

/// A small, fast configuration writing into `out_dir`.
pub fn small_config(input: PathBuf, out_dir: &Path) -> AnimatorConfig {
    let mut config = AnimatorConfig::default();
    config.input.path = input;
    config.input.variable = "air".to_string();
    config.output.dir = out_dir.to_path_buf();
    config.output.base = "T500_air".to_string();
    config.output.dpi = 40;
    config.render.figure_size = (4.0, 3.0);
    config.render.colormap = "ncl_bwr".into();
    config
}
