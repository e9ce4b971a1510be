//! End-to-end runs of the animator on generated NetCDF files.

mod common;

use std::fs;

use common::{small_config, write_air, COLS, ROWS, STEPS};
use map_animator::{Animator, ImageFormat};
use map_common::MapError;
use test_utils::{assert_approx_eq, temp_test_dir_with_prefix, temperature_field};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn png_size(png: &[u8]) -> (u32, u32) {
    let w = u32::from_be_bytes([png[16], png[17], png[18], png[19]]);
    let h = u32::from_be_bytes([png[20], png[21], png[22], png[23]]);
    (w, h)
}

// ============================================================================
// Successful runs
// ============================================================================

#[test]
fn test_renders_numbered_frames() {
    let dir = temp_test_dir_with_prefix("animate_");
    let input = write_air(dir.path(), true);
    let out = dir.path().join("frames");
    let mut config = small_config(input, &out);
    config.frames.end = Some(3);

    let animator = Animator::prepare(config).unwrap();
    let report = animator.run();
    assert!(report.is_success());

    let names: Vec<String> = report
        .written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["T500_air.100.png", "T500_air.101.png", "T500_air.102.png"]);

    for path in &report.written {
        let png = fs::read(path).unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);
        // cropped to content: never larger than the 160x120 canvas
        let (w, h) = png_size(&png);
        assert!(w > 0 && w <= 160, "width {}", w);
        assert!(h > 0 && h <= 120, "height {}", h);
    }
    assert!(!out.join("T500_air.103.png").exists());
}

#[test]
fn test_stride_and_offset() {
    let dir = temp_test_dir_with_prefix("animate_stride_");
    let input = write_air(dir.path(), true);
    let mut config = small_config(input, dir.path());
    config.frames.start = 1;
    config.frames.stride = 2;
    config.output.index_offset = 0;

    let animator = Animator::prepare(config).unwrap();
    assert_eq!(animator.frame_indices(), vec![1, 3]);
    let report = animator.run();
    assert!(report.is_success());
    assert!(dir.path().join("T500_air.1.png").exists());
    assert!(dir.path().join("T500_air.3.png").exists());
    assert!(!dir.path().join("T500_air.2.png").exists());
}

#[test]
fn test_jpeg_output() {
    let dir = temp_test_dir_with_prefix("animate_jpg_");
    let input = write_air(dir.path(), true);
    let mut config = small_config(input, dir.path());
    config.frames.end = Some(1);
    config.output.format = ImageFormat::Jpg;

    let report = Animator::prepare(config).unwrap().run();
    assert!(report.is_success());
    let jpg = fs::read(dir.path().join("T500_air.100.jpg")).unwrap();
    assert_eq!(&jpg[..3], &[0xFF, 0xD8, 0xFF]);
}

#[test]
fn test_titles_and_label() {
    let dir = temp_test_dir_with_prefix("animate_title_");
    let input = write_air(dir.path(), true);
    let animator = Animator::prepare(small_config(input, dir.path())).unwrap();

    assert_eq!(animator.title(0), "2019-01-01 00:00");
    assert_eq!(animator.title(3), "2019-01-01 18:00");
    assert_eq!(animator.variable().default_label().unwrap(), "Air temperature (degC)");
}

#[test]
fn test_data_summary() {
    let dir = temp_test_dir_with_prefix("animate_summary_");
    let input = write_air(dir.path(), true);
    let animator = Animator::prepare(small_config(input, dir.path())).unwrap();

    let summary = animator.summarize().unwrap();
    assert_eq!((summary.time_steps, summary.rows, summary.cols), (STEPS, ROWS, COLS));
    assert_eq!(summary.units.as_deref(), Some("degC"));
    assert_eq!(summary.missing, 0);

    let (lo, hi) = temperature_field(ROWS, COLS).finite_range().unwrap();
    assert_approx_eq!(summary.min, lo, 1e-4);
    assert_approx_eq!(summary.max, hi + (STEPS - 1) as f32, 1e-4);
    assert!(summary.mean > lo as f64 && summary.mean < hi as f64 + 3.0);
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_out_of_range_steps_fail_individually() {
    let dir = temp_test_dir_with_prefix("animate_oob_");
    let input = write_air(dir.path(), true);
    let mut config = small_config(input, dir.path());
    config.frames.start = 2;
    config.frames.end = Some(STEPS + 2);

    let report = Animator::prepare(config).unwrap().run();
    assert!(!report.is_success());
    assert_eq!(report.written.len(), 2);

    let failed: Vec<usize> = report.failed.iter().map(|f| f.index).collect();
    assert_eq!(failed, vec![STEPS, STEPS + 1]);
    assert!(report
        .failed
        .iter()
        .all(|f| matches!(f.error, MapError::MissingData(_))));
}

#[test]
fn test_missing_units_needs_explicit_label() {
    let dir = temp_test_dir_with_prefix("animate_units_");
    let input = write_air(dir.path(), false);

    let err = Animator::prepare(small_config(input.clone(), dir.path())).unwrap_err();
    assert!(matches!(err, MapError::MissingData(_)));

    let mut config = small_config(input, dir.path());
    config.render.label = "500 hPa Temperature".to_string();
    assert!(Animator::prepare(config).is_ok());
}

#[test]
fn test_unknown_variable() {
    let dir = temp_test_dir_with_prefix("animate_var_");
    let input = write_air(dir.path(), true);
    let mut config = small_config(input, dir.path());
    config.input.variable = "shum".to_string();

    let err = Animator::prepare(config).unwrap_err();
    assert!(matches!(err, MapError::MissingData(_)));
}

#[test]
fn test_invalid_range_rejected_before_rendering() {
    let dir = temp_test_dir_with_prefix("animate_range_");
    let input = write_air(dir.path(), true);
    let mut config = small_config(input, dir.path());
    config.render.value_range = renderer::ValueRange::Explicit { min: 10.0, max: 5.0 };

    let err = Animator::prepare(config).unwrap_err();
    assert!(matches!(err, MapError::InvalidRange { .. }));
}
