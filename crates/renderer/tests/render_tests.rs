//! End-to-end tests for map rendering.

use map_common::{add_cyclic_point, BoundingBox, Color, Coordinates, MapError, ScalarField};
use renderer::{
    coastline::LAND_COLOR, render_map, Coastlines, Colormap, LevelColors, MapRenderer,
    ProjectionMode, RenderOptions, ShadingStyle, ValueRange,
};
use test_utils::{
    assert_coords_approx_eq, bbox, coastline, constant_field, curvilinear_coordinates, global_coordinates, grid,
    ramp_field, regional_coordinates, temperature_field, with_nan_block,
};

// ============================================================================
// Helper functions
// ============================================================================

/// Options for a small, fast canvas.
fn small_options() -> RenderOptions {
    RenderOptions {
        figure_size: (6.0, 4.5),
        dpi: 60,
        ..Default::default()
    }
}

fn regional_options(bbox: BoundingBox) -> RenderOptions {
    RenderOptions {
        projection: ProjectionMode::Regional { bbox },
        ..small_options()
    }
}

fn small_global_grid() -> Coordinates {
    let (rows, cols) = grid::SMALL;
    global_coordinates(rows, cols)
}

/// Color under a geographic point.
fn color_at(map: &renderer::RenderedMap, lon: f64, lat: f64) -> Color {
    let (x, y) = map.pixel_of(lon, lat).expect("point on the map");
    map.pixel(x as u32, y as u32).expect("pixel inside canvas")
}

fn level_colors(options: &RenderOptions, boundaries: &[f64]) -> LevelColors {
    let cmap = Colormap::from_spec(&options.colormap).unwrap();
    LevelColors::new(&cmap, boundaries.to_vec(), options.under_color, options.over_color).unwrap()
}

// ============================================================================
// Input validation
// ============================================================================

#[test]
fn test_congruent_regular_grid_renders() {
    let (rows, cols) = grid::SMALL;
    let map = render_map(&temperature_field(rows, cols), &small_global_grid(), &small_options())
        .unwrap();
    assert_eq!((map.width(), map.height()), (360, 270));
}

#[test]
fn test_shape_mismatch_is_invalid_input() {
    let field = constant_field(10, 20, 1.0);
    let coords = Coordinates::curvilinear(vec![0.0; 10 * 21], vec![0.0; 10 * 21], 10, 21).unwrap();
    let err = render_map(&field, &coords, &small_options()).unwrap_err();
    assert!(matches!(err, MapError::InvalidInput(_)), "got {:?}", err);
}

#[test]
fn test_curvilinear_arrays_shorter_than_grid_are_invalid_input() {
    let field = constant_field(10, 20, 1.0);
    let coords = Coordinates::Curvilinear {
        lon: vec![0.0; 190],
        lat: vec![0.0; 190],
        rows: 10,
        cols: 20,
    };
    let err = render_map(&field, &coords, &small_options()).unwrap_err();
    assert!(matches!(err, MapError::InvalidInput(_)), "got {:?}", err);
}

#[test]
fn test_inverted_explicit_range_is_invalid_range() {
    let options = RenderOptions {
        value_range: ValueRange::Explicit { min: 10.0, max: 5.0 },
        ..small_options()
    };
    assert!(matches!(
        MapRenderer::new(options.clone()),
        Err(MapError::InvalidRange { .. })
    ));

    let (rows, cols) = grid::SMALL;
    let err = render_map(&constant_field(rows, cols, 7.0), &small_global_grid(), &options)
        .unwrap_err();
    assert!(matches!(err, MapError::InvalidRange { min, max } if min == 10.0 && max == 5.0));
}

#[test]
fn test_all_nan_field_is_invalid_input() {
    let (rows, cols) = grid::SMALL;
    let field = constant_field(rows, cols, f32::NAN);
    let err = render_map(&field, &small_global_grid(), &small_options()).unwrap_err();
    assert!(matches!(err, MapError::InvalidInput(_)));
}

#[test]
fn test_unknown_colormap_rejected_up_front() {
    let options = RenderOptions {
        colormap: "not-a-colormap".into(),
        ..small_options()
    };
    assert!(MapRenderer::new(options).is_err());
}

// ============================================================================
// Level boundaries
// ============================================================================

#[test]
fn test_auto_range_uses_round_boundaries() {
    let (rows, cols) = grid::SMALL;
    let field = ramp_field(rows, cols, -5.0, 37.0);
    let map = render_map(&field, &small_global_grid(), &small_options()).unwrap();

    let b = map.boundaries();
    assert!(b[0] <= -5.0 && *b.last().unwrap() >= 37.0, "{:?}", b);
    for v in b {
        assert!((v / 5.0 - (v / 5.0).round()).abs() < 1e-9, "{} is not a multiple of 5", v);
    }
    assert!(map.bin_count() <= 10);
}

#[test]
fn test_explicit_range_boundaries_cover_range() {
    let options = RenderOptions {
        value_range: ValueRange::Explicit { min: -12.0, max: 12.0 },
        level_count: 50,
        ..small_options()
    };
    let (rows, cols) = grid::SMALL;
    let map = render_map(&temperature_field(rows, cols), &small_global_grid(), &options).unwrap();

    let b = map.boundaries();
    let step = b[1] - b[0];
    assert!((b[0] - -12.0).abs() <= step + 1e-9);
    assert!((b[b.len() - 1] - 12.0).abs() <= step + 1e-9);
    assert!(map.bin_count() >= 25 && map.bin_count() <= 50, "{} bins", map.bin_count());
    assert!(b.windows(2).all(|w| w[1] > w[0]));
}

#[test]
fn test_tick_labels_have_two_decimals() {
    let (rows, cols) = grid::SMALL;
    let map = render_map(&temperature_field(rows, cols), &small_global_grid(), &small_options())
        .unwrap();

    assert!(!map.tick_labels().is_empty());
    assert_eq!(map.tick_labels().len(), map.tick_values().len());
    for (label, value) in map.tick_labels().iter().zip(map.tick_values()) {
        let decimals = label.split('.').nth(1).expect("decimal point");
        assert_eq!(decimals.len(), 2, "label {}", label);
        assert!((label.parse::<f64>().unwrap() - value).abs() <= 0.005 + 1e-9);
    }
}

// ============================================================================
// Extents
// ============================================================================

#[test]
fn test_regional_extent_matches_bbox() {
    let region = bbox::NORTH_ATLANTIC;
    let field = temperature_field(20, 30);
    let coords = regional_coordinates(region, 20, 30);
    let map = render_map(&field, &coords, &regional_options(region)).unwrap();

    assert_eq!(map.extent(), region);
    assert!(map.pixel_of(-40.0, 40.0).is_none());
    assert!(map.pixel_of(0.0, 65.0).is_none());
    assert!(map.pixel_of(0.0, 40.0).is_some());
}

#[test]
fn test_regional_window_across_dateline() {
    let region = bbox::TROPICAL_PACIFIC;
    let options = RenderOptions {
        graticule: false,
        ..regional_options(region)
    };
    let coords = regional_coordinates(region, 16, 48);
    let map = render_map(&ramp_field(16, 48, 0.0, 30.0), &coords, &options).unwrap();

    assert_eq!(map.extent(), region);
    // -160 is 200 in 0..360 terms
    assert!(map.pixel_of(-160.0, 0.0).is_some());
    assert!(map.pixel_of(100.0, 0.0).is_none());
    assert_ne!(color_at(&map, 201.0, 1.0), Color::WHITE);
    assert_eq!(color_at(&map, 201.0, 1.0), color_at(&map, -159.0, 1.0));
}

#[test]
fn test_global_extent_covers_globe() {
    let (rows, cols) = grid::SMALL;
    let options = RenderOptions {
        central_longitude: 180.0,
        ..small_options()
    };
    let map = render_map(&temperature_field(rows, cols), &small_global_grid(), &options).unwrap();

    let extent = map.extent();
    assert_eq!(extent.width(), 360.0);
    assert_eq!(extent.height(), 180.0);
    assert_eq!(extent.min_x, 0.0);
}

#[test]
fn test_geo_at_inverts_pixel_of() {
    let (rows, cols) = grid::SMALL;
    let map = render_map(&temperature_field(rows, cols), &small_global_grid(), &small_options())
        .unwrap();
    let (x, y) = map.pixel_of(45.0, 20.0).unwrap();
    let (lon, lat) = map.geo_at(x, y).unwrap();
    assert_coords_approx_eq!((lon, lat), (45.0, 20.0), 0.05);
}

// ============================================================================
// Colors
// ============================================================================

#[test]
fn test_constant_field_uses_its_bin_color() {
    let options = RenderOptions {
        value_range: ValueRange::Explicit { min: -12.0, max: 12.0 },
        ..small_options()
    };
    let (rows, cols) = grid::SMALL;
    let map = render_map(&constant_field(rows, cols, 3.3), &small_global_grid(), &options).unwrap();

    let expected = level_colors(&options, map.boundaries()).color_for(3.3).unwrap();
    assert_eq!(color_at(&map, 100.0, -10.0), expected);
    assert_eq!(color_at(&map, -100.0, 45.0), expected);
}

#[test]
fn test_out_of_range_values_use_under_and_over() {
    let options = RenderOptions {
        value_range: ValueRange::Explicit { min: -12.0, max: 12.0 },
        under_color: Color::parse("#EFF5FB").unwrap(),
        over_color: Color::parse("#F8E0E0").unwrap(),
        ..small_options()
    };
    let (rows, cols) = grid::SMALL;

    let cold = render_map(&constant_field(rows, cols, -50.0), &small_global_grid(), &options)
        .unwrap();
    assert_eq!(color_at(&cold, 100.0, -10.0), options.under_color);

    let hot = render_map(&constant_field(rows, cols, 50.0), &small_global_grid(), &options)
        .unwrap();
    assert_eq!(color_at(&hot, 100.0, -10.0), options.over_color);
}

#[test]
fn test_nan_cells_show_background() {
    let (rows, cols) = grid::SMALL;
    // Rows 8..11 are latitudes 10, 0, -10; columns 0..4 are longitudes 0..30
    let field = with_nan_block(&temperature_field(rows, cols), 8..11, 0..4);
    let map = render_map(&field, &small_global_grid(), &small_options()).unwrap();

    assert_eq!(color_at(&map, 20.0, -10.0), Color::WHITE);
    assert_ne!(color_at(&map, 100.0, -10.0), Color::WHITE);
}

#[test]
fn test_filled_contour_uses_band_colors() {
    let options = RenderOptions {
        shading: ShadingStyle::FilledContour,
        ..small_options()
    };
    let (rows, cols) = grid::SMALL;
    let map = render_map(&temperature_field(rows, cols), &small_global_grid(), &options).unwrap();

    let levels = level_colors(&options, map.boundaries());
    for (lon, lat) in [(100.0, -10.0), (-100.0, 45.0), (20.0, -70.0)] {
        let c = color_at(&map, lon, lat);
        assert!(
            levels.bin_colors().contains(&c) || c == levels.under() || c == levels.over(),
            "({}, {}) has non-band color {:?}",
            lon,
            lat,
            c
        );
    }
}

#[test]
fn test_cyclic_grid_has_no_gap_at_prime_meridian() {
    let (rows, cols) = grid::SMALL;
    let (field, coords) =
        add_cyclic_point(&constant_field(rows, cols, 2.0), &small_global_grid()).unwrap();
    let options = RenderOptions {
        value_range: ValueRange::Explicit { min: -12.0, max: 12.0 },
        graticule: false,
        ..small_options()
    };
    let map = render_map(&field, &coords, &options).unwrap();

    // Longitudes 0 and 360 meet in the middle of a map centered on 0
    assert_ne!(color_at(&map, 357.5, 10.0), Color::WHITE);
    assert_ne!(color_at(&map, 0.5, 10.0), Color::WHITE);
    assert_eq!(color_at(&map, 357.5, 10.0), color_at(&map, 2.5, 10.0));
}

#[test]
fn test_curvilinear_grid_renders() {
    let region = bbox::NORTH_ATLANTIC;
    let coords = curvilinear_coordinates(region, 12, 24, 0.5);
    let field = ScalarField::from_fn(12, 24, |r, c| (r as f32) - (c as f32) * 0.5).unwrap();
    let options = RenderOptions {
        shading: ShadingStyle::FilledContour,
        ..regional_options(region)
    };
    let map = render_map(&field, &coords, &options).unwrap();
    assert_ne!(color_at(&map, 5.0, 35.0), Color::WHITE);
}

// ============================================================================
// Coastlines
// ============================================================================

#[test]
fn test_land_fill_covers_island() {
    let region = bbox::NORTH_ATLANTIC;
    let options = RenderOptions {
        land_fill: true,
        coastlines: true,
        ..regional_options(region)
    };
    let coast = Coastlines::from_geojson_str(coastline::SMALL_FEATURES).unwrap();
    let renderer = MapRenderer::new(options).unwrap().with_coastlines(coast);

    let coords = regional_coordinates(region, 20, 30);
    let map = renderer.render(&temperature_field(20, 30), &coords).unwrap();

    assert_eq!(color_at(&map, 5.0, 35.0), LAND_COLOR);
    assert_ne!(color_at(&map, -15.0, 25.0), LAND_COLOR);
}

#[test]
fn test_dateline_island_drawn_on_pacific_centered_map() {
    let options = RenderOptions {
        land_fill: true,
        graticule: false,
        central_longitude: 180.0,
        ..small_options()
    };
    let coast = Coastlines::from_geojson_str(coastline::DATELINE_ISLAND).unwrap();
    assert_eq!(coast.polygon_count(), 2);
    let renderer = MapRenderer::new(options).unwrap().with_coastlines(coast);

    let (rows, cols) = grid::SMALL;
    let map = renderer
        .render(&temperature_field(rows, cols), &small_global_grid())
        .unwrap();

    assert_eq!(color_at(&map, 175.0, -15.0), LAND_COLOR);
    assert_eq!(color_at(&map, -175.0, -15.0), LAND_COLOR);
    assert_ne!(color_at(&map, 150.0, -15.0), LAND_COLOR);
}

#[test]
fn test_coastlines_requested_without_data_still_renders() {
    let options = RenderOptions {
        coastlines: true,
        land_fill: true,
        ..small_options()
    };
    let (rows, cols) = grid::SMALL;
    assert!(render_map(&temperature_field(rows, cols), &small_global_grid(), &options).is_ok());
}

// ============================================================================
// Output
// ============================================================================

#[test]
fn test_encode_png_and_jpeg() {
    let (rows, cols) = grid::SMALL;
    let map = render_map(&temperature_field(rows, cols), &small_global_grid(), &small_options())
        .unwrap();

    let png = map.encode_png(200, false).unwrap();
    assert_eq!(&png[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    assert!(png.windows(4).any(|w| w == b"pHYs"));

    let jpeg = map.encode_jpeg(90).unwrap();
    assert_eq!(&jpeg[0..3], &[0xFF, 0xD8, 0xFF]);
}

#[test]
fn test_transparent_background() {
    let (rows, cols) = grid::SMALL;
    let map = render_map(&temperature_field(rows, cols), &small_global_grid(), &small_options())
        .unwrap();
    let rgba = map.rgba_bytes(true);
    // Top-left corner is background
    assert_eq!(&rgba[0..4], &[0, 0, 0, 0]);
    assert_eq!(map.rgba_bytes(false)[3], 255);
}

#[test]
fn test_crop_keeps_geography() {
    let (rows, cols) = grid::SMALL;
    let map = render_map(&temperature_field(rows, cols), &small_global_grid(), &small_options())
        .unwrap();
    let (w, h) = (map.width(), map.height());
    let before = color_at(&map, 100.0, -10.0);

    let cropped = map.cropped_to_content();
    assert!(cropped.width() < w);
    assert!(cropped.height() <= h);
    assert_eq!(color_at(&cropped, 100.0, -10.0), before);
}

#[test]
fn test_title_draws_above_map() {
    let (rows, cols) = grid::SMALL;
    let mut map = render_map(&temperature_field(rows, cols), &small_global_grid(), &small_options())
        .unwrap();

    let top = map.viewport().rect().y as u32;
    let ink = |m: &renderer::RenderedMap| {
        (0..top.saturating_sub(2))
            .flat_map(|y| (0..m.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| m.pixel(x, y) != Some(Color::WHITE))
            .count()
    };

    let before = ink(&map);
    map.draw_title("2019-03-28 06:00");
    assert!(ink(&map) > before);
}

#[test]
fn test_default_font_distinguishes_lookalike_titles() {
    let (rows, cols) = grid::SMALL;
    let titled = |title: &str| {
        let mut map =
            render_map(&temperature_field(rows, cols), &small_global_grid(), &small_options()).unwrap();
        map.draw_title(title);
        map.pixmap().data().to_vec()
    };

    assert_ne!(titled("500 hPa"), titled("SOO hPa"));
    assert_ne!(titled("temperature"), titled("TEMPERATURE"));
}
