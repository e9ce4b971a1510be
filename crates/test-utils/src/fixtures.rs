//! Common test fixtures for climate-map tests.

/// Common bounding box definitions for testing.
pub mod bbox {
    use map_common::BoundingBox;

    /// Whole globe, -180..180 x -90..90
    pub const GLOBAL: BoundingBox = BoundingBox {
        min_x: -180.0,
        min_y: -90.0,
        max_x: 180.0,
        max_y: 90.0,
    };

    /// North Atlantic and Europe, the usual regional demo box
    pub const NORTH_ATLANTIC: BoundingBox = BoundingBox {
        min_x: -30.0,
        min_y: 20.0,
        max_x: 30.0,
        max_y: 60.0,
    };

    /// Tropical Pacific, straddling the antimeridian in 0..360 terms
    pub const TROPICAL_PACIFIC: BoundingBox = BoundingBox {
        min_x: 150.0,
        min_y: -20.0,
        max_x: 270.0,
        max_y: 20.0,
    };

    /// Degenerate longitude range
    pub const DEGENERATE: BoundingBox = BoundingBox {
        min_x: 10.0,
        min_y: 10.0,
        max_x: 10.0,
        max_y: 20.0,
    };
}

/// Grid shapes of common climate datasets.
pub mod grid {
    /// NCEP reanalysis 2.5 degree grid (73 latitudes x 144 longitudes)
    pub const NCEP_2P5: (usize, usize) = (73, 144);

    /// T31 spectral model Gaussian grid
    pub const T31: (usize, usize) = (48, 96);

    /// Small grid for fast render tests
    pub const SMALL: (usize, usize) = (19, 36);
}

/// CF time attributes.
pub mod time {
    /// Units attribute of the NCEP reanalysis time axis
    pub const NCEP_UNITS: &str = "hours since 1800-01-01 00:00:0.0";

    /// Hours since 1800 of 2019-01-01 00:00
    pub const NCEP_2019_START: f64 = 1_919_712.0;
}

/// Coastline GeoJSON fixtures.
pub mod coastline {
    /// A square island, a coast line and a point that must be ignored.
    pub const SMALL_FEATURES: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": {"name": "island"},
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[-10, 30], [10, 30], [10, 50], [-10, 50], [-10, 30]]]
      }
    },
    {
      "type": "Feature",
      "properties": {"name": "coast"},
      "geometry": {
        "type": "LineString",
        "coordinates": [[-60, -10], [-40, 0], [-20, 10]]
      }
    },
    {
      "type": "Feature",
      "properties": {},
      "geometry": {"type": "Point", "coordinates": [0, 0]}
    }
  ]
}"#;

    /// A polygon crossing the antimeridian in -180..180 terms.
    pub const DATELINE_ISLAND: &str = r#"{
  "type": "Feature",
  "properties": {},
  "geometry": {
    "type": "MultiPolygon",
    "coordinates": [
      [[[170, -20], [180, -20], [180, -10], [170, -10], [170, -20]]],
      [[[-180, -20], [-170, -20], [-170, -10], [-180, -10], [-180, -20]]]
    ]
  }
}"#;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bboxes_validate() {
        assert!(bbox::GLOBAL.validate().is_ok());
        assert!(bbox::NORTH_ATLANTIC.validate().is_ok());
        assert!(bbox::TROPICAL_PACIFIC.validate().is_ok());
        assert!(bbox::DEGENERATE.validate().is_err());
    }

    #[test]
    fn test_ncep_start_is_2019() {
        let axis = map_common::CfTimeAxis::parse(time::NCEP_UNITS, vec![time::NCEP_2019_START])
            .unwrap();
        assert_eq!(
            map_common::format_title(&axis.datetime(0).unwrap()),
            "2019-01-01 00:00"
        );
    }
}
