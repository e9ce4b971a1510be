//! Rendering options.
//!
//! A [`RenderOptions`] value is built once (usually from the driver's YAML
//! config) and passed unchanged to every render call.

use map_common::{BoundingBox, Color, MapError, MapResult};
use serde::{Deserialize, Serialize};

use crate::colormap::ColormapSpec;

/// Value range used to place level boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ValueRange {
    /// Use the finite min/max of each field.
    #[default]
    Auto,
    /// Fixed range shared by every frame.
    Explicit { min: f64, max: f64 },
}

impl ValueRange {
    pub fn validate(&self) -> MapResult<()> {
        match *self {
            ValueRange::Auto => Ok(()),
            ValueRange::Explicit { min, max } => {
                if min.is_finite() && max.is_finite() && min < max {
                    Ok(())
                } else {
                    Err(MapError::InvalidRange { min, max })
                }
            }
        }
    }
}

/// How cells are shaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShadingStyle {
    /// One flat color per grid cell.
    #[default]
    Mesh,
    /// Linear interpolation between cell centers, classified into bands.
    FilledContour,
}

/// Global Robinson map or a regional equirectangular window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ProjectionMode {
    #[default]
    Global,
    Regional { bbox: BoundingBox },
}

/// Graticule line spacing in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraticuleSpacing {
    pub lon: f64,
    pub lat: f64,
}

impl GraticuleSpacing {
    pub const GLOBAL: GraticuleSpacing = GraticuleSpacing { lon: 60.0, lat: 30.0 };
    pub const REGIONAL: GraticuleSpacing = GraticuleSpacing { lon: 20.0, lat: 20.0 };
}

/// Everything that controls how a map looks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub colormap: ColormapSpec,
    pub value_range: ValueRange,
    /// Target number of color bins
    pub level_count: usize,
    pub shading: ShadingStyle,
    pub projection: ProjectionMode,
    /// Central meridian of the global projection, degrees
    pub central_longitude: f64,
    pub coastlines: bool,
    pub land_fill: bool,
    pub under_color: Color,
    pub over_color: Color,
    /// Number of labelled colorbar ticks
    pub bar_tick_count: usize,
    /// Text under the colorbar, usually the variable's units
    pub label: String,
    /// Figure size in inches (width, height)
    pub figure_size: (f32, f32),
    pub dpi: u32,
    pub background: Color,
    pub graticule: bool,
    /// Overrides the per-mode default spacing
    pub graticule_spacing: Option<GraticuleSpacing>,
    /// Colorbar tick and label size, points
    pub font_size: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            colormap: ColormapSpec::default(),
            value_range: ValueRange::Auto,
            level_count: 10,
            shading: ShadingStyle::Mesh,
            projection: ProjectionMode::Global,
            central_longitude: 0.0,
            coastlines: false,
            land_fill: false,
            under_color: Color::rgb(0, 0, 255),
            over_color: Color::BLACK,
            bar_tick_count: 10,
            label: String::new(),
            figure_size: (13.0, 10.0),
            dpi: 100,
            background: Color::WHITE,
            graticule: true,
            graticule_spacing: None,
            font_size: 15.0,
        }
    }
}

/// Largest canvas edge we agree to allocate, in pixels.
const MAX_CANVAS_EDGE: f32 = 20_000.0;

/// Most color bins a map may be split into.
pub const MAX_LEVEL_COUNT: usize = 1_000;

impl RenderOptions {
    /// Check every option that could make a render call fail later.
    pub fn validate(&self) -> MapResult<()> {
        self.value_range.validate()?;

        if self.level_count == 0 || self.level_count > MAX_LEVEL_COUNT {
            return Err(MapError::InvalidInput(format!(
                "level_count must be between 1 and {}, got {}",
                MAX_LEVEL_COUNT, self.level_count
            )));
        }
        if self.bar_tick_count == 0 {
            return Err(MapError::InvalidInput(
                "bar_tick_count must be at least 1".to_string(),
            ));
        }
        if !self.central_longitude.is_finite() {
            return Err(MapError::InvalidInput(
                "central_longitude must be finite".to_string(),
            ));
        }
        if let ProjectionMode::Regional { bbox } = &self.projection {
            bbox.validate()
                .map_err(|e| MapError::InvalidInput(format!("regional bbox: {}", e)))?;
        }
        if let Some(spacing) = &self.graticule_spacing {
            if !(spacing.lon > 0.0 && spacing.lat > 0.0) {
                return Err(MapError::InvalidInput(
                    "graticule spacing must be positive".to_string(),
                ));
            }
        }

        let (w, h) = self.figure_size;
        let (pw, ph) = (w * self.dpi as f32, h * self.dpi as f32);
        if !(pw >= 1.0 && ph >= 1.0 && pw <= MAX_CANVAS_EDGE && ph <= MAX_CANVAS_EDGE) {
            return Err(MapError::InvalidInput(format!(
                "figure {}x{} in at {} dpi gives an unusable {}x{} px canvas",
                w, h, self.dpi, pw, ph
            )));
        }
        if !(self.font_size > 0.0) {
            return Err(MapError::InvalidInput("font_size must be positive".to_string()));
        }
        Ok(())
    }

    /// Graticule spacing, falling back to the default for the projection mode.
    pub fn effective_graticule_spacing(&self) -> GraticuleSpacing {
        self.graticule_spacing.unwrap_or(match self.projection {
            ProjectionMode::Global => GraticuleSpacing::GLOBAL,
            ProjectionMode::Regional { .. } => GraticuleSpacing::REGIONAL,
        })
    }

    pub fn is_global(&self) -> bool {
        matches!(self.projection, ProjectionMode::Global)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(RenderOptions::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_range_is_invalid_range() {
        let options = RenderOptions {
            value_range: ValueRange::Explicit { min: 10.0, max: 5.0 },
            ..Default::default()
        };
        match options.validate() {
            Err(MapError::InvalidRange { min, max }) => {
                assert_eq!(min, 10.0);
                assert_eq!(max, 5.0);
            }
            other => panic!("expected InvalidRange, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_centered_range_is_valid() {
        let range = ValueRange::Explicit { min: -5.0, max: 5.0 };
        assert!(range.validate().is_ok());
        assert!(ValueRange::Explicit { min: 0.0, max: 0.0 }.validate().is_err());
    }

    #[test]
    fn test_bad_regional_bbox() {
        let options = RenderOptions {
            projection: ProjectionMode::Regional {
                bbox: BoundingBox::from_limits((30.0, -30.0), (20.0, 60.0)),
            },
            ..Default::default()
        };
        assert!(matches!(options.validate(), Err(MapError::InvalidInput(_))));
    }

    #[test]
    fn test_level_count_bounds() {
        let mut options = RenderOptions {
            level_count: MAX_LEVEL_COUNT,
            ..Default::default()
        };
        assert!(options.validate().is_ok());

        options.level_count = 1_000_000_000;
        assert!(matches!(options.validate(), Err(MapError::InvalidInput(_))));
        options.level_count = 0;
        assert!(matches!(options.validate(), Err(MapError::InvalidInput(_))));
    }

    #[test]
    fn test_graticule_spacing_defaults() {
        let mut options = RenderOptions::default();
        assert_eq!(options.effective_graticule_spacing(), GraticuleSpacing::GLOBAL);
        options.projection = ProjectionMode::Regional {
            bbox: BoundingBox::from_limits((-30.0, 30.0), (20.0, 60.0)),
        };
        assert_eq!(options.effective_graticule_spacing(), GraticuleSpacing::REGIONAL);
    }

    #[test]
    fn test_deserialize_partial_options() {
        let options: RenderOptions = serde_json::from_str(
            r##"{
                "colormap": "coolwarm",
                "value_range": {"mode": "explicit", "min": -12, "max": 12},
                "level_count": 50,
                "shading": "filled_contour",
                "projection": {"mode": "regional", "bbox": {"min_x": -30, "min_y": 20, "max_x": 30, "max_y": 60}},
                "under_color": "#EFF5FB"
            }"##,
        )
        .unwrap();
        assert_eq!(options.level_count, 50);
        assert_eq!(options.shading, ShadingStyle::FilledContour);
        assert_eq!(options.value_range, ValueRange::Explicit { min: -12.0, max: 12.0 });
        assert_eq!(options.under_color, Color::rgb(0xEF, 0xF5, 0xFB));
        assert_eq!(options.bar_tick_count, 10);
        assert!(options.validate().is_ok());
    }
}
