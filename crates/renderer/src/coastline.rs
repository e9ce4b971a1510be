//! Coastline and land geometry loaded from GeoJSON.
//!
//! Accepts a FeatureCollection, a single Feature or a bare geometry.
//! `LineString`/`MultiLineString` become outlines; `Polygon`/`MultiPolygon`
//! become filled land and their rings are also drawn as outlines.

use std::path::Path;

use map_common::{Color, MapError, MapResult};
use serde_json::Value;
use tiny_skia::{FillRule, LineCap, LineJoin, Mask, PathBuilder, Pixmap, Stroke, Transform};

use crate::raster::{densify, push_polygon, push_polyline, solid_paint, unwrap_relative};
use crate::viewport::Viewport;

/// Land fill and coastline color.
pub const LAND_COLOR: Color = Color::rgb(0x58, 0x58, 0x58);

/// Longest segment drawn without subdivision, degrees.
const MAX_SEGMENT_DEG: f64 = 1.0;

type Ring = Vec<(f64, f64)>;

/// Coastline outlines and land polygons in lon/lat degrees.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Coastlines {
    lines: Vec<Ring>,
    /// Each polygon is an exterior ring followed by its holes
    polygons: Vec<Vec<Ring>>,
}

impl Coastlines {
    pub fn from_geojson_file(path: impl AsRef<Path>) -> MapResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let coastlines = Self::from_geojson_str(&content)?;
        tracing::info!(
            path = %path.display(),
            lines = coastlines.lines.len(),
            polygons = coastlines.polygons.len(),
            "Loaded coastlines"
        );
        Ok(coastlines)
    }

    pub fn from_geojson_str(json: &str) -> MapResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        let mut coastlines = Coastlines::default();
        coastlines.add_object(&value)?;
        Ok(coastlines)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.polygons.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    fn add_object(&mut self, value: &Value) -> MapResult<()> {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| MapError::InvalidInput("GeoJSON object without a type".to_string()))?;

        match kind {
            "FeatureCollection" => {
                for feature in array_field(value, "features")? {
                    self.add_object(feature)?;
                }
            }
            "Feature" => match value.get("geometry") {
                Some(Value::Null) | None => {}
                Some(geometry) => self.add_object(geometry)?,
            },
            "GeometryCollection" => {
                for geometry in array_field(value, "geometries")? {
                    self.add_object(geometry)?;
                }
            }
            "LineString" => {
                self.lines.push(parse_ring(coordinates(value)?)?);
            }
            "MultiLineString" => {
                for line in as_array(coordinates(value)?)? {
                    self.lines.push(parse_ring(line)?);
                }
            }
            "Polygon" => {
                self.polygons.push(parse_polygon(coordinates(value)?)?);
            }
            "MultiPolygon" => {
                for polygon in as_array(coordinates(value)?)? {
                    self.polygons.push(parse_polygon(polygon)?);
                }
            }
            // Points carry no coastline geometry
            "Point" | "MultiPoint" => {}
            other => {
                return Err(MapError::InvalidInput(format!(
                    "unsupported GeoJSON type '{}'",
                    other
                )))
            }
        }
        Ok(())
    }

    /// Fill land polygons.
    pub fn draw_land(&self, pixmap: &mut Pixmap, viewport: &Viewport, color: Color, mask: Option<&Mask>) {
        let mut pb = PathBuilder::new();
        for polygon in &self.polygons {
            for ring in polygon {
                let ring = unwrap_relative(viewport, &densify(ring, MAX_SEGMENT_DEG));
                push_polygon(&mut pb, viewport, &ring);
            }
        }
        if let Some(path) = pb.finish() {
            let paint = solid_paint(color, true);
            pixmap.fill_path(&path, &paint, FillRule::EvenOdd, Transform::identity(), mask);
        }
    }

    /// Stroke every line and polygon ring.
    pub fn draw_outlines(
        &self,
        pixmap: &mut Pixmap,
        viewport: &Viewport,
        color: Color,
        width: f32,
        mask: Option<&Mask>,
    ) {
        let mut pb = PathBuilder::new();
        let rings = self.polygons.iter().flatten();
        for line in self.lines.iter().chain(rings) {
            let line = unwrap_relative(viewport, &densify(line, MAX_SEGMENT_DEG));
            push_polyline(&mut pb, viewport, &line);
        }
        if let Some(path) = pb.finish() {
            let paint = solid_paint(color, true);
            let stroke = Stroke {
                width,
                line_cap: LineCap::Round,
                line_join: LineJoin::Round,
                ..Stroke::default()
            };
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), mask);
        }
    }
}

fn array_field<'a>(value: &'a Value, key: &str) -> MapResult<&'a Vec<Value>> {
    value
        .get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| MapError::InvalidInput(format!("GeoJSON '{}' must be an array", key)))
}

fn coordinates(value: &Value) -> MapResult<&Value> {
    value
        .get("coordinates")
        .ok_or_else(|| MapError::InvalidInput("GeoJSON geometry without coordinates".to_string()))
}

fn as_array(value: &Value) -> MapResult<&Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| MapError::InvalidInput("GeoJSON coordinates must be arrays".to_string()))
}

fn parse_ring(value: &Value) -> MapResult<Ring> {
    as_array(value)?
        .iter()
        .map(|pos| {
            let pos = as_array(pos)?;
            match (pos.first().and_then(Value::as_f64), pos.get(1).and_then(Value::as_f64)) {
                (Some(lon), Some(lat)) => Ok((lon, lat)),
                _ => Err(MapError::InvalidInput(
                    "GeoJSON position needs numeric [lon, lat]".to_string(),
                )),
            }
        })
        .collect()
}

fn parse_polygon(value: &Value) -> MapResult<Vec<Ring>> {
    as_array(value)?.iter().map(parse_ring).collect()
}
