//! Meridians, parallels and their edge labels.

use map_common::{BoundingBox, Color};
use projection::normalize_longitude;
use tiny_skia::{LineCap, Mask, PathBuilder, Pixmap, Stroke, StrokeDash, Transform};

use crate::options::GraticuleSpacing;
use crate::raster::{push_polyline, solid_paint, unwrap_relative};
use crate::text::{HAlign, Typeface, VAlign};
use crate::viewport::Viewport;

/// Grid lines are drawn `#585858` at 20 % opacity.
pub const GRID_COLOR: Color = Color::rgb(0x58, 0x58, 0x58);
const GRID_ALPHA: f32 = 0.2;

/// Sampling step along graticule lines, degrees.
const SAMPLE_STEP: f64 = 1.0;

/// Dash pattern of a `--` line, in multiples of the line width.
const DASH_ON: f32 = 3.7;
const DASH_OFF: f32 = 1.6;

/// Graticule line positions inside a geographic extent.
#[derive(Debug, Clone, PartialEq)]
pub struct GraticuleLines {
    pub meridians: Vec<f64>,
    pub parallels: Vec<f64>,
}

impl GraticuleLines {
    pub fn within(extent: &BoundingBox, spacing: GraticuleSpacing) -> Self {
        Self {
            meridians: multiples_within(extent.min_x, extent.max_x, spacing.lon),
            parallels: multiples_within(extent.min_y.max(-90.0), extent.max_y.min(90.0), spacing.lat)
                .into_iter()
                .filter(|lat| lat.abs() < 90.0)
                .collect(),
        }
    }
}

/// Integer multiples of `step` in `[lo, hi]`.
fn multiples_within(lo: f64, hi: f64, step: f64) -> Vec<f64> {
    let first = (lo / step - 1e-9).ceil() as i64;
    let last = (hi / step + 1e-9).floor() as i64;
    (first..=last).map(|k| k as f64 * step).collect()
}

/// Text and size used for edge labels.
pub struct LabelStyle<'a> {
    pub typeface: &'a Typeface,
    pub size_px: f32,
}

/// Draw dashed grid lines, optionally labelling the left and bottom edges.
pub fn draw_graticule(
    pixmap: &mut Pixmap,
    viewport: &Viewport,
    extent: &BoundingBox,
    lines: &GraticuleLines,
    line_width: f32,
    mask: Option<&Mask>,
    labels: Option<LabelStyle<'_>>,
) {
    let mut pb = PathBuilder::new();

    for &lon in &lines.meridians {
        let steps = ((extent.max_y - extent.min_y) / SAMPLE_STEP).ceil().max(1.0) as usize;
        let pts: Vec<(f64, f64)> = (0..=steps)
            .map(|k| {
                let lat = extent.min_y + (extent.max_y - extent.min_y) * k as f64 / steps as f64;
                (lon, lat)
            })
            .collect();
        push_polyline(&mut pb, viewport, &unwrap_relative(viewport, &pts));
    }

    for &lat in &lines.parallels {
        let steps = ((extent.max_x - extent.min_x) / SAMPLE_STEP).ceil().max(1.0) as usize;
        let pts: Vec<(f64, f64)> = (0..=steps)
            .map(|k| {
                let lon = extent.min_x + (extent.max_x - extent.min_x) * k as f64 / steps as f64;
                (lon, lat)
            })
            .collect();
        push_polyline(&mut pb, viewport, &unwrap_relative(viewport, &pts));
    }

    if let Some(path) = pb.finish() {
        let paint = solid_paint(GRID_COLOR.with_alpha(GRID_ALPHA), true);
        let stroke = Stroke {
            width: line_width,
            line_cap: LineCap::Butt,
            dash: StrokeDash::new(vec![DASH_ON * line_width, DASH_OFF * line_width], 0.0),
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), mask);
    }

    if let Some(style) = labels {
        draw_edge_labels(pixmap, viewport, extent, lines, &style);
    }
}

fn draw_edge_labels(
    pixmap: &mut Pixmap,
    viewport: &Viewport,
    extent: &BoundingBox,
    lines: &GraticuleLines,
    style: &LabelStyle<'_>,
) {
    let rect = viewport.rect();
    let gap = style.size_px * 0.3;
    let projection = viewport.projection();

    for &lon in &lines.meridians {
        let rel = unwrap_relative(viewport, &[(extent.min_x, extent.min_y), (lon, extent.min_y)]);
        let (px, _) = viewport.relative_to_pixel(rel[1].0, extent.min_y);
        if px < rect.x - 0.5 || px > rect.right() + 0.5 {
            continue;
        }
        style.typeface.draw(
            pixmap,
            &format_longitude(lon),
            px,
            rect.bottom() + gap,
            style.size_px,
            Color::BLACK,
            HAlign::Center,
            VAlign::Top,
        );
    }

    for &lat in &lines.parallels {
        let (_, py) = viewport.relative_to_pixel(projection.relative_longitude(extent.min_x), lat);
        style.typeface.draw(
            pixmap,
            &format_latitude(lat),
            rect.x - gap,
            py,
            style.size_px,
            Color::BLACK,
            HAlign::Right,
            VAlign::Middle,
        );
    }
}

fn format_degrees(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{:.0}", value.round())
    } else {
        let text = format!("{:.2}", value);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// `30°W`, `0°`, `120°E`, `180°`.
pub fn format_longitude(lon: f64) -> String {
    let lon = normalize_longitude(lon);
    if lon.abs() < 1e-9 {
        "0°".to_string()
    } else if (lon.abs() - 180.0).abs() < 1e-9 {
        "180°".to_string()
    } else if lon < 0.0 {
        format!("{}°W", format_degrees(-lon))
    } else {
        format!("{}°E", format_degrees(lon))
    }
}

/// `20°N`, `0°`, `40°S`.
pub fn format_latitude(lat: f64) -> String {
    if lat.abs() < 1e-9 {
        "0°".to_string()
    } else if lat < 0.0 {
        format!("{}°S", format_degrees(-lat))
    } else {
        format!("{}°N", format_degrees(lat))
    }
}
