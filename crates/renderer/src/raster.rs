//! Geographic geometry to tiny-skia paths.
//!
//! Geometry is expressed as (lon offset from the central meridian, lat)
//! pairs, unwrapped so that consecutive points never jump by more than
//! 180 degrees. Shapes that cross the map edge are emitted a second time,
//! shifted by a full turn, and the clip mask trims both copies.

use map_common::Color;
use projection::normalize_longitude;
use tiny_skia::{Paint, PathBuilder};

use crate::viewport::Viewport;

/// Unwrap absolute longitudes into offsets from the central meridian.
///
/// The first point is wrapped into [-180, 180); each following point is
/// placed within half a turn of its predecessor.
pub fn unwrap_relative(viewport: &Viewport, points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let projection = viewport.projection();
    let mut out = Vec::with_capacity(points.len());
    let mut prev: Option<(f64, f64)> = None;
    for &(lon, lat) in points {
        let dlon = match prev {
            None => projection.relative_longitude(lon),
            Some((prev_lon, prev_dlon)) => prev_dlon + normalize_longitude(lon - prev_lon),
        };
        out.push((dlon, lat));
        prev = Some((lon, dlon));
    }
    out
}

/// Horizontal shifts (in degrees) needed to cover the visible range.
pub fn seam_shifts(points: &[(f64, f64)]) -> Vec<f64> {
    let (min, max) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(dlon, _)| {
            (lo.min(dlon), hi.max(dlon))
        });
    let mut shifts = vec![0.0];
    if min < -180.0 {
        shifts.push(360.0);
    }
    if max > 180.0 {
        shifts.push(-360.0);
    }
    shifts
}

/// Append a closed polygon (and its seam copies) to `pb`.
pub fn push_polygon(pb: &mut PathBuilder, viewport: &Viewport, ring: &[(f64, f64)]) {
    if ring.len() < 3 {
        return;
    }
    for shift in seam_shifts(ring) {
        for (i, &(dlon, lat)) in ring.iter().enumerate() {
            let (px, py) = viewport.relative_to_pixel(dlon + shift, lat);
            if i == 0 {
                pb.move_to(px, py);
            } else {
                pb.line_to(px, py);
            }
        }
        pb.close();
    }
}

/// Append an open polyline (and its seam copies) to `pb`.
pub fn push_polyline(pb: &mut PathBuilder, viewport: &Viewport, line: &[(f64, f64)]) {
    if line.len() < 2 {
        return;
    }
    for shift in seam_shifts(line) {
        for (i, &(dlon, lat)) in line.iter().enumerate() {
            let (px, py) = viewport.relative_to_pixel(dlon + shift, lat);
            if i == 0 {
                pb.move_to(px, py);
            } else {
                pb.line_to(px, py);
            }
        }
    }
}

/// Insert intermediate points so that no segment spans more than `max_step` degrees.
///
/// Straight lines in lon/lat become curves under Robinson; densifying keeps
/// long segments (graticule lines, coarse coastlines) on the right track.
pub fn densify(line: &[(f64, f64)], max_step: f64) -> Vec<(f64, f64)> {
    let mut out = Vec::with_capacity(line.len());
    for pair in line.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let span = (b.0 - a.0).abs().max((b.1 - a.1).abs());
        let pieces = (span / max_step).ceil().max(1.0) as usize;
        for k in 0..pieces {
            let t = k as f64 / pieces as f64;
            out.push((a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t));
        }
    }
    if let Some(&last) = line.last() {
        out.push(last);
    }
    out
}

/// A vertex carrying a field value, used for band clipping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValuedPoint {
    pub x: f64,
    pub y: f64,
    pub v: f64,
}

impl ValuedPoint {
    pub fn new(x: f64, y: f64, v: f64) -> Self {
        Self { x, y, v }
    }

    fn lerp_at(a: ValuedPoint, b: ValuedPoint, level: f64) -> ValuedPoint {
        let t = (level - a.v) / (b.v - a.v);
        ValuedPoint {
            x: a.x + (b.x - a.x) * t,
            y: a.y + (b.y - a.y) * t,
            v: level,
        }
    }
}

/// Part of a convex polygon where the linearly interpolated value lies in `[lo, hi]`.
///
/// Each half-space `v >= lo` / `v <= hi` is clipped in turn
/// (Sutherland-Hodgman); infinite limits skip their pass.
pub fn clip_to_band(polygon: &[ValuedPoint], lo: f64, hi: f64) -> Vec<ValuedPoint> {
    let mut out = polygon.to_vec();
    if lo.is_finite() {
        out = clip_half(&out, |v| v >= lo, lo);
    }
    if hi.is_finite() {
        out = clip_half(&out, |v| v <= hi, hi);
    }
    out
}

fn clip_half(polygon: &[ValuedPoint], inside: impl Fn(f64) -> bool, level: f64) -> Vec<ValuedPoint> {
    let mut out = Vec::with_capacity(polygon.len() + 2);
    if polygon.is_empty() {
        return out;
    }
    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[(i + 1) % polygon.len()];
        match (inside(a.v), inside(b.v)) {
            (true, true) => out.push(b),
            (true, false) => out.push(ValuedPoint::lerp_at(a, b, level)),
            (false, true) => {
                out.push(ValuedPoint::lerp_at(a, b, level));
                out.push(b);
            }
            (false, false) => {}
        }
    }
    out
}

/// Solid paint. Without anti-aliasing, adjacent cells share edges without seams.
pub fn solid_paint(color: Color, anti_alias: bool) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = anti_alias;
    paint
}
