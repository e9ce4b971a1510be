//! Mapping between projected coordinates and canvas pixels.

use projection::MapProjection;

/// An axis-aligned rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PixelRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    pub fn to_skia(&self) -> Option<tiny_skia::Rect> {
        tiny_skia::Rect::from_xywh(self.x, self.y, self.width, self.height)
    }
}

/// Projected extent of the map as (min_x, min_y, max_x, max_y).
pub type ProjectedBounds = (f64, f64, f64, f64);

/// Places projected coordinates into the map rectangle of a canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    projection: MapProjection,
    bounds: ProjectedBounds,
    rect: PixelRect,
}

impl Viewport {
    pub fn new(projection: MapProjection, bounds: ProjectedBounds, rect: PixelRect) -> Self {
        Self {
            projection,
            bounds,
            rect,
        }
    }

    pub fn projection(&self) -> &MapProjection {
        &self.projection
    }

    pub fn bounds(&self) -> ProjectedBounds {
        self.bounds
    }

    pub fn rect(&self) -> PixelRect {
        self.rect
    }

    /// Width over height of the projected bounds.
    pub fn aspect(bounds: ProjectedBounds) -> f64 {
        let (min_x, min_y, max_x, max_y) = bounds;
        (max_x - min_x) / (max_y - min_y)
    }

    pub fn projected_to_pixel(&self, x: f64, y: f64) -> (f32, f32) {
        let (min_x, min_y, max_x, max_y) = self.bounds;
        let fx = (x - min_x) / (max_x - min_x);
        let fy = (max_y - y) / (max_y - min_y);
        (
            self.rect.x + (fx * self.rect.width as f64) as f32,
            self.rect.y + (fy * self.rect.height as f64) as f32,
        )
    }

    pub fn pixel_to_projected(&self, px: f32, py: f32) -> (f64, f64) {
        let (min_x, min_y, max_x, max_y) = self.bounds;
        let fx = ((px - self.rect.x) / self.rect.width) as f64;
        let fy = ((py - self.rect.y) / self.rect.height) as f64;
        (min_x + fx * (max_x - min_x), max_y - fy * (max_y - min_y))
    }

    /// Pixel position of a point given as (offset from the central meridian, latitude).
    pub fn relative_to_pixel(&self, dlon: f64, lat: f64) -> (f32, f32) {
        let (x, y) = self.projection.project_relative(dlon, lat);
        self.projected_to_pixel(x, y)
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self {
            rect: self.rect.translated(dx, dy),
            ..*self
        }
    }
}
