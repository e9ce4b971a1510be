//! The rendered figure: canvas plus the layout needed to interpret it.

use std::sync::atomic::{AtomicUsize, Ordering};

use image::codecs::jpeg::JpegEncoder;
use image::ColorType;
use map_common::{BoundingBox, Color, MapError, MapResult};
use tiny_skia::{IntRect, Pixmap};

use crate::colorbar::ColorbarTicks;
use crate::png::create_png_auto;
use crate::text::{HAlign, Typeface, VAlign};
use crate::viewport::{PixelRect, Viewport};

static LIVE_FIGURES: AtomicUsize = AtomicUsize::new(0);

/// Number of [`RenderedMap`] canvases currently alive in this process.
pub fn live_figures() -> usize {
    LIVE_FIGURES.load(Ordering::SeqCst)
}

/// An in-memory map image.
///
/// Owns the RGBA canvas. Save it, then let it drop; nothing else holds on
/// to the pixels.
#[derive(Debug)]
pub struct RenderedMap {
    pixmap: Pixmap,
    viewport: Viewport,
    extent: BoundingBox,
    boundaries: Vec<f64>,
    ticks: ColorbarTicks,
    colorbar: PixelRect,
    background: Color,
    typeface: Typeface,
    title_px: f32,
}

impl RenderedMap {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        pixmap: Pixmap,
        viewport: Viewport,
        extent: BoundingBox,
        boundaries: Vec<f64>,
        ticks: ColorbarTicks,
        colorbar: PixelRect,
        background: Color,
        typeface: Typeface,
        title_px: f32,
    ) -> Self {
        LIVE_FIGURES.fetch_add(1, Ordering::SeqCst);
        Self {
            pixmap,
            viewport,
            extent,
            boundaries,
            ticks,
            colorbar,
            background,
            typeface,
            title_px,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Visible geographic extent in degrees.
    pub fn extent(&self) -> BoundingBox {
        self.extent
    }

    /// Level boundaries used for shading and the colorbar.
    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    /// Number of color bins between the boundaries.
    pub fn bin_count(&self) -> usize {
        self.boundaries.len().saturating_sub(1)
    }

    pub fn tick_values(&self) -> &[f64] {
        &self.ticks.values
    }

    pub fn tick_labels(&self) -> &[String] {
        &self.ticks.labels
    }

    /// Colorbar body in pixels.
    pub fn colorbar_rect(&self) -> PixelRect {
        self.colorbar
    }

    /// Straight-alpha color of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let p = self.pixmap.pixel(x, y)?.demultiply();
        Some(Color::new(p.red(), p.green(), p.blue(), p.alpha()))
    }

    /// Canvas position of a geographic point, `None` when it is not on the map.
    pub fn pixel_of(&self, lon: f64, lat: f64) -> Option<(f32, f32)> {
        if !lon.is_finite() || !lat.is_finite() || lat.abs() > 90.0 {
            return None;
        }
        let projection = self.viewport.projection();
        let center = projection.central_longitude();
        let mut dlon = projection.relative_longitude(lon);
        let (lo, hi) = (self.extent.min_x - center, self.extent.max_x - center);
        // A right edge at +180 relative maps to the wrapped -180
        if dlon < lo - 1e-9 && dlon + 360.0 <= hi + 1e-9 {
            dlon += 360.0;
        }
        if dlon < lo - 1e-9 || dlon > hi + 1e-9 {
            return None;
        }
        if lat < self.extent.min_y - 1e-9 || lat > self.extent.max_y + 1e-9 {
            return None;
        }
        Some(self.viewport.relative_to_pixel(dlon, lat))
    }

    /// Geographic point under a canvas pixel, `None` off the map.
    pub fn geo_at(&self, px: f32, py: f32) -> Option<(f64, f64)> {
        if !self.viewport.rect().contains(px, py) {
            return None;
        }
        let (x, y) = self.viewport.pixel_to_projected(px, py);
        self.viewport.projection().inverse(x, y)
    }

    /// Draw a title centered above the map frame.
    pub fn draw_title(&mut self, text: &str) {
        let rect = self.viewport.rect();
        let y = rect.y - self.title_px * 0.4;
        self.typeface.draw(
            &mut self.pixmap,
            text,
            rect.center_x(),
            y,
            self.title_px,
            Color::BLACK,
            HAlign::Center,
            VAlign::Bottom,
        );
    }

    /// Crop to the smallest rectangle holding every non-background pixel.
    pub fn cropped_to_content(mut self) -> Self {
        let Some((x0, y0, x1, y1)) = self.content_bounds() else {
            return self;
        };
        let cropped = IntRect::from_ltrb(x0 as i32, y0 as i32, x1 as i32 + 1, y1 as i32 + 1)
            .and_then(|rect| self.pixmap.clone_rect(rect));
        if let Some(pixmap) = cropped {
            self.pixmap = pixmap;
            self.viewport = self.viewport.translated(-(x0 as f32), -(y0 as f32));
            self.colorbar = self.colorbar.translated(-(x0 as f32), -(y0 as f32));
        }
        self
    }

    fn content_bounds(&self) -> Option<(u32, u32, u32, u32)> {
        let bg = self.background.to_rgba();
        let width = self.pixmap.width();
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for (i, p) in self.pixmap.pixels().iter().enumerate() {
            let c = p.demultiply();
            if (c.red(), c.green(), c.blue(), c.alpha()) == bg {
                continue;
            }
            let (x, y) = (i as u32 % width, i as u32 / width);
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
        bounds
    }

    /// Straight-alpha RGBA bytes, row-major.
    ///
    /// With `transparent`, background pixels get alpha 0.
    pub fn rgba_bytes(&self, transparent: bool) -> Vec<u8> {
        let bg = self.background.to_rgba();
        let mut out = Vec::with_capacity(self.pixmap.data().len());
        for p in self.pixmap.pixels() {
            let c = p.demultiply();
            let rgba = (c.red(), c.green(), c.blue(), c.alpha());
            if transparent && rgba == bg {
                out.extend_from_slice(&[0, 0, 0, 0]);
            } else {
                out.extend_from_slice(&[rgba.0, rgba.1, rgba.2, rgba.3]);
            }
        }
        out
    }

    /// PNG bytes with the given DPI recorded in a `pHYs` chunk.
    pub fn encode_png(&self, dpi: u32, transparent: bool) -> MapResult<Vec<u8>> {
        let rgba = self.rgba_bytes(transparent);
        create_png_auto(&rgba, self.width() as usize, self.height() as usize, Some(dpi))
            .map_err(MapError::Encode)
    }

    /// JPEG bytes; translucent pixels are flattened onto white.
    pub fn encode_jpeg(&self, quality: u8) -> MapResult<Vec<u8>> {
        let mut rgb = Vec::with_capacity(self.pixmap.pixels().len() * 3);
        for p in self.pixmap.pixels() {
            // Premultiplied over white: c + (1 - a) * 255
            let inv = 255 - p.alpha() as u16;
            rgb.push((p.red() as u16 + inv).min(255) as u8);
            rgb.push((p.green() as u16 + inv).min(255) as u8);
            rgb.push((p.blue() as u16 + inv).min(255) as u8);
        }

        let mut out = Vec::new();
        JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100))
            .encode(&rgb, self.width(), self.height(), ColorType::Rgb8)
            .map_err(|e| MapError::Encode(format!("JPEG encoding failed: {}", e)))?;
        Ok(out)
    }
}

impl Drop for RenderedMap {
    fn drop(&mut self) {
        LIVE_FIGURES.fetch_sub(1, Ordering::SeqCst);
    }
}
