//! Text drawing for titles, tick labels and graticule labels.
//!
//! Glyphs are rasterized with rusttype via imageproc into a sprite, then
//! composited onto the tiny-skia canvas. DejaVu Sans is embedded and used
//! unless the caller loads another TTF/OTF font.

use std::path::Path;

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use map_common::{Color, MapError, MapResult};
use rusttype::{point, Font, Scale};
use tiny_skia::{IntSize, Pixmap, PixmapPaint, Transform};

/// Embedded font data - DejaVu Sans
const FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// Horizontal anchor of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

/// Vertical anchor of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}

/// A TrueType font used for every text run on a map.
#[derive(Clone)]
pub struct Typeface {
    font: Font<'static>,
}

impl std::fmt::Debug for Typeface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Typeface")
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl Typeface {
    /// The embedded DejaVu Sans.
    pub fn bundled() -> MapResult<Self> {
        Font::try_from_bytes(FONT_DATA)
            .map(|font| Typeface { font })
            .ok_or_else(|| MapError::Render("embedded font could not be parsed".to_string()))
    }

    /// Load a TrueType font from disk.
    pub fn from_file(path: impl AsRef<Path>) -> MapResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        Self::from_bytes(bytes)
            .map_err(|_| MapError::InvalidInput(format!("{} is not a usable font", path.display())))
    }

    pub fn from_bytes(bytes: Vec<u8>) -> MapResult<Self> {
        Font::try_from_vec(bytes)
            .map(|font| Typeface { font })
            .ok_or_else(|| MapError::InvalidInput("font data could not be parsed".to_string()))
    }

    /// Width and height of `text` at `size_px`.
    pub fn measure(&self, text: &str, size_px: f32) -> (f32, f32) {
        let scale = Scale::uniform(size_px);
        let v = self.font.v_metrics(scale);
        let width = self
            .font
            .layout(text, scale, point(0.0, v.ascent))
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0);
        (width, v.ascent - v.descent)
    }

    /// Draw `text` anchored at (x, y).
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &self,
        pixmap: &mut Pixmap,
        text: &str,
        x: f32,
        y: f32,
        size_px: f32,
        color: Color,
        halign: HAlign,
        valign: VAlign,
    ) {
        if text.is_empty() || size_px <= 0.0 {
            return;
        }
        let (width, height) = self.measure(text, size_px);
        let left = match halign {
            HAlign::Left => x,
            HAlign::Center => x - width / 2.0,
            HAlign::Right => x - width,
        };
        let top = match valign {
            VAlign::Top => y,
            VAlign::Middle => y - height / 2.0,
            VAlign::Bottom => y - height,
        };

        draw_sprite_text(pixmap, &self.font, text, left, top, width, height, size_px, color);
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_sprite_text(
    pixmap: &mut Pixmap,
    font: &Font<'static>,
    text: &str,
    left: f32,
    top: f32,
    width: f32,
    height: f32,
    size_px: f32,
    color: Color,
) {
    let sprite_w = width.ceil().max(1.0) as u32 + 2;
    let sprite_h = height.ceil().max(1.0) as u32 + 2;
    let mut sprite = RgbaImage::from_pixel(sprite_w, sprite_h, Rgba([0, 0, 0, 0]));
    draw_text_mut(
        &mut sprite,
        Rgba([color.r, color.g, color.b, color.a]),
        1,
        1,
        Scale::uniform(size_px),
        font,
        text,
    );

    // Blending onto a transparent sprite leaves coverage-weighted channels,
    // which is premultiplied RGBA once color never exceeds alpha.
    let mut data = sprite.into_raw();
    for px in data.chunks_exact_mut(4) {
        let a = px[3];
        px[0] = px[0].min(a);
        px[1] = px[1].min(a);
        px[2] = px[2].min(a);
    }

    let Some(size) = IntSize::from_wh(sprite_w, sprite_h) else {
        return;
    };
    let Some(sprite) = Pixmap::from_vec(data, size) else {
        tracing::warn!(text, "failed to build text sprite");
        return;
    };
    pixmap.draw_pixmap(
        left.round() as i32 - 1,
        top.round() as i32 - 1,
        sprite.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ink(pixmap: &Pixmap) -> usize {
        pixmap.pixels().iter().filter(|p| p.alpha() > 0).count()
    }

    #[test]
    fn test_bundled_measure() {
        let face = Typeface::bundled().unwrap();
        let (w1, h) = face.measure("12.00", 20.0);
        let (w2, _) = face.measure("12.000", 20.0);
        assert!(h >= 20.0 && h < 30.0, "height {}", h);
        assert!(w2 > w1);
        assert_eq!(face.measure("", 20.0).0, 0.0);
    }

    #[test]
    fn test_bundled_draws_ink() {
        let face = Typeface::bundled().unwrap();
        let mut pixmap = Pixmap::new(200, 50).unwrap();
        face.draw(
            &mut pixmap,
            "30°W 20°N",
            100.0,
            25.0,
            20.0,
            Color::BLACK,
            HAlign::Center,
            VAlign::Middle,
        );
        assert!(ink(&pixmap) > 0);
    }

    #[test]
    fn test_similar_characters_render_differently() {
        let face = Typeface::bundled().unwrap();
        let render = |text: &str| {
            let mut pixmap = Pixmap::new(40, 40).unwrap();
            face.draw(&mut pixmap, text, 20.0, 20.0, 24.0, Color::BLACK, HAlign::Center, VAlign::Middle);
            pixmap.data().to_vec()
        };
        assert_ne!(render("5"), render("S"));
        assert_ne!(render("0"), render("O"));
        assert_ne!(render("a"), render("A"));
    }

    #[test]
    fn test_bundled_covers_label_characters() {
        let face = Typeface::bundled().unwrap();
        for ch in "500 hPa Temperature (degC) 30°W 20°N -12.00 K/m²".chars() {
            assert_ne!(face.font.glyph(ch).id().0, 0, "missing glyph for {:?}", ch);
        }
    }

    #[test]
    fn test_invalid_font_bytes() {
        assert!(Typeface::from_bytes(vec![0, 1, 2, 3]).is_err());
    }
}
