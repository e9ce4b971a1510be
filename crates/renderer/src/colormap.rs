//! Colormaps and the discrete level-to-color mapping.

use map_common::{Color, MapError, MapResult};
use serde::{Deserialize, Serialize};

/// How a colormap is named in options and config files.
///
/// Either a built-in name (`"viridis"`) or an explicit list of colors,
/// evenly spaced from the low end to the high end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColormapSpec {
    Named(String),
    Custom(Vec<Color>),
}

impl Default for ColormapSpec {
    fn default() -> Self {
        ColormapSpec::Named("viridis".to_string())
    }
}

impl From<&str> for ColormapSpec {
    fn from(name: &str) -> Self {
        ColormapSpec::Named(name.to_string())
    }
}

/// A continuous colormap built from evenly spaced color stops.
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    name: String,
    stops: Vec<Color>,
}

impl Colormap {
    /// Names accepted by [`Colormap::named`].
    pub const BUILTIN: [&'static str; 7] =
        ["viridis", "plasma", "coolwarm", "rdbu_r", "jet", "greys", "ncl_bwr"];

    pub fn from_spec(spec: &ColormapSpec) -> MapResult<Self> {
        match spec {
            ColormapSpec::Named(name) => Self::named(name),
            ColormapSpec::Custom(colors) => Self::custom("custom", colors.clone()),
        }
    }

    /// A built-in colormap, looked up case-insensitively.
    pub fn named(name: &str) -> MapResult<Self> {
        let hex: &[&str] = match name.to_lowercase().as_str() {
            "viridis" => &[
                "#440154", "#482878", "#3E4A89", "#31688E", "#26828E", "#1F9E89", "#35B779",
                "#6DCD59", "#B4DE2C", "#FDE725",
            ],
            "plasma" => &[
                "#0D0887", "#47039F", "#7301A8", "#9C179E", "#BD3786", "#D8576B", "#ED7953",
                "#FA9E3B", "#FDC926", "#F0F921",
            ],
            "coolwarm" => &[
                "#3B4CC0", "#6788EE", "#9ABBFF", "#C9D7F0", "#EDD1C2", "#F7A889", "#E26952",
                "#B40426",
            ],
            "rdbu_r" => &[
                "#053061", "#2166AC", "#4393C3", "#92C5DE", "#D1E5F0", "#F7F7F7", "#FDDBC7",
                "#F4A582", "#D6604D", "#B2182B", "#67001F",
            ],
            "jet" => &[
                "#00007F", "#0000FF", "#007FFF", "#00FFFF", "#7FFF7F", "#FFFF00", "#FF7F00",
                "#FF0000", "#7F0000",
            ],
            "greys" => &["#FFFFFF", "#000000"],
            "ncl_bwr" => &[
                "#1E3CFF", "#4F8DFF", "#96C8FF", "#E1F0FF", "#FFFFFF", "#FFF0B4", "#FFB450",
                "#FF6E28", "#E61E1E", "#A00000",
            ],
            _ => {
                return Err(MapError::InvalidInput(format!(
                    "unknown colormap '{}', expected one of {:?}",
                    name,
                    Self::BUILTIN
                )))
            }
        };

        let stops = hex
            .iter()
            .map(|h| Color::parse(h))
            .collect::<MapResult<Vec<_>>>()?;
        Self::custom(&name.to_lowercase(), stops)
    }

    /// A colormap from explicit stops; needs at least two colors.
    pub fn custom(name: &str, stops: Vec<Color>) -> MapResult<Self> {
        if stops.len() < 2 {
            return Err(MapError::InvalidInput(format!(
                "colormap '{}' needs at least 2 colors, got {}",
                name,
                stops.len()
            )));
        }
        Ok(Self {
            name: name.to_string(),
            stops,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Color at position `t` in [0, 1].
    pub fn sample(&self, t: f64) -> Color {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let segments = (self.stops.len() - 1) as f64;
        let pos = t * segments;
        let idx = (pos.floor() as usize).min(self.stops.len() - 2);
        self.stops[idx].lerp(self.stops[idx + 1], pos - idx as f64)
    }
}

/// Which color band a value falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Under,
    Bin(usize),
    Over,
}

/// Discrete mapping from values to colors.
///
/// `boundaries` split the range into `boundaries.len() - 1` bins, each with
/// one flat color sampled from the colormap. Values below the first
/// boundary get the under color, values above the last get the over color.
#[derive(Debug, Clone)]
pub struct LevelColors {
    boundaries: Vec<f64>,
    colors: Vec<Color>,
    under: Color,
    over: Color,
}

impl LevelColors {
    pub fn new(colormap: &Colormap, boundaries: Vec<f64>, under: Color, over: Color) -> MapResult<Self> {
        if boundaries.len() < 2 {
            return Err(MapError::InvalidInput(format!(
                "need at least 2 level boundaries, got {}",
                boundaries.len()
            )));
        }
        if boundaries.windows(2).any(|w| !(w[0] < w[1])) {
            return Err(MapError::InvalidInput(
                "level boundaries must be strictly increasing".to_string(),
            ));
        }

        let bins = boundaries.len() - 1;
        let colors = (0..bins)
            .map(|i| {
                if bins == 1 {
                    colormap.sample(0.5)
                } else {
                    colormap.sample(i as f64 / (bins - 1) as f64)
                }
            })
            .collect();

        Ok(Self {
            boundaries,
            colors,
            under,
            over,
        })
    }

    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    pub fn bin_count(&self) -> usize {
        self.colors.len()
    }

    pub fn bin_colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn under(&self) -> Color {
        self.under
    }

    pub fn over(&self) -> Color {
        self.over
    }

    /// Band of a value, `None` for NaN.
    pub fn classify(&self, value: f64) -> Option<Band> {
        if value.is_nan() {
            return None;
        }
        let first = self.boundaries[0];
        let last = self.boundaries[self.boundaries.len() - 1];
        if value < first {
            return Some(Band::Under);
        }
        if value > last {
            return Some(Band::Over);
        }
        // partition_point gives the count of boundaries <= value
        let idx = self.boundaries.partition_point(|&b| b <= value);
        Some(Band::Bin((idx - 1).min(self.bin_count() - 1)))
    }

    pub fn band_color(&self, band: Band) -> Color {
        match band {
            Band::Under => self.under,
            Band::Bin(i) => self.colors[i],
            Band::Over => self.over,
        }
    }

    /// Value interval of a band; the open ends are infinite.
    pub fn band_interval(&self, band: Band) -> (f64, f64) {
        match band {
            Band::Under => (f64::NEG_INFINITY, self.boundaries[0]),
            Band::Bin(i) => (self.boundaries[i], self.boundaries[i + 1]),
            Band::Over => (self.boundaries[self.boundaries.len() - 1], f64::INFINITY),
        }
    }

    /// Dense index of a band: under is 0, bins follow, over is last.
    pub fn band_index(&self, band: Band) -> usize {
        match band {
            Band::Under => 0,
            Band::Bin(i) => i + 1,
            Band::Over => self.bin_count() + 1,
        }
    }

    /// Inverse of [`LevelColors::band_index`].
    pub fn band_at(&self, index: usize) -> Band {
        match index {
            0 => Band::Under,
            i if i <= self.bin_count() => Band::Bin(i - 1),
            _ => Band::Over,
        }
    }

    /// Number of bands including under and over.
    pub fn band_count(&self) -> usize {
        self.bin_count() + 2
    }

    pub fn color_for(&self, value: f64) -> Option<Color> {
        self.classify(value).map(|band| self.band_color(band))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_builtins_load() {
        for name in Colormap::BUILTIN {
            let cmap = Colormap::named(name).unwrap();
            assert_eq!(cmap.name(), name);
        }
        assert!(Colormap::named("VIRIDIS").is_ok());
    }

    #[test]
    fn test_unknown_colormap_is_invalid_input() {
        let err = Colormap::named("rainbow-unicorn").unwrap_err();
        assert!(matches!(err, MapError::InvalidInput(_)));
    }

    #[test]
    fn test_sample_endpoints() {
        let cmap = Colormap::named("greys").unwrap();
        assert_eq!(cmap.sample(0.0), Color::WHITE);
        assert_eq!(cmap.sample(1.0), Color::BLACK);
        assert_eq!(cmap.sample(2.0), Color::BLACK);
        assert_eq!(cmap.sample(0.5), Color::rgb(128, 128, 128));
    }

    #[test]
    fn test_custom_spec_from_json() {
        let spec: ColormapSpec = serde_json::from_str(r##"["#0000FF", "white", [255, 0, 0]]"##).unwrap();
        let cmap = Colormap::from_spec(&spec).unwrap();
        assert_eq!(cmap.sample(0.5), Color::WHITE);

        let spec: ColormapSpec = serde_json::from_str("\"coolwarm\"").unwrap();
        assert_eq!(spec, ColormapSpec::from("coolwarm"));
    }

    #[test]
    fn test_classify() {
        let cmap = Colormap::named("greys").unwrap();
        let levels = LevelColors::new(
            &cmap,
            vec![0.0, 1.0, 2.0],
            Color::parse("b").unwrap(),
            Color::parse("k").unwrap(),
        )
        .unwrap();

        assert_eq!(levels.classify(-0.1), Some(Band::Under));
        assert_eq!(levels.classify(0.0), Some(Band::Bin(0)));
        assert_eq!(levels.classify(1.0), Some(Band::Bin(1)));
        assert_eq!(levels.classify(2.0), Some(Band::Bin(1)));
        assert_eq!(levels.classify(2.5), Some(Band::Over));
        assert_eq!(levels.classify(f64::NAN), None);

        assert_eq!(levels.band_color(Band::Bin(0)), Color::WHITE);
        assert_eq!(levels.band_color(Band::Bin(1)), Color::BLACK);
        assert_eq!(levels.color_for(-5.0), Some(Color::rgb(0, 0, 255)));
    }

    #[test]
    fn test_band_index_roundtrip() {
        let cmap = Colormap::named("jet").unwrap();
        let levels = LevelColors::new(&cmap, vec![0.0, 1.0, 2.0, 3.0], Color::WHITE, Color::BLACK).unwrap();
        assert_eq!(levels.band_count(), 5);
        for i in 0..levels.band_count() {
            assert_eq!(levels.band_index(levels.band_at(i)), i);
        }
    }

    #[test]
    fn test_rejects_unsorted_boundaries() {
        let cmap = Colormap::named("jet").unwrap();
        assert!(LevelColors::new(&cmap, vec![1.0, 0.0], Color::WHITE, Color::BLACK).is_err());
        assert!(LevelColors::new(&cmap, vec![1.0], Color::WHITE, Color::BLACK).is_err());
    }
}
