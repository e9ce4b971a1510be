//! CF packing: `scale_factor`, `add_offset` and missing-value sentinels.

/// Unpacking parameters read from a variable's attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Packing {
    pub scale_factor: f64,
    pub add_offset: f64,
    /// Raw values meaning "no data" (`_FillValue`, `missing_value`)
    pub sentinels: Vec<f64>,
}

impl Default for Packing {
    fn default() -> Self {
        Self {
            scale_factor: 1.0,
            add_offset: 0.0,
            sentinels: Vec::new(),
        }
    }
}

impl Packing {
    fn is_sentinel(&self, raw: f64) -> bool {
        self.sentinels.iter().any(|&s| {
            // Relative match also covers f32 sentinels widened to f64
            raw == s || (s != 0.0 && ((raw - s) / s).abs() < 1e-6)
        })
    }

    /// Unpack raw values; sentinels and non-finite values become NaN.
    pub fn apply(&self, raw: &[f64]) -> Vec<f32> {
        raw.iter()
            .map(|&v| {
                if !v.is_finite() || self.is_sentinel(v) {
                    f32::NAN
                } else {
                    (v * self.scale_factor + self.add_offset) as f32
                }
            })
            .collect()
    }

    pub fn is_identity(&self) -> bool {
        self.scale_factor == 1.0 && self.add_offset == 0.0 && self.sentinels.is_empty()
    }
}
