//! Level boundaries and colorbar ticks.
//!
//! Boundaries are chosen with a MaxNLocator-style "nice number" search: the
//! bin width is taken from the 1-2-2.5-5-10 staircase scaled to the data
//! span, and edges land on integer multiples of that width.

/// Base steps of the nice-number staircase.
const BASE_STEPS: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];

/// Minimum number of boundaries that must fall inside the requested range.
const MIN_TICKS: usize = 2;

/// Picks at most `nbins + 1` human-friendly boundaries spanning a range.
#[derive(Debug, Clone)]
pub struct MaxNLocator {
    nbins: usize,
    extended_steps: Vec<f64>,
}

impl MaxNLocator {
    pub fn new(nbins: usize) -> Self {
        Self {
            nbins: nbins.max(1),
            extended_steps: staircase(&BASE_STEPS),
        }
    }

    pub fn nbins(&self) -> usize {
        self.nbins
    }

    /// Boundaries covering `[vmin, vmax]`.
    ///
    /// The first boundary is at or below `vmin` and the last at or above
    /// `vmax`; every boundary is a multiple of the chosen step (plus the
    /// offset used for ranges far from zero).
    pub fn tick_values(&self, vmin: f64, vmax: f64) -> Vec<f64> {
        let (vmin, vmax) = nonsingular(vmin, vmax, 1e-13, 1e-14);
        self.raw_ticks(vmin, vmax)
    }

    fn raw_ticks(&self, vmin: f64, vmax: f64) -> Vec<f64> {
        let nbins = self.nbins as f64;
        let (scale, offset) = scale_range(vmin, vmax, nbins);
        let vmin = vmin - offset;
        let vmax = vmax - offset;

        let steps: Vec<f64> = self.extended_steps.iter().map(|s| s * scale).collect();
        let raw_step = (vmax - vmin) / nbins;
        let istep = steps
            .iter()
            .position(|&s| s >= raw_step)
            .unwrap_or(steps.len() - 1);

        let mut ticks = Vec::new();
        for &step in steps[..=istep].iter().rev() {
            let best_vmin = (vmin / step).floor() * step;
            let edge = EdgeInteger::new(step, offset);
            let low = edge.le(vmin - best_vmin);
            let high = edge.ge(vmax - best_vmin);

            ticks = (low as i64..=high as i64)
                .map(|i| i as f64 * step + best_vmin)
                .collect();

            let inside = ticks.iter().filter(|&&t| t >= vmin && t <= vmax).count();
            if inside >= MIN_TICKS {
                break;
            }
        }

        ticks.into_iter().map(|t| t + offset).collect()
    }
}

/// `[0.1 * steps[..-1], steps, 10 * steps[1]]`
fn staircase(steps: &[f64]) -> Vec<f64> {
    let mut out: Vec<f64> = steps[..steps.len() - 1].iter().map(|s| s * 0.1).collect();
    out.extend_from_slice(steps);
    out.push(steps[1] * 10.0);
    out
}

/// Order of magnitude of the bin width, and an offset for ranges whose
/// mean is large relative to their span.
fn scale_range(vmin: f64, vmax: f64, n: f64) -> (f64, f64) {
    const THRESHOLD: f64 = 100.0;

    let dv = (vmax - vmin).abs();
    let meanv = (vmax + vmin) / 2.0;
    let offset = if meanv.abs() / dv < THRESHOLD {
        0.0
    } else {
        10f64.powf(meanv.abs().log10().floor()).copysign(meanv)
    };
    let scale = 10f64.powf((dv / n).log10().floor());
    (scale, offset)
}

/// Expand a degenerate interval so that `vmin < vmax`.
fn nonsingular(vmin: f64, vmax: f64, expander: f64, tiny: f64) -> (f64, f64) {
    if !vmin.is_finite() || !vmax.is_finite() {
        return (-expander, expander);
    }
    let (mut vmin, mut vmax) = if vmax < vmin { (vmax, vmin) } else { (vmin, vmax) };

    let max_abs = vmin.abs().max(vmax.abs());
    if max_abs < (1e6 / tiny) * f64::MIN_POSITIVE {
        vmin = -expander;
        vmax = expander;
    } else if vmax - vmin <= max_abs * tiny {
        if vmax == 0.0 && vmin == 0.0 {
            vmin = -expander;
            vmax = expander;
        } else {
            vmin -= expander * vmin.abs();
            vmax += expander * vmax.abs();
        }
    }
    (vmin, vmax)
}

/// Integer multiples of a step with a tolerance for floating-point drift.
struct EdgeInteger {
    step: f64,
    offset: f64,
}

impl EdgeInteger {
    fn new(step: f64, offset: f64) -> Self {
        Self {
            step,
            offset: offset.abs(),
        }
    }

    fn close_to(&self, ms: f64, edge: f64) -> bool {
        let tol = if self.offset > 0.0 {
            let digits = (self.offset / self.step).log10();
            10f64.powf(digits - 12.0).max(1e-10).min(0.4999)
        } else {
            1e-10
        };
        (ms - edge).abs() < tol
    }

    fn divmod(&self, x: f64) -> (f64, f64) {
        let m = x.rem_euclid(self.step);
        let d = ((x - m) / self.step).round();
        (d, m)
    }

    /// Largest n such that n * step <= x.
    fn le(&self, x: f64) -> f64 {
        let (d, m) = self.divmod(x);
        if self.close_to(m / self.step, 1.0) {
            d + 1.0
        } else {
            d
        }
    }

    /// Smallest n such that n * step >= x.
    fn ge(&self, x: f64) -> f64 {
        let (d, m) = self.divmod(x);
        if self.close_to(m / self.step, 0.0) {
            d
        } else {
            d + 1.0
        }
    }
}

/// `count` values evenly spaced from `first` to `last`, inclusive.
pub fn linspace(first: f64, last: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![first],
        _ => {
            let step = (last - first) / (count - 1) as f64;
            (0..count)
                .map(|i| if i == count - 1 { last } else { first + step * i as f64 })
                .collect()
        }
    }
}

/// Colorbar tick label with two decimals.
pub fn format_tick(value: f64) -> String {
    let text = format!("{:.2}", value);
    if text == "-0.00" {
        "0.00".to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_ticks(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "{:?} vs {:?}", actual, expected);
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{:?} vs {:?}", actual, expected);
        }
    }

    #[test]
    fn test_staircase() {
        assert_eq!(
            staircase(&BASE_STEPS),
            vec![0.1, 0.2, 0.25, 0.5, 1.0, 2.0, 2.5, 5.0, 10.0, 20.0]
        );
    }

    #[test]
    fn test_auto_range_multiples_of_five() {
        let ticks = MaxNLocator::new(10).tick_values(-5.0, 37.0);
        let expected: Vec<f64> = (0..10).map(|i| -5.0 + 5.0 * i as f64).collect();
        assert_ticks(&ticks, &expected);
    }

    #[test]
    fn test_symmetric_range_fine_bins() {
        let ticks = MaxNLocator::new(50).tick_values(-12.0, 12.0);
        assert_eq!(ticks.len(), 49);
        assert!((ticks[0] + 12.0).abs() < 1e-9);
        assert!((ticks[48] - 12.0).abs() < 1e-9);
        assert!((ticks[1] - ticks[0] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_unit_range() {
        let ticks = MaxNLocator::new(10).tick_values(0.0, 1.0);
        let expected: Vec<f64> = (0..=10).map(|i| i as f64 * 0.1).collect();
        assert_ticks(&ticks, &expected);
    }

    #[test]
    fn test_kelvin_range_uses_offset() {
        let ticks = MaxNLocator::new(10).tick_values(250.0, 251.0);
        assert!(ticks[0] <= 250.0 + 1e-9);
        assert!(*ticks.last().unwrap() >= 251.0 - 1e-9);
        for pair in ticks.windows(2) {
            assert!((pair[1] - pair[0] - 0.1).abs() < 1e-6);
        }
    }

    #[test]
    fn test_degenerate_range_expands() {
        let ticks = MaxNLocator::new(10).tick_values(3.0, 3.0);
        assert!(ticks.len() >= 2);
        assert!(ticks.iter().all(|t| (t - 3.0).abs() < 1e-9));
    }

    #[test]
    fn test_linspace() {
        assert_ticks(&linspace(-12.0, 12.0, 5), &[-12.0, -6.0, 0.0, 6.0, 12.0]);
        assert_eq!(linspace(1.0, 2.0, 1), vec![1.0]);
        assert!(linspace(1.0, 2.0, 0).is_empty());
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(-12.0), "-12.00");
        assert_eq!(format_tick(2.345), "2.35");
        assert_eq!(format_tick(-1e-17), "0.00");
    }
}
