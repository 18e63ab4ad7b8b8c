/// Equal-width histogram over `[min, max]` of the data.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub start: f64,
    pub width: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width bins. The last bin is closed so
    /// the maximum lands in it. A constant sample gets a unit-wide range
    /// centred on the value.
    pub fn new(values: &[f64], bins: usize) -> Option<Self> {
        if values.is_empty() || bins == 0 {
            return None;
        }
        let (mut lo, mut hi) = min_max(values);
        if hi - lo <= f64::EPSILON {
            lo -= 0.5;
            hi += 0.5;
        }
        let width = (hi - lo) / bins as f64;
        let mut counts = vec![0; bins];
        for v in values {
            let i = (((v - lo) / width) as usize).min(bins - 1);
            counts[i] += 1;
        }
        Some(Histogram {
            start: lo,
            width,
            counts,
        })
    }

    pub fn end(&self) -> f64 {
        self.start + self.width * self.counts.len() as f64
    }

    /// `(left, right, count)` per bin.
    pub fn bars(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.counts.iter().enumerate().map(|(i, &n)| {
            let left = self.start + self.width * i as f64;
            (left, left + self.width, n)
        })
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

/// Scott's rule bandwidth: sample std · n^(-1/5). `None` for fewer than two
/// points or zero spread.
pub fn scott_bandwidth(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let bw = var.sqrt() * (n as f64).powf(-0.2);
    (bw > 0.0).then_some(bw)
}

/// Gaussian kernel density estimate on `points` evenly spaced samples across
/// `[lo, hi]`, scaled by `scale` (pass `n · bin_width` to overlay counts).
pub fn kde_curve(values: &[f64], lo: f64, hi: f64, points: usize, scale: f64) -> Vec<(f64, f64)> {
    let Some(h) = scott_bandwidth(values) else {
        return Vec::new();
    };
    let n = values.len() as f64;
    let norm = 1.0 / (n * h * (2.0 * std::f64::consts::PI).sqrt());
    let step = if points > 1 {
        (hi - lo) / (points - 1) as f64
    } else {
        0.0
    };
    (0..points)
        .map(|i| {
            let x = lo + step * i as f64;
            let density: f64 = values
                .iter()
                .map(|v| (-0.5 * ((x - v) / h).powi(2)).exp())
                .sum::<f64>()
                * norm;
            (x, density * scale)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_counts_every_value() {
        let values = [1.0, 2.0, 2.5, 3.0, 9.0, 10.0];
        let h = Histogram::new(&values, 3).unwrap();
        assert_eq!(h.start, 1.0);
        assert_eq!(h.width, 3.0);
        assert_eq!(h.counts, vec![4, 0, 2]);
        assert_eq!(h.end(), 10.0);
        assert_eq!(h.max_count(), 4);
    }

    #[test]
    fn constant_sample_gets_a_range() {
        let h = Histogram::new(&[5.0, 5.0], 2).unwrap();
        assert_eq!(h.start, 4.5);
        assert_eq!(h.counts, vec![0, 2]);
    }

    #[test]
    fn empty_input_has_no_histogram() {
        assert!(Histogram::new(&[], 10).is_none());
        assert!(Histogram::new(&[1.0], 0).is_none());
    }

    #[test]
    fn kde_integrates_to_about_one() {
        let values = [0.0, 1.0, 1.5, 2.0, 4.0];
        let pts = kde_curve(&values, -10.0, 14.0, 2001, 1.0);
        let dx = pts[1].0 - pts[0].0;
        let area: f64 = pts.iter().map(|(_, y)| y * dx).sum();
        assert!((area - 1.0).abs() < 1e-3, "area was {area}");
    }

    #[test]
    fn kde_needs_spread() {
        assert!(kde_curve(&[3.0, 3.0], 0.0, 6.0, 10, 1.0).is_empty());
        assert!(scott_bandwidth(&[1.0]).is_none());
    }
}
