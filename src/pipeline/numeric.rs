use serde::{Deserialize, Serialize};

/// Median of the given values, `None` when empty. Even counts average the
/// two middle values.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Observed `[min, max]` range of a numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub fn new(min: f64, max: f64) -> Self {
        Bounds { min, max }
    }

    /// Range of the values, `None` when empty.
    pub fn of(values: &[f64]) -> Option<Self> {
        let (first, rest) = values.split_first()?;
        let bounds = rest.iter().fold(Bounds::new(*first, *first), |b, v| {
            Bounds::new(b.min.min(*v), b.max.max(*v))
        });
        Some(bounds)
    }

    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    /// Min-max scale into `[0, 1]`. A degenerate range maps everything to 0.
    pub fn scale(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            0.0
        } else {
            (value - self.min) / (self.max - self.min)
        }
    }

    pub fn clip(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }

    /// Map a fraction of this range onto `target`.
    pub fn remap_into(&self, value: f64, target: &Bounds) -> f64 {
        let fraction = self.scale(self.clip(value));
        target.min + fraction * (target.max - target.min)
    }
}

/// Min-max normalize a column that may contain gaps. Gaps stay `None`;
/// a constant or empty column normalizes to 0.
pub fn min_max_normalize(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    match Bounds::of(&present) {
        Some(bounds) => values.iter().map(|v| v.map(|x| bounds.scale(x))).collect(),
        None => values.iter().map(|_| None).collect(),
    }
}
