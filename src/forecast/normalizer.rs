use crate::model::window::PriceWindow;

/// Affine min/max map fit on a single window. Refit on every request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    min: f64,
    max: f64,
}

impl Transform {
    pub fn fit(values: &[f64]) -> Self {
        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(*v), hi.max(*v))
            });
        if !min.is_finite() || !max.is_finite() {
            return Self { min: 0.0, max: 0.0 };
        }
        Self { min, max }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Zero range: every value maps to 0 and back to the window's constant.
    pub fn is_degenerate(&self) -> bool {
        self.max - self.min <= 0.0
    }

    /// Forward map. Values outside the fitted range land outside [0, 1]; no clipping.
    pub fn transform(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        (value - self.min) / (self.max - self.min)
    }

    pub fn inverse(&self, scaled: f64) -> f64 {
        if self.is_degenerate() {
            return self.min;
        }
        scaled * (self.max - self.min) + self.min
    }
}

/// A window mapped into [0, 1] together with the transform that produced it.
#[derive(Debug, Clone)]
pub struct ScaledWindow {
    values: Vec<f64>,
    transform: Transform,
}

impl ScaledWindow {
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Trailing `n` scaled observations, or `None` when the window is shorter.
    pub fn tail(&self, n: usize) -> Option<&[f64]> {
        if n == 0 || self.values.len() < n {
            return None;
        }
        Some(&self.values[self.values.len() - n..])
    }
}

/// Fit on the whole window and scale it. A flat window is not an error; it is
/// reported as a `DegenerateWindow` warning and every value scales to 0.
pub fn fit_transform(window: &PriceWindow) -> (ScaledWindow, Transform) {
    let transform = Transform::fit(window.closes());
    if transform.is_degenerate() {
        tracing::warn!(
            observations = window.len(),
            value = transform.min(),
            "DegenerateWindow: zero-variance price window, scaling to constant 0"
        );
    }
    let values = window
        .closes()
        .iter()
        .map(|v| transform.transform(*v))
        .collect();
    (ScaledWindow { values, transform }, transform)
}

pub fn transform(value: f64, transform: &Transform) -> f64 {
    transform.transform(value)
}

pub fn inverse(value: f64, transform: &Transform) -> f64 {
    transform.inverse(value)
}
