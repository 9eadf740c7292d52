/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// Render a value for report display: fixed notation for ordinary
/// magnitudes, scientific outside [1e-3, 1e5).
pub fn format_value(v: Real) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }
    let mag = v.abs();
    if mag != 0.0 && !(1e-3..1e5).contains(&mag) {
        format!("{v:.4e}")
    } else {
        format!("{v:.4}")
    }
}
