use crate::DfError;

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

impl Tolerances {
    /// Tolerance for comparing cross-section areas coming from host geometry.
    ///
    /// Host dimensions pass through a feet → meters conversion, so exact
    /// equality of two "equal" sections is not guaranteed.
    pub const fn geometric() -> Self {
        Self {
            abs: 1e-9,
            rel: 1e-6,
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

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, DfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(DfError::NonFinite { what, value: v })
    }
}

/// Round to a fixed number of decimal places.
pub fn round_to(v: Real, decimals: u32) -> Real {
    let scale = 10_f64.powi(decimals as i32);
    (v * scale).round() / scale
}
