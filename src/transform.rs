//! The numeric transform collaborator.
//!
//! The latest GINI value can be forwarded to an external helper that turns it into an
//! integer. Callers own the transform handle they create and pass it in explicitly; any
//! failure comes back as [`Unavailable`].

use thiserror::Error;

/// Why a transform could not produce a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Unavailable {
    /// The helper (library, process) is not present.
    #[error("transform helper not available: {0}")]
    Missing(String),
    /// The helper was reached but the call failed.
    #[error("transform call failed: {0}")]
    CallFailed(String),
    /// The input cannot be represented by the helper's signature.
    #[error("value {0} cannot be transformed")]
    InvalidInput(String),
}

/// Typed entry point of a numeric helper: one float in, one integer out.
pub trait NumericTransform {
    fn transform(&self, value: f64) -> Result<i64, Unavailable>;
}

/// In-process equivalent of the native helper.
///
/// Works in single precision with a 32-bit result and rounds half away from zero:
/// `42.5 -> 43`, `42.3 -> 42`, `-42.5 -> -43`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundingTransform;

impl NumericTransform for RoundingTransform {
    fn transform(&self, value: f64) -> Result<i64, Unavailable> {
        let v = value as f32;
        if !v.is_finite() {
            return Err(Unavailable::InvalidInput(value.to_string()));
        }
        let shifted = if v >= 0.0 { v + 0.5 } else { v - 0.5 };
        // Truncation toward zero, as a C (int) cast does.
        let t = shifted.trunc();
        if t < i32::MIN as f32 || t >= i32::MAX as f32 {
            return Err(Unavailable::InvalidInput(value.to_string()));
        }
        Ok(t as i32 as i64)
    }
}

/// A transform that is never available, e.g. when the helper was disabled at startup.
#[derive(Debug, Clone)]
pub struct NoTransform {
    reason: String,
}

impl NoTransform {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl NumericTransform for NoTransform {
    fn transform(&self, _value: f64) -> Result<i64, Unavailable> {
        Err(Unavailable::Missing(self.reason.clone()))
    }
}

/// Run `transform`, logging instead of propagating a failure.
pub fn apply<T: NumericTransform + ?Sized>(transform: &T, value: f64) -> Option<i64> {
    match transform.transform(value) {
        Ok(out) => {
            log::debug!("transform({}) = {}", value, out);
            Some(out)
        }
        Err(e) => {
            log::warn!("transform unavailable for {}: {}", value, e);
            None
        }
    }
}
