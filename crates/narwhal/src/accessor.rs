use std::fmt;
use std::sync::Arc;

pub type DatumFn<T> = Arc<dyn Fn(&T) -> f64 + Send + Sync>;
pub type ResponseFn<T> = Arc<dyn Fn(f64, f64, &T) -> f64 + Send + Sync>;

/// A per-datum numeric value: either fixed for every datum or computed from it.
pub enum Accessor<T> {
    Constant(f64),
    Function(DatumFn<T>),
}

impl<T> Accessor<T> {
    pub fn function(f: impl Fn(&T) -> f64 + Send + Sync + 'static) -> Self {
        Self::Function(Arc::new(f))
    }

    pub fn get(&self, datum: &T) -> f64 {
        match self {
            Self::Constant(v) => *v,
            Self::Function(f) => f(datum),
        }
    }
}

impl<T> Clone for Accessor<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Constant(v) => Self::Constant(*v),
            Self::Function(f) => Self::Function(Arc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for Accessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(v) => f.debug_tuple("Constant").field(v).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
        }
    }
}

impl<T> From<f64> for Accessor<T> {
    fn from(v: f64) -> Self {
        Self::Constant(v)
    }
}

/// How far an item moves toward its target on one axis, given the remaining `delta` and the
/// frame's gravity intensity `k`.
pub enum GravityResponse<T> {
    /// `delta * k`.
    Linear,
    /// `delta * k * m(datum)`; a multiplier of `0` freezes the axis.
    Scaled(Accessor<T>),
    /// Arbitrary `(delta, k, datum) -> displacement`.
    Custom(ResponseFn<T>),
}

impl<T> GravityResponse<T> {
    pub fn custom(f: impl Fn(f64, f64, &T) -> f64 + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    pub fn scaled(f: impl Fn(&T) -> f64 + Send + Sync + 'static) -> Self {
        Self::Scaled(Accessor::function(f))
    }

    pub fn respond(&self, delta: f64, k: f64, datum: &T) -> f64 {
        match self {
            Self::Linear => delta * k,
            Self::Scaled(m) => delta * k * m.get(datum),
            Self::Custom(f) => f(delta, k, datum),
        }
    }
}

impl<T> Default for GravityResponse<T> {
    fn default() -> Self {
        Self::Linear
    }
}

impl<T> Clone for GravityResponse<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Linear => Self::Linear,
            Self::Scaled(m) => Self::Scaled(m.clone()),
            Self::Custom(f) => Self::Custom(Arc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for GravityResponse<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("Linear"),
            Self::Scaled(m) => f.debug_tuple("Scaled").field(m).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl<T> From<f64> for GravityResponse<T> {
    fn from(multiplier: f64) -> Self {
        Self::Scaled(Accessor::Constant(multiplier))
    }
}

#[cfg(test)]
mod tests {
    use super::{Accessor, GravityResponse};

    #[test]
    fn constant_accessor_ignores_the_datum() {
        let a: Accessor<[f64; 3]> = 7.5_f64.into();
        assert_eq!(a.get(&[1.0, 2.0, 3.0]), 7.5);
    }

    #[test]
    fn function_accessor_reads_the_datum() {
        let a = Accessor::function(|d: &[f64; 3]| d[2]);
        assert_eq!(a.get(&[1.0, 2.0, 3.0]), 3.0);
    }

    #[test]
    fn gravity_responses_match_their_formulas() {
        let d = [0.0, 0.0, 4.0];
        assert_eq!(GravityResponse::Linear.respond(10.0, 0.1, &d), 1.0);

        let frozen: GravityResponse<[f64; 3]> = 0.0_f64.into();
        assert_eq!(frozen.respond(10.0, 0.1, &d), 0.0);

        let by_size = GravityResponse::scaled(|d: &[f64; 3]| d[2]);
        assert!((by_size.respond(10.0, 0.1, &d) - 4.0).abs() < 1e-12);

        let capped = GravityResponse::custom(|delta: f64, k: f64, _: &[f64; 3]| {
            (delta * k).clamp(-0.5, 0.5)
        });
        assert_eq!(capped.respond(10.0, 0.1, &d), 0.5);
    }
}
