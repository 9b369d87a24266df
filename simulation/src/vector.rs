//! Plain four-component vectors.
//!
//! Index 0 is the time-like slot when a vector holds a spacetime position or
//! a 4-momentum. The same type also stores one real or imaginary half of the
//! spinor, where no index is special.

/// An ordered tuple of 4 real numbers.
pub type FourVector = [f64; 4];

/// The zero vector
pub const ZERO: FourVector = [0.0; 4];

/// Minkowski norm with signature (+, -, -, -): v0² - v1² - v2² - v3²
pub fn minkowski_norm_sq(v: &FourVector) -> f64 {
    v[0] * v[0] - v[1] * v[1] - v[2] * v[2] - v[3] * v[3]
}

/// Euclidean sum of squares over all four components
pub fn euclidean_norm_sq(v: &FourVector) -> f64 {
    v.iter().map(|c| c * c).sum()
}

/// Dot product without any metric
pub fn dot(a: &FourVector, b: &FourVector) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
}

/// Returns `base + scale * delta`, component-wise
pub fn offset(base: &FourVector, delta: &FourVector, scale: f64) -> FourVector {
    let mut out = *base;
    for i in 0..4 {
        out[i] += scale * delta[i];
    }
    out
}

/// The RK4 weighted average `(k1 + 2*k2 + 2*k3 + k4) / 6`
pub fn rk4_blend(
    k1: &FourVector,
    k2: &FourVector,
    k3: &FourVector,
    k4: &FourVector,
) -> FourVector {
    let mut out = ZERO;
    for i in 0..4 {
        out[i] = (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]) / 6.0;
    }
    out
}

/// True when every component is neither NaN nor infinite
pub fn is_finite(v: &FourVector) -> bool {
    v.iter().all(|c| c.is_finite())
}
