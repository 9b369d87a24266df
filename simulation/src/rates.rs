//! Right-hand sides of the Barut–Zanghi equations of motion.
//!
//! All three are pure functions of their inputs. The integrator evaluates
//! them once per RK4 stage in the order kinematic → spinor → momentum.

use crate::field::FieldTensor;
use crate::vector::FourVector;

/// Kinematic rate ẋ^μ, the bilinear current built from the spinor.
///
/// `rate[0]` is the sum of squares of all spinor components, so it is never
/// negative and stays near 1 for a near-normalized spinor.
pub fn kinematic_rate(zr: &FourVector, zi: &FourVector) -> FourVector {
    [
        zr[0] * zr[0]
            + zr[1] * zr[1]
            + zr[2] * zr[2]
            + zr[3] * zr[3]
            + zi[0] * zi[0]
            + zi[1] * zi[1]
            + zi[2] * zi[2]
            + zi[3] * zi[3],
        2.0 * (zr[0] * zr[3] + zi[0] * zi[3] + zr[1] * zr[2] + zi[1] * zi[2]),
        2.0 * (zr[0] * zi[3] - zi[0] * zr[3] - zr[1] * zi[2] + zi[1] * zr[2]),
        2.0 * (zr[0] * zr[2] + zi[0] * zi[2] - zr[1] * zr[3] - zi[1] * zi[3]),
    ]
}

/// Spinor rate ż, precession of the bispinor under the 4-momentum.
///
/// Returns `(d/dt real, d/dt imag)`. `lambda` must be nonzero; callers go
/// through [`crate::SimulationParameters::validate`] first.
pub fn spinor_rate(
    zr: &FourVector,
    zi: &FourVector,
    p: &FourVector,
    lambda: f64,
) -> (FourVector, FourVector) {
    let real = [
        (-p[0] * zi[0] + p[1] * zi[3] - p[2] * zr[3] + p[3] * zi[2]) / lambda,
        (-p[0] * zi[1] + p[1] * zi[2] + p[2] * zr[2] - p[3] * zi[3]) / lambda,
        (p[0] * zi[2] - p[1] * zi[1] + p[2] * zr[1] - p[3] * zi[0]) / lambda,
        (p[0] * zi[3] - p[1] * zi[0] - p[2] * zr[0] + p[3] * zi[1]) / lambda,
    ];
    let imag = [
        (-p[0] * zr[0] + p[1] * zr[3] + p[2] * zi[3] + p[3] * zr[2]) / -lambda,
        (-p[0] * zr[1] + p[1] * zr[2] - p[2] * zi[2] - p[3] * zr[3]) / -lambda,
        (p[0] * zr[2] - p[1] * zr[1] - p[2] * zi[1] - p[3] * zr[0]) / -lambda,
        (p[0] * zr[3] - p[1] * zr[0] + p[2] * zi[0] + p[3] * zr[1]) / -lambda,
    ];
    (real, imag)
}

/// Momentum rate ṗ, the Lorentz force q F^μν ẋ_ν.
///
/// The spatial rows carry a minus sign from the (+, -, -, -) metric.
pub fn momentum_rate(field: &FieldTensor, xdot: &FourVector, q: f64) -> FourVector {
    [
        q * field.row_dot(0, xdot),
        -q * field.row_dot(1, xdot),
        -q * field.row_dot(2, xdot),
        -q * field.row_dot(3, xdot),
    ]
}
