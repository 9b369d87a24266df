//! The integrated state of the classical electron.

use crate::vector::{self, FourVector};

/// A complex 4-component Dirac spinor stored as two real 4-vectors.
///
/// Normalization is not enforced; it drifts freely under integration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinorState {
    pub real: FourVector,
    pub imag: FourVector,
}

impl SpinorState {
    pub fn new(real: FourVector, imag: FourVector) -> Self {
        Self { real, imag }
    }

    /// Sum of squares of all eight real components
    pub fn norm_sq(&self) -> f64 {
        vector::euclidean_norm_sq(&self.real) + vector::euclidean_norm_sq(&self.imag)
    }
}

/// Position, spinor and 4-momentum of the particle at a given time.
///
/// `position[0]` is not spatial (it integrates the dilation factor ẋ⁰);
/// only indices 1..3 are exposed as coordinates. `momentum[0]` is the energy-like
/// component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsState {
    pub position: FourVector,
    pub spinor: SpinorState,
    pub momentum: FourVector,
    pub time: f64,
}

impl PhysicsState {
    /// Create a state at `time = 0`
    pub fn new(position: FourVector, spinor: SpinorState, momentum: FourVector) -> Self {
        Self {
            position,
            spinor,
            momentum,
            time: 0.0,
        }
    }

    /// Minkowski norm of the momentum, p0² - p1² - p2² - p3²
    pub fn mass_shell(&self) -> f64 {
        vector::minkowski_norm_sq(&self.momentum)
    }

    /// Spatial coordinates (x, y, z) = position[1..4]
    pub fn spatial_position(&self) -> [f64; 3] {
        [self.position[1], self.position[2], self.position[3]]
    }

    /// True when no component of the state has overflowed or become NaN
    pub fn is_finite(&self) -> bool {
        vector::is_finite(&self.position)
            && vector::is_finite(&self.spinor.real)
            && vector::is_finite(&self.spinor.imag)
            && vector::is_finite(&self.momentum)
            && self.time.is_finite()
    }

    /// Returns this state moved along `rate` by `h`, time untouched
    pub(crate) fn advanced(&self, rate: &StateDerivative, h: f64) -> Self {
        Self {
            position: vector::offset(&self.position, &rate.position, h),
            spinor: SpinorState {
                real: vector::offset(&self.spinor.real, &rate.spinor_real, h),
                imag: vector::offset(&self.spinor.imag, &rate.spinor_imag, h),
            },
            momentum: vector::offset(&self.momentum, &rate.momentum, h),
            time: self.time,
        }
    }
}

/// Time derivatives of the four coupled quantities at one RK4 stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateDerivative {
    pub position: FourVector,
    pub spinor_real: FourVector,
    pub spinor_imag: FourVector,
    pub momentum: FourVector,
}

impl StateDerivative {
    /// Combine four stage derivatives with the classical RK4 weights 1-2-2-1
    pub fn rk4_blend(k1: &Self, k2: &Self, k3: &Self, k4: &Self) -> Self {
        Self {
            position: vector::rk4_blend(&k1.position, &k2.position, &k3.position, &k4.position),
            spinor_real: vector::rk4_blend(
                &k1.spinor_real,
                &k2.spinor_real,
                &k3.spinor_real,
                &k4.spinor_real,
            ),
            spinor_imag: vector::rk4_blend(
                &k1.spinor_imag,
                &k2.spinor_imag,
                &k3.spinor_imag,
                &k4.spinor_imag,
            ),
            momentum: vector::rk4_blend(&k1.momentum, &k2.momentum, &k3.momentum, &k4.momentum),
        }
    }
}
