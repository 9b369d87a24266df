//! Parameter snapshot read by every step.

use std::f64::consts::PI;

use crate::error::{Result, SimulationError};
use crate::field::FieldTensor;

/// Physical and numerical parameters of a run.
///
/// The snapshot is immutable for the duration of one step but may be
/// replaced between steps, e.g. from live controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParameters {
    /// Spinor coupling scale, must be nonzero
    pub lambda: f64,
    /// Charge coupling
    pub q: f64,
    /// Electric field, x component
    pub ex: f64,
    /// Electric field, z component
    pub ez: f64,
    /// Magnetic field, z component
    pub bz: f64,
    /// Step size, signed and nonzero
    pub dt: f64,
    /// Time horizon
    pub horizon: f64,
    /// Polar angle of the initial 3-momentum, measured from the x axis
    pub init_alpha: f64,
    /// Azimuthal angle of the initial 3-momentum in the y-z plane
    pub init_beta: f64,
    /// Magnitude of the initial 3-momentum
    pub init_p0: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            lambda: 1.0,
            q: 1.0,
            ex: 0.0,
            ez: 0.0,
            bz: -0.9,
            dt: 1e-4,
            horizon: 30.0 * PI,
            init_alpha: 0.5 * PI,
            init_beta: 0.0,
            init_p0: 0.0,
        }
    }
}

impl SimulationParameters {
    /// Reject snapshots the integrator cannot evaluate
    pub fn validate(&self) -> Result<()> {
        self.check().map_err(|err| {
            log::debug!("Rejected parameters {:?}: {}", self, err);
            err
        })
    }

    fn check(&self) -> Result<()> {
        let named = [
            ("lambda", self.lambda),
            ("q", self.q),
            ("ex", self.ex),
            ("ez", self.ez),
            ("bz", self.bz),
            ("dt", self.dt),
            ("init_alpha", self.init_alpha),
            ("init_beta", self.init_beta),
            ("init_p0", self.init_p0),
        ];
        for (name, value) in named {
            if !value.is_finite() {
                return Err(SimulationError::NonFiniteParameter { name, value });
            }
        }
        // an infinite horizon just means "never stop on time"
        if self.horizon.is_nan() {
            return Err(SimulationError::NonFiniteParameter {
                name: "horizon",
                value: self.horizon,
            });
        }
        if self.lambda == 0.0 {
            return Err(SimulationError::DegenerateCoupling);
        }
        if self.dt == 0.0 {
            return Err(SimulationError::ZeroStepSize);
        }
        Ok(())
    }

    /// Field tensor for the current E/B components
    pub fn field_tensor(&self) -> FieldTensor {
        let field = FieldTensor::constant_eb(self.ex, self.ez, self.bz);
        debug_assert!(field.is_antisymmetric());
        field
    }
}
