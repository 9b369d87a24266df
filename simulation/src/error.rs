//! Error types for the simulation core.

use thiserror::Error;

/// Numeric-domain failures detected when a parameter snapshot is accepted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("spinor coupling lambda must be nonzero")]
    DegenerateCoupling,

    #[error("step size dt must be nonzero")]
    ZeroStepSize,

    #[error("parameter `{name}` is not finite: {value}")]
    NonFiniteParameter { name: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, SimulationError>;
