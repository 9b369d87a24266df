//! The simulation crate integrates the Barut–Zanghi equations of motion of a
//! classical Dirac electron in a constant electromagnetic field.
//!
//! The state is a complex 4-spinor (two real 4-vectors), a 4-momentum and a
//! position. Each call to [`step`] advances it by one fixed RK4 step; the
//! caller decides when to stop from [`should_stop`] and reads coordinates
//! through [`position`].
//!
//! ```
//! use cde_simulation::{default_parameters, initial_state, position, should_stop, step};
//!
//! let mut params = default_parameters();
//! params.horizon = 0.01;
//! let mut state = initial_state(&params)?;
//! while !should_stop(&state, &params) {
//!     step(&mut state, &params)?;
//! }
//! let (x, y, z) = position(&state);
//! assert!(x < 0.0 && y.abs() < 1e-3 && z == 0.0);
//! # Ok::<(), cde_simulation::SimulationError>(())
//! ```

pub mod diagnostics;
pub mod error;
pub mod field;
pub mod integrator;
pub mod params;
pub mod rates;
pub mod state;
pub mod vector;

pub use diagnostics::{DriftMonitor, Observables};
pub use error::{Result, SimulationError};
pub use field::FieldTensor;
pub use integrator::{
    compute_derivatives, default_parameters, initial_state, position, should_stop, step,
    stop_reason, StopReason, MASS_SHELL_TOLERANCE,
};
pub use params::SimulationParameters;
pub use state::{PhysicsState, SpinorState, StateDerivative};
pub use vector::FourVector;
