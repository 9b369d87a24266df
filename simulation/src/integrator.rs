//! Fixed-step RK4 integration of the coupled position/spinor/momentum system.

use std::fmt;

use crate::error::Result;
use crate::field::FieldTensor;
use crate::params::SimulationParameters;
use crate::rates::{kinematic_rate, momentum_rate, spinor_rate};
use crate::state::{PhysicsState, SpinorState, StateDerivative};
use crate::vector::ZERO;

/// Mass-shell value below which the trajectory is considered unphysical
pub const MASS_SHELL_TOLERANCE: f64 = -0.1;

/// Spinor real part every run starts from
pub const INITIAL_SPINOR_REAL: [f64; 4] = [1.0, 0.0, 0.0, -1.0];

/// Why an integration should not continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `time >= horizon`
    TimeHorizon,
    /// p0² - p1² - p2² - p3² fell below [`MASS_SHELL_TOLERANCE`]
    MassShellViolation,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::TimeHorizon => write!(f, "time horizon reached"),
            StopReason::MassShellViolation => write!(f, "mass-shell violation"),
        }
    }
}

/// Parameters with the same values as [`SimulationParameters::default`]
pub fn default_parameters() -> SimulationParameters {
    SimulationParameters::default()
}

/// Build the starting state: particle at the origin, spinor (1, 0, 0, -1),
/// and a unit-mass 4-momentum whose spatial part is given in spherical
/// coordinates by `init_alpha`, `init_beta` and `init_p0`.
pub fn initial_state(params: &SimulationParameters) -> Result<PhysicsState> {
    params.validate()?;

    let (alpha, beta, magnitude) = (params.init_alpha, params.init_beta, params.init_p0);
    let mut momentum = [
        0.0,
        magnitude * alpha.cos(),
        magnitude * alpha.sin() * beta.sin(),
        magnitude * alpha.sin() * beta.cos(),
    ];
    momentum[0] =
        (1.0 + momentum[1] * momentum[1] + momentum[2] * momentum[2] + momentum[3] * momentum[3])
            .sqrt();

    log::trace!("Initial 4-momentum {:?}", momentum);
    Ok(PhysicsState::new(
        ZERO,
        SpinorState::new(INITIAL_SPINOR_REAL, ZERO),
        momentum,
    ))
}

/// Evaluate all rates at one stage: kinematic first, since it feeds the
/// momentum rate.
pub fn compute_derivatives(
    state: &PhysicsState,
    field: &FieldTensor,
    params: &SimulationParameters,
) -> StateDerivative {
    let xdot = kinematic_rate(&state.spinor.real, &state.spinor.imag);
    let (spinor_real, spinor_imag) = spinor_rate(
        &state.spinor.real,
        &state.spinor.imag,
        &state.momentum,
        params.lambda,
    );
    let pdot = momentum_rate(field, &xdot, params.q);

    StateDerivative {
        position: xdot,
        spinor_real,
        spinor_imag,
        momentum: pdot,
    }
}

/// Advance `state` by one RK4 step of size `params.dt` in place.
///
/// The field tensor is built once from the snapshot and shared by all four
/// stages. Returns the same state for chaining.
pub fn step<'a>(
    state: &'a mut PhysicsState,
    params: &SimulationParameters,
) -> Result<&'a mut PhysicsState> {
    params.validate()?;

    let dt = params.dt;
    let field = params.field_tensor();

    let k1 = compute_derivatives(state, &field, params);

    let temp_state = state.advanced(&k1, 0.5 * dt);
    let k2 = compute_derivatives(&temp_state, &field, params);

    let temp_state = state.advanced(&k2, 0.5 * dt);
    let k3 = compute_derivatives(&temp_state, &field, params);

    let temp_state = state.advanced(&k3, dt);
    let k4 = compute_derivatives(&temp_state, &field, params);

    let blended = StateDerivative::rk4_blend(&k1, &k2, &k3, &k4);
    let time = state.time;
    *state = state.advanced(&blended, dt);
    state.time = time + dt;

    Ok(state)
}

/// Classify why the integration should stop, if it should
pub fn stop_reason(state: &PhysicsState, params: &SimulationParameters) -> Option<StopReason> {
    if state.time >= params.horizon {
        Some(StopReason::TimeHorizon)
    } else if state.mass_shell() < MASS_SHELL_TOLERANCE {
        Some(StopReason::MassShellViolation)
    } else {
        None
    }
}

/// True once the time horizon is reached or the mass shell is violated
pub fn should_stop(state: &PhysicsState, params: &SimulationParameters) -> bool {
    stop_reason(state, params).is_some()
}

/// Spatial position (x, y, z); index 0 of the position is never exposed
pub fn position(state: &PhysicsState) -> (f64, f64, f64) {
    (state.position[1], state.position[2], state.position[3])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimulationError;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_initial_state_at_rest() {
        let state = initial_state(&default_parameters()).unwrap();
        assert_eq!(state.position, [0.0; 4]);
        assert_eq!(state.spinor.real, [1.0, 0.0, 0.0, -1.0]);
        assert_eq!(state.spinor.imag, [0.0; 4]);
        assert_eq!(state.momentum, [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(state.time, 0.0);
    }

    #[test]
    fn test_initial_state_is_on_mass_shell() {
        let params = SimulationParameters {
            init_alpha: 0.3,
            init_beta: 1.1,
            init_p0: 2.5,
            ..Default::default()
        };
        let state = initial_state(&params).unwrap();
        assert_relative_eq!(state.mass_shell(), 1.0, epsilon = 1e-12);
        let p3 = state.momentum[1..].iter().map(|c| c * c).sum::<f64>().sqrt();
        assert_relative_eq!(p3, 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_initial_momentum_along_x_when_alpha_zero() {
        let params = SimulationParameters {
            init_alpha: 0.0,
            init_p0: 1.0,
            ..Default::default()
        };
        let state = initial_state(&params).unwrap();
        assert_relative_eq!(state.momentum[1], 1.0);
        assert_relative_eq!(state.momentum[0], 2.0_f64.sqrt());
    }

    #[test]
    fn test_step_advances_time() {
        let params = default_parameters();
        let mut state = initial_state(&params).unwrap();
        step(&mut state, &params).unwrap();
        assert_eq!(state.time, params.dt);
    }

    #[test]
    fn test_step_chains() {
        let params = default_parameters();
        let mut state = initial_state(&params).unwrap();
        let time = step(&mut state, &params)
            .and_then(|s| step(s, &params))
            .map(|s| s.time)
            .unwrap();
        assert_relative_eq!(time, 2.0 * params.dt);
    }

    #[test]
    fn test_step_rejects_zero_lambda_without_mutating() {
        let params = default_parameters();
        let mut state = initial_state(&params).unwrap();
        let before = state;
        let bad = SimulationParameters {
            lambda: 0.0,
            ..params
        };
        assert_eq!(
            step(&mut state, &bad).unwrap_err(),
            SimulationError::DegenerateCoupling
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_initial_state_rejects_zero_lambda() {
        let params = SimulationParameters {
            lambda: 0.0,
            ..Default::default()
        };
        assert!(initial_state(&params).is_err());
    }

    #[test]
    fn test_first_step_moves_along_negative_x() {
        // xdot = (2, -2, 0, 0) for the initial spinor
        let params = default_parameters();
        let mut state = initial_state(&params).unwrap();
        step(&mut state, &params).unwrap();
        let (x, _, _) = position(&state);
        assert!(x < 0.0);
        assert_relative_eq!(x, -2.0 * params.dt, max_relative = 1e-3);
    }

    #[test]
    fn test_stop_reasons() {
        let params = SimulationParameters {
            horizon: 1.0,
            ..Default::default()
        };
        let mut state = initial_state(&params).unwrap();
        assert_eq!(stop_reason(&state, &params), None);

        state.time = 1.0;
        assert_eq!(stop_reason(&state, &params), Some(StopReason::TimeHorizon));

        state.time = 0.0;
        state.momentum = [0.0, 0.2_f64.sqrt(), 0.0, 0.0];
        assert_eq!(
            stop_reason(&state, &params),
            Some(StopReason::MassShellViolation)
        );
    }

    #[test]
    fn test_mass_shell_boundary_is_not_a_stop() {
        let params = default_parameters();
        let mut state = initial_state(&params).unwrap();
        state.momentum = [0.0, 0.0, 0.0, 0.0];
        assert!(!should_stop(&state, &params));

        // the rule is strict: m² equal to the tolerance keeps going
        state.momentum = [0.0, 0.1_f64.sqrt(), 0.0, 0.0];
        assert_eq!(state.mass_shell(), MASS_SHELL_TOLERANCE);
        assert!(!should_stop(&state, &params));
        assert_eq!(stop_reason(&state, &params), None);

        state.momentum[1] = 0.1_f64.sqrt() * (1.0 + 1e-12);
        assert!(should_stop(&state, &params));
    }

    #[test]
    fn test_magnetic_motion_stays_planar_and_bounded() {
        // at rest in BZ = -0.9 the motion stays in the x-y plane and bounded
        let params = SimulationParameters {
            dt: 1e-3,
            horizon: 2.0 * PI,
            ..Default::default()
        };
        let mut state = initial_state(&params).unwrap();
        while !should_stop(&state, &params) {
            step(&mut state, &params).unwrap();
        }
        let (x, y, z) = position(&state);
        assert!(x.abs() < 2.0 && y.abs() < 2.0);
        assert_eq!(z, 0.0);
        assert!(state.mass_shell() > 0.0);
        assert_eq!(stop_reason(&state, &params), Some(StopReason::TimeHorizon));
    }
}
