//! Observables recorded alongside a trajectory.
//!
//! None of these feed back into the integration; they are for monitoring
//! drift the same way a conservation monitor would.

use crate::rates::kinematic_rate;
use crate::state::PhysicsState;
use crate::vector;

/// Derived quantities of a state at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observables {
    /// H = -p0 ẋ0 + p1 ẋ1 + p2 ẋ2 + p3 ẋ3
    pub hamiltonian: f64,
    /// zr0² + zr1² - zr2² - zr3² + zi0² + zi1² - zi2² - zi3²
    pub chirality: f64,
    /// Sum of squares of all spinor components, equal to ẋ0
    pub spinor_norm: f64,
    /// p0² - p1² - p2² - p3²
    pub mass_shell: f64,
    /// |(ẋ1, ẋ2, ẋ3)|
    pub speed: f64,
}

impl Observables {
    pub fn of(state: &PhysicsState) -> Self {
        let xdot = kinematic_rate(&state.spinor.real, &state.spinor.imag);
        let p = &state.momentum;
        let zr = &state.spinor.real;
        let zi = &state.spinor.imag;

        let hamiltonian = -p[0] * xdot[0] + p[1] * xdot[1] + p[2] * xdot[2] + p[3] * xdot[3];
        let chirality = zr[0] * zr[0] + zr[1] * zr[1] - zr[2] * zr[2] - zr[3] * zr[3]
            + zi[0] * zi[0]
            + zi[1] * zi[1]
            - zi[2] * zi[2]
            - zi[3] * zi[3];

        Self {
            hamiltonian,
            chirality,
            spinor_norm: state.spinor.norm_sq(),
            mass_shell: vector::minkowski_norm_sq(p),
            speed: (xdot[1] * xdot[1] + xdot[2] * xdot[2] + xdot[3] * xdot[3]).sqrt(),
        }
    }
}

/// Tracks drift of the conserved quantities against the values at the start
/// of a run.
#[derive(Debug, Clone)]
pub struct DriftMonitor {
    baseline: Observables,
    pub max_hamiltonian_drift: f64,
    pub max_mass_shell_drift: f64,
    pub max_spinor_norm_drift: f64,
    pub max_speed: f64,
}

impl DriftMonitor {
    pub fn new(initial: &PhysicsState) -> Self {
        Self {
            baseline: Observables::of(initial),
            max_hamiltonian_drift: 0.0,
            max_mass_shell_drift: 0.0,
            max_spinor_norm_drift: 0.0,
            max_speed: 0.0,
        }
    }

    pub fn baseline(&self) -> &Observables {
        &self.baseline
    }

    /// Record the current state and return its observables
    pub fn observe(&mut self, state: &PhysicsState) -> Observables {
        let current = Observables::of(state);
        let h_drift = (current.hamiltonian - self.baseline.hamiltonian).abs();
        let m_drift = (current.mass_shell - self.baseline.mass_shell).abs();
        let n_drift = (current.spinor_norm - self.baseline.spinor_norm).abs();
        self.max_hamiltonian_drift = self.max_hamiltonian_drift.max(h_drift);
        self.max_mass_shell_drift = self.max_mass_shell_drift.max(m_drift);
        self.max_spinor_norm_drift = self.max_spinor_norm_drift.max(n_drift);
        self.max_speed = self.max_speed.max(current.speed);
        current
    }
}
