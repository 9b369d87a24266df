//! The frame loop around the integrator.
//!
//! A [`Session`] is the application context a front end owns: the one
//! [`PhysicsState`] being advanced, the recorded trajectory, and timing. It
//! never stores parameters; each frame receives a fresh snapshot.

use std::fmt;

use cde_simulation::{
    initial_state, should_stop, step, stop_reason, DriftMonitor, Observables, PhysicsState,
    SimulationError, SimulationParameters, StopReason,
};
use cgmath::Point3;

use crate::profiler::StepProfiler;

/// How the session advances and what it records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    /// Integration steps per call to [`Session::advance_frame`]
    pub steps_per_frame: u32,
    /// Record a sample every this many steps
    pub sample_every: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            steps_per_frame: 200,
            sample_every: 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    Stopped(StopReason),
    /// The state overflowed or became NaN
    NonFinite,
}

impl SessionStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, SessionStatus::Running)
    }
}

/// A vertex of the trajectory line strip, laid out for direct GPU upload
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TrailVertex {
    pub position: [f32; 3],
}

impl From<Point3<f64>> for TrailVertex {
    fn from(point: Point3<f64>) -> Self {
        Self {
            position: [point.x as f32, point.y as f32, point.z as f32],
        }
    }
}

/// State snapshot taken before a step, like the original trajectory record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectorySample {
    pub step: u64,
    pub time: f64,
    pub position: Point3<f64>,
    pub momentum: [f64; 4],
    pub observables: Observables,
}

impl TrajectorySample {
    fn capture(step: u64, state: &PhysicsState) -> Self {
        let (x, y, z) = cde_simulation::position(state);
        Self {
            step,
            time: state.time,
            position: Point3::new(x, y, z),
            momentum: state.momentum,
            observables: Observables::of(state),
        }
    }
}

impl fmt::Display for TrajectorySample {
    /// t H x y z p0 p1 p2 p3 |z|² chirality
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.momentum;
        write!(
            f,
            "{:e} {:e} {:e} {:e} {:e} {:e} {:e} {:e} {:e} {:e} {:e}",
            self.time,
            self.observables.hamiltonian,
            self.position.x,
            self.position.y,
            self.position.z,
            p[0],
            p[1],
            p[2],
            p[3],
            self.observables.spinor_norm,
            self.observables.chirality,
        )
    }
}

pub struct Session {
    state: PhysicsState,
    config: RunConfig,
    status: SessionStatus,
    step_count: u64,
    samples: Vec<TrajectorySample>,
    trail: Vec<TrailVertex>,
    monitor: DriftMonitor,
    pub profiler: StepProfiler,
}

impl Session {
    pub fn new(params: &SimulationParameters, config: RunConfig) -> Result<Self, SimulationError> {
        let state = initial_state(params)?;
        log::info!(
            "New session: p = {:?}, dt = {}, horizon = {}",
            state.momentum,
            params.dt,
            params.horizon
        );
        Ok(Self {
            state,
            config: RunConfig {
                steps_per_frame: config.steps_per_frame.max(1),
                sample_every: config.sample_every.max(1),
            },
            status: SessionStatus::Running,
            step_count: 0,
            samples: Vec::new(),
            trail: Vec::new(),
            monitor: DriftMonitor::new(&state),
            profiler: StepProfiler::new(),
        })
    }

    /// Discard the trajectory and start over from fresh initial conditions
    pub fn reset(&mut self, params: &SimulationParameters) -> Result<(), SimulationError> {
        let mut fresh = Self::new(params, self.config)?;
        fresh.profiler = std::mem::take(&mut self.profiler);
        *self = fresh;
        Ok(())
    }

    pub fn set_steps_per_frame(&mut self, steps: u32) {
        self.config.steps_per_frame = steps.max(1);
    }

    /// Advance up to `steps_per_frame` steps with the given snapshot.
    ///
    /// Stops early as soon as the integrator reports a stop condition or the
    /// state is no longer finite. Calling again after that is a no-op.
    pub fn advance_frame(
        &mut self,
        params: &SimulationParameters,
    ) -> Result<SessionStatus, SimulationError> {
        if !self.status.is_running() {
            return Ok(self.status);
        }
        // nothing is recorded for a snapshot the integrator would reject
        params.validate()?;

        self.profiler.begin_frame();
        let mut advanced = 0;
        while advanced < self.config.steps_per_frame {
            if should_stop(&self.state, params) {
                break;
            }
            if self.step_count % self.config.sample_every == 0 {
                self.record_sample();
            }
            step(&mut self.state, params)?;
            self.step_count += 1;
            advanced += 1;

            if !self.state.is_finite() {
                log::warn!(
                    "State became non-finite at t = {} after {} steps",
                    self.state.time,
                    self.step_count
                );
                self.status = SessionStatus::NonFinite;
                break;
            }
        }
        self.profiler.end_frame(advanced);

        if self.status.is_running() {
            if let Some(reason) = stop_reason(&self.state, params) {
                match reason {
                    StopReason::TimeHorizon => log::info!(
                        "Reached horizon t = {} after {} steps",
                        self.state.time,
                        self.step_count
                    ),
                    StopReason::MassShellViolation => log::warn!(
                        "Mass shell violated (m² = {}) at t = {}",
                        self.state.mass_shell(),
                        self.state.time
                    ),
                }
                self.record_sample();
                self.status = SessionStatus::Stopped(reason);
            }
        }

        if let Some(frame) = self.profiler.latest_sample() {
            log::debug!(
                "Frame {}: {} steps in {:.3} ms, t = {:.4}",
                self.profiler.frame_count(),
                frame.steps,
                frame.wall_time_ms,
                self.state.time
            );
        }
        Ok(self.status)
    }

    /// Run frames until the session stops
    pub fn run_to_completion(
        &mut self,
        params: &SimulationParameters,
    ) -> Result<SessionStatus, SimulationError> {
        loop {
            let status = self.advance_frame(params)?;
            if !status.is_running() {
                return Ok(status);
            }
        }
    }

    fn record_sample(&mut self) {
        let sample = TrajectorySample::capture(self.step_count, &self.state);
        self.monitor.observe(&self.state);
        self.trail.push(TrailVertex::from(sample.position));
        self.samples.push(sample);
    }

    /// Current spatial position
    pub fn position(&self) -> Point3<f64> {
        let (x, y, z) = cde_simulation::position(&self.state);
        Point3::new(x, y, z)
    }

    pub fn state(&self) -> &PhysicsState {
        &self.state
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    pub fn sample_positions(&self) -> Vec<Point3<f64>> {
        self.samples.iter().map(|s| s.position).collect()
    }

    pub fn trail(&self) -> &[TrailVertex] {
        &self.trail
    }

    /// Trail as raw bytes for a vertex buffer
    pub fn trail_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.trail)
    }

    pub fn monitor(&self) -> &DriftMonitor {
        &self.monitor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn short_run(horizon: f64) -> SimulationParameters {
        SimulationParameters {
            horizon,
            ..Default::default()
        }
    }

    #[test]
    fn test_frame_advances_batch() {
        let params = short_run(1.0);
        let mut session = Session::new(
            &params,
            RunConfig {
                steps_per_frame: 50,
                sample_every: 10,
            },
        )
        .unwrap();
        let status = session.advance_frame(&params).unwrap();
        assert_eq!(status, SessionStatus::Running);
        assert_eq!(session.step_count(), 50);
        assert_relative_eq!(session.state().time, 50.0 * params.dt, max_relative = 1e-9);
        // steps 0, 10, 20, 30, 40
        assert_eq!(session.samples().len(), 5);
        assert_eq!(session.samples()[1].step, 10);
        assert_eq!(session.trail().len(), 5);
    }

    #[test]
    fn test_first_sample_is_initial_state() {
        let params = short_run(1.0);
        let mut session = Session::new(&params, RunConfig::default()).unwrap();
        session.advance_frame(&params).unwrap();
        let first = session.samples()[0];
        assert_eq!(first.step, 0);
        assert_eq!(first.time, 0.0);
        assert_eq!(first.position, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(first.observables.hamiltonian, -2.0);
    }

    #[test]
    fn test_runs_to_horizon() {
        let params = short_run(0.05);
        let mut session = Session::new(&params, RunConfig::default()).unwrap();
        let status = session.run_to_completion(&params).unwrap();
        assert_eq!(status, SessionStatus::Stopped(StopReason::TimeHorizon));
        assert!(session.state().time >= params.horizon);
        assert!((500..=501).contains(&session.step_count()));

        // further frames do nothing
        let steps = session.step_count();
        assert_eq!(session.advance_frame(&params).unwrap(), status);
        assert_eq!(session.step_count(), steps);
    }

    #[test]
    fn test_final_state_is_sampled_on_stop() {
        let params = short_run(0.01);
        let mut session = Session::new(&params, RunConfig::default()).unwrap();
        session.run_to_completion(&params).unwrap();
        let last = session.samples().last().copied().unwrap();
        assert_eq!(last.step, session.step_count());
        assert_eq!(last.position, session.position());
    }

    #[test]
    fn test_mass_shell_violation_stops_session() {
        let params = short_run(10.0);
        let mut session = Session::new(&params, RunConfig::default()).unwrap();
        session.state.momentum = [0.0, 0.5, 0.0, 0.0];
        let status = session.advance_frame(&params).unwrap();
        assert_eq!(status, SessionStatus::Stopped(StopReason::MassShellViolation));
        assert_eq!(session.step_count(), 0);
    }

    #[test]
    fn test_invalid_snapshot_is_an_error() {
        let params = short_run(1.0);
        let mut session = Session::new(&params, RunConfig::default()).unwrap();
        let bad = SimulationParameters {
            lambda: 0.0,
            ..params
        };
        assert_eq!(
            session.advance_frame(&bad).unwrap_err(),
            SimulationError::DegenerateCoupling
        );
    }

    #[test]
    fn test_rejected_frame_records_nothing() {
        let params = short_run(1.0);
        let mut session = Session::new(
            &params,
            RunConfig {
                steps_per_frame: 40,
                sample_every: 20,
            },
        )
        .unwrap();
        let bad = SimulationParameters {
            lambda: 0.0,
            ..params
        };
        assert!(session.advance_frame(&bad).is_err());
        assert!(session.samples().is_empty());
        assert!(session.trail().is_empty());
        assert_eq!(session.step_count(), 0);
        assert_eq!(session.profiler.frame_count(), 0);

        session.advance_frame(&params).unwrap();
        let steps: Vec<u64> = session.samples().iter().map(|s| s.step).collect();
        assert_eq!(steps, vec![0, 20]);
        assert_eq!(session.trail().len(), 2);
    }

    #[test]
    fn test_overflow_marks_session_non_finite() {
        let params = SimulationParameters {
            dt: 1e-2,
            ..short_run(1.0)
        };
        let mut session = Session::new(&params, RunConfig::default()).unwrap();
        session.state.spinor.real = [f64::MAX, 0.0, 0.0, 0.0];
        let status = session.advance_frame(&params).unwrap();
        assert_eq!(status, SessionStatus::NonFinite);
    }

    #[test]
    fn test_reset_starts_over() {
        let params = short_run(1.0);
        let mut session = Session::new(&params, RunConfig::default()).unwrap();
        session.advance_frame(&params).unwrap();
        let moved = SimulationParameters {
            init_p0: 0.5,
            ..params
        };
        session.reset(&moved).unwrap();
        assert_eq!(session.step_count(), 0);
        assert!(session.samples().is_empty());
        assert_relative_eq!(session.state().mass_shell(), 1.0, epsilon = 1e-12);
        assert_eq!(session.profiler.frame_count(), 1);
    }

    #[test]
    fn test_trail_bytes_match_vertex_layout() {
        let params = short_run(1.0);
        let mut session = Session::new(&params, RunConfig::default()).unwrap();
        session.advance_frame(&params).unwrap();
        assert_eq!(
            session.trail_bytes().len(),
            session.trail().len() * std::mem::size_of::<TrailVertex>()
        );
        assert_eq!(std::mem::size_of::<TrailVertex>(), 12);
    }

    #[test]
    fn test_sample_row_has_eleven_columns() {
        let params = short_run(1.0);
        let mut session = Session::new(&params, RunConfig::default()).unwrap();
        session.advance_frame(&params).unwrap();
        let row = session.samples()[0].to_string();
        assert_eq!(row.split_whitespace().count(), 11);
    }
}
