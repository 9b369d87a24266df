//! Live parameter controls.
//!
//! Slider-style setters clamp into fixed ranges; every frame the driver takes
//! an immutable [`SimulationParameters`] snapshot and hands it to the session.

use std::f64::consts::PI;
use std::ops::RangeInclusive;

use cde_simulation::SimulationParameters;

pub const LAMBDA_RANGE: RangeInclusive<f64> = 0.05..=5.0;
pub const CHARGE_RANGE: RangeInclusive<f64> = -5.0..=5.0;
pub const FIELD_RANGE: RangeInclusive<f64> = -5.0..=5.0;
pub const DT_RANGE: RangeInclusive<f64> = 1e-6..=1e-2;
pub const HORIZON_RANGE: RangeInclusive<f64> = 0.1..=1000.0;
pub const ALPHA_RANGE: RangeInclusive<f64> = 0.0..=PI;
pub const BETA_RANGE: RangeInclusive<f64> = 0.0..=(2.0 * PI);
pub const P0_RANGE: RangeInclusive<f64> = 0.0..=10.0;
pub const STEPS_PER_FRAME_RANGE: RangeInclusive<u32> = 1..=10_000;

fn clamp_into(range: &RangeInclusive<f64>, value: f64) -> f64 {
    value.clamp(*range.start(), *range.end())
}

#[derive(Debug, Clone)]
pub struct ParameterControls {
    params: SimulationParameters,
    steps_per_frame: u32,
    dirty_initial_conditions: bool,
}

impl Default for ParameterControls {
    fn default() -> Self {
        Self::new(SimulationParameters::default(), 200)
    }
}

impl ParameterControls {
    pub fn new(params: SimulationParameters, steps_per_frame: u32) -> Self {
        Self {
            params,
            steps_per_frame: steps_per_frame
                .clamp(*STEPS_PER_FRAME_RANGE.start(), *STEPS_PER_FRAME_RANGE.end()),
            dirty_initial_conditions: false,
        }
    }

    /// Parameters to use for the next frame
    pub fn snapshot(&self) -> SimulationParameters {
        self.params
    }

    pub fn steps_per_frame(&self) -> u32 {
        self.steps_per_frame
    }

    /// Whether an initial-condition control moved since the last take; those
    /// only take effect on the next reset.
    pub fn initial_conditions_changed(&self) -> bool {
        self.dirty_initial_conditions
    }

    /// Like [`Self::initial_conditions_changed`], clearing the flag
    pub fn take_initial_conditions_changed(&mut self) -> bool {
        std::mem::take(&mut self.dirty_initial_conditions)
    }

    fn set(&mut self, name: &str, range: &RangeInclusive<f64>, value: f64) -> Option<f64> {
        if !value.is_finite() {
            log::warn!("Ignoring non-finite value for {name}: {value}");
            return None;
        }
        let clamped = clamp_into(range, value);
        if clamped != value {
            log::debug!("Clamped {name} from {value} to {clamped}");
        }
        Some(clamped)
    }

    pub fn set_lambda(&mut self, value: f64) {
        if let Some(v) = self.set("lambda", &LAMBDA_RANGE, value) {
            self.params.lambda = v;
        }
    }

    pub fn set_charge(&mut self, value: f64) {
        if let Some(v) = self.set("q", &CHARGE_RANGE, value) {
            self.params.q = v;
        }
    }

    pub fn set_ex(&mut self, value: f64) {
        if let Some(v) = self.set("ex", &FIELD_RANGE, value) {
            self.params.ex = v;
        }
    }

    pub fn set_ez(&mut self, value: f64) {
        if let Some(v) = self.set("ez", &FIELD_RANGE, value) {
            self.params.ez = v;
        }
    }

    pub fn set_bz(&mut self, value: f64) {
        if let Some(v) = self.set("bz", &FIELD_RANGE, value) {
            self.params.bz = v;
        }
    }

    pub fn set_dt(&mut self, value: f64) {
        if let Some(v) = self.set("dt", &DT_RANGE, value) {
            self.params.dt = v;
        }
    }

    pub fn set_horizon(&mut self, value: f64) {
        if let Some(v) = self.set("horizon", &HORIZON_RANGE, value) {
            self.params.horizon = v;
        }
    }

    pub fn set_init_alpha(&mut self, value: f64) {
        if let Some(v) = self.set("init_alpha", &ALPHA_RANGE, value) {
            self.params.init_alpha = v;
            self.dirty_initial_conditions = true;
        }
    }

    pub fn set_init_beta(&mut self, value: f64) {
        if let Some(v) = self.set("init_beta", &BETA_RANGE, value) {
            self.params.init_beta = v;
            self.dirty_initial_conditions = true;
        }
    }

    pub fn set_init_p0(&mut self, value: f64) {
        if let Some(v) = self.set("init_p0", &P0_RANGE, value) {
            self.params.init_p0 = v;
            self.dirty_initial_conditions = true;
        }
    }

    pub fn set_steps_per_frame(&mut self, value: u32) {
        self.steps_per_frame =
            value.clamp(*STEPS_PER_FRAME_RANGE.start(), *STEPS_PER_FRAME_RANGE.end());
    }
}
