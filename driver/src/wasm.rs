//! Browser binding: the web page owns the animation loop and calls into a
//! [`Simulator`] once per frame.

use wasm_bindgen::prelude::*;

use crate::controls::ParameterControls;
use crate::session::{RunConfig, Session};

#[wasm_bindgen]
pub struct Simulator {
    controls: ParameterControls,
    session: Session,
}

#[wasm_bindgen]
impl Simulator {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<Simulator, JsError> {
        let controls = ParameterControls::default();
        let config = RunConfig {
            steps_per_frame: controls.steps_per_frame(),
            ..RunConfig::default()
        };
        let session = Session::new(&controls.snapshot(), config)?;
        Ok(Self { controls, session })
    }

    /// Start a new trajectory from the current initial conditions
    pub fn reset(&mut self) -> Result<(), JsError> {
        self.controls.take_initial_conditions_changed();
        self.session.reset(&self.controls.snapshot())?;
        Ok(())
    }

    /// True when an initial-condition setter moved since the last reset
    pub fn reset_pending(&self) -> bool {
        self.controls.initial_conditions_changed()
    }

    /// Advance one frame; returns false once the trajectory has ended.
    /// Initial-condition changes wait for [`Simulator::reset`].
    pub fn step_frame(&mut self) -> Result<bool, JsError> {
        self.session
            .set_steps_per_frame(self.controls.steps_per_frame());
        let status = self.session.advance_frame(&self.controls.snapshot())?;
        Ok(status.is_running())
    }

    pub fn should_stop(&self) -> bool {
        !self.session.status().is_running()
    }

    pub fn x(&self) -> f64 {
        self.session.position().x
    }

    pub fn y(&self) -> f64 {
        self.session.position().y
    }

    pub fn z(&self) -> f64 {
        self.session.position().z
    }

    pub fn time(&self) -> f64 {
        self.session.state().time
    }

    /// Trail as interleaved xyz f32 triples
    pub fn trail(&self) -> Vec<f32> {
        bytemuck::cast_slice(self.session.trail()).to_vec()
    }

    pub fn steps_per_second(&self) -> f64 {
        self.session.profiler.steps_per_second
    }

    pub fn set_lambda(&mut self, value: f64) {
        self.controls.set_lambda(value);
    }

    pub fn set_q(&mut self, value: f64) {
        self.controls.set_charge(value);
    }

    pub fn set_ex(&mut self, value: f64) {
        self.controls.set_ex(value);
    }

    pub fn set_ez(&mut self, value: f64) {
        self.controls.set_ez(value);
    }

    pub fn set_bz(&mut self, value: f64) {
        self.controls.set_bz(value);
    }

    pub fn set_dt(&mut self, value: f64) {
        self.controls.set_dt(value);
    }

    pub fn set_horizon(&mut self, value: f64) {
        self.controls.set_horizon(value);
    }

    pub fn set_init_alpha(&mut self, value: f64) {
        self.controls.set_init_alpha(value);
    }

    pub fn set_init_beta(&mut self, value: f64) {
        self.controls.set_init_beta(value);
    }

    pub fn set_init_p0(&mut self, value: f64) {
        self.controls.set_init_p0(value);
    }

    pub fn set_steps_per_frame(&mut self, value: u32) {
        self.controls.set_steps_per_frame(value);
    }
}
