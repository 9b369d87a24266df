//! Command-line configuration for the native driver.

use anyhow::{ensure, Context, Result};
use cde_simulation::SimulationParameters;
use clap::Parser;

use crate::session::RunConfig;

#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Integrate the Barut–Zanghi classical electron in a constant E/B field"
)]
pub struct Args {
    /// Spinor coupling scale (must be nonzero)
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub lambda: f64,

    /// Charge coupling
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub q: f64,

    /// Electric field, x component
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub ex: f64,

    /// Electric field, z component
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub ez: f64,

    /// Magnetic field, z component
    #[arg(long, default_value_t = -0.9, allow_negative_numbers = true)]
    pub bz: f64,

    /// Integration step size
    #[arg(long, default_value_t = 1e-4, allow_negative_numbers = true)]
    pub dt: f64,

    /// Time horizon [default: 30π]
    #[arg(long)]
    pub horizon: Option<f64>,

    /// Polar angle of the initial momentum from the x axis [default: π/2]
    #[arg(long, allow_negative_numbers = true)]
    pub alpha: Option<f64>,

    /// Azimuthal angle of the initial momentum in the y-z plane
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub beta: f64,

    /// Magnitude of the initial 3-momentum
    #[arg(long, default_value_t = 0.0)]
    pub p0: f64,

    /// Integration steps per frame
    #[arg(long, default_value_t = 200)]
    pub steps_per_frame: u32,

    /// Print a trajectory row every N steps
    #[arg(long, default_value_t = 20)]
    pub sample_every: u64,

    /// Report a radial histogram of the sampled x-y positions with this many bins
    #[arg(long, default_value_t = 0)]
    pub histogram_bins: usize,

    /// Histogram range as two radii, e.g. `--histogram-range 3.74 8.54`
    #[arg(long, num_args = 2, value_names = ["RMIN", "RMAX"])]
    pub histogram_range: Option<Vec<f64>>,

    /// Do not print trajectory rows
    #[arg(long)]
    pub quiet: bool,
}

/// Everything the driver needs to start a run
#[derive(Debug, Clone, PartialEq)]
pub struct DriverConfig {
    pub params: SimulationParameters,
    pub run: RunConfig,
    pub histogram_bins: usize,
    pub histogram_range: Option<(f64, f64)>,
    pub quiet: bool,
}

impl Args {
    pub fn into_config(self) -> Result<DriverConfig> {
        let defaults = SimulationParameters::default();
        let params = SimulationParameters {
            lambda: self.lambda,
            q: self.q,
            ex: self.ex,
            ez: self.ez,
            bz: self.bz,
            dt: self.dt,
            horizon: self.horizon.unwrap_or(defaults.horizon),
            init_alpha: self.alpha.unwrap_or(defaults.init_alpha),
            init_beta: self.beta,
            init_p0: self.p0,
        };
        params
            .validate()
            .context("invalid simulation parameters")?;

        ensure!(self.steps_per_frame > 0, "--steps-per-frame must be positive");
        ensure!(self.sample_every > 0, "--sample-every must be positive");

        let histogram_range = match self.histogram_range.as_deref() {
            Some(&[r_min, r_max]) => Some((r_min, r_max)),
            Some(other) => anyhow::bail!("--histogram-range takes two values, got {other:?}"),
            None => None,
        };

        Ok(DriverConfig {
            params,
            run: RunConfig {
                steps_per_frame: self.steps_per_frame,
                sample_every: self.sample_every,
            },
            histogram_bins: self.histogram_bins,
            histogram_range,
            quiet: self.quiet,
        })
    }
}
