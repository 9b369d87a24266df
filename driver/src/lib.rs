use cfg_if::cfg_if;

pub mod analysis;
pub mod controls;
pub mod profiler;
pub mod session;

#[cfg(not(target_arch = "wasm32"))]
pub mod config;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub use session::{RunConfig, Session, SessionStatus, TrailVertex, TrajectorySample};

/// Install the platform logger
#[cfg_attr(target_arch = "wasm32", wasm_bindgen(start))]
pub fn init_logging() {
    cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            if console_log::init_with_level(log::Level::Warn).is_err() {
                web_sys::console::warn_1(&"Logger already initialized".into());
            }
        } else {
            if env_logger::try_init().is_err() {
                log::warn!("Logger already initialized");
            }
        }
    }
}

/// Parse the command line, integrate until the trajectory ends, and report
/// sampled rows and summary statistics on stdout.
#[cfg(not(target_arch = "wasm32"))]
pub fn run() -> anyhow::Result<()> {
    use std::io::{BufWriter, Write};

    use anyhow::Context;
    use clap::Parser;

    init_logging();

    let config = config::Args::parse().into_config()?;
    let params = config.params;
    let mut session =
        Session::new(&params, config.run).context("failed to create initial state")?;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut printed = 0;

    loop {
        let status = session
            .advance_frame(&params)
            .context("integration step failed")?;

        if !config.quiet {
            for sample in &session.samples()[printed..] {
                writeln!(out, "{sample}")?;
            }
        }
        printed = session.samples().len();

        if !status.is_running() {
            break;
        }
    }

    let monitor = session.monitor();
    log::info!(
        "Finished: {:?} after {} steps, t = {}",
        session.status(),
        session.step_count(),
        session.state().time
    );
    log::info!(
        "Max drift: |ΔH| = {:e}, |Δm²| = {:e}, |Δ|z|²| = {:e}; max speed {:e}",
        monitor.max_hamiltonian_drift,
        monitor.max_mass_shell_drift,
        monitor.max_spinor_norm_drift,
        monitor.max_speed
    );
    let profiler = &session.profiler;
    log::info!(
        "{} steps over {} frames: {:.3} ms avg, {:.3} ms max, {:.0} steps/s",
        profiler.total_steps(),
        profiler.frame_count(),
        profiler.avg_frame_ms,
        profiler.max_frame_ms,
        profiler.steps_per_second
    );

    if config.histogram_bins > 0 {
        let histogram = analysis::RadialHistogram::from_points(
            &session.sample_positions(),
            config.histogram_bins,
            config.histogram_range,
        )
        .context("failed to build radial histogram")?;
        let (below, above) = histogram.out_of_range();
        if below + above > 0 {
            log::warn!("{below} samples below and {above} above the histogram range");
        }
        writeln!(out)?;
        for row in histogram.rows() {
            writeln!(out, "{:e} {} {}", row.radius, row.count, row.cumulative)?;
        }
    }

    out.flush()?;
    Ok(())
}
