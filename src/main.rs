mod cli;
mod config;
mod export;
mod figures;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use penning_calc::{Comparison, SimulationRun, TrackMetrics, Trajectory};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::config::AppConfig;
use crate::render::{NullRenderer, PngRenderer, Renderer};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = cli.resolve()?;

    match cli.command() {
        Commands::Plot => run_plot(&config),
        Commands::Analytic => run_analytic(&config),
    }
}

/// Analytic reference for the configured trap. Degenerate parameters are
/// reported but still evaluated.
fn analytic_reference(config: &AppConfig) -> Trajectory {
    let trap = config.trap_params();
    if let Err(e) = trap.validate() {
        warn!(error = %e, "analytic solution is not well defined, expect non-finite values");
    }

    let freq = trap.frequencies();
    let trajectory = Trajectory::analytic(&trap, &config.initial, &config.grid);
    info!(
        omega_m = freq.omega_m,
        omega_p = freq.omega_p,
        omega_z = trap.omega_z,
        samples = trajectory.len(),
        "computed analytic trajectory"
    );
    trajectory
}

fn make_renderer(config: &AppConfig) -> Result<Box<dyn Renderer>> {
    if !config.render {
        return Ok(Box::new(NullRenderer::default()));
    }
    ensure_output_dir(config)?;
    Ok(Box::new(PngRenderer::new(&config.output_dir, config.style)))
}

fn ensure_output_dir(config: &AppConfig) -> Result<()> {
    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("failed to create {}", config.output_dir.display()))
}

fn run_analytic(config: &AppConfig) -> Result<()> {
    let analytic = analytic_reference(config);

    if let (Some(x), Some(y), Some(z)) = (analytic.x.last(), analytic.y.last(), analytic.z.last()) {
        info!(x, y, z, "final analytic position");
    }

    if config.export_csv {
        ensure_output_dir(config)?;
        let path = config.output_dir.join("analytic_trajectory.csv");
        export::write_trajectory_csv(&path, &analytic)?;
        info!(path = %path.display(), "exported analytic trajectory");
    }

    let mut renderer = make_renderer(config)?;
    renderer.render(&figures::analytic_xy(&analytic))?;
    Ok(())
}

fn run_plot(config: &AppConfig) -> Result<()> {
    let analytic = analytic_reference(config);

    let run = SimulationRun::load(&config.data_dir, config.interaction).with_context(|| {
        format!(
            "failed to load the run {} from {}",
            config.interaction,
            config.data_dir.display()
        )
    })?;
    let t = run.time();
    let tracks = run.tracks();

    for (i, track) in tracks.iter().enumerate() {
        let metrics = TrackMetrics::from_track(&t, track)?;
        info!(
            particle = i + 1,
            max_radius = metrics.max_radius(),
            max_abs_z = metrics.max_abs_z(),
            mean_speed = metrics.mean_speed(),
            "particle summary"
        );
    }

    let comparison = match tracks.first().map(|first| Comparison::between(&analytic, first)) {
        Some(Ok(cmp)) => {
            info!(max_abs_error = cmp.max_abs_error, mse = cmp.mse, "particle 1 against analytic solution");
            Some(cmp)
        }
        Some(Err(e)) => {
            warn!(error = %e, "skipping comparison with the analytic solution");
            None
        }
        None => None,
    };

    let figures = figures::build_all(&analytic, &run, comparison.as_ref())?;
    let mut renderer = make_renderer(config)?;
    for figure in &figures {
        renderer.render(figure)?;
    }
    info!(figures = figures.len(), rendered = config.render, "plotting finished");

    if config.export_csv {
        ensure_output_dir(config)?;
        export::write_trajectory_csv(&config.output_dir.join("analytic_trajectory.csv"), &analytic)?;
        for (i, track) in tracks.iter().enumerate() {
            let name = format!("particle{}_{}_interaction.csv", i + 1, run.interaction.tag());
            export::write_track_csv(&config.output_dir.join(name), &t, track)?;
        }
        info!(dir = %config.output_dir.display(), "exported trajectories");
    }

    Ok(())
}
