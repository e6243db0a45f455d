//! Figures comparing the simulated particles with the analytic orbit.

use penning_calc::{CalcResult, Comparison, Interaction, ParticleTrack, SimulationRun, Trajectory};

use crate::render::{Figure, Rgb, Series2d, Series3d};

/// Number of particles drawn in the phase space and 3D figures.
const PAIR: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    X,
    Y,
    Z,
}

impl Component {
    fn name(&self) -> &'static str {
        match self {
            Component::X => "x",
            Component::Y => "y",
            Component::Z => "z",
        }
    }

    /// Position and velocity series of `track` along this component.
    fn of<'a>(&self, track: &'a ParticleTrack) -> (&'a [f64], &'a [f64]) {
        match self {
            Component::X => (track.x.as_slice(), track.vx.as_slice()),
            Component::Y => (track.y.as_slice(), track.vy.as_slice()),
            Component::Z => (track.z.as_slice(), track.vz.as_slice()),
        }
    }
}

fn zip_points(a: &[f64], b: &[f64]) -> Vec<(f64, f64)> {
    a.iter().copied().zip(b.iter().copied()).collect()
}

/// Analytic orbit in the xy-plane.
pub fn analytic_xy(analytic: &Trajectory) -> Figure {
    Figure::lines(
        "analytic_xy",
        "Analytic solution, x against y".to_string(),
        "x",
        "y",
        vec![Series2d {
            label: "analytic".to_string(),
            color: Rgb::BLACK,
            points: zip_points(&analytic.x, &analytic.y),
        }],
    )
}

/// Axial motion of the first particle over time.
pub fn single_particle_z(t: &[f64], track: &ParticleTrack) -> Figure {
    Figure::lines(
        "single_particle_z",
        "Single particle movement".to_string(),
        "t",
        "z",
        vec![Series2d {
            label: "Single particle movement, z1 against t".to_string(),
            color: Rgb::GREEN,
            points: zip_points(t, &track.z),
        }],
    )
}

/// Every particle in the xy-plane.
pub fn particles_xy(tracks: &[ParticleTrack], interaction: Interaction) -> Figure {
    let series = tracks
        .iter()
        .enumerate()
        .map(|(i, track)| Series2d {
            label: format!("particle{}, x against y, {interaction}", i + 1),
            color: Rgb::for_particle(i),
            points: zip_points(&track.x, &track.y),
        })
        .collect();
    Figure::lines(
        "particles_xy",
        format!("Motion in the xy-plane {interaction}"),
        "x",
        "y",
        series,
    )
}

/// Position against velocity along one component for the first two particles.
pub fn phase_space(tracks: &[ParticleTrack], component: Component, interaction: Interaction) -> Figure {
    let c = component.name();
    let series = tracks
        .iter()
        .take(PAIR)
        .enumerate()
        .map(|(i, track)| {
            let (pos, vel) = component.of(track);
            Series2d {
                label: format!("{c} against v_{c}, particle{}, {interaction}", i + 1),
                color: Rgb::for_particle(i),
                points: zip_points(pos, vel),
            }
        })
        .collect();
    Figure::lines(
        &format!("phase_{c}"),
        format!("Phase space {c}, {interaction}"),
        c,
        &format!("v_{c}"),
        series,
    )
}

/// 3D trajectories of the first two particles.
pub fn trajectory_3d(tracks: &[ParticleTrack], interaction: Interaction) -> Figure {
    let series = tracks
        .iter()
        .take(PAIR)
        .enumerate()
        .map(|(i, track)| Series3d {
            label: format!("particle{}, {interaction}", i + 1),
            color: Rgb::for_particle(i),
            points: (0..track.len())
                .map(|j| (track.x[j], track.y[j], track.z[j]))
                .collect(),
        })
        .collect();
    Figure::lines_3d(
        "trajectory_3d",
        format!("Two particles {interaction}"),
        series,
    )
}

/// Relative deviation of the first particle from the analytic orbit.
pub fn relative_error(comparison: &Comparison, interaction: Interaction) -> Figure {
    let points = comparison
        .t
        .iter()
        .copied()
        .zip(comparison.rel_error.iter().copied())
        .filter(|(_, e)| e.is_finite())
        .collect();
    Figure::lines(
        "relative_error",
        format!("Relative error against the analytic solution, {interaction}"),
        "t",
        "relative error",
        vec![Series2d {
            label: "particle1".to_string(),
            color: Rgb::RED,
            points,
        }],
    )
}

/// All figures for a loaded run, in the order they are rendered.
///
/// Fails when the run holds no particles.
pub fn build_all(
    analytic: &Trajectory,
    run: &SimulationRun,
    comparison: Option<&Comparison>,
) -> CalcResult<Vec<Figure>> {
    let t = run.time();
    let first = run.particle(0)?;
    let tracks = run.tracks();
    let interaction = run.interaction;

    let mut figures = vec![
        analytic_xy(analytic),
        single_particle_z(&t, &first),
        particles_xy(&tracks, interaction),
        phase_space(&tracks, Component::X, interaction),
        phase_space(&tracks, Component::Y, interaction),
        phase_space(&tracks, Component::Z, interaction),
        trajectory_3d(&tracks, interaction),
    ];
    if let Some(cmp) = comparison {
        figures.push(relative_error(cmp, interaction));
    }
    Ok(figures)
}
