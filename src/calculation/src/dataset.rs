/// Loading of a simulated run and slicing it per particle.
///
/// A run consists of three dumps in one directory: positions and velocities
/// as cubes of shape (time, component, particle) and the sample times as an
/// (n, 1) matrix. Which position/velocity pair is loaded depends on whether
/// the run included inter-particle Coulomb forces.

use std::fmt;
use std::path::{Path, PathBuf};

use ndarray::{Array1, Array3, ArrayView1, Axis, s};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::arma::{load_cube, load_mat};
use crate::error::{CalcError, CalcResult};
use crate::vector::Vec3;

/// Name of the shared time dump.
pub const TIME_FILE: &str = "time__.bin";

/// Whether particles interacted in the simulated run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interaction {
    #[default]
    With,
    Without,
}

impl Interaction {
    /// Human readable label used in plot legends.
    pub fn label(&self) -> &'static str {
        match self {
            Interaction::With => "with interaction",
            Interaction::Without => "without interaction",
        }
    }

    /// Short form used in file names.
    pub fn tag(&self) -> &'static str {
        match self {
            Interaction::With => "with",
            Interaction::Without => "without",
        }
    }

    pub fn position_file(&self) -> String {
        format!("position_{}_interaction__.bin", self.tag())
    }

    pub fn velocity_file(&self) -> String {
        format!("velocity_{}_interaction__.bin", self.tag())
    }
}

impl fmt::Display for Interaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Position and velocity series of one particle.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParticleTrack {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
    pub vx: Vec<f64>,
    pub vy: Vec<f64>,
    pub vz: Vec<f64>,
}

impl ParticleTrack {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Position at sample `i`.
    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::new(self.x[i], self.y[i], self.z[i])
    }

    /// Velocity at sample `i`.
    pub fn velocity(&self, i: usize) -> Vec3 {
        Vec3::new(self.vx[i], self.vy[i], self.vz[i])
    }
}

/// A loaded simulation run.
#[derive(Debug, Clone)]
pub struct SimulationRun {
    pub interaction: Interaction,
    /// (time, component, particle)
    pub positions: Array3<f64>,
    /// (time, component, particle)
    pub velocities: Array3<f64>,
    pub time: Array1<f64>,
}

impl SimulationRun {
    /// Load the dumps for `interaction` from `dir`.
    pub fn load(dir: impl AsRef<Path>, interaction: Interaction) -> CalcResult<Self> {
        let dir = dir.as_ref();
        let path = |name: String| -> PathBuf { dir.join(name) };

        let positions = load_cube(path(interaction.position_file()))?;
        let velocities = load_cube(path(interaction.velocity_file()))?;
        let time = load_mat(path(TIME_FILE.to_string()))?;

        if time.ncols() != 1 {
            return Err(CalcError::ShapeMismatch(format!(
                "time matrix must have one column, found {}",
                time.ncols()
            )));
        }
        let time = time.column(0).to_owned();

        let run = Self::from_arrays(interaction, positions, velocities, time)?;
        info!(
            dir = %dir.display(),
            interaction = %interaction,
            timesteps = run.num_timesteps(),
            particles = run.num_particles(),
            "loaded simulation run"
        );
        Ok(run)
    }

    /// Assemble a run from arrays already in memory, checking their shapes.
    pub fn from_arrays(
        interaction: Interaction,
        positions: Array3<f64>,
        velocities: Array3<f64>,
        time: Array1<f64>,
    ) -> CalcResult<Self> {
        if positions.dim() != velocities.dim() {
            return Err(CalcError::ShapeMismatch(format!(
                "positions {:?} vs velocities {:?}",
                positions.dim(),
                velocities.dim()
            )));
        }
        let (steps, components, _) = positions.dim();
        if components != 3 {
            return Err(CalcError::ShapeMismatch(format!(
                "expected 3 spatial components, found {components}"
            )));
        }
        if time.len() != steps {
            return Err(CalcError::ShapeMismatch(format!(
                "{} time samples for {steps} timesteps",
                time.len()
            )));
        }
        debug!(shape = ?positions.dim(), "run arrays consistent");

        Ok(Self {
            interaction,
            positions,
            velocities,
            time,
        })
    }

    pub fn num_timesteps(&self) -> usize {
        self.positions.len_of(Axis(0))
    }

    pub fn num_particles(&self) -> usize {
        self.positions.len_of(Axis(2))
    }

    /// Sample times.
    pub fn time(&self) -> Vec<f64> {
        self.time.to_vec()
    }

    /// Slice out particle `index`.
    pub fn particle(&self, index: usize) -> CalcResult<ParticleTrack> {
        let count = self.num_particles();
        if index >= count {
            return Err(CalcError::ParticleOutOfRange { index, count });
        }
        Ok(self.track_at(index))
    }

    /// Every particle in index order.
    pub fn tracks(&self) -> Vec<ParticleTrack> {
        (0..self.num_particles()).map(|i| self.track_at(i)).collect()
    }

    /// `index` must be below `num_particles()`.
    fn track_at(&self, index: usize) -> ParticleTrack {
        let column = |arr: &Array3<f64>, comp: usize| -> Vec<f64> {
            let view: ArrayView1<f64> = arr.slice(s![.., comp, index]);
            view.to_vec()
        };

        ParticleTrack {
            x: column(&self.positions, 0),
            y: column(&self.positions, 1),
            z: column(&self.positions, 2),
            vx: column(&self.velocities, 0),
            vy: column(&self.velocities, 1),
            vz: column(&self.velocities, 2),
        }
    }
}
