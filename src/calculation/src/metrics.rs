/// Trajectory metrics and comparison against the analytic solution.
///
/// Quantities are per unit mass and in the simulation's units, so kinetic
/// energy is simply 0.5 * |v|^2.

use std::collections::HashMap;

use crate::analytic::Trajectory;
use crate::dataset::ParticleTrack;
use crate::error::{CalcError, CalcResult};
use crate::vector::Vec3;

/// Derived per-sample quantities of one simulated particle.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackMetrics {
    pub t: Vec<f64>,
    /// Speed magnitude
    pub speed: Vec<f64>,
    /// Distance from the trap axis
    pub radius_xy: Vec<f64>,
    /// Axial displacement magnitude
    pub abs_z: Vec<f64>,
    /// Kinetic energy per unit mass
    pub kinetic_energy: Vec<f64>,
}

impl TrackMetrics {
    pub fn from_track(t: &[f64], track: &ParticleTrack) -> CalcResult<Self> {
        if t.len() != track.len() {
            return Err(CalcError::LengthMismatch {
                left: t.len(),
                right: track.len(),
            });
        }

        let n = t.len();
        let mut metrics = Self {
            t: t.to_vec(),
            speed: Vec::with_capacity(n),
            radius_xy: Vec::with_capacity(n),
            abs_z: Vec::with_capacity(n),
            kinetic_energy: Vec::with_capacity(n),
        };

        for i in 0..n {
            let r = track.position(i);
            let v = track.velocity(i);
            metrics.speed.push(v.magnitude());
            metrics.radius_xy.push(r.radius_xy());
            metrics.abs_z.push(r.z.abs());
            metrics.kinetic_energy.push(0.5 * v.magnitude_sq());
        }

        Ok(metrics)
    }

    /// Time span covered by the samples.
    pub fn duration(&self) -> f64 {
        match (self.t.first(), self.t.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }

    pub fn mean_speed(&self) -> f64 {
        if self.speed.is_empty() {
            return 0.0;
        }
        self.speed.iter().sum::<f64>() / (self.speed.len() as f64)
    }

    pub fn max_radius(&self) -> f64 {
        self.radius_xy.iter().cloned().fold(0.0, f64::max)
    }

    pub fn max_abs_z(&self) -> f64 {
        self.abs_z.iter().cloned().fold(0.0, f64::max)
    }

    pub fn peak_kinetic_energy(&self) -> f64 {
        self.kinetic_energy.iter().cloned().fold(0.0, f64::max)
    }

    /// Summary statistics keyed by name.
    pub fn summary(&self) -> HashMap<String, f64> {
        let mut summary = HashMap::new();

        if !self.t.is_empty() {
            summary.insert("n_points".to_string(), self.t.len() as f64);
            summary.insert("duration".to_string(), self.duration());
            summary.insert("mean_speed".to_string(), self.mean_speed());
            summary.insert("max_radius".to_string(), self.max_radius());
            summary.insert("max_abs_z".to_string(), self.max_abs_z());
            summary.insert("peak_kinetic_energy".to_string(), self.peak_kinetic_energy());
        }

        summary
    }
}

/// Mean squared 3D distance between two equal-length position series.
pub fn trajectory_mse(
    a: (&[f64], &[f64], &[f64]),
    b: (&[f64], &[f64], &[f64]),
) -> CalcResult<f64> {
    let n = a.0.len();
    for len in [a.1.len(), a.2.len(), b.0.len(), b.1.len(), b.2.len()] {
        if len != n {
            return Err(CalcError::LengthMismatch { left: n, right: len });
        }
    }
    if n == 0 {
        return Ok(0.0);
    }

    let mut total_error = 0.0;
    for i in 0..n {
        let dx = a.0[i] - b.0[i];
        let dy = a.1[i] - b.1[i];
        let dz = a.2[i] - b.2[i];
        total_error += dx * dx + dy * dy + dz * dz;
    }

    Ok(total_error / (n as f64))
}

/// Sample-by-sample deviation of a simulated particle from the analytic orbit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Comparison {
    pub t: Vec<f64>,
    /// |r_sim - r_analytic|
    pub abs_error: Vec<f64>,
    /// |r_sim - r_analytic| / |r_analytic|, NaN where the reference is at the origin
    pub rel_error: Vec<f64>,
    pub max_abs_error: f64,
    pub mse: f64,
}

impl Comparison {
    /// Compare `track` against `analytic`. Samples are matched by index.
    pub fn between(analytic: &Trajectory, track: &ParticleTrack) -> CalcResult<Self> {
        if analytic.len() != track.len() {
            return Err(CalcError::LengthMismatch {
                left: analytic.len(),
                right: track.len(),
            });
        }

        let n = analytic.len();
        let mut abs_error = Vec::with_capacity(n);
        let mut rel_error = Vec::with_capacity(n);

        for i in 0..n {
            let reference = Vec3::new(analytic.x[i], analytic.y[i], analytic.z[i]);
            let err = track.position(i).distance(&reference);
            let scale = reference.magnitude();
            abs_error.push(err);
            rel_error.push(if scale > 0.0 { err / scale } else { f64::NAN });
        }

        let max_abs_error = abs_error.iter().cloned().fold(0.0, f64::max);
        let mse = trajectory_mse(
            (&track.x, &track.y, &track.z),
            (&analytic.x, &analytic.y, &analytic.z),
        )?;

        Ok(Self {
            t: analytic.t.clone(),
            abs_error,
            rel_error,
            max_abs_error,
            mse,
        })
    }
}
