/// Closed-form trajectory of a single particle in an ideal Penning trap.
///
/// The axial motion is a plain harmonic oscillation at `omega_z`. The motion
/// in the xy-plane is the sum of two counter-rotating circles at `omega_p`
/// and `omega_m`, with amplitudes fitted to the initial position and
/// velocity along x.

use serde::{Deserialize, Serialize};

use crate::constants::{Frequencies, TrapParams};

/// Initial conditions of the reference particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialConditions {
    pub x0: f64,
    /// Carried for completeness; the closed form assumes y0 = 0.
    pub y0: f64,
    pub z0: f64,
    /// Initial velocity along x. The y-velocity is taken as zero.
    pub v0: f64,
}

impl Default for InitialConditions {
    fn default() -> Self {
        Self {
            x0: 1.0,
            y0: 0.0,
            z0: 1.0,
            v0: 0.1,
        }
    }
}

/// Sampling of the time axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeGrid {
    pub total_time: f64,
    pub dt: f64,
}

impl Default for TimeGrid {
    fn default() -> Self {
        Self {
            total_time: 100.0,
            dt: 0.01,
        }
    }
}

impl TimeGrid {
    pub const fn new(total_time: f64, dt: f64) -> Self {
        Self { total_time, dt }
    }

    /// floor(total_time / dt), or zero when the ratio is not a positive number.
    pub fn sample_count(&self) -> usize {
        let ratio = self.total_time / self.dt;
        if ratio.is_finite() && ratio > 0.0 {
            ratio.floor() as usize
        } else {
            0
        }
    }

    /// `n` evenly spaced instants over [0, total_time).
    ///
    /// The spacing is total_time / n, which is not necessarily `dt`.
    pub fn instants(&self) -> Vec<f64> {
        let n = self.sample_count();
        (0..n)
            .map(|i| i as f64 * self.total_time / n as f64)
            .collect()
    }
}

/// Amplitudes of the fast and slow in-plane components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Amplitudes {
    pub a_p: f64,
    pub a_m: f64,
}

/// Fit the amplitudes to x0 and v0.
///
/// Divides by `omega_m - omega_p`, so a degenerate trap gives non-finite
/// amplitudes rather than an error.
pub fn amplitudes(freq: &Frequencies, init: &InitialConditions) -> Amplitudes {
    let spread = freq.omega_m - freq.omega_p;
    Amplitudes {
        a_p: init.v0 + freq.omega_m * init.x0 / spread,
        a_m: -(init.x0 * freq.omega_p + init.v0 / spread),
    }
}

/// Sampled analytic trajectory.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Trajectory {
    pub t: Vec<f64>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl Trajectory {
    /// Evaluate the closed form on the grid. No validation is performed.
    pub fn analytic(params: &TrapParams, init: &InitialConditions, grid: &TimeGrid) -> Self {
        let freq = params.frequencies();
        let Amplitudes { a_p, a_m } = amplitudes(&freq, init);
        let omega_z = params.omega_z;

        let t = grid.instants();
        let n = t.len();
        let mut x = Vec::with_capacity(n);
        let mut y = Vec::with_capacity(n);
        let mut z = Vec::with_capacity(n);

        for &ti in &t {
            let (sin_p, cos_p) = (freq.omega_p * ti).sin_cos();
            let (sin_m, cos_m) = (freq.omega_m * ti).sin_cos();
            x.push(a_p * cos_p - a_m * cos_m);
            y.push(-(a_p * sin_p + a_m * sin_m));
            z.push(init.z0 * (omega_z * ti).cos());
        }

        Self { t, x, y, z }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// True when every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.x
            .iter()
            .chain(&self.y)
            .chain(&self.z)
            .all(|v| v.is_finite())
    }
}

/// Analytic trajectory for the default trap, returned as `(x, y, z, t)`.
pub fn analytic_f(
    x0: f64,
    y0: f64,
    z0: f64,
    v0: f64,
    total_time: f64,
    dt: f64,
) -> (Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>) {
    let traj = Trajectory::analytic(
        &TrapParams::default(),
        &InitialConditions { x0, y0, z0, v0 },
        &TimeGrid::new(total_time, dt),
    );
    (traj.x, traj.y, traj.z, traj.t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn default_trajectory() -> Trajectory {
        Trajectory::analytic(
            &TrapParams::default(),
            &InitialConditions::default(),
            &TimeGrid::default(),
        )
    }

    #[test]
    fn test_sample_count() {
        assert_eq!(TimeGrid::default().sample_count(), 10000);
        assert_eq!(TimeGrid::new(1.0, 0.3).sample_count(), 3);
        assert_eq!(TimeGrid::new(1.0, 0.0).sample_count(), 0);
        assert_eq!(TimeGrid::new(-1.0, 0.1).sample_count(), 0);
        assert_eq!(TimeGrid::new(1.0, -0.1).sample_count(), 0);
        assert!(TimeGrid::new(0.0, 0.1).instants().is_empty());
    }

    #[test]
    fn test_instants_spacing() {
        // total_time / n, not dt
        let t = TimeGrid::new(1.0, 0.3).instants();
        assert_eq!(t.len(), 3);
        assert_relative_eq!(t[1], 1.0 / 3.0, epsilon = 1e-15);
        assert_relative_eq!(t[2], 2.0 / 3.0, epsilon = 1e-15);
    }

    #[test]
    fn test_lengths_match() {
        let traj = default_trajectory();
        assert_eq!(traj.len(), 10000);
        assert_eq!(traj.x.len(), 10000);
        assert_eq!(traj.y.len(), 10000);
        assert_eq!(traj.z.len(), 10000);
        assert!(traj.is_finite());
    }

    #[test]
    fn test_initial_sample() {
        let params = TrapParams::default();
        let init = InitialConditions::default();
        let amps = amplitudes(&params.frequencies(), &init);
        let traj = default_trajectory();

        assert_eq!(traj.t[0], 0.0);
        assert_relative_eq!(traj.x[0], amps.a_p - amps.a_m, epsilon = 1e-9);
        assert_eq!(traj.y[0], 0.0);
        assert_eq!(traj.z[0], init.z0);
    }

    #[test]
    fn test_amplitudes_closed_form() {
        let disc = 2.0_f64.sqrt();
        let omega_m = 2.0 - disc / 2.0;
        let omega_p = 2.0 + disc / 2.0;
        let amps = amplitudes(
            &TrapParams::default().frequencies(),
            &InitialConditions::default(),
        );
        assert_relative_eq!(
            amps.a_p,
            0.1 + omega_m / (omega_m - omega_p),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            amps.a_m,
            -(omega_p + 0.1 / (omega_m - omega_p)),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_axial_motion_is_pure_cosine() {
        let init = InitialConditions {
            z0: 2.5,
            ..Default::default()
        };
        let params = TrapParams::new(3.0, 0.7);
        let traj = Trajectory::analytic(&params, &init, &TimeGrid::new(20.0, 0.05));
        for (ti, zi) in traj.t.iter().zip(&traj.z) {
            assert_relative_eq!(*zi, 2.5 * (0.7 * ti).cos(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_trivial_orbit() {
        let init = InitialConditions {
            x0: 0.0,
            v0: 0.0,
            ..Default::default()
        };
        let amps = amplitudes(&TrapParams::default().frequencies(), &init);
        assert_eq!(amps.a_p, 0.0);
        assert_eq!(amps.a_m, 0.0);

        let traj = Trajectory::analytic(&TrapParams::default(), &init, &TimeGrid::new(10.0, 0.1));
        assert!(traj.x.iter().all(|&v| v == 0.0));
        assert!(traj.y.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_degenerate_trap_propagates_non_finite() {
        let params = TrapParams::new(0.0, 0.0);
        let traj = Trajectory::analytic(&params, &InitialConditions::default(), &TimeGrid::new(1.0, 0.1));
        assert_eq!(traj.len(), 10);
        assert!(!traj.is_finite());
        assert!(traj.x.iter().all(|v| !v.is_finite()));
    }

    #[test]
    fn test_unstable_trap_yields_nan() {
        let params = TrapParams::new(1.0, 1.0);
        let traj = Trajectory::analytic(&params, &InitialConditions::default(), &TimeGrid::new(1.0, 0.1));
        assert!(traj.x.iter().all(|v| v.is_nan()));
        // the axial motion does not involve the in-plane frequencies
        assert!(traj.z.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_analytic_f_end_to_end() {
        let (x, y, z, t) = analytic_f(1.0, 0.0, 1.0, 0.1, 100.0, 0.01);
        assert_eq!(x.len(), 10000);
        assert_eq!(y.len(), 10000);
        assert_eq!(z.len(), 10000);
        assert_eq!(t.len(), 10000);

        assert_eq!(t[0], 0.0);
        assert_relative_eq!(t[9999], 100.0 * (9999.0 / 10000.0), epsilon = 1e-9);
        for w in t.windows(2) {
            assert_relative_eq!(w[1] - w[0], 0.01, epsilon = 1e-9);
        }
        assert_relative_eq!(z[9999], t[9999].cos(), epsilon = 1e-12);
    }
}
