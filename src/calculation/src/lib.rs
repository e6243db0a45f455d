//! Numerical core for post-processing Penning trap simulations.
//!
//! This library provides:
//! - The closed-form trajectory of a single particle in an ideal trap
//! - Trap parameters, derived frequencies and the stability check
//! - Loading of Armadillo binary dumps written by the simulation
//! - Per-particle slicing of a simulated run
//! - Metrics comparing simulated particles against the analytic orbit

#![warn(clippy::doc_markdown)]

pub mod analytic;
pub mod arma;
pub mod constants;
pub mod dataset;
pub mod error;
pub mod metrics;
pub mod vector;

// Re-export key types and functions for easy use
pub use analytic::{Amplitudes, InitialConditions, TimeGrid, Trajectory, amplitudes, analytic_f};
pub use constants::{Frequencies, PhysicalTrap, TrapParams};
pub use dataset::{Interaction, ParticleTrack, SimulationRun};
pub use error::{CalcError, CalcResult};
pub use metrics::{Comparison, TrackMetrics, trajectory_mse};
pub use vector::Vec3;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
