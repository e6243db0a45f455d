//! CSV export of analytic and simulated trajectories.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use penning_calc::{ParticleTrack, Trajectory};
use polars::prelude::*;

fn write_frame(path: &Path, mut df: DataFrame) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    CsvWriter::new(&mut file)
        .has_header(true)
        .finish(&mut df)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Columns `t,x,y,z`.
pub fn write_trajectory_csv(path: &Path, trajectory: &Trajectory) -> Result<()> {
    let df = DataFrame::new(vec![
        Series::new("t", trajectory.t.as_slice()),
        Series::new("x", trajectory.x.as_slice()),
        Series::new("y", trajectory.y.as_slice()),
        Series::new("z", trajectory.z.as_slice()),
    ])?;
    write_frame(path, df)
}

/// Columns `t,x,y,z,vx,vy,vz`.
pub fn write_track_csv(path: &Path, t: &[f64], track: &ParticleTrack) -> Result<()> {
    let df = DataFrame::new(vec![
        Series::new("t", t),
        Series::new("x", track.x.as_slice()),
        Series::new("y", track.y.as_slice()),
        Series::new("z", track.z.as_slice()),
        Series::new("vx", track.vx.as_slice()),
        Series::new("vy", track.vy.as_slice()),
        Series::new("vz", track.vz.as_slice()),
    ])?;
    write_frame(path, df)
}
