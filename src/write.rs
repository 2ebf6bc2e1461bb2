//! Flat-file writers for the reduced series.
//!
//! Every writer takes an explicit output path and truncates whatever file is already there.
//! The textual layout itself lives in [`format`](crate::format).

use std::fs;
use std::path::Path;

use crate::analysis::{DiffusionCoefficients, Msd};
use crate::{format, Result};

/// Write the four MSD series as a four-row comma-delimited table.
pub fn write_msd(path: impl AsRef<Path>, msd: &Msd) -> Result<()> {
    fs::write(path, format::msd_rows(msd))?;
    Ok(())
}

/// Read a four-row MSD table back into its series.
pub fn read_msd(path: impl AsRef<Path>) -> Result<[Vec<f64>; 4]> {
    format::parse_msd_rows(&fs::read_to_string(path)?)
}

/// Write the four diffusion coefficients as labeled text lines.
pub fn write_diffusion(path: impl AsRef<Path>, coefficients: &DiffusionCoefficients) -> Result<()> {
    fs::write(path, format::diffusion_lines(coefficients))?;
    Ok(())
}
