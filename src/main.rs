//! Fit diffusion coefficients from an MSD table, quickly.
use std::path::PathBuf;

use clap::Parser;
use log::info;
use msdiff::analysis::{diffusion_coefficients, Msd};
use msdiff::{format, plot, write};

/// Fit diffusion coefficients from a four-row MSD table and write the standard outputs.
///
/// The input is the comma-delimited table this tool (and the library's MSD writer) produces:
/// four rows holding the overall, x, y, and z mean squared displacement, one value per
/// timestep. The time axis is reconstructed from a uniform timestep.
#[derive(Parser)]
struct Args {
    /// Input path (four comma-delimited rows: msd, xmsd, ymsd, zmsd).
    input: PathBuf,

    /// Directory the outputs are written into. Existing files are overwritten.
    #[arg(short, long, default_value = ".")]
    outdir: PathBuf,

    /// Time between consecutive MSD samples, in picoseconds.
    #[arg(short, long, default_value_t = 1.0)]
    timestep: f64,

    /// Skip rendering MSD.png, only write Diffusion.txt.
    #[arg(long)]
    no_plot: bool,
}

fn main() -> msdiff::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let [msd, xmsd, ymsd, zmsd] = write::read_msd(&args.input)?;
    let time = (0..msd.len()).map(|n| n as f64 * args.timestep).collect();
    let msd = Msd::new(time, msd, xmsd, ymsd, zmsd)?;
    info!("read {} msd samples from {}", msd.len(), args.input.display());

    let coefficients = diffusion_coefficients(&msd)?;
    info!(
        "3d diffusion coefficient: {} {}",
        coefficients.d,
        format::DIFFUSION_UNIT
    );

    std::fs::create_dir_all(&args.outdir)?;
    write::write_diffusion(args.outdir.join("Diffusion.txt"), &coefficients)?;
    if !args.no_plot {
        plot::msd_plot(&msd, args.outdir.join("MSD.png"))?;
    }
    info!("wrote outputs into {}", args.outdir.display());

    Ok(())
}
