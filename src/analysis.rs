//! Numeric reductions over trajectories.
//!
//! Everything in here is a pure function from a [`Trajectory`] (or from already reduced
//! series) to plain `f64` series: mean squared displacement, diffusion coefficients from a
//! least-squares fit, system volume per step, and position-resolved diffusion.
//!
//! Positions are in angstrom and times in picoseconds, so MSD slopes come out in A^2/ps.
//! Diffusion coefficients are reported in 10^-9 m^2/s.

use glam::DVec3;
use log::debug;

use crate::selection::{AtomSelection, FrameSelection};
use crate::{Error, Frame, Result, Trajectory};

/// One A^2/ps expressed in 10^-9 m^2/s.
const ANG2_PER_PS: f64 = 10.0;

/// Mean squared displacement series, overall and decomposed per axis.
///
/// All five series are aligned by index: `msd()[n]` belongs to `time()[n]`.
#[derive(Debug, Clone)]
pub struct Msd {
    time: Vec<f64>,
    msd: Vec<f64>,
    xmsd: Vec<f64>,
    ymsd: Vec<f64>,
    zmsd: Vec<f64>,
}

impl Msd {
    /// Assemble an [`Msd`] from five parallel series, checking alignment.
    pub fn new(
        time: Vec<f64>,
        msd: Vec<f64>,
        xmsd: Vec<f64>,
        ymsd: Vec<f64>,
        zmsd: Vec<f64>,
    ) -> Result<Self> {
        if time.is_empty() {
            return Err(Error::EmptySeries { name: "time" });
        }
        for (name, series) in [("msd", &msd), ("xmsd", &xmsd), ("ymsd", &ymsd), ("zmsd", &zmsd)] {
            if series.len() != time.len() {
                return Err(Error::LengthMismatch {
                    left: "time",
                    left_len: time.len(),
                    right: name,
                    right_len: series.len(),
                });
            }
        }
        Ok(Self {
            time,
            msd,
            xmsd,
            ymsd,
            zmsd,
        })
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn msd(&self) -> &[f64] {
        &self.msd
    }

    pub fn xmsd(&self) -> &[f64] {
        &self.xmsd
    }

    pub fn ymsd(&self) -> &[f64] {
        &self.ymsd
    }

    pub fn zmsd(&self) -> &[f64] {
        &self.zmsd
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Diffusion coefficients in 10^-9 m^2/s, for three dimensions and per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffusionCoefficients {
    pub d: f64,
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
}

/// Slope and intercept of a least-squares line through (x, y) samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

/// Per-atom diffusion coefficients paired with each atom's mean coordinate along one axis.
#[derive(Debug, Clone)]
pub struct SpatialDiffusion {
    /// Mean coordinate of each atom along the chosen axis, in angstrom.
    pub positions: Vec<f64>,
    /// Diffusion coefficient of each atom, in 10^-9 m^2/s.
    pub diffusion: Vec<f64>,
}

/// Mean diffusion coefficient per position bin.
#[derive(Debug, Clone)]
pub struct BinnedDiffusion {
    /// Center of each non-empty bin, in angstrom.
    pub centers: Vec<f64>,
    /// Mean diffusion coefficient of the atoms in each bin, in 10^-9 m^2/s.
    pub diffusion: Vec<f64>,
}

/// System volume per step.
#[derive(Debug, Clone)]
pub struct VolumeSeries {
    pub step: Vec<f64>,
    /// Cell volume in cubic angstrom.
    pub volume: Vec<f64>,
}

/// A spatial axis of the simulation cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn component(self, v: DVec3) -> f64 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }
}

/// Compute the mean squared displacement of the selected atoms over the selected frames.
///
/// The first selected frame is the time origin. Step displacements between consecutive
/// frames are corrected for periodic boundaries against the current box (minimum image) and
/// accumulated, so atoms that wander across the cell boundary are unwrapped rather than
/// folded back.
///
/// The returned series include the origin sample (time zero, MSD zero).
pub fn msd(
    trajectory: &Trajectory,
    atoms: &AtomSelection,
    frames: &FrameSelection,
) -> Result<Msd> {
    let atom_indices = atoms.indices(trajectory.species());
    if atom_indices.is_empty() {
        return Err(Error::EmptySelection);
    }
    let selected = selected_frames(trajectory, frames);
    if selected.len() < 2 {
        return Err(Error::TooFewFrames {
            required: 2,
            nframes: selected.len(),
        });
    }

    let natoms = atom_indices.len();
    let first = selected[0];
    let t0 = first.time as f64;
    let mut prev: Vec<DVec3> = atom_indices.iter().map(|&a| position(first, a)).collect();
    let mut disp = vec![DVec3::ZERO; natoms];

    let nframes = selected.len();
    let mut time = Vec::with_capacity(nframes);
    let mut msd = Vec::with_capacity(nframes);
    let mut xmsd = Vec::with_capacity(nframes);
    let mut ymsd = Vec::with_capacity(nframes);
    let mut zmsd = Vec::with_capacity(nframes);

    // The origin sample.
    time.push(0.0);
    msd.push(0.0);
    xmsd.push(0.0);
    ymsd.push(0.0);
    zmsd.push(0.0);

    for frame in &selected[1..] {
        let lengths = box_lengths(frame);
        let mut sum = DVec3::ZERO;
        for (slot, &atom) in atom_indices.iter().enumerate() {
            let pos = position(frame, atom);
            let delta = minimum_image(pos - prev[slot], lengths);
            disp[slot] += delta;
            prev[slot] = pos;
            sum += disp[slot] * disp[slot];
        }
        let mean = sum / natoms as f64;
        time.push(frame.time as f64 - t0);
        msd.push(mean.x + mean.y + mean.z);
        xmsd.push(mean.x);
        ymsd.push(mean.y);
        zmsd.push(mean.z);
    }

    debug!("accumulated msd over {natoms} atoms and {nframes} frames");

    Msd::new(time, msd, xmsd, ymsd, zmsd)
}

/// Fit a least-squares line through the (x, y) samples.
pub fn linear_fit(x: &[f64], y: &[f64]) -> Result<LinearFit> {
    if x.len() != y.len() {
        return Err(Error::LengthMismatch {
            left: "x",
            left_len: x.len(),
            right: "y",
            right_len: y.len(),
        });
    }
    if x.len() < 2 {
        return Err(Error::TooFewFrames {
            required: 2,
            nframes: x.len(),
        });
    }
    check_finite("x", x)?;
    check_finite("y", y)?;

    let n = x.len() as f64;
    let x_mean = x.iter().sum::<f64>() / n;
    let y_mean = y.iter().sum::<f64>() / n;
    let mut covariance = 0.0;
    let mut variance = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        covariance += (xi - x_mean) * (yi - y_mean);
        variance += (xi - x_mean) * (xi - x_mean);
    }
    let slope = covariance / variance;
    let intercept = y_mean - slope * x_mean;
    Ok(LinearFit { slope, intercept })
}

/// Estimate diffusion coefficients from the slopes of the MSD series.
///
/// The Einstein relation gives slope/6 in three dimensions and slope/2 per axis.
pub fn diffusion_coefficients(msd: &Msd) -> Result<DiffusionCoefficients> {
    let d = linear_fit(msd.time(), msd.msd())?.slope / 6.0 * ANG2_PER_PS;
    let dx = linear_fit(msd.time(), msd.xmsd())?.slope / 2.0 * ANG2_PER_PS;
    let dy = linear_fit(msd.time(), msd.ymsd())?.slope / 2.0 * ANG2_PER_PS;
    let dz = linear_fit(msd.time(), msd.zmsd())?.slope / 2.0 * ANG2_PER_PS;
    Ok(DiffusionCoefficients { d, dx, dy, dz })
}

/// Compute the cell volume of every selected frame, paired with the step numbers.
pub fn system_volume(trajectory: &Trajectory, frames: &FrameSelection) -> Result<VolumeSeries> {
    let selected = selected_frames(trajectory, frames);
    if selected.is_empty() {
        return Err(Error::TooFewFrames {
            required: 1,
            nframes: 0,
        });
    }
    let step = selected.iter().map(|f| f.step as f64).collect();
    let volume = selected.iter().map(|f| f.volume() as f64).collect();
    Ok(VolumeSeries { step, volume })
}

/// Compute a diffusion coefficient for every selected atom individually, paired with the
/// atom's mean coordinate along `axis`.
///
/// This resolves how mobility varies with the distance from an interface: each atom's own
/// squared-displacement series is fitted separately, and the atom is placed at its average
/// position over the run.
pub fn spatial_diffusion(
    trajectory: &Trajectory,
    atoms: &AtomSelection,
    axis: Axis,
) -> Result<SpatialDiffusion> {
    let atom_indices = atoms.indices(trajectory.species());
    if atom_indices.is_empty() {
        return Err(Error::EmptySelection);
    }
    let frames = trajectory.frames();
    if frames.len() < 2 {
        return Err(Error::TooFewFrames {
            required: 2,
            nframes: frames.len(),
        });
    }

    let first = &frames[0];
    let t0 = first.time as f64;

    let mut positions = Vec::with_capacity(atom_indices.len());
    let mut diffusion = Vec::with_capacity(atom_indices.len());
    let mut squared = Vec::with_capacity(frames.len());
    let mut times = Vec::with_capacity(frames.len());

    for &atom in &atom_indices {
        let mut prev = position(first, atom);
        let mut disp = DVec3::ZERO;
        let mut coord_sum = axis.component(prev);
        squared.clear();
        times.clear();
        // The origin sample, as in the trajectory-wide series.
        squared.push(0.0);
        times.push(0.0);

        for frame in &frames[1..] {
            let pos = position(frame, atom);
            disp += minimum_image(pos - prev, box_lengths(frame));
            prev = pos;
            coord_sum += axis.component(pos);
            squared.push(disp.length_squared());
            times.push(frame.time as f64 - t0);
        }

        let fit = linear_fit(&times, &squared)?;
        positions.push(coord_sum / frames.len() as f64);
        diffusion.push(fit.slope / 6.0 * ANG2_PER_PS);
    }

    debug!(
        "fitted per-atom diffusion for {} atoms along {axis:?}",
        atom_indices.len()
    );

    Ok(SpatialDiffusion {
        positions,
        diffusion,
    })
}

/// Average per-atom diffusion coefficients over position bins of width `bin_width`.
///
/// Bins with no atoms in them are dropped, so the output series only holds populated bins.
pub fn bin_spatial(spatial: &SpatialDiffusion, bin_width: f64) -> Result<BinnedDiffusion> {
    if !(bin_width > 0.0) {
        return Err(Error::BadBinWidth(bin_width));
    }
    if spatial.positions.is_empty() {
        return Err(Error::EmptySeries { name: "positions" });
    }
    if spatial.diffusion.len() != spatial.positions.len() {
        return Err(Error::LengthMismatch {
            left: "positions",
            left_len: spatial.positions.len(),
            right: "diffusion",
            right_len: spatial.diffusion.len(),
        });
    }
    check_finite("positions", &spatial.positions)?;

    let min = spatial.positions.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = spatial.positions.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let nbins = ((max - min) / bin_width).floor() as usize + 1;

    let mut sums = vec![0.0; nbins];
    let mut counts = vec![0usize; nbins];
    for (&pos, &d) in spatial.positions.iter().zip(&spatial.diffusion) {
        let bin = usize::min(((pos - min) / bin_width) as usize, nbins - 1);
        sums[bin] += d;
        counts[bin] += 1;
    }

    let mut centers = Vec::new();
    let mut diffusion = Vec::new();
    for (bin, &count) in counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        centers.push(min + (bin as f64 + 0.5) * bin_width);
        diffusion.push(sums[bin] / count as f64);
    }

    Ok(BinnedDiffusion { centers, diffusion })
}

/// Reject series holding NaN or infinite values with a pointer at the first offender.
pub(crate) fn check_finite(name: &'static str, series: &[f64]) -> Result<()> {
    match series.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(Error::NonFinite { name, index }),
        None => Ok(()),
    }
}

fn selected_frames<'t>(trajectory: &'t Trajectory, frames: &FrameSelection) -> Vec<&'t Frame> {
    // The selection's upper bound caps how many frames can come out.
    let at_most = frames
        .until()
        .map_or(trajectory.nframes(), |until| until.min(trajectory.nframes()));
    let mut selected = Vec::with_capacity(at_most);
    for (idx, frame) in trajectory.frames().iter().enumerate() {
        match frames.is_included(idx) {
            Some(true) => selected.push(frame),
            Some(false) => continue,
            None => break,
        }
    }
    selected
}

fn position(frame: &Frame, atom: usize) -> DVec3 {
    frame.coord(atom).as_dvec3()
}

fn box_lengths(frame: &Frame) -> DVec3 {
    DVec3::new(
        frame.boxvec.x_axis.x as f64,
        frame.boxvec.y_axis.y as f64,
        frame.boxvec.z_axis.z as f64,
    )
}

/// Fold a step displacement back into the minimum-image convention.
///
/// Axes without a box length (zero or unset) are passed through untouched.
fn minimum_image(delta: DVec3, lengths: DVec3) -> DVec3 {
    DVec3::new(
        wrap(delta.x, lengths.x),
        wrap(delta.y, lengths.y),
        wrap(delta.z, lengths.z),
    )
}

fn wrap(delta: f64, length: f64) -> f64 {
    if length > 0.0 {
        delta - length * (delta / length).round()
    } else {
        delta
    }
}
