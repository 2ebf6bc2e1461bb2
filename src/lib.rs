use glam::{Mat3, Vec3};

pub use crate::error::{Error, Result};
pub use crate::selection::{AtomSelection, FrameSelection, Range};

pub mod analysis;
pub mod error;
pub mod format;
pub mod plot;
mod selection;
pub mod write;

pub type BoxVec = Mat3;

/// A single snapshot of particle positions from a molecular dynamics trajectory.
///
/// Frames are produced by an external trajectory reader. This crate only consumes them.
#[derive(Debug, Default, Clone)]
pub struct Frame {
    pub step: u32,
    /// Time in picoseconds.
    pub time: f32,
    pub boxvec: BoxVec,
    /// Flat (x, y, z) positions in angstrom.
    pub positions: Vec<f32>,
}

impl Frame {
    /// The position of the atom at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not below [`Frame::natoms`].
    pub fn coord(&self, idx: usize) -> Vec3 {
        let p = &self.positions[idx * 3..idx * 3 + 3];
        Vec3::new(p[0], p[1], p[2])
    }

    pub fn natoms(&self) -> usize {
        self.positions.len() / 3
    }

    /// Cell volume in cubic angstrom.
    pub fn volume(&self) -> f32 {
        self.boxvec.determinant()
    }
}

/// A time-ordered sequence of [`Frame`]s, plus the species label of every atom.
///
/// Invariant: every frame holds exactly `species.len()` atoms. The labels are positional, so
/// the atom at index `n` carries the label `species[n]` in every frame.
#[derive(Debug, Default, Clone)]
pub struct Trajectory {
    frames: Vec<Frame>,
    species: Vec<String>,
}

impl Trajectory {
    /// Assemble a trajectory, checking that every frame agrees with the species table.
    pub fn new(frames: Vec<Frame>, species: Vec<String>) -> Result<Self> {
        for (idx, frame) in frames.iter().enumerate() {
            if frame.natoms() != species.len() {
                return Err(Error::AtomCountMismatch {
                    frame: idx,
                    natoms: frame.natoms(),
                    expected: species.len(),
                });
            }
        }
        Ok(Self { frames, species })
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn species(&self) -> &[String] {
        &self.species
    }

    pub fn natoms(&self) -> usize {
        self.species.len()
    }

    pub fn nframes(&self) -> usize {
        self.frames.len()
    }
}
