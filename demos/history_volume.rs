//! Render a volume-per-step figure, the quick look you would take at a constant-pressure
//! run to see whether the cell has equilibrated.
//!
//! Frames normally come from an external trajectory reader; here a small breathing-box
//! trajectory is built by hand so the demo runs standalone.

use glam::{Mat3, Vec3};
use msdiff::analysis::system_volume;
use msdiff::{plot, Frame, FrameSelection, Trajectory};

fn main() -> msdiff::Result<()> {
    let nframes = 200;
    let frames = (0..nframes)
        .map(|n| {
            // The cell relaxes towards 20 A with a damped oscillation.
            let t = n as f32 * 0.1;
            let side = 20.0 + 2.0 * (-t / 4.0).exp() * t.sin();
            Frame {
                step: n * 50,
                time: t,
                boxvec: Mat3::from_diagonal(Vec3::splat(side)),
                positions: vec![0.0, 0.0, 0.0],
            }
        })
        .collect();
    let trajectory = Trajectory::new(frames, vec!["CA".to_string()])?;

    let series = system_volume(&trajectory, &FrameSelection::All)?;
    plot::line_plot(
        &series.step,
        &series.volume,
        "Step",
        "Volume (A^3)",
        "history_volume.png",
    )?;
    eprintln!("history_volume: wrote history_volume.png");

    Ok(())
}
