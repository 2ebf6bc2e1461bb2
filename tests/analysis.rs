use glam::{Mat3, Vec3};
use msdiff::analysis::{
    self, bin_spatial, diffusion_coefficients, spatial_diffusion, system_volume, Axis, Msd,
};
use msdiff::{AtomSelection, Error, Frame, FrameSelection, Range, Trajectory};

fn frame(step: u32, time: f32, side: f32, positions: Vec<f32>) -> Frame {
    Frame {
        step,
        time,
        boxvec: Mat3::from_diagonal(Vec3::splat(side)),
        positions,
    }
}

/// One atom stepping along x by `steps[n]` between frame n and n + 1, in a `side` box.
fn walker(side: f32, steps: &[f32]) -> Trajectory {
    let mut x = 0.5;
    let mut frames = vec![frame(0, 0.0, side, vec![x, 0.0, 0.0])];
    for (n, &step) in steps.iter().enumerate() {
        x = (x + step).rem_euclid(side);
        frames.push(frame(n as u32 + 1, n as f32 + 1.0, side, vec![x, 0.0, 0.0]));
    }
    Trajectory::new(frames, vec!["CA".to_string()]).unwrap()
}

#[test]
fn frame_accessors_agree_with_the_layout() {
    let f = frame(0, 0.0, 2.0, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    assert_eq!(f.natoms(), 2);
    assert_eq!(f.coord(0), Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(f.coord(1), Vec3::new(4.0, 5.0, 6.0));
    assert_eq!(f.volume(), 8.0);
}

#[test]
fn stationary_atoms_do_not_move() {
    let frames = (0..5)
        .map(|n| frame(n, n as f32, 10.0, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]))
        .collect();
    let trajectory = Trajectory::new(frames, vec!["CA".to_string(), "F".to_string()]).unwrap();

    let msd = analysis::msd(&trajectory, &AtomSelection::All, &FrameSelection::All).unwrap();
    assert_eq!(msd.time(), &[0.0, 1.0, 2.0, 3.0, 4.0]);
    assert_eq!(msd.msd(), &[0.0; 5]);
    assert_eq!(msd.xmsd(), &[0.0; 5]);
    assert_eq!(msd.ymsd(), &[0.0; 5]);
    assert_eq!(msd.zmsd(), &[0.0; 5]);
}

#[test]
fn unit_walk_grows_quadratically() {
    // One unit step along x per frame, far from the box edge: the displacement after k
    // frames is k, so the squared displacement is k^2 and stays on the x axis.
    let trajectory = walker(1000.0, &[1.0; 4]);

    let msd = analysis::msd(&trajectory, &AtomSelection::All, &FrameSelection::All).unwrap();
    assert_eq!(msd.msd(), &[0.0, 1.0, 4.0, 9.0, 16.0]);
    assert_eq!(msd.xmsd(), &[0.0, 1.0, 4.0, 9.0, 16.0]);
    assert_eq!(msd.ymsd(), &[0.0; 5]);
    assert_eq!(msd.zmsd(), &[0.0; 5]);
}

#[test]
fn boundary_crossings_are_unwrapped() {
    // The atom starts at 9.5 in a 10 A box and keeps stepping by +1, so it is folded back
    // to 0.5, 1.5, ... Minimum-image unwrapping must still see unit steps.
    let trajectory = walker(10.0, &[1.0; 3]);

    let msd = analysis::msd(&trajectory, &AtomSelection::All, &FrameSelection::All).unwrap();
    // Shift the walker so it starts right at the edge.
    let frames: Vec<Frame> = (0..4)
        .map(|n| {
            frame(
                n,
                n as f32,
                10.0,
                vec![(9.5 + n as f32).rem_euclid(10.0), 0.0, 0.0],
            )
        })
        .collect();
    let crossing = Trajectory::new(frames, vec!["CA".to_string()]).unwrap();
    let crossed = analysis::msd(&crossing, &AtomSelection::All, &FrameSelection::All).unwrap();

    assert_eq!(msd.msd(), &[0.0, 1.0, 4.0, 9.0]);
    assert_eq!(crossed.msd(), &[0.0, 1.0, 4.0, 9.0]);
}

#[test]
fn species_selection_restricts_the_average() {
    // A stationary CA atom and an F atom walking along y.
    let frames: Vec<Frame> = (0..4)
        .map(|n| frame(n, n as f32, 100.0, vec![1.0, 1.0, 1.0, 5.0, 5.0 + n as f32, 5.0]))
        .collect();
    let trajectory =
        Trajectory::new(frames, vec!["CA".to_string(), "F".to_string()]).unwrap();

    let calcium = analysis::msd(
        &trajectory,
        &AtomSelection::species("CA"),
        &FrameSelection::All,
    )
    .unwrap();
    let fluorine = analysis::msd(
        &trajectory,
        &AtomSelection::species("F"),
        &FrameSelection::All,
    )
    .unwrap();
    let both = analysis::msd(&trajectory, &AtomSelection::All, &FrameSelection::All).unwrap();

    assert_eq!(calcium.msd(), &[0.0; 4]);
    assert_eq!(fluorine.msd(), &[0.0, 1.0, 4.0, 9.0]);
    assert_eq!(fluorine.ymsd(), &[0.0, 1.0, 4.0, 9.0]);
    // The average over both atoms is half the moving atom's squared displacement.
    assert_eq!(both.msd(), &[0.0, 0.5, 2.0, 4.5]);
}

#[test]
fn frame_selection_trims_the_series() {
    let trajectory = walker(1000.0, &[1.0; 9]);

    let first_four = analysis::msd(
        &trajectory,
        &AtomSelection::All,
        &FrameSelection::Range(Range::new(None, Some(4), None)),
    )
    .unwrap();
    assert_eq!(first_four.len(), 4);
    assert_eq!(first_four.msd(), &[0.0, 1.0, 4.0, 9.0]);
}

#[test]
fn empty_selection_and_short_trajectories_are_rejected() {
    let trajectory = walker(1000.0, &[1.0; 3]);

    assert!(matches!(
        analysis::msd(
            &trajectory,
            &AtomSelection::species("XX"),
            &FrameSelection::All
        ),
        Err(Error::EmptySelection)
    ));
    assert!(matches!(
        analysis::msd(
            &trajectory,
            &AtomSelection::All,
            &FrameSelection::Range(Range::new(None, Some(1), None))
        ),
        Err(Error::TooFewFrames { .. })
    ));
}

#[test]
fn mismatched_frames_are_rejected_at_construction() {
    let frames = vec![
        frame(0, 0.0, 10.0, vec![0.0; 6]),
        frame(1, 1.0, 10.0, vec![0.0; 3]),
    ];
    assert!(matches!(
        Trajectory::new(frames, vec!["CA".to_string(), "F".to_string()]),
        Err(Error::AtomCountMismatch { frame: 1, .. })
    ));
}

#[test]
fn coefficients_follow_the_einstein_relation() {
    // msd = 0.6 t and per-axis msd = 0.2 t: slope/6 and slope/2, times the A^2/ps to
    // 10^-9 m^2/s factor of 10, give exactly 1.0 everywhere.
    let time: Vec<f64> = (0..20).map(|n| n as f64).collect();
    let msd = Msd::new(
        time.clone(),
        time.iter().map(|t| 0.6 * t).collect(),
        time.iter().map(|t| 0.2 * t).collect(),
        time.iter().map(|t| 0.2 * t).collect(),
        time.iter().map(|t| 0.2 * t).collect(),
    )
    .unwrap();

    let coefficients = diffusion_coefficients(&msd).unwrap();
    assert!((coefficients.d - 1.0).abs() < 1e-12);
    assert!((coefficients.dx - 1.0).abs() < 1e-12);
    assert!((coefficients.dy - 1.0).abs() < 1e-12);
    assert!((coefficients.dz - 1.0).abs() < 1e-12);
}

#[test]
fn volume_tracks_the_box() {
    let frames = vec![
        frame(0, 0.0, 2.0, vec![0.0; 3]),
        frame(50, 1.0, 3.0, vec![0.0; 3]),
        frame(100, 2.0, 4.0, vec![0.0; 3]),
    ];
    let trajectory = Trajectory::new(frames, vec!["CA".to_string()]).unwrap();

    let series = system_volume(&trajectory, &FrameSelection::All).unwrap();
    assert_eq!(series.step, vec![0.0, 50.0, 100.0]);
    assert_eq!(series.volume, vec![8.0, 27.0, 64.0]);

    assert!(matches!(
        system_volume(
            &trajectory,
            &FrameSelection::Range(Range::new(None, Some(0), None))
        ),
        Err(Error::TooFewFrames { .. })
    ));
}

#[test]
fn spatial_diffusion_separates_mobile_and_frozen_atoms() {
    // A frozen atom near x = 0 and a mobile atom near x = 10 whose displacement grows as
    // sqrt(0.6 t), so its squared-displacement slope is 0.6 and its coefficient 1.0.
    let nframes = 32;
    let frames: Vec<Frame> = (0..nframes)
        .map(|n| {
            let drift = (0.6 * n as f64).sqrt() as f32;
            frame(n, n as f32, 1000.0, vec![0.5, 0.0, 0.0, 10.0 + drift, 0.0, 0.0])
        })
        .collect();
    let trajectory =
        Trajectory::new(frames, vec!["CA".to_string(), "F".to_string()]).unwrap();

    let spatial = spatial_diffusion(&trajectory, &AtomSelection::All, Axis::X).unwrap();
    assert_eq!(spatial.positions.len(), 2);
    assert!((spatial.positions[0] - 0.5).abs() < 1e-6);
    assert!(spatial.positions[1] > 10.0);
    assert!(spatial.diffusion[0].abs() < 1e-6);
    assert!((spatial.diffusion[1] - 1.0).abs() < 1e-2);

    let binned = bin_spatial(&spatial, 5.0).unwrap();
    assert_eq!(binned.centers.len(), 2);
    assert!(binned.diffusion[0].abs() < 1e-6);
    assert!((binned.diffusion[1] - 1.0).abs() < 1e-2);

    assert!(matches!(
        bin_spatial(&spatial, 0.0),
        Err(Error::BadBinWidth(_))
    ));
}

#[test]
fn spatial_diffusion_fits_a_two_frame_trajectory() {
    // The per-atom series include the origin sample, so the smallest trajectory the guard
    // admits still yields two fit points: (0, 0) and (1, 1) for a unit step along x, a
    // slope of 1, and a coefficient of 10/6.
    let frames = vec![
        frame(0, 0.0, 1000.0, vec![0.5, 0.0, 0.0]),
        frame(1, 1.0, 1000.0, vec![1.5, 0.0, 0.0]),
    ];
    let trajectory = Trajectory::new(frames, vec!["CA".to_string()]).unwrap();

    let spatial = spatial_diffusion(&trajectory, &AtomSelection::All, Axis::X).unwrap();
    assert_eq!(spatial.positions, vec![1.0]);
    assert!((spatial.diffusion[0] - 10.0 / 6.0).abs() < 1e-9);
}
