//! Figure rendering on top of `plotters`.
//!
//! Every renderer validates its series up front, draws onto a [`BitMapBackend`], and saves a
//! PNG to the caller-supplied path. The axis-limit arithmetic lives in pure helpers such as
//! [`msd_bounds`] so it can be checked without touching a rendering backend.

use std::path::Path;

use plotters::prelude::*;

use crate::analysis::{check_finite, BinnedDiffusion, Msd, SpatialDiffusion};
use crate::{Error, Result};

/// Canvas size of every figure, in pixels.
pub const IMAGE_SIZE: (u32, u32) = (1600, 1200);

const CRIMSON: RGBColor = RGBColor(220, 20, 60);
const DARK_GREEN: RGBColor = RGBColor(0, 100, 0);
const GREY: RGBColor = RGBColor(128, 128, 128);

/// The axis maxima an [`msd_plot`] draws with: (max time, max overall MSD).
///
/// Both axes start at zero, so these are the upper bounds of the figure.
pub fn msd_bounds(msd: &Msd) -> Result<(f64, f64)> {
    check_finite("time", msd.time())?;
    check_finite("msd", msd.msd())?;
    Ok((series_max(msd.time()), series_max(msd.msd())))
}

/// Scatter the overall and per-axis MSD series against time.
pub fn msd_plot(msd: &Msd, path: impl AsRef<Path>) -> Result<()> {
    check_finite("xmsd", msd.xmsd())?;
    check_finite("ymsd", msd.ymsd())?;
    check_finite("zmsd", msd.zmsd())?;
    let (xmax, ymax) = msd_bounds(msd)?;
    let (x0, x1) = drawable(0.0, xmax);
    let (y0, y1) = drawable(0.0, ymax);

    let root = BitMapBackend::new(path.as_ref(), IMAGE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(Error::render)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(Error::render)?;
    chart
        .configure_mesh()
        .x_desc("Timestep (ps)")
        .y_desc("MSD")
        .draw()
        .map_err(Error::render)?;

    for (label, series, color) in [
        ("MSD", msd.msd(), CRIMSON),
        ("XMSD", msd.xmsd(), BLUE),
        ("YMSD", msd.ymsd(), BLACK),
        ("ZMSD", msd.zmsd(), DARK_GREEN),
    ] {
        let points = msd.time().iter().copied().zip(series.iter().copied());
        chart
            .draw_series(points.map(|p| Circle::new(p, 3, color.filled())))
            .map_err(Error::render)?
            .label(label)
            .legend(move |(x, y)| Circle::new((x + 10, y), 3, color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(Error::render)?;
    root.present().map_err(Error::render)?;
    Ok(())
}

/// Scatter per-atom diffusion coefficients against the distance from the interface.
pub fn pmsd_plot(spatial: &SpatialDiffusion, path: impl AsRef<Path>) -> Result<()> {
    scatter_against_position(
        &spatial.positions,
        &spatial.diffusion,
        None,
        path.as_ref(),
    )
}

/// Scatter binned diffusion coefficients, with a horizontal reference line at the overall
/// coefficient.
pub fn pmsd_average_plot(
    binned: &BinnedDiffusion,
    coefficient: f64,
    path: impl AsRef<Path>,
) -> Result<()> {
    if !coefficient.is_finite() {
        return Err(Error::NonFinite {
            name: "coefficient",
            index: 0,
        });
    }
    scatter_against_position(
        &binned.centers,
        &binned.diffusion,
        Some(coefficient),
        path.as_ref(),
    )
}

/// A generic two-series line plot with caller-supplied axis labels.
pub fn line_plot(
    x: &[f64],
    y: &[f64],
    x_label: &str,
    y_label: &str,
    path: impl AsRef<Path>,
) -> Result<()> {
    validate_pair("x", x, "y", y)?;
    let (x0, x1) = drawable(series_min(x), series_max(x));
    let (y0, y1) = drawable(series_min(y), series_max(y));

    let root = BitMapBackend::new(path.as_ref(), IMAGE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(Error::render)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(Error::render)?;
    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .draw()
        .map_err(Error::render)?;
    chart
        .draw_series(LineSeries::new(
            x.iter().copied().zip(y.iter().copied()),
            &CRIMSON,
        ))
        .map_err(Error::render)?;
    root.present().map_err(Error::render)?;
    Ok(())
}

/// Render a 2D grid as a filled heatmap with logarithmic color normalization.
///
/// `grid` holds one row per `y` value, each row one value per `x` value. Because the color
/// scale is logarithmic and anchored at the observed minimum and maximum, every grid value
/// must be finite and strictly positive; anything else is rejected before rendering.
pub fn contour_plot(
    x: &[f64],
    y: &[f64],
    grid: &[Vec<f64>],
    path: impl AsRef<Path>,
) -> Result<()> {
    if x.is_empty() {
        return Err(Error::EmptySeries { name: "x" });
    }
    if y.is_empty() {
        return Err(Error::EmptySeries { name: "y" });
    }
    check_finite("x", x)?;
    check_finite("y", y)?;
    if grid.len() != y.len() || grid.iter().any(|row| row.len() != x.len()) {
        return Err(Error::GridShape {
            rows: grid.len(),
            cols: grid.iter().map(|row| row.len()).max().unwrap_or(0),
            expected_rows: y.len(),
            expected_cols: x.len(),
        });
    }
    let mut zmin = f64::INFINITY;
    let mut zmax = f64::NEG_INFINITY;
    for (r, row) in grid.iter().enumerate() {
        for (c, &value) in row.iter().enumerate() {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::NonPositiveGrid {
                    value,
                    row: r,
                    col: c,
                });
            }
            zmin = zmin.min(value);
            zmax = zmax.max(value);
        }
    }

    let x_edges = cell_edges(x);
    let y_edges = cell_edges(y);

    let root = BitMapBackend::new(path.as_ref(), IMAGE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(Error::render)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(
            x_edges[0]..x_edges[x.len()],
            y_edges[0]..y_edges[y.len()],
        )
        .map_err(Error::render)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("X Coordinate")
        .y_desc("Y Coordinate")
        .draw()
        .map_err(Error::render)?;

    let ln_min = zmin.ln();
    let ln_range = zmax.ln() - ln_min;
    for (r, row) in grid.iter().enumerate() {
        for (c, &value) in row.iter().enumerate() {
            // Degenerate range (a constant grid) pins the ramp to its midpoint.
            let t = if ln_range > 0.0 {
                (value.ln() - ln_min) / ln_range
            } else {
                0.5
            };
            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [(x_edges[c], y_edges[r]), (x_edges[c + 1], y_edges[r + 1])],
                    heat_color(t).filled(),
                )))
                .map_err(Error::render)?;
        }
    }

    root.present().map_err(Error::render)?;
    Ok(())
}

fn scatter_against_position(
    positions: &[f64],
    diffusion: &[f64],
    reference: Option<f64>,
    path: &Path,
) -> Result<()> {
    validate_pair("positions", positions, "diffusion", diffusion)?;
    let (x0, x1) = drawable(series_min(positions), series_max(positions));
    let (y0, y1) = drawable(0.0, series_max(diffusion).max(reference.unwrap_or(0.0)));

    let root = BitMapBackend::new(path, IMAGE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(Error::render)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(Error::render)?;
    chart
        .configure_mesh()
        .x_desc("Distance from Interface")
        .y_desc("Diffusion Coefficient")
        .draw()
        .map_err(Error::render)?;

    if let Some(coefficient) = reference {
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(x0, coefficient), (x1, coefficient)],
                GREY,
            )))
            .map_err(Error::render)?;
    }

    let points = positions.iter().copied().zip(diffusion.iter().copied());
    chart
        .draw_series(points.map(|p| Circle::new(p, 3, CRIMSON.filled())))
        .map_err(Error::render)?;
    root.present().map_err(Error::render)?;
    Ok(())
}

fn validate_pair(
    x_name: &'static str,
    x: &[f64],
    y_name: &'static str,
    y: &[f64],
) -> Result<()> {
    if x.is_empty() {
        return Err(Error::EmptySeries { name: x_name });
    }
    if x.len() != y.len() {
        return Err(Error::LengthMismatch {
            left: x_name,
            left_len: x.len(),
            right: y_name,
            right_len: y.len(),
        });
    }
    check_finite(x_name, x)?;
    check_finite(y_name, y)?;
    Ok(())
}

fn series_max(series: &[f64]) -> f64 {
    series.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

fn series_min(series: &[f64]) -> f64 {
    series.iter().copied().fold(f64::INFINITY, f64::min)
}

/// A usable axis range, padding out ranges a flat series would collapse to nothing.
fn drawable(min: f64, max: f64) -> (f64, f64) {
    if max > min {
        (min, max)
    } else {
        (min - 0.5, max + 0.5)
    }
}

/// Boundaries between grid cells: midpoints between samples, extended half a cell at
/// either end.
fn cell_edges(samples: &[f64]) -> Vec<f64> {
    let n = samples.len();
    let mut edges = Vec::with_capacity(n + 1);
    if n == 1 {
        return vec![samples[0] - 0.5, samples[0] + 0.5];
    }
    edges.push(samples[0] - (samples[1] - samples[0]) / 2.0);
    for pair in samples.windows(2) {
        edges.push((pair[0] + pair[1]) / 2.0);
    }
    edges.push(samples[n - 1] + (samples[n - 1] - samples[n - 2]) / 2.0);
    edges
}

/// The classic "hot" ramp: black through red and yellow to white.
fn heat_color(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let r = (3.0 * t).clamp(0.0, 1.0);
    let g = (3.0 * t - 1.0).clamp(0.0, 1.0);
    let b = (3.0 * t - 2.0).clamp(0.0, 1.0);
    RGBColor((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
}
