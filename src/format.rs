//! Pure text formatting for the flat-file outputs, and the matching parsers.
//!
//! Nothing in here touches the filesystem. The writers in [`write`](crate::write) and the
//! CLI stitch these strings to actual files, which keeps the row/line layout testable
//! without any I/O.

use crate::analysis::{DiffusionCoefficients, Msd};
use crate::{Error, Result};

/// The unit every diffusion coefficient is reported in.
pub const DIFFUSION_UNIT: &str = "m^2/s (10^-9)";

/// Serialize the four MSD series as four comma-delimited rows.
///
/// Row order is msd, xmsd, ymsd, zmsd. Values are written in `f64` round-trip notation, so
/// [`parse_msd_rows`] recovers them exactly.
pub fn msd_rows(msd: &Msd) -> String {
    let mut out = String::new();
    for series in [msd.msd(), msd.xmsd(), msd.ymsd(), msd.zmsd()] {
        let mut first = true;
        for value in series {
            if !first {
                out.push(',');
            }
            out.push_str(&value.to_string());
            first = false;
        }
        out.push('\n');
    }
    out
}

/// Parse a four-row comma-delimited MSD table back into its series.
///
/// The inverse of [`msd_rows`]. Returns the rows in msd, xmsd, ymsd, zmsd order.
pub fn parse_msd_rows(text: &str) -> Result<[Vec<f64>; 4]> {
    let mut rows: Vec<Vec<f64>> = Vec::with_capacity(4);
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row = line
            .split(',')
            .map(|field| {
                field.trim().parse::<f64>().map_err(|err| Error::Parse {
                    line: idx + 1,
                    reason: format!("bad float {:?}: {err}", field.trim()),
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }

    if rows.len() != 4 {
        return Err(Error::Parse {
            line: rows.len(),
            reason: format!("expected 4 rows, found {}", rows.len()),
        });
    }
    let len = rows[0].len();
    if len == 0 {
        return Err(Error::EmptySeries { name: "msd" });
    }
    for (name, row) in ["xmsd", "ymsd", "zmsd"].iter().zip(&rows[1..]) {
        if row.len() != len {
            return Err(Error::LengthMismatch {
                left: "msd",
                left_len: len,
                right: name,
                right_len: row.len(),
            });
        }
    }

    let mut rows = rows.into_iter();
    Ok([
        rows.next().unwrap(),
        rows.next().unwrap(),
        rows.next().unwrap(),
        rows.next().unwrap(),
    ])
}

/// Format the four diffusion coefficients as labeled text lines.
///
/// Exactly four lines, each ending in [`DIFFUSION_UNIT`].
pub fn diffusion_lines(coefficients: &DiffusionCoefficients) -> String {
    format!(
        "3D Diffusion Coefficient: {} {DIFFUSION_UNIT}\n\
         2D X Diffusion Coefficient: {} {DIFFUSION_UNIT}\n\
         2D Y Diffusion Coefficient: {} {DIFFUSION_UNIT}\n\
         2D Z Diffusion Coefficient: {} {DIFFUSION_UNIT}\n",
        coefficients.d, coefficients.dx, coefficients.dy, coefficients.dz,
    )
}
