//! TRC serialization.
//!
//! Header contract (tab-separated, trailing whitespace trimmed per line):
//!
//! ```text
//! PathFileType  4  (X/Y/Z)  <filename>
//! DataRate  CameraRate  NumFrames  NumMarkers  Units  OrigDataRate  OrigDataStartFrame  OrigNumFrames
//! <values>
//! Frame#  Time  <marker>      <marker>      ...
//!               X1  Y1  Z1  X2  Y2  Z2  ...
//! ```
//!
//! Body rows carry the 1-based frame number, time at six decimals, then one
//! X/Y/Z triple per marker in the output unit and axis convention. An
//! invalid cell emits three empty fields; the frame row itself is never
//! dropped.

use std::fmt::Write as _;
use std::path::Path;

use contracts::{OutputConfig, PipelineError, Quantity, WideTable};
use tracing::{info, instrument};

use crate::document::FormatDocument;

/// Render a merged table as a TRC document
///
/// Conversion out of the internal SI convention happens here: values are
/// scaled to the configured output unit and rotated into the configured axis
/// convention. Every column must be a 3D position channel.
pub fn render_trc(table: &WideTable, output: &OutputConfig) -> Result<FormatDocument, PipelineError> {
    for column in table.columns() {
        if column.quantity != Quantity::Position {
            return Err(PipelineError::incompatible_series(
                &column.label,
                "TRC output accepts position channels only",
            ));
        }
        if column.dim != 3 {
            return Err(PipelineError::shape_mismatch(
                format!("marker '{}' dimensionality", column.label),
                3,
                column.dim,
            ));
        }
    }

    let timebase = table.timebase();
    let num_frames = table.num_frames();
    let num_markers = table.num_columns();
    let rate = timebase.rate_hz();
    let camera_rate = output.camera_rate.unwrap_or(rate);
    let scale = output.units.from_meters();
    let filename = file_name(&output.path);

    let mut text = String::new();
    let _ = writeln!(text, "PathFileType\t4\t(X/Y/Z)\t{filename}");
    let _ = writeln!(
        text,
        "DataRate\tCameraRate\tNumFrames\tNumMarkers\tUnits\tOrigDataRate\tOrigDataStartFrame\tOrigNumFrames"
    );
    let _ = writeln!(
        text,
        "{rate}\t{camera_rate}\t{num_frames}\t{num_markers}\t{}\t{rate}\t1\t{num_frames}",
        output.units.label()
    );

    let mut labels = String::from("Frame#\tTime");
    for column in table.columns() {
        let _ = write!(labels, "\t{}\t\t", column.label);
    }
    let _ = writeln!(text, "{}", labels.trim_end());

    let mut axes = String::from("\t");
    for k in 1..=num_markers {
        let _ = write!(axes, "\tX{k}\tY{k}\tZ{k}");
    }
    let _ = writeln!(text, "{axes}");

    for i in 0..num_frames {
        let mut line = format!("{}\t{:.6}", i + 1, timebase.time(i));
        for cell in table.row(i) {
            if cell.valid {
                let rotated = output
                    .rotation
                    .apply([cell.values[0], cell.values[1], cell.values[2]]);
                for v in rotated {
                    let _ = write!(line, "\t{:.6}", v * scale);
                }
            } else {
                line.push_str("\t\t\t");
            }
        }
        let _ = writeln!(text, "{}", line.trim_end());
    }

    Ok(FormatDocument::new(text))
}

/// Render and atomically write the TRC output file
#[instrument(name = "write_trc", skip(table, output), fields(path = %output.path.display()))]
pub fn write_trc(table: &WideTable, output: &OutputConfig) -> Result<(), PipelineError> {
    let document = render_trc(table, output)?;
    document.write_to(&output.path)?;
    info!(
        path = %output.path.display(),
        frames = table.num_frames(),
        markers = table.num_columns(),
        "TRC written"
    );
    metrics::counter!("writer_trc_frames_total").increment(table.num_frames() as u64);
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
