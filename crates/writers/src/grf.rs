//! Ground-reaction-force MOT serialization.
//!
//! Emits an OpenSim storage file: free-text name line, `version=1`,
//! `nRows=`/`nColumns=`, `inDegrees=yes`, `endheader`, one label row, then
//! one row per frame. Columns per plate follow the external-loads
//! convention: `ground_force_<p>_v{x,y,z}` (force, N),
//! `ground_force_<p>_p{x,y,z}` (point of application, m),
//! `ground_torque_<p>_{x,y,z}` (free moment, N·m). Invalid cells emit `NaN`.

use std::fmt::Write as _;
use std::path::Path;

use contracts::{GrfOutputConfig, PipelineError, Quantity, ResampledChannel, WideTable};
use tracing::{info, instrument};

use crate::document::FormatDocument;

/// One plate's columns in the merged force table
struct PlateGroup<'a> {
    name: &'a str,
    force: &'a ResampledChannel,
    moment: &'a ResampledChannel,
    cop: Option<&'a ResampledChannel>,
}

/// Render a merged force table as a MOT document
pub fn render_grf(table: &WideTable, output: &GrfOutputConfig) -> Result<FormatDocument, PipelineError> {
    let plates = group_plates(table)?;
    let timebase = table.timebase();
    let num_frames = table.num_frames();
    // time + 9 columns per plate
    let num_columns = 1 + 9 * plates.len();

    let mut text = String::new();
    let _ = writeln!(text, "{}", file_stem(&output.path));
    let _ = writeln!(text, "version=1");
    let _ = writeln!(text, "nRows={num_frames}");
    let _ = writeln!(text, "nColumns={num_columns}");
    let _ = writeln!(text, "inDegrees=yes");
    let _ = writeln!(text, "endheader");

    let mut labels = String::from("time");
    for plate in &plates {
        for axis in ["vx", "vy", "vz"] {
            let _ = write!(labels, "\tground_force_{}_{axis}", plate.name);
        }
        for axis in ["px", "py", "pz"] {
            let _ = write!(labels, "\tground_force_{}_{axis}", plate.name);
        }
        for axis in ["x", "y", "z"] {
            let _ = write!(labels, "\tground_torque_{}_{axis}", plate.name);
        }
    }
    let _ = writeln!(text, "{labels}");

    for i in 0..num_frames {
        let mut line = format!("{:.6}", timebase.time(i));
        for plate in &plates {
            push_triple(&mut line, plate.force, i);
            match plate.cop {
                Some(cop) => push_triple(&mut line, cop, i),
                None => line.push_str("\tNaN\tNaN\tNaN"),
            }
            push_triple(&mut line, plate.moment, i);
        }
        let _ = writeln!(text, "{line}");
    }

    Ok(FormatDocument::new(text))
}

/// Render and atomically write the MOT output file
#[instrument(name = "write_grf", skip(table, output), fields(path = %output.path.display()))]
pub fn write_grf(table: &WideTable, output: &GrfOutputConfig) -> Result<(), PipelineError> {
    let document = render_grf(table, output)?;
    document.write_to(&output.path)?;
    info!(
        path = %output.path.display(),
        frames = table.num_frames(),
        "MOT written"
    );
    metrics::counter!("writer_mot_frames_total").increment(table.num_frames() as u64);
    Ok(())
}

fn push_triple(line: &mut String, channel: &ResampledChannel, row: usize) {
    let cell = &channel.cells[row];
    if cell.valid {
        for v in &cell.values {
            let _ = write!(line, "\t{v:.6}");
        }
    } else {
        line.push_str("\tNaN\tNaN\tNaN");
    }
}

/// Group `<plate>_force` / `<plate>_moment` / `<plate>_cop` columns by plate
fn group_plates(table: &WideTable) -> Result<Vec<PlateGroup<'_>>, PipelineError> {
    for column in table.columns() {
        if column.dim != 3 {
            return Err(PipelineError::shape_mismatch(
                format!("channel '{}' dimensionality", column.label),
                3,
                column.dim,
            ));
        }
    }

    let mut plates = Vec::new();
    for force in table.columns_of(Quantity::Force) {
        let name = force.label.strip_suffix("_force").ok_or_else(|| {
            PipelineError::incompatible_series(
                &force.label,
                "force channel label must end in '_force'",
            )
        })?;
        let moment = table.column(&format!("{name}_moment")).ok_or_else(|| {
            PipelineError::incompatible_series(
                &force.label,
                format!("plate '{name}' has no moment channel"),
            )
        })?;
        plates.push(PlateGroup {
            name,
            force,
            moment,
            cop: table.column(&format!("{name}_cop")),
        });
    }

    if plates.is_empty() {
        return Err(PipelineError::empty_merge(
            "no force channels to write to MOT output",
        ));
    }

    Ok(plates)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
