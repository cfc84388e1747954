//! Force-plate tabular reader.
//!
//! Expects one header row naming the channels, then one row per sample.
//! Channel columns follow `<plate>_<component>` with components fx/fy/fz
//! (force, N), mx/my/mz (moment, about the declared length unit), and
//! optionally px/py/pz (center of pressure, declared length unit). An
//! optional leading `time` column supplies timestamps; otherwise they are
//! synthesized from the configured rate and start offset.

use std::collections::BTreeMap;

use contracts::{
    CanonicalSeries, Channel, PipelineError, Quantity, Sample, SourceConfig, TIME_EQ_TOLERANCE_S,
};
use tracing::debug;

use crate::common::{parse_cell, read_tsv_records};

/// Read a force-plate export into a canonical series
///
/// Produces up to three channels per plate: `<plate>_force`,
/// `<plate>_moment`, and `<plate>_cop` when COP columns are present.
pub fn read_force_plate(config: &SourceConfig) -> Result<CanonicalSeries, PipelineError> {
    let records = read_tsv_records(&config.path, &config.name)?;
    let (header, body) = records.split_first().ok_or_else(|| {
        PipelineError::malformed_source(&config.name, None, None, "empty file")
    })?;

    let layout = parse_plate_layout(header, &config.name)?;
    debug!(source = %config.name, plates = layout.plates.len(), "parsed force-plate layout");

    let length_scale = config.units.to_meters();
    let mut channels: Vec<Channel> = Vec::new();
    let mut groups: Vec<(&ComponentGroup, Quantity, f64)> = Vec::new();
    for plate in &layout.plates {
        // Moments scale with the length unit (N·mm -> N·m); forces do not.
        groups.push((&plate.force, Quantity::Force, 1.0));
        groups.push((&plate.moment, Quantity::Moment, length_scale));
        if let Some(cop) = &plate.cop {
            groups.push((cop, Quantity::Position, length_scale));
        }
    }
    for (group, quantity, _) in &groups {
        channels.push(Channel {
            label: group.label.clone(),
            quantity: *quantity,
            dim: 3,
            samples: Vec::with_capacity(body.len()),
        });
    }

    let mut prev_time: Option<f64> = None;
    for (i, record) in body.iter().enumerate() {
        let row = i + 1;

        let time = match layout.time_column {
            Some(col) => {
                let raw = record.get(col).map(String::as_str).unwrap_or("");
                let t = parse_cell(raw, &config.name, row, "time")?.ok_or_else(|| {
                    PipelineError::malformed_source(
                        &config.name,
                        Some(row),
                        Some("time".to_string()),
                        "missing time value",
                    )
                })?;
                if let Some(prev) = prev_time {
                    if t - prev <= TIME_EQ_TOLERANCE_S {
                        return Err(PipelineError::malformed_source(
                            &config.name,
                            Some(row),
                            Some("time".to_string()),
                            format!("timestamps not strictly increasing: {prev} then {t}"),
                        ));
                    }
                }
                prev_time = Some(t);
                t
            }
            None => config.start_offset_s + i as f64 / config.rate_hz,
        };

        for (channel, (group, _, scale)) in channels.iter_mut().zip(&groups) {
            let mut values = [0.0f64; 3];
            let mut complete = true;
            for (axis_idx, col) in group.columns.iter().enumerate() {
                let raw = record.get(*col).map(String::as_str).unwrap_or("");
                let field = &layout.column_names[*col];
                match parse_cell(raw, &config.name, row, field)? {
                    Some(v) => values[axis_idx] = v * scale,
                    None => complete = false,
                }
            }
            if complete {
                channel.samples.push(Sample::new(time, values.to_vec()));
            } else {
                channel.samples.push(Sample::invalid(time, 3));
            }
        }
    }

    metrics::counter!("reader_frames_total", "source" => config.name.clone())
        .increment(body.len() as u64);

    CanonicalSeries::try_new(
        &config.name,
        config.rate_hz,
        config.start_offset_s,
        channels,
    )
}

/// Column indices of one x/y/z component triple
struct ComponentGroup {
    /// Output channel label, e.g. `FP1_force`
    label: String,
    /// Column indices for x, y, z in that order
    columns: [usize; 3],
}

struct PlateColumns {
    force: ComponentGroup,
    moment: ComponentGroup,
    cop: Option<ComponentGroup>,
}

struct PlateLayout {
    time_column: Option<usize>,
    column_names: Vec<String>,
    plates: Vec<PlateColumns>,
}

fn parse_plate_layout(header: &[String], source_name: &str) -> Result<PlateLayout, PipelineError> {
    let column_names: Vec<String> = header.iter().map(|c| c.trim().to_string()).collect();

    let mut time_column = None;
    // plate -> component -> column index; BTreeMap keeps plate order stable
    let mut plates: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();

    for (col, name) in column_names.iter().enumerate() {
        if name.is_empty() {
            continue;
        }
        if name.eq_ignore_ascii_case("time") {
            time_column = Some(col);
            continue;
        }
        let (plate, component) = name.rsplit_once('_').ok_or_else(|| {
            PipelineError::malformed_source(
                source_name,
                Some(0),
                Some(name.clone()),
                "expected '<plate>_<component>' column name",
            )
        })?;
        let component = component.to_ascii_lowercase();
        if !matches!(
            component.as_str(),
            "fx" | "fy" | "fz" | "mx" | "my" | "mz" | "px" | "py" | "pz"
        ) {
            return Err(PipelineError::malformed_source(
                source_name,
                Some(0),
                Some(name.clone()),
                format!("unknown force-plate component '{component}'"),
            ));
        }
        let previous = plates
            .entry(plate.to_string())
            .or_default()
            .insert(component.clone(), col);
        if previous.is_some() {
            return Err(PipelineError::malformed_source(
                source_name,
                Some(0),
                Some(name.clone()),
                "duplicate force-plate column",
            ));
        }
    }

    if plates.is_empty() {
        return Err(PipelineError::malformed_source(
            source_name,
            Some(0),
            None,
            "no force-plate columns found",
        ));
    }

    let mut result = Vec::new();
    for (plate, components) in &plates {
        let triple = |prefix: char| -> Option<[usize; 3]> {
            let x = components.get(&format!("{prefix}x"))?;
            let y = components.get(&format!("{prefix}y"))?;
            let z = components.get(&format!("{prefix}z"))?;
            Some([*x, *y, *z])
        };
        let require = |prefix: char, what: &str| -> Result<[usize; 3], PipelineError> {
            triple(prefix).ok_or_else(|| {
                PipelineError::malformed_source(
                    source_name,
                    Some(0),
                    Some(plate.clone()),
                    format!("incomplete {what} triple for plate '{plate}'"),
                )
            })
        };

        result.push(PlateColumns {
            force: ComponentGroup {
                label: format!("{plate}_force"),
                columns: require('f', "force")?,
            },
            moment: ComponentGroup {
                label: format!("{plate}_moment"),
                columns: require('m', "moment")?,
            },
            cop: triple('p').map(|columns| ComponentGroup {
                label: format!("{plate}_cop"),
                columns,
            }),
        });
    }

    Ok(PlateLayout {
        time_column,
        column_names,
        plates: result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{LengthUnit, SourceKind};
    use std::io::Write;

    const SMALL_GRF: &str = "\
time\tFP1_Fx\tFP1_Fy\tFP1_Fz\tFP1_Mx\tFP1_My\tFP1_Mz\tFP1_Px\tFP1_Py\tFP1_Pz\n\
0.000\t1.0\t2.0\t700.0\t10.0\t20.0\t30.0\t100.0\t200.0\t0.0\n\
0.001\t1.5\t2.5\t705.0\t\t\t\t101.0\t201.0\t0.0\n";

    fn write_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".tsv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn config(path: std::path::PathBuf) -> SourceConfig {
        SourceConfig {
            name: "plates".into(),
            path,
            kind: SourceKind::ForcePlate,
            rate_hz: 1000.0,
            start_offset_s: 0.0,
            units: LengthUnit::Millimeters,
        }
    }

    #[test]
    fn groups_plate_channels() {
        let file = write_file(SMALL_GRF);
        let series = read_force_plate(&config(file.path().into())).unwrap();
        let labels: Vec<&str> = series.channels().iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["FP1_force", "FP1_moment", "FP1_cop"]);

        let force = &series.channels()[0];
        assert_eq!(force.quantity, Quantity::Force);
        // Forces stay in newtons
        assert!((force.samples[0].values[2] - 700.0).abs() < 1e-12);

        let moment = &series.channels()[1];
        // N·mm -> N·m
        assert!((moment.samples[0].values[0] - 0.01).abs() < 1e-12);
        // missing moment triple -> invalid
        assert!(!moment.samples[1].valid);

        let cop = &series.channels()[2];
        assert_eq!(cop.quantity, Quantity::Position);
        assert!((cop.samples[0].values[0] - 0.1).abs() < 1e-12);
    }

    #[test]
    fn time_column_is_authoritative() {
        let file = write_file(SMALL_GRF);
        let series = read_force_plate(&config(file.path().into())).unwrap();
        assert!((series.time(1).unwrap() - 0.001).abs() < 1e-12);
    }

    #[test]
    fn synthesizes_time_without_column() {
        let content = SMALL_GRF
            .lines()
            .map(|l| {
                l.splitn(2, '\t')
                    .nth(1)
                    .unwrap()
                    .to_string()
            })
            .collect::<Vec<_>>()
            .join("\n");
        let file = write_file(&content);
        let series = read_force_plate(&config(file.path().into())).unwrap();
        assert!((series.time(1).unwrap() - 0.001).abs() < 1e-12);
    }

    #[test]
    fn rejects_incomplete_plate() {
        let content = SMALL_GRF.replace("FP1_Mz", "FP2_Mz");
        let file = write_file(&content);
        let err = read_force_plate(&config(file.path().into()))
            .unwrap_err()
            .to_string();
        assert!(err.contains("incomplete"), "got: {err}");
    }

    #[test]
    fn rejects_unknown_component() {
        let content = SMALL_GRF.replace("FP1_Px", "FP1_Qx");
        let file = write_file(&content);
        let err = read_force_plate(&config(file.path().into()))
            .unwrap_err()
            .to_string();
        assert!(err.contains("unknown force-plate component"), "got: {err}");
    }
}
