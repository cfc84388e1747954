//! TRC reader.
//!
//! Parses the exact header contract the TRC writer emits, so written output
//! can be re-read as a new source (round-trip) and sliced per trial.

use contracts::{
    CanonicalSeries, Channel, LengthUnit, PipelineError, Quantity, Sample, SourceConfig,
    TIME_EQ_TOLERANCE_S,
};
use tracing::debug;

use crate::common::{parse_cell, parse_frame_number, read_tsv_records};

const HEADER_LINES: usize = 5;

/// Read a TRC file into a canonical series
///
/// Header-declared rate and units take precedence over the source
/// configuration; the timestamps come from the file's own Time column.
pub fn read_trc(config: &SourceConfig) -> Result<CanonicalSeries, PipelineError> {
    let records = read_tsv_records(&config.path, &config.name)?;
    if records.len() < HEADER_LINES {
        return Err(PipelineError::malformed_source(
            &config.name,
            None,
            None,
            format!("expected {HEADER_LINES} header lines, got {} lines total", records.len()),
        ));
    }

    let lead = records[0].first().map(String::as_str).unwrap_or("");
    if lead != "PathFileType" {
        return Err(PipelineError::malformed_source(
            &config.name,
            Some(0),
            Some("PathFileType".to_string()),
            format!("not a TRC file, first field is '{lead}'"),
        ));
    }

    let header = parse_numeric_header(&records[2], &config.name)?;
    let markers = parse_label_row(&records[3], &config.name)?;

    if markers.len() != header.num_markers {
        return Err(PipelineError::malformed_source(
            &config.name,
            Some(3),
            None,
            format!(
                "header declares {} markers but label row has {}",
                header.num_markers,
                markers.len()
            ),
        ));
    }

    let body = &records[HEADER_LINES..];
    if body.len() != header.num_frames {
        return Err(PipelineError::malformed_source(
            &config.name,
            None,
            None,
            format!(
                "header declares {} frames but body has {} rows",
                header.num_frames,
                body.len()
            ),
        ));
    }

    debug!(source = %config.name, markers = markers.len(), frames = body.len(), "parsed TRC header");

    let scale = header.units.to_meters();
    let mut channels: Vec<Channel> = markers
        .iter()
        .map(|label| Channel {
            label: label.clone(),
            quantity: Quantity::Position,
            dim: 3,
            samples: Vec::with_capacity(body.len()),
        })
        .collect();

    let mut prev_time: Option<f64> = None;
    for (i, record) in body.iter().enumerate() {
        let row = HEADER_LINES + i;
        let raw_frame = record.first().map(String::as_str).unwrap_or("");
        parse_frame_number(raw_frame, &config.name, row)?;

        let raw_time = record.get(1).map(String::as_str).unwrap_or("");
        let time = parse_cell(raw_time, &config.name, row, "Time")?.ok_or_else(|| {
            PipelineError::malformed_source(
                &config.name,
                Some(row),
                Some("Time".to_string()),
                "missing time value",
            )
        })?;
        if let Some(prev) = prev_time {
            if time - prev <= TIME_EQ_TOLERANCE_S {
                return Err(PipelineError::malformed_source(
                    &config.name,
                    Some(row),
                    Some("Time".to_string()),
                    format!("timestamps not strictly increasing: {prev} then {time}"),
                ));
            }
        }
        prev_time = Some(time);

        for (k, channel) in channels.iter_mut().enumerate() {
            let mut values = [0.0f64; 3];
            let mut complete = true;
            for (axis_idx, axis) in ["X", "Y", "Z"].iter().enumerate() {
                let col = 2 + 3 * k + axis_idx;
                let raw = record.get(col).map(String::as_str).unwrap_or("");
                let field = format!("{axis}{}", k + 1);
                match parse_cell(raw, &config.name, row, &field)? {
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

    let start_offset_s = channels
        .first()
        .and_then(|c| c.samples.first())
        .map(|s| s.time)
        .unwrap_or(0.0);

    CanonicalSeries::try_new(&config.name, header.data_rate, start_offset_s, channels)
}

struct TrcHeader {
    data_rate: f64,
    num_frames: usize,
    num_markers: usize,
    units: LengthUnit,
}

/// Parse the third header line: DataRate CameraRate NumFrames NumMarkers
/// Units OrigDataRate OrigDataStartFrame OrigNumFrames
fn parse_numeric_header(record: &[String], source_name: &str) -> Result<TrcHeader, PipelineError> {
    let field = |idx: usize, name: &str| -> Result<&str, PipelineError> {
        record
            .get(idx)
            .map(String::as_str)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| {
                PipelineError::malformed_source(
                    source_name,
                    Some(2),
                    Some(name.to_string()),
                    "missing header field",
                )
            })
    };

    let parse_f64 = |raw: &str, name: &str| -> Result<f64, PipelineError> {
        raw.trim().parse().map_err(|_| {
            PipelineError::malformed_source(
                source_name,
                Some(2),
                Some(name.to_string()),
                format!("unparsable header field '{raw}'"),
            )
        })
    };

    let data_rate = parse_f64(field(0, "DataRate")?, "DataRate")?;
    let num_frames = parse_f64(field(2, "NumFrames")?, "NumFrames")? as usize;
    let num_markers = parse_f64(field(3, "NumMarkers")?, "NumMarkers")? as usize;

    let units_label = field(4, "Units")?;
    let units = LengthUnit::from_label(units_label).ok_or_else(|| {
        PipelineError::malformed_source(
            source_name,
            Some(2),
            Some("Units".to_string()),
            format!("unknown units '{units_label}'"),
        )
    })?;

    if data_rate <= 0.0 {
        return Err(PipelineError::malformed_source(
            source_name,
            Some(2),
            Some("DataRate".to_string()),
            format!("data rate must be > 0, got {data_rate}"),
        ));
    }

    Ok(TrcHeader {
        data_rate,
        num_frames,
        num_markers,
        units,
    })
}

/// Parse the label row: `Frame# Time <marker> _ _ <marker> _ _ ...`
fn parse_label_row(record: &[String], source_name: &str) -> Result<Vec<String>, PipelineError> {
    let lead = record.first().map(String::as_str).unwrap_or("");
    if lead != "Frame#" {
        return Err(PipelineError::malformed_source(
            source_name,
            Some(3),
            Some("Frame#".to_string()),
            format!("label row must start with Frame#, got '{lead}'"),
        ));
    }

    let mut cells: Vec<&str> = record[2..].iter().map(|c| c.trim()).collect();
    while cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }

    let mut markers = Vec::new();
    for (j, cell) in cells.iter().enumerate() {
        if j % 3 == 0 {
            if cell.is_empty() {
                return Err(PipelineError::malformed_source(
                    source_name,
                    Some(3),
                    Some(format!("column {}", j + 2)),
                    "missing marker label",
                ));
            }
            markers.push(cell.to_string());
        } else if !cell.is_empty() {
            return Err(PipelineError::malformed_source(
                source_name,
                Some(3),
                Some(format!("column {}", j + 2)),
                format!("unexpected label '{cell}' between marker triples"),
            ));
        }
    }

    Ok(markers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::SourceKind;
    use std::io::Write;

    const SMALL_TRC: &str = "\
PathFileType\t4\t(X/Y/Z)\tout.trc\n\
DataRate\tCameraRate\tNumFrames\tNumMarkers\tUnits\tOrigDataRate\tOrigDataStartFrame\tOrigNumFrames\n\
100\t100\t2\t2\tmm\t100\t1\t2\n\
Frame#\tTime\tLASIS\t\t\tRASIS\n\
\t\tX1\tY1\tZ1\tX2\tY2\tZ2\n\
1\t0.000000\t100.0\t200.0\t300.0\t\t\t\n\
2\t0.010000\t101.0\t201.0\t301.0\t-100.0\t-200.0\t-300.0\n";

    fn write_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".trc").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn config(path: std::path::PathBuf) -> SourceConfig {
        SourceConfig {
            name: "prior".into(),
            path,
            kind: SourceKind::Trc,
            rate_hz: 1.0, // overridden by the header
            start_offset_s: 0.0,
            units: LengthUnit::Meters, // overridden by the header
        }
    }

    #[test]
    fn reads_header_and_body() {
        let file = write_file(SMALL_TRC);
        let series = read_trc(&config(file.path().into())).unwrap();
        assert_eq!(series.num_frames(), 2);
        assert_eq!(series.channels().len(), 2);
        assert!((series.rate_hz - 100.0).abs() < 1e-12);
        // header says mm
        assert!((series.channels()[0].samples[0].values[0] - 0.1).abs() < 1e-12);
        // blank triple read back as invalid
        assert!(!series.channels()[1].samples[0].valid);
        assert!(series.channels()[1].samples[1].valid);
    }

    #[test]
    fn rejects_frame_count_mismatch() {
        let content = SMALL_TRC.replace(
            "100\t100\t2\t2\tmm",
            "100\t100\t3\t2\tmm",
        );
        let file = write_file(&content);
        let err = read_trc(&config(file.path().into())).unwrap_err().to_string();
        assert!(err.contains("declares 3 frames"), "got: {err}");
    }

    #[test]
    fn rejects_marker_count_mismatch() {
        let content = SMALL_TRC.replace(
            "100\t100\t2\t2\tmm",
            "100\t100\t2\t3\tmm",
        );
        let file = write_file(&content);
        assert!(read_trc(&config(file.path().into())).is_err());
    }

    #[test]
    fn rejects_non_trc_file() {
        let file = write_file("not\ta\ttrc\nfile\nwith\tfive\nnonempty\nlines\n");
        let err = read_trc(&config(file.path().into())).unwrap_err().to_string();
        assert!(err.contains("not a TRC file"), "got: {err}");
    }

    #[test]
    fn rejects_unknown_units() {
        let content = SMALL_TRC.replace("\tmm\t", "\tfurlong\t");
        let file = write_file(&content);
        let err = read_trc(&config(file.path().into())).unwrap_err().to_string();
        assert!(err.contains("unknown units"), "got: {err}");
    }
}
