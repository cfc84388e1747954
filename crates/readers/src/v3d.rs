//! Visual3D-style TSV export reader (landmarks and marker targets).
//!
//! Layout: five header lines (origin-file row, marker-name row, two
//! folder/type rows, then an axis row starting with `ITEM`) followed by one
//! row per frame: frame number, then per-marker X/Y/Z cells. Empty cells and
//! `NaN` mark occluded samples.

use contracts::{CanonicalSeries, Channel, PipelineError, Quantity, Sample, SourceConfig};
use tracing::debug;

use crate::common::{parse_cell, parse_frame_number, read_tsv_records, Record};

const HEADER_LINES: usize = 5;

/// Read a Visual3D TSV export into a canonical series
pub fn read_v3d(config: &SourceConfig) -> Result<CanonicalSeries, PipelineError> {
    let records = read_tsv_records(&config.path, &config.name)?;
    if records.len() < HEADER_LINES {
        return Err(PipelineError::malformed_source(
            &config.name,
            None,
            None,
            format!(
                "expected at least {HEADER_LINES} header lines, got {} lines total",
                records.len()
            ),
        ));
    }

    let markers = parse_marker_layout(&records[1], &records[4], &config.name)?;
    debug!(source = %config.name, markers = markers.len(), "parsed marker layout");

    let scale = config.units.to_meters();
    let num_frames = records.len() - HEADER_LINES;
    let mut channels: Vec<Channel> = markers
        .iter()
        .map(|label| Channel {
            label: label.clone(),
            quantity: Quantity::Position,
            dim: 3,
            samples: Vec::with_capacity(num_frames),
        })
        .collect();

    let mut prev_item: Option<i64> = None;
    let mut first_item: Option<i64> = None;

    for (i, record) in records[HEADER_LINES..].iter().enumerate() {
        let row = HEADER_LINES + i;
        let raw_item = record.first().map(String::as_str).unwrap_or("");
        let item = parse_frame_number(raw_item, &config.name, row)?;

        if let Some(prev) = prev_item {
            if item <= prev {
                return Err(PipelineError::malformed_source(
                    &config.name,
                    Some(row),
                    Some("frame".to_string()),
                    format!("frame numbers not strictly increasing: {prev} then {item}"),
                ));
            }
        }
        prev_item = Some(item);
        let first = *first_item.get_or_insert(item);

        let time = config.start_offset_s + (item - first) as f64 / config.rate_hz;

        for (k, channel) in channels.iter_mut().enumerate() {
            let mut values = [0.0f64; 3];
            let mut complete = true;
            for (axis_idx, axis) in ["X", "Y", "Z"].iter().enumerate() {
                let col = 1 + 3 * k + axis_idx;
                let raw = record.get(col).map(String::as_str).unwrap_or("");
                let field = format!("{}_{axis}", channel.label);
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

    metrics::counter!("reader_frames_total", "source" => config.name.clone())
        .increment(num_frames as u64);

    CanonicalSeries::try_new(
        &config.name,
        config.rate_hz,
        config.start_offset_s,
        channels,
    )
}

/// Extract marker labels from the name and axis header rows
///
/// The axis row starts with `ITEM` and then cycles X/Y/Z; the name row
/// repeats each marker's label across its three columns.
fn parse_marker_layout(
    names: &Record,
    axes: &Record,
    source_name: &str,
) -> Result<Vec<String>, PipelineError> {
    let lead = axes.first().map(String::as_str).unwrap_or("");
    if !lead.trim().eq_ignore_ascii_case("ITEM") {
        return Err(PipelineError::malformed_source(
            source_name,
            Some(4),
            Some("ITEM".to_string()),
            format!("axis row must start with ITEM, got '{lead}'"),
        ));
    }

    // Drop trailing empty cells; TSV exports often pad rows
    let mut axis_cells: Vec<&str> = axes[1..].iter().map(|c| c.trim()).collect();
    while axis_cells.last().is_some_and(|c| c.is_empty()) {
        axis_cells.pop();
    }

    if axis_cells.is_empty() || axis_cells.len() % 3 != 0 {
        return Err(PipelineError::malformed_source(
            source_name,
            Some(4),
            None,
            format!(
                "expected X/Y/Z column triples, got {} data columns",
                axis_cells.len()
            ),
        ));
    }

    for (j, cell) in axis_cells.iter().enumerate() {
        let expected = ["X", "Y", "Z"][j % 3];
        if !cell.to_ascii_uppercase().starts_with(expected) {
            return Err(PipelineError::malformed_source(
                source_name,
                Some(4),
                Some(format!("column {}", j + 1)),
                format!("expected axis {expected}, got '{cell}'"),
            ));
        }
    }

    let mut markers = Vec::with_capacity(axis_cells.len() / 3);
    for k in 0..axis_cells.len() / 3 {
        let col = 1 + 3 * k;
        let label = names.get(col).map(|c| c.trim()).unwrap_or("");
        if label.is_empty() {
            return Err(PipelineError::malformed_source(
                source_name,
                Some(1),
                Some(format!("column {col}")),
                "missing marker name",
            ));
        }
        // The other two cells of the triple, when present, must agree
        for offset in 1..3 {
            let other = names.get(col + offset).map(|c| c.trim()).unwrap_or("");
            if !other.is_empty() && other != label {
                return Err(PipelineError::malformed_source(
                    source_name,
                    Some(1),
                    Some(format!("column {}", col + offset)),
                    format!("marker name '{other}' does not match '{label}'"),
                ));
            }
        }
        if markers.contains(&label.to_string()) {
            return Err(PipelineError::malformed_source(
                source_name,
                Some(1),
                Some(label.to_string()),
                "duplicate marker label",
            ));
        }
        markers.push(label.to_string());
    }

    Ok(markers)
}
