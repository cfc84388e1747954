//! Reader common utility functions

use contracts::PipelineError;
use std::path::Path;

/// One parsed tabular record (a row of string fields)
pub type Record = Vec<String>;

/// Read a tab-delimited file into string records
///
/// Rows may be ragged (header blocks often are); shape checks happen in the
/// per-format readers where the offending row can be named.
pub fn read_tsv_records(path: &Path, source_name: &str) -> Result<Vec<Record>, PipelineError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| {
            PipelineError::malformed_source(source_name, None, None, format!("cannot open: {e}"))
        })?;

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result.map_err(|e| {
            PipelineError::malformed_source(source_name, Some(row), None, format!("read error: {e}"))
        })?;
        records.push(record.iter().map(|f| f.to_string()).collect());
    }
    Ok(records)
}

/// Parse one numeric cell
///
/// Empty cells and NaN sentinels mean "missing" and return Ok(None); anything
/// else that fails to parse is a malformed record.
pub fn parse_cell(
    raw: &str,
    source_name: &str,
    row: usize,
    field: &str,
) -> Result<Option<f64>, PipelineError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    let value: f64 = trimmed.parse().map_err(|_| {
        PipelineError::malformed_source(
            source_name,
            Some(row),
            Some(field.to_string()),
            format!("unparsable numeric field '{trimmed}'"),
        )
    })?;
    if value.is_nan() {
        return Ok(None);
    }
    Ok(Some(value))
}

/// Parse an integer frame-number cell
pub fn parse_frame_number(
    raw: &str,
    source_name: &str,
    row: usize,
) -> Result<i64, PipelineError> {
    // Some exports write frame numbers as floats ("12.0")
    let trimmed = raw.trim();
    trimmed
        .parse::<i64>()
        .or_else(|_| trimmed.parse::<f64>().map(|f| f.round() as i64))
        .map_err(|_| {
            PipelineError::malformed_source(
                source_name,
                Some(row),
                Some("frame".to_string()),
                format!("unparsable frame number '{trimmed}'"),
            )
        })
}
