//! Resampled channels and the merged wide table.

use serde::{Deserialize, Serialize};

use crate::{PipelineError, Quantity, TimeBase};

/// One resampled value on the output time base
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Value vector (length == channel dimensionality), SI units
    pub values: Vec<f64>,

    /// False means no data could be honestly produced for this frame
    pub valid: bool,
}

impl Cell {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            valid: true,
        }
    }

    pub fn invalid(dim: usize) -> Self {
        Self {
            values: vec![f64::NAN; dim],
            valid: false,
        }
    }
}

/// A channel re-expressed against a shared [`TimeBase`]
///
/// `cells.len()` always equals the time base length it was produced for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResampledChannel {
    pub label: String,
    pub quantity: Quantity,
    pub dim: usize,
    pub cells: Vec<Cell>,
}

impl ResampledChannel {
    /// Count of frames carrying no honest data
    pub fn invalid_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.valid).count()
    }
}

/// The merged, rectangular output table
///
/// One row per output frame, one column group per channel. Column order is
/// deterministic (source precedence, then label); row count equals the time
/// base length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WideTable {
    timebase: TimeBase,
    columns: Vec<ResampledChannel>,
}

impl WideTable {
    /// Construct a table, enforcing rectangularity against the time base
    pub fn try_new(
        timebase: TimeBase,
        columns: Vec<ResampledChannel>,
    ) -> Result<Self, PipelineError> {
        for column in &columns {
            if column.cells.len() != timebase.len() {
                return Err(PipelineError::shape_mismatch(
                    format!("column '{}' rows", column.label),
                    timebase.len(),
                    column.cells.len(),
                ));
            }
            for (row, cell) in column.cells.iter().enumerate() {
                if cell.values.len() != column.dim {
                    return Err(PipelineError::shape_mismatch(
                        format!("column '{}' row {row} dimensionality", column.label),
                        column.dim,
                        cell.values.len(),
                    ));
                }
            }
        }
        Ok(Self { timebase, columns })
    }

    pub fn timebase(&self) -> &TimeBase {
        &self.timebase
    }

    pub fn columns(&self) -> &[ResampledChannel] {
        &self.columns
    }

    pub fn num_frames(&self) -> usize {
        self.timebase.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, label: &str) -> Option<&ResampledChannel> {
        self.columns.iter().find(|c| c.label == label)
    }

    /// Columns of a given quantity, in table order
    pub fn columns_of(&self, quantity: Quantity) -> impl Iterator<Item = &ResampledChannel> {
        self.columns.iter().filter(move |c| c.quantity == quantity)
    }

    /// Total count of invalid cells across all columns
    pub fn invalid_cell_count(&self) -> usize {
        self.columns.iter().map(ResampledChannel::invalid_count).sum()
    }

    /// Cells of the 0-based frame `row`, in column order
    pub fn row(&self, row: usize) -> impl Iterator<Item = &Cell> {
        self.columns.iter().map(move |c| &c.cells[row])
    }
}
