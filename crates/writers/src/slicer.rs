//! Per-trial slicing of a merged table.

use contracts::{PipelineError, ResampledChannel, SliceRange, TimeBase, WideTable};
use tracing::debug;

/// Cut a table into per-trial sub-tables
///
/// Ranges are 1-based and inclusive on both ends. Each slice gets its frames
/// renumbered from 1 and its time column re-zeroed to the slice start, so a
/// trial file stands on its own. Ranges past the table bounds are
/// [`RangeOutOfBounds`]; overlapping ranges are [`OverlapNotAllowed`] unless
/// explicitly permitted.
///
/// [`RangeOutOfBounds`]: PipelineError::RangeOutOfBounds
/// [`OverlapNotAllowed`]: PipelineError::OverlapNotAllowed
pub fn slice_table(
    table: &WideTable,
    ranges: &[SliceRange],
    allow_overlap: bool,
) -> Result<Vec<WideTable>, PipelineError> {
    let num_frames = table.num_frames();

    for range in ranges {
        if range.start_frame < 1 || range.end_frame < range.start_frame || range.end_frame > num_frames {
            return Err(PipelineError::RangeOutOfBounds {
                start_frame: range.start_frame,
                end_frame: range.end_frame,
                num_frames,
            });
        }
    }

    if !allow_overlap {
        let mut ordered: Vec<&SliceRange> = ranges.iter().collect();
        ordered.sort_by_key(|r| (r.start_frame, r.end_frame));
        for pair in ordered.windows(2) {
            if pair[1].start_frame <= pair[0].end_frame {
                return Err(PipelineError::OverlapNotAllowed {
                    first_start: pair[0].start_frame,
                    first_end: pair[0].end_frame,
                    second_start: pair[1].start_frame,
                    second_end: pair[1].end_frame,
                });
            }
        }
    }

    let mut slices = Vec::with_capacity(ranges.len());
    for range in ranges {
        let first = range.start_frame - 1;
        let len = range.end_frame - range.start_frame + 1;

        let columns: Vec<ResampledChannel> = table
            .columns()
            .iter()
            .map(|c| ResampledChannel {
                label: c.label.clone(),
                quantity: c.quantity,
                dim: c.dim,
                cells: c.cells[first..first + len].to_vec(),
            })
            .collect();

        let timebase = TimeBase::new(0.0, table.timebase().rate_hz(), len)?;
        debug!(
            start_frame = range.start_frame,
            end_frame = range.end_frame,
            frames = len,
            "sliced trial"
        );
        slices.push(WideTable::try_new(timebase, columns)?);
    }

    Ok(slices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{Cell, Quantity};

    fn table(frames: usize) -> WideTable {
        let tb = TimeBase::new(0.0, 100.0, frames).unwrap();
        let column = ResampledChannel {
            label: "hip".into(),
            quantity: Quantity::Position,
            dim: 3,
            cells: (0..frames)
                .map(|i| Cell::new(vec![i as f64, 0.0, 0.0]))
                .collect(),
        };
        WideTable::try_new(tb, vec![column]).unwrap()
    }

    fn range(start: usize, end: usize) -> SliceRange {
        SliceRange {
            start_frame: start,
            end_frame: end,
            label: None,
        }
    }

    #[test]
    fn renumbers_and_rezeroes() {
        let slices = slice_table(&table(20), &[range(11, 20)], false).unwrap();
        assert_eq!(slices.len(), 1);
        let s = &slices[0];
        assert_eq!(s.num_frames(), 10);
        assert!((s.timebase().time(0) - 0.0).abs() < 1e-12);
        // values come from the original frames 11..=20
        assert_eq!(s.column("hip").unwrap().cells[0].values[0], 10.0);
        assert_eq!(s.column("hip").unwrap().cells[9].values[0], 19.0);
    }

    #[test]
    fn adjacent_slices_concatenate_to_the_whole() {
        let full = table(20);
        let slices = slice_table(&full, &[range(1, 10), range(11, 20)], false).unwrap();
        let rebuilt: Vec<f64> = slices
            .iter()
            .flat_map(|s| s.column("hip").unwrap().cells.iter().map(|c| c.values[0]))
            .collect();
        let original: Vec<f64> = full
            .column("hip")
            .unwrap()
            .cells
            .iter()
            .map(|c| c.values[0])
            .collect();
        assert_eq!(rebuilt, original);
    }

    #[test]
    fn out_of_bounds_is_rejected() {
        let err = slice_table(&table(20), &[range(15, 25)], false).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::RangeOutOfBounds {
                start_frame: 15,
                end_frame: 25,
                num_frames: 20
            }
        ));
    }

    #[test]
    fn zero_start_is_rejected() {
        assert!(matches!(
            slice_table(&table(20), &[range(0, 5)], false),
            Err(PipelineError::RangeOutOfBounds { .. })
        ));
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(matches!(
            slice_table(&table(20), &[range(10, 5)], false),
            Err(PipelineError::RangeOutOfBounds { .. })
        ));
    }

    #[test]
    fn overlap_rejected_by_default() {
        let err = slice_table(&table(20), &[range(1, 10), range(10, 20)], false).unwrap_err();
        assert!(matches!(err, PipelineError::OverlapNotAllowed { .. }));
    }

    #[test]
    fn overlap_allowed_when_opted_in() {
        let slices = slice_table(&table(20), &[range(1, 10), range(5, 15)], true).unwrap();
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[1].num_frames(), 11);
    }

    #[test]
    fn single_frame_slice() {
        let slices = slice_table(&table(20), &[range(7, 7)], false).unwrap();
        assert_eq!(slices[0].num_frames(), 1);
        assert_eq!(slices[0].column("hip").unwrap().cells[0].values[0], 6.0);
    }
}
