//! Per-channel resampling against a shared time base.
//!
//! The single rule preventing silent fabrication of data: any output
//! timestamp whose bracketing gap between valid source samples exceeds the
//! configured tolerance is invalid, regardless of interpolation mode.

use contracts::{
    Cell, Channel, Extrapolate, Interpolation, ResampledChannel, SyncPolicy, TimeBase,
    TIME_EQ_TOLERANCE_S,
};

/// Re-express one channel against the output time base
///
/// Every output cell is either copied from an exact-matching sample,
/// interpolated between the two nearest valid bracketing samples, or marked
/// invalid (outside coverage without clamping, or across a gap wider than
/// the tolerance).
pub fn resample_channel(
    channel: &Channel,
    timebase: &TimeBase,
    policy: &SyncPolicy,
) -> ResampledChannel {
    // Indices of valid samples; occluded samples never act as brackets
    let valid: Vec<usize> = channel
        .samples
        .iter()
        .enumerate()
        .filter(|(_, s)| s.valid)
        .map(|(i, _)| i)
        .collect();

    let mut cells = Vec::with_capacity(timebase.len());
    // Position in `valid` of the first valid sample with time >= t;
    // timestamps are visited in order so this only moves forward.
    let mut upper = 0usize;

    for t in timebase.times() {
        while upper < valid.len() && channel.samples[valid[upper]].time < t - TIME_EQ_TOLERANCE_S {
            upper += 1;
        }

        let next = valid.get(upper).map(|&i| &channel.samples[i]);
        let prev = upper
            .checked_sub(1)
            .and_then(|p| valid.get(p))
            .map(|&i| &channel.samples[i]);

        let cell = match (prev, next) {
            // Exact hit on a valid sample: copy, no interpolation drift
            (_, Some(n)) if (n.time - t).abs() <= TIME_EQ_TOLERANCE_S => {
                Cell::new(n.values.clone())
            }
            // Before the first valid sample
            (None, Some(n)) => match policy.extrapolate {
                Extrapolate::Clamp => Cell::new(n.values.clone()),
                Extrapolate::None => Cell::invalid(channel.dim),
            },
            // After the last valid sample
            (Some(p), None) => match policy.extrapolate {
                Extrapolate::Clamp => Cell::new(p.values.clone()),
                Extrapolate::None => Cell::invalid(channel.dim),
            },
            // Bracketed by two valid samples
            (Some(p), Some(n)) => {
                let gap = n.time - p.time;
                if gap > policy.max_gap_tolerance_s {
                    Cell::invalid(channel.dim)
                } else {
                    Cell::new(interpolate(p.time, &p.values, n.time, &n.values, t, policy.interpolation))
                }
            }
            // No valid samples at all
            (None, None) => Cell::invalid(channel.dim),
        };
        cells.push(cell);
    }

    let resampled = ResampledChannel {
        label: channel.label.clone(),
        quantity: channel.quantity,
        dim: channel.dim,
        cells,
    };
    metrics::counter!("resample_invalid_cells_total", "channel" => channel.label.clone())
        .increment(resampled.invalid_count() as u64);
    resampled
}

fn interpolate(
    t0: f64,
    v0: &[f64],
    t1: f64,
    v1: &[f64],
    t: f64,
    mode: Interpolation,
) -> Vec<f64> {
    match mode {
        Interpolation::Linear => {
            let alpha = (t - t0) / (t1 - t0);
            v0.iter()
                .zip(v1)
                .map(|(a, b)| a + alpha * (b - a))
                .collect()
        }
        Interpolation::Nearest => {
            if t - t0 <= t1 - t {
                v0.to_vec()
            } else {
                v1.to_vec()
            }
        }
        Interpolation::Hold => v0.to_vec(),
    }
}
