//! Output time base selection.

use contracts::{CanonicalSeries, PipelineError, SyncPolicy, TimeBase};
use tracing::debug;

/// Build the output time base for a set of canonical series
///
/// If `reference_series` is set, that series' native rate and span define the
/// time base. Otherwise `target_rate` is used over the intersection of all
/// series' temporal coverage, never their union; extrapolation is opt-in at
/// resampling time.
pub fn build_timebase(
    series: &[CanonicalSeries],
    policy: &SyncPolicy,
) -> Result<TimeBase, PipelineError> {
    if let Some(reference) = &policy.reference_series {
        let found = series.iter().find(|s| &s.name == reference).ok_or_else(|| {
            PipelineError::config_validation(
                "sync.reference_series",
                format!("reference_series '{reference}' not among loaded series"),
            )
        })?;
        let (start, end) = found.span().unwrap_or((0.0, 0.0));
        let timebase = TimeBase::from_span(start, end, found.rate_hz)?;
        debug!(reference = %reference, frames = timebase.len(), rate_hz = timebase.rate_hz(), "time base from reference series");
        return Ok(timebase);
    }

    let target_rate = policy.target_rate.ok_or_else(|| {
        PipelineError::config_validation(
            "sync",
            "either reference_series or target_rate must be set",
        )
    })?;

    // Intersection of all series' spans
    let mut start = f64::NEG_INFINITY;
    let mut end = f64::INFINITY;
    for s in series {
        let (first, last) = match s.span() {
            Some(span) => span,
            None => (0.0, -1.0), // an empty series contributes an empty span
        };
        start = start.max(first);
        end = end.min(last);
    }
    if series.is_empty() {
        start = 0.0;
        end = -1.0;
    }

    let timebase = TimeBase::from_span(start, end, target_rate)?;
    debug!(frames = timebase.len(), rate_hz = target_rate, "time base from target rate");
    Ok(timebase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{Channel, Quantity, Sample};

    fn series(name: &str, rate_hz: f64, start: f64, n: usize) -> CanonicalSeries {
        let channel = Channel {
            label: format!("{name}_m"),
            quantity: Quantity::Position,
            dim: 3,
            samples: (0..n)
                .map(|i| Sample::new(start + i as f64 / rate_hz, vec![0.0, 0.0, 0.0]))
                .collect(),
        };
        CanonicalSeries::try_new(name, rate_hz, start, vec![channel]).unwrap()
    }

    #[test]
    fn reference_series_defines_rate_and_span() {
        let a = series("video", 30.0, 0.0, 31); // 0..1s
        let b = series("optical", 120.0, 0.0, 121); // 0..1s
        let policy = SyncPolicy {
            reference_series: Some("video".into()),
            ..Default::default()
        };
        let tb = build_timebase(&[a, b], &policy).unwrap();
        assert!((tb.rate_hz() - 30.0).abs() < 1e-12);
        assert_eq!(tb.len(), 31);
    }

    #[test]
    fn target_rate_spans_intersection() {
        // 30 Hz over 0..1s and 120 Hz over 0..1s, resampled at 60 Hz
        // -> 61 frames, 0.0 to 1.0 inclusive
        let a = series("video", 30.0, 0.0, 31);
        let b = series("optical", 120.0, 0.0, 121);
        let policy = SyncPolicy {
            target_rate: Some(60.0),
            ..Default::default()
        };
        let tb = build_timebase(&[a, b], &policy).unwrap();
        assert_eq!(tb.len(), 61);
        assert!((tb.time(0) - 0.0).abs() < 1e-12);
        assert!((tb.time(60) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn intersection_not_union() {
        let a = series("early", 100.0, 0.0, 101); // 0..1s
        let b = series("late", 100.0, 0.5, 101); // 0.5..1.5s
        let policy = SyncPolicy {
            target_rate: Some(100.0),
            ..Default::default()
        };
        let tb = build_timebase(&[a, b], &policy).unwrap();
        assert!((tb.start() - 0.5).abs() < 1e-12);
        assert!((tb.time(tb.len() - 1) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn disjoint_coverage_yields_empty_timebase() {
        let a = series("early", 100.0, 0.0, 11); // 0..0.1s
        let b = series("late", 100.0, 5.0, 11); // 5.0..5.1s
        let policy = SyncPolicy {
            target_rate: Some(100.0),
            ..Default::default()
        };
        let tb = build_timebase(&[a, b], &policy).unwrap();
        assert!(tb.is_empty());
    }

    #[test]
    fn missing_reference_is_config_error() {
        let a = series("video", 30.0, 0.0, 31);
        let policy = SyncPolicy {
            reference_series: Some("nope".into()),
            ..Default::default()
        };
        assert!(matches!(
            build_timebase(&[a], &policy),
            Err(PipelineError::ConfigValidation { .. })
        ));
    }
}
