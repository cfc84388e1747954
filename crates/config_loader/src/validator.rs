//! Configuration validation.
//!
//! Rules:
//! - source names unique and non-empty
//! - rate_hz > 0 per source
//! - exactly one of sync.reference_series / sync.target_rate
//! - reference_series (if set) names an existing marker source
//! - max_gap_tolerance_s >= 0
//! - output path non-empty; grf output required when force sources exist
//! - slice ranges well-formed (1-based, start <= end)

use std::collections::HashSet;

use contracts::{JobConfig, PipelineError, SourceKind};

/// Validate a job configuration
///
/// Returns the first violation encountered, or Ok(()).
pub fn validate(job: &JobConfig) -> Result<(), PipelineError> {
    validate_sources(job)?;
    validate_sync(job)?;
    validate_outputs(job)?;
    validate_slices(job)?;
    Ok(())
}

fn validate_sources(job: &JobConfig) -> Result<(), PipelineError> {
    if job.sources.is_empty() {
        return Err(PipelineError::config_validation(
            "sources",
            "at least one source is required",
        ));
    }

    let mut seen = HashSet::new();
    for (idx, source) in job.sources.iter().enumerate() {
        if source.name.is_empty() {
            return Err(PipelineError::config_validation(
                format!("sources[{idx}].name"),
                "source name cannot be empty",
            ));
        }
        if !seen.insert(&source.name) {
            return Err(PipelineError::config_validation(
                format!("sources[name={}]", source.name),
                "duplicate source name",
            ));
        }
        if source.rate_hz <= 0.0 {
            return Err(PipelineError::config_validation(
                format!("sources[{}].rate_hz", source.name),
                format!("rate_hz must be > 0, got {}", source.rate_hz),
            ));
        }
    }
    Ok(())
}

fn validate_sync(job: &JobConfig) -> Result<(), PipelineError> {
    let sync = &job.sync;

    match (&sync.reference_series, sync.target_rate) {
        (None, None) => {
            return Err(PipelineError::config_validation(
                "sync",
                "either reference_series or target_rate must be set",
            ));
        }
        (Some(_), Some(_)) => {
            return Err(PipelineError::config_validation(
                "sync",
                "reference_series and target_rate are mutually exclusive",
            ));
        }
        (None, Some(rate)) if rate <= 0.0 => {
            return Err(PipelineError::config_validation(
                "sync.target_rate",
                format!("target_rate must be > 0, got {rate}"),
            ));
        }
        _ => {}
    }

    if let Some(reference) = &sync.reference_series {
        let exists = job.sources.iter().any(|s| &s.name == reference);
        if !exists {
            return Err(PipelineError::config_validation(
                "sync.reference_series",
                format!("reference_series '{reference}' not found among sources"),
            ));
        }
    }

    if sync.max_gap_tolerance_s < 0.0 {
        return Err(PipelineError::config_validation(
            "sync.max_gap_tolerance_s",
            format!(
                "max_gap_tolerance_s must be >= 0, got {}",
                sync.max_gap_tolerance_s
            ),
        ));
    }

    Ok(())
}

fn validate_outputs(job: &JobConfig) -> Result<(), PipelineError> {
    if job.output.path.as_os_str().is_empty() {
        return Err(PipelineError::config_validation(
            "output.path",
            "output path cannot be empty",
        ));
    }

    if let Some(rate) = job.output.camera_rate {
        if rate <= 0.0 {
            return Err(PipelineError::config_validation(
                "output.camera_rate",
                format!("camera_rate must be > 0, got {rate}"),
            ));
        }
    }

    let has_force_sources = job.sources.iter().any(|s| s.kind == SourceKind::ForcePlate);
    if has_force_sources && job.grf.is_none() {
        return Err(PipelineError::config_validation(
            "grf",
            "force_plate sources configured but no [grf] output section",
        ));
    }

    Ok(())
}

fn validate_slices(job: &JobConfig) -> Result<(), PipelineError> {
    for (idx, range) in job.slices.iter().enumerate() {
        if range.start_frame == 0 {
            return Err(PipelineError::config_validation(
                format!("slices[{idx}].start_frame"),
                "frame indices are 1-based; start_frame must be >= 1",
            ));
        }
        if range.end_frame < range.start_frame {
            return Err(PipelineError::config_validation(
                format!("slices[{idx}]"),
                format!(
                    "end_frame ({}) must be >= start_frame ({})",
                    range.end_frame, range.start_frame
                ),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{
        GrfOutputConfig, LengthUnit, OutputConfig, SliceRange, SourceConfig, SyncPolicy,
    };

    fn source(name: &str, kind: SourceKind, rate_hz: f64) -> SourceConfig {
        SourceConfig {
            name: name.into(),
            path: format!("{name}.tsv").into(),
            kind,
            rate_hz,
            start_offset_s: 0.0,
            units: LengthUnit::Millimeters,
        }
    }

    fn minimal_job() -> JobConfig {
        JobConfig {
            version: Default::default(),
            sources: vec![
                source("landmarks", SourceKind::Landmarks, 100.0),
                source("targets", SourceKind::Targets, 100.0),
            ],
            sync: SyncPolicy {
                reference_series: Some("targets".into()),
                ..Default::default()
            },
            output: OutputConfig {
                path: "out.trc".into(),
                units: LengthUnit::Millimeters,
                rotation: Default::default(),
                camera_rate: None,
            },
            grf: None,
            slices: vec![],
            allow_overlapping_slices: false,
        }
    }

    #[test]
    fn valid_config() {
        assert!(validate(&minimal_job()).is_ok());
    }

    #[test]
    fn duplicate_source_name() {
        let mut job = minimal_job();
        job.sources.push(source("targets", SourceKind::Targets, 50.0));
        let err = validate(&job).unwrap_err().to_string();
        assert!(err.contains("duplicate source name"), "got: {err}");
    }

    #[test]
    fn non_positive_rate() {
        let mut job = minimal_job();
        job.sources[0].rate_hz = -10.0;
        let err = validate(&job).unwrap_err().to_string();
        assert!(err.contains("rate_hz must be > 0"), "got: {err}");
    }

    #[test]
    fn neither_reference_nor_target_rate() {
        let mut job = minimal_job();
        job.sync.reference_series = None;
        job.sync.target_rate = None;
        let err = validate(&job).unwrap_err().to_string();
        assert!(err.contains("either reference_series"), "got: {err}");
    }

    #[test]
    fn both_reference_and_target_rate() {
        let mut job = minimal_job();
        job.sync.target_rate = Some(60.0);
        let err = validate(&job).unwrap_err().to_string();
        assert!(err.contains("mutually exclusive"), "got: {err}");
    }

    #[test]
    fn reference_not_found() {
        let mut job = minimal_job();
        job.sync.reference_series = Some("nonexistent".into());
        let err = validate(&job).unwrap_err().to_string();
        assert!(err.contains("not found"), "got: {err}");
    }

    #[test]
    fn negative_gap_tolerance() {
        let mut job = minimal_job();
        job.sync.max_gap_tolerance_s = -0.5;
        assert!(validate(&job).is_err());
    }

    #[test]
    fn force_sources_require_grf_output() {
        let mut job = minimal_job();
        job.sources.push(source("plate", SourceKind::ForcePlate, 1000.0));
        let err = validate(&job).unwrap_err().to_string();
        assert!(err.contains("no [grf] output"), "got: {err}");

        job.grf = Some(GrfOutputConfig {
            path: "out.mot".into(),
        });
        assert!(validate(&job).is_ok());
    }

    #[test]
    fn slice_must_be_one_based() {
        let mut job = minimal_job();
        job.slices.push(SliceRange {
            start_frame: 0,
            end_frame: 10,
            label: None,
        });
        let err = validate(&job).unwrap_err().to_string();
        assert!(err.contains("1-based"), "got: {err}");
    }

    #[test]
    fn slice_end_before_start() {
        let mut job = minimal_job();
        job.slices.push(SliceRange {
            start_frame: 20,
            end_frame: 10,
            label: None,
        });
        assert!(validate(&job).is_err());
    }
}
