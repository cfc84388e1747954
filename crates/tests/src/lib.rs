//! # Integration Tests
//!
//! End-to-end coverage of the conversion pipeline:
//! readers -> sync engine -> merge -> writers -> re-read.

#[cfg(test)]
mod contract_tests {
    #[test]
    fn contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::fmt::Write as _;
    use std::path::{Path, PathBuf};

    use contracts::{
        AxisRotation, LengthUnit, OutputConfig, SliceRange, SourceConfig, SourceKind, SyncPolicy,
        WideTable,
    };
    use sync_engine::SyncEngine;

    /// Build a Visual3D-style TSV export: five header lines, then one row
    /// per frame. `cells` maps (0-based frame, marker) to an X/Y/Z triple in
    /// millimeters, or None for an occluded frame.
    fn v3d_fixture(
        markers: &[&str],
        frames: usize,
        cell: impl Fn(usize, &str) -> Option<[f64; 3]>,
    ) -> String {
        let mut text = String::new();
        for row in ["export.c3d", "", "folder", "ORIGINAL"] {
            let lead = if row == "export.c3d" { row } else { "" };
            let _ = write!(text, "{lead}");
            for marker in markers {
                let cell_text = match row {
                    "" => *marker,
                    other => other,
                };
                let _ = write!(text, "\t{cell_text}\t{cell_text}\t{cell_text}");
            }
            text.push('\n');
        }
        let _ = write!(text, "ITEM");
        for _ in markers {
            let _ = write!(text, "\tX\tY\tZ");
        }
        text.push('\n');

        for i in 0..frames {
            let _ = write!(text, "{}", i + 1);
            for marker in markers {
                match cell(i, marker) {
                    Some([x, y, z]) => {
                        let _ = write!(text, "\t{x}\t{y}\t{z}");
                    }
                    None => text.push_str("\t\t\t"),
                }
            }
            text.push('\n');
        }
        text
    }

    fn write_fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn source(name: &str, path: PathBuf, kind: SourceKind, rate_hz: f64) -> SourceConfig {
        SourceConfig {
            name: name.into(),
            path,
            kind,
            rate_hz,
            start_offset_s: 0.0,
            units: LengthUnit::Millimeters,
        }
    }

    fn trc_output(path: PathBuf) -> OutputConfig {
        OutputConfig {
            path,
            units: LengthUnit::Millimeters,
            rotation: AxisRotation::AsIs,
            camera_rate: None,
        }
    }

    /// Read sources, synchronize against a reference series, and return the
    /// merged table.
    fn sync_reference(sources: &[SourceConfig], reference: &str) -> WideTable {
        let series: Vec<_> = sources
            .iter()
            .map(|s| readers::read_source(s).unwrap())
            .collect();
        let policy = SyncPolicy {
            reference_series: Some(reference.into()),
            ..Default::default()
        };
        SyncEngine::new(policy).synchronize(&series).unwrap()
    }

    #[test]
    fn trc_round_trip_preserves_shape_and_values() {
        let dir = tempfile::tempdir().unwrap();

        // 30 frames at 100 Hz; heel occluded long enough (0.13 s bracketing
        // gap) that the sync stage must not fill the hole
        let landmarks = v3d_fixture(&["pelvis"], 30, |i, _| {
            Some([100.0 + i as f64, 200.0 + i as f64, 300.0 + i as f64])
        });
        let targets = v3d_fixture(&["heel"], 30, |i, _| {
            if (5..18).contains(&i) {
                None
            } else {
                Some([10.0 + i as f64, 20.0, 30.0])
            }
        });

        let sources = vec![
            source(
                "landmarks",
                write_fixture(dir.path(), "landmarks.tsv", &landmarks),
                SourceKind::Landmarks,
                100.0,
            ),
            source(
                "targets",
                write_fixture(dir.path(), "targets.tsv", &targets),
                SourceKind::Targets,
                100.0,
            ),
        ];

        let table = sync_reference(&sources, "landmarks");
        assert_eq!(table.num_frames(), 30);
        assert_eq!(table.num_columns(), 2);
        // frames 6..=18 of heel have no honest value
        assert_eq!(table.column("heel").unwrap().invalid_count(), 13);
        assert_eq!(table.column("pelvis").unwrap().invalid_count(), 0);

        let out = trc_output(dir.path().join("walking.trc"));
        writers::write_trc(&table, &out).unwrap();

        let reread = readers::read_source(&source(
            "reread",
            out.path.clone(),
            SourceKind::Trc,
            1.0, // header is authoritative
        ))
        .unwrap();

        assert_eq!(reread.num_frames(), 30);
        assert_eq!(reread.channels().len(), 2);
        assert!((reread.rate_hz - 100.0).abs() < 1e-9);

        for (column, channel) in table.columns().iter().zip(reread.channels()) {
            assert_eq!(column.label, channel.label);
            for (cell, sample) in column.cells.iter().zip(&channel.samples) {
                assert_eq!(cell.valid, sample.valid);
                if cell.valid {
                    for (a, b) in cell.values.iter().zip(&sample.values) {
                        assert!((a - b).abs() < 1e-8, "{a} vs {b}");
                    }
                }
            }
        }
    }

    #[test]
    fn mixed_rates_align_on_common_time_base() {
        let dir = tempfile::tempdir().unwrap();

        // 30 Hz video-derived landmarks over 0..1 s
        let slow = v3d_fixture(&["hip"], 31, |i, _| Some([i as f64, 0.0, 0.0]));
        // 120 Hz optical targets over 0..1 s, occluded for half a second
        let fast = v3d_fixture(&["toe"], 121, |i, _| {
            if (31..90).contains(&i) {
                None
            } else {
                Some([i as f64, 0.0, 0.0])
            }
        });

        let sources = vec![
            source(
                "video",
                write_fixture(dir.path(), "video.tsv", &slow),
                SourceKind::Landmarks,
                30.0,
            ),
            source(
                "optical",
                write_fixture(dir.path(), "optical.tsv", &fast),
                SourceKind::Targets,
                120.0,
            ),
        ];

        let series: Vec<_> = sources
            .iter()
            .map(|s| readers::read_source(s).unwrap())
            .collect();
        let policy = SyncPolicy {
            target_rate: Some(60.0),
            ..Default::default()
        };
        let table = SyncEngine::new(policy).synchronize(&series).unwrap();

        // 0..1 s at 60 Hz -> 61 frames inclusive
        assert_eq!(table.num_frames(), 61);

        // the 30 Hz source interpolates everywhere (0.033 s gaps)
        assert_eq!(table.column("hip").unwrap().invalid_count(), 0);

        // the occlusion spans valid samples at t = 0.25 and t = 0.75;
        // output frames strictly between are invalid, the endpoints are
        // exact matches and survive
        let toe = table.column("toe").unwrap();
        assert!(toe.cells[15].valid); // t = 0.25
        assert!(toe.cells[45].valid); // t = 0.75
        for k in 16..45 {
            assert!(!toe.cells[k].valid, "frame {k} should be invalid");
        }
        assert_eq!(toe.invalid_count(), 29);
    }

    #[test]
    fn sliced_trials_concatenate_to_the_whole() {
        let dir = tempfile::tempdir().unwrap();

        let landmarks = v3d_fixture(&["knee"], 20, |i, _| Some([i as f64, 1.0, 2.0]));
        let sources = vec![source(
            "landmarks",
            write_fixture(dir.path(), "landmarks.tsv", &landmarks),
            SourceKind::Landmarks,
            100.0,
        )];
        let table = sync_reference(&sources, "landmarks");

        let ranges = vec![
            SliceRange {
                start_frame: 1,
                end_frame: 10,
                label: Some("trial1".into()),
            },
            SliceRange {
                start_frame: 11,
                end_frame: 20,
                label: Some("trial2".into()),
            },
        ];
        let slices = writers::slice_table(&table, &ranges, false).unwrap();

        // write each trial and read it back
        let mut rebuilt = Vec::new();
        for (range, slice) in ranges.iter().zip(&slices) {
            let path = dir
                .path()
                .join(format!("{}.trc", range.label.as_deref().unwrap()));
            writers::write_trc(slice, &trc_output(path.clone())).unwrap();

            let reread =
                readers::read_source(&source("trial", path, SourceKind::Trc, 1.0)).unwrap();
            assert_eq!(reread.num_frames(), 10);
            // time re-zeroed per trial
            assert!((reread.time(0).unwrap() - 0.0).abs() < 1e-9);
            rebuilt.extend(
                reread.channels()[0]
                    .samples
                    .iter()
                    .map(|s| s.values[0]),
            );
        }

        let original: Vec<f64> = table
            .column("knee")
            .unwrap()
            .cells
            .iter()
            .map(|c| c.values[0])
            .collect();
        assert_eq!(rebuilt.len(), original.len());
        for (a, b) in rebuilt.iter().zip(&original) {
            assert!((a - b).abs() < 1e-8);
        }
    }

    #[test]
    fn force_plate_pipeline_writes_mot() {
        let dir = tempfile::tempdir().unwrap();

        let mut grf = String::from(
            "time\tFP1_Fx\tFP1_Fy\tFP1_Fz\tFP1_Mx\tFP1_My\tFP1_Mz\tFP1_Px\tFP1_Py\tFP1_Pz\n",
        );
        for i in 0..10 {
            let _ = writeln!(
                grf,
                "{:.3}\t1.0\t2.0\t{}\t10.0\t20.0\t30.0\t100.0\t200.0\t0.0",
                i as f64 / 1000.0,
                700.0 + i as f64
            );
        }
        let plate_source = source(
            "plates",
            write_fixture(dir.path(), "grf.tsv", &grf),
            SourceKind::ForcePlate,
            1000.0,
        );

        let table = sync_reference(std::slice::from_ref(&plate_source), "plates");
        assert_eq!(table.num_frames(), 10);
        assert_eq!(table.num_columns(), 3); // cop, force, moment

        let output = contracts::GrfOutputConfig {
            path: dir.path().join("walking_grf.mot"),
        };
        writers::write_grf(&table, &output).unwrap();

        let text = std::fs::read_to_string(&output.path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "walking_grf");
        assert_eq!(lines[2], "nRows=10");
        assert_eq!(lines[3], "nColumns=10");
        assert_eq!(lines[5], "endheader");
        assert!(lines[6].starts_with("time\tground_force_FP1_vx"));
        // forces stay in newtons
        assert!(lines[7].contains("\t700.000000\t"));
        assert_eq!(lines.len(), 7 + 10);
    }

    #[test]
    fn config_driven_conversion() {
        let dir = tempfile::tempdir().unwrap();

        let landmarks = v3d_fixture(&["pelvis"], 10, |i, _| Some([i as f64, 0.0, 0.0]));
        let landmarks_path = write_fixture(dir.path(), "landmarks.tsv", &landmarks);
        let output_path = dir.path().join("out.trc");

        let config_text = format!(
            r#"
[[sources]]
name = "landmarks"
path = "{}"
kind = "landmarks"
rate_hz = 100.0
units = "mm"

[sync]
reference_series = "landmarks"

[output]
path = "{}"
units = "mm"
rotation = "as_is"
"#,
            landmarks_path.display(),
            output_path.display()
        );
        let config_path = write_fixture(dir.path(), "job.toml", &config_text);

        let job = config_loader::ConfigLoader::load_from_path(&config_path).unwrap();
        assert_eq!(job.sources.len(), 1);

        let series: Vec<_> = job
            .marker_sources()
            .map(|s| readers::read_source(s).unwrap())
            .collect();
        let table = SyncEngine::new(job.sync.clone()).synchronize(&series).unwrap();
        writers::write_trc(&table, &job.output).unwrap();

        let written = std::fs::read_to_string(&output_path).unwrap();
        assert!(written.starts_with("PathFileType\t4\t(X/Y/Z)\tout.trc"));
        assert_eq!(written.lines().count(), 5 + 10);
    }
}
