use crate::core::models::series::{EnergySeries, SeriesError, StepSize, VectorSeries};
use crate::engine::config::{FailurePolicy, StudyConfig, SweepLayout};
use crate::engine::energy_table::{EnergyTable, energy_table};
use crate::engine::error::EngineError;
use crate::engine::extract::{Extractor, RunArtifacts, RunObservables};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::richardson::{RichardsonTable, richardson_table};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument, warn};

/// One leaf of the sweep: a single simulation run at a fixed step size.
#[derive(Debug, Clone, PartialEq)]
pub struct RunHandle {
    pub step_size: StepSize,
    pub dir: PathBuf,
    pub artifacts: RunArtifacts,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToleranceEntry {
    /// Directory name as found on disk, e.g. `tol0.001`.
    pub label: String,
    pub tolerance: f64,
    /// Runs ordered from the coarsest to the finest step size.
    pub runs: Vec<RunHandle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForceFieldEntry {
    pub name: String,
    /// Tolerances ordered from the loosest to the tightest.
    pub tolerances: Vec<ToleranceEntry>,
}

/// The three-level index `force field -> tolerance -> step size -> run` of a sweep,
/// discovered from the directory tree and sorted explicitly at every level.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepIndex {
    pub root: PathBuf,
    pub force_fields: Vec<ForceFieldEntry>,
}

impl SweepIndex {
    /// Walks `root` according to `layout`.
    ///
    /// Regular files and hidden entries are ignored at every level. A directory whose
    /// name does not follow the naming convention, or two directories decoding to the
    /// same tolerance or step size, make the whole scan fail.
    #[instrument(skip_all, fields(root = %root.display()))]
    pub fn scan(root: &Path, layout: &SweepLayout) -> Result<Self, EngineError> {
        let mut force_fields = Vec::new();
        for (name, ff_dir) in list_subdirectories(root)? {
            let mut tolerances: Vec<ToleranceEntry> = Vec::new();
            for (label, tol_dir) in list_subdirectories(&ff_dir)? {
                let tolerance = parse_suffix(&label, &layout.tolerance_prefix)
                    .filter(|t| t.is_finite() && *t >= 0.0)
                    .ok_or_else(|| EngineError::Layout {
                        path: tol_dir.clone(),
                        reason: format!(
                            "expected '{}' followed by a non-negative number",
                            layout.tolerance_prefix
                        ),
                    })?;
                if let Some(existing) = tolerances.iter().find(|t| t.tolerance == tolerance) {
                    return Err(EngineError::Layout {
                        path: tol_dir,
                        reason: format!(
                            "tolerance {} is also provided by '{}'",
                            tolerance, existing.label
                        ),
                    });
                }

                let runs = scan_runs(&tol_dir, layout)?;
                if runs.is_empty() {
                    warn!("No step-size runs found under {:?}", &tol_dir);
                }
                tolerances.push(ToleranceEntry {
                    label,
                    tolerance,
                    runs,
                });
            }
            tolerances.sort_by(|a, b| b.tolerance.total_cmp(&a.tolerance));
            force_fields.push(ForceFieldEntry { name, tolerances });
        }

        let index = Self {
            root: root.to_path_buf(),
            force_fields,
        };
        info!(
            "Discovered {} group(s) with {} run(s) in total.",
            index.group_count(),
            index.run_count()
        );
        Ok(index)
    }

    pub fn group_count(&self) -> usize {
        self.force_fields.iter().map(|ff| ff.tolerances.len()).sum()
    }

    pub fn run_count(&self) -> usize {
        self.groups().map(|(_, tol)| tol.runs.len()).sum()
    }

    /// Every `(force field, tolerance)` pair in reporting order.
    pub fn groups(&self) -> impl Iterator<Item = (&ForceFieldEntry, &ToleranceEntry)> {
        self.force_fields
            .iter()
            .flat_map(|ff| ff.tolerances.iter().map(move |tol| (ff, tol)))
    }
}

fn scan_runs(tol_dir: &Path, layout: &SweepLayout) -> Result<Vec<RunHandle>, EngineError> {
    let mut runs: Vec<RunHandle> = Vec::new();
    for (label, run_dir) in list_subdirectories(tol_dir)? {
        let step_size = parse_suffix(&label, &layout.step_size_prefix)
            .ok_or_else(|| SeriesError::Unparsable(label.clone()))
            .and_then(StepSize::new)
            .map_err(|e| EngineError::Layout {
                path: run_dir.clone(),
                reason: format!(
                    "expected '{}' followed by a positive step size ({})",
                    layout.step_size_prefix, e
                ),
            })?;
        if runs.iter().any(|r| r.step_size == step_size) {
            return Err(EngineError::Layout {
                path: run_dir,
                reason: format!("duplicate step size {}", step_size),
            });
        }
        debug!("Found run at step size {} in {:?}", step_size, &run_dir);
        runs.push(RunHandle {
            step_size,
            artifacts: RunArtifacts {
                structure: run_dir.join(&layout.structure_file),
                trajectory: run_dir.join(&layout.trajectory_file),
                energy_log: run_dir.join(&layout.energy_file),
            },
            dir: run_dir,
        });
    }
    runs.sort_by(|a, b| b.step_size.cmp(&a.step_size));
    Ok(runs)
}

/// Non-hidden subdirectories of `dir`, sorted by name.
fn list_subdirectories(dir: &Path) -> Result<Vec<(String, PathBuf)>, EngineError> {
    let io_err = |e| EngineError::Io {
        path: dir.to_path_buf(),
        source: e,
    };
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        if !entry.path().is_dir() {
            debug!("Skipping non-directory entry {:?}", entry.path());
            continue;
        }
        entries.push((name, entry.path()));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(entries)
}

/// Decodes `<prefix><number>`, tolerating one `_` between the prefix and the number.
fn parse_suffix(name: &str, prefix: &str) -> Option<f64> {
    let rest = name.strip_prefix(prefix)?;
    let rest = rest.strip_prefix('_').unwrap_or(rest);
    rest.trim().parse().ok()
}

/// Observations of one `(force field, tolerance)` group, filled one run at a time.
#[derive(Debug, Clone, Default)]
pub struct SweepGroup {
    pub positions: VectorSeries,
    pub velocities: VectorSeries,
    pub energies: EnergySeries,
}

impl SweepGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, h: StepSize, observables: RunObservables) -> Result<(), SeriesError> {
        if self.positions.contains(h) {
            return Err(SeriesError::DuplicateStepSize(h));
        }
        self.positions.insert(h, observables.positions)?;
        self.velocities.insert(h, observables.velocities)?;
        self.energies.insert(h, observables.energies)?;
        Ok(())
    }

    /// Consumes the group into its output tables: one Richardson table per probe
    /// for positions and for velocities, the energy table, and optionally the
    /// Richardson table of one energy component.
    pub fn into_tables(self, config: &StudyConfig) -> Result<GroupTables, EngineError> {
        let params = &config.richardson;
        let positions = config
            .probes
            .iter()
            .map(|probe| richardson_table(&self.positions, probe, params))
            .collect::<Result<Vec<_>, _>>()?;
        let velocities = config
            .probes
            .iter()
            .map(|probe| richardson_table(&self.velocities, probe, params))
            .collect::<Result<Vec<_>, _>>()?;
        let energy_convergence = config
            .energy_component
            .map(|component| richardson_table(&self.energies, &component, params))
            .transpose()?;

        Ok(GroupTables {
            positions,
            velocities,
            energies: energy_table(&self.energies),
            energy_convergence,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupTables {
    pub positions: Vec<RichardsonTable>,
    pub velocities: Vec<RichardsonTable>,
    pub energies: EnergyTable,
    pub energy_convergence: Option<RichardsonTable>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GroupOutcome {
    Tables(GroupTables),
    /// Only produced under [`FailurePolicy::SkipGroup`]; carries the error message.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupReport {
    pub force_field: String,
    pub tolerance: f64,
    pub outcome: GroupOutcome,
}

/// Extracts every run of every group and builds each group's tables.
///
/// A group's tables are all-or-nothing: a single unreadable run either aborts the
/// sweep or marks the whole group as failed, depending on the configured
/// [`FailurePolicy`]. A step size is never silently left out of its group.
#[instrument(skip_all, name = "sweep_workflow")]
pub fn run(
    index: &SweepIndex,
    config: &StudyConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<GroupReport>, EngineError> {
    info!(
        "Processing {} group(s) from {:?}.",
        index.group_count(),
        &index.root
    );
    let groups: Vec<_> = index.groups().collect();

    let results: Vec<Result<GroupTables, EngineError>> = if config.parallel {
        groups
            .par_iter()
            .map(|(ff, tol)| process_group(ff, tol, config, reporter))
            .collect()
    } else {
        let mut results = Vec::with_capacity(groups.len());
        for (ff, tol) in &groups {
            let result = process_group(ff, tol, config, reporter);
            let failed = result.is_err();
            results.push(result);
            if failed && config.failure_policy == FailurePolicy::AbortSweep {
                break;
            }
        }
        results
    };

    let mut reports = Vec::with_capacity(results.len());
    for ((ff, tol), result) in groups.into_iter().zip(results) {
        let outcome = match result {
            Ok(tables) => GroupOutcome::Tables(tables),
            Err(e) => match config.failure_policy {
                FailurePolicy::AbortSweep => return Err(e),
                FailurePolicy::SkipGroup => {
                    error!(
                        "Skipping group {} / {}: {}",
                        ff.name, tol.label, e
                    );
                    reporter.report(Progress::Message(format!(
                        "skipped {} / {}: {}",
                        ff.name, tol.label, e
                    )));
                    GroupOutcome::Failed(e.to_string())
                }
            },
        };
        reports.push(GroupReport {
            force_field: ff.name.clone(),
            tolerance: tol.tolerance,
            outcome,
        });
    }
    Ok(reports)
}

fn process_group(
    ff: &ForceFieldEntry,
    tol: &ToleranceEntry,
    config: &StudyConfig,
    reporter: &ProgressReporter,
) -> Result<GroupTables, EngineError> {
    reporter.report(Progress::GroupStart {
        force_field: ff.name.clone(),
        tolerance: tol.tolerance,
        runs: tol.runs.len() as u64,
    });
    info!(
        "Extracting {} run(s) for force field '{}', tolerance {}.",
        tol.runs.len(),
        ff.name,
        tol.tolerance
    );

    let extractor = Extractor::new(&config.selection);
    let mut group = SweepGroup::new();
    for run in &tol.runs {
        let observables =
            extractor
                .extract(&run.artifacts)
                .map_err(|source| EngineError::Acquisition {
                    run: run.dir.clone(),
                    source,
                })?;
        group.record(run.step_size, observables)?;
        reporter.report(Progress::RunExtracted);
    }

    let tables = group.into_tables(config)?;
    reporter.report(Progress::GroupFinish);
    Ok(tables)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::core::io::trr::test_support::TrrWriter;
    use std::fs;
    use std::path::Path;

    pub const STRUCTURE: &str = "\
Protein in water
    2
    1ALA     CA    1   0.000   0.000   0.000  0.0000  0.0000  0.0000
    2SOL     OW    2   0.000   0.000   0.000  0.0000  0.0000  0.0000
   3.00000   3.00000   3.00000
";

    /// Writes one run whose single protein atom sits at `(x, x, x)` with velocity `(v, v, v)`.
    pub fn write_run(dir: &Path, x: f64, v: f64, energies: (f64, f64)) {
        fs::create_dir_all(dir).unwrap();
        let mut trr = TrrWriter::new(true);
        trr.frame(0, 0.0, Some(&[[0.0; 3]; 2]), Some(&[[0.0; 3]; 2]))
            .frame(
                1000,
                2.0,
                Some(&[[x, x, x], [1.0, 1.0, 1.0]]),
                Some(&[[v, v, v], [0.0, 0.0, 0.0]]),
            );
        fs::write(dir.join("confout.gro"), STRUCTURE).unwrap();
        fs::write(dir.join("traj.trr"), &trr.bytes).unwrap();
        fs::write(
            dir.join("ener.csv"),
            format!("Kinetic,Potential\n{},{}\n", energies.0, energies.1),
        )
        .unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::write_run;
    use super::*;
    use crate::core::selection::AtomSelection;
    use crate::engine::config::{RichardsonParams, StudyConfigBuilder};
    use crate::engine::projection::{EnergyComponent, Probe};
    use crate::engine::richardson::Estimate;
    use std::sync::Mutex;
    use tempfile::tempdir;

    fn config() -> StudyConfigBuilder {
        StudyConfigBuilder::new()
            .layout(SweepLayout::default())
            .selection(AtomSelection::Protein)
            .richardson(RichardsonParams::default())
            .probes(vec![Probe::default()])
    }

    fn h(v: f64) -> StepSize {
        StepSize::new(v).unwrap()
    }

    #[test]
    fn scan_builds_sorted_index_and_ignores_files() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        for ff in ["charmm", "amber"] {
            for tol in ["tol0.001", "tol_0.01"] {
                for ts in ["ts0.001", "ts0.004", "ts0.002"] {
                    fs::create_dir_all(root.join(ff).join(tol).join(ts)).unwrap();
                }
            }
        }
        fs::write(root.join("README.txt"), "notes").unwrap();
        fs::write(root.join("amber/tol0.001/summary.csv"), "x").unwrap();
        fs::create_dir_all(root.join(".cache")).unwrap();

        let index = SweepIndex::scan(root, &SweepLayout::default()).unwrap();
        let names: Vec<_> = index.force_fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["amber", "charmm"]);

        let amber = &index.force_fields[0];
        let tols: Vec<f64> = amber.tolerances.iter().map(|t| t.tolerance).collect();
        assert_eq!(tols, vec![0.01, 0.001]);

        let steps: Vec<f64> = amber.tolerances[1]
            .runs
            .iter()
            .map(|r| r.step_size.value())
            .collect();
        assert_eq!(steps, vec![0.004, 0.002, 0.001]);
        assert_eq!(
            amber.tolerances[1].runs[0].artifacts.trajectory,
            root.join("amber/tol0.001/ts0.004/traj.trr")
        );
        assert_eq!(index.group_count(), 4);
        assert_eq!(index.run_count(), 12);
    }

    #[test]
    fn scan_rejects_unparsable_and_duplicate_names() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("amber/tol0.001/step0.002")).unwrap();
        let err = SweepIndex::scan(dir.path(), &SweepLayout::default()).unwrap_err();
        assert!(matches!(err, EngineError::Layout { .. }));

        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("amber/tol0.001/ts0.002")).unwrap();
        fs::create_dir_all(dir.path().join("amber/tol0.001/ts0.0020")).unwrap();
        let err = SweepIndex::scan(dir.path(), &SweepLayout::default()).unwrap_err();
        assert!(
            matches!(&err, EngineError::Layout { reason, .. } if reason.contains("duplicate"))
        );

        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("amber/tol0.001")).unwrap();
        fs::create_dir_all(dir.path().join("amber/tol_0.001")).unwrap();
        assert!(SweepIndex::scan(dir.path(), &SweepLayout::default()).is_err());

        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("amber/tol0.001/ts0")).unwrap();
        assert!(SweepIndex::scan(dir.path(), &SweepLayout::default()).is_err());
    }

    #[test]
    fn scan_of_missing_root_is_io_error() {
        let dir = tempdir().unwrap();
        let err = SweepIndex::scan(&dir.path().join("nope"), &SweepLayout::default()).unwrap_err();
        assert!(matches!(err, EngineError::Io { .. }));
    }

    #[test]
    fn custom_prefixes_are_honoured() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("opls/rtol-1e-6/dt0.5")).unwrap();
        let layout = SweepLayout {
            tolerance_prefix: "rtol-".into(),
            step_size_prefix: "dt".into(),
            ..SweepLayout::default()
        };
        let index = SweepIndex::scan(dir.path(), &layout).unwrap();
        let tol = &index.force_fields[0].tolerances[0];
        assert_eq!(tol.tolerance, 1e-6);
        assert_eq!(tol.runs[0].step_size, h(0.5));
    }

    #[test]
    fn parse_suffix_variants() {
        assert_eq!(parse_suffix("tol0.001", "tol"), Some(0.001));
        assert_eq!(parse_suffix("tol_0.001", "tol"), Some(0.001));
        assert_eq!(parse_suffix("ts1e-3", "ts"), Some(0.001));
        assert_eq!(parse_suffix("ts", "ts"), None);
        assert_eq!(parse_suffix("xx0.1", "ts"), None);
    }

    #[test]
    fn group_record_rejects_duplicate_step_size() {
        let mut group = SweepGroup::new();
        let obs = RunObservables {
            positions: vec![],
            velocities: vec![],
            energies: crate::core::models::series::EnergyPair {
                kinetic: 0.0,
                potential: 0.0,
            },
        };
        group.record(h(0.1), obs.clone()).unwrap();
        assert_eq!(
            group.record(h(0.1), obs),
            Err(SeriesError::DuplicateStepSize(h(0.1)))
        );
        assert_eq!(group.energies.len(), 1);
    }

    #[test]
    fn end_to_end_single_group() {
        let dir = tempdir().unwrap();
        let tol = dir.path().join("amber/tol0.001");
        write_run(&tol.join("ts0.004"), 1.0, 0.5, (100.0, -250.0));
        write_run(&tol.join("ts0.002"), 0.9, 0.4, (99.5, -249.0));
        write_run(&tol.join("ts0.001"), 0.85, 0.35, (99.25, -248.5));

        let index = SweepIndex::scan(dir.path(), &SweepLayout::default()).unwrap();
        let config = config()
            .energy_component(Some(EnergyComponent::Kinetic))
            .build()
            .unwrap();
        let events = Mutex::new(0usize);
        let reporter = ProgressReporter::with_callback(Box::new(|e| {
            if matches!(e, Progress::RunExtracted) {
                *events.lock().unwrap() += 1;
            }
        }));
        let reports = run(&index, &config, &reporter).unwrap();
        drop(reporter);
        assert_eq!(events.into_inner().unwrap(), 3);

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].force_field, "amber");
        assert_eq!(reports[0].tolerance, 0.001);
        let GroupOutcome::Tables(tables) = &reports[0].outcome else {
            panic!("group should have succeeded");
        };

        let positions = &tables.positions[0];
        assert_eq!(positions.rows.len(), 3);
        let defined_ratio: Vec<bool> = positions.rows.iter().map(|r| r.ratio.is_defined()).collect();
        assert_eq!(defined_ratio, vec![false, false, true]);
        let defined_error: Vec<bool> = positions
            .rows
            .iter()
            .map(|r| r.error_estimate.is_defined())
            .collect();
        assert_eq!(defined_error, vec![false, true, true]);
        assert_eq!(positions.rows[2].step_size, h(0.001));
        let ratio = positions.rows[2].ratio.value().unwrap();
        assert!((ratio - 2.0).abs() < 1e-9);

        assert_eq!(tables.velocities[0].rows[0].value, 0.5);
        assert_eq!(tables.energies.rows.len(), 3);
        assert_eq!(tables.energies.rows[0].kinetic, 100.0);
        let energy = tables.energy_convergence.as_ref().unwrap();
        assert_eq!(energy.rows[1].error_estimate, Estimate::Value(-0.5 / 3.0));
    }

    #[test]
    fn failing_run_aborts_sweep_with_run_path() {
        let dir = tempdir().unwrap();
        let tol = dir.path().join("amber/tol0.001");
        write_run(&tol.join("ts0.004"), 1.0, 0.5, (1.0, 2.0));
        write_run(&tol.join("ts0.002"), 0.9, 0.4, (1.0, 2.0));
        fs::write(tol.join("ts0.002/ener.csv"), "ke,pe\n1.0\n").unwrap();

        let index = SweepIndex::scan(dir.path(), &SweepLayout::default()).unwrap();
        let err = run(&index, &config().build().unwrap(), &ProgressReporter::new()).unwrap_err();
        match err {
            EngineError::Acquisition { run, .. } => assert!(run.ends_with("ts0.002")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn skip_group_policy_keeps_other_groups() {
        let dir = tempdir().unwrap();
        write_run(&dir.path().join("amber/tol0.001/ts0.004"), 1.0, 0.5, (1.0, 2.0));
        let broken = dir.path().join("charmm/tol0.001/ts0.004");
        write_run(&broken, 1.0, 0.5, (1.0, 2.0));
        fs::remove_file(broken.join("traj.trr")).unwrap();

        let index = SweepIndex::scan(dir.path(), &SweepLayout::default()).unwrap();
        for parallel in [false, true] {
            let config = config()
                .failure_policy(FailurePolicy::SkipGroup)
                .parallel(parallel)
                .build()
                .unwrap();
            let messages = Mutex::new(Vec::new());
            let reporter = ProgressReporter::with_callback(Box::new(|e| {
                if let Progress::Message(msg) = e {
                    messages.lock().unwrap().push(msg);
                }
            }));
            let reports = run(&index, &config, &reporter).unwrap();
            drop(reporter);
            let messages = messages.into_inner().unwrap();
            assert_eq!(messages.len(), 1);
            assert!(messages[0].starts_with("skipped charmm / tol0.001"));

            assert_eq!(reports.len(), 2);
            assert!(matches!(reports[0].outcome, GroupOutcome::Tables(_)));
            assert!(
                matches!(&reports[1].outcome, GroupOutcome::Failed(msg) if msg.contains("ts0.004"))
            );
        }
    }

    #[test]
    fn parallel_and_sequential_runs_agree() {
        let dir = tempdir().unwrap();
        for (ff, offset) in [("amber", 0.0), ("charmm", 1.0), ("opls", 2.0)] {
            let tol = dir.path().join(ff).join("tol0.001");
            write_run(&tol.join("ts0.004"), 1.0 + offset, 0.5, (1.0, 2.0));
            write_run(&tol.join("ts0.002"), 0.9 + offset, 0.4, (1.0, 2.0));
        }
        let index = SweepIndex::scan(dir.path(), &SweepLayout::default()).unwrap();
        let sequential = run(&index, &config().build().unwrap(), &ProgressReporter::new()).unwrap();
        let parallel = run(
            &index,
            &config().parallel(true).build().unwrap(),
            &ProgressReporter::new(),
        )
        .unwrap();
        assert_eq!(sequential, parallel);
        let names: Vec<_> = parallel.iter().map(|r| r.force_field.as_str()).collect();
        assert_eq!(names, vec!["amber", "charmm", "opls"]);
    }

    #[test]
    fn probe_beyond_selection_fails_the_group() {
        let dir = tempdir().unwrap();
        write_run(&dir.path().join("amber/tol0.001/ts0.004"), 1.0, 0.5, (1.0, 2.0));
        let index = SweepIndex::scan(dir.path(), &SweepLayout::default()).unwrap();
        let config = config()
            .probes(vec![Probe {
                atom: 1,
                axis: crate::engine::projection::Axis::X,
            }])
            .build()
            .unwrap();
        assert!(matches!(
            run(&index, &config, &ProgressReporter::new()),
            Err(EngineError::AtomOutOfRange {
                atom: 1,
                available: 1
            })
        ));
    }
}
