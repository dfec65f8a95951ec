use crate::cli::ReportArgs;
use crate::config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use mdconv::{
    engine::progress::ProgressReporter,
    workflows::{
        report,
        sweep::{self, GroupOutcome, SweepIndex},
    },
};
use std::fs::File;
use std::io::BufWriter;
use tracing::{info, warn};

pub fn run(args: ReportArgs, threads: Option<usize>) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app_config = config::build_config(&args, threads)?;

    info!("Scanning sweep root {:?}", &app_config.root);
    let index = SweepIndex::scan(&app_config.root, &app_config.study.layout)?;
    if index.run_count() == 0 {
        warn!("No runs found under {:?}.", &app_config.root);
    }

    let progress_handler = CliProgressHandler::new(index.run_count() as u64);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let result = sweep::run(&index, &app_config.study, &reporter);
    progress_handler.finish();
    let reports = result?;

    let failed = reports
        .iter()
        .filter(|r| matches!(r.outcome, GroupOutcome::Failed(_)))
        .count();
    info!(
        "Sweep finished: {} group(s) reported, {} failed.",
        reports.len(),
        failed
    );

    match &app_config.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            report::write_reports(&mut writer, &reports, app_config.format)?;
            eprintln!("Report written to: {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            report::write_reports(&mut stdout.lock(), &reports, app_config.format)?;
        }
    }

    if failed > 0 {
        warn!("{} group(s) could not be processed; see the report for details.", failed);
    }
    Ok(())
}
