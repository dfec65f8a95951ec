use crate::cli::ScanArgs;
use crate::config;
use crate::error::Result;
use mdconv::workflows::{report, sweep::SweepIndex};
use tracing::info;

pub fn run(args: ScanArgs) -> Result<()> {
    let layout = config::build_layout(args.config.as_deref())?;

    info!("Scanning sweep root {:?}", &args.root);
    let index = SweepIndex::scan(&args.root, &layout)?;

    let stdout = std::io::stdout();
    report::write_index(&mut stdout.lock(), &index)?;
    Ok(())
}
