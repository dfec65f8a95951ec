use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use mdconv::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use tracing::warn;

/// A single bar over every run of the sweep. Groups may finish out of order when
/// they are processed in parallel, so the bar counts runs, not groups.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new(total_runs: u64) -> Self {
        let pb = ProgressBar::with_draw_target(Some(total_runs), ProgressDrawTarget::stderr())
            .with_style(Self::bar_style())
            .with_message("Extracting runs");

        Self {
            pb: Arc::new(Mutex::new(pb)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb_clone = self.pb.clone();

        Box::new(move |progress: Progress| {
            let Ok(pb_guard) = pb_clone.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::GroupStart {
                    force_field,
                    tolerance,
                    ..
                } => {
                    pb_guard.set_message(format!("{} / tol {}", force_field, tolerance));
                }
                Progress::RunExtracted => {
                    pb_guard.inc(1);
                }
                Progress::GroupFinish => {}
                Progress::Message(msg) => {
                    pb_guard.println(format!("  {}", msg));
                }
            }
        })
    }

    /// Clears the bar once the sweep is over, whether or not every run was counted.
    pub fn finish(&self) {
        match self.pb.lock() {
            Ok(pb) => pb.finish_and_clear(),
            Err(_) => warn!("Progress bar mutex was poisoned. Cannot finish progress."),
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<28} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .with_key(
                "eta",
                |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
                },
            )
            .progress_chars("##-")
    }
}
