/// Events emitted while a sweep is scanned and processed.
#[derive(Debug, Clone)]
pub enum Progress {
    /// A sweep group is about to be extracted; `runs` step sizes will follow.
    GroupStart {
        force_field: String,
        tolerance: f64,
        runs: u64,
    },
    /// One run of the current group has been extracted.
    RunExtracted,
    GroupFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards [`Progress`] events to an optional observer.
///
/// The library never draws anything itself; front-ends plug in a callback.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}
