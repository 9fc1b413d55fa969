use async_trait::async_trait;
use contacts_exchange::error::ExportError;
use contacts_exchange::export::{CancelHandle, ExportOutcome, ExportStrategy, ProgressStep};
use contacts_exchange::models::ContactRef;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Capability flags for one scripted strategy.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy)]
pub struct StrategyCapabilities {
    pub show_progress: bool,
    pub determinate: bool,
    pub cancellable: bool,
}

#[allow(dead_code)]
impl StrategyCapabilities {
    pub fn silent() -> Self {
        Self {
            show_progress: false,
            determinate: false,
            cancellable: false,
        }
    }

    pub fn determinate() -> Self {
        Self {
            show_progress: true,
            determinate: true,
            cancellable: true,
        }
    }

    pub fn spinner() -> Self {
        Self {
            show_progress: true,
            determinate: false,
            cancellable: false,
        }
    }
}

/// Shared observer half of a [`ScriptedStrategy`], kept by the test while
/// the exporter owns the strategy box.
#[allow(dead_code)]
#[derive(Default)]
pub struct StrategyProbe {
    pub export_calls: AtomicUsize,
    pub prepare_calls: AtomicUsize,
    pub contacts_received: Mutex<Vec<ContactRef>>,
}

/// Export strategy driven by a script of outcomes: each `do_export` call
/// pops the next one. Running past the script completes successfully with
/// the full contact count.
#[allow(dead_code)]
pub struct ScriptedStrategy {
    capabilities: StrategyCapabilities,
    outcomes: Mutex<VecDeque<ExportOutcome>>,
    prepare_error: Mutex<Option<ExportError>>,
    probe: Arc<StrategyProbe>,
    progress: ProgressStep,
    steps_per_attempt: usize,
    cancel: CancelHandle,
}

#[allow(dead_code)]
impl ScriptedStrategy {
    pub fn new(capabilities: StrategyCapabilities) -> (Self, Arc<StrategyProbe>) {
        let probe = Arc::new(StrategyProbe::default());
        (
            Self {
                capabilities,
                outcomes: Mutex::new(VecDeque::new()),
                prepare_error: Mutex::new(None),
                probe: probe.clone(),
                progress: ProgressStep::noop(),
                steps_per_attempt: 0,
                cancel: CancelHandle::new(),
            },
            probe,
        )
    }

    /// Queue the outcome for the next `do_export` call.
    pub fn push_outcome(&self, outcome: ExportOutcome) {
        self.outcomes.lock().unwrap().push_back(outcome);
    }

    /// Make `prepare` fail once with `error`.
    pub fn fail_prepare(&self, error: ExportError) {
        *self.prepare_error.lock().unwrap() = Some(error);
    }

    /// Emit this many progress steps on each attempt before resolving.
    pub fn step_progress(&mut self, steps: usize) {
        self.steps_per_attempt = steps;
    }
}

#[async_trait]
impl ExportStrategy for ScriptedStrategy {
    fn name(&self) -> &str {
        "scripted"
    }

    fn export_title(&self) -> &str {
        "exporting-contacts"
    }

    fn set_contacts(&mut self, contacts: Vec<ContactRef>) {
        *self.probe.contacts_received.lock().unwrap() = contacts;
    }

    async fn prepare(&mut self) -> Result<(), ExportError> {
        self.probe.prepare_calls.fetch_add(1, Ordering::SeqCst);
        match self.prepare_error.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn should_show_progress(&self) -> bool {
        self.capabilities.show_progress
    }

    fn has_determinate_progress(&self) -> bool {
        self.capabilities.determinate
    }

    fn set_progress_step(&mut self, step: ProgressStep) {
        self.progress = step;
    }

    fn cancel_handle(&self) -> Option<CancelHandle> {
        if self.capabilities.cancellable {
            Some(self.cancel.clone())
        } else {
            None
        }
    }

    async fn do_export(&mut self) -> ExportOutcome {
        self.probe.export_calls.fetch_add(1, Ordering::SeqCst);
        for _ in 0..self.steps_per_attempt {
            self.progress.step();
        }
        match self.outcomes.lock().unwrap().pop_front() {
            Some(outcome) => outcome,
            None => {
                let count = self.probe.contacts_received.lock().unwrap().len();
                ExportOutcome::completed(count)
            }
        }
    }
}
