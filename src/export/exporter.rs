//! Export orchestrator.
//!
//! Drives a strategy through prepare → export → result handling. One run
//! is active per exporter at a time (`start` takes `&mut self`); a failed
//! run keeps no partial state and restarts from `start`.

use crate::domain::ContactId;
use crate::error::{ExportError, ExporterError, ExporterResult};
use crate::export::strategy::{ExportStrategy, ProgressStep};
use crate::l10n::Catalog;
use crate::models::ContactRef;
use crate::store::ContactStore;
use crate::ui::{
    ActionStyle, ConfirmDialog, DialogAction, DialogChoice, DialogSpec, ProgressMode,
    ProgressOverlay, Toaster, UiFrontend,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The UI components an export run talks to.
pub struct ExportUi {
    pub dialog: Arc<ConfirmDialog>,
    pub overlay: Arc<ProgressOverlay>,
    pub toaster: Arc<Toaster>,
}

impl ExportUi {
    /// Wire all components to one frontend.
    pub fn new(frontend: Arc<dyn UiFrontend>) -> Self {
        Self {
            dialog: Arc::new(ConfirmDialog::new(frontend.clone())),
            overlay: Arc::new(ProgressOverlay::new(frontend.clone())),
            toaster: Arc::new(Toaster::new(frontend)),
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every selected contact was exported
    Finished,
    /// The user cancelled mid-export
    Cancelled,
    /// An error was shown and the user declined to retry
    Dismissed,
}

/// Summary of one completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub exported: usize,
    pub total: usize,
    pub outcome: RunOutcome,
    /// Number of `do_export` attempts, counting retries
    pub attempts: usize,
}

pub struct ContactsExporter {
    store: Arc<dyn ContactStore>,
    strategy: Option<Box<dyn ExportStrategy>>,
    contacts: Vec<ContactRef>,
    ui: ExportUi,
    catalog: Arc<Catalog>,
}

impl ContactsExporter {
    pub fn new(store: Arc<dyn ContactStore>, ui: ExportUi, catalog: Arc<Catalog>) -> Self {
        Self {
            store,
            strategy: None,
            contacts: Vec::new(),
            ui,
            catalog,
        }
    }

    /// Configure the destination strategy.
    pub fn set_strategy(&mut self, strategy: Box<dyn ExportStrategy>) {
        self.strategy = Some(strategy);
    }

    /// Resolve the requested ids against the store.
    ///
    /// The store only enumerates, so resolution filters `get_all`
    /// client-side; the resolved list is exactly the subset of the store's
    /// contacts whose id is requested, in the store's enumeration order.
    /// Returns the resolved count.
    pub async fn init(&mut self, ids: &[ContactId]) -> ExporterResult<usize> {
        if ids.is_empty() {
            return Err(ExporterError::EmptyIdSet);
        }

        let wanted: HashSet<&str> = ids.iter().map(ContactId::as_str).collect();
        let all = self.store.get_all().await?;
        self.contacts = all
            .into_iter()
            .filter(|contact| wanted.contains(contact.id.as_str()))
            .collect();

        debug!(
            requested = ids.len(),
            resolved = self.contacts.len(),
            "resolved export selection"
        );
        Ok(self.contacts.len())
    }

    /// The contacts resolved by [`ContactsExporter::init`].
    pub fn contacts(&self) -> &[ContactRef] {
        &self.contacts
    }

    /// Run the export to completion.
    ///
    /// Fails fast when `init` has not resolved any contacts or no strategy
    /// is configured; these are caller bugs, not recoverable export errors,
    /// and nothing is shown to the user.
    pub async fn start(&mut self) -> ExporterResult<RunReport> {
        if self.contacts.is_empty() {
            return Err(ExporterError::NotReady);
        }
        let mut strategy = self.strategy.take().ok_or(ExporterError::MissingStrategy)?;

        strategy.set_contacts(self.contacts.clone());

        info!(
            strategy = strategy.name(),
            contacts = self.contacts.len(),
            "starting export"
        );

        let report = self.drive(strategy.as_mut()).await;

        self.strategy = Some(strategy);
        Ok(report)
    }

    /// Preparation plus the export/retry loop. Preparation failures flow
    /// through the same error dialog as export failures; a retry there
    /// proceeds into the export attempts.
    async fn drive(&self, strategy: &mut dyn ExportStrategy) -> RunReport {
        if let Err(error) = strategy.prepare().await {
            let name = strategy.name().to_string();
            warn!(
                strategy = name.as_str(),
                reason = error.kind.reason(),
                "prepare failed"
            );
            if let Some(report) = self.handle_failure(&name, 0, 0, &error).await {
                return report;
            }
            tokio::task::yield_now().await;
        }
        self.run_export(strategy).await
    }

    /// The export/retry loop: each attempt configures progress UI, runs the
    /// strategy, and interprets the outcome.
    async fn run_export(&self, strategy: &mut dyn ExportStrategy) -> RunReport {
        let total = self.contacts.len();
        let mut attempts = 0;

        loop {
            attempts += 1;
            self.configure_progress(strategy);

            let outcome = strategy.do_export().await;
            let exported = outcome.exported();
            let error = outcome.error().cloned();

            // Progress UI never outlives the attempt.
            self.ui.overlay.clear_cancel();
            self.ui.overlay.hide();

            let Some(error) = error else {
                info!(exported, total, "export finished");
                self.toast_status(exported, total);
                return RunReport {
                    exported,
                    total,
                    outcome: RunOutcome::Finished,
                    attempts,
                };
            };

            if error.is_cancelled() {
                // User-initiated stop: no dialog, no toast.
                info!(exported, "export cancelled");
                return RunReport {
                    exported,
                    total,
                    outcome: RunOutcome::Cancelled,
                    attempts,
                };
            }

            let name = strategy.name().to_string();
            if let Some(report) = self.handle_failure(&name, exported, attempts, &error).await {
                return report;
            }
            // Retry requested: let the error UI settle before the next
            // attempt starts.
            tokio::task::yield_now().await;
        }
    }

    /// Show the error dialog and translate the user's choice: `None` means
    /// the user asked to retry, `Some(report)` ends the run with the
    /// partial status toasted.
    async fn handle_failure(
        &self,
        strategy_name: &str,
        exported: usize,
        attempts: usize,
        error: &ExportError,
    ) -> Option<RunReport> {
        let total = self.contacts.len();

        warn!(
            strategy = strategy_name,
            reason = error.kind.reason(),
            recoverable = ?error.recoverable,
            "export failed"
        );

        let confirm = if error.retry_allowed() {
            Some(DialogAction::new(
                self.catalog.format("retry", &[]),
                ActionStyle::Recommend,
            ))
        } else {
            None
        };
        let spec = DialogSpec {
            title: Some(self.catalog.format("exportErrorTitle", &[])),
            message: self
                .catalog
                .export_error(strategy_name, error.kind.reason()),
            cancel: DialogAction::new(self.catalog.format("cancel", &[]), ActionStyle::Plain),
            confirm,
        };

        // A Confirm on a dialog without a retry action is meaningless;
        // treat it as a dismissal.
        match self.ui.dialog.confirm(spec).await {
            DialogChoice::Confirm if error.retry_allowed() => None,
            _ => {
                self.toast_status(exported, total);
                Some(RunReport {
                    exported,
                    total,
                    outcome: RunOutcome::Dismissed,
                    attempts,
                })
            }
        }
    }

    /// Put up progress UI per the strategy's capabilities and wire the
    /// cancel affordance to its cancel hook.
    fn configure_progress(&self, strategy: &mut dyn ExportStrategy) {
        if !strategy.should_show_progress() {
            return;
        }

        let title = self.catalog.format(strategy.export_title(), &[]);
        let mode = if strategy.has_determinate_progress() {
            ProgressMode::Determinate
        } else {
            ProgressMode::Spinner
        };
        let handle = self.ui.overlay.show(&title, mode);

        if strategy.has_determinate_progress() {
            handle.set_total(self.contacts.len());
            let step_handle = handle.clone();
            strategy.set_progress_step(ProgressStep::new(move || step_handle.update()));
        }

        if let Some(cancel) = strategy.cancel_handle() {
            self.ui.overlay.on_cancel(move || cancel.cancel());
            self.ui.overlay.show_cancel_menu();
        }
    }

    fn toast_status(&self, exported: usize, total: usize) {
        let message = self.catalog.format(
            "contactsExported",
            &[
                ("exported", exported.to_string()),
                ("total", total.to_string()),
            ],
        );
        self.ui.toaster.show(message);
    }
}
