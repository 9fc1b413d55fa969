//! vCard file export strategy.
//!
//! Writes the selected contacts as one `.vcf` file under a destination
//! directory. The file name probes upward from the configured base
//! (`contacts.vcf`, `contacts_1.vcf`, …) so an existing export is never
//! overwritten. Progress is determinate, one step per contact, and the
//! strategy cancels cooperatively between contacts, removing the partial
//! file.

use crate::error::{ExportError, ExportErrorKind};
use crate::export::strategy::{CancelHandle, ExportOutcome, ExportStrategy, ProgressStep};
use crate::models::ContactRef;
use crate::vcard::serialize_contact;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// ENOSPC, surfaced as an unrecoverable failure.
const NO_SPACE_OS_ERROR: i32 = 28;

pub struct VcardFileExport {
    dir: PathBuf,
    base_name: String,
    contacts: Vec<ContactRef>,
    progress: ProgressStep,
    cancel: CancelHandle,
    written: Option<PathBuf>,
}

impl VcardFileExport {
    pub fn new(dir: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            base_name: base_name.into(),
            contacts: Vec::new(),
            progress: ProgressStep::noop(),
            cancel: CancelHandle::new(),
            written: None,
        }
    }

    /// Path of the file produced by the last successful attempt.
    pub fn output_path(&self) -> Option<&Path> {
        self.written.as_deref()
    }

    /// First `<base>.vcf` / `<base>_<n>.vcf` that does not exist yet.
    async fn unused_path(&self) -> Result<PathBuf, std::io::Error> {
        let mut candidate = self.dir.join(format!("{}.vcf", self.base_name));
        let mut counter = 1;
        while tokio::fs::try_exists(&candidate).await? {
            candidate = self
                .dir
                .join(format!("{}_{}.vcf", self.base_name, counter));
            counter += 1;
        }
        Ok(candidate)
    }

    fn classify(error: &std::io::Error) -> ExportError {
        if error.raw_os_error() == Some(NO_SPACE_OS_ERROR) {
            ExportError::new(ExportErrorKind::NoFreeSpace).with_recoverable(false)
        } else {
            ExportError::new(ExportErrorKind::Storage).with_recoverable(true)
        }
    }

    /// Remove a partial output so a retry starts from a clean slate.
    async fn discard(path: &Path) {
        if let Err(e) = tokio::fs::remove_file(path).await {
            warn!(path = %path.display(), error = %e, "could not remove partial export");
        }
    }
}

#[async_trait]
impl ExportStrategy for VcardFileExport {
    fn name(&self) -> &str {
        "vcard"
    }

    fn export_title(&self) -> &str {
        "exporting-contacts"
    }

    fn set_contacts(&mut self, contacts: Vec<ContactRef>) {
        self.contacts = contacts;
    }

    async fn prepare(&mut self) -> Result<(), ExportError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| Self::classify(&e))
    }

    fn should_show_progress(&self) -> bool {
        true
    }

    fn has_determinate_progress(&self) -> bool {
        true
    }

    fn set_progress_step(&mut self, step: ProgressStep) {
        self.progress = step;
    }

    fn cancel_handle(&self) -> Option<CancelHandle> {
        Some(self.cancel.clone())
    }

    async fn do_export(&mut self) -> ExportOutcome {
        // A leftover cancel from a previous attempt must not stop this one.
        self.cancel.reset();

        let path = match self.unused_path().await {
            Ok(path) => path,
            Err(e) => return ExportOutcome::failed(0, Self::classify(&e)),
        };
        debug!(path = %path.display(), "writing vCard export");

        let mut file = match File::create(&path).await {
            Ok(file) => file,
            Err(e) => return ExportOutcome::failed(0, Self::classify(&e)),
        };

        let mut exported = 0;
        for contact in &self.contacts {
            if self.cancel.is_cancelled() {
                drop(file);
                Self::discard(&path).await;
                return ExportOutcome::cancelled(exported);
            }

            let entry = serialize_contact(contact);
            if let Err(e) = file.write_all(entry.as_bytes()).await {
                drop(file);
                Self::discard(&path).await;
                return ExportOutcome::failed(exported, Self::classify(&e));
            }

            exported += 1;
            self.progress.step();
            // Yield between contacts so a cancel request can land.
            tokio::task::yield_now().await;
        }

        if let Err(e) = file.flush().await {
            Self::discard(&path).await;
            return ExportOutcome::failed(exported, Self::classify(&e));
        }

        info!(path = %path.display(), exported, "vCard export written");
        self.written = Some(path);
        ExportOutcome::completed(exported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Contact;
    use std::sync::Arc;

    fn contact(id: &str, given: &str) -> ContactRef {
        let mut c = Contact::new(id);
        c.given_name = Some(given.to_string());
        c.populate_display_name();
        Arc::new(c)
    }

    #[tokio::test]
    async fn test_exports_all_contacts_to_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut strategy = VcardFileExport::new(dir.path(), "contacts");
        strategy.set_contacts(vec![contact("1", "Ada"), contact("2", "Bob")]);
        strategy.prepare().await.unwrap();

        let outcome = strategy.do_export().await;
        assert_eq!(outcome, ExportOutcome::completed(2));

        let path = strategy.output_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "contacts.vcf");
        let text = tokio::fs::read_to_string(path).await.unwrap();
        assert_eq!(text.matches("BEGIN:VCARD").count(), 2);
        assert!(text.contains("FN:Ada"));
    }

    #[tokio::test]
    async fn test_existing_file_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("contacts.vcf"), b"keep")
            .await
            .unwrap();
        tokio::fs::write(dir.path().join("contacts_1.vcf"), b"keep too")
            .await
            .unwrap();

        let mut strategy = VcardFileExport::new(dir.path(), "contacts");
        strategy.set_contacts(vec![contact("1", "Ada")]);
        strategy.do_export().await;

        let path = strategy.output_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "contacts_2.vcf");
        let untouched = tokio::fs::read_to_string(dir.path().join("contacts.vcf"))
            .await
            .unwrap();
        assert_eq!(untouched, "keep");
    }

    #[tokio::test]
    async fn test_cancel_mid_run_reports_partial_count_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let mut strategy = VcardFileExport::new(dir.path(), "contacts");
        strategy.set_contacts(vec![contact("1", "Ada"), contact("2", "Bob")]);

        // Reset happens inside do_export, so trip the flag from a clone the
        // way the overlay's cancel hook would, after the run starts.
        let cancel = strategy.cancel_handle().unwrap();
        let counted = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counted2 = counted.clone();
        strategy.set_progress_step(ProgressStep::new(move || {
            counted2.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            // First progress step doubles as the user hitting cancel.
            cancel.cancel();
        }));

        let outcome = strategy.do_export().await;
        match outcome {
            ExportOutcome::Failed { exported, error } => {
                assert!(error.is_cancelled());
                assert_eq!(exported, 1);
            }
            other => panic!("expected cancelled outcome, got {:?}", other),
        }

        // Partial file removed
        assert!(!dir.path().join("contacts.vcf").exists());
    }

    #[tokio::test]
    async fn test_prepare_creates_destination_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        let mut strategy = VcardFileExport::new(&nested, "contacts");
        strategy.set_contacts(vec![contact("1", "Ada")]);

        strategy.prepare().await.unwrap();
        let outcome = strategy.do_export().await;
        assert_eq!(outcome, ExportOutcome::completed(1));
        assert!(nested.join("contacts.vcf").exists());
    }

    #[tokio::test]
    async fn test_unwritable_destination_is_recoverable_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the destination directory should be makes
        // every path under it unwritable.
        let blocker = dir.path().join("blocker");
        tokio::fs::write(&blocker, b"x").await.unwrap();

        let mut strategy = VcardFileExport::new(blocker.join("exports"), "contacts");
        strategy.set_contacts(vec![contact("1", "Ada")]);

        let outcome = strategy.do_export().await;
        let error = outcome.error().unwrap();
        assert_eq!(error.kind, ExportErrorKind::Storage);
        assert!(error.retry_allowed());
        assert_eq!(outcome.exported(), 0);
    }
}
