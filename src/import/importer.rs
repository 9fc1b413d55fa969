//! vCard import.
//!
//! Parses a vCard stream and saves each converted contact through the
//! store. Entries that fail to parse or save are skipped and counted; one
//! bad card never aborts the batch.

use crate::domain::PhoneNumber;
use crate::error::StoreResult;
use crate::models::Contact;
use crate::store::ContactStore;
use crate::ui::ProgressHandle;
use crate::vcard;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Counts for one import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportReport {
    pub imported: usize,
    /// Entries dropped: unparseable cards plus records the store rejected
    pub skipped: usize,
}

pub struct VcardImporter {
    store: Arc<dyn ContactStore>,
}

impl VcardImporter {
    pub fn new(store: Arc<dyn ContactStore>) -> Self {
        Self { store }
    }

    /// Import every card in `text`. An optional progress handle is stepped
    /// once per parsed card.
    pub async fn import_text(
        &self,
        text: &str,
        progress: Option<&ProgressHandle>,
    ) -> ImportReport {
        let batch = vcard::parse(text);
        let mut report = ImportReport {
            imported: 0,
            skipped: batch.skipped,
        };

        if let Some(progress) = progress {
            progress.set_total(batch.contacts.len());
        }

        for mut contact in batch.contacts {
            sanitize_phones(&mut contact);

            match self.store.save(contact).await {
                Ok(stored) => {
                    debug!(id = %stored.id, "imported contact");
                    report.imported += 1;
                }
                Err(e) => {
                    warn!(error = %e, "skipping contact the store rejected");
                    report.skipped += 1;
                }
            }
            if let Some(progress) = progress {
                progress.update();
            }
        }

        info!(
            imported = report.imported,
            skipped = report.skipped,
            "import finished"
        );
        report
    }

    /// Import a `.vcf` file. Only the file read itself can fail; card
    /// conversion follows the usual skip-and-count policy.
    pub async fn import_file(
        &self,
        path: impl AsRef<Path>,
        progress: Option<&ProgressHandle>,
    ) -> StoreResult<ImportReport> {
        let text = tokio::fs::read_to_string(path.as_ref()).await?;
        Ok(self.import_text(&text, progress).await)
    }
}

/// Drop phone entries that fail domain validation; a contact with garbage
/// in one TEL property still imports with its remaining fields.
fn sanitize_phones(contact: &mut Contact) {
    contact.phones.retain(|phone| {
        match PhoneNumber::new(phone.value.clone()) {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "dropping invalid phone entry");
                false
            }
        }
    });
}
