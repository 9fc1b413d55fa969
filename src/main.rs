//! Contacts Exchange - main entry point.
//!
//! Exports contacts from the configured JSON store to a vCard file, or
//! imports a vCard file back into the store:
//!
//! ```text
//! contacts-exchange export [id ...]   # no ids = everything
//! contacts-exchange import <file.vcf>
//! ```

use anyhow::{bail, Result};
use contacts_exchange::export::VcardFileExport;
use contacts_exchange::store::{ContactStore, JsonFileStore};
use contacts_exchange::ui::ConsoleFrontend;
use contacts_exchange::{
    Catalog, Config, ContactId, ContactsExporter, ExportUi, VcardImporter,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Stderr-only logging; stdout stays clean for piping.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    info!(db = %config.contacts_db_path.display(), "configuration loaded");

    let store = Arc::new(JsonFileStore::open(&config.contacts_db_path).await?);

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("import") => {
            let Some(path) = args.next() else {
                bail!("usage: contacts-exchange import <file.vcf>");
            };
            run_import(store, &path).await
        }
        Some("export") => run_export(store, &config, args.collect()).await,
        // Bare invocation exports everything.
        None => run_export(store, &config, Vec::new()).await,
        Some(other) => bail!("unknown command: {}", other),
    }
}

async fn run_export(
    store: Arc<JsonFileStore>,
    config: &Config,
    raw_ids: Vec<String>,
) -> Result<()> {
    let ids = resolve_ids(store.as_ref(), raw_ids).await?;
    if ids.is_empty() {
        bail!("the contact store is empty; nothing to export");
    }

    let ui = ExportUi::new(Arc::new(ConsoleFrontend::new()));
    let catalog = Arc::new(Catalog::builtin());

    let mut exporter = ContactsExporter::new(store, ui, catalog);
    exporter.set_strategy(Box::new(VcardFileExport::new(
        &config.export_dir,
        &config.vcard_filename_base,
    )));

    let resolved = exporter.init(&ids).await?;
    if resolved == 0 {
        bail!("none of the requested ids exist in the store");
    }

    let report = exporter.start().await?;
    info!(
        exported = report.exported,
        total = report.total,
        attempts = report.attempts,
        outcome = ?report.outcome,
        "export run finished"
    );
    Ok(())
}

async fn run_import(store: Arc<JsonFileStore>, path: &str) -> Result<()> {
    let importer = VcardImporter::new(store);
    let report = importer.import_file(path, None).await?;
    info!(
        imported = report.imported,
        skipped = report.skipped,
        "import run finished"
    );
    println!("{} imported, {} skipped", report.imported, report.skipped);
    Ok(())
}

/// Explicit ids are taken as given; with none, the selection is the whole
/// store in enumeration order.
async fn resolve_ids(store: &JsonFileStore, raw_ids: Vec<String>) -> Result<Vec<ContactId>> {
    if raw_ids.is_empty() {
        let all = store.get_all().await?;
        return Ok(all
            .iter()
            .filter_map(|c| ContactId::new(c.id.clone()).ok())
            .collect());
    }
    raw_ids
        .into_iter()
        .map(|id| ContactId::new(id).map_err(Into::into))
        .collect()
}
