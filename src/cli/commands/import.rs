//! `import`: submit the valid records of a file to the tracker API,
//! strictly sequentially, with live per-record progress, optional
//! retry-all-failed pass, and a final summary. Ctrl-C cancels between
//! records; the record in flight is allowed to finish.

use std::path::Path;

use anyhow::{bail, Result};
use colored::Colorize;
use log::info;

use crate::api::TrackerClient;
use crate::config::Config;
use crate::import::{ImportManager, RecordStatus};
use crate::mapper::{FieldMapper, LabelMapper, ProviderMapper, SubscriptionMapper};
use crate::model::EntityKind;
use crate::parser::RawRow;

pub struct ImportOptions {
    pub dry_run: bool,
    pub retry_failed: bool,
}

pub async fn run(
    file: &Path,
    entity: EntityKind,
    host: Option<String>,
    token: Option<String>,
    options: ImportOptions,
) -> Result<()> {
    let rows = super::validate::parse_rows(file)?;

    let client = if options.dry_run {
        None
    } else {
        let config = Config::load();
        let host = config.resolve_host(host)?;
        let token = config.resolve_token(token);
        Some(TrackerClient::new(&host, token))
    };

    match entity {
        EntityKind::Label => execute(&LabelMapper, &rows, client.as_ref(), options).await,
        EntityKind::Provider => execute(&ProviderMapper, &rows, client.as_ref(), options).await,
        EntityKind::Subscription => {
            execute(&SubscriptionMapper, &rows, client.as_ref(), options).await
        }
    }
}

async fn execute<M: FieldMapper>(
    mapper: &M,
    rows: &[RawRow],
    client: Option<&TrackerClient>,
    options: ImportOptions,
) -> Result<()> {
    let records = mapper.parse_records(rows);
    let valid: Vec<usize> = records
        .iter()
        .filter(|r| r.is_valid())
        .map(|r| r.index)
        .collect();
    let invalid = records.len() - valid.len();

    if invalid > 0 {
        println!(
            "{} of {} records failed validation and will not be imported:",
            invalid,
            records.len()
        );
        for record in records.iter().filter(|r| !r.is_valid()) {
            for error in &record.validation_errors {
                println!(
                    "  record {} {}: {}",
                    record.index,
                    error.field.red(),
                    error.message
                );
            }
        }
    }
    if valid.is_empty() {
        bail!("no valid records to import");
    }

    if options.dry_run {
        println!("dry run: would import {} records", valid.len());
        return Ok(());
    }
    let Some(client) = client else {
        bail!("no API client configured");
    };

    let mut manager = ImportManager::new();
    let cancel = manager.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("cancellation requested");
            cancel.cancel();
        }
    });

    let mut on_transition = |index: usize, status: &RecordStatus| match status {
        RecordStatus::Success => println!("  {} record {index}", "imported".green()),
        RecordStatus::Skipped(message) => {
            println!("  {} record {index}: {message}", "skipped".yellow())
        }
        RecordStatus::Error(message) => {
            println!("  {} record {index}: {message}", "failed".red())
        }
        _ => {}
    };

    manager
        .import_records(&records, &valid, client, &mut on_transition)
        .await;

    if options.retry_failed && !manager.failed_indices().is_empty() {
        println!(
            "retrying {} failed records",
            manager.failed_indices().len()
        );
        manager
            .retry_failed(&records, client, &mut on_transition)
            .await;
    }

    let progress = manager.progress();
    let succeeded = progress.completed - progress.failed - progress.skipped;
    let pending = progress.total - progress.completed;
    println!(
        "{} imported, {} skipped, {} failed, {} of {} processed",
        succeeded.to_string().green(),
        progress.skipped.to_string().yellow(),
        progress.failed.to_string().red(),
        progress.completed,
        progress.total
    );
    if pending > 0 {
        println!("{pending} records were not processed (cancelled)");
    }
    if progress.failed > 0 {
        bail!("{} records failed to import", progress.failed);
    }
    Ok(())
}
