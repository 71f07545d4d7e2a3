//! `validate`: parse, map and validate a file, printing per-record
//! verdicts. Stands in for the import preview.

use std::path::Path;

use anyhow::{bail, Result};
use colored::Colorize;

use crate::mapper::{FieldMapper, LabelMapper, ProviderMapper, SubscriptionMapper};
use crate::model::{EntityKind, Severity};
use crate::parser::{self, RawRow};

pub fn run(file: &Path, entity: EntityKind) -> Result<()> {
    let rows = parse_rows(file)?;
    match entity {
        EntityKind::Label => report(&LabelMapper, &rows),
        EntityKind::Provider => report(&ProviderMapper, &rows),
        EntityKind::Subscription => report(&SubscriptionMapper, &rows),
    }
}

/// Parse a file and reject empty batches with a user-facing message.
/// Parser errors come back with every line-level entry listed.
pub(crate) fn parse_rows(file: &Path) -> Result<Vec<RawRow>> {
    match parser::parse_file(file, None) {
        Ok(rows) if rows.is_empty() => bail!("{} contains no records", file.display()),
        Ok(rows) => Ok(rows),
        Err(e) => {
            let mut message = format!("cannot read {}: {e}", file.display());
            for entry in e.entries().iter().skip(1) {
                message.push_str(&format!("\n  {entry}"));
            }
            bail!(message);
        }
    }
}

fn report<M: FieldMapper>(mapper: &M, rows: &[RawRow]) -> Result<()> {
    let records = mapper.parse_records(rows);
    let mut invalid = 0;

    for record in &records {
        if record.is_valid() {
            println!("{} record {}", "ok     ".green(), record.index);
        } else {
            invalid += 1;
            println!("{} record {}", "invalid".red(), record.index);
        }
        for error in &record.validation_errors {
            let tag = match error.severity {
                Severity::Error => "error".red(),
                Severity::Warning => "warning".yellow(),
            };
            println!("        {tag} {}: {}", error.field, error.message);
        }
    }

    println!("{} of {} records valid", records.len() - invalid, records.len());
    if invalid > 0 {
        bail!("{invalid} records failed validation");
    }
    Ok(())
}
