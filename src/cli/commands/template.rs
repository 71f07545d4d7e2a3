//! `template`: write the embedded import templates to disk, or batch-check
//! them all with `--check`.

use std::path::Path;

use anyhow::{bail, Context, Result};
use colored::Colorize;

use crate::model::EntityKind;
use crate::parser::FileFormat;
use crate::templates;

pub fn run(
    entity: Option<EntityKind>,
    format: Option<FileFormat>,
    out_dir: &Path,
    check: bool,
) -> Result<()> {
    if check {
        let issues = templates::validate_templates();
        if issues.is_empty() {
            println!("all {} templates are valid", templates::ALL.len());
            return Ok(());
        }
        for issue in &issues {
            println!("{} {issue}", "issue".red());
        }
        bail!("{} template issues found", issues.len());
    }

    let Some(kind) = entity else {
        bail!("specify an entity type, or --check to validate the embedded templates");
    };
    let formats = match format {
        Some(format) => vec![format],
        None => vec![FileFormat::Csv, FileFormat::Json, FileFormat::Yaml],
    };

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("cannot create {}", out_dir.display()))?;
    for format in formats {
        let content = templates::template_content(kind, format)
            .with_context(|| format!("no embedded template for {kind} ({format:?})"))?;
        let path = out_dir.join(templates::template_file_name(kind, format));
        std::fs::write(&path, content)
            .with_context(|| format!("cannot write {}", path.display()))?;
        println!("wrote {}", path.display());
    }
    Ok(())
}
