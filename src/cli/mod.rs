//! Command-line interface.

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::model::EntityKind;
use crate::parser::FileFormat;

#[derive(Parser)]
#[command(
    name = "subtrack-cli",
    about = "Bulk-import client for subscription trackers",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EntityArg {
    Label,
    Provider,
    Subscription,
}

impl From<EntityArg> for EntityKind {
    fn from(arg: EntityArg) -> Self {
        match arg {
            EntityArg::Label => Self::Label,
            EntityArg::Provider => Self::Provider,
            EntityArg::Subscription => Self::Subscription,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Csv,
    Json,
    Yaml,
}

impl From<FormatArg> for FileFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => Self::Csv,
            FormatArg::Json => Self::Json,
            FormatArg::Yaml => Self::Yaml,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse and validate an import file without submitting anything
    Validate {
        /// Import file (.csv, .json, .yaml or .yml)
        file: PathBuf,
        #[arg(long, value_enum)]
        entity: EntityArg,
    },
    /// Import the valid records of a file, one at a time
    Import {
        /// Import file (.csv, .json, .yaml or .yml)
        file: PathBuf,
        #[arg(long, value_enum)]
        entity: EntityArg,
        /// Tracker API base URL (overrides SUBTRACK_HOST / config file)
        #[arg(long)]
        host: Option<String>,
        /// Bearer token (overrides SUBTRACK_TOKEN / config file)
        #[arg(long)]
        token: Option<String>,
        /// Walk the import loop without submitting anything
        #[arg(long)]
        dry_run: bool,
        /// After the batch, retry every failed record once
        #[arg(long)]
        retry_failed: bool,
    },
    /// Write import template files, or check the embedded ones
    Template {
        #[arg(value_enum)]
        entity: Option<EntityArg>,
        /// Template format; all three are written when omitted
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        /// Validate every embedded template instead of writing files
        #[arg(long)]
        check: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Validate { file, entity } => commands::validate::run(&file, entity.into()),
            Commands::Import {
                file,
                entity,
                host,
                token,
                dry_run,
                retry_failed,
            } => {
                commands::import::run(
                    &file,
                    entity.into(),
                    host,
                    token,
                    commands::import::ImportOptions {
                        dry_run,
                        retry_failed,
                    },
                )
                .await
            }
            Commands::Template {
                entity,
                format,
                out_dir,
                check,
            } => commands::template::run(
                entity.map(EntityKind::from),
                format.map(FileFormat::from),
                &out_dir,
                check,
            ),
        }
    }
}
