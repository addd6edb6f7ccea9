use super::open_document;
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct FormatArgs {
    /// Source files to format
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Write the result back instead of printing it
    #[arg(short, long)]
    pub write: bool,

    /// Fail if any file would change
    #[arg(long, conflicts_with = "write")]
    pub check: bool,
}

/// Load each file and commit it once, which normalizes class lists into
/// canonical order
pub async fn format(args: FormatArgs, config: &Config) -> Result<()> {
    let mut unformatted = Vec::new();

    for file in &args.files {
        let changed = format_file(file, &args, config).await?;
        if changed {
            unformatted.push(file);
        }
    }

    if args.check {
        for file in &unformatted {
            println!("  {} {}", "✗".red(), file.display());
        }
        if !unformatted.is_empty() {
            return Err(anyhow!("{} file(s) would be reformatted", unformatted.len()));
        }
        println!("{} {} file(s) already formatted", "✓".green(), args.files.len());
    } else if args.write {
        println!("{} Formatted {} file(s)", "✓".green(), unformatted.len());
    }

    Ok(())
}

async fn format_file(path: &Path, args: &FormatArgs, config: &Config) -> Result<bool> {
    let mut doc = open_document(path, config, args.write).await?;
    let before = doc.code().to_string();

    doc.commit().await?;
    let changed = doc.code() != before;

    if !args.write && !args.check {
        print!("{}", doc.code());
    }

    Ok(changed)
}
