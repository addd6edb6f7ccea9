use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::Path;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Source directory scanned by `compile`
    #[arg(short, long, default_value = "src")]
    pub src_dir: String,

    /// Attribute holding class lists (`className` for React, `class` for others)
    #[arg(long, default_value = "className")]
    pub class_attribute: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    let mut config = Config {
        include: vec![
            format!("{}/**/*.jsx", args.src_dir),
            format!("{}/**/*.tsx", args.src_dir),
        ],
        ..Config::default()
    };
    config.document.reconcile.class_attribute = args.class_attribute.clone();

    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("Next steps:");
    println!("  1. Run: tailwind-inspect tree {}/App.tsx", args.src_dir);
    println!("  2. Run: tailwind-inspect compile");

    Ok(())
}
