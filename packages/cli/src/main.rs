mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    compile, format, init, style, tree, CompileArgs, FormatArgs, InitArgs, StyleArgs, TreeArgs,
};
use config::Config;
use std::path::{Path, PathBuf};
use tracing::Level;

/// Tailwind Inspect - edit utility-class styles in JSX/TSX sources
#[derive(Parser, Debug)]
#[command(name = "tailwind-inspect")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to inspect.config.json in the working directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log to stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write an inspect.config.json
    Init(InitArgs),

    /// Commit sources once, normalizing class order
    Format(FormatArgs),

    /// Transpile sources to createElement calls
    Compile(CompileArgs),

    /// Print the component and element tree of a source file
    Tree(TreeArgs),

    /// Show or edit the style of the element at a location
    Style(StyleArgs),
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli, cwd: &Path) -> anyhow::Result<Config> {
    match &cli.config {
        Some(path) => Config::load_from(&cwd.join(path)),
        None => Config::load(cwd),
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let config = load_config(&cli, &cwd)?;

    match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Format(args) => format(args, &config).await,
        Command::Compile(args) => compile(args, &config, &cwd),
        Command::Tree(args) => tree(args, &config).await,
        Command::Style(args) => style(args, &config).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
