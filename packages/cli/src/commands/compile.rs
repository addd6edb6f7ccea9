use super::pretty_parse_error;
use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use inspect_compiler_react::{compile_to_react, CompileError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

const SOURCE_EXTENSIONS: &[&str] = &["jsx", "tsx"];

#[derive(Debug, Args)]
pub struct CompileArgs {
    /// Files or directories to compile (defaults to the config include patterns)
    pub paths: Vec<PathBuf>,

    /// Output to stdout instead of files
    #[arg(long)]
    pub stdout: bool,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Omit `__source` location props
    #[arg(long)]
    pub no_source_locations: bool,
}

pub fn compile(args: CompileArgs, config: &Config, cwd: &Path) -> Result<()> {
    let files = if args.paths.is_empty() {
        config.source_files(cwd)?
    } else {
        collect_sources(&args.paths)?
    };

    if files.is_empty() {
        println!("{}", "⚠️  No .jsx or .tsx files found".yellow());
        return Ok(());
    }

    println!("{}", "🔨 Compiling...".bright_blue().bold());

    let out_dir = match &args.out_dir {
        Some(dir) => cwd.join(dir),
        None => config.get_out_dir(cwd),
    };

    let mut success_count = 0;
    let mut error_count = 0;

    for file in &files {
        let relative_path = file.strip_prefix(cwd).unwrap_or(file);
        match compile_file(file, relative_path, &args, config, &out_dir) {
            Ok(output_path) => {
                success_count += 1;
                println!("  {} {} → {}", "✓".green(), relative_path.display(), output_path);
            }
            Err(e) => {
                error_count += 1;
                eprintln!("  {} {} - {}", "✗".red(), relative_path.display(), e.to_string().red());
            }
        }
    }

    println!();
    if error_count == 0 {
        println!("{} Compiled {} files successfully", "✅".green(), success_count);
        Ok(())
    } else {
        Err(anyhow!("Compiled {} files, {} errors", success_count, error_count))
    }
}

/// Expand directories into the JSX/TSX files below them
fn collect_sources(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                if is_source(entry.path()) {
                    files.push(entry.path().to_path_buf());
                }
            }
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            return Err(anyhow!("Path does not exist: {}", path.display()));
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn is_source(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

fn compile_file(
    file_path: &Path,
    relative_path: &Path,
    args: &CompileArgs,
    config: &Config,
    out_dir: &Path,
) -> Result<String> {
    let source = fs::read_to_string(file_path)
        .with_context(|| format!("Cannot read {}", file_path.display()))?;

    let mut options = config.document.transpile.clone();
    options.file_name = relative_path.display().to_string();
    if args.no_source_locations {
        options.source_locations = false;
    }

    let output = compile_to_react(&source, &options).map_err(|err| match err {
        CompileError::Parse(err) => anyhow!("\n{}", pretty_parse_error(&err, file_path, &source)),
    })?;
    debug!(file = %relative_path.display(), bytes = output.len(), "compiled");

    if args.stdout {
        println!("{}", output);
        return Ok("stdout".to_string());
    }

    let output_file = out_dir.join(relative_path).with_extension("js");
    if let Some(parent) = output_file.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output_file, output)?;

    Ok(output_file.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_sources() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("ui/forms");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("Input.tsx"), "").unwrap();
        fs::write(dir.path().join("ui/Card.jsx"), "").unwrap();
        fs::write(dir.path().join("ui/theme.css"), "").unwrap();

        let files = collect_sources(&[dir.path().join("ui")]).unwrap();

        assert_eq!(
            files,
            vec![dir.path().join("ui/Card.jsx"), nested.join("Input.tsx")]
        );
    }

    #[test]
    fn test_missing_path() {
        assert!(collect_sources(&[PathBuf::from("/definitely/not/here")]).is_err());
    }

    #[test]
    fn test_compile_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(
            dir.path().join("src/Card.tsx"),
            "export const Card = () => <div className=\"p-4\" />;\n",
        )
        .unwrap();

        let args = CompileArgs {
            paths: Vec::new(),
            stdout: false,
            out_dir: None,
            no_source_locations: true,
        };
        compile(args, &Config::default(), dir.path()).unwrap();

        let output = fs::read_to_string(dir.path().join("dist/src/Card.js")).unwrap();
        assert_eq!(
            output,
            "export const Card = () => React.createElement(\"div\", {className: \"p-4\"});\n"
        );
    }
}
