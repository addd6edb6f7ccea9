use super::open_document;
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use inspect_editor::{Edit, Style, UtilityCodec};
use inspect_style::StyleDeclaration;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct StyleArgs {
    /// Source file containing the element
    pub file: PathBuf,

    /// Line of the element's opening `<` (1-based)
    #[arg(short, long)]
    pub line: usize,

    /// Column of the element's opening `<` (1-based)
    #[arg(short, long)]
    pub column: usize,

    /// Replace the element's classes
    #[arg(long)]
    pub set: Option<String>,

    /// Merge classes into the element's style
    #[arg(long)]
    pub apply: Option<String>,

    /// Remove a class (repeatable)
    #[arg(long)]
    pub remove: Vec<String>,

    /// Persist edits to the file; otherwise the edited source is printed
    #[arg(short, long)]
    pub write: bool,
}

impl StyleArgs {
    fn has_edits(&self) -> bool {
        self.set.is_some() || self.apply.is_some() || !self.remove.is_empty()
    }
}

pub async fn style(args: StyleArgs, config: &Config) -> Result<()> {
    let mut doc = open_document(&args.file, config, args.write).await?;

    let node = doc
        .select_from_location(args.line, args.column)
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("No element starts at {}:{}", args.line, args.column))?;

    let mut edits = Vec::new();
    if let Some(classes) = &args.set {
        edits.push(Edit::SetClasses {
            node,
            classes: classes.clone(),
        });
    }
    if let Some(classes) = &args.apply {
        edits.push(Edit::ApplyClasses {
            node,
            classes: classes.clone(),
        });
    }
    for class in &args.remove {
        edits.push(Edit::RemoveClass {
            node,
            class: class.clone(),
        });
    }
    for edit in edits {
        doc.apply(edit)?;
    }

    if args.has_edits() {
        doc.commit().await?;
    }

    let element = doc
        .element(node)
        .ok_or_else(|| anyhow!("Element disappeared after commit"))?;
    println!("{}", format!("<{}>", element.tag_name()).cyan().bold());
    for line in describe_style(&element.style, doc.toolchain().codec.as_ref()) {
        println!("  {}", line);
    }

    if args.has_edits() {
        if args.write {
            println!("{} Wrote {}", "✓".green(), args.file.display());
        } else {
            println!();
            print!("{}", doc.code());
        }
    }

    Ok(())
}

/// One line per declaration, in serialization order
fn describe_style(style: &Style, codec: &dyn UtilityCodec) -> Vec<String> {
    style
        .declarations()
        .map(|declaration| match declaration {
            StyleDeclaration::Utility(key, value) => {
                let mut label = key.property.name().to_string();
                if !key.variants.is_empty() {
                    label.push_str(&format!(" ({})", key.variants.join(", ")));
                }
                format!("{:<24} {}", label, codec.encode(key, value))
            }
            StyleDeclaration::Opaque(token) => format!("{:<24} {}", "(unrecognized)", token),
        })
        .collect()
}
