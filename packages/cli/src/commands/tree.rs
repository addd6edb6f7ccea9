use super::open_document;
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use inspect_editor::{NodeKind, OutlineNode};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct TreeArgs {
    /// Source file to inspect
    pub file: PathBuf,

    /// Print the outline as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn tree(args: TreeArgs, config: &Config) -> Result<()> {
    let doc = open_document(&args.file, config, false).await?;
    let outline = doc
        .outline()
        .ok_or_else(|| anyhow!("Document has no root node"))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outline)?);
    } else {
        let mut out = String::new();
        render(&outline, 0, &mut out);
        print!("{}", out);
    }

    Ok(())
}

fn render(node: &OutlineNode, depth: usize, out: &mut String) {
    let name = node.name.as_deref().unwrap_or("?");
    let text = node.text.as_deref().unwrap_or("");

    let label = match node.kind {
        NodeKind::Root => "file".bright_blue().to_string(),
        NodeKind::Component => format!("{} {}", "component".magenta(), name.bold()),
        NodeKind::Element => format!("<{}>", name).cyan().to_string(),
        NodeKind::Text => format!("{:?}", text),
        NodeKind::Expression | NodeKind::Spread => text.yellow().to_string(),
        NodeKind::Other => node.name.as_deref().unwrap_or("other").dimmed().to_string(),
    };

    out.push_str(&"  ".repeat(depth));
    out.push_str(&label);
    if let Some(classes) = &node.classes {
        out.push(' ');
        out.push_str(&classes.green().to_string());
    }
    if let (NodeKind::Element, Some(location)) = (node.kind, &node.location) {
        let position = format!("{}:{}", location.line, location.column + 1);
        out.push(' ');
        out.push_str(&position.dimmed().to_string());
    }
    out.push('\n');

    for child in &node.children {
        // Whitespace between tags
        if child.kind == NodeKind::Text && child.text.as_deref().is_some_and(str::is_empty) {
            continue;
        }
        render(child, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inspect_editor::Document;

    #[test]
    fn test_render_outline() {
        colored::control::set_override(false);
        let doc = Document::new(
            "export const Card = () => (\n  <div className=\"p-4\">\n    <p>Hi</p>\n  </div>\n);\n",
        )
        .unwrap();

        let mut out = String::new();
        render(&doc.outline().unwrap(), 0, &mut out);

        assert_eq!(
            out,
            "file\n  component Card\n    <div> p-4 2:3\n      <p> 3:5\n        \"Hi\"\n"
        );
    }
}
