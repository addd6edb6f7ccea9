use anyhow::Context;
use inspect_editor::DocumentOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "inspect.config.json";

/// Tailwind Inspect configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Glob patterns for source files, relative to the config directory
    #[serde(default = "default_include")]
    pub include: Vec<String>,

    /// Directory for compiled output
    #[serde(default = "default_out_dir")]
    pub out_dir: String,

    /// Parser, printer, transpiler and reconciler settings
    #[serde(default)]
    pub document: DocumentOptions,
}

fn default_include() -> Vec<String> {
    vec!["src/**/*.jsx".to_string(), "src/**/*.tsx".to_string()]
}

fn default_out_dir() -> String {
    "dist".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Files matched by the include patterns, sorted and deduplicated
    pub fn source_files(&self, cwd: &Path) -> anyhow::Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for pattern in &self.include {
            let full = cwd.join(pattern);
            let full = full.to_string_lossy();
            for entry in glob::glob(&full).with_context(|| format!("Bad include pattern {}", pattern))? {
                let path = entry?;
                if path.is_file() {
                    files.push(path);
                }
            }
        }

        files.sort();
        files.dedup();
        Ok(files)
    }

    pub fn get_out_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.out_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            include: default_include(),
            out_dir: default_out_dir(),
            document: DocumentOptions::default(),
        }
    }
}
