//! Output configuration for diagram export.
//!
//! Values are resolved once, before any diagram work starts: CLI flags
//! take precedence over an explicit `--config` YAML file, which takes
//! precedence over `sql-erd.yaml` in the current directory, which takes
//! precedence over the defaults. Enumerated values are parsed into closed
//! enums here and invalid input is rejected immediately; nothing
//! downstream re-validates.

use crate::graph::{ImageFormat, Rankdir};
use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file picked up from the current directory when no --config is given
pub const DEFAULT_CONFIG_FILE: &str = "sql-erd.yaml";

static PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").unwrap());

/// Raw YAML config file contents; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    output_dir: Option<PathBuf>,
    prefix: Option<String>,
    format: Option<String>,
    rankdir: Option<String>,
}

/// CLI-provided overrides, still unparsed
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub output_dir: Option<PathBuf>,
    pub prefix: Option<String>,
    pub format: Option<String>,
    pub rankdir: Option<String>,
}

/// Fully resolved export configuration
#[derive(Debug, Clone)]
pub struct ErdConfig {
    /// Directory the diagram files are written into
    pub output_dir: PathBuf,
    /// File-name prefix; output files are `<prefix>-detail.*` and
    /// `<prefix>-summary.*`
    pub prefix: String,
    /// Output format (dot text or a rendered image)
    pub format: ImageFormat,
    /// Diagram layout direction
    pub rankdir: Rankdir,
}

impl Default for ErdConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            prefix: "erd".to_string(),
            format: ImageFormat::default(),
            rankdir: Rankdir::default(),
        }
    }
}

impl ErdConfig {
    /// Resolve the effective configuration from CLI overrides and an
    /// optional config file
    pub fn resolve(cli: CliOverrides, config_path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        let file = match config_path {
            Some(path) => Some(load_config_file(path)?),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Some(load_config_file(default_path)?)
                } else {
                    None
                }
            }
        };

        if let Some(file) = file {
            if let Some(dir) = file.output_dir {
                config.output_dir = dir;
            }
            if let Some(prefix) = file.prefix {
                config.prefix = prefix;
            }
            if let Some(format) = file.format {
                config.format = parse_value(&format)?;
            }
            if let Some(rankdir) = file.rankdir {
                config.rankdir = parse_value(&rankdir)?;
            }
        }

        if let Some(dir) = cli.output_dir {
            config.output_dir = dir;
        }
        if let Some(prefix) = cli.prefix {
            config.prefix = prefix;
        }
        if let Some(format) = cli.format {
            config.format = parse_value(&format)?;
        }
        if let Some(rankdir) = cli.rankdir {
            config.rankdir = parse_value(&rankdir)?;
        }

        if !PREFIX_RE.is_match(&config.prefix) {
            bail!(
                "invalid prefix '{}': only letters, digits, '.', '_' and '-' are allowed",
                config.prefix
            );
        }

        Ok(config)
    }

    /// Path of the DOT text file for one view (`detail` or `summary`)
    pub fn dot_path(&self, view: &str) -> PathBuf {
        self.output_dir.join(format!("{}-{}.gv", self.prefix, view))
    }

    /// Path of the rendered image file for one view
    pub fn image_path(&self, view: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}-{}.{}", self.prefix, view, self.format.extension()))
    }
}

fn parse_value<T: std::str::FromStr<Err = String>>(s: &str) -> Result<T> {
    s.parse().map_err(|e: String| anyhow::anyhow!("{}", e))
}

fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("cannot read config file {}", path.display()))?;
    serde_yaml_ng::from_str(&contents)
        .with_context(|| format!("invalid config file {}", path.display()))
}
