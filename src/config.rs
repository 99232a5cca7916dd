use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

#[cfg(feature = "suggest")]
use crate::suggest::SuggestConfig;
use crate::validator::style::StyleFormat;

/// One external tool invocation: command plus leading arguments.
///
/// The schema validator is invoked as `<cmd> <args...> <schema>
/// <document>`; the default matches yamale's `-s <schema> <document>`
/// calling convention.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ToolConfig {
    pub cmd: String,
    pub args: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            cmd: "yamale".to_string(),
            args: vec!["-s".to_string()],
            timeout_secs: 30,
        }
    }
}

impl ToolConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// One style linter entry from the `[[linters]]` list.
///
/// Linters are invoked as `<cmd> <args...> <document>`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LinterConfig {
    /// Short name used as the `[name]:` annotation prefix
    pub name: String,
    pub cmd: String,
    pub args: Vec<String>,
    pub format: StyleFormat,
    pub enabled: bool,
    pub timeout_secs: u64,
}

impl Default for LinterConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            cmd: String::new(),
            args: Vec::new(),
            format: StyleFormat::default(),
            enabled: true,
            timeout_secs: 30,
        }
    }
}

impl LinterConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Schema to validate against. `--schema` beats this, and when both
    /// are absent a `schema.yml`/`schema.yaml` next to the document is
    /// picked up.
    pub schema: Option<PathBuf>,
    pub validator: ToolConfig,
    pub linters: Vec<LinterConfig>,
    #[cfg(feature = "suggest")]
    pub suggestions: SuggestConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema: None,
            validator: ToolConfig::default(),
            linters: default_linters(),
            #[cfg(feature = "suggest")]
            suggestions: SuggestConfig::default(),
        }
    }
}

fn default_linters() -> Vec<LinterConfig> {
    vec![
        LinterConfig {
            name: "yamllint".to_string(),
            cmd: "yamllint".to_string(),
            args: vec!["-f".to_string(), "parsable".to_string()],
            format: StyleFormat::LineCol,
            enabled: true,
            timeout_secs: 30,
        },
        LinterConfig {
            name: "ansible-lint".to_string(),
            cmd: "ansible-lint".to_string(),
            args: Vec::new(),
            format: StyleFormat::Locator,
            enabled: true,
            timeout_secs: 30,
        },
    ]
}

/// Names tried next to a document when no schema is configured
const SCHEMA_SIBLINGS: &[&str] = &["schema.yml", "schema.yaml"];

/// Find the schema for a document with precedence:
/// 1) explicit path (from `--schema`)
/// 2) `schema` key in the config, relative to the config file's directory
/// 3) `schema.yml` / `schema.yaml` next to the document
pub fn find_schema(
    explicit: Option<&Path>,
    config: &Config,
    config_path: Option<&Path>,
    document: &Path,
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Some(schema) = &config.schema {
        if schema.is_absolute() {
            return Some(schema.clone());
        }
        return Some(match config_path.and_then(Path::parent) {
            Some(dir) => dir.join(schema),
            None => schema.clone(),
        });
    }

    let dir = document.parent().unwrap_or_else(|| Path::new("."));
    for name in SCHEMA_SIBLINGS {
        let p = dir.join(name);
        if p.is_file() {
            return Some(p);
        }
    }
    None
}

const CANDIDATE_NAMES: &[&str] = &[".vargloss.toml", "vargloss.toml"];

fn parse_config_str(s: &str, path: &Path) -> io::Result<Config> {
    toml::from_str::<Config>(s).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("invalid config {}: {e}", path.display()),
        )
    })
}

fn read_config(path: &Path) -> io::Result<Config> {
    log::debug!("Reading config from: {}", path.display());
    let s = fs::read_to_string(path)?;
    let config = parse_config_str(&s, path)?;
    log::info!("Loaded config from: {}", path.display());
    Ok(config)
}

fn find_in_tree(start_dir: &Path) -> Option<PathBuf> {
    for dir in start_dir.ancestors() {
        for name in CANDIDATE_NAMES {
            let p = dir.join(name);
            if p.is_file() {
                return Some(p);
            }
        }
    }
    None
}

fn xdg_config_path() -> Option<PathBuf> {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        let p = Path::new(&xdg).join("vargloss").join("config.toml");
        if p.is_file() {
            return Some(p);
        }
    }
    if let Ok(home) = env::var("HOME") {
        let p = Path::new(&home)
            .join(".config")
            .join("vargloss")
            .join("config.toml");
        if p.is_file() {
            return Some(p);
        }
    }
    None
}

/// Load configuration with precedence:
/// 1) explicit path (error if unreadable/invalid)
/// 2) walk up from start_dir: .vargloss.toml, vargloss.toml
/// 3) XDG: $XDG_CONFIG_HOME/vargloss/config.toml or ~/.config/vargloss/config.toml
/// 4) default config
pub fn load(explicit: Option<&Path>, start_dir: &Path) -> io::Result<(Config, Option<PathBuf>)> {
    if let Some(path) = explicit {
        let cfg = read_config(path)?;
        return Ok((cfg, Some(path.to_path_buf())));
    }

    if let Some(p) = find_in_tree(start_dir)
        && let Ok(cfg) = read_config(&p)
    {
        return Ok((cfg, Some(p)));
    }

    if let Some(p) = xdg_config_path()
        && let Ok(cfg) = read_config(&p)
    {
        return Ok((cfg, Some(p)));
    }

    log::debug!("No config file found, using defaults");
    Ok((Config::default(), None))
}
