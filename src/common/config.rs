use std::path::{Path, PathBuf};

use anyhow::bail;
use serde::{Deserialize, Serialize};

pub fn config_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("omni")
        .join("config.toml")
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    settings: OmniSettings,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Config {
    pub settings: OmniSettings,
}

/// Policy knobs for the omni column layout.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct OmniSettings {
    /// Place new windows automatically: fill the last column up to
    /// `max_stack`, then open a new one.
    #[serde(default = "yes")]
    pub autotile: bool,
    /// Pull windows leftward after a removal so stacks stay full.
    /// Only effective together with `autotile`.
    #[serde(default = "yes")]
    pub automove: bool,
    /// Send new windows to the column with the fewest windows.
    #[serde(default = "no")]
    pub fair: bool,
    /// Number of windows a stack column holds before a new column is opened.
    #[serde(default = "default_max_stack")]
    pub max_stack: usize,
    /// Upper bound on columns opened when the current one is non-empty.
    /// `0` means unbounded.
    #[serde(default = "default_num_columns")]
    pub num_columns: usize,
    /// Display hint copied into every new column.
    #[serde(default = "yes")]
    pub split: bool,
    /// Offset from the current window at which a window is inserted when
    /// `autotile` is off. `0` inserts above the current window, `1` below.
    #[serde(default)]
    pub insert_position: i32,
}

impl Default for OmniSettings {
    fn default() -> Self {
        Self {
            autotile: yes(),
            automove: yes(),
            fair: no(),
            max_stack: default_max_stack(),
            num_columns: default_num_columns(),
            split: yes(),
            insert_position: 0,
        }
    }
}

impl OmniSettings {
    pub fn column_cap(&self) -> usize {
        if self.num_columns == 0 { usize::MAX } else { self.num_columns }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.max_stack < 1 {
            issues.push(format!("max_stack must be at least 1, got {}", self.max_stack));
        }

        if self.automove && !self.autotile {
            issues.push("automove has no effect while autotile is disabled".to_string());
        }

        issues
    }
}

fn yes() -> bool { true }

fn no() -> bool { false }

fn default_max_stack() -> usize { 3 }

fn default_num_columns() -> usize { 2 }

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let buf = std::fs::read_to_string(path)?;
        Self::parse(&buf)
    }

    pub fn from_defaults() -> anyhow::Result<Config> {
        Self::parse(include_str!("../../omni.default.toml"))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let file = ConfigFile { settings: self.settings.clone() };
        let toml_string = toml::to_string_pretty(&file)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, toml_string.as_bytes())?;
        Ok(())
    }

    /// Validates the entire configuration and returns a list of issues found.
    pub fn validate(&self) -> Vec<String> {
        self.settings.validate()
    }

    fn parse(buf: &str) -> anyhow::Result<Config> {
        match toml::from_str::<ConfigFile>(buf) {
            Ok(c) => Ok(Config { settings: c.settings }),
            Err(e) => bail!("{e}"),
        }
    }
}
