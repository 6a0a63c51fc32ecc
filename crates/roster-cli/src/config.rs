// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use roster_app::InactiveStatuses;
use roster_view::TableConfig;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_NAME: &str = "roster";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_PREVIEW_LIMIT: usize = 8;
const DEFAULT_TABLE_DEBOUNCE: &str = "300ms";
const DEFAULT_PICKER_DEBOUNCE: &str = "150ms";
const MAX_DEBOUNCE: Duration = Duration::from_secs(60);
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_INACTIVE: [&str; 2] = ["lapsed", "deceased"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub data: Data,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub search: Search,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            data: Data::default(),
            ui: Ui::default(),
            search: Search::default(),
            status: Status::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Data {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub preview_limit: Option<i64>,
    pub keep_multi_select_open: Option<bool>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            preview_limit: Some(DEFAULT_PREVIEW_LIMIT as i64),
            keep_multi_select_open: Some(true),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Search {
    pub table_debounce: Option<String>,
    pub picker_debounce: Option<String>,
}

impl Default for Search {
    fn default() -> Self {
        Self {
            table_debounce: Some(DEFAULT_TABLE_DEBOUNCE.to_owned()),
            picker_debounce: Some(DEFAULT_PICKER_DEBOUNCE.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Status {
    pub inactive: Option<Vec<String>>,
}

impl Default for Status {
    fn default() -> Self {
        Self {
            inactive: Some(DEFAULT_INACTIVE.iter().map(|s| (*s).to_owned()).collect()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
            file: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("ROSTER_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set ROSTER_CONFIG_PATH to the config file")
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no version; add `version = 1` at the top",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1. Run `roster --print-example-config` for the current schema",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(limit) = self.ui.preview_limit
            && limit <= 0
        {
            bail!(
                "ui.preview_limit in {} must be positive, got {}",
                path.display(),
                limit
            );
        }

        for (key, raw) in [
            ("search.table_debounce", &self.search.table_debounce),
            ("search.picker_debounce", &self.search.picker_debounce),
        ] {
            if let Some(raw) = raw {
                let delay =
                    parse_duration(raw).with_context(|| format!("{key} in {}", path.display()))?;
                if delay > MAX_DEBOUNCE {
                    bail!(
                        "{key} in {} must be at most {}s, got {raw:?}",
                        path.display(),
                        MAX_DEBOUNCE.as_secs()
                    );
                }
            }
        }

        if let Some(inactive) = &self.status.inactive
            && InactiveStatuses::new(inactive).is_empty()
        {
            bail!(
                "status.inactive in {} must name at least one status",
                path.display()
            );
        }

        if let Some(level) = &self.log.level
            && level.trim().is_empty()
        {
            bail!("log.level in {} must not be empty", path.display());
        }

        Ok(())
    }

    pub fn data_path(&self) -> Option<PathBuf> {
        self.data.path.as_ref().map(PathBuf::from)
    }

    pub fn preview_limit(&self) -> usize {
        self.ui
            .preview_limit
            .and_then(|limit| usize::try_from(limit).ok())
            .filter(|limit| *limit > 0)
            .unwrap_or(DEFAULT_PREVIEW_LIMIT)
    }

    pub fn keep_multi_select_open(&self) -> bool {
        self.ui.keep_multi_select_open.unwrap_or(true)
    }

    pub fn table_debounce(&self) -> Result<Duration> {
        parse_duration(
            self.search
                .table_debounce
                .as_deref()
                .unwrap_or(DEFAULT_TABLE_DEBOUNCE),
        )
    }

    /// `None` when set to zero, which filters the picker on every keystroke.
    pub fn picker_debounce(&self) -> Result<Option<Duration>> {
        let delay = parse_duration(
            self.search
                .picker_debounce
                .as_deref()
                .unwrap_or(DEFAULT_PICKER_DEBOUNCE),
        )?;
        Ok((!delay.is_zero()).then_some(delay))
    }

    pub fn table_config(&self) -> Result<TableConfig> {
        Ok(TableConfig {
            query_debounce: self.table_debounce()?,
        })
    }

    pub fn inactive_statuses(&self) -> InactiveStatuses {
        match &self.status.inactive {
            Some(statuses) => InactiveStatuses::new(statuses),
            None => InactiveStatuses::default(),
        }
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        if let Some(file) = &self.log.file {
            return Ok(PathBuf::from(file));
        }
        let data_root = dirs::data_local_dir().ok_or_else(|| {
            anyhow!("cannot resolve data directory; set [log].file in the config")
        })?;
        Ok(data_root.join(APP_NAME).join("roster.log"))
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# roster config\n# Place this file at: {}\n\nversion = 1\n\n[data]\n# JSON file with a people array, or {{ people = [...], conditions = [...] }}\n# path = \"/absolute/path/to/roster.json\"\n\n[ui]\npreview_limit = {}\nkeep_multi_select_open = true\n\n[search]\ntable_debounce = \"{}\"\npicker_debounce = \"{}\"\n\n[status]\ninactive = [\"lapsed\", \"deceased\"]\n\n[log]\nlevel = \"{}\"\n# file = \"/absolute/path/to/roster.log\"\n",
            path.display(),
            DEFAULT_PREVIEW_LIMIT,
            DEFAULT_TABLE_DEBOUNCE,
            DEFAULT_PICKER_DEBOUNCE,
            DEFAULT_LOG_LEVEL,
        )
    }
}

fn parse_duration(raw: &str) -> Result<Duration> {
    let raw = raw.trim();
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid debounce duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid debounce duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid debounce duration {raw:?}"))?;
        let secs = mins
            .checked_mul(60)
            .with_context(|| format!("debounce duration {raw:?} is out of range"))?;
        return Ok(Duration::from_secs(secs));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 300ms)")
}
