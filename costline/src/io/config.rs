//! Configuration stored in `costline.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::day::{DayFrame, parse_utc_offset};
use crate::core::episodes::GapThreshold;
use crate::core::interval::DatePolicy;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "costline.toml";

/// Costline configuration (TOML).
///
/// Missing fields default to the values the scheduling backend itself uses
/// when it explains server costs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CostlineConfig {
    /// Offset every instant is truncated in before counting days
    /// (e.g. `"+02:00"`).
    pub utc_offset: String,

    /// Largest gap in days between two deployments that still counts as a
    /// single episode.
    pub merge_gap_days: u32,

    /// Treatment of deployments with missing, unreadable, or reversed dates.
    pub date_policy: DatePolicy,
}

impl Default for CostlineConfig {
    fn default() -> Self {
        Self {
            utc_offset: "+00:00".to_string(),
            merge_gap_days: GapThreshold::DEFAULT.as_days(),
            date_policy: DatePolicy::Permissive,
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub utc_offset: Option<String>,
    pub merge_gap_days: Option<u32>,
    pub strict: bool,
}

/// Validated settings derived from a [`CostlineConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub frame: DayFrame,
    pub gap: GapThreshold,
    pub policy: DatePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            frame: DayFrame::utc(),
            gap: GapThreshold::DEFAULT,
            policy: DatePolicy::Permissive,
        }
    }
}

impl CostlineConfig {
    pub fn validate(&self) -> Result<()> {
        parse_utc_offset(&self.utc_offset).context("utc_offset")?;
        Ok(())
    }

    pub fn settings(&self) -> Result<Settings> {
        let offset = parse_utc_offset(&self.utc_offset).context("utc_offset")?;
        Ok(Settings {
            frame: DayFrame::new(offset),
            gap: GapThreshold::days(self.merge_gap_days),
            policy: self.date_policy,
        })
    }
}

/// Apply command-line overrides on top of the loaded config.
pub fn apply_overrides(mut base: CostlineConfig, overrides: &ConfigOverrides) -> Result<CostlineConfig> {
    if let Some(utc_offset) = &overrides.utc_offset {
        base.utc_offset = utc_offset.clone();
    }
    if let Some(merge_gap_days) = overrides.merge_gap_days {
        base.merge_gap_days = merge_gap_days;
    }
    if overrides.strict {
        base.date_policy = DatePolicy::Strict;
    }
    base.validate()?;
    Ok(base)
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `CostlineConfig::default()`.
pub fn load_config(path: &Path) -> Result<CostlineConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "config missing, using defaults");
        let cfg = CostlineConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: CostlineConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    debug!(path = %path.display(), ?cfg, "config loaded");
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &CostlineConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
