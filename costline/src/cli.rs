//! CLI command implementations.

use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use costline::exit_codes;
use costline::explain::{explain_job, explain_server_by_id};
use costline::io::config::{
    CONFIG_FILE, ConfigOverrides, CostlineConfig, Settings, apply_overrides, load_config,
    write_config,
};
use costline::io::job::{ServerId, load_job};
use costline::report::{render_episodes_text, render_job_text, render_json, render_server_text};

use crate::Format;

fn resolve_settings(config_path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Settings> {
    let path = config_path.unwrap_or(Path::new(CONFIG_FILE));
    let cfg = load_config(path).context("load config")?;
    let cfg = apply_overrides(cfg, overrides).context("apply overrides")?;
    debug!(?cfg, "effective config");
    cfg.settings()
}

/// Print cost breakdowns for the whole job or a single server.
pub fn explain(
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
    job_path: &Path,
    server: Option<i64>,
    format: Format,
) -> Result<i32> {
    let settings = resolve_settings(config_path, overrides)?;
    let job = load_job(job_path)?;

    let rejected = match server {
        Some(id) => {
            let explanation = explain_server_by_id(&job, ServerId(id), &settings)?;
            match format {
                Format::Text => print!("{}", render_server_text(&explanation)),
                Format::Json => print!("{}", render_json(&explanation)?),
            }
            explanation.rejected.len()
        }
        None => {
            let explanation = explain_job(&job, &settings);
            info!(servers = explanation.servers.len(), "job explained");
            match format {
                Format::Text => print!("{}", render_job_text(&explanation)),
                Format::Json => print!("{}", render_json(&explanation)?),
            }
            explanation.rejected_count()
        }
    };

    Ok(exit_code_for(rejected))
}

/// Print the episode timeline of one server.
pub fn episodes(
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
    job_path: &Path,
    server: i64,
    format: Format,
) -> Result<i32> {
    let settings = resolve_settings(config_path, overrides)?;
    let job = load_job(job_path)?;
    let explanation = explain_server_by_id(&job, ServerId(server), &settings)?;
    match format {
        Format::Text => print!("{}", render_episodes_text(&explanation)),
        Format::Json => print!("{}", render_json(&explanation)?),
    }
    Ok(exit_code_for(explanation.rejected.len()))
}

/// Write the default config file.
pub fn init(config_path: Option<&Path>, force: bool) -> Result<i32> {
    let path = config_path.unwrap_or(Path::new(CONFIG_FILE));
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    write_config(path, &CostlineConfig::default())?;
    println!("init: wrote {}", path.display());
    Ok(exit_codes::OK)
}

fn exit_code_for(rejected: usize) -> i32 {
    if rejected > 0 {
        exit_codes::REJECTED
    } else {
        exit_codes::OK
    }
}
