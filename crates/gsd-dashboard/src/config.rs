use anyhow::{Context, Result};
use clap::Parser;
use gsd_core::planning::PLANNING_DIR;
use std::path::{Path, PathBuf};

pub const AUTO_REFRESH_ENV: &str = "GSD_AUTO_REFRESH";

#[derive(Debug, Parser)]
#[command(
    name = "gsd-dashboard",
    version,
    about = "Terminal dashboard for a project's .planning/ documents"
)]
pub struct Args {
    /// Project root; ancestors are searched when it has no .planning/ directory.
    #[arg(long, env = "GSD_PROJECT_ROOT", default_value = ".")]
    pub path: PathBuf,

    /// Start with auto-refresh turned off.
    #[arg(long)]
    pub no_auto_refresh: bool,

    /// Print the planning snapshot as JSON and exit.
    #[arg(long)]
    pub dump: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub project_root: PathBuf,
    pub auto_refresh: bool,
    pub dump: bool,
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self> {
        let project_root = resolve_root(&args.path)?;
        let env_auto_refresh = std::env::var(AUTO_REFRESH_ENV)
            .ok()
            .and_then(|value| parse_bool_flag(&value));

        Ok(Self {
            project_root,
            auto_refresh: resolve_auto_refresh(args.no_auto_refresh, env_auto_refresh),
            dump: args.dump,
        })
    }
}

fn resolve_auto_refresh(disabled_by_flag: bool, env_value: Option<bool>) -> bool {
    !disabled_by_flag && env_value.unwrap_or(true)
}

pub fn resolve_root(path: &Path) -> Result<PathBuf> {
    let start = path
        .canonicalize()
        .with_context(|| format!("project path {} is not accessible", path.display()))?;
    Ok(find_planning_root(&start).unwrap_or(start))
}

fn find_planning_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(path) = current {
        if is_planning_root(path) {
            return Some(path.to_path_buf());
        }
        current = path.parent();
    }
    None
}

fn is_planning_root(path: &Path) -> bool {
    path.join(PLANNING_DIR).is_dir()
}

pub fn parse_bool_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
