//! Environment configuration

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use taskboard_core::task::Latency;
use taskboard_core::view::{Selection, TaskFilter};

pub const ENV_LATENCY: &str = "TASKBOARD_LATENCY";
pub const ENV_STATUS: &str = "TASKBOARD_STATUS";
pub const ENV_PRIORITY: &str = "TASKBOARD_PRIORITY";
pub const ENV_CATEGORY: &str = "TASKBOARD_CATEGORY";
pub const ENV_SEARCH: &str = "TASKBOARD_SEARCH";
pub const ENV_FORMAT: &str = "TASKBOARD_FORMAT";
pub const ENV_EXPORT_PATH: &str = "TASKBOARD_EXPORT_PATH";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub latency: Latency,
    pub filter: TaskFilter,
    pub format: OutputFormat,
    pub export_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let mut fetch = |key: &'static str| std::env::var(key).ok();
        Self::from_lookup(&mut fetch)
    }

    /// Build the config from an arbitrary variable source
    pub fn from_lookup(fetch: &mut impl FnMut(&'static str) -> Option<String>) -> Result<Self> {
        // Searches are matched verbatim, so they skip the trimming below
        let search = fetch(ENV_SEARCH).unwrap_or_default();
        let mut value = |key: &'static str| {
            fetch(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        let latency = match value(ENV_LATENCY).map(|l| l.to_ascii_lowercase()).as_deref() {
            None | Some("simulated") => Latency::simulated(),
            Some("none") => Latency::none(),
            Some(other) => bail!("{} must be `simulated` or `none`, got {:?}", ENV_LATENCY, other),
        };

        let format = match value(ENV_FORMAT).map(|f| f.to_ascii_lowercase()).as_deref() {
            None | Some("csv") => OutputFormat::Csv,
            Some("json") => OutputFormat::Json,
            Some(other) => bail!("{} must be `csv` or `json`, got {:?}", ENV_FORMAT, other),
        };

        let filter = TaskFilter {
            status: selection(ENV_STATUS, value(ENV_STATUS))?,
            priority: selection(ENV_PRIORITY, value(ENV_PRIORITY))?,
            category: selection(ENV_CATEGORY, value(ENV_CATEGORY))?,
            search,
        };

        Ok(Self {
            latency,
            filter,
            format,
            export_path: value(ENV_EXPORT_PATH).map(PathBuf::from),
        })
    }
}

fn selection<T>(key: &str, raw: Option<String>) -> Result<Selection<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        None => Ok(Selection::All),
        Some(raw) => raw
            .parse()
            .with_context(|| format!("Invalid value for {}", key)),
    }
}
