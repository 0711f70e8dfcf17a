use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

use crate::adapter::filters::{FilterRules, UNITS_PER_FLOORPLAN};

/// Ten years.
const MAX_LEAD_TIME_DAYS: i64 = 3650;

pub struct Config {
    pub feed_source: String,
    pub output_dir: Option<PathBuf>,
    pub lead_time: chrono::Duration,
    pub units_per_floorplan: usize,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        Ok(Self {
            feed_source: var("FEED_SOURCE").context("FEED_SOURCE must be set")?,
            output_dir: var("OUTPUT_DIR").map(PathBuf::from),
            lead_time: lead_time(&var)?,
            units_per_floorplan: parse_or(&var, "UNITS_PER_FLOORPLAN", UNITS_PER_FLOORPLAN)?,
            http_timeout: Duration::from_secs(parse_or(&var, "HTTP_TIMEOUT_SECS", 30)?),
        })
    }

    pub fn filter_rules(&self) -> FilterRules {
        FilterRules {
            lead_time: self.lead_time,
            units_per_floorplan: self.units_per_floorplan,
        }
    }
}

fn lead_time(var: &impl Fn(&str) -> Option<String>) -> anyhow::Result<chrono::Duration> {
    let days: i64 = parse_or(var, "LEAD_TIME_DAYS", 120)?;

    if !(0..=MAX_LEAD_TIME_DAYS).contains(&days) {
        anyhow::bail!("LEAD_TIME_DAYS must be between 0 and {MAX_LEAD_TIME_DAYS}, got {days}");
    }

    chrono::Duration::try_days(days).with_context(|| format!("LEAD_TIME_DAYS {days} is out of range"))
}

fn parse_or<T>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has invalid value {raw:?}")),
        None => Ok(default),
    }
}
