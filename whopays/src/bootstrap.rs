use crate::cli::ConfigOverrides;
use anyhow::{Context, Result};
use std::{env, path::PathBuf};
use tracing_subscriber::EnvFilter;
use whopays_application::SettlementOptions;
use whopays_domain::{MoneyContext, RoundingMode, TieBreakPolicy};

const DEFAULT_DATA_FILE: &str = "whopays.json";
const DEFAULT_SCALE: u32 = 2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Application configuration resolved from `.env`, the environment and CLI flags
#[derive(Debug, PartialEq)]
pub struct AppConfig {
    pub data_file: PathBuf,
    pub settlement: SettlementOptions,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env(overrides: &ConfigOverrides) -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok(), overrides)
    }

    pub fn from_lookup<F>(lookup: F, overrides: &ConfigOverrides) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_file = match &overrides.data_file {
            Some(path) => path.clone(),
            None => lookup("WHOPAYS_DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE)),
        };

        let tie_break = match overrides.tie_break {
            Some(policy) => policy,
            None => match lookup("WHOPAYS_TIE_BREAK") {
                Some(raw) => raw
                    .parse::<TieBreakPolicy>()
                    .context("invalid WHOPAYS_TIE_BREAK")?,
                None => TieBreakPolicy::default(),
            },
        };

        let rounding_mode = match overrides.rounding {
            Some(mode) => mode,
            None => match lookup("WHOPAYS_ROUNDING") {
                Some(raw) => raw
                    .parse::<RoundingMode>()
                    .context("invalid WHOPAYS_ROUNDING")?,
                None => RoundingMode::default(),
            },
        };

        let scale = match overrides.scale {
            Some(scale) => scale,
            None => match lookup("WHOPAYS_SCALE") {
                Some(raw) => raw
                    .trim()
                    .parse::<u32>()
                    .context("invalid WHOPAYS_SCALE")?,
                None => DEFAULT_SCALE,
            },
        };

        let log_format = if overrides.json_logs {
            LogFormat::Json
        } else {
            match lookup("WHOPAYS_LOG_FORMAT").as_deref().map(str::trim) {
                Some("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            }
        };

        Ok(Self {
            data_file,
            settlement: SettlementOptions {
                money: MoneyContext::try_new(scale, rounding_mode)?,
                tie_break,
            },
            log_format,
        })
    }
}

/// Initialize logging and tracing
///
/// Logs go to stderr so command output on stdout stays machine-readable.
pub fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
