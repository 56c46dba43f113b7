use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;
use phm_core::alert::AlertThresholds;
use phm_core::error::CoreError;
use phm_core::status::StatusThresholds;

/// How the periodic ticker obtains the next snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickMode {
    /// Advance the current fleet with simulated drift.
    Simulate,
    /// Re-read the snapshot resource.
    Reload,
}

impl TickMode {
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simulate" => Ok(Self::Simulate),
            "reload" => Ok(Self::Reload),
            other => Err(CoreError::Validation(format!(
                "PHM_TICK_MODE must be `simulate` or `reload`, got '{other}'"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simulate => "simulate",
            Self::Reload => "reload",
        }
    }
}

/// Monitor configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Snapshot resource in the `{ "machines": [...] }` shape.
    pub snapshot_path: PathBuf,
    /// Period of the background ticker (default: `30`).
    pub tick_interval_secs: u64,
    pub tick_mode: TickMode,
    /// Fixed simulator seed; `None` seeds from the OS.
    pub sim_seed: Option<u64>,
    pub status_thresholds: StatusThresholds,
    pub alert_thresholds: AlertThresholds,
}

impl MonitorConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                    | Default                 |
    /// |----------------------------|-------------------------|
    /// | `HOST`                     | `0.0.0.0`               |
    /// | `PORT`                     | `3000`                  |
    /// | `CORS_ORIGINS`             | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                    |
    /// | `PHM_SNAPSHOT_PATH`        | `data/machines.json`    |
    /// | `PHM_TICK_INTERVAL_SECS`   | `30`                    |
    /// | `PHM_TICK_MODE`            | `simulate`              |
    /// | `PHM_SIM_SEED`             | unset                   |
    /// | `PHM_STATUS_DANGER_BELOW`  | `0.6`                   |
    /// | `PHM_STATUS_WARNING_BELOW` | `0.8`                   |
    /// | `PHM_RUL_WARNING_HOURS`    | `200`                   |
    /// | `PHM_RUL_CRITICAL_HOURS`   | `100`                   |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = parse_or(&lookup, "PORT", 3000)?;

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        for origin in &cors_origins {
            HeaderValue::from_str(origin).map_err(|e| {
                CoreError::Validation(format!("Invalid CORS origin '{origin}': {e}"))
            })?;
        }

        let request_timeout_secs: u64 = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?;

        let snapshot_path = lookup("PHM_SNAPSHOT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data/machines.json"));

        let tick_interval_secs: u64 = parse_or(&lookup, "PHM_TICK_INTERVAL_SECS", 30)?;
        if tick_interval_secs == 0 {
            return Err(CoreError::Validation(
                "PHM_TICK_INTERVAL_SECS must be greater than zero".to_string(),
            ));
        }

        let tick_mode = match lookup("PHM_TICK_MODE") {
            Some(raw) => TickMode::from_str_value(&raw)?,
            None => TickMode::Simulate,
        };

        let sim_seed = match lookup("PHM_SIM_SEED") {
            Some(raw) => Some(parse_value::<u64>("PHM_SIM_SEED", &raw)?),
            None => None,
        };

        let defaults = StatusThresholds::default();
        let status_thresholds = StatusThresholds::new(
            parse_or(&lookup, "PHM_STATUS_DANGER_BELOW", defaults.danger_below)?,
            parse_or(&lookup, "PHM_STATUS_WARNING_BELOW", defaults.warning_below)?,
        )?;

        let defaults = AlertThresholds::default();
        let alert_thresholds = AlertThresholds::new(
            parse_or(&lookup, "PHM_RUL_WARNING_HOURS", defaults.lifespan_warning_hours)?,
            parse_or(&lookup, "PHM_RUL_CRITICAL_HOURS", defaults.lifespan_critical_hours)?,
        )?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            snapshot_path,
            tick_interval_secs,
            tick_mode,
            sim_seed,
            status_thresholds,
            alert_thresholds,
        })
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, CoreError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, CoreError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| CoreError::Validation(format!("{key} is invalid ('{raw}'): {e}")))
}
