use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::SimError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub market: MarketConfig,
    pub chart: ChartConfig,
    pub ui: UiConfig,
    pub report: ReportConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    pub n_max: i64,
    pub n_min: i64,
    /// Seed for a reproducible walk. Absent means OS entropy.
    pub seed: Option<u64>,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            n_max: 10,
            n_min: 0,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub n_ticks: usize,
    pub image_height: usize,
    pub image_width: usize,
    pub show_fair_value_line: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            n_ticks: 100,
            image_height: 250,
            image_width: 1000,
            show_fair_value_line: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Seconds between committed chart ticks.
    pub t_update: f64,
    /// Input poll timeout; this also paces the loop.
    pub poll_timeout_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            t_update: 0.02,
            poll_timeout_ms: 1,
        }
    }
}

impl UiConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(self.t_update)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub trades_out: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            trades_out: PathBuf::from("trades.csv"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Command line values applied on top of the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub n_max: Option<i64>,
    pub n_min: Option<i64>,
    pub seed: Option<u64>,
    pub n_ticks: Option<usize>,
    pub image_height: Option<usize>,
    pub image_width: Option<usize>,
    pub t_update: Option<f64>,
    pub hide_fair_line: bool,
    pub trades_out: Option<PathBuf>,
}

impl Config {
    /// Read the TOML config at `path`. A missing file falls back to defaults;
    /// an unreadable or malformed file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(v) = overrides.n_max {
            self.market.n_max = v;
        }
        if let Some(v) = overrides.n_min {
            self.market.n_min = v;
        }
        if let Some(v) = overrides.seed {
            self.market.seed = Some(v);
        }
        if let Some(v) = overrides.n_ticks {
            self.chart.n_ticks = v;
        }
        if let Some(v) = overrides.image_height {
            self.chart.image_height = v;
        }
        if let Some(v) = overrides.image_width {
            self.chart.image_width = v;
        }
        if let Some(v) = overrides.t_update {
            self.ui.t_update = v;
        }
        if overrides.hide_fair_line {
            self.chart.show_fair_value_line = false;
        }
        if let Some(v) = &overrides.trades_out {
            self.report.trades_out = v.clone();
        }
    }

    /// Check cross-field constraints before the chart and session are built.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.market.n_max <= self.market.n_min {
            return Err(SimError::Config(format!(
                "market.n_max ({}) must be greater than market.n_min ({})",
                self.market.n_max, self.market.n_min
            )));
        }
        if self.chart.n_ticks == 0 {
            return Err(SimError::Config("chart.n_ticks must be > 0".to_string()));
        }
        if self.chart.image_height == 0 || self.chart.image_width == 0 {
            return Err(SimError::Config(format!(
                "chart frame must be non-empty, got {}x{}",
                self.chart.image_width, self.chart.image_height
            )));
        }
        if self.chart.image_width % self.chart.n_ticks != 0 {
            return Err(SimError::Config(format!(
                "chart.image_width ({}) must be a multiple of chart.n_ticks ({})",
                self.chart.image_width, self.chart.n_ticks
            )));
        }
        if !self.ui.t_update.is_finite() || self.ui.t_update < 0.0 {
            return Err(SimError::Config(format!(
                "ui.t_update ({}) must be a non-negative number of seconds",
                self.ui.t_update
            )));
        }
        if Duration::try_from_secs_f64(self.ui.t_update).is_err() {
            return Err(SimError::Config(format!(
                "ui.t_update ({:e}) is too large for a tick interval",
                self.ui.t_update
            )));
        }
        Ok(())
    }
}
