mod file_config;

pub use file_config::FileConfig;

use crate::request::InputPolicy;
use anyhow::{anyhow, bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

pub const DEFAULT_SCALER_FILE_NAME: &str = "scaler.json";

/// What to do when the scaler artifact cannot be loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ScalerFallback {
    /// Refuse to start.
    #[default]
    Fail,
    /// Substitute an untrained pass-through scaler. Predictions will be
    /// silently wrong for any model fitted on scaled data.
    Identity,
}

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub model_path: Option<PathBuf>,
    pub scaler_path: Option<PathBuf>,
    pub scaler_fallback: ScalerFallback,
    pub reject_non_positive: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub model_path: PathBuf,
    pub scaler_path: PathBuf,
    pub scaler_fallback: ScalerFallback,
    pub input_policy: InputPolicy,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let model_path = file
            .model_path
            .map(PathBuf::from)
            .or_else(|| cli.model_path.clone())
            .ok_or_else(|| {
                anyhow!("model_path must be specified via --model or in config file")
            })?;

        if !model_path.exists() {
            bail!("Model file does not exist: {:?}", model_path);
        }
        if !model_path.is_file() {
            bail!("model_path is not a file: {:?}", model_path);
        }

        // Missing scaler files are handled by the fallback policy at load time.
        let scaler_path = file
            .scaler_path
            .map(PathBuf::from)
            .or_else(|| cli.scaler_path.clone())
            .unwrap_or_else(|| {
                model_path
                    .parent()
                    .map(|p| p.join(DEFAULT_SCALER_FILE_NAME))
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_SCALER_FILE_NAME))
            });

        let scaler_fallback = match file.scaler_fallback {
            Some(s) => parse_scaler_fallback(&s)
                .ok_or_else(|| anyhow!("Invalid scaler_fallback in config file: {:?}", s))?,
            None => cli.scaler_fallback,
        };

        let reject_non_positive = file
            .reject_non_positive
            .unwrap_or(cli.reject_non_positive);

        Ok(Self {
            model_path,
            scaler_path,
            scaler_fallback,
            input_policy: InputPolicy {
                reject_non_positive,
            },
        })
    }
}

/// Parses a fallback policy string using clap's ValueEnum trait.
fn parse_scaler_fallback(s: &str) -> Option<ScalerFallback> {
    ScalerFallback::from_str(s, true).ok()
}
