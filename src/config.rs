//! Configuration with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/tally/tally.toml`
//! 3. Explicit config file passed on the command line
//! 4. Environment variables: `TALLY_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::AppError;

/// Settings for rendering and storing receipts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory receipts are written into
    pub output_dir: PathBuf,
    /// Shop name printed in the receipt title
    pub shop_name: String,
    /// Symbol prefixed to amounts in totals
    pub currency_symbol: String,
    /// Label used for the tax line (e.g. "GST", "VAT")
    pub tax_label: String,
    /// Receipt file extension, without the dot
    pub extension: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("bills"),
            shop_name: "TALLY SHOP".into(),
            currency_symbol: "₹".into(),
            tax_label: "GST".into(),
            extension: "txt".into(),
        }
    }
}

/// Get the XDG config directory for tally.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "tally").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("tally.toml"))
}

fn config_err(e: ConfigError) -> AppError {
    AppError::Config(e.to_string())
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// A missing global file is fine; a missing explicit file is an error.
    pub fn load(config_file: Option<&Path>) -> Result<Self, AppError> {
        let global = global_config_path().filter(|path| path.exists());
        Self::load_from(global.as_deref(), config_file)
    }

    /// Same as [`Settings::load`] but with the global file given explicitly,
    /// so callers (and tests) are independent of the user's home directory.
    pub fn load_from(global: Option<&Path>, config_file: Option<&Path>) -> Result<Self, AppError> {
        Self::load_layers(global, config_file, Environment::with_prefix("TALLY"))
    }

    fn load_layers(
        global: Option<&Path>,
        config_file: Option<&Path>,
        env: Environment,
    ) -> Result<Self, AppError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default(
                "output_dir",
                defaults.output_dir.to_string_lossy().to_string(),
            )
            .map_err(config_err)?
            .set_default("shop_name", defaults.shop_name)
            .map_err(config_err)?
            .set_default("currency_symbol", defaults.currency_symbol)
            .map_err(config_err)?
            .set_default("tax_label", defaults.tax_label)
            .map_err(config_err)?
            .set_default("extension", defaults.extension)
            .map_err(config_err)?;

        if let Some(path) = global {
            builder = builder.add_source(File::from(path).required(false));
        }
        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(env);

        let config = builder.build().map_err(config_err)?;
        let settings: Self = config.try_deserialize().map_err(config_err)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.extension.is_empty() || self.extension.contains(['.', '/', '\\']) {
            return Err(AppError::Config(format!(
                "invalid receipt extension '{}'",
                self.extension
            )));
        }
        Ok(())
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Render the effective settings as TOML.
    pub fn to_toml(&self) -> Result<String, AppError> {
        toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))
    }
}
