//! Subcommand implementations.

pub mod config;
pub mod inspect;
pub mod run;

use std::path::Path;

use paystub_core::PaystubConfig;

/// Load the configuration named on the command line, else the user's
/// default file, else built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<PaystubConfig> {
    if let Some(path) = config_path {
        return PaystubConfig::from_file(Path::new(path))
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path, e));
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        tracing::debug!("Using config {}", default_path.display());
        return Ok(PaystubConfig::from_file(&default_path)?);
    }

    Ok(PaystubConfig::default())
}
