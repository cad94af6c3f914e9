use anyhow::Result;
use std::sync::Arc;

use super::local::LocalGenerator;
use super::remote::RemoteGenerator;
use super::traits::Generator;
use crate::app::Config;
use crate::connectivity::Mode;
use crate::utils::DaynaError;

/// Builds the one generator a session will use
pub struct GeneratorFactory;

impl GeneratorFactory {
    /// Select the backend for `mode`, validating the configuration it needs.
    ///
    /// Missing credentials or model files come back as
    /// [`DaynaError::Config`] so the caller can stop before the turn loop.
    pub fn create(mode: Mode, config: &Config) -> Result<Arc<dyn Generator>> {
        Self::validate(mode, config)?;

        match mode {
            Mode::Online => {
                let api_key = config.remote.api_key().ok_or_else(|| missing_key(config))?;
                Ok(Arc::new(RemoteGenerator::new(&config.remote, api_key)?))
            }
            Mode::Offline => Ok(Arc::new(LocalGenerator::new(&config.local)?)),
        }
    }

    /// Check the configuration needed by `mode` without building anything
    pub fn validate(mode: Mode, config: &Config) -> Result<(), DaynaError> {
        match mode {
            Mode::Online => {
                if config.remote.api_key().is_none() {
                    return Err(missing_key(config));
                }
            }
            Mode::Offline => {
                let path = &config.local.model_path;
                if !path.is_file() {
                    return Err(DaynaError::Config(format!(
                        "Offline model not found at {}.\n\
                         Download the model first (e.g. ./download_models.sh) \
                         or set [local] model_path in your config.",
                        path.display()
                    )));
                }
            }
        }
        Ok(())
    }
}

fn missing_key(config: &Config) -> DaynaError {
    DaynaError::Config(format!(
        "{} is not set.\n\
         Get an API key from https://aistudio.google.com/app/apikey and export it:\n  \
         export {}=your_key_here\n\
         Or run with --mode offline.",
        config.remote.api_key_env, config.remote.api_key_env
    ))
}
