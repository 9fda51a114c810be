//! Configuration validation.

use anyhow::Result;

use super::Config;

/// Reject configurations whose location cannot be used for solar calculations.
pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(location) = &config.location {
        location.validate()?;
    }
    Ok(())
}
