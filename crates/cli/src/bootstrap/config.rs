use ferrous_relay_domain::{CliOverrides, Config};

/// Loads, overrides and validates the configuration. Runs before logging is
/// up, so failures surface through `main`'s error.
pub fn load_config(
    config_path: Option<&str>,
    cli_overrides: CliOverrides,
) -> anyhow::Result<Config> {
    let config = Config::load(config_path, cli_overrides)?;
    config.validate()?;
    Ok(config)
}
