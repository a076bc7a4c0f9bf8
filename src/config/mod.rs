//! Configuration module.

pub mod keybindings;
pub mod loader;

pub use keybindings::KeyBindings;
pub use loader::{CliOverrides, ConfigError, ResolvedConfig};

/// Resolve the full configuration chain.
///
/// Defaults → config file → environment → CLI flags.
///
/// # Errors
///
/// Returns an error if a config file exists but is invalid, or an environment
/// override cannot be parsed.
pub fn resolve(
    config_path: Option<std::path::PathBuf>,
    cli: CliOverrides,
) -> Result<ResolvedConfig, ConfigError> {
    let file = loader::load_config_with_precedence(config_path)?;
    let config = loader::apply_env_overrides(loader::merge_config(file))?;
    Ok(loader::apply_cli_overrides(config, cli))
}
