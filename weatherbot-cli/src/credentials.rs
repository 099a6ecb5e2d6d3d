//! Resolving the OpenWeatherMap API key at startup.

use anyhow::{Context, Result, bail};
use inquire::{Password, PasswordDisplayMode};
use weatherbot_core::Config;

const KEY_HINT: &str = "Please get your free API key from: https://openweathermap.org/api";

/// Where the API key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// `--api-key` or `OPENWEATHER_API_KEY`.
    Explicit,
    ConfigFile,
    Prompt,
}

/// Pick the API key: explicit value first, then the stored config, then
/// `prompt`. A blank key from every source is an error.
pub fn resolve_api_key(
    explicit: Option<&str>,
    config: &Config,
    prompt: impl FnOnce() -> Result<String>,
) -> Result<(String, KeySource)> {
    if let Some(key) = explicit.map(str::trim).filter(|k| !k.is_empty()) {
        return Ok((key.to_string(), KeySource::Explicit));
    }

    if let Some(key) = config.api_key() {
        return Ok((key.to_string(), KeySource::ConfigFile));
    }

    let key = prompt()?;
    let key = key.trim();
    if key.is_empty() {
        bail!("API key is required to use the weather service.\n{KEY_HINT}");
    }

    Ok((key.to_string(), KeySource::Prompt))
}

/// Ask for the key on the terminal without echoing it.
pub fn prompt_api_key() -> Result<String> {
    Password::new("Please enter your OpenWeatherMap API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .with_help_message(KEY_HINT)
        .prompt()
        .context("Failed to read API key")
}

/// Resolve the key for a session, saving a freshly prompted key so the
/// next run does not ask again.
pub fn api_key_for_session(explicit: Option<&str>, config: &mut Config) -> Result<String> {
    let (key, source) = resolve_api_key(explicit, config, prompt_api_key)?;
    tracing::debug!(?source, "resolved API key");

    if source == KeySource::Prompt {
        config.set_api_key(key.clone());
        // Not fatal: the session can still run with the key in memory.
        if let Err(err) = config.save() {
            tracing::warn!(error = %err, "could not save API key");
        }
    }

    Ok(key)
}
