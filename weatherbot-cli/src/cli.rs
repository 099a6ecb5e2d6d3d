use std::io;

use anyhow::bail;
use clap::{ArgAction, Parser, Subcommand};
use weatherbot_core::{Config, provider_from_config};

use crate::{console::Console, credentials, dispatcher::Dispatcher, logging};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherbot", version, about = "Interactive weather bot")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// OpenWeatherMap API key; takes precedence over the stored one.
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Prompt for an OpenWeatherMap API key and store it.
    Configure,

    /// Print the path of the config file.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        logging::init(self.verbose);

        match self.command {
            Some(Command::Configure) => {
                let mut config = Config::load()?;
                let key = credentials::prompt_api_key()?;
                if key.trim().is_empty() {
                    bail!("API key must not be empty.");
                }

                config.set_api_key(key);
                config.save()?;
                println!("API key saved to {}", Config::config_file_path()?.display());
            }
            Some(Command::ConfigPath) => {
                println!("{}", Config::config_file_path()?.display());
            }
            None => {
                println!("Initializing Weather Bot...");

                let mut config = Config::load()?;
                let api_key = credentials::api_key_for_session(self.api_key.as_deref(), &mut config)?;
                let provider = provider_from_config(&api_key, &config)?;
                tracing::info!(endpoint = config.endpoint(), "starting session");

                let mut bot = Dispatcher::new(provider, Console::stdout(self.no_color));
                bot.run(io::stdin().lock()).await?;
            }
        }

        Ok(())
    }
}
