use std::{env, process, str::FromStr as _};

use clap::Parser as _;
use config_rs::Config as ConfigRs;
use tracing::{debug, error, trace};

use crate::{
    app_info::AppInfo,
    cli::{Cli, Commands, MigrateAction},
    commands::{create_moderator, generate_secret, migrate, serve, version},
    config::{Config, ConfigError},
    environment::Environment,
    setup_tracing::setup_tracing_for_command,
};

const ENVIRONMENT_VARIABLE: &str = "APP_ENVIRONMENT";
const CONFIG_ENV_PREFIX: &str = "APP";
const CONFIG_ENV_SEPARATOR: &str = "__";

/// Parse the command line, load configuration and run the selected command.
///
/// Exits the process with status 1 if configuration cannot be read or the
/// command fails.
pub async fn boot(app_info: AppInfo) {
    let cli = Cli::parse();

    let Some(command) = ConfiguredCommand::from_cli(cli.command.as_ref()) else {
        match cli.command {
            Some(Commands::GenerateJwtSecret) => generate_secret::handle_generate_secret_command(),
            _ => version::print_version_info(app_info),
        }
        return;
    };

    let environment = set_environment();

    let app_config = match read_config(environment) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration for {environment}: {e}");
            process::exit(1);
        }
    };

    setup_tracing_for_command(cli.command.as_ref(), &app_config.tracing.log_level);

    debug!("Environment set to: {:?}", environment);
    trace!("Configuration loaded: {:?}", app_config);

    if let Err(e) = handle_command(environment, app_config, command).await {
        error!("❌ {e}");
        process::exit(1);
    }
}

#[must_use]
pub fn set_environment() -> Environment {
    env::var(ENVIRONMENT_VARIABLE)
        .ok()
        .and_then(|s| Environment::from_str(&s).ok())
        .unwrap_or_default()
}

/// Load `config/<environment>.yaml`, then apply `APP_*` overrides
/// (`APP_DATABASE__URL` sets `database.url`).
///
/// # Errors
/// Returns the config-rs error when the file is missing or a value does not
/// deserialize, and [`ConfigError::WeakJwtSecret`] when the signing secret is
/// empty or too short.
pub fn read_config(environment: Environment) -> Result<Config, ConfigError> {
    let config_file_name = environment.config_file();

    trace!("Reading configuration from: {}", config_file_name);

    let config = ConfigRs::builder()
        .add_source(config_rs::File::with_name(&config_file_name))
        .add_source(
            config_rs::Environment::with_prefix(CONFIG_ENV_PREFIX)
                .prefix_separator("_")
                .separator(CONFIG_ENV_SEPARATOR),
        )
        .build()?
        .try_deserialize::<Config>()?;

    config.jwt.check_secret()?;

    Ok(config)
}

/// Commands that run after configuration is loaded. `version` and
/// `generate-jwt-secret` are answered before that and never get here.
#[derive(Debug)]
enum ConfiguredCommand {
    Serve,
    Migrate(MigrateAction),
    CreateModerator { email: String, password: String },
}

impl ConfiguredCommand {
    /// `None` for the commands that need no configuration.
    fn from_cli(command: Option<&Commands>) -> Option<Self> {
        match command {
            Some(Commands::Version | Commands::GenerateJwtSecret) => None,
            Some(Commands::Serve) | None => Some(Self::Serve),
            Some(Commands::Migrate { action }) => Some(Self::Migrate(action.clone())),
            Some(Commands::CreateModerator { email, password }) => Some(Self::CreateModerator {
                email: email.clone(),
                password: password.clone(),
            }),
        }
    }
}

async fn handle_command(
    environment: Environment,
    config: Config,
    command: ConfiguredCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        ConfiguredCommand::Migrate(action) => {
            migrate::handle_migrate_command(&config, action).await?;
        }
        ConfiguredCommand::CreateModerator { email, password } => {
            create_moderator::handle_create_moderator_command(&config, &email, &password).await?;
        }
        ConfiguredCommand::Serve => {
            serve::handle_serve_command(environment, config).await?;
        }
    }

    Ok(())
}
