use time::format_description::parse;
use tracing_subscriber::{fmt::time::OffsetTime, EnvFilter};

use crate::cli::Commands;

/// Default filter when `RUST_LOG` is unset: quiet for one-shot CLI commands,
/// the configured level for the server.
fn default_level<'a>(command: Option<&Commands>, server_log_level: &'a str) -> &'a str {
    match command {
        Some(Commands::Migrate { .. } | Commands::CreateModerator { .. }) => "warn",
        Some(Commands::Version | Commands::GenerateJwtSecret) => "error",
        Some(Commands::Serve) | None => server_log_level,
    }
}

pub fn setup_tracing_for_command(command: Option<&Commands>, server_log_level: &str) {
    let mut env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(command, server_log_level)));

    for directive in ["sqlx::query=warn", "sea_orm_migration::migrator=warn"] {
        if let Ok(directive) = directive.parse() {
            env_filter = env_filter.add_directive(directive);
        }
    }

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_level(true)
        .with_ansi(true);

    let offset = time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC);

    match parse("[hour]:[minute]:[second].[subsecond digits:2]") {
        Ok(format) => builder
            .with_timer(OffsetTime::new(offset, format))
            .compact()
            .init(),
        Err(_) => builder.compact().init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::MigrateAction;

    #[test]
    fn server_uses_configured_level() {
        assert_eq!(default_level(None, "debug"), "debug");
        assert_eq!(default_level(Some(&Commands::Serve), "info"), "info");
    }

    #[test]
    fn cli_commands_are_quiet() {
        let migrate = Commands::Migrate {
            action: MigrateAction::Status,
        };

        assert_eq!(default_level(Some(&migrate), "debug"), "warn");
        assert_eq!(default_level(Some(&Commands::Version), "debug"), "error");
    }
}
