use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = env!("CARGO_PKG_NAME"))]
#[command(about = env!("CARGO_PKG_DESCRIPTION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server (default)
    Serve,
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Create a moderator account, or promote an existing user to moderator
    CreateModerator {
        /// Email of the account
        #[arg(long)]
        email: String,
        /// Password for a newly created account
        #[arg(long)]
        password: String,
    },
    /// Generate a JWT secret for configuration
    GenerateJwtSecret,
    /// Show version information
    Version,
}

#[derive(Debug, Clone, Subcommand)]
pub enum MigrateAction {
    /// Apply pending migrations
    Up {
        /// Number of migrations to apply (default: all)
        #[arg(short, long)]
        steps: Option<u32>,
    },
    /// Roll back applied migrations
    Down {
        /// Number of migrations to roll back (default: 1)
        #[arg(short, long, default_value = "1")]
        steps: u32,
    },
    /// Show applied and pending migrations
    Status,
    /// Drop every table and apply all migrations from scratch
    Fresh,
}
