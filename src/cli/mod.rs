pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::error::Result;

#[derive(Parser)]
#[command(name = "dockhand")]
#[command(version)]
#[command(about = "Deploy files to a Docker host and check container logs over SSH")]
#[command(long_about = "Deploy files to a Docker host and check container logs over SSH.\n\n\
Server settings come from SERVER_HOST, SERVER_USER, SERVER_PASSWORD, SERVER_PORT\n\
and CONTAINER_NAME, read from the environment or a .env file in the current directory.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload a file to /tmp on the server, optionally copying it into the container
    #[command(after_help = "Example: dockhand deploy app.py /app/app.py")]
    Deploy {
        /// Local file to upload
        local_file: PathBuf,

        /// Destination inside the container; triggers docker cp and a restart
        container_path: Option<String>,
    },

    /// Show the last lines of a container's logs and flag error keywords
    #[command(visible_alias = "check_logs")]
    CheckLogs {
        /// Container to read (default: CONTAINER_NAME)
        container_name: Option<String>,

        /// Number of lines to fetch
        #[arg(default_value_t = commands::check_logs::DEFAULT_LINES)]
        line_count: usize,
    },

    /// Show the resolved configuration
    Config,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = AppConfig::load()?;
        tracing::debug!(?config, "configuration loaded");

        match self.command {
            Commands::Deploy {
                local_file,
                container_path,
            } => commands::deploy::execute(&config, local_file, container_path).await,
            Commands::CheckLogs {
                container_name,
                line_count,
            } => commands::check_logs::execute(&config, container_name, line_count).await,
            Commands::Config => commands::config::show(&config),
        }
    }
}
