// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use clap::Parser;
use cli::{Cli, Commands};
use folio_core::config::FolioConfig;
use services::Services;

mod cli;
mod commands;
mod logging;
mod services;

fn main() -> Result<()> {
    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init()?;

    let args = Cli::parse();
    let open = || -> Result<Services> {
        let mut config = FolioConfig::from_env()?;
        if let Some(data_dir) = &args.data_dir {
            config.data_dir = data_dir.clone();
        }
        Ok(Services::open(&config))
    };

    match args.command {
        Commands::Version => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        }
        Commands::Sanitize { file } => commands::sanitize_input(file.as_deref())?,
        Commands::Login { username, password } => {
            commands::login(&open()?, &username, &password)?
        }
        Commands::Logout => commands::logout(&open()?)?,
        Commands::Status => commands::status(&open()?)?,
        Commands::Posts(posts) => commands::posts(&open()?, posts)?,
    }

    Ok(())
}
