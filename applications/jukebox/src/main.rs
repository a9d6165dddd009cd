/// Jukebox - pay-per-play playback from the command line
use clap::{Parser, Subcommand};
use jukebox::{ConsoleDisplay, JukeboxConfig, Session};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "jukebox")]
#[command(about = "Pay-per-play jukebox with queue and history", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session reading commands from stdin
    Run {
        /// Configuration file path
        #[arg(short, long, env = "JUKEBOX_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Play through a scripted session on the demo library
    Demo,
    /// Print the effective configuration as TOML
    Config {
        /// Configuration file path
        #[arg(short, long, env = "JUKEBOX_CONFIG")]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing (stderr, stdout belongs to the display)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jukebox=info,jukebox_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config } => {
            let config = JukeboxConfig::load(config.as_deref())?;
            run(&config)?;
        }
        Commands::Demo => {
            demo()?;
        }
        Commands::Config { config } => {
            let config = JukeboxConfig::load(config.as_deref())?;
            config.validate()?;
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

fn run(config: &JukeboxConfig) -> anyhow::Result<()> {
    let mut session = Session::new(config)?;
    session.attach(Arc::new(ConsoleDisplay::stdout()));

    tracing::info!(user = %config.user.id, "Jukebox ready, type 'help' for commands");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    session.run(stdin.lock(), &mut stdout)?;

    tracing::info!("Session ended");
    Ok(())
}

fn demo() -> anyhow::Result<()> {
    let mut session = Session::new(&JukeboxConfig::default())?;
    session.attach(Arc::new(ConsoleDisplay::stdout()));
    session.set_echo(true);

    let mut stdout = io::stdout();
    session.run(jukebox::session::DEMO_SCRIPT.as_bytes(), &mut stdout)?;
    Ok(())
}
