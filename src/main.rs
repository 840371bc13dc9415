use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gramfeed::app::AppContext;
use gramfeed::cli::{commands, Cli, Commands};
use gramfeed::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so feeds can be piped from stdout
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Feed {
            profile_id,
            format,
            output,
        } => {
            let ctx = AppContext::new(config);
            commands::feed(&ctx, &profile_id, format, output.as_deref()).await?;
        }
        Commands::Config { path } => {
            commands::show_config(&config, cli.config.as_deref(), path)?;
        }
    }

    Ok(())
}
