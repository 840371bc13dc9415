use std::fs;
use std::path::Path;

use anyhow::Context;

use crate::app::AppContext;
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::domain::FeedResult;
use crate::render::write_rss;

pub async fn feed(
    ctx: &AppContext,
    profile_id: &str,
    format: OutputFormat,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let feed = ctx
        .build_feed(profile_id)
        .await
        .with_context(|| format!("Failed to build feed for {}", profile_id))?;

    let rendered = render(&feed, format)?;

    match output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {} entries to {}", feed.items.len(), path.display());
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

pub fn render(feed: &FeedResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Rss => Ok(write_rss(feed)?),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(feed)?),
    }
}

pub fn show_config(config: &Config, explicit: Option<&Path>, path_only: bool) -> anyhow::Result<()> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => Config::default_config_path()?,
    };

    if path_only {
        println!("{}", path.display());
        return Ok(());
    }

    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
