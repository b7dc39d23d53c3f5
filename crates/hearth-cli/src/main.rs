mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hearth_images::{HttpBundleFetcher, ImagesConfig, ManifestRegistry};

#[derive(Parser, Debug)]
#[command(name = "hearth", version, about = "Manage game-server image definitions")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List available images
    Images {
        /// Redownload the default images before listing
        #[arg(long)]
        refresh: bool,
        #[arg(long)]
        json: bool,
    },
    /// Show one image definition
    Image { uid: String },
    /// Redownload the default images and validate everything on disk
    Refresh,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = ImagesConfig::from_env()?;
    let fetcher = HttpBundleFetcher::new()?;
    let mut registry = ManifestRegistry::new(config)?;

    match args.command {
        Command::Images { refresh, json } => {
            if refresh {
                registry.refresh(&fetcher)?;
            } else {
                registry.load(&fetcher)?;
            }
            let summaries = registry.summaries()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else {
                println!("{}", output::image_table(&summaries));
            }
        }
        Command::Image { uid } => {
            registry.load(&fetcher)?;
            let Some(manifest) = registry.get(&uid)? else {
                anyhow::bail!("image {} does not exist", uid);
            };
            println!("{}", serde_json::to_string_pretty(manifest.as_ref())?);
        }
        Command::Refresh => {
            let count = registry.refresh(&fetcher)?;
            println!("Downloaded default images, {} images available", count);
        }
    }

    Ok(())
}
