use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use halodream::config::SiteConfig;
use halodream::page;
use halodream::simulate::{self, SimulationOptions};
use halodream_viz::Preset;
use tracing_subscriber::EnvFilter;

mod server;

/// Generate, serve and simulate the halodream landing page effects.
#[derive(Parser)]
#[command(name = "halodream")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Site config (.yaml, .yml or .json) - used when no subcommand specified
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output directory for the generated page
    #[arg(short, long, global = true, default_value = "output")]
    output: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the page (default behavior)
    Generate,
    /// Start development server with live reload
    Serve {
        /// Port to run the server on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
    /// Run the particle field headlessly and print a JSON report
    Simulate {
        /// Starting configuration: sphere or cube
        #[arg(long, default_value = "sphere")]
        preset: Preset,

        /// Number of steps to run
        #[arg(long, default_value = "240")]
        frames: usize,

        /// RNG seed for the particle layout
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Particle count (overrides the preset or configured count)
        #[arg(long)]
        count: Option<usize>,

        /// Pointer travel per step in world units
        #[arg(long, default_value = "0.5")]
        sweep: f32,

        /// Pretty-print the report
        #[arg(long)]
        pretty: bool,
    },
}

fn generate(config: Option<&Path>, output: &Path) -> anyhow::Result<()> {
    let site = SiteConfig::load_or_default(config)?;
    let generated = page::write_site(&site, output)?;
    println!(
        "Generated '{}' in {}",
        site.title,
        generated.index.parent().unwrap_or(output).display()
    );
    Ok(())
}

fn simulate(config: Option<&Path>, options: SimulationOptions, pretty: bool) -> anyhow::Result<()> {
    let options = match config {
        Some(path) => SimulationOptions {
            config: Some(SiteConfig::load(path)?.effects.particle_field()),
            ..options
        },
        None => options,
    };
    let report = simulate::run(&options);
    let json = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Some(Commands::Generate) => {
            generate(config, &cli.output)?;
        }
        Some(Commands::Serve { port }) => {
            server::serve(config, &cli.output, port).await?;
        }
        Some(Commands::Simulate {
            preset,
            frames,
            seed,
            count,
            sweep,
            pretty,
        }) => {
            let options = SimulationOptions {
                preset,
                config: None,
                frames,
                seed,
                count,
                sweep,
            };
            simulate(config, options, pretty)?;
        }
        None => {
            // Default behavior: generate if a config was provided
            if config.is_some() {
                generate(config, &cli.output)?;
            } else {
                println!("halodream: no config specified. Use --help for usage.");
            }
        }
    }

    Ok(())
}
