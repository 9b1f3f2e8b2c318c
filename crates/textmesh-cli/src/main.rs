//! textmesh CLI - Run the label service or generate labels offline

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{generate, inspect, list, serve};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "textmesh")]
#[command(about = "Turn text into animated, extruded 3D labels (GLB)", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve {
        /// Config file (defaults to .textmesh/config.toml)
        #[arg(long)]
        config: Option<String>,

        /// Port to listen on (overrides config and PORT)
        #[arg(long)]
        port: Option<u16>,

        /// Address to bind (overrides config)
        #[arg(long)]
        host: Option<String>,
    },

    /// Generate a label GLB without the server
    Generate {
        /// Text to extrude
        text: String,

        /// Extrusion depth
        #[arg(long, default_value = "0.4")]
        depth: f32,

        /// Skip the rotation animation
        #[arg(long)]
        no_animate: bool,

        /// Local typeface JSON font (fetched from the configured URL otherwise)
        #[arg(long)]
        font: Option<String>,

        /// Output file (defaults to a generated label-*.glb name)
        #[arg(short, long)]
        output: Option<String>,

        /// Config file (defaults to .textmesh/config.toml)
        #[arg(long)]
        config: Option<String>,
    },

    /// Summarise a GLB file
    Inspect {
        /// Path to the GLB
        path: String,

        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = parse_format)]
        format: String,
    },

    /// List generated files in the local artifact directory
    List {
        /// Config file (defaults to .textmesh/config.toml)
        #[arg(long)]
        config: Option<String>,
    },
}

fn parse_format(s: &str) -> Result<String, String> {
    match s {
        "text" | "json" => Ok(s.to_string()),
        _ => Err(format!("unknown format '{}'; valid values: text, json", s)),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config, port, host } => serve::run(serve::ServeArgs { config, port, host }),
        Commands::Generate {
            text,
            depth,
            no_animate,
            font,
            output,
            config,
        } => generate::run(generate::GenerateArgs {
            text,
            depth,
            animate: !no_animate,
            font,
            output,
            config,
        }),
        Commands::Inspect { path, format } => inspect::run(&path, &format),
        Commands::List { config } => list::run(config.as_deref()),
    }
}
