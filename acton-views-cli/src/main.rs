//! acton-views CLI tool

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use acton_views_cli_lib::commands::resolve::parse_route_value;
use acton_views_cli_lib::{ConfigCommand, LocationsCommand, ResolveCommand};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "acton-views")]
#[command(version)]
#[command(about = "Inspect how view names resolve to templates", long_about = None)]
struct Cli {
    /// Emit engine logs (filtered by `RUST_LOG`)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a view name and print where it was found
    Resolve {
        /// View name (`Index`) or path (`/Views/Home/Index.cshtml`)
        name: String,
        /// Controller route value
        #[arg(short, long)]
        controller: Option<String>,
        /// Area route value
        #[arg(short, long)]
        area: Option<String>,
        /// Extra route values (`key=value`), e.g. `culture=fr`
        #[arg(short = 'r', long = "route", value_parser = parse_route_value)]
        route: Vec<(String, String)>,
        /// Resolve as a partial view
        #[arg(short, long)]
        partial: bool,
        /// View root directory (overrides configuration)
        #[arg(long)]
        root: Option<PathBuf>,
        /// Configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List the location formats that will be searched
    Locations {
        /// Show the area-aware list
        #[arg(short, long)]
        area: bool,
        /// Configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the default configuration as TOML
    Config,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.verbose {
        acton_views::observability::init()?;
    }

    match cli.command {
        Commands::Resolve {
            name,
            controller,
            area,
            route,
            partial,
            root,
            config,
        } => {
            let cmd = ResolveCommand::new(name)
                .controller(controller)
                .area(area)
                .route_values(route)
                .partial(partial)
                .root(root)
                .config(config);
            if !cmd.execute().await? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Locations { area, config } => {
            LocationsCommand::new(area, config).execute()?;
        }
        Commands::Config => {
            ConfigCommand::execute()?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
