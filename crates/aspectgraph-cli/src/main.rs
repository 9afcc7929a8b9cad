//! Aspectgraph CLI
//!
//! - `load`: parse aspect model files, instantiate them and print a summary
//!   (or the full graph as JSON) together with any notifications
//! - `units`: browse the predefined unit catalog

use anyhow::{anyhow, Context, Result};
use aspectgraph_instantiator::{InstantiatorConfig, LoadOutcome, LoadSession, Severity};
use aspectgraph_model::{Catalog, ElementKind};
use aspectgraph_rdf::Workspace;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "aspectgraph")]
#[command(author, version, about = "Aspectgraph: aspect model instantiation")]
struct Cli {
    /// Log engine progress (repeat for more detail)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load model files or directories and instantiate every document.
    Load {
        /// Input files (.ttl, .nt, .nq, .trig, .rdf/.owl) or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Instantiator configuration (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print the full outcome as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// List predefined units.
    Units {
        /// Only units measuring this quantity kind (e.g. `length`)
        #[arg(long)]
        quantity_kind: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Load {
            inputs,
            config,
            json,
        } => cmd_load(&inputs, config.as_deref(), json),
        Commands::Units { quantity_kind } => cmd_units(quantity_kind.as_deref()),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_workspace(inputs: &[PathBuf]) -> Result<Workspace> {
    let mut workspace = Workspace::new();
    for input in inputs {
        if input.is_dir() {
            workspace
                .load_dir(input)
                .with_context(|| format!("loading {}", input.display()))?;
        } else {
            workspace
                .load_file(input)
                .with_context(|| format!("loading {}", input.display()))?;
        }
    }
    if workspace.is_empty() {
        return Err(anyhow!("no model files found"));
    }
    Ok(workspace)
}

fn cmd_load(inputs: &[PathBuf], config: Option<&Path>, json: bool) -> Result<()> {
    let config = match config {
        Some(path) => InstantiatorConfig::from_json_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => InstantiatorConfig::default(),
    };
    let workspace = load_workspace(inputs)?;

    let mut session = LoadSession::new(&workspace, config);
    session.instantiate_all();
    let outcome = session.finish();

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_summary(&workspace, &outcome);
    }
    Ok(())
}

fn print_summary(workspace: &Workspace, outcome: &LoadOutcome) {
    println!(
        "{} {} document(s)",
        "Loaded".green().bold(),
        workspace.len()
    );
    for document in workspace.documents() {
        println!(
            "  {} {} ({} statements)",
            document.id.to_string().dimmed(),
            document.location,
            document.store.len()
        );
    }

    let mut by_kind: BTreeMap<&str, usize> = BTreeMap::new();
    let mut predefined = 0;
    for (_, element) in outcome.graph.iter() {
        if element.base.is_predefined {
            predefined += 1;
        }
        *by_kind.entry(element.kind.label()).or_default() += 1;
    }
    println!(
        "{} {} element(s), {} predefined",
        "Instantiated".green().bold(),
        outcome.graph.len(),
        predefined
    );
    for (kind, count) in &by_kind {
        println!("  {:<18} {}", kind.cyan(), count);
    }

    for (_, element) in outcome.graph.iter() {
        if let ElementKind::Aspect(aspect) = &element.kind {
            println!(
                "  Aspect {}: {} properties, {} operations, {} events",
                element.name().yellow(),
                aspect.properties.len(),
                aspect.operations.len(),
                aspect.events.len()
            );
        }
    }

    let stats = &outcome.stats;
    println!(
        "  cross-document lookups: {}, deferred: {}, resumed: {}",
        stats.cross_document_lookups, stats.deferred, stats.resumed
    );

    if outcome.notifications.is_empty() {
        println!("{}", "No problems found.".green());
        return;
    }
    println!(
        "{} {} notification(s)",
        "Found".yellow().bold(),
        outcome.notifications.len()
    );
    for notification in &outcome.notifications {
        let tag = match notification.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
        };
        println!("  {tag}: {notification}");
    }
}

fn cmd_units(quantity_kind: Option<&str>) -> Result<()> {
    let catalog = Catalog::get();
    let units: Vec<_> = match quantity_kind {
        Some(kind) => {
            if catalog.quantity_kind(kind).is_none() {
                return Err(anyhow!("unknown quantity kind: {kind}"));
            }
            catalog.units_with_quantity_kind(kind).collect()
        }
        None => catalog.units().iter().collect(),
    };

    for unit in units {
        match (unit.reference_unit, unit.conversion_factor) {
            (Some(reference), Some(factor)) => println!(
                "{:<24} {:<8} = {} {}",
                unit.name.cyan(),
                unit.symbol,
                factor,
                reference
            ),
            _ => println!("{:<24} {}", unit.name.cyan(), unit.symbol),
        }
    }
    Ok(())
}
