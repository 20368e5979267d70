//! Route table inspection CLI.
//!
//! ```text
//! route-table [--config routes.toml] check
//! route-table routes  --roles admin [--json]
//! route-table menu    --roles editor [--json]
//! route-table resolve /unknown/path --roles editor
//! route-table --config routes.toml watch --roles admin
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;

use route_table::config::watcher::{apply_update, ConfigWatcher};
use route_table::config::{load_config, RoutesConfig};
use route_table::observability::logging;
use route_table::routing::menu::{build_menu, MenuItem};
use route_table::routing::{
    NavigationOutcome, PermissionFilter, RouteNode, RouterEngine, Roles, StaticViewLoader,
};

#[derive(Parser)]
#[command(name = "route-table")]
#[command(about = "Inspect and validate the admin console route table", long_about = None)]
struct Cli {
    /// TOML file overriding the built-in tables and settings.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration
    Check,
    /// List the effective route records for a role set
    Routes {
        #[arg(short, long, value_delimiter = ',')]
        roles: Option<Vec<String>>,
        #[arg(long)]
        json: bool,
    },
    /// Print the sidebar menu for a role set
    Menu {
        #[arg(short, long, value_delimiter = ',')]
        roles: Option<Vec<String>>,
        #[arg(long)]
        json: bool,
    },
    /// Resolve a location as a navigation would
    Resolve {
        location: String,
        #[arg(short, long, value_delimiter = ',')]
        roles: Option<Vec<String>>,
    },
    /// Reload the config file on change and print the menu
    Watch {
        #[arg(short, long, value_delimiter = ',')]
        roles: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RoutesConfig::default(),
    };
    logging::init(&config.observability);

    match cli.command {
        Commands::Check => {
            tracing::info!(
                constant = config.constant_routes.len(),
                async_routes = config.async_routes.len(),
                "Configuration valid"
            );
            println!("ok");
        }
        Commands::Routes { roles, json } => {
            let engine = engine_for(&config, roles)?;
            let table = engine.table();
            if json {
                println!("{}", serde_json::to_string_pretty(table.records())?);
            } else {
                for record in table.records() {
                    let name = record.name.as_deref().unwrap_or("-");
                    let component = record
                        .component
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_else(|| "-".to_string());
                    println!("{:<40} {:<22} {}", record.path, name, component);
                }
                for diagnostic in table.diagnostics() {
                    eprintln!("warning: {}", diagnostic);
                }
            }
        }
        Commands::Menu { roles, json } => {
            let nodes = effective_nodes(&config, roles);
            let menu = build_menu(&nodes);
            if json {
                println!("{}", serde_json::to_string_pretty(&menu)?);
            } else {
                print_menu(&menu, 0);
            }
        }
        Commands::Resolve { location, roles } => {
            let engine = engine_for(&config, roles)?;
            match engine.navigate(&location).await? {
                NavigationOutcome::Committed(navigation) => {
                    print_json(&*navigation.route)?;
                }
                NavigationOutcome::External(url) => println!("external: {}", url),
                NavigationOutcome::Superseded { location } => {
                    println!("superseded: {}", location)
                }
            }
        }
        Commands::Watch { roles } => {
            let path = cli.config.ok_or("watch requires --config")?;
            watch(config, path, Roles::new(roles)).await?;
        }
    }

    Ok(())
}

fn engine_for(
    config: &RoutesConfig,
    roles: Option<Vec<String>>,
) -> Result<RouterEngine, Box<dyn std::error::Error>> {
    let engine = RouterEngine::new(config, Arc::new(StaticViewLoader))?;
    if let Some(roles) = roles {
        engine.attach(Roles::new(roles))?;
    }
    Ok(engine)
}

fn effective_nodes(config: &RoutesConfig, roles: Option<Vec<String>>) -> Vec<RouteNode> {
    let mut nodes = config.constant_routes.clone();
    if let Some(roles) = roles {
        let filter = PermissionFilter::new(&config.permission);
        nodes.extend(filter.apply(&config.async_routes, &Roles::new(roles)));
    }
    nodes
}

async fn watch(
    config: RoutesConfig,
    path: PathBuf,
    roles: Roles,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = RouterEngine::new(&config, Arc::new(StaticViewLoader))?;
    engine.attach(roles.clone())?;

    let (watcher, mut updates) = ConfigWatcher::new(&path);
    let _watcher = watcher.run()?;
    let constant = config.constant_routes;

    loop {
        tokio::select! {
            update = updates.recv() => {
                let Some(update) = update else { break };
                let nodes = effective_nodes(
                    &RoutesConfig { constant_routes: constant.clone(), ..update.clone() },
                    Some(roles.iter().map(str::to_string).collect()),
                );
                match apply_update(&engine, update) {
                    Ok(()) => print_menu(&build_menu(&nodes), 0),
                    Err(e) => tracing::error!(error = %e, "Rejected reloaded routes"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopping watcher");
                break;
            }
        }
    }
    Ok(())
}

fn print_menu(items: &[MenuItem], depth: usize) {
    for item in items {
        let title = item.title.as_deref().unwrap_or("(untitled)");
        let marker = if item.external { " ↗" } else { "" };
        println!("{}{} {}{}", "  ".repeat(depth), title, item.path, marker);
        print_menu(&item.children, depth + 1);
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
