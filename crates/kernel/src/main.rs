//! Portico Admin Shell
//!
//! Loads route modules and answers menu, breadcrumb and navigation
//! questions about them, or replays a scripted shell session.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use portico_kernel::navigation::Navigator;
use portico_kernel::shell::{ShellEvent, spawn_shell};
use portico_kernel::{AppState, Config};

/// Admin shell route inspector.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory of route module manifests (overrides ROUTES_DIR).
    #[arg(long, global = true)]
    routes_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the sidebar menu.
    Menu {
        /// Emit JSON instead of an indented outline.
        #[arg(long)]
        json: bool,
    },
    /// Print the flattened (pattern, title) breadcrumb index.
    Flatten,
    /// Print the breadcrumb trail for a path, as a signed-in user.
    Breadcrumb {
        path: String,
    },
    /// Resolve a navigation, following redirects.
    Navigate {
        path: String,
        /// Navigate with an active session.
        #[arg(long)]
        authenticated: bool,
    },
    /// Check that the route modules load and the gate is consistent.
    Validate,
    /// Replay a YAML list of shell events and print the view after each.
    Replay {
        script: PathBuf,
        /// Initial viewport width (overrides VIEWPORT_WIDTH).
        #[arg(long)]
        width: Option<u32>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();

    let mut config = Config::from_env().context("failed to load configuration")?;
    if let Some(dir) = cli.routes_dir {
        config.routes_dir = dir;
    }

    let state = AppState::new(&config).context("failed to initialize application state")?;

    match cli.command {
        Command::Menu { json } => {
            let menu = state.routes().menu();
            if json {
                print_json(menu)?;
            } else {
                print_menu(menu.items(), 0);
            }
        }
        Command::Flatten => {
            for route in state.routes().flattened() {
                println!("{}\t{}", route.pattern, route.title);
            }
        }
        Command::Breadcrumb { path } => {
            let navigator = Navigator::new(state.routes(), &true, &config.home_path);
            let Some(view) = navigator.navigate(&path).view else {
                bail!("no route matches {path}");
            };
            println!("{}", view.breadcrumb_titles().join(" / "));
        }
        Command::Navigate {
            path,
            authenticated,
        } => {
            let navigator = Navigator::new(state.routes(), &authenticated, &config.home_path);
            print_json(&navigator.navigate(&path))?;
        }
        Command::Validate => {
            let routes = state.routes();
            info!(
                top_level = routes.authored().len(),
                nodes = routes.authored().node_count(),
                titled = routes.flattened().len(),
                "route table valid"
            );
            println!("ok");
        }
        Command::Replay { script, width } => {
            let content = std::fs::read_to_string(&script)
                .with_context(|| format!("failed to read {}", script.display()))?;
            let events: Vec<ShellEvent> = serde_yml::from_str(&content)
                .with_context(|| format!("failed to parse {}", script.display()))?;

            let width = width.unwrap_or(config.viewport_width);
            let (events_tx, mut views, handle) = spawn_shell(state, width);

            // Feed and drain concurrently; both channels are bounded.
            let feeder = tokio::spawn(async move {
                for event in events {
                    if events_tx.send(event).await.is_err() {
                        break;
                    }
                }
            });

            while let Some(view) = views.recv().await {
                println!("{}", serde_json::to_string(&view)?);
            }
            feeder.await.context("event feeder failed")?;
            handle.await.context("shell task failed")?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_menu(items: &[portico_kernel::menu::MenuItem], depth: usize) {
    for item in items {
        let indent = "  ".repeat(depth);
        match item.path() {
            Some(path) => println!("{indent}{} ({path})", item.label),
            None => println!("{indent}{}", item.label),
        }
        print_menu(item.children(), depth + 1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
