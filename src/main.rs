//! Opsdeck - Terminal dashboard for the piece shop.
//!
//! With no subcommand the binary opens the interactive dashboard. The
//! subcommands give headless access to the same calculators and order book
//! for scripts and automation.

use anyhow::Result;
use clap::{Parser, Subcommand};

use opsdeck::cli::{CalcArgs, OrdersArgs, PlanArgs, SetupArgs};
use opsdeck::config::Config;
use opsdeck::constants::APP_BINARY_NAME;
use opsdeck::tui;

/// Opsdeck - manufacturing operations dashboard
#[derive(Parser, Debug)]
#[command(name = APP_BINARY_NAME, author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Headless subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute the color distribution for a design and grid size
    Calc(CalcArgs),
    /// Compute sheet, box, and carton counts for a piece total
    Setup(SetupArgs),
    /// Manage production orders
    Orders(OrdersArgs),
    /// Plan production days for the open orders
    Plan(PlanArgs),
    /// Start the REST/WebSocket API server
    #[cfg(feature = "web")]
    Serve(opsdeck::cli::ServeArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(command) = cli.command {
        let result = match command {
            Commands::Calc(args) => args.execute(),
            Commands::Setup(args) => args.execute(),
            Commands::Orders(args) => args.execute(),
            Commands::Plan(args) => args.execute(),
            #[cfg(feature = "web")]
            Commands::Serve(args) => args.execute(),
        };
        if let Err(e) = result {
            eprintln!("Error: {e}");
            std::process::exit(e.code as i32);
        }
        return Ok(());
    }

    // No subcommand: open the dashboard
    let config = match Config::load() {
        Ok(config) => {
            // First run: persist the defaults so there is a file to edit.
            if !Config::exists() {
                if let Err(e) = config.save() {
                    eprintln!("Warning: Failed to write default config: {e}");
                }
            }
            config
        }
        Err(e) => {
            eprintln!("Warning: Failed to load config: {e}");
            eprintln!("Falling back to defaults.");
            Config::default()
        }
    };

    let mut app_state = tui::AppState::new(config)?;
    let mut terminal = tui::setup_terminal()?;

    // Run main TUI loop
    let result = tui::run_tui(&mut app_state, &mut terminal);

    // Restore terminal before surfacing any error
    tui::restore_terminal(terminal)?;
    result?;

    Ok(())
}
