mod session;

pub use session::*;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::application::RentalLedger;
use crate::config::{LedgerConfig, DATABASE_ENV, DEFAULT_DATABASE};
use crate::domain::{format_amount, format_money, format_stored_money, CURRENCY, INPUT_FORMAT};
use crate::io::{ExportFormat, Exporter};

/// Rental Ledger - car rental bookkeeping
#[derive(Parser)]
#[command(name = "rental-ledger")]
#[command(about = "Record cars, clients and rentals, and bill rentals by time and distance")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = DEFAULT_DATABASE, env = DATABASE_ENV)]
    pub database: PathBuf,

    /// Maximum pooled SQLite connections
    #[arg(long, default_value_t = 1)]
    pub max_connections: u32,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Defaults to the interactive session
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive prompt (add_car, add_client, rent_car, print, stop)
    Session,

    /// Initialize a new database
    Init,

    /// List all cars
    Cars,

    /// List all clients
    Clients,

    /// List all rentals with their billing details
    Rentals,

    /// Export data to CSV or JSON
    Export {
        /// What to export: rentals, cars, clients
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Format: csv, json
        #[arg(short, long, default_value = "csv")]
        format: String,
    },
}

impl Cli {
    pub fn config(&self) -> LedgerConfig {
        LedgerConfig::new(&self.database).with_max_connections(self.max_connections)
    }

    pub async fn run(self) -> Result<()> {
        let config = self.config();

        match self.command.unwrap_or(Commands::Session) {
            Commands::Session => {
                let ledger = RentalLedger::init(&config).await?;
                // The prompt loop blocks on stdin; sqlx runs SQLite on its own worker thread.
                let stdin = std::io::stdin();
                let mut session = Session::new(&ledger, stdin.lock(), std::io::stdout());
                let outcome = session.run().await;
                ledger.close().await;
                outcome?;
            }

            Commands::Init => {
                let ledger = RentalLedger::init(&config).await?;
                ledger.close().await;
                println!("Database initialized: {}", config.database_path().display());
            }

            Commands::Cars => {
                let ledger = RentalLedger::connect(&config).await?;
                run_cars_command(&ledger).await?;
            }

            Commands::Clients => {
                let ledger = RentalLedger::connect(&config).await?;
                run_clients_command(&ledger).await?;
            }

            Commands::Rentals => {
                let ledger = RentalLedger::connect(&config).await?;
                run_rentals_command(&ledger).await?;
            }

            Commands::Export {
                export_type,
                output,
                format,
            } => {
                let ledger = RentalLedger::connect(&config).await?;
                let format: ExportFormat = format.parse()?;
                run_export_command(&ledger, &export_type, output.as_deref(), format).await?;
            }
        }

        Ok(())
    }
}

async fn run_cars_command(ledger: &RentalLedger) -> Result<()> {
    let cars = ledger.list_cars().await?;
    if cars.is_empty() {
        println!("No cars found.");
        return Ok(());
    }

    println!(
        "{:<6} {:<24} {:>12} {:>12}",
        "ID",
        "MODEL",
        format!("{}/H", CURRENCY),
        format!("{}/KM", CURRENCY)
    );
    println!("{}", "-".repeat(57));
    for car in cars {
        println!(
            "{:<6} {:<24} {:>12} {:>12}",
            car.id,
            truncate(&car.model, 24),
            format_amount(car.hourly_rate),
            format_amount(car.km_rate)
        );
    }
    Ok(())
}

async fn run_clients_command(ledger: &RentalLedger) -> Result<()> {
    let clients = ledger.list_clients().await?;
    if clients.is_empty() {
        println!("No clients found.");
        return Ok(());
    }

    println!("{:<6} {:<24} {:<30}", "ID", "NAME", "EMAIL");
    println!("{}", "-".repeat(62));
    for client in clients {
        println!(
            "{:<6} {:<24} {:<30}",
            client.id,
            truncate(&client.name, 24),
            truncate(&client.email, 30)
        );
    }
    Ok(())
}

async fn run_rentals_command(ledger: &RentalLedger) -> Result<()> {
    let rentals = ledger.list_rentals().await?;
    if rentals.is_empty() {
        println!("No rentals found.");
        return Ok(());
    }

    println!(
        "{:<6} {:<7} {:<7} {:<17} {:<17} {:>10} {:>14}",
        "ID", "CLIENT", "CAR", "START", "END", "KM", "TOTAL"
    );
    println!("{}", "-".repeat(84));

    let mut grand_total = 0.0;
    for rental in &rentals {
        grand_total += rental.total_payment;
        println!(
            "{:<6} {:<7} {:<7} {:<17} {:<17} {:>10} {:>14}",
            rental.id,
            rental.client_id,
            rental.car_id,
            rental.start_time.format(INPUT_FORMAT).to_string(),
            rental.end_time.format(INPUT_FORMAT).to_string(),
            rental.km_driven,
            format_stored_money(rental.total_payment)
        );
    }
    println!("{}", "-".repeat(84));
    println!(
        "{} rental(s), total billed {}",
        rentals.len(),
        format_money(grand_total)
    );
    Ok(())
}

async fn run_export_command(
    ledger: &RentalLedger,
    export_type: &str,
    output: Option<&str>,
    format: ExportFormat,
) -> Result<()> {
    use std::fs::File;
    use std::io::{stdout, Write};

    let exporter = Exporter::new(ledger);

    // Determine output writer
    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    let count = match export_type {
        "rentals" => exporter.export_rentals(writer, format).await?,
        "cars" => exporter.export_cars(writer, format).await?,
        "clients" => exporter.export_clients(writer, format).await?,
        _ => {
            anyhow::bail!(
                "Invalid export type '{}'. Valid types: rentals, cars, clients",
                export_type
            );
        }
    };

    if output.is_some() {
        eprintln!("Exported {} {} as {}", count, export_type, format.as_str());
    }

    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}
