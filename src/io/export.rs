use anyhow::{bail, Result};
use serde::Serialize;
use std::io::Write;

use crate::application::RentalLedger;
use crate::domain::format_storage_timestamp;

/// Output encodings supported by the exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => bail!("Invalid export format '{}'. Valid formats: csv, json", other),
        }
    }
}

/// Exporter for converting ledger records to CSV or JSON
pub struct Exporter<'a> {
    ledger: &'a RentalLedger,
}

impl<'a> Exporter<'a> {
    pub fn new(ledger: &'a RentalLedger) -> Self {
        Self { ledger }
    }

    /// Export rentals, returning how many were written
    pub async fn export_rentals<W: Write>(&self, writer: W, format: ExportFormat) -> Result<usize> {
        let rentals = self.ledger.list_rentals().await?;

        match format {
            ExportFormat::Json => write_json(writer, &rentals)?,
            ExportFormat::Csv => {
                let mut csv_writer = csv::Writer::from_writer(writer);
                csv_writer.write_record([
                    "id",
                    "client_id",
                    "car_id",
                    "start_time",
                    "end_time",
                    "km_driven",
                    "total_payment",
                ])?;

                for rental in &rentals {
                    csv_writer.write_record([
                        rental.id.to_string(),
                        rental.client_id.to_string(),
                        rental.car_id.to_string(),
                        format_storage_timestamp(&rental.start_time),
                        format_storage_timestamp(&rental.end_time),
                        rental.km_driven.to_string(),
                        rental.total_payment.to_string(),
                    ])?;
                }
                csv_writer.flush()?;
            }
        }

        Ok(rentals.len())
    }

    /// Export the car inventory
    pub async fn export_cars<W: Write>(&self, writer: W, format: ExportFormat) -> Result<usize> {
        let cars = self.ledger.list_cars().await?;
        write_records(writer, format, &cars)?;
        Ok(cars.len())
    }

    /// Export clients
    pub async fn export_clients<W: Write>(&self, writer: W, format: ExportFormat) -> Result<usize> {
        let clients = self.ledger.list_clients().await?;
        write_records(writer, format, &clients)?;
        Ok(clients.len())
    }
}

fn write_records<W: Write, T: Serialize>(writer: W, format: ExportFormat, records: &[T]) -> Result<()> {
    match format {
        ExportFormat::Json => write_json(writer, records),
        ExportFormat::Csv => {
            let mut csv_writer = csv::Writer::from_writer(writer);
            for record in records {
                csv_writer.serialize(record)?;
            }
            csv_writer.flush()?;
            Ok(())
        }
    }
}

fn write_json<W: Write, T: Serialize>(mut writer: W, records: &[T]) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writeln!(writer)?;
    Ok(())
}
