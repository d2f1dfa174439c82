// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDateTime;
use rental_ledger::application::RentalLedger;
use rental_ledger::config::LedgerConfig;
use rental_ledger::domain::{parse_timestamp, Car, Client};
use tempfile::TempDir;

/// Helper to create a test ledger with a temporary database
pub async fn test_ledger() -> Result<(RentalLedger, TempDir)> {
    let temp_dir = TempDir::new()?;
    let config = LedgerConfig::new(temp_dir.path().join("test.db"));
    let ledger = RentalLedger::init(&config).await?;
    Ok((ledger, temp_dir))
}

/// Helper to parse a console timestamp ("yyyy-MM-dd HH:mm")
pub fn ts(input: &str) -> NaiveDateTime {
    parse_timestamp(input).unwrap()
}

/// Test fixture: a small fleet and one client
pub struct Fleet {
    pub model_3: Car,
    pub model_y: Car,
    pub alice: Client,
}

impl Fleet {
    pub async fn create(ledger: &RentalLedger) -> Result<Self> {
        let model_3 = ledger.add_car("Model 3".into(), 10.0, 0.5).await?;
        let model_y = ledger.add_car("Model Y".into(), 15.0, 0.75).await?;
        let alice = ledger
            .add_client("Alice".into(), "alice@example.com".into())
            .await?;
        Ok(Self {
            model_3,
            model_y,
            alice,
        })
    }
}
