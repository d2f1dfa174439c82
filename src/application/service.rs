use chrono::NaiveDateTime;

use crate::config::LedgerConfig;
use crate::domain::{
    Car, CarId, Client, ClientId, NewCar, NewClient, NewRental, Rental, RentalId,
};
use crate::storage::Repository;

use super::AppError;

/// The rental ledger: owns car, client and rental persistence plus billing.
/// Operations take already-parsed values, so any client (CLI, tests) can drive it.
pub struct RentalLedger {
    repo: Repository,
}

impl RentalLedger {
    /// Create a new ledger over the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Open the configured database, creating the file and tables if needed.
    pub async fn init(config: &LedgerConfig) -> Result<Self, AppError> {
        let repo = Repository::init(&config.database_url(), config.max_connections).await?;
        tracing::info!(database = %config.database_path().display(), "rental ledger initialized");
        Ok(Self::new(repo))
    }

    /// Connect to an existing database without touching the schema.
    pub async fn connect(config: &LedgerConfig) -> Result<Self, AppError> {
        let repo =
            Repository::connect(&config.existing_database_url(), config.max_connections).await?;
        Ok(Self::new(repo))
    }

    /// Release every pooled connection.
    pub async fn close(&self) {
        self.repo.close().await;
    }

    // ========================
    // Car operations
    // ========================

    /// Register a car. The store assigns its id.
    pub async fn add_car(
        &self,
        model: String,
        hourly_rate: f64,
        km_rate: f64,
    ) -> Result<Car, AppError> {
        let car = self
            .repo
            .save_car(NewCar::new(model, hourly_rate, km_rate))
            .await?;
        tracing::debug!(car_id = car.id, model = %car.model, "car added");
        Ok(car)
    }

    pub async fn get_car(&self, id: CarId) -> Result<Car, AppError> {
        self.repo
            .get_car(id)
            .await?
            .ok_or(AppError::CarNotFound(id))
    }

    pub async fn list_cars(&self) -> Result<Vec<Car>, AppError> {
        Ok(self.repo.list_cars().await?)
    }

    // ========================
    // Client operations
    // ========================

    /// Register a client. The store assigns its id.
    pub async fn add_client(&self, name: String, email: String) -> Result<Client, AppError> {
        let client = self.repo.save_client(NewClient::new(name, email)).await?;
        tracing::debug!(client_id = client.id, "client added");
        Ok(client)
    }

    pub async fn get_client(&self, id: ClientId) -> Result<Client, AppError> {
        self.repo
            .get_client(id)
            .await?
            .ok_or(AppError::ClientNotFound(id))
    }

    pub async fn list_clients(&self) -> Result<Vec<Client>, AppError> {
        Ok(self.repo.list_clients().await?)
    }

    // ========================
    // Rental operations
    // ========================

    /// Rent a car to a client and persist the priced rental.
    ///
    /// Fails with [`AppError::CarNotFound`] when the car does not exist, in
    /// which case nothing is written. The client id, distance and time range
    /// are stored as given.
    pub async fn rent_car(
        &self,
        client_id: ClientId,
        car_id: CarId,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        km_driven: f64,
    ) -> Result<Rental, AppError> {
        let rental = self
            .repo
            .record_rental(car_id, |car| {
                NewRental::priced(client_id, car, start_time, end_time, km_driven)
            })
            .await?;

        match rental {
            Some(rental) => {
                tracing::debug!(
                    rental_id = rental.id,
                    client_id,
                    car_id,
                    total = rental.total_payment,
                    "rental recorded"
                );
                Ok(rental)
            }
            None => {
                tracing::info!(car_id, "rental rejected, car not found");
                Err(AppError::CarNotFound(car_id))
            }
        }
    }

    pub async fn get_rental(&self, id: RentalId) -> Result<Rental, AppError> {
        self.repo
            .get_rental(id)
            .await?
            .ok_or(AppError::RentalNotFound(id))
    }

    /// All rentals in the order they were recorded.
    pub async fn list_rentals(&self) -> Result<Vec<Rental>, AppError> {
        Ok(self.repo.list_rentals().await?)
    }

    pub async fn count_rentals(&self) -> Result<i64, AppError> {
        Ok(self.repo.count_rentals().await?)
    }
}
