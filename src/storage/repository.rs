use anyhow::{Context, Result};
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

use crate::domain::{
    format_storage_timestamp, parse_storage_timestamp, Car, CarId, Client, ClientId, NewCar,
    NewClient, NewRental, Rental, RentalId,
};

use super::SCHEMA;

/// Repository for persisting and querying cars, clients and rentals.
///
/// Every query checks a connection out of the pool and hands it back when the
/// query future completes, whether it succeeded or not.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .with_context(|| format!("Failed to connect to database {}", database_url))?;
        Ok(Self::new(pool))
    }

    /// Create the tables if they don't exist yet. Safe to call on every startup.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .context("Failed to create tables")?;
        Ok(())
    }

    /// Initialize a database (connect + migrate).
    pub async fn init(database_url: &str, max_connections: u32) -> Result<Self> {
        let repo = Self::connect(database_url, max_connections).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    // ========================
    // Car operations
    // ========================

    /// Insert a car and return it with the id assigned by the database.
    pub async fn save_car(&self, car: NewCar) -> Result<Car> {
        let id = sqlx::query("INSERT INTO Cars (Model, HourlyRate, KmRate) VALUES (?, ?, ?)")
            .bind(&car.model)
            .bind(car.hourly_rate)
            .bind(car.km_rate)
            .execute(&self.pool)
            .await
            .context("Failed to save car")?
            .last_insert_rowid();
        Ok(car.with_id(id))
    }

    pub async fn get_car(&self, id: CarId) -> Result<Option<Car>> {
        let row = sqlx::query("SELECT ID, Model, HourlyRate, KmRate FROM Cars WHERE ID = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch car")?;

        Ok(row.as_ref().map(Self::row_to_car))
    }

    /// List all cars in insertion order.
    pub async fn list_cars(&self) -> Result<Vec<Car>> {
        let rows = sqlx::query("SELECT ID, Model, HourlyRate, KmRate FROM Cars ORDER BY ID")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list cars")?;

        Ok(rows.iter().map(Self::row_to_car).collect())
    }

    fn row_to_car(row: &SqliteRow) -> Car {
        Car {
            id: row.get("ID"),
            model: row.get("Model"),
            hourly_rate: row.get("HourlyRate"),
            km_rate: row.get("KmRate"),
        }
    }

    // ========================
    // Client operations
    // ========================

    pub async fn save_client(&self, client: NewClient) -> Result<Client> {
        let id = sqlx::query("INSERT INTO Clients (Name, Email) VALUES (?, ?)")
            .bind(&client.name)
            .bind(&client.email)
            .execute(&self.pool)
            .await
            .context("Failed to save client")?
            .last_insert_rowid();
        Ok(client.with_id(id))
    }

    pub async fn get_client(&self, id: ClientId) -> Result<Option<Client>> {
        let row = sqlx::query("SELECT ID, Name, Email FROM Clients WHERE ID = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch client")?;

        Ok(row.as_ref().map(Self::row_to_client))
    }

    pub async fn list_clients(&self) -> Result<Vec<Client>> {
        let rows = sqlx::query("SELECT ID, Name, Email FROM Clients ORDER BY ID")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list clients")?;

        Ok(rows.iter().map(Self::row_to_client).collect())
    }

    fn row_to_client(row: &SqliteRow) -> Client {
        Client {
            id: row.get("ID"),
            name: row.get("Name"),
            email: row.get("Email"),
        }
    }

    // ========================
    // Rental operations
    // ========================

    /// Look up the car and, if it exists, insert the rental priced from it.
    ///
    /// Both statements run on the same checked-out connection. Returns `None`
    /// without writing anything when the car does not exist.
    pub async fn record_rental<F>(&self, car_id: CarId, price: F) -> Result<Option<Rental>>
    where
        F: FnOnce(&Car) -> NewRental,
    {
        let mut conn = self
            .pool
            .acquire()
            .await
            .context("Failed to acquire database connection")?;

        let row = sqlx::query("SELECT ID, Model, HourlyRate, KmRate FROM Cars WHERE ID = ?")
            .bind(car_id)
            .fetch_optional(&mut *conn)
            .await
            .context("Failed to fetch car")?;

        let Some(car) = row.as_ref().map(Self::row_to_car) else {
            return Ok(None);
        };

        let rental = price(&car);
        let id = sqlx::query(
            r#"
            INSERT INTO Rentals (ClientID, CarID, StartTime, EndTime, KmDriven, TotalPayment)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(rental.client_id)
        .bind(rental.car_id)
        .bind(format_storage_timestamp(&rental.start_time))
        .bind(format_storage_timestamp(&rental.end_time))
        .bind(rental.km_driven)
        .bind(rental.total_payment)
        .execute(&mut *conn)
        .await
        .context("Failed to save rental")?
        .last_insert_rowid();

        Ok(Some(rental.with_id(id)))
    }

    pub async fn get_rental(&self, id: RentalId) -> Result<Option<Rental>> {
        let row = sqlx::query(
            r#"
            SELECT ID, ClientID, CarID, StartTime, EndTime, KmDriven, TotalPayment
            FROM Rentals
            WHERE ID = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch rental")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_rental(&row)?)),
            None => Ok(None),
        }
    }

    /// List all rentals in insertion order.
    pub async fn list_rentals(&self) -> Result<Vec<Rental>> {
        let rows = sqlx::query(
            r#"
            SELECT ID, ClientID, CarID, StartTime, EndTime, KmDriven, TotalPayment
            FROM Rentals
            ORDER BY ID
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list rentals")?;

        rows.iter().map(Self::row_to_rental).collect()
    }

    /// Count stored rentals.
    pub async fn count_rentals(&self) -> Result<i64> {
        let count: i64 = sqlx::query("SELECT COUNT(*) as count FROM Rentals")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count rentals")?
            .get("count");
        Ok(count)
    }

    fn row_to_rental(row: &SqliteRow) -> Result<Rental> {
        let start_str: String = row.get("StartTime");
        let end_str: String = row.get("EndTime");

        Ok(Rental {
            id: row.get("ID"),
            client_id: row.get("ClientID"),
            car_id: row.get("CarID"),
            start_time: parse_storage_timestamp(&start_str)
                .with_context(|| format!("Invalid StartTime '{}'", start_str))?,
            end_time: parse_storage_timestamp(&end_str)
                .with_context(|| format!("Invalid EndTime '{}'", end_str))?,
            km_driven: row.get("KmDriven"),
            total_payment: row.get("TotalPayment"),
        })
    }
}
