use thiserror::Error;

use crate::domain::{CarId, ClientId, RentalId};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Car not found: {0}")]
    CarNotFound(CarId),

    #[error("Client not found: {0}")]
    ClientNotFound(ClientId),

    #[error("Rental not found: {0}")]
    RentalNotFound(RentalId),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl AppError {
    /// Whether the error should end the session. A missing car during a
    /// rental is an ordinary outcome the operator can retry.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, AppError::CarNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_car_not_found_is_not_fatal() {
        assert!(!AppError::CarNotFound(999).is_fatal());
    }

    #[test]
    fn test_database_errors_are_fatal() {
        let err = AppError::from(anyhow::anyhow!("disk I/O error"));
        assert!(err.is_fatal());
        assert_eq!(err.to_string(), "Database error: disk I/O error");
    }
}
