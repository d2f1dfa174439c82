use serde::{Deserialize, Serialize};

use super::Amount;

pub type CarId = i64;

/// A rentable car and its billing coefficients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    pub id: CarId,
    pub model: String,
    /// EUR per hour of rental
    pub hourly_rate: Amount,
    /// EUR per kilometer driven
    pub km_rate: Amount,
}

/// A car that has not been persisted yet. The store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCar {
    pub model: String,
    pub hourly_rate: Amount,
    pub km_rate: Amount,
}

impl NewCar {
    pub fn new(model: impl Into<String>, hourly_rate: Amount, km_rate: Amount) -> Self {
        Self {
            model: model.into(),
            hourly_rate,
            km_rate,
        }
    }

    pub fn with_id(self, id: CarId) -> Car {
        Car {
            id,
            model: self.model,
            hourly_rate: self.hourly_rate,
            km_rate: self.km_rate,
        }
    }
}
