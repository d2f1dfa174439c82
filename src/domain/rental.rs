use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{compute_total_payment, Amount, Car, CarId, ClientId};

pub type RentalId = i64;

/// A completed booking. The total is computed once at creation and stored as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rental {
    pub id: RentalId,
    pub client_id: ClientId,
    pub car_id: CarId,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub km_driven: f64,
    pub total_payment: Amount,
}

/// A priced rental waiting for an id from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRental {
    pub client_id: ClientId,
    pub car_id: CarId,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub km_driven: f64,
    pub total_payment: Amount,
}

impl NewRental {
    /// Price a rental of `car` using its current rates.
    pub fn priced(
        client_id: ClientId,
        car: &Car,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        km_driven: f64,
    ) -> Self {
        Self {
            client_id,
            car_id: car.id,
            start_time,
            end_time,
            km_driven,
            total_payment: compute_total_payment(car, start_time, end_time, km_driven),
        }
    }

    pub fn with_id(self, id: RentalId) -> Rental {
        Rental {
            id,
            client_id: self.client_id,
            car_id: self.car_id,
            start_time: self.start_time,
            end_time: self.end_time,
            km_driven: self.km_driven,
            total_payment: self.total_payment,
        }
    }
}
