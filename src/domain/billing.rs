use chrono::NaiveDateTime;

use super::{Amount, Car};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Elapsed time between two timestamps, in fractional hours.
/// Negative when `end` precedes `start`.
pub fn rental_hours(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    (end - start).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

/// Total billed for a rental: hours times the hourly rate plus distance times the km rate.
///
/// Inputs are taken as given. An end before the start or a negative distance
/// yields a negative total rather than an error.
pub fn compute_total_payment(
    car: &Car,
    start: NaiveDateTime,
    end: NaiveDateTime,
    km_driven: f64,
) -> Amount {
    let hours = rental_hours(start, end);
    hours * car.hourly_rate + km_driven * car.km_rate
}
