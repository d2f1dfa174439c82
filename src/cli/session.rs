use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use std::io::{BufRead, Write};

use crate::application::{AppError, RentalLedger};
use crate::domain::{format_money, format_stored_money, parse_timestamp, Rental};

pub const ACTION_PROMPT: &str =
    "Choose action: 'add_car', 'add_client', 'rent_car', 'print' or 'stop'.";

/// A command typed at the action prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    AddCar,
    AddClient,
    RentCar,
    Print,
    Stop,
}

impl Action {
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim() {
            "add_car" => Some(Action::AddCar),
            "add_client" => Some(Action::AddClient),
            "rent_car" => Some(Action::RentCar),
            "print" => Some(Action::Print),
            "stop" => Some(Action::Stop),
            _ => None,
        }
    }
}

/// Line-oriented prompt loop driving a [`RentalLedger`].
///
/// Parse and storage failures are returned to the caller and end the
/// session. A rental for an unknown car is reported and the loop goes on.
pub struct Session<'a, R, W> {
    ledger: &'a RentalLedger,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(ledger: &'a RentalLedger, input: R, output: W) -> Self {
        Self {
            ledger,
            input,
            output,
        }
    }

    /// Run until `stop` or end of input.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.output, "{}", ACTION_PROMPT)?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                tracing::debug!("input closed, ending session");
                return Ok(());
            };

            match Action::parse(&line) {
                Some(Action::Stop) => return Ok(()),
                Some(action) => self.dispatch(action).await?,
                None => writeln!(self.output, "Invalid action")?,
            }
        }
    }

    /// Hand back the writer, mostly so tests can inspect what was printed.
    pub fn into_output(self) -> W {
        self.output
    }

    async fn dispatch(&mut self, action: Action) -> Result<()> {
        match action {
            Action::AddCar => self.add_car().await,
            Action::AddClient => self.add_client().await,
            Action::RentCar => self.rent_car().await,
            Action::Print => self.print_rentals().await,
            Action::Stop => Ok(()),
        }
    }

    async fn add_car(&mut self) -> Result<()> {
        let model = self.prompt_text("Enter Tesla Model:")?;
        let hourly_rate = self.prompt_real("Enter Hourly Rate (EUR/h):")?;
        let km_rate = self.prompt_real("Enter Km Rate (EUR/km):")?;

        let car = self.ledger.add_car(model, hourly_rate, km_rate).await?;
        writeln!(self.output, "Car added (ID: {}).", car.id)?;
        Ok(())
    }

    async fn add_client(&mut self) -> Result<()> {
        let name = self.prompt_text("Enter Client Name:")?;
        let email = self.prompt_text("Enter Client Email:")?;

        let client = self.ledger.add_client(name, email).await?;
        writeln!(self.output, "Client added (ID: {}).", client.id)?;
        Ok(())
    }

    async fn rent_car(&mut self) -> Result<()> {
        let client_id = self.prompt_id("Enter Client ID:")?;
        let car_id = self.prompt_id("Enter Car ID:")?;
        let start_time = self.prompt_timestamp("Enter Start Time (yyyy-MM-dd HH:mm):")?;
        let end_time = self.prompt_timestamp("Enter End Time (yyyy-MM-dd HH:mm):")?;
        let km_driven = self.prompt_real("Enter Km Driven:")?;

        match self
            .ledger
            .rent_car(client_id, car_id, start_time, end_time, km_driven)
            .await
        {
            Ok(rental) => writeln!(
                self.output,
                "Rental recorded. Total Payment: {}",
                format_money(rental.total_payment)
            )?,
            Err(AppError::CarNotFound(_)) => writeln!(self.output, "Car not found.")?,
            Err(err) => return Err(err.into()),
        }
        Ok(())
    }

    async fn print_rentals(&mut self) -> Result<()> {
        let rentals = self.ledger.list_rentals().await?;

        writeln!(self.output, "Rental Records:")?;
        for rental in &rentals {
            writeln!(self.output, "{}", render_rental(rental))?;
        }
        Ok(())
    }

    /// Read one line without its terminator. `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        let trimmed = buf.trim_end_matches(['\r', '\n']).len();
        buf.truncate(trimmed);
        Ok(Some(buf))
    }

    fn prompt_text(&mut self, label: &str) -> Result<String> {
        writeln!(self.output, "{}", label)?;
        self.output.flush()?;
        match self.read_line()? {
            Some(line) => Ok(line),
            None => bail!("Unexpected end of input at '{}'", label),
        }
    }

    fn prompt_real(&mut self, label: &str) -> Result<f64> {
        let input = self.prompt_text(label)?;
        input
            .trim()
            .parse()
            .with_context(|| format!("Invalid number '{}'", input))
    }

    fn prompt_id(&mut self, label: &str) -> Result<i64> {
        let input = self.prompt_text(label)?;
        input
            .trim()
            .parse()
            .with_context(|| format!("Invalid ID '{}'", input))
    }

    fn prompt_timestamp(&mut self, label: &str) -> Result<NaiveDateTime> {
        let input = self.prompt_text(label)?;
        Ok(parse_timestamp(&input)?)
    }
}

/// One line of the rental listing. The total is shown as stored.
pub fn render_rental(rental: &Rental) -> String {
    format!(
        "Rental ID: {}, Client ID: {}, Car ID: {}, Total Payment: {}",
        rental.id,
        rental.client_id,
        rental.car_id,
        format_stored_money(rental.total_payment)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parse_timestamp;

    #[test]
    fn test_action_tokens() {
        assert_eq!(Action::parse("add_car"), Some(Action::AddCar));
        assert_eq!(Action::parse("add_client"), Some(Action::AddClient));
        assert_eq!(Action::parse("rent_car"), Some(Action::RentCar));
        assert_eq!(Action::parse("print"), Some(Action::Print));
        assert_eq!(Action::parse(" stop \r"), Some(Action::Stop));
    }

    #[test]
    fn test_unknown_tokens() {
        assert_eq!(Action::parse("ADD_CAR"), None);
        assert_eq!(Action::parse("list"), None);
        assert_eq!(Action::parse(""), None);
    }

    #[test]
    fn test_render_rental() {
        let rental = Rental {
            id: 4,
            client_id: 2,
            car_id: 1,
            start_time: parse_timestamp("2024-01-01 10:00").unwrap(),
            end_time: parse_timestamp("2024-01-01 12:00").unwrap(),
            km_driven: 40.0,
            total_payment: 40.0,
        };
        assert_eq!(
            render_rental(&rental),
            "Rental ID: 4, Client ID: 2, Car ID: 1, Total Payment: EUR 40"
        );
    }

    #[test]
    fn test_render_rental_shows_fractional_total_unrounded() {
        let rental = Rental {
            id: 1,
            client_id: 1,
            car_id: 1,
            start_time: parse_timestamp("2024-01-01 10:00").unwrap(),
            end_time: parse_timestamp("2024-01-01 10:20").unwrap(),
            km_driven: 0.0,
            total_payment: 10.0 / 3.0,
        };
        let line = render_rental(&rental);
        assert!(line.ends_with(&format!("EUR {}", 10.0_f64 / 3.0)));
        assert!(!line.ends_with("EUR 3.33"));
    }
}
