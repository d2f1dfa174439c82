mod common;

use anyhow::Result;
use common::{test_ledger, Fleet};
use rental_ledger::application::RentalLedger;
use rental_ledger::cli::{Session, ACTION_PROMPT};

/// Feed `script` to a session and return what it printed.
async fn run_script(ledger: &RentalLedger, script: &str) -> (Result<()>, String) {
    let mut session = Session::new(ledger, script.as_bytes(), Vec::new());
    let outcome = session.run().await;
    let output = String::from_utf8(session.into_output()).unwrap();
    (outcome, output)
}

#[tokio::test]
async fn test_full_rental_flow() -> Result<()> {
    let (ledger, _temp) = test_ledger().await?;

    let script = "\
add_car
Model 3
10.0
0.5
add_client
Alice
alice@example.com
rent_car
1
1
2024-01-01 10:00
2024-01-01 12:00
40
print
stop
";
    let (outcome, output) = run_script(&ledger, script).await;
    outcome?;

    assert!(output.contains("Enter Tesla Model:"));
    assert!(output.contains("Car added (ID: 1)."));
    assert!(output.contains("Client added (ID: 1)."));
    assert!(output.contains("Rental recorded. Total Payment: EUR 40.00"));
    assert!(output.contains("Rental Records:\nRental ID: 1, Client ID: 1, Car ID: 1, Total Payment: EUR 40\n"));

    let rentals = ledger.list_rentals().await?;
    assert_eq!(rentals.len(), 1);
    assert_eq!(rentals[0].total_payment, 40.0);

    Ok(())
}

#[tokio::test]
async fn test_field_prompts_in_order() -> Result<()> {
    let (ledger, _temp) = test_ledger().await?;
    Fleet::create(&ledger).await?;

    let script = "rent_car\n1\n1\n2024-01-01 10:00\n2024-01-01 11:00\n0\nstop\n";
    let (outcome, output) = run_script(&ledger, script).await;
    outcome?;

    let expected = [
        ACTION_PROMPT,
        "Enter Client ID:",
        "Enter Car ID:",
        "Enter Start Time (yyyy-MM-dd HH:mm):",
        "Enter End Time (yyyy-MM-dd HH:mm):",
        "Enter Km Driven:",
        "Rental recorded. Total Payment: EUR 10.00",
        ACTION_PROMPT,
    ];
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines, expected);

    Ok(())
}

#[tokio::test]
async fn test_unknown_car_keeps_session_alive() -> Result<()> {
    let (ledger, _temp) = test_ledger().await?;
    Fleet::create(&ledger).await?;

    let script = "rent_car\n1\n999\n2024-01-01 10:00\n2024-01-01 12:00\n40\nprint\nstop\n";
    let (outcome, output) = run_script(&ledger, script).await;
    outcome?;

    assert!(output.contains("Car not found."));
    assert!(output.ends_with(&format!("Rental Records:\n{}\n", ACTION_PROMPT)));
    assert_eq!(ledger.count_rentals().await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_invalid_action_reprompts() -> Result<()> {
    let (ledger, _temp) = test_ledger().await?;

    let (outcome, output) = run_script(&ledger, "fly\nstop\n").await;
    outcome?;

    assert_eq!(
        output,
        format!("{p}\nInvalid action\n{p}\n", p = ACTION_PROMPT)
    );

    Ok(())
}

#[tokio::test]
async fn test_stop_ignores_remaining_input() -> Result<()> {
    let (ledger, _temp) = test_ledger().await?;

    let (outcome, _output) = run_script(&ledger, "stop\nadd_client\nBob\nbob@example.com\n").await;
    outcome?;

    assert!(ledger.list_clients().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_end_of_input_ends_session() -> Result<()> {
    let (ledger, _temp) = test_ledger().await?;

    let (outcome, output) = run_script(&ledger, "").await;
    outcome?;
    assert_eq!(output, format!("{}\n", ACTION_PROMPT));

    Ok(())
}

#[tokio::test]
async fn test_malformed_number_ends_session_with_error() -> Result<()> {
    let (ledger, _temp) = test_ledger().await?;

    let (outcome, _output) = run_script(&ledger, "add_car\nModel 3\nten\n0.5\nstop\n").await;

    let err = outcome.unwrap_err();
    assert!(format!("{:#}", err).contains("Invalid number 'ten'"));
    assert!(ledger.list_cars().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_malformed_timestamp_ends_session_with_error() -> Result<()> {
    let (ledger, _temp) = test_ledger().await?;
    Fleet::create(&ledger).await?;

    let script = "rent_car\n1\n1\ntomorrow\n";
    let (outcome, _output) = run_script(&ledger, script).await;

    let err = outcome.unwrap_err();
    assert!(err.to_string().contains("invalid timestamp 'tomorrow'"));
    assert_eq!(ledger.count_rentals().await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_input_closed_mid_action_is_an_error() -> Result<()> {
    let (ledger, _temp) = test_ledger().await?;

    let (outcome, _output) = run_script(&ledger, "add_client\nBob\n").await;

    assert!(outcome.unwrap_err().to_string().contains("Unexpected end of input"));
    assert!(ledger.list_clients().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_print_shows_stored_fractional_total() -> Result<()> {
    let (ledger, _temp) = test_ledger().await?;
    Fleet::create(&ledger).await?;

    // 20 minutes at 10.0/h, no distance
    let script = "rent_car\n1\n1\n2024-01-01 10:00\n2024-01-01 10:20\n0\nprint\nstop\n";
    let (outcome, output) = run_script(&ledger, script).await;
    outcome?;

    let stored = ledger.list_rentals().await?[0].total_payment;
    assert!(output.contains("Rental recorded. Total Payment: EUR 3.33\n"));
    assert!(output.contains(&format!(
        "Rental ID: 1, Client ID: 1, Car ID: 1, Total Payment: EUR {}\n",
        stored
    )));
    assert!(!output.contains("Car ID: 1, Total Payment: EUR 3.33\n"));

    Ok(())
}
