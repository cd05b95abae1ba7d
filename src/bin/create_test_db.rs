use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use pilot_dashboard::{NewTransaction, create_transaction, initialize_db};

/// A utility for creating a test database for the Pilot dashboard server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// How many days of transactions to create, ending today.
    #[arg(long, short, default_value_t = 45)]
    days: i64,
}

const STATUSES: [&str; 6] = [
    "paid",
    "paid",
    "paid",
    "authorized",
    "refunded",
    "waiting_payment",
];
const CARD_BRANDS: [&str; 5] = ["visa", "visa", "mastercard", "elo", "amex"];
const REFUSE_REASONS: [&str; 4] = ["antifraud", "acquirer", "no_acquirer", "manual_review"];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating sample transactions...");

    let now = OffsetDateTime::now_utc();
    let mut count = 0;

    for day in 0..args.days {
        for i in 0..(day % 5 + 2) {
            let seed = (day * 7 + i) as usize;
            let date_created = now - Duration::days(day) - Duration::hours(i * 3);
            create_transaction(sample_transaction(seed, date_created), &conn)?;
            count += 1;
        }
    }

    println!("Created {count} transactions.");
    println!("Success!");

    Ok(())
}

/// A varied transaction derived from `seed`.
fn sample_transaction(seed: usize, date_created: OffsetDateTime) -> NewTransaction {
    let amount = 25.0 + (seed % 17) as f64 * 12.5;

    if seed % 11 == 0 {
        return NewTransaction::build(amount, "refused", "credit_card", date_created)
            .card_brand(CARD_BRANDS[seed % CARD_BRANDS.len()])
            .refuse_reason(REFUSE_REASONS[seed % REFUSE_REASONS.len()]);
    }

    let status = STATUSES[seed % STATUSES.len()];

    match seed % 4 {
        0 => NewTransaction::build(amount, status, "boleto", date_created),
        1 => NewTransaction::build(amount, status, "debit_card", date_created)
            .card_brand(CARD_BRANDS[seed % CARD_BRANDS.len()]),
        _ => NewTransaction::build(amount, status, "credit_card", date_created)
            .card_brand(CARD_BRANDS[seed % CARD_BRANDS.len()])
            .installments((seed % 6) as i64 + 1),
    }
}
