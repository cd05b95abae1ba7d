//! Storage for the payment transactions that metrics are computed from.

use rusqlite::{Connection, types::Type};
use time::OffsetDateTime;

use crate::{Error, home::DateRange};

/// A payment transaction to insert into the database.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The amount charged in reais.
    pub amount: f64,
    /// The transaction status, e.g. "paid" or "refused".
    pub status: String,
    /// How the customer paid, e.g. "credit_card" or "boleto".
    pub payment_method: String,
    /// The card brand, for card payments.
    pub card_brand: Option<String>,
    /// The number of installments the amount is split into.
    pub installments: i64,
    /// Why the transaction was refused, for refused transactions.
    pub refuse_reason: Option<String>,
    /// When the transaction was made.
    pub date_created: OffsetDateTime,
}

impl NewTransaction {
    /// Create a paid-in-full transaction, use the builder methods to set the
    /// optional fields.
    pub fn build(
        amount: f64,
        status: &str,
        payment_method: &str,
        date_created: OffsetDateTime,
    ) -> Self {
        Self {
            amount,
            status: status.to_owned(),
            payment_method: payment_method.to_owned(),
            card_brand: None,
            installments: 1,
            refuse_reason: None,
            date_created,
        }
    }

    /// Set the card brand.
    pub fn card_brand(mut self, card_brand: &str) -> Self {
        self.card_brand = Some(card_brand.to_owned());
        self
    }

    /// Set the number of installments.
    pub fn installments(mut self, installments: i64) -> Self {
        self.installments = installments;
        self
    }

    /// Set the reason the transaction was refused.
    pub fn refuse_reason(mut self, refuse_reason: &str) -> Self {
        self.refuse_reason = Some(refuse_reason.to_owned());
        self
    }
}

/// The subset of a stored transaction needed to compute metrics.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Transaction {
    pub amount: f64,
    pub status: String,
    pub payment_method: String,
    pub card_brand: Option<String>,
    pub installments: i64,
    pub refuse_reason: Option<String>,
    pub date_created: OffsetDateTime,
}

/// Create the transaction table.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            amount REAL NOT NULL,
            status TEXT NOT NULL,
            payment_method TEXT NOT NULL,
            card_brand TEXT,
            installments INTEGER NOT NULL DEFAULT 1,
            refuse_reason TEXT,
            date_created INTEGER NOT NULL
        )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date_created \
        ON \"transaction\"(date_created)",
        (),
    )?;

    Ok(())
}

/// Insert `transaction` into the database.
///
/// # Errors
/// Returns [Error::SqlError] if the insert fails.
pub fn create_transaction(transaction: NewTransaction, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO \"transaction\" \
        (amount, status, payment_method, card_brand, installments, refuse_reason, date_created) \
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        (
            transaction.amount,
            &transaction.status,
            &transaction.payment_method,
            &transaction.card_brand,
            transaction.installments,
            &transaction.refuse_reason,
            to_unix_millis(transaction.date_created),
        ),
    )?;

    Ok(())
}

/// Get the transactions created within `range`, inclusive of both ends.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails or a stored timestamp is out
/// of range.
pub(super) fn get_transactions_in_range(
    range: DateRange,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut stmt = connection.prepare(
        "SELECT amount, status, payment_method, card_brand, installments, refuse_reason, date_created
        FROM \"transaction\"
        WHERE date_created BETWEEN ?1 AND ?2
        ORDER BY date_created ASC, id ASC",
    )?;

    stmt.query_map(
        (to_unix_millis(range.start), to_unix_millis(range.end)),
        |row| {
            let date_created: i64 = row.get(6)?;

            Ok(Transaction {
                amount: row.get(0)?,
                status: row.get(1)?,
                payment_method: row.get(2)?,
                card_brand: row.get(3)?,
                installments: row.get(4)?,
                refuse_reason: row.get(5)?,
                date_created: from_unix_millis(date_created).map_err(|error| {
                    rusqlite::Error::FromSqlConversionFailure(6, Type::Integer, Box::new(error))
                })?,
            })
        },
    )?
    .collect::<Result<Vec<Transaction>, rusqlite::Error>>()
    .map_err(|error| error.into())
}

fn to_unix_millis(date_time: OffsetDateTime) -> i64 {
    (date_time.unix_timestamp_nanos() / 1_000_000) as i64
}

fn from_unix_millis(millis: i64) -> Result<OffsetDateTime, time::error::ComponentRange> {
    OffsetDateTime::from_unix_timestamp_nanos(millis as i128 * 1_000_000)
}
