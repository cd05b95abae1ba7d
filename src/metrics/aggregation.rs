//! Computes the home page metrics from the transactions in a date range.

use std::collections::BTreeMap;

use rusqlite::Connection;
use time::{UtcOffset, Weekday};

use crate::{
    Error,
    home::DateRange,
    metrics::{
        models::{Metrics, RawIndicator, StatusMetric},
        transaction::{Transaction, get_transactions_in_range},
    },
};

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
    Weekday::Saturday,
    Weekday::Sunday,
];

/// Get the metrics for the transactions created within `range`.
///
/// Weekdays are determined in `local_offset`.
///
/// # Errors
/// Returns [Error::SqlError] if the transactions could not be read.
pub fn get_metrics(
    range: DateRange,
    local_offset: UtcOffset,
    connection: &Connection,
) -> Result<Metrics, Error> {
    let transactions = get_transactions_in_range(range, connection)?;

    tracing::debug!(
        "Computing metrics for {} transactions between {} and {}",
        transactions.len(),
        range.start,
        range.end
    );

    Ok(build_metrics(&transactions, local_offset))
}

pub(super) fn build_metrics(transactions: &[Transaction], local_offset: UtcOffset) -> Metrics {
    let total_transactions = transactions.len() as i64;
    let total_amount: f64 = transactions.iter().map(|t| t.amount).sum();
    let average_amount = if transactions.is_empty() {
        0.0
    } else {
        total_amount / total_transactions as f64
    };

    Metrics {
        average_amount,
        card_brands: count_by(transactions.iter().filter_map(|t| t.card_brand.as_deref())),
        installments: count_installments(transactions),
        payment_methods: count_by(transactions.iter().map(|t| t.payment_method.as_str())),
        refuse_reasons: count_by(
            transactions
                .iter()
                .filter_map(|t| t.refuse_reason.as_deref()),
        ),
        status: count_by(transactions.iter().map(|t| t.status.as_str()))
            .into_iter()
            .map(|indicator| StatusMetric {
                title: indicator.title,
                value: Some(indicator.value),
            })
            .collect(),
        total_amount,
        total_transactions,
        volume_by_weekday: volume_by_weekday(transactions, local_offset),
    }
}

/// Counts the occurrences of each key, ordered by key.
fn count_by<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<RawIndicator> {
    let mut counts: BTreeMap<&str, f64> = BTreeMap::new();

    for key in keys {
        *counts.entry(key).or_insert(0.0) += 1.0;
    }

    counts
        .into_iter()
        .map(|(title, value)| RawIndicator::new(title, value))
        .collect()
}

/// Counts transactions per number of installments, titled e.g. "3x".
fn count_installments(transactions: &[Transaction]) -> Vec<StatusMetric> {
    let mut counts: BTreeMap<i64, f64> = BTreeMap::new();

    for transaction in transactions {
        *counts.entry(transaction.installments).or_insert(0.0) += 1.0;
    }

    counts
        .into_iter()
        .map(|(installments, count)| StatusMetric {
            title: format!("{installments}x"),
            value: Some(count),
        })
        .collect()
}

/// Sums transaction amounts per weekday, Monday first.
///
/// Every weekday is included so that charts have a stable x-axis. Dates that
/// cannot be shown in `local_offset` keep their stored weekday.
fn volume_by_weekday(transactions: &[Transaction], local_offset: UtcOffset) -> Vec<StatusMetric> {
    let mut totals = [0.0; 7];

    for transaction in transactions {
        let weekday = transaction
            .date_created
            .checked_to_offset(local_offset)
            .unwrap_or(transaction.date_created)
            .weekday();
        totals[weekday.number_days_from_monday() as usize] += transaction.amount;
    }

    WEEKDAYS
        .iter()
        .zip(totals)
        .map(|(weekday, total)| StatusMetric {
            title: weekday.to_string().to_lowercase(),
            value: Some(total),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use time::{Duration, UtcOffset, macros::datetime};

    use crate::metrics::{
        models::{RawIndicator, StatusMetric},
        transaction::Transaction,
    };

    use super::build_metrics;

    fn create_test_transaction(amount: f64, status: &str, payment_method: &str) -> Transaction {
        Transaction {
            amount,
            status: status.to_owned(),
            payment_method: payment_method.to_owned(),
            card_brand: None,
            installments: 1,
            refuse_reason: None,
            // A Monday.
            date_created: datetime!(2024-01-01 12:00 UTC),
        }
    }

    #[test]
    fn empty_input_has_zero_totals() {
        let metrics = build_metrics(&[], UtcOffset::UTC);

        assert_eq!(metrics.total_transactions, 0);
        assert_eq!(metrics.total_amount, 0.0);
        assert_eq!(metrics.average_amount, 0.0);
        assert!(metrics.card_brands.is_empty());
        assert!(metrics.status.is_empty());
        assert_eq!(metrics.volume_by_weekday.len(), 7);
    }

    #[test]
    fn computes_totals_and_average() {
        let transactions = vec![
            create_test_transaction(100.0, "paid", "boleto"),
            create_test_transaction(50.0, "paid", "credit_card"),
        ];

        let metrics = build_metrics(&transactions, UtcOffset::UTC);

        assert_eq!(metrics.total_transactions, 2);
        assert_eq!(metrics.total_amount, 150.0);
        assert_eq!(metrics.average_amount, 75.0);
    }

    #[test]
    fn counts_breakdowns_by_key() {
        let mut visa = create_test_transaction(10.0, "paid", "credit_card");
        visa.card_brand = Some("visa".to_owned());
        let mut refused = create_test_transaction(10.0, "refused", "credit_card");
        refused.card_brand = Some("visa".to_owned());
        refused.refuse_reason = Some("antifraud".to_owned());
        let mut mastercard = create_test_transaction(10.0, "paid", "credit_card");
        mastercard.card_brand = Some("mastercard".to_owned());
        mastercard.installments = 3;
        let boleto = create_test_transaction(10.0, "paid", "boleto");

        let metrics = build_metrics(&[visa, refused, mastercard, boleto], UtcOffset::UTC);

        assert_eq!(
            metrics.card_brands,
            vec![
                RawIndicator::new("mastercard", 1.0),
                RawIndicator::new("visa", 2.0)
            ]
        );
        assert_eq!(
            metrics.payment_methods,
            vec![
                RawIndicator::new("boleto", 1.0),
                RawIndicator::new("credit_card", 3.0)
            ]
        );
        assert_eq!(
            metrics.refuse_reasons,
            vec![RawIndicator::new("antifraud", 1.0)]
        );
        assert_eq!(
            metrics.status,
            vec![
                StatusMetric {
                    title: "paid".to_owned(),
                    value: Some(3.0)
                },
                StatusMetric {
                    title: "refused".to_owned(),
                    value: Some(1.0)
                },
            ]
        );
        assert_eq!(
            metrics.installments,
            vec![
                StatusMetric {
                    title: "1x".to_owned(),
                    value: Some(3.0)
                },
                StatusMetric {
                    title: "3x".to_owned(),
                    value: Some(1.0)
                },
            ]
        );
    }

    #[test]
    fn volume_by_weekday_uses_local_offset() {
        let mut monday = create_test_transaction(10.0, "paid", "boleto");
        // 01:00 on Tuesday in UTC is still Monday in UTC-3, and likewise for Wednesday.
        monday.date_created = datetime!(2024-01-02 01:00 UTC);
        let mut tuesday = create_test_transaction(25.0, "paid", "boleto");
        tuesday.date_created = datetime!(2024-01-02 01:00 UTC) + Duration::days(1);

        let offset = UtcOffset::from_hms(-3, 0, 0).unwrap();
        let metrics = build_metrics(&[monday, tuesday], offset);

        let titles: Vec<&str> = metrics
            .volume_by_weekday
            .iter()
            .map(|metric| metric.title.as_str())
            .collect();
        assert_eq!(
            titles,
            vec![
                "monday",
                "tuesday",
                "wednesday",
                "thursday",
                "friday",
                "saturday",
                "sunday"
            ]
        );
        assert_eq!(metrics.volume_by_weekday[0].value, Some(10.0));
        assert_eq!(metrics.volume_by_weekday[1].value, Some(25.0));
        assert_eq!(metrics.volume_by_weekday[2].value, Some(0.0));
    }

    #[test]
    fn volume_by_weekday_keeps_dates_outside_local_offset() {
        let mut last_day = create_test_transaction(10.0, "paid", "boleto");
        // A Friday, which would be past the last supported date in UTC+5.
        last_day.date_created = datetime!(9999-12-31 23:00 UTC);

        let offset = UtcOffset::from_hms(5, 0, 0).unwrap();
        let metrics = build_metrics(&[last_day], offset);

        assert_eq!(metrics.volume_by_weekday[4].title, "friday");
        assert_eq!(metrics.volume_by_weekday[4].value, Some(10.0));
    }
}
