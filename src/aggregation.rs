//! Summaries of a list of transactions: totals, balances, categories and months.
//!
//! These are pure functions over a snapshot of the stored transactions and
//! are recomputed for every request.

use std::collections::HashMap;

use time::{Date, Month};

use crate::transaction::{Transaction, TransactionType};

/// Sum the values of all transactions of `type_`.
pub fn total_by_type(transactions: &[Transaction], type_: TransactionType) -> f64 {
    transactions
        .iter()
        .filter(|transaction| transaction.type_ == type_)
        .map(|transaction| transaction.value)
        .sum()
}

/// The money left over: income minus expenses minus card charges.
pub fn balance(transactions: &[Transaction]) -> f64 {
    total_by_type(transactions, TransactionType::Entrada)
        - total_by_type(transactions, TransactionType::Saida)
        - total_by_type(transactions, TransactionType::Cartao)
}

/// Sum transaction values per category.
///
/// Categories are listed in the order they first appear in `transactions`.
pub fn totals_by_category(transactions: &[Transaction]) -> Vec<(String, f64)> {
    let mut totals: Vec<(String, f64)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for transaction in transactions {
        match positions.get(transaction.category.as_str()) {
            Some(&position) => totals[position].1 += transaction.value,
            None => {
                positions.insert(&transaction.category, totals.len());
                totals.push((transaction.category.clone(), transaction.value));
            }
        }
    }

    totals
}

/// The month of `date` as a "YYYY-MM" key, e.g. "2024-03".
pub fn month_key(date: Date) -> String {
    format!("{:04}-{:02}", date.year(), u8::from(date.month()))
}

/// The distinct months of `transactions` as "YYYY-MM" keys, newest first.
pub fn distinct_months(transactions: &[Transaction]) -> Vec<String> {
    let mut months: Vec<String> = transactions
        .iter()
        .map(|transaction| month_key(transaction.date))
        .collect();

    months.sort_unstable_by(|a, b| b.cmp(a));
    months.dedup();
    months
}

/// The transactions whose ISO date starts with `month`, e.g. "2024-03".
///
/// An empty or missing `month` keeps every transaction.
pub fn filter_by_month(transactions: &[Transaction], month: Option<&str>) -> Vec<Transaction> {
    match month {
        Some(month) if !month.is_empty() => transactions
            .iter()
            .filter(|transaction| transaction.iso_date().starts_with(month))
            .cloned()
            .collect(),
        _ => transactions.to_vec(),
    }
}

/// A human readable name for a "YYYY-MM" key, e.g. "março de 2024".
///
/// Keys that are not of the form "YYYY-MM" are returned unchanged.
pub fn month_label(key: &str) -> String {
    let Some((year, month)) = key.split_once('-') else {
        return key.to_owned();
    };

    let (Ok(year), Some(month)) = (
        year.parse::<i32>(),
        month.parse::<u8>().ok().and_then(|m| Month::try_from(m).ok()),
    ) else {
        return key.to_owned();
    };

    format!("{} de {year}", month_name(month))
}

fn month_name(month: Month) -> &'static str {
    match month {
        Month::January => "janeiro",
        Month::February => "fevereiro",
        Month::March => "março",
        Month::April => "abril",
        Month::May => "maio",
        Month::June => "junho",
        Month::July => "julho",
        Month::August => "agosto",
        Month::September => "setembro",
        Month::October => "outubro",
        Month::November => "novembro",
        Month::December => "dezembro",
    }
}
