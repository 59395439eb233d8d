//! Defines the core data model for transactions and how it is stored as JSON.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};
use unicode_segmentation::UnicodeSegmentation;
use uuid::Uuid;

// ============================================================================
// MODELS
// ============================================================================

/// The format used for dates in storage and in date inputs, e.g. "2024-03-15".
pub(crate) const ISO_DATE_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]");

time::serde::format_description!(iso_date, Date, ISO_DATE_FORMAT);

/// The format used for showing dates to people, e.g. "15/03/2024".
const BR_DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[day]/[month]/[year]");

/// The minimum number of characters in a transaction description.
pub const MIN_DESCRIPTION_LENGTH: usize = 2;

/// Opaque unique identifier of a [Transaction].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Mint a new random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The identifier as a string, e.g. for building URLs.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for TransactionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TransactionId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether money came in, went out, or was charged to a card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Income.
    #[default]
    Entrada,
    /// An expense paid directly.
    Saida,
    /// A charge to a credit card.
    Cartao,
}

impl TransactionType {
    /// All transaction types in display order.
    pub const ALL: [TransactionType; 3] = [
        TransactionType::Entrada,
        TransactionType::Saida,
        TransactionType::Cartao,
    ];

    /// The tag used in storage, forms and CSV files, e.g. "entrada".
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Entrada => "entrada",
            TransactionType::Saida => "saida",
            TransactionType::Cartao => "cartao",
        }
    }

    /// The human readable name of a single transaction of this type.
    pub fn label(self) -> &'static str {
        match self {
            TransactionType::Entrada => "Entrada",
            TransactionType::Saida => "Saída",
            TransactionType::Cartao => "Cartão",
        }
    }

    /// The human readable name for the total of this type.
    pub fn plural_label(self) -> &'static str {
        match self {
            TransactionType::Entrada => "Entradas",
            TransactionType::Saida => "Saídas",
            TransactionType::Cartao => "Cartões",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An income, expense or card charge.
///
/// To create a new `Transaction`, build a [TransactionFields] and pass it to
/// [crate::TransactionStore::create], which mints the ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The kind of transaction.
    #[serde(rename = "type")]
    pub type_: TransactionType,
    /// The amount of money, always positive.
    pub value: f64,
    /// When the transaction happened.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The category used to group transactions in summaries.
    pub category: String,
    /// The card the transaction was charged to, only set for card charges.
    #[serde(rename = "cardName", default, skip_serializing_if = "Option::is_none")]
    pub card_name: Option<String>,
}

impl Transaction {
    /// Combine `id` with `fields` into a transaction.
    pub fn from_fields(id: TransactionId, fields: TransactionFields) -> Self {
        Self {
            id,
            type_: fields.type_,
            value: fields.value,
            date: fields.date,
            description: fields.description,
            category: fields.category,
            card_name: fields.card_name,
        }
    }

    /// The date formatted as an ISO date, e.g. "2024-03-15".
    pub fn iso_date(&self) -> String {
        format_iso_date(self.date)
    }

    /// Check the invariants that hold for every stored transaction.
    ///
    /// Transactions read back from storage were written by older versions of
    /// the app or edited by hand, so they are checked before use.
    pub fn is_valid(&self) -> bool {
        self.value.is_finite()
            && self.value > 0.0
            && description_is_long_enough(&self.description)
            && !self.category.trim().is_empty()
    }
}

/// All the fields of a [Transaction] except its ID.
///
/// Created from a validated form submission, see
/// `TransactionForm::validate`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionFields {
    /// The kind of transaction.
    pub type_: TransactionType,
    /// The amount of money, must be positive.
    pub value: f64,
    /// When the transaction happened.
    pub date: Date,
    /// At least two characters describing the transaction.
    pub description: String,
    /// A non-empty category.
    pub category: String,
    /// The card the transaction was charged to.
    pub card_name: Option<String>,
}

impl TransactionFields {
    /// Create a new set of transaction fields without a card name.
    ///
    /// Shortcut for building the struct by hand, mostly useful in tests.
    pub fn build(
        type_: TransactionType,
        value: f64,
        date: Date,
        description: &str,
        category: &str,
    ) -> Self {
        Self {
            type_,
            value,
            date,
            description: description.to_owned(),
            category: category.to_owned(),
            card_name: None,
        }
    }

    /// Set the card name.
    ///
    /// The card name is only kept for [TransactionType::Cartao], and an empty
    /// name is treated as no name.
    pub fn card_name(mut self, card_name: Option<&str>) -> Self {
        self.card_name = normalize_card_name(self.type_, card_name);
        self
    }
}

impl From<Transaction> for TransactionFields {
    fn from(transaction: Transaction) -> Self {
        Self {
            type_: transaction.type_,
            value: transaction.value,
            date: transaction.date,
            description: transaction.description,
            category: transaction.category,
            card_name: transaction.card_name,
        }
    }
}

pub(crate) fn normalize_card_name(
    type_: TransactionType,
    card_name: Option<&str>,
) -> Option<String> {
    match (type_, card_name.map(str::trim)) {
        (TransactionType::Cartao, Some(name)) if !name.is_empty() => Some(name.to_owned()),
        _ => None,
    }
}

pub(crate) fn description_is_long_enough(description: &str) -> bool {
    description.trim().graphemes(true).count() >= MIN_DESCRIPTION_LENGTH
}

pub(crate) fn format_iso_date(date: Date) -> String {
    // Formatting a date with only year, month and day components cannot fail.
    date.format(ISO_DATE_FORMAT).unwrap_or_else(|_| date.to_string())
}

/// Format `date` the Brazilian way, e.g. "15/03/2024".
pub(crate) fn format_br_date(date: Date) -> String {
    date.format(BR_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::date;

    use super::{Transaction, TransactionFields, TransactionId, TransactionType};

    #[test]
    fn serializes_with_original_field_names() {
        let transaction = Transaction::from_fields(
            TransactionId::from("abc"),
            TransactionFields::build(
                TransactionType::Cartao,
                42.5,
                date!(2024 - 03 - 05),
                "Mercado",
                "Alimentação",
            )
            .card_name(Some("Nubank")),
        );

        let got = serde_json::to_value(&transaction).unwrap();

        assert_eq!(
            got,
            json!({
                "id": "abc",
                "type": "cartao",
                "value": 42.5,
                "date": "2024-03-05",
                "description": "Mercado",
                "category": "Alimentação",
                "cardName": "Nubank",
            })
        );
    }

    #[test]
    fn omits_missing_card_name() {
        let transaction = Transaction::from_fields(
            TransactionId::from("abc"),
            TransactionFields::build(
                TransactionType::Entrada,
                100.0,
                date!(2024 - 03 - 15),
                "Salário",
                "Trabalho",
            ),
        );

        let got = serde_json::to_value(&transaction).unwrap();

        assert!(got.get("cardName").is_none(), "got {got}");
    }

    #[test]
    fn deserializes_stored_transaction() {
        let stored = r#"{"id":"1","type":"saida","value":10,"date":"2024-01-05","description":"Ônibus","category":"Transporte"}"#;

        let got: Transaction = serde_json::from_str(stored).unwrap();

        assert_eq!(got.type_, TransactionType::Saida);
        assert_eq!(got.value, 10.0);
        assert_eq!(got.date, date!(2024 - 01 - 05));
        assert_eq!(got.card_name, None);
    }

    #[test]
    fn card_name_only_kept_for_card_charges() {
        let card = TransactionFields::build(
            TransactionType::Cartao,
            1.0,
            date!(2024 - 01 - 01),
            "ab",
            "c",
        )
        .card_name(Some(" Visa "));
        let expense = TransactionFields::build(
            TransactionType::Saida,
            1.0,
            date!(2024 - 01 - 01),
            "ab",
            "c",
        )
        .card_name(Some("Visa"));
        let empty = TransactionFields::build(
            TransactionType::Cartao,
            1.0,
            date!(2024 - 01 - 01),
            "ab",
            "c",
        )
        .card_name(Some(""));

        assert_eq!(card.card_name.as_deref(), Some("Visa"));
        assert_eq!(expense.card_name, None);
        assert_eq!(empty.card_name, None);
    }

    #[test]
    fn rejects_invalid_stored_values() {
        let valid = Transaction::from_fields(
            TransactionId::new(),
            TransactionFields::build(
                TransactionType::Saida,
                1.0,
                date!(2024 - 01 - 01),
                "ok",
                "Casa",
            ),
        );
        assert!(valid.is_valid());

        let zero_value = Transaction {
            value: 0.0,
            ..valid.clone()
        };
        let short_description = Transaction {
            description: "a".to_owned(),
            ..valid.clone()
        };
        let blank_category = Transaction {
            category: "  ".to_owned(),
            ..valid.clone()
        };

        assert!(!zero_value.is_valid());
        assert!(!short_description.is_valid());
        assert!(!blank_category.is_valid());
    }

    #[test]
    fn formats_dates_day_first() {
        assert_eq!(super::format_br_date(date!(2024 - 03 - 05)), "05/03/2024");
        assert_eq!(super::format_iso_date(date!(2024 - 03 - 05)), "2024-03-05");
    }

    #[test]
    fn new_ids_are_unique() {
        assert_ne!(TransactionId::new(), TransactionId::new());
    }
}
