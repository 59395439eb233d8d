//! Persists the list of transactions and the edit handoff slot in a [KeyValueStore].

use std::collections::HashSet;

use serde_json::Value;

use crate::{
    Error,
    storage::{KeyValueAccess, KeyValueStore, SqliteKeyValueStore},
    transaction::core::{Transaction, TransactionFields, TransactionId},
};

/// The key holding the JSON array of all transactions.
pub const TRANSACTIONS_KEY: &str = "transacoes";
/// The key holding the transaction staged for editing in the transaction form.
pub const EDITING_KEY: &str = "transacaoEditando";

/// Loads, creates, updates and deletes transactions.
///
/// All transactions are stored as one JSON array and every mutation rewrites
/// the whole array while holding exclusive access to the underlying store.
#[derive(Debug, Clone)]
pub struct TransactionStore<S: KeyValueStore = SqliteKeyValueStore> {
    storage: S,
}

impl<S: KeyValueStore> TransactionStore<S> {
    /// Create a transaction store on top of `storage`.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Get all stored transactions in insertion order.
    ///
    /// Missing or unparsable data yields an empty list and stored entries
    /// that are not valid transactions are skipped.
    ///
    /// # Errors
    /// Returns an error if the underlying storage could not be read.
    pub fn load_all(&self) -> Result<Vec<Transaction>, Error> {
        self.storage.exclusive(read_transactions)
    }

    /// Get the transaction with `id`, if it exists.
    ///
    /// # Errors
    /// Returns an error if the underlying storage could not be read.
    pub fn get(&self, id: &TransactionId) -> Result<Option<Transaction>, Error> {
        let transactions = self.load_all()?;

        Ok(transactions
            .into_iter()
            .find(|transaction| &transaction.id == id))
    }

    /// Store a new transaction built from `fields` and return it with its new ID.
    ///
    /// # Errors
    /// Returns an error if the underlying storage could not be read or written.
    pub fn create(&self, fields: TransactionFields) -> Result<Transaction, Error> {
        self.storage.exclusive(|storage| {
            let mut transactions = read_transactions(storage)?;
            let transaction = Transaction::from_fields(TransactionId::new(), fields);
            transactions.push(transaction.clone());
            write_transactions(storage, &transactions)?;

            Ok(transaction)
        })
    }

    /// Replace every field except the ID of the transaction with `id`.
    ///
    /// Returns `None` and leaves the stored list unchanged if no transaction
    /// has the given `id`.
    ///
    /// # Errors
    /// Returns an error if the underlying storage could not be read or written.
    pub fn update(
        &self,
        id: &TransactionId,
        fields: TransactionFields,
    ) -> Result<Option<Transaction>, Error> {
        self.storage.exclusive(|storage| {
            let mut transactions = read_transactions(storage)?;

            let Some(slot) = transactions
                .iter_mut()
                .find(|transaction| &transaction.id == id)
            else {
                tracing::warn!("tried to update transaction {id} which does not exist");
                return Ok(None);
            };

            *slot = Transaction::from_fields(id.clone(), fields);
            let updated = slot.clone();
            write_transactions(storage, &transactions)?;

            Ok(Some(updated))
        })
    }

    /// Remove the transaction with `id`.
    ///
    /// Returns whether a transaction was removed. Deleting a missing
    /// transaction leaves the stored list unchanged.
    ///
    /// # Errors
    /// Returns an error if the underlying storage could not be read or written.
    pub fn delete(&self, id: &TransactionId) -> Result<bool, Error> {
        self.storage.exclusive(|storage| {
            let mut transactions = read_transactions(storage)?;
            let count_before = transactions.len();
            transactions.retain(|transaction| &transaction.id != id);

            if transactions.len() == count_before {
                tracing::debug!("tried to delete transaction {id} which does not exist");
                return Ok(false);
            }

            write_transactions(storage, &transactions)?;

            Ok(true)
        })
    }

    /// Put `transaction` in the edit slot, replacing whatever was there.
    ///
    /// # Errors
    /// Returns an error if the transaction could not be serialized or stored.
    pub fn stage_edit(&self, transaction: &Transaction) -> Result<(), Error> {
        let json = serde_json::to_string(transaction)?;

        self.storage.set(EDITING_KEY, &json)
    }

    /// Take the transaction out of the edit slot, leaving the slot empty.
    ///
    /// An unparsable slot is cleared and treated as empty.
    ///
    /// # Errors
    /// Returns an error if the underlying storage could not be read or written.
    pub fn take_editing(&self) -> Result<Option<Transaction>, Error> {
        self.storage.exclusive(|storage| {
            let Some(json) = storage.get(EDITING_KEY)? else {
                return Ok(None);
            };

            storage.remove(EDITING_KEY)?;

            match serde_json::from_str::<Transaction>(&json) {
                Ok(transaction) if transaction.is_valid() => Ok(Some(transaction)),
                Ok(transaction) => {
                    tracing::warn!("discarding invalid staged transaction {}", transaction.id);
                    Ok(None)
                }
                Err(error) => {
                    tracing::warn!("discarding unparsable staged transaction: {error}");
                    Ok(None)
                }
            }
        })
    }
}

fn read_transactions(storage: &dyn KeyValueAccess) -> Result<Vec<Transaction>, Error> {
    let Some(json) = storage.get(TRANSACTIONS_KEY)? else {
        return Ok(Vec::new());
    };

    let entries = match serde_json::from_str::<Vec<Value>>(&json) {
        Ok(entries) => entries,
        Err(error) => {
            tracing::warn!("stored transactions are not a JSON array, ignoring them: {error}");
            return Ok(Vec::new());
        }
    };

    let mut seen_ids = HashSet::new();

    let transactions = entries
        .into_iter()
        .enumerate()
        .filter_map(
            |(index, entry)| match serde_json::from_value::<Transaction>(entry) {
                Ok(transaction) if !transaction.is_valid() => {
                    tracing::warn!(
                        "dropping stored transaction {} with invalid values",
                        transaction.id
                    );
                    None
                }
                // The first entry with an ID wins.
                Ok(transaction) if !seen_ids.insert(transaction.id.clone()) => {
                    tracing::warn!(
                        "dropping stored transaction #{index} with duplicate ID {}",
                        transaction.id
                    );
                    None
                }
                Ok(transaction) => Some(transaction),
                Err(error) => {
                    tracing::warn!("dropping malformed stored transaction #{index}: {error}");
                    None
                }
            },
        )
        .collect();

    Ok(transactions)
}

fn write_transactions(
    storage: &dyn KeyValueAccess,
    transactions: &[Transaction],
) -> Result<(), Error> {
    let json = serde_json::to_string(transactions)?;

    storage.set(TRANSACTIONS_KEY, &json)
}
