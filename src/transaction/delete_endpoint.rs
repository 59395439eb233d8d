use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    AppState,
    transaction::{TransactionId, TransactionStore},
};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The store for managing transactions.
    transaction_store: TransactionStore,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
        }
    }
}

/// A route handler for deleting a transaction, responds with an empty body
/// that replaces the transaction's table row.
///
/// Deleting a transaction that does not exist is not an error.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    match state.transaction_store.delete(&transaction_id) {
        Ok(deleted) => {
            if deleted {
                tracing::info!("deleted transaction {transaction_id}");
            }

            // The status code has to be 200 OK or HTMX will not delete the table row.
            StatusCode::OK.into_response()
        }
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}
