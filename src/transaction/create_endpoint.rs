//! Defines the endpoint for creating a new transaction.

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{
    AppState, endpoints,
    transaction::{
        TransactionStore,
        form::{FormMode, FormValues, TransactionForm, transaction_form},
    },
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The store for managing transactions.
    pub transaction_store: TransactionStore,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
        }
    }
}

/// A route handler for creating a new transaction, redirects to transactions view on success.
///
/// An invalid submission responds with the form and its error messages.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let fields = match form.validate() {
        Ok(fields) => fields,
        Err(errors) => {
            tracing::debug!("rejected new transaction: {errors:?}");
            return transaction_form(&FormMode::Create, &FormValues::from(&form), &errors)
                .into_response();
        }
    };

    match state.transaction_store.create(fields) {
        Ok(transaction) => {
            tracing::info!("created transaction {}", transaction.id);
        }
        Err(error) => {
            tracing::error!("could not create transaction: {error}");
            return error.into_alert_response();
        }
    }

    (
        HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
