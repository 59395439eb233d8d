//! Defines the endpoint that hands a transaction over to the transaction form for editing.

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    AppState, Error, endpoints,
    transaction::{TransactionId, TransactionStore},
};

/// The state needed to stage a transaction for editing.
#[derive(Debug, Clone)]
pub struct StageEditState {
    /// The store for managing transactions.
    pub transaction_store: TransactionStore,
}

impl FromRef<AppState> for StageEditState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
        }
    }
}

/// A route handler that puts a transaction in the edit slot and redirects to
/// the transaction form, which picks it up.
pub async fn stage_edit_endpoint(
    State(state): State<StageEditState>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let transaction = match state.transaction_store.get(&transaction_id) {
        Ok(Some(transaction)) => transaction,
        Ok(None) => {
            tracing::warn!("tried to edit transaction {transaction_id} which does not exist");
            return Error::NotFound.into_alert_response();
        }
        Err(error) => {
            tracing::error!("could not get transaction {transaction_id}: {error}");
            return error.into_alert_response();
        }
    };

    if let Err(error) = state.transaction_store.stage_edit(&transaction) {
        tracing::error!("could not stage transaction {transaction_id} for editing: {error}");
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::NEW_TRANSACTION_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use time::macros::date;

    use crate::{
        endpoints,
        test_utils::{assert_hx_redirect, get_test_transaction_store},
        transaction::{TransactionFields, TransactionId, TransactionType},
    };

    use super::{StageEditState, stage_edit_endpoint};

    #[tokio::test]
    async fn stages_transaction_and_redirects_to_form() {
        let store = get_test_transaction_store();
        let transaction = store
            .create(TransactionFields::build(
                TransactionType::Entrada,
                100.0,
                date!(2024 - 03 - 15),
                "Salário",
                "Trabalho",
            ))
            .unwrap();
        let state = StageEditState {
            transaction_store: store.clone(),
        };

        let response = stage_edit_endpoint(State(state), Path(transaction.id.clone()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::NEW_TRANSACTION_VIEW);
        assert_eq!(store.take_editing(), Ok(Some(transaction)));
    }

    #[tokio::test]
    async fn unknown_transaction_is_not_found() {
        let store = get_test_transaction_store();
        let state = StageEditState {
            transaction_store: store.clone(),
        };

        let response = stage_edit_endpoint(State(state), Path(TransactionId::from("missing")))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(store.take_editing(), Ok(None));
    }
}
