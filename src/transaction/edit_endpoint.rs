//! Defines the endpoint for updating an existing transaction.

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{
    AppState, endpoints,
    transaction::{
        TransactionId, TransactionStore,
        form::{FormMode, FormValues, TransactionForm, transaction_form},
    },
};

/// The state needed to edit a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    /// The store for managing transactions.
    pub transaction_store: TransactionStore,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
        }
    }
}

/// A route handler for replacing the fields of a transaction, redirects to
/// the transactions view on success.
///
/// Updating a transaction that no longer exists changes nothing.
pub async fn edit_transaction_endpoint(
    State(state): State<EditTransactionState>,
    Path(transaction_id): Path<TransactionId>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let fields = match form.validate() {
        Ok(fields) => fields,
        Err(errors) => {
            tracing::debug!("rejected update to transaction {transaction_id}: {errors:?}");
            return transaction_form(
                &FormMode::Edit(transaction_id),
                &FormValues::from(&form),
                &errors,
            )
            .into_response();
        }
    };

    if let Err(error) = state.transaction_store.update(&transaction_id, fields) {
        tracing::error!("could not update transaction {transaction_id}: {error}");
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
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
    use axum_extra::extract::Form;
    use time::macros::date;

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{
            assert_form_error_message, assert_hx_endpoint, assert_hx_redirect,
            assert_status_ok, get_test_transaction_store, must_get_form, parse_html_fragment,
        },
        transaction::{TransactionFields, TransactionId, TransactionType, form::TransactionForm},
    };

    use super::{EditTransactionState, edit_transaction_endpoint};

    fn income_form() -> TransactionForm {
        TransactionForm {
            type_: Some("entrada".to_owned()),
            value: Some("2500".to_owned()),
            date: Some("2024-04-01".to_owned()),
            description: Some("Salário".to_owned()),
            category: Some("Trabalho".to_owned()),
            card_name: Some("ignored".to_owned()),
        }
    }

    #[tokio::test]
    async fn replaces_fields_and_keeps_id() {
        let store = get_test_transaction_store();
        let original = store
            .create(
                TransactionFields::build(
                    TransactionType::Cartao,
                    10.0,
                    date!(2024 - 03 - 01),
                    "Cinema",
                    "Lazer",
                )
                .card_name(Some("Visa")),
            )
            .unwrap();
        let state = EditTransactionState {
            transaction_store: store.clone(),
        };

        let response = edit_transaction_endpoint(
            State(state),
            Path(original.id.clone()),
            Form(income_form()),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::TRANSACTIONS_VIEW);
        let transactions = store.load_all().unwrap();
        assert_eq!(transactions.len(), 1);
        let updated = &transactions[0];
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.type_, TransactionType::Entrada);
        assert_eq!(updated.value, 2500.0);
        assert_eq!(updated.date, date!(2024 - 04 - 01));
        assert_eq!(updated.card_name, None);
    }

    #[tokio::test]
    async fn missing_transaction_is_silently_ignored() {
        let store = get_test_transaction_store();
        let state = EditTransactionState {
            transaction_store: store.clone(),
        };

        let response = edit_transaction_endpoint(
            State(state),
            Path(TransactionId::from("missing")),
            Form(income_form()),
        )
        .await
        .into_response();

        assert_hx_redirect(&response, endpoints::TRANSACTIONS_VIEW);
        assert_eq!(store.load_all(), Ok(Vec::new()));
    }

    #[tokio::test]
    async fn invalid_form_rerenders_edit_form() {
        let store = get_test_transaction_store();
        let original = store
            .create(TransactionFields::build(
                TransactionType::Saida,
                10.0,
                date!(2024 - 03 - 01),
                "Cinema",
                "Lazer",
            ))
            .unwrap();
        let state = EditTransactionState {
            transaction_store: store.clone(),
        };
        let form = TransactionForm {
            value: Some("0".to_owned()),
            ..income_form()
        };

        let response =
            edit_transaction_endpoint(State(state), Path(original.id.clone()), Form(form))
                .await
                .into_response();

        assert_status_ok(&response);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_hx_endpoint(
            &form,
            &format_endpoint(endpoints::TRANSACTION, original.id.as_str()),
            "hx-put",
        );
        assert_form_error_message(&form, "Informe um valor maior que zero.");
        assert_eq!(store.load_all(), Ok(vec![original]));
    }
}
