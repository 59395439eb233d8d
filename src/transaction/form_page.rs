//! Defines the route handler for the page for creating or editing a transaction.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error, endpoints,
    html::{FORM_CONTAINER_STYLE, base, currency_input_styles},
    navigation::NavBar,
    timezone::local_today,
    transaction::{
        TransactionStore,
        form::{FormErrors, FormMode, FormValues, transaction_form},
    },
};

/// The state needed for the transaction form page.
#[derive(Debug, Clone)]
pub struct TransactionFormPageState {
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
    /// The store holding the transaction staged for editing.
    pub transaction_store: TransactionStore,
}

impl FromRef<AppState> for TransactionFormPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            transaction_store: state.transaction_store.clone(),
        }
    }
}

fn transaction_form_view(mode: &FormMode, values: &FormValues) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html();
    let form = transaction_form(mode, values, &FormErrors::default());

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            (form)
        }
    };

    base(mode.title(), &[currency_input_styles()], &content)
}

/// Renders the form for a new transaction, or for the transaction staged for
/// editing if there is one.
///
/// Loading the page empties the edit slot, so reloading it afterwards shows
/// an empty form.
pub async fn get_transaction_form_page(
    State(state): State<TransactionFormPageState>,
) -> Result<Response, Error> {
    let editing = state
        .transaction_store
        .take_editing()
        .inspect_err(|error| tracing::error!("could not read the edit slot: {error}"))?;

    let (mode, values) = match editing {
        Some(transaction) => (
            FormMode::Edit(transaction.id.clone()),
            FormValues::from(&transaction),
        ),
        None => (
            FormMode::Create,
            FormValues::new(local_today(&state.local_timezone)?),
        ),
    };

    Ok(transaction_form_view(&mode, &values).into_response())
}

#[cfg(test)]
mod view_tests {
    use axum::extract::State;
    use time::macros::date;

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{
            assert_content_type, assert_form_input, assert_form_input_with_value,
            assert_form_submit_button_with_text, assert_hx_endpoint, assert_status_ok,
            assert_valid_html, get_test_transaction_store, must_get_form, parse_html_document,
        },
        timezone::local_today,
        transaction::{TransactionFields, TransactionType},
    };

    use super::{TransactionFormPageState, get_transaction_form_page};

    #[tokio::test]
    async fn renders_empty_create_form() {
        let state = TransactionFormPageState {
            local_timezone: "Etc/UTC".to_owned(),
            transaction_store: get_test_transaction_store(),
        };

        let response = get_transaction_form_page(State(state)).await.unwrap();

        assert_status_ok(&response);
        assert_content_type(&response, "text/html; charset=utf-8");
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let form = must_get_form(&document);
        assert_hx_endpoint(&form, endpoints::TRANSACTIONS_API, "hx-post");
        assert_form_input(&form, "value", "number");
        assert_form_submit_button_with_text(&form, "Salvar");
        let today = local_today("Etc/UTC").unwrap().to_string();
        assert_form_input_with_value(&form, "date", "date", &today);
    }

    #[tokio::test]
    async fn consumes_staged_transaction() {
        let store = get_test_transaction_store();
        let transaction = store
            .create(
                TransactionFields::build(
                    TransactionType::Saida,
                    30.0,
                    date!(2024 - 03 - 20),
                    "Mercado",
                    "Alimentação",
                ),
            )
            .unwrap();
        store.stage_edit(&transaction).unwrap();
        let state = TransactionFormPageState {
            local_timezone: "Etc/UTC".to_owned(),
            transaction_store: store.clone(),
        };

        let response = get_transaction_form_page(State(state)).await.unwrap();

        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let form = must_get_form(&document);
        assert_hx_endpoint(
            &form,
            &format_endpoint(endpoints::TRANSACTION, transaction.id.as_str()),
            "hx-put",
        );
        assert_form_input_with_value(&form, "value", "number", "30.00");
        assert_form_input_with_value(&form, "date", "date", "2024-03-20");
        assert_form_input_with_value(&form, "description", "text", "Mercado");
        assert_form_submit_button_with_text(&form, "Atualizar");
        assert_eq!(store.take_editing(), Ok(None));
    }

    #[tokio::test]
    async fn invalid_timezone_is_an_error() {
        let state = TransactionFormPageState {
            local_timezone: "Not/A_Timezone".to_owned(),
            transaction_store: get_test_transaction_store(),
        };

        let result = get_transaction_form_page(State(state)).await;

        assert!(result.is_err());
    }
}
