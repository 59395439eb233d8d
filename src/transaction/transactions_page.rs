//! Defines the route handler for the page that lists transactions as a table.

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    AppState, Error,
    aggregation::{distinct_months, filter_by_month, month_label},
    csv_export::export_url,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_EDIT_STYLE, BUTTON_EXPORT_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency,
    },
    navigation::NavBar,
    transaction::{Transaction, TransactionStore, format_br_date},
};

/// The max number of graphemes to display in the transaction table rows before
/// truncating and displaying ellipses.
const MAX_DESCRIPTION_GRAPHEMES: usize = 32;

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    /// The store for reading transactions.
    pub transaction_store: TransactionStore,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
        }
    }
}

/// The query parameters for the transactions page.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionsQuery {
    /// Only show transactions in this month, e.g. "2024-03".
    pub month: Option<String>,
}

fn format_description(description: &str) -> (String, Option<&str>) {
    let description_length = description.graphemes(true).count();

    if description_length <= MAX_DESCRIPTION_GRAPHEMES {
        (description.to_owned(), None)
    } else {
        let truncated: String = description
            .graphemes(true)
            .take(MAX_DESCRIPTION_GRAPHEMES - 3)
            .collect();
        let truncated = truncated + "...";
        (truncated, Some(description))
    }
}

fn month_filter_view(months: &[String], selected_month: Option<&str>) -> Markup {
    html! {
        form
            method="get"
            action=(endpoints::TRANSACTIONS_VIEW)
            class="flex items-center gap-2"
        {
            label for="month" class=(FORM_LABEL_STYLE) { "Filtrar por mês:" }

            select
                name="month"
                id="month"
                onchange="this.form.submit()"
                class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" selected[selected_month.is_none()] { "Todos" }

                @for month in months {
                    option
                        value=(month)
                        selected[selected_month == Some(month.as_str())]
                    {
                        (month_label(month))
                    }
                }
            }
        }
    }
}

fn transaction_row_view(transaction: &Transaction) -> Markup {
    let (description, tooltip) = format_description(&transaction.description);
    let id = transaction.id.as_str();

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
        {
            td class=(TABLE_CELL_STYLE)
            {
                time datetime=(transaction.iso_date()) { (format_br_date(transaction.date)) }
            }
            td class=(TABLE_CELL_STYLE) { (transaction.type_.label()) }
            td class=(TABLE_CELL_STYLE) title=[tooltip] { (description) }
            td class=(TABLE_CELL_STYLE) { (transaction.category) }
            td class="px-6 py-4 text-right" { (format_currency(transaction.value)) }
            td class=(TABLE_CELL_STYLE) { (transaction.card_name.as_deref().unwrap_or("-")) }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    button
                        hx-post=(format_endpoint(endpoints::EDIT_TRANSACTION, id))
                        hx-target-error="#alert-container"
                        class=(BUTTON_EDIT_STYLE)
                    {
                        "Editar"
                    }

                    button
                        hx-delete=(format_endpoint(endpoints::TRANSACTION, id))
                        hx-confirm="Tem certeza que deseja excluir?"
                        hx-target="closest tr"
                        hx-target-error="#alert-container"
                        hx-swap="delete"
                        class=(BUTTON_DELETE_STYLE)
                    {
                        "Excluir"
                    }
                }
            }
        }
    }
}

fn transactions_view(
    transactions: &[Transaction],
    months: &[String],
    selected_month: Option<&str>,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let empty_message = if selected_month.is_some() {
        "Nenhuma transação nesse mês."
    } else {
        "Nenhuma transação cadastrada."
    };
    let export_text = if selected_month.is_some() {
        "Exportar do Mês Atual"
    } else {
        "Exportar Todas"
    };

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-xl space-y-4"
            {
                div class="flex flex-wrap items-center justify-between gap-4"
                {
                    h2 class="text-xl font-bold" { "Transações" }

                    a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                    {
                        "Nova Transação"
                    }
                }

                div class="flex flex-wrap items-center justify-between gap-4"
                {
                    (month_filter_view(months, selected_month))

                    button
                        hx-get=(export_url(selected_month))
                        hx-target-error="#alert-container"
                        class=(BUTTON_EXPORT_STYLE)
                    {
                        (export_text)
                    }
                }

                div class="overflow-x-auto"
                {
                    table class="w-full my-2 text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Data" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Tipo" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Descrição" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Categoria" }
                                th scope="col" class="px-6 py-3 text-right" { "Valor" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Cartão" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Ações" }
                            }
                        }

                        tbody
                        {
                            @for transaction in transactions {
                                (transaction_row_view(transaction))
                            }

                            @if transactions.is_empty() {
                                tr
                                {
                                    td
                                        colspan="7"
                                        data-empty-state="true"
                                        class="px-6 py-4 text-center"
                                    {
                                        (empty_message)
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    base("Transações", &[], &content)
}

/// Renders the list of transactions, optionally only those in one month.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Response, Error> {
    let transactions = state
        .transaction_store
        .load_all()
        .inspect_err(|error| tracing::error!("could not load transactions: {error}"))?;

    let selected_month = query.month.as_deref().filter(|month| !month.is_empty());
    let months = distinct_months(&transactions);
    let shown = filter_by_month(&transactions, selected_month);

    Ok(transactions_view(&shown, &months, selected_month).into_response())
}
