//! Dashboard HTTP handler and view rendering.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error,
    dashboard::{
        cards::summary_cards_view,
        charts::{ECHARTS_SCRIPT, build_dashboard_charts, charts_script, charts_view},
    },
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, HeadElement, base, link},
    navigation::NavBar,
    transaction::{Transaction, TransactionStore},
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The store for reading transactions.
    pub transaction_store: TransactionStore,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
        }
    }
}

/// Display a page with the totals, the balance and charts of all transactions.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let transactions = state
        .transaction_store
        .load_all()
        .inspect_err(|error| tracing::error!("could not load transactions: {error}"))?;

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);

    Ok(dashboard_view(nav_bar, &transactions).into_response())
}

fn quick_links_view() -> Markup {
    html!(
        div class="flex flex-wrap gap-4 mb-8"
        {
            a href=(endpoints::NEW_TRANSACTION_VIEW) class=(BUTTON_PRIMARY_STYLE)
            {
                "Nova Transação"
            }

            a href=(endpoints::TRANSACTIONS_VIEW) class=(BUTTON_SECONDARY_STYLE)
            {
                "Ver Transações"
            }
        }
    )
}

/// Shown in place of the charts until the first transaction is added.
fn no_data_view() -> Markup {
    let new_transaction_link = link(endpoints::NEW_TRANSACTION_VIEW, "nova transação");

    html!(
        div
            id="no-data"
            class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold"
            {
                "Nada por aqui ainda..."
            }

            p
            {
                "Os gráficos aparecem aqui quando houver transações.
                Comece cadastrando uma " (new_transaction_link) "."
            }
        }
    )
}

fn dashboard_view(nav_bar: NavBar, transactions: &[Transaction]) -> Markup {
    let nav_bar = nav_bar.into_html();
    let charts = if transactions.is_empty() {
        None
    } else {
        Some(build_dashboard_charts(transactions))
    };

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            h1 class="w-full text-2xl font-bold mb-4" { "Resumo" }

            (summary_cards_view(transactions))

            (quick_links_view())

            @match &charts {
                Some(charts) => { (charts_view(charts)) }
                None => { (no_data_view()) }
            }
        }
    );

    let scripts = match &charts {
        Some(charts) => vec![
            HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()),
            charts_script(charts),
        ],
        None => Vec::new(),
    };

    base("Resumo", &scripts, &content)
}
