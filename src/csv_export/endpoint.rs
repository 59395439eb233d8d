//! Defines the endpoint for downloading transactions as a CSV file.

use axum::{
    extract::{FromRef, Query, State},
    http::{
        StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};
use axum_htmx::{HxRedirect, HxRequest};
use serde::Deserialize;

use crate::{
    AppState, Error,
    csv_export::{CsvExport, export_csv},
    endpoints,
    transaction::TransactionStore,
};

/// The state needed to export transactions.
#[derive(Debug, Clone)]
pub struct ExportTransactionsState {
    /// The store for reading transactions.
    pub transaction_store: TransactionStore,
}

impl FromRef<AppState> for ExportTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
        }
    }
}

/// The query parameters for the export endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    /// Only export transactions in this month, e.g. "2024-03".
    pub month: Option<String>,
}

/// The URL that downloads the transactions of `month`, or all transactions.
///
/// `month` comes from the page's query string, so it is percent-encoded.
pub(crate) fn export_url(month: Option<&str>) -> String {
    let Some(month) = month else {
        return endpoints::EXPORT_TRANSACTIONS.to_owned();
    };

    match serde_urlencoded::to_string([("month", month)]) {
        Ok(query) => format!("{}?{query}", endpoints::EXPORT_TRANSACTIONS),
        Err(error) => {
            tracing::warn!("could not encode month {month:?} for the export URL: {error}");
            endpoints::EXPORT_TRANSACTIONS.to_owned()
        }
    }
}

/// Whether `month` looks like "YYYY-MM".
fn is_month_key(month: &str) -> bool {
    let bytes = month.as_bytes();

    bytes.len() == 7
        && bytes[4] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(index, byte)| index == 4 || byte.is_ascii_digit())
}

/// A route handler for exporting transactions as a CSV file.
///
/// HTMX requests only check that there is something to export: they get an
/// error alert, or a redirect to this same URL which the browser then
/// downloads as a plain request.
pub async fn export_transactions_endpoint(
    State(state): State<ExportTransactionsState>,
    HxRequest(is_htmx_request): HxRequest,
    Query(query): Query<ExportQuery>,
) -> Response {
    let month = query.month.as_deref().filter(|month| !month.is_empty());

    let export = match build_export(&state.transaction_store, month) {
        Ok(export) => export,
        Err(error) if is_htmx_request => return error.into_alert_response(),
        Err(error) => return error.into_response(),
    };

    if is_htmx_request {
        return (HxRedirect(export_url(month)), StatusCode::SEE_OTHER).into_response();
    }

    tracing::info!(
        "exporting {} bytes as {}",
        export.contents.len(),
        export.file_name
    );

    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.file_name),
            ),
        ],
        export.contents,
    )
        .into_response()
}

fn build_export(
    store: &TransactionStore,
    month: Option<&str>,
) -> Result<CsvExport, Error> {
    let transactions = store
        .load_all()
        .inspect_err(|error| tracing::error!("could not load transactions: {error}"))?;

    if let Some(month) = month {
        if !is_month_key(month) {
            tracing::warn!("refusing to export invalid month {month:?}");
            return Err(Error::NoTransactionsInMonth(month.to_owned()));
        }
    }

    export_csv(&transactions, month)
}
