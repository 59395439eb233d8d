//! Controle Financeiro is a small web app for tracking personal income,
//! expenses and card charges.
//!
//! This library provides a server that directly serves HTML pages: a summary
//! dashboard, a form for creating and editing transactions, and a list of
//! transactions with month filtering and CSV export.
//!
//! All transactions are persisted as a single JSON document in a key-value
//! store, see [KeyValueStore] and [TransactionStore].

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod aggregation;
mod alert;
mod app_state;
mod csv_export;
mod dashboard;
mod db;
mod endpoints;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod routing;
mod storage;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use routing::build_router;
pub use storage::{KeyValueAccess, KeyValueStore, SqliteKeyValueStore};
pub use transaction::{
    Transaction, TransactionFields, TransactionId, TransactionStore, TransactionType,
};

use crate::{
    alert::Alert, internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the ID in the
    /// URL refers to an existing transaction.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// An error occurred while writing the CSV document.
    #[error("could not write CSV: {0}")]
    CsvError(String),

    /// Tried to export a CSV file while there are no transactions at all.
    #[error("there are no transactions to export")]
    NothingToExport,

    /// Tried to export a CSV file for a month without transactions.
    #[error("there are no transactions in the month {0}")]
    NoTransactionsInMonth(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::JSONSerializationError(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Fuso horário inválido",
                fix: &format!(
                    "Não foi possível obter o fuso horário \"{timezone}\". Verifique as \
                    configurações do servidor e use um nome canônico, como \"America/Sao_Paulo\"."
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            Error::NothingToExport => nothing_to_export_page("Nenhuma transação para exportar."),
            Error::NoTransactionsInMonth(_) => nothing_to_export_page("Nenhuma transação nesse mês."),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

fn nothing_to_export_page(details: &str) -> Response {
    let page = html::error_view(
        "Nada para exportar",
        "422",
        details,
        "Escolha outro mês na lista de transações.",
    );

    (StatusCode::UNPROCESSABLE_ENTITY, Html(page.into_string())).into_response()
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::NothingToExport => Alert {
                message: "Nada para exportar",
                details: "Nenhuma transação para exportar.",
            }
            .into_response_with_status(StatusCode::UNPROCESSABLE_ENTITY),
            Error::NoTransactionsInMonth(_) => Alert {
                message: "Nada para exportar",
                details: "Nenhuma transação nesse mês.",
            }
            .into_response_with_status(StatusCode::UNPROCESSABLE_ENTITY),
            Error::NotFound => Alert {
                message: "Transação não encontrada",
                details: "Atualize a página para ver se a transação já foi excluída.",
            }
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::InvalidTimezoneError(timezone) => Alert {
                message: "Fuso horário inválido",
                details: &format!(
                    "Não foi possível obter o fuso horário \"{timezone}\". Verifique as \
                    configurações do servidor."
                ),
            }
            .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                Alert {
                    message: "Algo deu errado",
                    details: "Ocorreu um erro inesperado, verifique os logs do servidor.",
                }
                .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}
