#![allow(missing_docs)]

pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{db::initialize, storage::SqliteKeyValueStore, transaction::TransactionStore};

pub(crate) use form::{
    assert_form_error_message, assert_form_input, assert_form_input_with_value,
    assert_form_submit_button_with_text, assert_hx_endpoint, must_get_form,
};
pub(crate) use html::{assert_valid_html, parse_html_document, parse_html_fragment};
pub(crate) use http::{
    assert_content_type, assert_hx_redirect, assert_status_ok, get_body_text, get_header,
};

/// A transaction store backed by a fresh in-memory database.
pub(crate) fn get_test_transaction_store() -> TransactionStore {
    let connection = Connection::open_in_memory().expect("Could not open in-memory database");
    initialize(&connection).expect("Could not initialize database");

    TransactionStore::new(SqliteKeyValueStore::new(Arc::new(Mutex::new(connection))))
}
