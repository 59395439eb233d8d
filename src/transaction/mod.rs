//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the fields used to create or update one
//! - The `TransactionStore` for persisting transactions and the edit slot
//! - The form, list page and endpoints for managing transactions

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod form;
mod form_page;
mod stage_edit_endpoint;
mod store;
mod transactions_page;

pub use core::{Transaction, TransactionFields, TransactionId, TransactionType};
pub(crate) use core::format_br_date;
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use form_page::get_transaction_form_page;
pub use stage_edit_endpoint::stage_edit_endpoint;
pub use store::TransactionStore;
pub use transactions_page::get_transactions_page;
