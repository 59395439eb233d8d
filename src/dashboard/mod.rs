//! Dashboard module
//!
//! Provides a summary page with totals per transaction type, the balance and
//! charts of where the money goes.

mod cards;
mod charts;
mod handlers;

pub use handlers::get_dashboard_page;
