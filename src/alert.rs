//! Alerts for telling users why an action failed.
//!
//! Alerts are rendered as HTML fragments that HTMX swaps into the
//! `#alert-container` element of the base page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

const ALERT_STYLE: &str = "p-4 mb-4 text-sm rounded-lg border text-red-800 bg-red-50 \
    border-red-300 dark:bg-gray-800 dark:text-red-400 dark:border-red-800";

/// An error message with a short title and a longer explanation.
#[derive(Debug, Clone)]
pub struct Alert<'a> {
    pub message: &'a str,
    pub details: &'a str,
}

impl Alert<'_> {
    pub fn into_html(self) -> Markup {
        let Alert { message, details } = self;

        html! {
            div
                role="alert"
                class=(ALERT_STYLE)
                onclick="this.parentElement.classList.add('hidden')"
            {
                span class="font-semibold" { (message) }

                @if !details.is_empty() {
                    p { (details) }
                }
            }

            // Alerts are swapped into a hidden container, so reveal it.
            script { "document.getElementById('alert-container').classList.remove('hidden');" }
        }
    }

    pub fn into_response_with_status(self, status_code: StatusCode) -> Response {
        (status_code, self.into_html()).into_response()
    }
}
