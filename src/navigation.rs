//! The navigation bar shown at the top of every page.

use maud::{Markup, html};

use crate::endpoints;

/// A link in the navigation bar.
///
/// It will change appearance if `is_current` is set to
/// `true`. Only one link should be set as active at any one time.
#[derive(Clone)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn into_html(self) -> Markup {
        let style = if self.is_current {
            "block py-2 px-3 text-white bg-emerald-700 rounded-sm sm:bg-transparent
        sm:text-emerald-700 sm:p-0 dark:text-white sm:dark:text-emerald-500"
        } else {
            "block py-2 px-3 text-gray-900 rounded-sm hover:bg-gray-100
        sm:hover:bg-transparent sm:border-0 sm:hover:text-emerald-700 sm:p-0
        dark:text-white sm:dark:hover:text-emerald-500 dark:hover:bg-gray-700
        dark:hover:text-white sm:dark:hover:bg-transparent"
        };

        html!(
            a
                href=(self.url)
                class=(style)
                aria-current=[self.is_current.then_some("page")]
            {
                (self.title)
            }
        )
    }
}

pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
}

impl NavBar<'_> {
    /// Get the navigation bar.
    ///
    /// If a link matches `active_endpoint`, then that link will be
    /// marked as active and displayed differently in the HTML.
    pub fn new(active_endpoint: &str) -> NavBar<'_> {
        let links = [
            (endpoints::DASHBOARD_VIEW, "Resumo"),
            (endpoints::TRANSACTIONS_VIEW, "Transações"),
            (endpoints::NEW_TRANSACTION_VIEW, "Nova Transação"),
        ]
        .into_iter()
        .map(|(url, title)| Link {
            url,
            title,
            is_current: active_endpoint == url,
        })
        .collect();

        NavBar { links }
    }

    pub fn into_html(self) -> Markup {
        // Template adapted from https://flowbite.com/docs/components/navbar/#default-navbar
        html!(
            nav class="bg-white border-gray-200 dark:bg-gray-900"
            {
                div
                    class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4"
                {
                    a
                        href=(endpoints::DASHBOARD_VIEW)
                        class="self-center text-2xl font-semibold whitespace-nowrap dark:text-white"
                    {
                        "Controle Financeiro"
                    }

                    ul
                        class="font-medium flex flex-col p-4 sm:p-0 mt-4
                        border border-gray-100 rounded bg-gray-50
                        sm:flex-row sm:space-x-8 rtl:space-x-reverse sm:mt-0
                        sm:border-0 sm:bg-white dark:bg-gray-800
                        sm:dark:bg-gray-900 dark:border-gray-700"
                    {
                        @for link in self.links {
                            li { (link.into_html()) }
                        }
                    }
                }
            }
        )
    }
}
