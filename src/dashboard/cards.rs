//! Summary cards showing the total of each transaction type and the balance.

use maud::{Markup, html};

use crate::{
    aggregation::{balance, total_by_type},
    html::format_currency,
    transaction::{Transaction, TransactionType},
};

/// A single labelled amount on the dashboard.
struct SummaryCard {
    id: &'static str,
    title: &'static str,
    amount: f64,
    amount_class: &'static str,
}

fn type_amount_class(type_: TransactionType) -> &'static str {
    match type_ {
        TransactionType::Entrada => "text-green-700 dark:text-green-300",
        TransactionType::Saida => "text-red-700 dark:text-red-300",
        TransactionType::Cartao => "text-purple-700 dark:text-purple-300",
    }
}

fn balance_amount_class(amount: f64) -> &'static str {
    // Compare whole cents so float noise is not shown as a debt.
    if (amount * 100.0).round() < 0.0 {
        "text-red-700 dark:text-red-300"
    } else {
        "text-blue-700 dark:text-blue-300"
    }
}

fn build_cards(transactions: &[Transaction]) -> Vec<SummaryCard> {
    let mut cards: Vec<SummaryCard> = TransactionType::ALL
        .into_iter()
        .map(|type_| SummaryCard {
            id: type_.as_str(),
            title: type_.plural_label(),
            amount: total_by_type(transactions, type_),
            amount_class: type_amount_class(type_),
        })
        .collect();

    let balance = balance(transactions);
    cards.push(SummaryCard {
        id: "saldo",
        title: "Saldo Atual",
        amount: balance,
        amount_class: balance_amount_class(balance),
    });

    cards
}

/// Renders the income, expense, card charge and balance cards.
pub(super) fn summary_cards_view(transactions: &[Transaction]) -> Markup {
    let cards = build_cards(transactions);

    html! {
        section class="w-full mx-auto mb-8"
        {
            div class="grid grid-cols-2 lg:grid-cols-4 gap-4"
            {
                @for card in cards {
                    div
                        data-summary-card=(card.id)
                        class="rounded-lg border border-gray-200 bg-white p-4 shadow-sm
                            dark:border-gray-700 dark:bg-gray-800"
                    {
                        h3 class="text-sm font-medium text-gray-500 dark:text-gray-400"
                        {
                            (card.title)
                        }

                        p class={ "mt-2 text-2xl font-bold tabular-nums " (card.amount_class) }
                        {
                            (format_currency(card.amount))
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::transaction::{Transaction, TransactionFields, TransactionId, TransactionType};

    use super::summary_cards_view;

    fn transaction(type_: TransactionType, value: f64) -> Transaction {
        Transaction::from_fields(
            TransactionId::new(),
            TransactionFields::build(type_, value, date!(2024 - 03 - 15), "Teste", "Casa"),
        )
    }

    fn card_text(html: &Html, id: &str) -> String {
        let selector = Selector::parse(&format!("[data-summary-card={id}] p")).unwrap();

        html.select(&selector)
            .next()
            .unwrap_or_else(|| panic!("want card {id}"))
            .text()
            .collect::<String>()
            .trim()
            .to_owned()
    }

    #[test]
    fn shows_totals_and_balance() {
        let transactions = [
            transaction(TransactionType::Entrada, 1000.0),
            transaction(TransactionType::Saida, 200.0),
            transaction(TransactionType::Cartao, 150.0),
        ];

        let html = Html::parse_fragment(&summary_cards_view(&transactions).into_string());

        assert_eq!(card_text(&html, "entrada"), "R$ 1.000,00");
        assert_eq!(card_text(&html, "saida"), "R$ 200,00");
        assert_eq!(card_text(&html, "cartao"), "R$ 150,00");
        assert_eq!(card_text(&html, "saldo"), "R$ 650,00");
    }

    #[test]
    fn shows_zero_without_transactions() {
        let html = Html::parse_fragment(&summary_cards_view(&[]).into_string());

        for id in ["entrada", "saida", "cartao", "saldo"] {
            assert_eq!(card_text(&html, id), "R$ 0,00");
        }
    }

    #[test]
    fn negative_balance_is_red() {
        let transactions = [transaction(TransactionType::Saida, 50.0)];

        let html = Html::parse_fragment(&summary_cards_view(&transactions).into_string());
        let balance = html
            .select(&Selector::parse("[data-summary-card=saldo] p").unwrap())
            .next()
            .unwrap();

        assert_eq!(card_text(&html, "saldo"), "-R$ 50,00");
        assert!(
            balance
                .value()
                .attr("class")
                .unwrap_or_default()
                .contains("text-red-700")
        );
    }

    #[test]
    fn rounding_noise_is_a_zero_balance() {
        let transactions = [
            transaction(TransactionType::Entrada, 0.3),
            transaction(TransactionType::Saida, 0.1),
            transaction(TransactionType::Saida, 0.2),
        ];

        let html = Html::parse_fragment(&summary_cards_view(&transactions).into_string());
        let balance = html
            .select(&Selector::parse("[data-summary-card=saldo] p").unwrap())
            .next()
            .unwrap();

        assert_eq!(card_text(&html, "saldo"), "R$ 0,00");
        assert!(
            !balance
                .value()
                .attr("class")
                .unwrap_or_default()
                .contains("text-red-700")
        );
    }
}
