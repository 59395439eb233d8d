//! Chart generation and rendering for the dashboard.
//!
//! Two ECharts visualizations are generated with charming:
//! - **Category Chart**: pie chart of the amount spent in each category
//! - **Type Chart**: bar chart comparing income, expenses and card charges
//!
//! Each chart is serialized to JSON for the ECharts library and rendered with
//! an HTML container and the JavaScript that initializes it.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisLabel, AxisType, ItemStyle, JsFunction, Tooltip, Trigger},
    series::{Pie, bar::Bar},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    aggregation::{total_by_type, totals_by_category},
    html::HeadElement,
    transaction::{Transaction, TransactionType},
};

/// The ECharts build loaded by the dashboard.
pub(super) const ECHARTS_SCRIPT: &str =
    "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Builds the category and type charts from `transactions`.
pub(super) fn build_dashboard_charts(transactions: &[Transaction]) -> [DashboardChart; 2] {
    [
        DashboardChart {
            id: "category-chart",
            options: script_safe_options(&category_chart(transactions)),
        },
        DashboardChart {
            id: "type-chart",
            options: script_safe_options(&type_chart(transactions)),
        },
    ]
}

/// Serialize `chart` for embedding in a `<script>` element.
///
/// Categories are user text, so `<` is written as the `\u003c` escape to keep
/// a name like "</script>" from closing the element.
fn script_safe_options(chart: &Chart) -> String {
    chart.to_string().replace('<', "\\u003c")
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-8"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded bg-white dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// The charts follow the browser's colour scheme and resize with the window.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{script_content}\n}});"
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// Pie chart of the total of each category, across all transaction types.
pub(super) fn category_chart(transactions: &[Transaction]) -> Chart {
    let totals = totals_by_category(transactions);
    let data: Vec<(f64, &str)> = totals
        .iter()
        .map(|(category, total)| (round_cents(*total), category.as_str()))
        .collect();

    Chart::new()
        .title(Title::new().text("Distribuição por Categoria").left(20).top("1%"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().bottom("1%"))
        .series(
            Pie::new()
                .name("Categorias")
                .radius(vec!["35%", "65%"])
                .data(data),
        )
}

/// Bar chart comparing the totals of each transaction type.
pub(super) fn type_chart(transactions: &[Transaction]) -> Chart {
    let labels: Vec<&str> = TransactionType::ALL
        .iter()
        .map(|type_| type_.plural_label())
        .collect();

    let mut chart = Chart::new()
        .title(Title::new().text("Totais por Tipo").left(20).top("1%"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .value_formatter(currency_formatter()),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(70)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        );

    // One series per type so each bar gets its own colour.
    for (index, type_) in TransactionType::ALL.into_iter().enumerate() {
        let mut data = vec![0.0; TransactionType::ALL.len()];
        data[index] = round_cents(total_by_type(transactions, type_));

        chart = chart.series(
            Bar::new()
                .name(type_.plural_label())
                .stack("Totais")
                .item_style(ItemStyle::new().color(type_colour(type_)))
                .data(data),
        );
    }

    chart
}

fn type_colour(type_: TransactionType) -> &'static str {
    match type_ {
        TransactionType::Entrada => "#15803d",
        TransactionType::Saida => "#b91c1c",
        TransactionType::Cartao => "#7e22ce",
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('pt-BR', {
              style: 'currency',
              currency: 'BRL'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}
