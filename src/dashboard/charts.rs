//! Chart generation and rendering for the dashboard.
//!
//! The spending chart is an ECharts pie chart of spending per category.
//! Clicking a slice reloads the dashboard with that category selected.

use charming::{
    Chart,
    component::{Legend, Title},
    element::{JsFunction, Tooltip, Trigger},
    series::Pie,
};
use maud::{Markup, PreEscaped, html};

use crate::{
    dashboard::aggregation::CategorySpending, database_id::CategoryId, endpoints,
    html::HeadElement,
};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML container for a chart.
pub(super) fn chart_view(chart: &DashboardChart) -> Markup {
    html!(
        div
            id=(chart.id)
            class="min-h-[400px] w-full rounded dark:bg-gray-100"
        {}
    )
}

pub(super) fn spending_chart(spending: &[CategorySpending]) -> Chart {
    let data = spending
        .iter()
        .map(|category| (category.total, category.label.as_str()))
        .collect::<Vec<_>>();

    Chart::new()
        .title(
            Title::new()
                .text("Spending by Category")
                .subtext("Click a category to list its transactions"),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().bottom("0%"))
        .series(
            Pie::new()
                .name("Spending")
                .radius(vec!["35%", "70%"])
                .data(data),
        )
}

/// Generates the JavaScript that draws the spending chart and handles clicks.
///
/// `category_ids` holds the category ID for each slice, in the same order as
/// the chart data. Clicking the selected slice, or the empty space around the
/// chart, clears the selection.
pub(super) fn spending_chart_script(
    chart: &DashboardChart,
    category_ids: &[CategoryId],
    selected_category_id: Option<CategoryId>,
) -> HeadElement {
    let category_ids = category_ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let selected_category_id = selected_category_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "null".to_owned());

    let script = format!(
        r#"document.addEventListener('DOMContentLoaded', function() {{
            const chartDom = document.getElementById("{id}");
            const chart = echarts.init(chartDom);
            const option = {options};
            chart.setOption(option);

            const categoryIds = [{category_ids}];
            const selectedCategoryId = {selected_category_id};
            const showAll = () => {{
                if (selectedCategoryId !== null) {{
                    window.location.href = "{dashboard}";
                }}
            }};

            chart.on('click', function(params) {{
                const categoryId = categoryIds[params.dataIndex];
                if (categoryId === undefined) {{
                    return;
                }}

                if (categoryId === selectedCategoryId) {{
                    showAll();
                }} else {{
                    window.location.href = "{dashboard}?category=" + categoryId;
                }}
            }});

            chart.getZr().on('click', function(event) {{
                if (!event.target) {{
                    showAll();
                }}
            }});

            window.addEventListener('resize', chart.resize);

            const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
            const updateTheme = () => {{
                const isDarkMode = darkModeMediaQuery.matches;
                chart.setTheme(isDarkMode ? 'dark' : 'default');
            }}
            darkModeMediaQuery.addEventListener('change', updateTheme);
            updateTheme();
        }});"#,
        id = chart.id,
        options = chart.options,
        dashboard = endpoints::DASHBOARD_VIEW,
    );

    HeadElement::ScriptSource(PreEscaped(script))
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}
