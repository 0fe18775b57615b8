//! ECharts visualizations for the reports.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger},
    series::{Line, bar},
};
use maud::{Markup, PreEscaped, html};
use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::{html::HeadElement, report::aggregation::WeeklyBucket};

/// The path of the ECharts bundle served from the static directory.
pub const ECHARTS_SCRIPT: &str = "/static/echarts.6.0.0.min.js";

/// A report chart with its HTML container ID and ECharts configuration.
pub struct ReportChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for report charts.
pub fn charts_view(charts: &[ReportChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for report charts.
///
/// Each chart follows the browser's colour scheme and resizes with the window.
pub fn charts_script(charts: &[ReportChart]) -> HeadElement {
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
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// Inflow and outflow bars per week with the weekly balance drawn as a line.
pub fn weekly_cash_flow_chart(buckets: &[WeeklyBucket]) -> Chart {
    let labels: Vec<String> = buckets.iter().map(WeeklyBucket::label).collect();
    let inflows: Vec<f64> = buckets.iter().map(|bucket| to_f64(bucket.inflows)).collect();
    let outflows: Vec<f64> = buckets.iter().map(|bucket| to_f64(bucket.outflows)).collect();
    let balances: Vec<f64> = buckets.iter().map(|bucket| to_f64(bucket.balance())).collect();

    Chart::new()
        .title(Title::new().text("Weekly cash flow"))
        .tooltip(currency_tooltip())
        .legend(Legend::new().top("1%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(60)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(bar::Bar::new().name("Inflows").data(inflows))
        .series(bar::Bar::new().name("Outflows").data(outflows))
        .series(Line::new().name("Balance").data(balances))
}

fn to_f64(amount: Decimal) -> f64 {
    amount.to_f64().unwrap_or_default()
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

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{html::HeadElement, report::aggregation::WeeklyBucket};

    use super::{ReportChart, charts_script, weekly_cash_flow_chart};

    #[test]
    fn weekly_chart_labels_each_week() {
        let buckets = [
            WeeklyBucket {
                week_start: date!(2024 - 09 - 02),
                inflows: dec!(100),
                outflows: dec!(40),
            },
            WeeklyBucket {
                week_start: date!(2024 - 09 - 09),
                inflows: dec!(0),
                outflows: dec!(25.5),
            },
        ];

        let options = weekly_cash_flow_chart(&buckets).to_string();

        assert!(options.contains("02/09 – 08/09"), "{options}");
        assert!(options.contains("09/09 – 15/09"), "{options}");
        assert!(options.contains("Outflows"));
        assert!(options.contains("25.5"));
    }

    #[test]
    fn script_initializes_every_chart() {
        let charts = [
            ReportChart {
                id: "first-chart",
                options: "{}".to_owned(),
            },
            ReportChart {
                id: "second-chart",
                options: "{}".to_owned(),
            },
        ];

        let HeadElement::ScriptSource(script) = charts_script(&charts) else {
            panic!("expected an inline script");
        };

        assert!(script.0.contains("document.getElementById(\"first-chart\")"));
        assert!(script.0.contains("document.getElementById(\"second-chart\")"));
        assert!(script.0.starts_with("document.addEventListener('DOMContentLoaded'"));
    }
}
