//! ECharts bar charts for the status-keyed metrics of the home page:
//! - **Status**: transactions per status, coloured by the status legend
//! - **Installments**: transactions per number of installments
//! - **Volume by weekday**: summed amount per day of the week
//!
//! Charts are serialised to JSON options and initialised by a script in the
//! page head.

use charming::{
    Chart,
    component::{Axis, Grid, Title},
    datatype::DataPointItem,
    element::{AxisPointer, AxisPointerType, AxisType, ItemStyle, Tooltip, Trigger},
    series::bar,
};
use maud::{Markup, PreEscaped, html};

use crate::{
    home::indicators::{GraphicDatum, to_graphic_data},
    html::HeadElement,
    metrics::{Metrics, StatusMetric},
};

/// A chart with its HTML container ID and ECharts configuration.
pub(super) struct HomeChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// The charts shown on the home page for `metrics`.
pub(super) fn home_charts(metrics: &Metrics) -> [HomeChart; 3] {
    [
        HomeChart {
            id: "status-chart",
            options: status_chart(&metrics.status).to_string(),
        },
        HomeChart {
            id: "installments-chart",
            options: installments_chart(&metrics.installments).to_string(),
        },
        HomeChart {
            id: "weekday-volume-chart",
            options: volume_by_weekday_chart(&metrics.volume_by_weekday).to_string(),
        },
    ]
}

pub(super) fn charts_view(charts: &[HomeChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-3 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[320px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates the JavaScript that initialises `charts` once the page has loaded.
pub(super) fn charts_script(charts: &[HomeChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chart = echarts.init(document.getElementById("{}"));
                    chart.setOption({});
                    window.addEventListener('resize', chart.resize);
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

fn status_chart(status: &[StatusMetric]) -> Chart {
    bar_chart("Status", "Transactions per status", status)
}

fn installments_chart(installments: &[StatusMetric]) -> Chart {
    bar_chart("Installments", "Transactions per installment plan", installments)
}

fn volume_by_weekday_chart(volume: &[StatusMetric]) -> Chart {
    bar_chart("Volume", "Amount per day of the week", volume)
}

fn bar_chart(title: &str, subtitle: &str, metrics: &[StatusMetric]) -> Chart {
    let data = to_graphic_data(metrics);
    let labels = axis_labels(metrics, &data);
    let points: Vec<DataPointItem> = data.iter().map(data_point).collect();

    Chart::new()
        .title(Title::new().text(title).subtext(subtitle))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(bar::Bar::new().name(title).data(points))
}

/// The legend label of each datum, falling back to the metric's title.
fn axis_labels(metrics: &[StatusMetric], data: &[GraphicDatum]) -> Vec<String> {
    metrics
        .iter()
        .zip(data)
        .map(|(metric, datum)| datum.label.clone().unwrap_or_else(|| capitalise(&metric.title)))
        .collect()
}

fn data_point(datum: &GraphicDatum) -> DataPointItem {
    let point = DataPointItem::new(datum.value);

    match &datum.color {
        Some(color) => point.item_style(ItemStyle::new().color(color.as_str())),
        None => point,
    }
}

fn capitalise(text: &str) -> String {
    let mut chars = text.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
