//! Turns raw metric breakdowns into the indicator lists and graphic data shown
//! on the home page.
//!
//! Indicators go through four steps: sort by value, split off everything past
//! the visible indicators, fold the remainder into a single "others" entry and
//! finally attach icons, labels and percentages.

use crate::{
    home::icons::{Icon, indicator_style, status_legend},
    metrics::{RawIndicator, StatusMetric},
};

/// How many indicators are shown before the rest are folded into "others".
pub const VISIBLE_INDICATORS: usize = 2;

/// The title of an indicator ready for display.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayTitle {
    /// The label of a known category.
    Label(String),
    /// Categories without a label, shown as "Others" with a tooltip listing
    /// each category and its raw value.
    Others(Vec<RawIndicator>),
}

impl DisplayTitle {
    /// The tooltip lines for an "others" title, e.g. "Boleto: 5".
    ///
    /// Categories with a label use it, otherwise the raw title is shown.
    pub fn tooltip_lines(&self) -> Vec<String> {
        match self {
            Self::Label(_) => Vec::new(),
            Self::Others(indicators) => indicators
                .iter()
                .map(|indicator| {
                    let name = indicator_style(&indicator.title)
                        .map(|style| style.label)
                        .unwrap_or(indicator.title.as_str());
                    format!("{name}: {}", indicator.value)
                })
                .collect(),
        }
    }
}

/// An indicator ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct EnhancedIndicator {
    pub icon: Icon,
    pub title: DisplayTitle,
    /// The share of the total, e.g. "33.3%".
    pub value: String,
}

/// A status-keyed metric ready for charting.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicDatum {
    pub color: Option<String>,
    pub label: Option<String>,
    pub value: f64,
}

enum GroupedTitle {
    Single(String),
    Folded(Vec<RawIndicator>),
}

struct GroupedIndicator {
    title: GroupedTitle,
    value: f64,
}

impl From<RawIndicator> for GroupedIndicator {
    fn from(indicator: RawIndicator) -> Self {
        Self {
            title: GroupedTitle::Single(indicator.title),
            value: indicator.value,
        }
    }
}

/// Build the display list for a metric breakdown.
///
/// At most [VISIBLE_INDICATORS] + 1 indicators are returned. When there are
/// more, the largest [VISIBLE_INDICATORS] are kept and the rest are folded
/// into one "others" indicator with their summed value.
pub fn aggregate(raw_indicators: &[RawIndicator]) -> Vec<EnhancedIndicator> {
    if raw_indicators.is_empty() {
        return Vec::new();
    }

    let total: f64 = raw_indicators.iter().map(|indicator| indicator.value).sum();
    let sorted = sort_indicators(raw_indicators);
    let grouped = group_indicators(sorted);

    grouped
        .into_iter()
        .map(|indicator| enhance_indicator(indicator, total))
        .collect()
}

/// Sorts by value, largest first. Equal values keep their input order.
fn sort_indicators(raw_indicators: &[RawIndicator]) -> Vec<RawIndicator> {
    let mut sorted = raw_indicators.to_vec();
    sorted.sort_by(|a, b| b.value.total_cmp(&a.value));
    sorted
}

fn group_indicators(sorted: Vec<RawIndicator>) -> Vec<GroupedIndicator> {
    if sorted.len() <= VISIBLE_INDICATORS + 1 {
        return sorted.into_iter().map(GroupedIndicator::from).collect();
    }

    let mut visible = sorted;
    let others = visible.split_off(VISIBLE_INDICATORS);

    let mut grouped: Vec<GroupedIndicator> =
        visible.into_iter().map(GroupedIndicator::from).collect();
    grouped.push(fold_others(others));

    grouped
}

fn fold_others(others: Vec<RawIndicator>) -> GroupedIndicator {
    let value = others.iter().map(|indicator| indicator.value).sum();

    GroupedIndicator {
        title: GroupedTitle::Folded(others),
        value,
    }
}

fn enhance_indicator(indicator: GroupedIndicator, total: f64) -> EnhancedIndicator {
    let value = format_percentage(indicator.value, total);

    match indicator.title {
        GroupedTitle::Single(title) => match indicator_style(&title) {
            Some(style) => EnhancedIndicator {
                icon: style.icon,
                title: DisplayTitle::Label(style.label.to_owned()),
                value,
            },
            None => EnhancedIndicator {
                icon: Icon::Others,
                title: DisplayTitle::Others(vec![RawIndicator {
                    title,
                    value: indicator.value,
                }]),
                value,
            },
        },
        GroupedTitle::Folded(folded) => EnhancedIndicator {
            icon: Icon::Others,
            title: DisplayTitle::Others(folded),
            value,
        },
    }
}

/// Format `value` as a percentage of `total`.
///
/// Whole percentages have no decimal point ("50%"), others are rounded to one
/// decimal place ("33.3%"). A zero or non-finite total gives "0%".
pub fn format_percentage(value: f64, total: f64) -> String {
    if total == 0.0 || !total.is_finite() {
        return "0%".to_owned();
    }

    let percentage = value * 100.0 / total;

    if percentage.fract() == 0.0 {
        // Adding zero turns -0.0 into 0.0.
        format!("{}%", percentage + 0.0)
    } else {
        format!("{percentage:.1}%")
    }
}

/// Attach the status colour and label to each metric.
///
/// Unknown statuses get no colour or label and missing values count as zero.
pub fn to_graphic_data(metrics: &[StatusMetric]) -> Vec<GraphicDatum> {
    metrics
        .iter()
        .map(|metric| {
            let legend = status_legend(&metric.title);

            GraphicDatum {
                color: legend.map(|legend| legend.color.to_owned()),
                label: legend.map(|legend| legend.text.to_owned()),
                value: metric.value.unwrap_or(0.0),
            }
        })
        .collect()
}
