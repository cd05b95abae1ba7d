//! Home page HTTP handlers and view rendering.
//!
//! This module contains:
//! - The home page handler, which drives the [HomeController] for a page load
//! - The date selector form handler
//! - The JSON metrics endpoint
//! - HTML view functions for the greeting, date selector, totals and indicators

use axum::{
    Json,
    extract::{FromRef, RawQuery, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use time::{
    Date, OffsetDateTime, UtcOffset,
    format_description::BorrowedFormatItem,
    macros::{format_description, time},
};

use crate::{
    AppState, Error, endpoints,
    home::{
        charts::{charts_script, charts_view, home_charts},
        controller::{Effect, HomeController},
        date_range::{DateRange, DatesQuery, Preset, PresetCatalog, decode},
        indicators::{DisplayTitle, EnhancedIndicator, aggregate},
    },
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_DATE_INPUT_STYLE, FORM_LABEL_STYLE,
        PAGE_CONTAINER_STYLE, HeadElement, base, format_currency,
    },
    metrics::{Metrics, MetricsAction, MetricsState, RawIndicator, get_metrics},
    timezone::local_now,
};

const FORM_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

const GREETING_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[day]/[month]/[year]");

const BUTTON_SECONDARY_STYLE: &str = "px-4 py-2 bg-gray-200 dark:bg-gray-700 \
    hover:bg-gray-300 dark:hover:bg-gray-600 text-gray-900 dark:text-white rounded";

/// The state needed for displaying the home page.
#[derive(Debug, Clone)]
pub struct HomeState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
    /// The name of the merchant shown in the greeting.
    pub company_name: String,
    /// The presets offered by the date selector.
    pub presets: PresetCatalog,
}

impl FromRef<AppState> for HomeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            company_name: state.company_name.clone(),
            presets: state.presets.clone(),
        }
    }
}

/// Form data submitted by the date selector.
///
/// Dates are in the `YYYY-MM-DD` format of HTML date inputs.
#[derive(Debug, Deserialize)]
pub struct DatesForm {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    /// The preset button that submitted the form, if any.
    #[serde(default)]
    pub preset: Option<String>,
}

/// Display the home page for the date range in the query string.
///
/// Requests without a complete date range are redirected to the default range.
pub async fn get_home_page(
    State(state): State<HomeState>,
    RawQuery(query): RawQuery,
) -> Result<Response, Error> {
    let now = local_now(&state.local_timezone)?;
    let (controller, effects) = HomeController::mount(query.as_deref(), now);
    let mut metrics_state = MetricsState::default();

    for effect in effects {
        match effect {
            Effect::ReplaceQuery(query) => return Ok(redirect_to_home(&query)),
            Effect::RequestMetrics(range) => {
                metrics_state = metrics_state.reduce(MetricsAction::Request);
                let action = fetch_metrics(&state.db_connection, range, now.offset())?;
                metrics_state = metrics_state.reduce(action);
            }
        }
    }

    Ok(home_view(&state, &controller, &metrics_state, now).into_response())
}

/// Apply the dates chosen in the date selector and redirect to the home page
/// showing them.
///
/// A preset button without dates selects the preset's range. Dates submitted
/// through a preset button are confirmed together with that preset, dates
/// submitted without one are taken as they are.
pub async fn post_dates(
    State(state): State<HomeState>,
    Form(form): Form<DatesForm>,
) -> Result<Response, Error> {
    let now = local_now(&state.local_timezone)?;
    let mut controller = HomeController::with_defaults(now);

    let preset = form
        .preset
        .as_deref()
        .filter(|preset| !preset.is_empty())
        .and_then(|value| {
            let preset = Preset::from_query_value(value);
            if preset.is_none() {
                tracing::debug!("ignoring unknown preset {value:?}");
            }
            preset
        });

    let effects = match preset.and_then(|preset| preset.range(now).map(|range| (preset, range))) {
        Some((preset, range)) => controller.confirm_dates(range.into(), Some(preset)),
        None => {
            let dates = form_dates(&form, now)?;
            match preset {
                Some(preset) => controller.confirm_dates(dates, Some(preset)),
                None => controller.change_dates(dates),
            }
        }
    };

    let query = effects
        .into_iter()
        .find_map(|effect| match effect {
            Effect::ReplaceQuery(query) => Some(query),
            Effect::RequestMetrics(_) => None,
        })
        .unwrap_or_default();

    Ok(redirect_to_home(&query))
}

/// Get the metrics for the date range in the query string as JSON.
///
/// # Errors
/// Returns [Error::InvalidDateRange] if the start or end date is missing.
pub async fn get_metrics_api(
    State(state): State<HomeState>,
    RawQuery(query): RawQuery,
) -> Result<Json<Metrics>, Error> {
    let range = query
        .as_deref()
        .and_then(decode)
        .and_then(|dates| dates.range())
        .ok_or(Error::InvalidDateRange)?;
    let now = local_now(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let metrics = get_metrics(range, now.offset(), &connection)?;

    Ok(Json(metrics))
}

fn redirect_to_home(query: &str) -> Response {
    Redirect::to(&format!("{}?{query}", endpoints::HOME_VIEW)).into_response()
}

/// Run the metrics request for `range`.
///
/// A failed query becomes [MetricsAction::Fail] so that the page can still be
/// rendered, only a poisoned database lock is returned as an error.
fn fetch_metrics(
    db_connection: &Mutex<Connection>,
    range: DateRange,
    local_offset: UtcOffset,
) -> Result<MetricsAction, Error> {
    let connection = db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    match get_metrics(range, local_offset, &connection) {
        Ok(metrics) => Ok(MetricsAction::Receive(metrics)),
        Err(error) => {
            tracing::error!("could not get metrics: {error}");
            Ok(MetricsAction::Fail(error.to_string()))
        }
    }
}

/// Convert the form's dates into a range covering whole days in the offset of
/// `now`.
///
/// # Errors
/// Returns [Error::InvalidDateFormat] if a date cannot be parsed or is later
/// than the date of `now`.
fn form_dates(form: &DatesForm, now: OffsetDateTime) -> Result<DatesQuery, Error> {
    let max_date = now.date();
    let local_offset = now.offset();

    let start = parse_form_date(form.start.as_deref(), max_date)?
        .map(|date| date.midnight().assume_offset(local_offset));
    let end = parse_form_date(form.end.as_deref(), max_date)?
        .map(|date| date.with_time(time!(23:59:59.999)).assume_offset(local_offset));

    Ok(DatesQuery { start, end })
}

fn parse_form_date(text: Option<&str>, max_date: Date) -> Result<Option<Date>, Error> {
    let Some(text) = text.filter(|text| !text.is_empty()) else {
        return Ok(None);
    };

    let date = Date::parse(text, FORM_DATE_FORMAT)
        .map_err(|error| Error::InvalidDateFormat(error.to_string(), text.to_owned()))?;

    if date > max_date {
        return Err(Error::InvalidDateFormat(
            format!("the date is after {max_date}"),
            text.to_owned(),
        ));
    }

    Ok(Some(date))
}

/// The calendar date of `date_time` in `local_offset`, or in its own offset if
/// it cannot be shown in `local_offset`.
fn local_date(date_time: OffsetDateTime, local_offset: UtcOffset) -> Date {
    date_time
        .checked_to_offset(local_offset)
        .unwrap_or(date_time)
        .date()
}

fn format_form_date(date_time: Option<OffsetDateTime>, local_offset: UtcOffset) -> String {
    date_time
        .and_then(|date_time| {
            local_date(date_time, local_offset)
                .format(FORM_DATE_FORMAT)
                .ok()
        })
        .unwrap_or_default()
}

fn format_greeting_date(date_time: OffsetDateTime, local_offset: UtcOffset) -> String {
    local_date(date_time, local_offset)
        .format(GREETING_DATE_FORMAT)
        .inspect_err(|error| tracing::error!("could not format {date_time}: {error}"))
        .unwrap_or_default()
}

/// The line under the greeting describing the selected range.
fn summary_description(range: Option<DateRange>, local_offset: UtcOffset) -> String {
    let Some(range) = range else {
        return "Here is your summary".to_owned();
    };

    let start = format_greeting_date(range.start, local_offset);
    let end = format_greeting_date(range.end, local_offset);

    if start == end {
        format!("Here is your summary on {start}")
    } else {
        format!("Here is your summary between {start} until {end}")
    }
}

fn home_view(
    state: &HomeState,
    controller: &HomeController,
    metrics_state: &MetricsState,
    now: OffsetDateTime,
) -> Markup {
    let local_offset = now.offset();
    let description = summary_description(controller.range(), local_offset);
    let metrics = metrics_state.metrics_or_default();
    let charts = home_charts(&metrics);

    let content = html!(
        div class=(PAGE_CONTAINER_STYLE)
        {
            header id="greeting" class="w-full mb-6"
            {
                h1 class="text-2xl font-bold" { "Hello, " (state.company_name) }
                p class="text-gray-600 dark:text-gray-400" { (description) }
            }

            (date_selector_view(&state.presets, controller, now))

            @if metrics_state.error.is_some() {
                p
                    id="metrics-error"
                    class="w-full p-4 mb-4 text-red-800 bg-red-50 rounded-lg
                        dark:bg-gray-800 dark:text-red-400"
                {
                    "We could not load your metrics. Please try again later."
                }
            } @else {
                div id="metrics" class="w-full"
                {
                    (totals_view(&metrics))

                    div class="grid grid-cols-1 lg:grid-cols-3 gap-4 mb-4"
                    {
                        (indicators_view("Card brands", &metrics.card_brands))
                        (indicators_view("Payment methods", &metrics.payment_methods))
                        (indicators_view("Refuse reasons", &metrics.refuse_reasons))
                    }

                    (charts_view(&charts))
                }
            }
        }
    );

    let scripts = if metrics_state.error.is_none() {
        vec![
            HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
            charts_script(&charts),
        ]
    } else {
        Vec::new()
    };

    base("Home", &scripts, &content)
}

fn date_selector_view(
    presets: &PresetCatalog,
    controller: &HomeController,
    now: OffsetDateTime,
) -> Markup {
    let dates = controller.dates();
    let start = format_form_date(dates.start, now.offset());
    let end = format_form_date(dates.end, now.offset());
    let max_date = format_form_date(Some(now), now.offset());

    html!(
        form
            id="date-selector"
            method="post"
            action=(endpoints::HOME_DATES_API)
            class="w-full flex flex-wrap items-end gap-4 mb-6"
        {
            div
            {
                label for="start" class=(FORM_LABEL_STYLE) { "From" }
                input
                    id="start"
                    name="start"
                    type="date"
                    value=(start)
                    max=(max_date)
                    class=(FORM_DATE_INPUT_STYLE);
            }

            div
            {
                label for="end" class=(FORM_LABEL_STYLE) { "Until" }
                input
                    id="end"
                    name="end"
                    type="date"
                    value=(end)
                    max=(max_date)
                    class=(FORM_DATE_INPUT_STYLE);
            }

            div class="flex flex-wrap gap-2"
            {
                @for preset in presets.iter() {
                    @let selected = preset == controller.preset();
                    @let style = if selected { BUTTON_PRIMARY_STYLE } else { BUTTON_SECONDARY_STYLE };

                    button
                        type="submit"
                        name="preset"
                        value=(preset.as_query_value())
                        aria-pressed=(if selected { "true" } else { "false" })
                        class=(style)
                    {
                        (preset.label())
                    }
                }
            }
        }
    )
}

fn totals_view(metrics: &Metrics) -> Markup {
    html!(
        section id="totals" class="grid grid-cols-1 md:grid-cols-3 gap-4 mb-4"
        {
            (total_card("Total amount", &format_currency(metrics.total_amount)))
            (total_card("Transactions", &metrics.total_transactions.to_string()))
            (total_card("Average ticket", &format_currency(metrics.average_amount)))
        }
    )
}

fn total_card(title: &str, value: &str) -> Markup {
    html!(
        div class=(CARD_STYLE)
        {
            h3 class="text-sm text-gray-600 dark:text-gray-400" { (title) }
            p class="text-2xl font-bold" { (value) }
        }
    )
}

fn indicators_view(title: &str, raw_indicators: &[RawIndicator]) -> Markup {
    let indicators = aggregate(raw_indicators);

    html!(
        section class={ "indicators " (CARD_STYLE) }
        {
            h3 class="text-lg font-semibold mb-2" { (title) }

            @if indicators.is_empty() {
                p class="text-gray-600 dark:text-gray-400" { "No transactions" }
            } @else {
                ul
                {
                    @for indicator in &indicators {
                        (indicator_view(indicator))
                    }
                }
            }
        }
    )
}

fn indicator_view(indicator: &EnhancedIndicator) -> Markup {
    html!(
        li class="indicator flex items-center gap-2 py-1"
        {
            (indicator.icon.svg())

            @match &indicator.title {
                DisplayTitle::Label(label) => span class="grow" { (label) }
                DisplayTitle::Others(_) => {
                    span class="indicator-tooltip relative grow"
                    {
                        "Others"

                        span
                            class="tooltip-content absolute z-10 p-2 text-sm bg-gray-900
                                text-white rounded shadow"
                        {
                            @for line in indicator.title.tooltip_lines() {
                                span class="block" { (line) }
                            }
                        }
                    }
                }
            }

            span class="font-semibold" { (indicator.value) }
        }
    )
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        body::Body,
        extract::{RawQuery, State},
        http::{Response, StatusCode, header::LOCATION},
    };
    use axum_extra::extract::Form;
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::{OffsetDateTime, UtcOffset, macros::datetime};

    use crate::{
        Error,
        db::initialize,
        endpoints,
        home::date_range::{DateRange, PresetCatalog, decode},
        metrics::{NewTransaction, create_transaction},
    };

    use super::{
        DatesForm, HomeState, format_form_date, format_greeting_date, get_home_page,
        get_metrics_api, post_dates, summary_description,
    };

    const SEVEN_DAY_QUERY: &str =
        "dates%5Bstart%5D=2024-01-01T00%3A00%3A00.000Z&dates%5Bend%5D=2024-01-08T00%3A00%3A00.000Z";

    fn get_test_state() -> HomeState {
        get_test_state_in("Etc/UTC")
    }

    fn get_test_state_in(local_timezone: &str) -> HomeState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        HomeState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: local_timezone.to_owned(),
            company_name: "Acme".to_owned(),
            presets: PresetCatalog::new(),
        }
    }

    fn add_transactions(state: &HomeState) {
        let conn = state.db_connection.lock().unwrap();
        let date = datetime!(2024-01-03 12:00 UTC);

        for (amount, brand) in [(70.0, "visa"), (20.0, "mastercard"), (5.0, "elo"), (5.0, "amex")] {
            create_transaction(
                NewTransaction::build(amount, "paid", "credit_card", date).card_brand(brand),
                &conn,
            )
            .unwrap();
        }
    }

    #[tokio::test]
    async fn redirects_to_default_range_without_query() {
        let state = get_test_state();

        let response = get_home_page(State(state), RawQuery(None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = get_location(&response);
        let query = location
            .strip_prefix(&format!("{}?", endpoints::HOME_VIEW))
            .unwrap();
        let dates = decode(query).unwrap();
        let range = dates.range().unwrap();
        assert_eq!((range.end - range.start).whole_days(), 7);
    }

    #[tokio::test]
    async fn redirects_incomplete_range_to_default_range() {
        let state = get_test_state();
        let query = "dates%5Bstart%5D=2024-01-01T00%3A00%3A00.000Z".to_owned();

        let response = get_home_page(State(state), RawQuery(Some(query)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn home_page_renders_metrics() {
        let state = get_test_state();
        add_transactions(&state);

        let response = get_home_page(State(state), RawQuery(Some(SEVEN_DAY_QUERY.to_owned())))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html(response).await;
        assert_valid_html(&html);

        let greeting = select_text(&html, "#greeting h1");
        assert_eq!(greeting, "Hello, Acme");
        let description = select_text(&html, "#greeting p");
        assert_eq!(
            description,
            "Here is your summary between 01/01/2024 until 08/01/2024"
        );

        let totals = select_text(&html, "#totals");
        assert!(totals.contains("R$100.00"), "{totals}");
        assert!(totals.contains("R$25.00"), "{totals}");

        let indicators = Selector::parse(".indicators").unwrap();
        let card_brands = html.select(&indicators).next().unwrap();
        let rows = Selector::parse("li.indicator").unwrap();
        assert_eq!(card_brands.select(&rows).count(), 3);
        let icons = Selector::parse("li.indicator > svg").unwrap();
        assert_eq!(card_brands.select(&icons).count(), 3);

        let tooltip = Selector::parse(".indicator-tooltip .tooltip-content span").unwrap();
        let lines: Vec<String> = card_brands
            .select(&tooltip)
            .map(|line| line.text().collect())
            .collect();
        assert_eq!(lines, vec!["amex: 5", "elo: 5"]);

        for chart_id in ["status-chart", "installments-chart", "weekday-volume-chart"] {
            assert_exists(&html, &format!("#{chart_id}"));
        }
    }

    #[tokio::test]
    async fn seven_day_range_selects_seven_day_preset() {
        let state = get_test_state();

        let response = get_home_page(State(state), RawQuery(Some(SEVEN_DAY_QUERY.to_owned())))
            .await
            .unwrap();

        let html = parse_html(response).await;
        let selected = Selector::parse("button[aria-pressed='true']").unwrap();
        let buttons: Vec<_> = html.select(&selected).collect();
        assert_eq!(buttons.len(), 1);
        assert_eq!(buttons[0].value().attr("value"), Some("days-7"));

        let start = Selector::parse("input[name='start']").unwrap();
        let start = html.select(&start).next().unwrap();
        assert_eq!(start.value().attr("value"), Some("2024-01-01"));
    }

    #[tokio::test]
    async fn renders_presets_in_catalog_order() {
        let state = get_test_state();

        let response = get_home_page(State(state), RawQuery(Some(SEVEN_DAY_QUERY.to_owned())))
            .await
            .unwrap();

        let html = parse_html(response).await;
        let selector = Selector::parse("button[name='preset']").unwrap();
        let values: Vec<&str> = html
            .select(&selector)
            .filter_map(|button| button.value().attr("value"))
            .collect();
        assert_eq!(values, vec!["today", "days-7", "days-15", "days-30", "custom"]);
    }

    #[tokio::test]
    async fn renders_error_message_when_metrics_fail() {
        let state = get_test_state();
        state
            .db_connection
            .lock()
            .unwrap()
            .execute("DROP TABLE \"transaction\"", ())
            .unwrap();

        let response = get_home_page(State(state), RawQuery(Some(SEVEN_DAY_QUERY.to_owned())))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html(response).await;
        assert_exists(&html, "#metrics-error");
        let metrics = Selector::parse("#metrics").unwrap();
        assert!(html.select(&metrics).next().is_none());
    }

    #[tokio::test]
    async fn post_custom_dates_covers_whole_days() {
        let state = get_test_state();
        let form = DatesForm {
            start: Some("2024-01-01".to_owned()),
            end: Some("2024-01-08".to_owned()),
            preset: Some("custom".to_owned()),
        };

        let response = post_dates(State(state), Form(form)).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let range = location_range(&response);
        assert_eq!(range.start, datetime!(2024-01-01 00:00 UTC));
        assert_eq!(range.end, datetime!(2024-01-08 23:59:59.999 UTC));
    }

    #[tokio::test]
    async fn post_preset_selects_preset_range() {
        let state = get_test_state();
        let form = DatesForm {
            start: Some("2024-01-01".to_owned()),
            end: Some("2024-01-02".to_owned()),
            preset: Some("days-30".to_owned()),
        };

        let response = post_dates(State(state), Form(form)).await.unwrap();

        let range = location_range(&response);
        assert_eq!((range.end - range.start).whole_days(), 30);
        assert!(OffsetDateTime::now_utc() - range.end < time::Duration::minutes(1));
    }

    #[tokio::test]
    async fn post_invalid_date_is_rejected() {
        let state = get_test_state();
        let form = DatesForm {
            start: Some("01/01/2024".to_owned()),
            end: Some("2024-01-02".to_owned()),
            preset: None,
        };

        let result = post_dates(State(state), Form(form)).await;

        assert!(matches!(result, Err(Error::InvalidDateFormat(_, date)) if date == "01/01/2024"));
    }

    #[tokio::test]
    async fn post_dates_after_today_are_rejected() {
        let state = get_test_state_in("America/Sao_Paulo");
        let form = DatesForm {
            start: Some("9999-12-30".to_owned()),
            end: Some("9999-12-31".to_owned()),
            preset: Some("custom".to_owned()),
        };

        let result = post_dates(State(state), Form(form)).await;

        assert!(matches!(result, Err(Error::InvalidDateFormat(_, date)) if date == "9999-12-30"));
    }

    #[tokio::test]
    async fn date_inputs_are_bounded_by_today() {
        let state = get_test_state();
        let today = OffsetDateTime::now_utc().date().to_string();

        let response = get_home_page(State(state), RawQuery(Some(SEVEN_DAY_QUERY.to_owned())))
            .await
            .unwrap();

        let html = parse_html(response).await;
        let inputs = Selector::parse("input[type='date']").unwrap();
        for input in html.select(&inputs) {
            assert_eq!(input.value().attr("max"), Some(today.as_str()));
        }
    }

    #[tokio::test]
    async fn query_dates_without_utc_representation_redirect_to_default_range() {
        let state = get_test_state_in("America/Sao_Paulo");
        let query = "dates[start]=9999-12-31T23:00:00-05:00&dates[end]=9999-12-31T23:00:00-05:00";

        let response = get_home_page(State(state), RawQuery(Some(query.to_owned())))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let range = location_range(&response);
        assert_eq!((range.end - range.start).whole_days(), 7);
    }

    #[test]
    fn form_dates_outside_local_offset_keep_their_own_date() {
        let date_time = datetime!(9999-12-31 23:00 UTC);
        let offset = UtcOffset::from_hms(5, 0, 0).unwrap();

        assert_eq!(format_form_date(Some(date_time), offset), "9999-12-31");
        assert_eq!(format_greeting_date(date_time, offset), "31/12/9999");
    }

    #[tokio::test]
    async fn metrics_api_returns_json_metrics() {
        let state = get_test_state();
        add_transactions(&state);

        let metrics = get_metrics_api(State(state), RawQuery(Some(SEVEN_DAY_QUERY.to_owned())))
            .await
            .unwrap()
            .0;

        assert_eq!(metrics.total_transactions, 4);
        assert_eq!(metrics.total_amount, 100.0);
        assert_eq!(metrics.card_brands.len(), 4);
    }

    #[tokio::test]
    async fn metrics_api_rejects_incomplete_range() {
        let state = get_test_state();

        let result = get_metrics_api(
            State(state),
            RawQuery(Some("dates%5Bend%5D=2024-01-08T00%3A00%3A00.000Z".to_owned())),
        )
        .await;

        assert_eq!(result.unwrap_err(), Error::InvalidDateRange);
    }

    #[test]
    fn same_day_summary_shows_one_date() {
        let range = DateRange {
            start: datetime!(2024-03-05 00:00 UTC),
            end: datetime!(2024-03-05 18:00 UTC),
        };

        assert_eq!(
            summary_description(Some(range), UtcOffset::UTC),
            "Here is your summary on 05/03/2024"
        );
    }

    #[test]
    fn summary_dates_use_local_offset() {
        let range = DateRange {
            start: datetime!(2024-03-05 01:00 UTC),
            end: datetime!(2024-03-07 01:00 UTC),
        };
        let offset = UtcOffset::from_hms(-3, 0, 0).unwrap();

        assert_eq!(
            summary_description(Some(range), offset),
            "Here is your summary between 04/03/2024 until 06/03/2024"
        );
    }

    #[test]
    fn dates_form_decodes_preset_button() {
        let form: DatesForm =
            serde_html_form::from_str("start=2024-01-01&end=2024-01-08&preset=days-7").unwrap();

        assert_eq!(form.start.as_deref(), Some("2024-01-01"));
        assert_eq!(form.end.as_deref(), Some("2024-01-08"));
        assert_eq!(form.preset.as_deref(), Some("days-7"));

        let form: DatesForm = serde_html_form::from_str("start=2024-01-01").unwrap();
        assert_eq!(form.end, None);
        assert_eq!(form.preset, None);
    }

    fn get_location(response: &Response<Body>) -> String {
        response
            .headers()
            .get(LOCATION)
            .expect("redirect without location header")
            .to_str()
            .unwrap()
            .to_owned()
    }

    #[track_caller]
    fn location_range(response: &Response<Body>) -> DateRange {
        let location = get_location(response);
        let (_, query) = location.split_once('?').unwrap();
        decode(query).unwrap().range().unwrap()
    }

    async fn parse_html(response: Response<Body>) -> Html {
        let body = response.into_body();
        let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        let text = String::from_utf8_lossy(&body).to_string();

        Html::parse_document(&text)
    }

    fn select_text(html: &Html, selector: &str) -> String {
        let selector = Selector::parse(selector).unwrap();
        let element = html
            .select(&selector)
            .next()
            .unwrap_or_else(|| panic!("no element matches {selector:?}"));

        element
            .text()
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[track_caller]
    fn assert_valid_html(html: &Html) {
        assert!(
            html.errors.is_empty(),
            "Got HTML parsing errors: {:?}",
            html.errors
        );
    }

    #[track_caller]
    fn assert_exists(html: &Html, selector: &str) {
        let parsed = Selector::parse(selector).unwrap();
        assert!(
            html.select(&parsed).next().is_some(),
            "No element matches '{selector}'"
        );
    }
}
