//! The dashboard: a summary of balances and who is away today.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, STAT_CARD_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, TABLE_STYLE, base, format_days, link,
    },
    leave::{LeaveRecord, get_active_leave},
    navigation::NavBar,
    person::{Person, PersonId, get_all_people},
    timezone::local_today,
};

/// The state needed for the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Totals shown in the summary cards.
#[derive(Debug, PartialEq, Eq)]
struct Summary {
    headcount: usize,
    on_leave: usize,
    paid_days: i64,
    non_paid_days: i64,
}

impl Summary {
    fn new(people: &[Person], active_leave: &[LeaveRecord]) -> Self {
        let mut away: Vec<PersonId> = active_leave.iter().map(|record| record.person_id).collect();
        away.sort_unstable();
        away.dedup();

        Self {
            headcount: people.len(),
            on_leave: away.len(),
            paid_days: people.iter().map(|person| person.paid_days).sum(),
            non_paid_days: people.iter().map(|person| person.non_paid_days).sum(),
        }
    }
}

/// Render the dashboard page.
///
/// "Today" is the current date in the server's configured timezone.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let people = get_all_people(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve people: {error}"))?;
    let active_leave = get_active_leave(&today.to_string(), &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve leave for {today}: {error}"))?;

    Ok(dashboard_view(&today.to_string(), &people, &active_leave).into_response())
}

fn dashboard_view(today: &str, people: &[Person], active_leave: &[LeaveRecord]) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let summary = Summary::new(people, active_leave);
    let names: HashMap<PersonId, String> = people
        .iter()
        .map(|person| (person.id, person.full_name()))
        .collect();

    let stat_card = |title: &str, value: String| {
        html!(
            div class=(STAT_CARD_STYLE)
            {
                p class="text-sm text-gray-500 dark:text-gray-400" { (title) }
                p class="text-2xl font-semibold tabular-nums" data-stat=(title) { (value) }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-6 w-full lg:max-w-5xl"
            {
                header
                {
                    h1 class="text-xl font-bold" { "Dashboard" }
                    p class="text-sm text-gray-500 dark:text-gray-400" { "Today is " (today) }
                }

                div class="grid grid-cols-2 lg:grid-cols-4 gap-4"
                {
                    (stat_card("People", summary.headcount.to_string()))
                    (stat_card("On Leave Today", summary.on_leave.to_string()))
                    (stat_card("Paid Days Left", summary.paid_days.to_string()))
                    (stat_card("Non-Paid Days Left", summary.non_paid_days.to_string()))
                }

                h2 class="text-lg font-semibold" { "On Leave Today" }

                @if active_leave.is_empty() {
                    p class="text-gray-500 dark:text-gray-400"
                    {
                        "Everyone is in today. "
                        a href=(endpoints::NEW_LEAVE_VIEW) class=(LINK_STYLE) { "Request leave" }
                    }
                } @else {
                    div class="overflow-x-auto dark:bg-gray-800"
                    {
                        table class=(TABLE_STYLE)
                        {
                            thead class=(TABLE_HEADER_STYLE)
                            {
                                tr
                                {
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Person" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Leave" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Back After" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Days" }
                                }
                            }

                            tbody
                            {
                                @for record in active_leave {
                                    @let name = names
                                        .get(&record.person_id)
                                        .map(String::as_str)
                                        .unwrap_or("Unknown");

                                    tr class=(TABLE_ROW_STYLE)
                                    {
                                        td class=(TABLE_CELL_STYLE)
                                        {
                                            (link(
                                                &endpoints::format_endpoint(endpoints::PERSON_VIEW, record.person_id),
                                                name,
                                            ))
                                        }
                                        td class=(TABLE_CELL_STYLE)
                                        {
                                            (link(
                                                &endpoints::format_endpoint(endpoints::LEAVE_RECORD_VIEW, record.id),
                                                &record.label,
                                            ))
                                        }
                                        td class=(TABLE_CELL_STYLE) { (record.to_date) }
                                        td class=(TABLE_CELL_STYLE) { (format_days(record.days)) }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Dashboard", &content)
}
