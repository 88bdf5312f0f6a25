//! A single leave record.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{LINK_STYLE, PAGE_CONTAINER_STYLE, STAT_CARD_STYLE, base, format_days, link},
    leave::{LeaveId, LeaveRecord, get_leave_record},
    navigation::NavBar,
    person::{Person, get_person},
};

/// The state needed for the leave record page.
#[derive(Debug, Clone)]
pub struct LeavePageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LeavePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render a leave record and how its days were allocated.
pub async fn get_leave_page(
    Path(leave_id): Path<LeaveId>,
    State(state): State<LeavePageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let record = get_leave_record(leave_id, &connection)?;
    let person = get_person(record.person_id, &connection).inspect_err(|error| {
        tracing::error!(
            "Could not find person {} for leave record {leave_id}: {error}",
            record.person_id
        )
    })?;

    Ok(leave_view(&record, &person).into_response())
}

fn leave_view(record: &LeaveRecord, person: &Person) -> Markup {
    let leave_url = endpoints::format_endpoint(endpoints::LEAVE_RECORD_VIEW, record.id);
    let nav_bar = NavBar::new(&leave_url).into_html();
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_LEAVE_VIEW, record.id);
    let person_url = endpoints::format_endpoint(endpoints::PERSON_VIEW, person.id);

    let allocation_card = |title: &str, days: i64| {
        html!(
            div class=(STAT_CARD_STYLE)
            {
                p class="text-sm text-gray-500 dark:text-gray-400" { (title) }
                p class="text-2xl font-semibold tabular-nums" data-allocation=(title) { (days) }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-6 w-full lg:max-w-3xl"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    div
                    {
                        h1 class="text-xl font-bold" { (record.label) }
                        p class="text-sm text-gray-500 dark:text-gray-400"
                        {
                            (link(&person_url, &person.full_name()))
                            " · " (record.from_date) " to " (record.to_date)
                        }
                    }

                    a href=(edit_url) class=(LINK_STYLE) { "Edit" }
                }

                div class="grid grid-cols-1 sm:grid-cols-3 gap-4"
                {
                    (allocation_card("Total", record.days))
                    (allocation_card("Paid", record.paid_days))
                    (allocation_card("Non-Paid", record.non_paid_days))
                }

                p class="text-sm text-gray-500 dark:text-gray-400"
                {
                    (format_days(record.days)) " granted on "
                    (record.created_at.date()) "."
                }
            }
        }
    );

    base(&record.label, &content)
}
