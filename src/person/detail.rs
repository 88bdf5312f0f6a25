//! A person's balances and leave history.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
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
    leave::{LeaveRecord, get_leave_for_person},
    navigation::NavBar,
    person::{Person, PersonId, get_person},
};

/// The state needed for the person page.
#[derive(Debug, Clone)]
pub struct PersonPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for PersonPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render a person's balances and the leave they have taken.
pub async fn get_person_page(
    Path(person_id): Path<PersonId>,
    State(state): State<PersonPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let person = get_person(person_id, &connection)?;
    let leave = get_leave_for_person(person_id, &connection).inspect_err(|error| {
        tracing::error!("Failed to retrieve leave for person {person_id}: {error}")
    })?;

    Ok(person_view(&person, &leave).into_response())
}

fn person_view(person: &Person, leave: &[LeaveRecord]) -> Markup {
    let person_url = endpoints::format_endpoint(endpoints::PERSON_VIEW, person.id);
    let nav_bar = NavBar::new(&person_url).into_html();
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_PERSON_VIEW, person.id);
    let request_leave_url = format!("{}?person_id={}", endpoints::NEW_LEAVE_VIEW, person.id);
    let days_taken: i64 = leave.iter().map(|record| record.days).sum();

    let balance_card = |title: &str, days: i64| {
        html!(
            div class=(STAT_CARD_STYLE)
            {
                p class="text-sm text-gray-500 dark:text-gray-400" { (title) }
                p class="text-2xl font-semibold tabular-nums" data-balance=(title) { (days) }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-6 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    div
                    {
                        h1 class="text-xl font-bold" { (person.full_name()) }
                        p class="text-sm text-gray-500 dark:text-gray-400"
                        {
                            (person.email) " · age " (person.age)
                        }
                    }

                    div class="flex gap-4"
                    {
                        a href=(request_leave_url) class=(LINK_STYLE) { "Request Leave" }
                        a href=(edit_url) class=(LINK_STYLE) { "Edit" }
                    }
                }

                div class="grid grid-cols-1 sm:grid-cols-3 gap-4"
                {
                    (balance_card("Paid", person.paid_days))
                    (balance_card("Non-Paid", person.non_paid_days))
                    (balance_card("Taken", days_taken))
                }

                h2 class="text-lg font-semibold" { "Leave History" }

                div class="overflow-x-auto dark:bg-gray-800"
                {
                    table class=(TABLE_STYLE)
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Label" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "From" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "To" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Days" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Paid / Non-Paid" }
                            }
                        }

                        tbody
                        {
                            @for record in leave {
                                tr class=(TABLE_ROW_STYLE)
                                {
                                    td class=(TABLE_CELL_STYLE)
                                    {
                                        (link(
                                            &endpoints::format_endpoint(endpoints::LEAVE_RECORD_VIEW, record.id),
                                            &record.label,
                                        ))
                                    }
                                    td class=(TABLE_CELL_STYLE) { (record.from_date) }
                                    td class=(TABLE_CELL_STYLE) { (record.to_date) }
                                    td class=(TABLE_CELL_STYLE) { (format_days(record.days)) }
                                    td class=(TABLE_CELL_STYLE)
                                    {
                                        (record.paid_days) " / " (record.non_paid_days)
                                    }
                                }
                            }

                            @if leave.is_empty() {
                                tr
                                {
                                    td
                                        colspan="5"
                                        class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                                    {
                                        "No leave taken yet."
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base(&person.full_name(), &content)
}
