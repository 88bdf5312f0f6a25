//! Leave listing page.

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
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        TABLE_STYLE, base, edit_delete_action_links, link,
    },
    leave::{LeaveRecord, get_all_leave_records},
    navigation::NavBar,
    person::get_all_people,
};

/// The state needed for the leave listing page.
#[derive(Debug, Clone)]
pub struct LeaveListState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LeaveListState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

struct LeaveRow {
    record: LeaveRecord,
    person_name: String,
    person_url: String,
    view_url: String,
    edit_url: String,
    delete_url: String,
}

/// Render every leave record, most recent first.
pub async fn get_leave_list_page(State(state): State<LeaveListState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let names: HashMap<_, _> = get_all_people(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve people: {error}"))?
        .into_iter()
        .map(|person| (person.id, person.full_name()))
        .collect();

    let rows = get_all_leave_records(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve leave records: {error}"))?
        .into_iter()
        .map(|record| LeaveRow {
            person_name: names
                .get(&record.person_id)
                .cloned()
                .unwrap_or_else(|| format!("Person {}", record.person_id)),
            person_url: endpoints::format_endpoint(endpoints::PERSON_VIEW, record.person_id),
            view_url: endpoints::format_endpoint(endpoints::LEAVE_RECORD_VIEW, record.id),
            edit_url: endpoints::format_endpoint(endpoints::EDIT_LEAVE_VIEW, record.id),
            delete_url: endpoints::format_endpoint(endpoints::DELETE_LEAVE, record.id),
            record,
        })
        .collect::<Vec<_>>();

    Ok(leave_list_view(&rows).into_response())
}

fn leave_list_view(rows: &[LeaveRow]) -> Markup {
    let nav_bar = NavBar::new(endpoints::LEAVE_VIEW).into_html();

    let table_row = |row: &LeaveRow| {
        let confirm_message = format!(
            "Are you sure you want to delete \"{}\"? {}'s balances will not be restored.",
            row.record.label, row.person_name
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE) { (link(&row.view_url, &row.record.label)) }
                td class=(TABLE_CELL_STYLE) { (link(&row.person_url, &row.person_name)) }
                td class=(TABLE_CELL_STYLE) { (row.record.from_date) }
                td class=(TABLE_CELL_STYLE) { (row.record.to_date) }
                td class="px-6 py-4 tabular-nums" { (row.record.paid_days) }
                td class="px-6 py-4 tabular-nums" { (row.record.non_paid_days) }
                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(
                            &row.edit_url,
                            &row.delete_url,
                            &confirm_message,
                            "closest tr",
                            "delete",
                        ))
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Leave" }

                    a href=(endpoints::NEW_LEAVE_VIEW) class=(LINK_STYLE) { "Request Leave" }
                }

                div class="overflow-x-auto dark:bg-gray-800"
                {
                    table class=(TABLE_STYLE)
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Label" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Person" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "From" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "To" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Paid" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Non-Paid" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for row in rows {
                                (table_row(row))
                            }

                            @if rows.is_empty() {
                                tr
                                {
                                    td
                                        colspan="7"
                                        class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                                    {
                                        "No leave has been granted yet."
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Leave", &content)
}
