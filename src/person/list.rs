//! People listing page.

use std::sync::{Arc, Mutex};

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
    navigation::NavBar,
    person::{Person, count_leave_per_person, get_all_people},
};

/// The state needed for the people listing page.
#[derive(Debug, Clone)]
pub struct PeoplePageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for PeoplePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A person with the URLs and counts needed to render their table row.
struct PersonRow {
    person: Person,
    view_url: String,
    edit_url: String,
    delete_url: String,
    leave_count: u32,
}

/// Render the list of people with their balances.
pub async fn get_people_page(State(state): State<PeoplePageState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let people = get_all_people(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve people: {error}"))?;

    let leave_per_person = count_leave_per_person(&connection)
        .inspect_err(|error| tracing::error!("Could not count leave per person: {error}"))?;

    let rows = people
        .into_iter()
        .map(|person| PersonRow {
            view_url: endpoints::format_endpoint(endpoints::PERSON_VIEW, person.id),
            edit_url: endpoints::format_endpoint(endpoints::EDIT_PERSON_VIEW, person.id),
            delete_url: endpoints::format_endpoint(endpoints::DELETE_PERSON, person.id),
            leave_count: leave_per_person.get(&person.id).copied().unwrap_or(0),
            person,
        })
        .collect::<Vec<_>>();

    Ok(people_view(&rows).into_response())
}

fn people_view(rows: &[PersonRow]) -> Markup {
    let new_person_route = endpoints::NEW_PERSON_VIEW;
    let nav_bar = NavBar::new(endpoints::PEOPLE_VIEW).into_html();

    let table_row = |row: &PersonRow| {
        let confirm_message = format!(
            "Are you sure you want to delete {}? This will also delete their {} leave record(s).",
            row.person.full_name(),
            row.leave_count
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE) { (link(&row.view_url, &row.person.full_name())) }
                td class=(TABLE_CELL_STYLE) { (row.person.email) }
                td class="px-6 py-4 tabular-nums" { (row.person.paid_days) }
                td class="px-6 py-4 tabular-nums" { (row.person.non_paid_days) }
                td class="px-6 py-4 tabular-nums" { (row.leave_count) }
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
                    h1 class="text-xl font-bold" { "People" }

                    a href=(new_person_route) class=(LINK_STYLE) { "Add Person" }
                }

                div class="overflow-x-auto dark:bg-gray-800"
                {
                    table class=(TABLE_STYLE)
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Email" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Paid Days" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Non-Paid Days" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Leave Taken" }
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
                                        colspan="6"
                                        class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                                    {
                                        "Nobody has been added yet. "
                                        a href=(new_person_route) class=(LINK_STYLE)
                                        {
                                            "Add the first person"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("People", &content)
}
