//! The request leave page and the endpoint that grants leave.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        LINK_STYLE, base,
    },
    leave::LeaveForm,
    ledger::grant_leave,
    navigation::NavBar,
    person::{Person, PersonId, get_all_people},
};

/// The state needed for the request leave page and endpoint.
#[derive(Debug, Clone)]
pub struct CreateLeaveState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateLeaveState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Query parameters for the request leave page.
#[derive(Debug, Default, Deserialize)]
pub struct NewLeaveQuery {
    /// The person to select in the form.
    pub person_id: Option<PersonId>,
}

/// Render the request leave page.
pub async fn get_new_leave_page(
    State(state): State<CreateLeaveState>,
    Query(query): Query<NewLeaveQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let people = get_all_people(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve people: {error}"))?;

    Ok(new_leave_view(&people, query.person_id).into_response())
}

/// Grant leave and redirect to the new leave record.
///
/// Submitting the same form twice returns the original leave record instead
/// of deducting the days again.
pub async fn create_leave_endpoint(
    State(state): State<CreateLeaveState>,
    Form(form): Form<LeaveForm>,
) -> Response {
    let request = match form.into_request() {
        Ok(request) => request,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match grant_leave(&request, &connection) {
        Ok(grant) => (
            HxRedirect(endpoints::format_endpoint(
                endpoints::LEAVE_RECORD_VIEW,
                grant.leave_id,
            )),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) if error.status_code().is_client_error() => {
            tracing::debug!(
                "rejected leave request for person {}: {error}",
                request.person_id
            );
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while granting leave to person {}: {error}",
                request.person_id
            );
            error.into_alert_response()
        }
    }
}

fn new_leave_view(people: &[Person], selected_person: Option<PersonId>) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_LEAVE_VIEW).into_html();
    let request_id = Uuid::new_v4().to_string();

    let form = html! {
        form
            hx-post=(endpoints::POST_LEAVE)
            hx-target-error="#alert-container"
            hx-disabled-elt="find button"
            class="w-full space-y-4 md:space-y-6"
        {
            input type="hidden" name="request_id" value=(request_id);

            div
            {
                label for="person_id" class=(FORM_LABEL_STYLE) { "Person" }

                select id="person_id" name="person_id" required class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for person in people {
                        option
                            value=(person.id)
                            selected[selected_person == Some(person.id)]
                        {
                            (person.full_name()) " (" (person.paid_days) " paid, "
                            (person.non_paid_days) " non-paid)"
                        }
                    }
                }
            }

            div
            {
                label for="label" class=(FORM_LABEL_STYLE) { "Label" }

                input
                    id="label"
                    type="text"
                    name="label"
                    placeholder="Summer holiday"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="grid grid-cols-2 gap-4"
            {
                div
                {
                    label for="from_date" class=(FORM_LABEL_STYLE) { "From" }

                    input
                        id="from_date"
                        type="date"
                        name="from_date"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="to_date" class=(FORM_LABEL_STYLE) { "To" }

                    input
                        id="to_date"
                        type="date"
                        name="to_date"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            div
            {
                label for="days" class=(FORM_LABEL_STYLE) { "Days" }

                input
                    id="days"
                    type="number"
                    name="days"
                    min="1"
                    step="1"
                    value="1"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);

                p class="mt-1 text-sm text-gray-500 dark:text-gray-400"
                {
                    "Paid days are used first. Any remaining days come from non-paid leave."
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Request Leave" }
        }
    };

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Request Leave" }

            @if people.is_empty() {
                p
                {
                    "Leave can only be requested for an existing person. "
                    a href=(endpoints::NEW_PERSON_VIEW) class=(LINK_STYLE) { "Add a person" }
                    " first."
                }
            } @else {
                (form)
            }
        }
    };

    base("Request Leave", &content)
}

#[cfg(test)]
mod new_leave_page_tests {
    use axum::{
        extract::{Query, State},
        http::StatusCode,
    };
    use scraper::Selector;

    use crate::{
        endpoints,
        leave::get_new_leave_page,
        person::{create_person, test_person_details},
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_hx_endpoint, assert_valid_html,
            must_get_form, parse_html_document, test_db_connection,
        },
    };

    use super::{CreateLeaveState, NewLeaveQuery};

    #[tokio::test]
    async fn render_page() {
        let state = CreateLeaveState {
            db_connection: test_db_connection(),
        };
        let person = create_person(
            test_person_details("alice@example.com"),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = get_new_leave_page(
            State(state),
            Query(NewLeaveQuery {
                person_id: Some(person.id),
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::POST_LEAVE, "hx-post");
        assert_form_input(&form, "person_id", "select");
        assert_form_input(&form, "label", "text");
        assert_form_input(&form, "from_date", "date");
        assert_form_input(&form, "to_date", "date");
        assert_form_input(&form, "days", "number");
        assert_form_submit_button(&form);

        let selected = form
            .select(&Selector::parse("option[selected]").unwrap())
            .next()
            .expect("No selected option");
        assert_eq!(selected.value().attr("value"), Some(person.id.to_string().as_str()));

        let request_id = form
            .select(&Selector::parse("input[name=request_id]").unwrap())
            .next()
            .and_then(|input| input.value().attr("value"))
            .expect("No request ID");
        assert!(uuid::Uuid::parse_str(request_id).is_ok());
    }

    #[tokio::test]
    async fn asks_for_a_person_first_when_there_is_nobody() {
        let state = CreateLeaveState {
            db_connection: test_db_connection(),
        };

        let response = get_new_leave_page(State(state), Query(NewLeaveQuery::default()))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert!(
            html.select(&Selector::parse("form").unwrap())
                .next()
                .is_none()
        );
    }
}

#[cfg(test)]
mod create_leave_endpoint_tests {
    use axum::{Form, extract::State, http::StatusCode};

    use crate::{
        endpoints,
        leave::{LeaveForm, create_leave_endpoint, get_all_leave_records},
        ledger::{Balances, current_balances},
        person::{PersonDetails, create_person, test_person_details},
        test_utils::{
            assert_alert_message, assert_hx_redirect, assert_valid_html, parse_html_fragment,
            test_db_connection,
        },
    };

    use super::CreateLeaveState;

    fn state_with_person(paid_days: i64, non_paid_days: i64) -> (CreateLeaveState, i64) {
        let state = CreateLeaveState {
            db_connection: test_db_connection(),
        };
        let person = create_person(
            PersonDetails {
                paid_days,
                non_paid_days,
                ..test_person_details("alice@example.com")
            },
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        (state, person.id)
    }

    fn leave_form(person_id: i64, days: i64) -> LeaveForm {
        LeaveForm {
            person_id,
            label: "Holiday".to_owned(),
            from_date: "2024-12-20".to_owned(),
            to_date: "2025-01-05".to_owned(),
            days,
            request_id: Some("8f14e45f-ceea-467f-a8c4-5d6e4a2b9a01".to_owned()),
        }
    }

    #[tokio::test]
    async fn grants_leave_and_redirects() {
        let (state, person_id) = state_with_person(5, 10);

        let response =
            create_leave_endpoint(State(state.clone()), Form(leave_form(person_id, 8))).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(
            &response,
            &endpoints::format_endpoint(endpoints::LEAVE_RECORD_VIEW, 1),
        );
        assert_eq!(
            current_balances(person_id, &state.db_connection.lock().unwrap()),
            Ok(Balances {
                paid: 0,
                non_paid: 7
            })
        );
    }

    #[tokio::test]
    async fn resubmitted_form_deducts_once() {
        let (state, person_id) = state_with_person(20, 0);

        create_leave_endpoint(State(state.clone()), Form(leave_form(person_id, 5))).await;
        let response =
            create_leave_endpoint(State(state.clone()), Form(leave_form(person_id, 5))).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(
            current_balances(person_id, &connection),
            Ok(Balances {
                paid: 15,
                non_paid: 0
            })
        );
        assert_eq!(get_all_leave_records(&connection).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn insufficient_balance_returns_alert() {
        let (state, person_id) = state_with_person(15, 0);

        let response =
            create_leave_endpoint(State(state.clone()), Form(leave_form(person_id, 20))).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        assert_alert_message(&html, "Not enough leave");
        assert_eq!(
            current_balances(person_id, &state.db_connection.lock().unwrap()),
            Ok(Balances {
                paid: 15,
                non_paid: 0
            })
        );
    }

    #[tokio::test]
    async fn zero_days_returns_alert() {
        let (state, person_id) = state_with_person(15, 0);

        let response = create_leave_endpoint(State(state), Form(leave_form(person_id, 0))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = parse_html_fragment(response).await;
        assert_alert_message(&html, "Invalid number of days");
    }

    #[tokio::test]
    async fn unknown_person_returns_alert() {
        let (state, _) = state_with_person(15, 0);

        let response = create_leave_endpoint(State(state), Form(leave_form(77, 1))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = parse_html_fragment(response).await;
        assert_alert_message(&html, "Unknown person");
    }
}
