//! Person creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    person::{
        PersonForm, create_person,
        form::{FormTarget, person_form_view},
    },
};

/// The state needed for creating a person.
#[derive(Debug, Clone)]
pub struct CreatePersonEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreatePersonEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page for adding a person.
pub async fn get_new_person_page() -> Response {
    new_person_view().into_response()
}

/// Handle the new person form and redirect to the new person's page.
pub async fn create_person_endpoint(
    State(state): State<CreatePersonEndpointState>,
    Form(form): Form<PersonForm>,
) -> Response {
    let details = match form.validate() {
        Ok(details) => details,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_person(details, &connection) {
        Ok(person) => {
            tracing::info!("created person {} ({})", person.id, person.full_name());

            (
                HxRedirect(endpoints::format_endpoint(endpoints::PERSON_VIEW, person.id)),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(Error::DuplicateEmail) => Error::DuplicateEmail.into_alert_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a person: {error}");
            error.into_alert_response()
        }
    }
}

fn new_person_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_PERSON_VIEW).into_html();
    let form = person_form_view(
        &PersonForm::default(),
        FormTarget::Create(endpoints::POST_PERSON),
    );

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Add Person" }
            (form)
        }
    };

    base("Add Person", &content)
}
