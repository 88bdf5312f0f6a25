//! Person editing page and endpoint.
//!
//! Editing a person may overwrite their balances directly. This is an
//! administrative override and does not create a leave record.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
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
        Person, PersonForm, PersonId,
        form::{FormTarget, person_form_view},
        get_person, update_person,
    },
};

/// The state needed for the edit person page and endpoint.
#[derive(Debug, Clone)]
pub struct EditPersonState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditPersonState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page for editing a person.
pub async fn get_edit_person_page(
    Path(person_id): Path<PersonId>,
    State(state): State<EditPersonState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let person = get_person(person_id, &connection).inspect_err(|error| {
        if *error != Error::NotFound {
            tracing::error!("Failed to retrieve person {person_id}: {error}");
        }
    })?;

    Ok(edit_person_view(&person).into_response())
}

/// Handle the edit person form and redirect back to the person's page.
pub async fn update_person_endpoint(
    Path(person_id): Path<PersonId>,
    State(state): State<EditPersonState>,
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

    match update_person(person_id, details, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::format_endpoint(endpoints::PERSON_VIEW, person_id)),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error @ (Error::UpdateMissingPerson | Error::DuplicateEmail)) => {
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating person {person_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

fn edit_person_view(person: &Person) -> Markup {
    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_PERSON_VIEW, person.id);
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_PERSON, person.id);
    let nav_bar = NavBar::new(&edit_endpoint).into_html();
    let form = person_form_view(
        &PersonForm::from(person),
        FormTarget::Update(&update_endpoint),
    );

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Edit " (person.full_name()) }
            (form)
        }
    };

    base("Edit Person", &content)
}
