//! Person deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    person::{PersonId, delete_person},
};

/// The state needed for deleting a person.
#[derive(Debug, Clone)]
pub struct DeletePersonEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeletePersonEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete a person along with their leave records. Returns success alert or error.
pub async fn delete_person_endpoint(
    Path(person_id): Path<PersonId>,
    State(state): State<DeletePersonEndpointState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_person(person_id, &connection) {
        Ok(()) => {
            tracing::info!("deleted person {person_id} and their leave records");

            Alert::SuccessSimple {
                message: "Person deleted successfully".to_owned(),
            }
            .into_response()
        }
        Err(Error::DeleteMissingPerson) => Error::DeleteMissingPerson.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting person {person_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
