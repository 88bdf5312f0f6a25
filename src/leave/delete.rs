//! Leave deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    leave::{LeaveId, delete_leave_record},
};

/// The state needed for deleting a leave record.
#[derive(Debug, Clone)]
pub struct DeleteLeaveEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteLeaveEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete a leave record. The person's balances are left unchanged.
pub async fn delete_leave_endpoint(
    Path(leave_id): Path<LeaveId>,
    State(state): State<DeleteLeaveEndpointState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_leave_record(leave_id, &connection) {
        Ok(()) => {
            tracing::info!("deleted leave record {leave_id}");

            Alert::SuccessSimple {
                message: "Leave deleted successfully".to_owned(),
            }
            .into_response()
        }
        Err(Error::DeleteMissingLeave) => Error::DeleteMissingLeave.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting leave record {leave_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
