//! The JSON API under `/api/v1`.
//!
//! These routes expose the same operations as the HTML pages for scripts and
//! other services. Errors are returned as `{"error": "..."}` with the status
//! code from [Error::status_code].

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{
        FromRef, FromRequest, FromRequestParts, Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::{Date, macros::format_description};

use crate::{
    AppState, Error,
    error::ErrorKind,
    leave::{
        LeaveForm, LeaveId, LeaveRecord, get_active_leave, get_all_leave_records,
        get_leave_for_person, get_leave_record,
    },
    ledger::{Balances, current_balances, grant_leave},
    person::{Person, PersonId, get_all_people, get_person},
};

/// The state needed for the JSON API.
#[derive(Debug, Clone)]
pub struct ApiState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ApiState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Wraps [Error] so that it is sent as JSON instead of an HTML page.
#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        let message = match self.0.kind() {
            ErrorKind::Persistence => {
                tracing::error!("An unexpected error occurred: {}", self.0);
                "Internal server error".to_owned()
            }
            _ => self.0.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(Error::MalformedRequest(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self(Error::MalformedRequest(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(Error::MalformedRequest(rejection.body_text()))
    }
}

/// A JSON body that is rejected with a JSON [ApiError] when it cannot be parsed.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path parameters that are rejected with a JSON [ApiError].
#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Query parameters that are rejected with a JSON [ApiError].
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// A person and every leave record they have been granted.
#[derive(Debug, Serialize)]
pub struct PersonWithLeave {
    #[serde(flatten)]
    pub person: Person,
    pub leave: Vec<LeaveRecord>,
}

/// The body returned after granting leave.
#[derive(Debug, Serialize)]
pub struct GrantResponse {
    pub id: LeaveId,
    pub paid_days: i64,
    pub non_paid_days: i64,
    pub replayed: bool,
}

/// Query parameters for listing leave.
#[derive(Debug, Default, Deserialize)]
pub struct LeaveQuery {
    /// Only include leave that covers this date, formatted as `YYYY-MM-DD`.
    pub date: Option<String>,
}

fn lock(state: &ApiState) -> Result<std::sync::MutexGuard<'_, Connection>, Error> {
    state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)
}

/// List every person.
pub async fn list_people(State(state): State<ApiState>) -> Result<Json<Vec<Person>>, ApiError> {
    let connection = lock(&state)?;

    Ok(Json(get_all_people(&connection)?))
}

/// Get a person along with their leave records.
pub async fn get_person_json(
    ApiPath(person_id): ApiPath<PersonId>,
    State(state): State<ApiState>,
) -> Result<Json<PersonWithLeave>, ApiError> {
    let connection = lock(&state)?;
    let person = get_person(person_id, &connection)?;
    let leave = get_leave_for_person(person_id, &connection)?;

    Ok(Json(PersonWithLeave { person, leave }))
}

/// Get a person's remaining balances.
pub async fn get_balances_json(
    ApiPath(person_id): ApiPath<PersonId>,
    State(state): State<ApiState>,
) -> Result<Json<Balances>, ApiError> {
    let connection = lock(&state)?;

    Ok(Json(current_balances(person_id, &connection)?))
}

/// List leave records, optionally only those that cover a given date.
pub async fn list_leave(
    State(state): State<ApiState>,
    ApiQuery(query): ApiQuery<LeaveQuery>,
) -> Result<Json<Vec<LeaveRecord>>, ApiError> {
    let date = query.date.map(|date| parse_date(&date)).transpose()?;
    let connection = lock(&state)?;

    let records = match date {
        Some(date) => get_active_leave(&date.to_string(), &connection)?,
        None => get_all_leave_records(&connection)?,
    };

    Ok(Json(records))
}

/// Get a single leave record.
pub async fn get_leave_json(
    ApiPath(leave_id): ApiPath<LeaveId>,
    State(state): State<ApiState>,
) -> Result<Json<LeaveRecord>, ApiError> {
    let connection = lock(&state)?;

    Ok(Json(get_leave_record(leave_id, &connection)?))
}

/// Grant leave.
///
/// Responds with `201 Created` for a new grant and `200 OK` when the request
/// ID matched an earlier grant.
pub async fn grant_leave_json(
    State(state): State<ApiState>,
    ApiJson(form): ApiJson<LeaveForm>,
) -> Result<Response, ApiError> {
    let request = form.into_request()?;
    let connection = lock(&state)?;
    let grant = grant_leave(&request, &connection)?;

    let status = if grant.replayed {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };

    let body = GrantResponse {
        id: grant.leave_id,
        paid_days: grant.allocation.paid,
        non_paid_days: grant.allocation.non_paid,
        replayed: grant.replayed,
    };

    Ok((status, Json(body)).into_response())
}

fn parse_date(text: &str) -> Result<Date, Error> {
    Date::parse(text.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| Error::InvalidDate(text.to_owned()))
}
