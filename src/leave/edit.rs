//! Leave editing page and endpoint.
//!
//! Only the label and dates can be changed. The days granted and how they
//! were split between the balances stay as they were.

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
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        format_days,
    },
    leave::{LeaveDetailsForm, LeaveId, LeaveRecord, get_leave_record, update_leave_details},
    navigation::NavBar,
};

/// The state needed for the edit leave page and endpoint.
#[derive(Debug, Clone)]
pub struct EditLeaveState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditLeaveState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page for editing a leave record.
pub async fn get_edit_leave_page(
    Path(leave_id): Path<LeaveId>,
    State(state): State<EditLeaveState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let record = get_leave_record(leave_id, &connection).inspect_err(|error| {
        if *error != Error::NotFound {
            tracing::error!("Failed to retrieve leave record {leave_id}: {error}");
        }
    })?;

    Ok(edit_leave_view(&record).into_response())
}

/// Handle the edit leave form and redirect back to the leave record.
pub async fn update_leave_endpoint(
    Path(leave_id): Path<LeaveId>,
    State(state): State<EditLeaveState>,
    Form(form): Form<LeaveDetailsForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_leave_details(leave_id, &form, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::format_endpoint(
                endpoints::LEAVE_RECORD_VIEW,
                leave_id,
            )),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::UpdateMissingLeave) => Error::UpdateMissingLeave.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating leave record {leave_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

fn edit_leave_view(record: &LeaveRecord) -> Markup {
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_LEAVE_VIEW, record.id);
    let update_url = endpoints::format_endpoint(endpoints::PUT_LEAVE, record.id);
    let nav_bar = NavBar::new(&edit_url).into_html();
    let form_data = LeaveDetailsForm::from(record);

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Edit Leave" }

            form
                hx-put=(update_url)
                hx-target-error="#alert-container"
                hx-disabled-elt="find button"
                class="w-full space-y-4 md:space-y-6"
            {
                div
                {
                    label for="label" class=(FORM_LABEL_STYLE) { "Label" }

                    input
                        id="label"
                        type="text"
                        name="label"
                        value=(form_data.label)
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
                            value=(form_data.from_date)
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
                            value=(form_data.to_date)
                            required
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                p class="text-sm text-gray-500 dark:text-gray-400"
                {
                    (format_days(record.days)) " granted: "
                    (record.paid_days) " paid, " (record.non_paid_days) " non-paid. "
                    "The number of days cannot be changed."
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Leave" }
            }
        }
    };

    base("Edit Leave", &content)
}
