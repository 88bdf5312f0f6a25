//! The endpoint URIs for pages and API routes.
//!
//! For endpoints that take a parameter, e.g., '/people/{person_id}', use [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The page showing who is on leave today.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page listing everyone and their balances.
pub const PEOPLE_VIEW: &str = "/people";
/// The page for adding a person.
pub const NEW_PERSON_VIEW: &str = "/people/new";
/// The page showing a person's balances and leave history.
pub const PERSON_VIEW: &str = "/people/{person_id}";
/// The page for editing a person.
pub const EDIT_PERSON_VIEW: &str = "/people/{person_id}/edit";
/// The page listing all leave records.
pub const LEAVE_VIEW: &str = "/leave";
/// The page for requesting leave.
pub const NEW_LEAVE_VIEW: &str = "/leave/new";
/// The page showing a single leave record.
pub const LEAVE_RECORD_VIEW: &str = "/leave/{leave_id}";
/// The page for editing the label and dates of a leave record.
pub const EDIT_LEAVE_VIEW: &str = "/leave/{leave_id}/edit";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to create a person.
pub const POST_PERSON: &str = "/api/people";
/// The route to update a person.
pub const PUT_PERSON: &str = "/api/people/{person_id}";
/// The route to delete a person.
pub const DELETE_PERSON: &str = "/api/people/{person_id}";
/// The route to request leave.
pub const POST_LEAVE: &str = "/api/leave";
/// The route to update a leave record.
pub const PUT_LEAVE: &str = "/api/leave/{leave_id}";
/// The route to delete a leave record.
pub const DELETE_LEAVE: &str = "/api/leave/{leave_id}";

/// The JSON route listing people.
pub const API_PEOPLE: &str = "/api/v1/people";
/// The JSON route for a person and their leave.
pub const API_PERSON: &str = "/api/v1/people/{person_id}";
/// The JSON route for a person's current balances.
pub const API_PERSON_BALANCES: &str = "/api/v1/people/{person_id}/balances";
/// The JSON route listing leave records and granting leave.
pub const API_LEAVE: &str = "/api/v1/leave";
/// The JSON route for a single leave record.
pub const API_LEAVE_RECORD: &str = "/api/v1/leave/{leave_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/people/{person_id}', '{person_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// Paths without a parameter are returned unchanged.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    #[track_caller]
    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok(), "{uri} is not a valid URI");
    }

    #[test]
    fn endpoints_are_valid_uris() {
        for endpoint in [
            endpoints::ROOT,
            endpoints::DASHBOARD_VIEW,
            endpoints::PEOPLE_VIEW,
            endpoints::NEW_PERSON_VIEW,
            endpoints::PERSON_VIEW,
            endpoints::EDIT_PERSON_VIEW,
            endpoints::LEAVE_VIEW,
            endpoints::NEW_LEAVE_VIEW,
            endpoints::LEAVE_RECORD_VIEW,
            endpoints::EDIT_LEAVE_VIEW,
            endpoints::INTERNAL_ERROR_VIEW,
            endpoints::STATIC,
            endpoints::POST_PERSON,
            endpoints::PUT_PERSON,
            endpoints::DELETE_PERSON,
            endpoints::POST_LEAVE,
            endpoints::PUT_LEAVE,
            endpoints::DELETE_LEAVE,
            endpoints::API_PEOPLE,
            endpoints::API_PERSON,
            endpoints::API_PERSON_BALANCES,
            endpoints::API_LEAVE,
            endpoints::API_LEAVE_RECORD,
        ] {
            assert_endpoint_is_valid_uri(&format_endpoint(endpoint, 1));
        }
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());

        // Parameter with single word should also work.
        let formatted_path = format_endpoint("/hello/{world}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint(endpoints::API_PERSON_BALANCES, 7);

        assert_eq!(formatted_path, "/api/v1/people/7/balances");
    }
}
