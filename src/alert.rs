//! Alert messages rendered into the page's alert container by htmx.

use axum::response::{Html, IntoResponse, Response};
use maud::html;

/// A success or error message shown to the user after a form submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A success message without details.
    SuccessSimple { message: String },
    /// An error message with an explanation of what went wrong.
    Error { message: String, details: String },
    /// An error message without details.
    ErrorSimple { message: String },
}

impl Alert {
    /// Render the alert as an HTML fragment.
    ///
    /// The message is always the first `<p>` element in the fragment.
    pub fn into_html(self) -> Html<String> {
        let (style, message, details) = match self {
            Alert::SuccessSimple { message } => (
                "text-green-800 border-green-300 bg-green-50 \
                dark:bg-gray-800 dark:text-green-400 dark:border-green-800",
                message,
                None,
            ),
            Alert::Error { message, details } => (
                "text-red-800 border-red-300 bg-red-50 \
                dark:bg-gray-800 dark:text-red-400 dark:border-red-800",
                message,
                Some(details),
            ),
            Alert::ErrorSimple { message } => (
                "text-red-800 border-red-300 bg-red-50 \
                dark:bg-gray-800 dark:text-red-400 dark:border-red-800",
                message,
                None,
            ),
        };

        let markup = html!(
            div class={ "alert p-4 mb-4 text-sm border rounded " (style) } role="alert"
            {
                p class="font-medium" { (message) }

                @if let Some(details) = details {
                    p { (details) }
                }
            }
        );

        Html(markup.into_string())
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}
