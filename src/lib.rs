//! Vacation Tool is a web app for tracking employee leave.
//!
//! Each person has a paid and a non-paid leave balance. Leave requests are
//! paid for out of the paid balance first and the non-paid balance second,
//! and are either granted in full or rejected without changing anything.
//!
//! This library serves HTML pages directly, plus a small JSON API.

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod api;
mod app_state;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod error;
mod error_page;
mod html;
mod leave;
mod ledger;
mod logging;
mod navigation;
mod person;
mod routing;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::{DEFAULT_BUSY_TIMEOUT, initialize as initialize_db, open as open_db};
pub use error::{Error, ErrorKind};
pub use leave::{LeaveId, LeaveRecord};
pub use ledger::{Allocation, Balances, DayCount, Grant, LeaveRequest, current_balances, grant_leave};
pub use logging::logging_middleware;
pub use person::{Person, PersonDetails, PersonForm, PersonId, create_person};
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install the terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
