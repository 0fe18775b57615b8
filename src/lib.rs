//! Fluxo is a web app for keeping the books of a small business: ledger
//! entries, suppliers, savings jars, credit card limits and cash-flow reports.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod card;
mod category;
mod database_id;
mod db;
mod endpoints;
mod entry;
mod error;
mod home;
mod html;
mod internal_server_error;
mod jar;
mod logging;
mod money;
mod name;
mod navigation;
mod not_found;
mod period;
mod report;
mod routing;
mod supplier;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use card::{NewCard, create_card};
pub use category::{NewCategory, StatementLine, create_category};
pub use db::initialize as initialize_db;
pub use entry::{EntryKind, NewEntry, PaymentMethod, apply_entry_create};
pub use error::Error;
pub use jar::{NewJar, create_jar, transfer_to_jar};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use name::Name;
pub use period::{CutoffDay, DEFAULT_CUTOFF_DAY};
pub use routing::build_router;
pub use supplier::{NewSupplier, TaxId, create_supplier};
pub use timezone::get_local_offset;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
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
                tracing::error!("failed to install signal handler: {error}");
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
