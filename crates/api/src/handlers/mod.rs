pub mod admin_auth;
pub mod dashboard;
pub mod inquiries;
pub mod products;
pub mod quotations;
pub mod site_info;
pub mod testimonials;
pub mod uploads;
pub mod worked_sites;

use convex_events::{ChangeKind, ErrorReporter, TableChange};
use convex_core::types::DbId;

use crate::state::AppState;

/// Result of a public list query, falling back to an empty list.
///
/// The marketing pages render an empty section rather than an error when
/// the database is unavailable; the failure is still reported.
pub(crate) fn list_or_empty<T>(
    result: Result<Vec<T>, sqlx::Error>,
    reporter: &ErrorReporter,
    operation: &str,
) -> Vec<T> {
    result.unwrap_or_else(|e| {
        reporter.database(operation, &e, None);
        Vec::new()
    })
}

/// Announce a row change on the event bus.
pub(crate) fn publish_change(state: &AppState, table: &str, kind: ChangeKind, id: DbId) {
    state.event_bus.publish(TableChange::new(table, kind, id));
}
