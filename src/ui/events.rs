//! Application event handling.
//!
//! Applies background task results to the application state.

use crate::app::{App, AppEvent};
use crate::feed::Completion;

/// Handle application events from background tasks.
///
/// Returns how a page result was applied, `None` for other events.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) -> Option<Completion> {
    match event {
        AppEvent::PageLoaded { ticket, result } => {
            let failed = result.is_err();
            let completion = app.feed.complete(&ticket, result, std::time::Instant::now());
            match completion {
                Completion::Applied => {
                    if failed {
                        tracing::debug!(page = ticket.page(), "Page failed, error banner shown");
                    }
                    app.clamp_selection();
                }
                Completion::Stale => {
                    tracing::debug!(
                        filter = %ticket.filter(),
                        page = ticket.page(),
                        "Discarded result of superseded fetch"
                    );
                }
            }
            Some(completion)
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error = %error, "Background task panicked");
            app.set_status(format!("Internal error in {}: {}", task, error));
            None
        }
    }
}
