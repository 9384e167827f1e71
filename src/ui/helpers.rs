//! Helper functions for UI operations.
//!
//! Page fetch spawning, panic containment for background tasks, and
//! opening articles in the system browser.

use crate::app::{App, AppEvent};
use crate::feed::FetchTicket;
use crate::news::NewsError;
use crate::util::validate_url_for_open;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;

/// Wraps a future to catch panics and convert them to errors.
///
/// Instead of the task silently disappearing (caught by Tokio's runtime but
/// not handled), panics are converted to `Err(String)` containing the panic
/// message.
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            }
        })
}

/// Run the fetch described by `ticket` in the background.
///
/// Older fetches keep running: a superseded ticket still delivers its
/// result, which the controller reports as stale and ignores. The result
/// always comes back as `AppEvent::PageLoaded`, even if the task panics, so
/// the controller never stays stuck in a loading state.
pub(super) fn spawn_page_fetch(
    app: &mut App,
    ticket: FetchTicket,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    app.fetch_tasks.retain(|handle| !handle.is_finished());

    let client = app.news.clone();
    let tx = event_tx.clone();

    tracing::debug!(
        filter = %ticket.filter(),
        page = ticket.page(),
        session = ticket.session(),
        "Spawning page fetch"
    );

    app.fetch_tasks.push(tokio::spawn(async move {
        let result = match catch_task_panic(client.fetch_page(ticket.filter(), ticket.page())).await
        {
            Ok(result) => result,
            Err(panic_msg) => {
                tracing::error!(error = %panic_msg, "Page fetch task panicked");
                let _ = tx
                    .send(AppEvent::TaskPanicked {
                        task: "page_fetch",
                        error: panic_msg.clone(),
                    })
                    .await;
                Err(NewsError::TaskFailed(panic_msg))
            }
        };

        if let Err(e) = tx.send(AppEvent::PageLoaded { ticket, result }).await {
            tracing::warn!(error = %e, "Failed to send page result (receiver dropped)");
        }
    }));
}

/// Spawn the fetch if a ticket was issued. Convenience for input handlers.
pub(super) fn dispatch(
    app: &mut App,
    ticket: Option<FetchTicket>,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    if let Some(ticket) = ticket {
        spawn_page_fetch(app, ticket, event_tx);
    }
}

/// Open the selected article in the system browser.
pub(super) fn open_selected_in_browser(app: &mut App) {
    let Some(url) = app.selected_article().map(|a| a.url.clone()) else {
        return;
    };

    // SEC: Validate URL before open::that() to prevent command injection
    match validate_url_for_open(&url) {
        Err(e) => app.set_status(e.to_string()),
        Ok(url) => {
            if let Err(e) = open::that(url.as_str()) {
                app.set_status(format!("Failed to open browser: {}", e));
            } else {
                app.set_status("Opening in browser...");
            }
        }
    }
}
