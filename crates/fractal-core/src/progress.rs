//! Spinner around blocking flake evaluations.
//!
//! The evaluation runs on tokio's blocking pool while the calling task
//! ticks the spinner. The caller always waits for the evaluation to finish;
//! there is no cancellation and no timeout.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::debug;

/// How often the spinner advances while waiting
pub const SPINNER_INTERVAL: Duration = Duration::from_millis(100);

/// Spinner drawn on stderr so it never mixes with rendered output
pub fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_string());
    bar
}

/// Run `task` on a worker thread and wait for it, ticking `spinner` (if any)
/// every [`SPINNER_INTERVAL`].
///
/// Returns whatever `task` returned. A panic inside `task` is resumed here.
pub async fn wait_with_progress<T, E, F>(task: F, spinner: Option<&ProgressBar>) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    let mut handle = tokio::task::spawn_blocking(task);

    let joined = match spinner {
        None => handle.await,
        Some(bar) => {
            let mut ticker = tokio::time::interval(SPINNER_INTERVAL);
            loop {
                tokio::select! {
                    joined = &mut handle => break joined,
                    _ = ticker.tick() => bar.tick(),
                }
            }
        }
    };

    match joined {
        Ok(result) => {
            debug!("Blocking evaluation finished");
            result
        }
        Err(err) => std::panic::resume_unwind(err.into_panic()),
    }
}
