//! A TUI for logging in, registering, and managing passwords on the storefront

/// The "functional core" to the main module's "imperative shell"
mod app;

/// Configuration and argument parsing
mod config;

/// Enums that can be stepped through (menus and such)
mod cyclic;

use app::{App, EffectContext};
use clap::Parser;
use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use std::{io, path::Path, process::ExitCode, sync::Arc};
use tokio::{
    sync::mpsc::{unbounded_channel, UnboundedSender},
    task::JoinHandle,
    time,
};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> io::Result<ExitCode> {
    let config = config::Config::parse();

    // The terminal belongs to the UI, so logs go to a file. Keep the guard
    // alive until we exit so buffered lines get flushed.
    let _guard = init_logging(&config)?;

    let mut terminal = ratatui::init();
    terminal.clear()?;
    let res = run(terminal, &config).await;
    ratatui::restore();
    res
}

/// Set up `tracing` to write to a daily log file in the data directory.
/// `RUST_LOG` overrides the default level of `info`.
///
/// ## Errors
///
/// If the log file can't be created in the data directory.
fn init_logging(config: &config::Config) -> io::Result<WorkerGuard> {
    let (writer, guard) = tracing_appender::non_blocking(log_file(&config.data_dir())?);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();

    Ok(guard)
}

/// A daily-rotated `storefront.log` in `dir`, creating `dir` if needed.
fn log_file(dir: &Path) -> io::Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("storefront.log")
        .build(dir)
        .map_err(io::Error::other)
}

/// Manage the lifecycle of the app
async fn run(mut terminal: DefaultTerminal, config: &config::Config) -> io::Result<ExitCode> {
    let mut app = App::new();
    let conn = Arc::new(EffectContext::new(config.server.clone()));

    tracing::info!(server = %config.server, "starting");

    // Side-effectful behaviors (network access) take place in async tasks.
    // Once those tasks are done, we read their results off of a channel. We
    // keep track of outstanding effects so we can stop them on exit.
    let (effect_tx, mut effect_rx) = unbounded_channel();
    let mut outstanding_effects = Vec::with_capacity(1);

    for effect in app.init(config.open.as_deref()) {
        outstanding_effects.push(spawn_effect_task(
            effect_tx.clone(),
            Arc::clone(&conn),
            effect,
        ));
    }
    terminal.draw(|frame| app.render(frame))?;

    let mut event_stream = EventStream::new();

    // Frequent enough for toasts to go away on time.
    let mut ticks = time::interval(time::Duration::from_secs(1));

    // Start our event loop!
    loop {
        // First thing we do is wait for an event. This can be either external
        // input or the async result of an effect. This is an `Option<_>`
        // because we don't need to pay attention to every single piece of
        // external input.
        let next_action_opt = tokio::select! {
            event_opt = event_stream.next() => {
                match event_opt {
                    Some(Ok(Event::Key(key_event))) => {
                        Some(app::Action::Key(key_event))
                    }
                    Some(Err(err)) => {
                        Some(app::Action::Problem(err.to_string()))
                    }
                    _ => None,
                }
            },

            _ = ticks.tick() => {
                Some(app::Action::TimePassed)
            },

            effect_opt = effect_rx.recv() => {
                effect_opt
            }
        };

        // Once we have an action, we send it to `app.handle` to get any next
        // effects, and spawn those the same way we did for init.
        if let Some(action) = next_action_opt {
            for effect in app.handle(action) {
                outstanding_effects.push(spawn_effect_task(
                    effect_tx.clone(),
                    Arc::clone(&conn),
                    effect,
                ));
            }
        }

        // Now that we handled the event, we re-render to display any changes
        // the app cares about.
        terminal.draw(|frame| app.render(frame))?;

        // Drop handles for effects that have finished. This list should never
        // be too long (since we do this on every pass through the event loop)
        // so a full scan is fine.
        outstanding_effects.retain(|handle| !handle.is_finished());

        // Finally, if the app indicates that it should exit, we stop anything
        // still in flight. Nothing would apply their results anyway.
        if let Some(code) = app.should_exit() {
            for effect in outstanding_effects.drain(..) {
                effect.abort();
            }

            tracing::info!("exiting");
            return Ok(code);
        }
    }
}

/// Spawn a task to run an effect and send the next action to the app.
fn spawn_effect_task(
    effect_tx: UnboundedSender<app::Action>,
    conn: Arc<EffectContext>,
    effect: app::Effect,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Some(next_action) = effect.run(&conn).await {
            // The receiver only goes away when we're shutting down, at which
            // point dropping the result is fine.
            if effect_tx.send(next_action).is_err() {
                tracing::debug!("app stopped listening before effect finished");
            }
        }
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use std::env;

    #[test]
    fn unusable_log_dir_is_an_error() {
        // A directory can't be created underneath a regular file.
        let exe = env::current_exe().unwrap();

        assert!(log_file(&exe.join("logs")).is_err());
    }
}
