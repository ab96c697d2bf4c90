use crate::config::AppConfig;
use crate::error::Error;
use std::fs::OpenOptions;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{
    EnvFilter, Layer, filter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

static STDERR_PAUSES: AtomicUsize = AtomicUsize::new(0);

/// Installs the global `tracing` subscriber.
///
/// Logs go to the configured log file, or to stderr when there is none.
/// Must be called once, before anything is logged.
pub fn init_logging(config: &AppConfig) -> Result<(), Error> {
    let filter = env_filter(std::env::var("RUST_LOG").ok(), &config.log_level);
    let registry = tracing_subscriber::registry().with(filter);

    match &config.log_file {
        Some(path) => {
            let log_file = OpenOptions::new().create(true).append(true).open(path)?;
            registry
                .with(
                    fmt::layer()
                        .with_ansi(false)
                        .with_writer(Arc::new(log_file)),
                )
                .init();
        }
        None => registry.with(stderr_layer(io::stderr)).init(),
    }

    Ok(())
}

/// Keeps stderr logging quiet until dropped.
///
/// Taken while a full-screen view owns the terminal. Logging to a file is
/// not affected.
#[must_use]
pub struct StderrPause(());

impl Drop for StderrPause {
    fn drop(&mut self) {
        STDERR_PAUSES.fetch_sub(1, Ordering::SeqCst);
    }
}

pub fn pause_stderr() -> StderrPause {
    STDERR_PAUSES.fetch_add(1, Ordering::SeqCst);
    StderrPause(())
}

fn stderr_paused() -> bool {
    STDERR_PAUSES.load(Ordering::SeqCst) > 0
}

fn stderr_layer<S, W>(make_writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'writer> MakeWriter<'writer> + 'static,
{
    fmt::layer()
        .with_writer(make_writer)
        .with_filter(filter::filter_fn(|_| !stderr_paused()))
}

/// `RUST_LOG` wins over the configured level when it is set and non-empty.
fn env_filter(rust_log: Option<String>, level: &str) -> EnvFilter {
    match rust_log.filter(|directives| !directives.trim().is_empty()) {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::new(level),
    }
}
