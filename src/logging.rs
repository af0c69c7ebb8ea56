use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use once_cell::sync::OnceCell;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

static LOGGING: OnceCell<()> = OnceCell::new();

/// Initialize the process-wide logging sink: leveled output fanned out to
/// stderr and an append-only `logs/debug.log`, keeping stdout clean for
/// JSON results. Safe to call more than once; only the first call installs
/// the subscriber.
pub fn init() {
    LOGGING.get_or_init(|| {
        let file_layer = open_log_file().map(|file| {
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false)
        });

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "webharness=debug".into()),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .with(file_layer)
            .init();
    });
}

// Missing or read-only log directories degrade to stderr-only logging
// rather than failing the run.
fn open_log_file() -> Option<std::fs::File> {
    let log_dir = Path::new("logs");
    std::fs::create_dir_all(log_dir).ok()?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("debug.log"))
        .ok()
}
