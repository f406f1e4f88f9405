//! System log setup.
//!
//! The system log is meant for operators. Build console output goes through
//! [`crate::log::PluginLogger`] instead.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter applied when `RUST_LOG` is unset: `level` for the checks crates,
/// warnings only for everything else (HTTP stack included).
fn default_directives(level: Level) -> String {
    let level = level.as_str().to_ascii_lowercase();
    format!("warn,gitea_checks_core={level},gitea_client={level},gitea_checks={level}")
}

/// Install the global tracing subscriber.
///
/// * `json` emits one JSON object per line for log shippers.
/// * `level` applies when `RUST_LOG` is not set.
///
/// A second call is a no-op; the first subscriber stays installed.
pub fn init_tracing(json: bool, level: Level) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));
    let stderr = fmt::layer().with_writer(std::io::stderr);

    let installed = if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr.json().with_current_span(false))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr.with_target(false))
            .try_init()
    };

    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
