//! Tracing initialisation for the `cph` binary.
//!
//! Logs go to stderr so that judged results printed on stdout stay clean.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

/// Initialise the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `level` is used. `json` switches to
/// newline-delimited JSON lines. Only the first call takes effect.
pub fn init_tracing(json: bool, level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    tracing_subscriber::registry()
        .with(stderr_layer(json))
        .with(env_filter)
        .try_init()
        .ok();
}

fn stderr_layer(json: bool) -> Box<dyn Layer<Registry> + Send + Sync> {
    let layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        layer.json().boxed()
    } else {
        layer.compact().boxed()
    }
}
