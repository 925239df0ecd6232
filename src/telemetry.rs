//! Tracing initialization for hosts and examples.
//!
//! The engine itself only *emits* `tracing` events; installing a subscriber
//! is the host's call. This helper wires the conventional stack: an
//! `EnvFilter` honoring `RUST_LOG`, a fmt layer, and `tracing-error`'s
//! `ErrorLayer` so spans are captured alongside error reports.

use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the default subscriber.
///
/// Safe to call more than once (later calls are no-ops), which keeps test
/// setup simple.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(ErrorLayer::default())
        .try_init();
}
