//! Deadlock-avoidance engine implementing the Banker's Algorithm.
//!
//! The crate is organized around the [`simulation`] module, which exposes a
//! pure algorithmic core (state model, safety checker, sequence enumerator,
//! request evaluator, release handler) and a [`tower::Service`] facade for
//! session-oriented access. Presentation concerns (rendering, narration
//! pacing, input parsing) belong to external collaborators such as the
//! `banker_interactive` crate.

pub mod simulation;

#[cfg(test)]
mod tests;

/// Tracing initialization for debugging and operational visibility.
///
/// Gated behind the `banker_tracing` feature so that the engine stays
/// dependency-light by default. Safe to call from every test.
#[cfg(feature = "banker_tracing")]
pub mod banker_tracing {
    use std::sync::Once;

    use tracing_subscriber::{EnvFilter, fmt};

    static INIT: Once = Once::new();

    pub fn init() {
        INIT.call_once(|| {
            let filter =
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
            fmt().with_env_filter(filter).init();
        });
    }
}
