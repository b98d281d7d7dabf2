// src/fetch/mod.rs
// =============================================================================
// Everything that touches the network lives under this module.
//
// Submodules:
// - http: the Fetcher (GET with 429 backoff, 404 pass-through)
// - backoff: wait policy and the swappable sleep function
// - agent: random User-Agent strings
// =============================================================================

mod agent;
mod backoff;
mod http;

pub use backoff::Backoff;
#[cfg(test)]
pub use backoff::recording_delay;
pub use http::Fetcher;
