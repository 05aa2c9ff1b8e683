//! Ferrous Relay Infrastructure Layer
//!
//! Cache store, TTL policy, admission control, request coalescing and the
//! resolution pipeline, plus the concrete router, upstream transports and
//! UDP server that plug into the application ports.
pub mod dns;
