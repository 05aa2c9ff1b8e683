//! Ferrous Relay Application Layer
//!
//! Ports the resolution pipeline depends on. Implementations live in the
//! infrastructure crate and are wired together by the CLI.
pub mod ports;
