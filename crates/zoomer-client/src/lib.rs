//! zoomer-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does zoomer-client do? (for beginners)
//!
//! A server can restrict a player's zoom while they are connected to it.  It
//! does so by sending small binary messages on `ok_zoomer:*` channels.  The
//! client:
//!
//! 1. Receives the framed messages on a network task and decodes each payload
//!    there, dropping anything malformed.
//! 2. Hands every decoded message to the single main loop, which applies it:
//!    the matching options are overridden in the option store (the user's own
//!    values stay underneath) and the session's restriction state grows.
//! 3. Shows a notice when the server acknowledges the mod, if the user has
//!    not turned restriction toasts off.
//! 4. Reverts every override exactly once when the connection ends.

/// Application layer: the restriction use cases.
pub mod application;

/// Infrastructure layer: option store, notifier, zoom instance, network, config.
pub mod infrastructure;
