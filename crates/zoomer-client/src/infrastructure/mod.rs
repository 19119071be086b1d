//! Infrastructure layer for the client.
//!
//! Contains the adapters behind the application-layer traits: the option
//! store, the zoom instance, the notice sink, the TCP transport and the
//! on-disk configuration.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `zoomer_core`, but MUST NOT be imported by the `application` layer outside
//! of its tests.
//!
//! # Sub-modules
//!
//! - **`override_store`** – `InMemoryOverrideStore`, holding the user's value
//!   and an optional override per option.  A `RecordingOverrideStore` is also
//!   provided for tests.
//!
//! - **`zoom_instance`** – Derives the effective zoom (enabled, divisor,
//!   scrolling) whenever a restriction changes the zoom options.
//!
//! - **`notifier`** – Renders notices as log lines, plus a recording mock.
//!
//! - **`network`** – TCP client that connects to the server, reads framed
//!   restriction messages, decodes them off the main loop and reconnects if
//!   the connection drops.
//!
//! - **`config`** – TOML client configuration.

pub mod config;
pub mod network;
pub mod notifier;
pub mod override_store;
pub mod zoom_instance;
