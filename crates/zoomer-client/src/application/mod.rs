//! Application layer use cases for the client.
//!
//! # What use cases does the client have?
//!
//! - **`apply_policy`** – Turns each accepted restriction into override
//!   operations against the [`apply_policy::OverrideStore`] and additions to
//!   the session's restriction state.  The store and the zoom-instance hook
//!   are injected at construction time.
//!
//! - **`notify`** – Decides whether an acknowledgement from the server
//!   deserves a toast, based on the restriction state and the user's
//!   `show_restriction_toasts` preference.
//!
//! - **`session`** – Owns the per-connection state, routes every inbound
//!   message, and reverts all overrides when a restricted session ends.

pub mod apply_policy;
pub mod notify;
pub mod session;
