//! # zoomer-core
//!
//! Shared library for Zoomer clients containing the restriction message
//! codec and the restriction state model.
//!
//! It has zero dependencies on sockets, game engines, or UI frameworks; the
//! client crate wires it to a transport and to the option store.
//!
//! # Architecture overview (for beginners)
//!
//! A server can constrain how a player's zoom behaves while they are
//! connected: it may turn zooming off entirely, lock the zoom divisor into a
//! range, force the "classic" preset, or require a spyglass.  The server does
//! this by sending tiny binary messages on well-known channels such as
//! `ok_zoomer:force_zoom_divisor`.
//!
//! This crate defines:
//!
//! - **`protocol`** – The channel identifiers, the typed message records, and
//!   the fixed-layout payload decoder.  Every payload is validated for length
//!   before it is turned into a [`RestrictionMessage`].
//!
//! - **`domain`** – The options a restriction can override
//!   ([`OptionId`], [`OverrideValue`]) and the per-connection
//!   [`RestrictionState`]: which restrictions are active, their parameters,
//!   and the derived [`Acknowledgement`] status.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `zoomer_core::RestrictionState` instead of the full module path.
pub use domain::options::{
    CinematicCamera, OptionId, OverrideValue, SpyglassDependency, ZoomOverlay,
};
pub use domain::restriction::{
    Acknowledgement, RestrictionError, RestrictionKind, RestrictionState, SpyglassMode,
    ZoomDivisorBounds,
};
pub use protocol::channels::MessageKind;
pub use protocol::codec::{decode_inbound, decode_payload, decoder_for, encode_payload, ProtocolError};
pub use protocol::messages::RestrictionMessage;
