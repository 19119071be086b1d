//! Fixed-layout codec for restriction message payloads.
//!
//! Every kind has a fixed payload shape (see [`crate::protocol::messages`]).
//! A payload whose length does not match is rejected with
//! [`ProtocolError::PayloadLength`]; callers drop such messages without
//! touching any state.
//!
//! Doubles are IEEE-754, big-endian.  Booleans are one byte each; any
//! non-zero byte reads as `true`.

use thiserror::Error;
use tracing::{debug, trace};

use crate::protocol::channels::MessageKind;
use crate::protocol::messages::{RestrictionMessage, DOUBLE_SIZE};

/// Errors that can occur while decoding payloads or transport frames.
#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    /// The payload length does not match the fixed layout of its kind.
    #[error("{kind}: expected {expected} payload bytes, got {actual}")]
    PayloadLength {
        kind: MessageKind,
        expected: &'static str,
        actual: usize,
    },

    /// The channel identifier does not belong to any known kind.
    #[error("unknown channel: {0}")]
    UnknownChannel(String),

    /// The byte slice is shorter than the frame header or its declared body.
    #[error("insufficient data: need at least {needed} bytes, got {available}")]
    InsufficientData { needed: usize, available: usize },

    /// A length field in the frame header exceeds its limit.
    #[error("{field} length {len} exceeds limit {limit}")]
    FrameTooLarge {
        field: &'static str,
        len: usize,
        limit: usize,
    },

    /// The frame could not be parsed (invalid UTF-8 channel, etc.).
    #[error("malformed frame: {0}")]
    MalformedFrame(String),
}

/// Signature shared by every entry of the decoder table.
pub type PayloadDecoder = fn(&[u8]) -> Result<RestrictionMessage, ProtocolError>;

// ── Public API ────────────────────────────────────────────────────────────────

/// Looks up the payload decoder registered for a namespaced channel.
///
/// Returns `None` for channels that are not restriction channels; the
/// dispatch layer ignores those.
///
/// # Examples
///
/// ```rust
/// use zoomer_core::protocol::decoder_for;
/// use zoomer_core::RestrictionMessage;
///
/// let decode = decoder_for("ok_zoomer:disable_zoom").unwrap();
/// assert_eq!(decode(&[]).unwrap(), RestrictionMessage::DisableZoom);
/// assert!(decoder_for("minecraft:brand").is_none());
/// ```
pub fn decoder_for(channel: &str) -> Option<PayloadDecoder> {
    let kind = MessageKind::from_channel(channel)?;
    Some(table_entry(kind))
}

/// Decodes the payload of a message of the given kind.
///
/// # Errors
///
/// Returns [`ProtocolError::PayloadLength`] if the payload does not have the
/// fixed length of `kind`.
///
/// # Examples
///
/// ```rust
/// use zoomer_core::protocol::decode_payload;
/// use zoomer_core::{MessageKind, RestrictionMessage};
///
/// let payload = 25.0f64.to_be_bytes();
/// let msg = decode_payload(MessageKind::ForceZoomDivisors, &payload).unwrap();
/// assert_eq!(msg, RestrictionMessage::ForceZoomDivisors { maximum: 25.0, minimum: 25.0 });
/// ```
pub fn decode_payload(
    kind: MessageKind,
    payload: &[u8],
) -> Result<RestrictionMessage, ProtocolError> {
    trace!(%kind, len = payload.len(), "decoding restriction payload");
    table_entry(kind)(payload)
}

/// The single inbound entry point: looks up the channel and decodes its
/// payload.
///
/// Unknown channels and malformed payloads yield `None`, each with a debug
/// line; callers never see the failure.
pub fn decode_inbound(channel: &str, payload: &[u8]) -> Option<RestrictionMessage> {
    let Some(decode) = decoder_for(channel) else {
        debug!(channel, "ignoring message on unknown channel");
        return None;
    };
    match decode(payload) {
        Ok(message) => Some(message),
        Err(e) => {
            debug!(channel, "dropping malformed restriction payload: {e}");
            None
        }
    }
}

/// Encodes the payload of a message.  The inverse of [`decode_payload`].
///
/// A `ForceZoomDivisors` message whose bounds are equal is written in the
/// short single-double form.
pub fn encode_payload(msg: &RestrictionMessage) -> Vec<u8> {
    let mut buf = Vec::new();
    match msg {
        RestrictionMessage::DisableZoom
        | RestrictionMessage::DisableZoomScrolling
        | RestrictionMessage::ForceClassicMode
        | RestrictionMessage::ForceSpyglassOverlay => {} // empty payload
        RestrictionMessage::ForceZoomDivisors { maximum, minimum } => {
            buf.extend_from_slice(&maximum.to_be_bytes());
            if minimum.to_bits() != maximum.to_bits() {
                buf.extend_from_slice(&minimum.to_be_bytes());
            }
        }
        RestrictionMessage::AcknowledgeMod { restrictionless } => buf.push(write_bool(*restrictionless)),
        RestrictionMessage::ForceSpyglass {
            require_item,
            replace_zoom,
        } => {
            buf.push(write_bool(*require_item));
            buf.push(write_bool(*replace_zoom));
        }
    }
    buf
}

// ── Per-kind decode helpers ───────────────────────────────────────────────────

/// The decoder table: one entry per kind, resolved exhaustively so a new
/// kind cannot be added without a decoder.
fn table_entry(kind: MessageKind) -> PayloadDecoder {
    match kind {
        MessageKind::DisableZoom => decode_disable_zoom,
        MessageKind::DisableZoomScrolling => decode_disable_zoom_scrolling,
        MessageKind::ForceClassicMode => decode_force_classic_mode,
        MessageKind::ForceZoomDivisors => decode_force_zoom_divisors,
        MessageKind::AcknowledgeMod => decode_acknowledge_mod,
        MessageKind::ForceSpyglass => decode_force_spyglass,
        MessageKind::ForceSpyglassOverlay => decode_force_spyglass_overlay,
    }
}

fn decode_disable_zoom(p: &[u8]) -> Result<RestrictionMessage, ProtocolError> {
    require_empty(p, MessageKind::DisableZoom)?;
    Ok(RestrictionMessage::DisableZoom)
}

fn decode_disable_zoom_scrolling(p: &[u8]) -> Result<RestrictionMessage, ProtocolError> {
    require_empty(p, MessageKind::DisableZoomScrolling)?;
    Ok(RestrictionMessage::DisableZoomScrolling)
}

fn decode_force_classic_mode(p: &[u8]) -> Result<RestrictionMessage, ProtocolError> {
    require_empty(p, MessageKind::ForceClassicMode)?;
    Ok(RestrictionMessage::ForceClassicMode)
}

fn decode_force_zoom_divisors(p: &[u8]) -> Result<RestrictionMessage, ProtocolError> {
    match p.len() {
        DOUBLE_SIZE => {
            let maximum = read_f64(p, 0);
            Ok(RestrictionMessage::ForceZoomDivisors {
                maximum,
                minimum: maximum,
            })
        }
        len if len == 2 * DOUBLE_SIZE => Ok(RestrictionMessage::ForceZoomDivisors {
            maximum: read_f64(p, 0),
            minimum: read_f64(p, DOUBLE_SIZE),
        }),
        actual => Err(ProtocolError::PayloadLength {
            kind: MessageKind::ForceZoomDivisors,
            expected: "8 or 16",
            actual,
        }),
    }
}

fn decode_acknowledge_mod(p: &[u8]) -> Result<RestrictionMessage, ProtocolError> {
    require_exact(p, 1, "1", MessageKind::AcknowledgeMod)?;
    Ok(RestrictionMessage::AcknowledgeMod {
        restrictionless: read_bool(p[0]),
    })
}

fn decode_force_spyglass(p: &[u8]) -> Result<RestrictionMessage, ProtocolError> {
    require_exact(p, 2, "2", MessageKind::ForceSpyglass)?;
    Ok(RestrictionMessage::ForceSpyglass {
        require_item: read_bool(p[0]),
        replace_zoom: read_bool(p[1]),
    })
}

fn decode_force_spyglass_overlay(p: &[u8]) -> Result<RestrictionMessage, ProtocolError> {
    require_empty(p, MessageKind::ForceSpyglassOverlay)?;
    Ok(RestrictionMessage::ForceSpyglassOverlay)
}

// ── Utility helpers ───────────────────────────────────────────────────────────

fn require_empty(buf: &[u8], kind: MessageKind) -> Result<(), ProtocolError> {
    require_exact(buf, 0, "0", kind)
}

fn require_exact(
    buf: &[u8],
    needed: usize,
    expected: &'static str,
    kind: MessageKind,
) -> Result<(), ProtocolError> {
    if buf.len() != needed {
        Err(ProtocolError::PayloadLength {
            kind,
            expected,
            actual: buf.len(),
        })
    } else {
        Ok(())
    }
}

/// Reads a big-endian double.  Callers have already checked the length.
fn read_f64(buf: &[u8], offset: usize) -> f64 {
    let mut bytes = [0u8; DOUBLE_SIZE];
    bytes.copy_from_slice(&buf[offset..offset + DOUBLE_SIZE]);
    f64::from_be_bytes(bytes)
}

fn read_bool(byte: u8) -> bool {
    byte != 0
}

fn write_bool(value: bool) -> u8 {
    if value {
        0x01
    } else {
        0x00
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
