//! Transport framing for restriction messages.
//!
//! The payload codec assumes the transport already delimits messages and
//! names their channel.  This module provides that envelope for the bundled
//! TCP adapter:
//!
//! ```text
//! [channel_len:2][channel:N][payload_len:4][payload:M]
//! ```
//!
//! All multi-byte integers are big-endian; the channel is UTF-8.

use crate::protocol::codec::ProtocolError;

/// Longest accepted channel identifier in bytes.
pub const MAX_CHANNEL_LEN: usize = 256;

/// Largest accepted payload in bytes.
pub const MAX_PAYLOAD_LEN: usize = 1024 * 1024;

/// Size of the channel length prefix.
pub const CHANNEL_LEN_SIZE: usize = 2;

/// Size of the payload length prefix.
pub const PAYLOAD_LEN_SIZE: usize = 4;

/// One framed message: the channel it travels on plus its raw payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub channel: String,
    pub payload: Vec<u8>,
}

impl Frame {
    pub fn new(channel: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            channel: channel.into(),
            payload,
        }
    }
}

/// Encodes a frame.
///
/// # Errors
///
/// Returns [`ProtocolError::FrameTooLarge`] if the channel or payload exceed
/// [`MAX_CHANNEL_LEN`] / [`MAX_PAYLOAD_LEN`].
pub fn encode_frame(frame: &Frame) -> Result<Vec<u8>, ProtocolError> {
    let channel = frame.channel.as_bytes();
    check_channel_len(channel.len())?;
    check_payload_len(frame.payload.len())?;

    let mut buf = Vec::with_capacity(
        CHANNEL_LEN_SIZE + channel.len() + PAYLOAD_LEN_SIZE + frame.payload.len(),
    );
    buf.extend_from_slice(&(channel.len() as u16).to_be_bytes());
    buf.extend_from_slice(channel);
    buf.extend_from_slice(&(frame.payload.len() as u32).to_be_bytes());
    buf.extend_from_slice(&frame.payload);
    Ok(buf)
}

/// Decodes one frame from the beginning of `bytes`.
///
/// Returns the frame and the number of bytes consumed, so the caller can
/// advance their read cursor.
///
/// # Errors
///
/// Returns [`ProtocolError::InsufficientData`] when `bytes` ends before the
/// frame does, [`ProtocolError::FrameTooLarge`] for oversized length fields,
/// and [`ProtocolError::MalformedFrame`] for a non-UTF-8 channel.
///
/// # Examples
///
/// ```rust
/// use zoomer_core::protocol::{decode_frame, encode_frame, Frame};
///
/// let frame = Frame::new("ok_zoomer:acknowledge_mod", vec![0x01]);
/// let bytes = encode_frame(&frame).unwrap();
/// let (decoded, n) = decode_frame(&bytes).unwrap();
/// assert_eq!(decoded, frame);
/// assert_eq!(n, bytes.len());
/// ```
pub fn decode_frame(bytes: &[u8]) -> Result<(Frame, usize), ProtocolError> {
    require(bytes, CHANNEL_LEN_SIZE)?;
    let channel_len = read_channel_len([bytes[0], bytes[1]])?;

    let payload_len_at = CHANNEL_LEN_SIZE + channel_len;
    require(bytes, payload_len_at + PAYLOAD_LEN_SIZE)?;
    let channel = parse_channel(&bytes[CHANNEL_LEN_SIZE..payload_len_at])?;

    let payload_len = read_payload_len([
        bytes[payload_len_at],
        bytes[payload_len_at + 1],
        bytes[payload_len_at + 2],
        bytes[payload_len_at + 3],
    ])?;
    let payload_at = payload_len_at + PAYLOAD_LEN_SIZE;
    let total = payload_at + payload_len;
    require(bytes, total)?;

    Ok((
        Frame {
            channel,
            payload: bytes[payload_at..total].to_vec(),
        },
        total,
    ))
}

/// Parses and bounds-checks a channel length prefix.
pub fn read_channel_len(prefix: [u8; CHANNEL_LEN_SIZE]) -> Result<usize, ProtocolError> {
    let len = u16::from_be_bytes(prefix) as usize;
    check_channel_len(len)?;
    Ok(len)
}

/// Parses and bounds-checks a payload length prefix.
pub fn read_payload_len(prefix: [u8; PAYLOAD_LEN_SIZE]) -> Result<usize, ProtocolError> {
    let len = u32::from_be_bytes(prefix) as usize;
    check_payload_len(len)?;
    Ok(len)
}

/// Converts raw channel bytes into an identifier.
pub fn parse_channel(bytes: &[u8]) -> Result<String, ProtocolError> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| ProtocolError::MalformedFrame(format!("invalid UTF-8 channel: {e}")))
}

fn check_channel_len(len: usize) -> Result<(), ProtocolError> {
    if len > MAX_CHANNEL_LEN {
        return Err(ProtocolError::FrameTooLarge {
            field: "channel",
            len,
            limit: MAX_CHANNEL_LEN,
        });
    }
    Ok(())
}

fn check_payload_len(len: usize) -> Result<(), ProtocolError> {
    if len > MAX_PAYLOAD_LEN {
        return Err(ProtocolError::FrameTooLarge {
            field: "payload",
            len,
            limit: MAX_PAYLOAD_LEN,
        });
    }
    Ok(())
}

fn require(bytes: &[u8], needed: usize) -> Result<(), ProtocolError> {
    if bytes.len() < needed {
        return Err(ProtocolError::InsufficientData {
            needed,
            available: bytes.len(),
        });
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
