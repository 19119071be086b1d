//! Typed argument records for every restriction message.
//!
//! Payload layouts (all multi-byte values big-endian):
//!
//! ```text
//! disable_zoom             (empty)
//! disable_zoom_scrolling   (empty)
//! force_classic_mode       (empty)
//! force_zoom_divisor       [max:f64] or [max:f64][min:f64]
//! acknowledge_mod          [restrictionless:bool]
//! force_spyglass           [require_item:bool][replace_zoom:bool]
//! force_spyglass_overlay   (empty)
//! ```

use serde::{Deserialize, Serialize};

use crate::protocol::channels::MessageKind;

/// Size of one encoded IEEE-754 double.
pub const DOUBLE_SIZE: usize = 8;

/// A decoded restriction message.
///
/// Decoding only checks the payload shape.  Range checks on the arguments
/// (e.g. positive divisors) belong to whoever applies the message.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RestrictionMessage {
    DisableZoom,
    DisableZoomScrolling,
    ForceClassicMode,
    /// A one-double payload sets both bounds to the same value.
    ForceZoomDivisors { maximum: f64, minimum: f64 },
    /// `restrictionless` is the raw wire flag; see [`RestrictionMessage::restricting`].
    AcknowledgeMod { restrictionless: bool },
    ForceSpyglass { require_item: bool, replace_zoom: bool },
    ForceSpyglassOverlay,
}

impl RestrictionMessage {
    /// Returns the kind (and therefore the channel) this message travels on.
    pub fn kind(&self) -> MessageKind {
        match self {
            RestrictionMessage::DisableZoom => MessageKind::DisableZoom,
            RestrictionMessage::DisableZoomScrolling => MessageKind::DisableZoomScrolling,
            RestrictionMessage::ForceClassicMode => MessageKind::ForceClassicMode,
            RestrictionMessage::ForceZoomDivisors { .. } => MessageKind::ForceZoomDivisors,
            RestrictionMessage::AcknowledgeMod { .. } => MessageKind::AcknowledgeMod,
            RestrictionMessage::ForceSpyglass { .. } => MessageKind::ForceSpyglass,
            RestrictionMessage::ForceSpyglassOverlay => MessageKind::ForceSpyglassOverlay,
        }
    }

    /// For `AcknowledgeMod`, whether the server claims to restrict the mod.
    ///
    /// The wire carries the inverse flag (`true` means "no restrictions").
    /// Returns `None` for every other message.
    pub fn restricting(&self) -> Option<bool> {
        match self {
            RestrictionMessage::AcknowledgeMod { restrictionless } => Some(!restrictionless),
            _ => None,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
