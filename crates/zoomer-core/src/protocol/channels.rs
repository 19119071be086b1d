//! Channel identifiers for every restriction message kind.
//!
//! Each message travels on its own namespaced channel, e.g.
//! `ok_zoomer:force_zoom_divisor`.  The identifiers are stable across
//! versions; servers written against older clients keep working because a
//! kind is never renamed, only added.

use serde::{Deserialize, Serialize};

/// Namespace shared by every restriction channel.
pub const CHANNEL_NAMESPACE: &str = "ok_zoomer";

/// All message kinds a server may send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MessageKind {
    /// Turns zooming off for the rest of the session.  Since 4.0.0.
    DisableZoom,
    /// Turns zoom scrolling and the extra key binds off.  Since 4.0.0.
    DisableZoomScrolling,
    /// Forces the classic preset on all non-cosmetic options.  Since 5.0.0-beta.1.
    ForceClassicMode,
    /// Locks the zoom divisor into a `[minimum, maximum]` range.  Since 5.0.0-beta.2.
    ForceZoomDivisors,
    /// Announces whether the server restricts the mod.  Since 5.0.0-beta.2.
    AcknowledgeMod,
    /// Imposes a spyglass dependency.  Since 5.0.0-beta.4.
    ForceSpyglass,
    /// Replaces the zoom overlay with the spyglass one.
    ForceSpyglassOverlay,
}

impl MessageKind {
    /// Every kind, in the order the channels are registered.
    pub const ALL: [MessageKind; 7] = [
        MessageKind::DisableZoom,
        MessageKind::DisableZoomScrolling,
        MessageKind::ForceClassicMode,
        MessageKind::ForceZoomDivisors,
        MessageKind::AcknowledgeMod,
        MessageKind::ForceSpyglass,
        MessageKind::ForceSpyglassOverlay,
    ];

    /// The channel path without the namespace.
    pub const fn path(self) -> &'static str {
        match self {
            MessageKind::DisableZoom => "disable_zoom",
            MessageKind::DisableZoomScrolling => "disable_zoom_scrolling",
            MessageKind::ForceClassicMode => "force_classic_mode",
            MessageKind::ForceZoomDivisors => "force_zoom_divisor",
            MessageKind::AcknowledgeMod => "acknowledge_mod",
            MessageKind::ForceSpyglass => "force_spyglass",
            MessageKind::ForceSpyglassOverlay => "force_spyglass_overlay",
        }
    }

    /// The full namespaced channel identifier, e.g. `ok_zoomer:disable_zoom`.
    pub fn channel(self) -> String {
        format!("{CHANNEL_NAMESPACE}:{}", self.path())
    }

    /// Resolves a namespaced channel identifier to its kind.
    ///
    /// Returns `None` for channels in another namespace or with an unknown
    /// path; the caller treats those as "not ours" and ignores them.
    pub fn from_channel(channel: &str) -> Option<Self> {
        let (namespace, path) = channel.split_once(':')?;
        if namespace != CHANNEL_NAMESPACE {
            return None;
        }
        Self::ALL.into_iter().find(|kind| kind.path() == path)
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{CHANNEL_NAMESPACE}:{}", self.path())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
