//! Locally configurable options that a server restriction can override.
//!
//! The option store itself lives outside this crate.  Here we only name the
//! options and the values that may be written over the user's own setting.
//! "No override" is not a value: callers model it as `Option<OverrideValue>`
//! being `None`, or remove the override explicitly.

use serde::{Deserialize, Serialize};

/// Cinematic camera behaviour while zoomed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CinematicCamera {
    Off,
    Vanilla,
    Multiplied,
}

/// Whether zooming depends on a spyglass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpyglassDependency {
    Off,
    RequireItem,
    ReplaceZoom,
    Both,
}

/// Overlay drawn on screen while zoomed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomOverlay {
    Off,
    Vignette,
    Spyglass,
}

/// Identifies one overridable option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OptionId {
    ZoomScrolling,
    ExtraKeyBinds,
    CinematicCamera,
    ReduceSensitivity,
    ZoomDivisor,
    SpyglassDependency,
    ZoomOverlay,
}

impl OptionId {
    /// Every option any restriction can touch.  A session reset removes the
    /// override of each of these.
    pub const ALL: [OptionId; 7] = [
        OptionId::ZoomScrolling,
        OptionId::ExtraKeyBinds,
        OptionId::CinematicCamera,
        OptionId::ReduceSensitivity,
        OptionId::ZoomDivisor,
        OptionId::SpyglassDependency,
        OptionId::ZoomOverlay,
    ];

    /// Config key of the option.
    pub const fn key(self) -> &'static str {
        match self {
            OptionId::ZoomScrolling => "zoom_scrolling",
            OptionId::ExtraKeyBinds => "extra_key_binds",
            OptionId::CinematicCamera => "cinematic_camera",
            OptionId::ReduceSensitivity => "reduce_sensitivity",
            OptionId::ZoomDivisor => "zoom_divisor",
            OptionId::SpyglassDependency => "spyglass_dependency",
            OptionId::ZoomOverlay => "zoom_overlay",
        }
    }

    /// Returns `true` if `value` has the type this option stores.
    pub fn accepts(self, value: &OverrideValue) -> bool {
        matches!(
            (self, value),
            (OptionId::ZoomScrolling, OverrideValue::Bool(_))
                | (OptionId::ExtraKeyBinds, OverrideValue::Bool(_))
                | (OptionId::ReduceSensitivity, OverrideValue::Bool(_))
                | (OptionId::ZoomDivisor, OverrideValue::Double(_))
                | (OptionId::CinematicCamera, OverrideValue::CinematicCamera(_))
                | (OptionId::SpyglassDependency, OverrideValue::SpyglassDependency(_))
                | (OptionId::ZoomOverlay, OverrideValue::ZoomOverlay(_))
        )
    }
}

impl std::fmt::Display for OptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// A typed option value, used both for user settings and for overrides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OverrideValue {
    Bool(bool),
    Double(f64),
    CinematicCamera(CinematicCamera),
    SpyglassDependency(SpyglassDependency),
    ZoomOverlay(ZoomOverlay),
}

impl OverrideValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OverrideValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            OverrideValue::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_cinematic_camera(&self) -> Option<CinematicCamera> {
        match self {
            OverrideValue::CinematicCamera(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_spyglass_dependency(&self) -> Option<SpyglassDependency> {
        match self {
            OverrideValue::SpyglassDependency(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_zoom_overlay(&self) -> Option<ZoomOverlay> {
        match self {
            OverrideValue::ZoomOverlay(o) => Some(*o),
            _ => None,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
