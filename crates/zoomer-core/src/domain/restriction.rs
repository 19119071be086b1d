//! Per-connection restriction state.
//!
//! # What is tracked? (for beginners)
//!
//! Each restriction message a server sends activates one
//! [`RestrictionKind`].  Some kinds carry parameters: the forced zoom divisor
//! range and the spyglass mode.  From the set of active kinds the state
//! derives two aggregate signals:
//!
//! - `has_restrictions` – at least one kind is active.
//! - [`Acknowledgement`] – the tri-state status used to decide which notice to
//!   show when the server acknowledges the mod.
//!
//! ```text
//!            apply (any kind)              disconnect (if restricted)
//! Unrestricted ───────────────► Restricted ─────────────────────────► Unrestricted
//! ```
//!
//! # Invariants
//!
//! - `acknowledgement` is `HasRestrictions` iff the active set is non-empty
//!   once it has been recomputed, `HasNoRestrictions` iff it is empty after a
//!   recompute, and `None` before the first recompute or after a reset.
//! - Divisor bounds are present iff `ForceZoomDivisors` is active and always
//!   satisfy `0 < minimum <= maximum`.
//! - The state only grows between resets; a reset clears every field at once.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::options::SpyglassDependency;

/// Errors raised when a restriction's arguments are semantically invalid.
#[derive(Debug, Error, PartialEq)]
pub enum RestrictionError {
    /// Divisor bounds must satisfy `0 < minimum <= maximum`.
    #[error("invalid zoom divisor bounds (min {minimum}, max {maximum})")]
    InvalidDivisorBounds { maximum: f64, minimum: f64 },
}

/// A restriction a server can impose.  Each kind is activated by exactly one
/// message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RestrictionKind {
    DisableZoom,
    DisableZoomScrolling,
    ForceClassicMode,
    ForceZoomDivisors,
    SpyglassDependency,
    SpyglassOverlay,
}

impl RestrictionKind {
    pub const ALL: [RestrictionKind; 6] = [
        RestrictionKind::DisableZoom,
        RestrictionKind::DisableZoomScrolling,
        RestrictionKind::ForceClassicMode,
        RestrictionKind::ForceZoomDivisors,
        RestrictionKind::SpyglassDependency,
        RestrictionKind::SpyglassOverlay,
    ];
}

/// How a forced spyglass dependency behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpyglassMode {
    /// Zooming requires a spyglass in the inventory.
    RequireItem,
    /// The spyglass replaces the zoom key.
    ReplaceZoom,
    Both,
}

impl SpyglassMode {
    /// Derives the mode from the two wire flags.
    ///
    /// Returns `None` when neither flag is set.
    pub fn from_flags(require_item: bool, replace_zoom: bool) -> Option<Self> {
        match (require_item, replace_zoom) {
            (true, true) => Some(SpyglassMode::Both),
            (true, false) => Some(SpyglassMode::RequireItem),
            (false, true) => Some(SpyglassMode::ReplaceZoom),
            (false, false) => None,
        }
    }
}

impl From<SpyglassMode> for SpyglassDependency {
    fn from(mode: SpyglassMode) -> Self {
        match mode {
            SpyglassMode::RequireItem => SpyglassDependency::RequireItem,
            SpyglassMode::ReplaceZoom => SpyglassDependency::ReplaceZoom,
            SpyglassMode::Both => SpyglassDependency::Both,
        }
    }
}

/// A validated `[minimum, maximum]` zoom divisor range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomDivisorBounds {
    maximum: f64,
    minimum: f64,
}

impl ZoomDivisorBounds {
    /// Validates and builds a bounds pair.
    ///
    /// # Errors
    ///
    /// Returns [`RestrictionError::InvalidDivisorBounds`] unless
    /// `0 < minimum <= maximum`.  NaN never satisfies the check.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use zoomer_core::ZoomDivisorBounds;
    ///
    /// assert!(ZoomDivisorBounds::new(10.0, 5.0).is_ok());
    /// assert!(ZoomDivisorBounds::new(5.0, 10.0).is_err());
    /// ```
    pub fn new(maximum: f64, minimum: f64) -> Result<Self, RestrictionError> {
        let valid = minimum > 0.0 && maximum > 0.0 && minimum <= maximum;
        if !valid {
            return Err(RestrictionError::InvalidDivisorBounds { maximum, minimum });
        }
        Ok(Self { maximum, minimum })
    }

    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    pub fn minimum(&self) -> f64 {
        self.minimum
    }

    /// Clamps a divisor into the range.
    pub fn clamp(&self, divisor: f64) -> f64 {
        divisor.clamp(self.minimum, self.maximum)
    }
}

/// Summary of whether the current session is restricted, consumed when the
/// server acknowledges the mod.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Acknowledgement {
    /// Not computed yet in this session.
    #[default]
    None,
    HasRestrictions,
    HasNoRestrictions,
}

/// The set of restrictions in effect for one connection.
///
/// Mutators only add to the state; [`RestrictionState::reset`] is the only
/// way to clear it.  Mutators do not recompute the aggregate signals, callers
/// invoke [`RestrictionState::recompute`] once their whole operation is done.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestrictionState {
    active: BTreeSet<RestrictionKind>,
    zoom_divisor_bounds: Option<ZoomDivisorBounds>,
    spyglass_mode: Option<SpyglassMode>,
    has_restrictions: bool,
    acknowledgement: Acknowledgement,
}

impl RestrictionState {
    /// Creates an empty, unrestricted state.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Mutators ──────────────────────────────────────────────────────────────

    /// Marks `kind` active.  Returns `true` if it was not active before.
    pub fn activate(&mut self, kind: RestrictionKind) -> bool {
        self.active.insert(kind)
    }

    /// Stores forced divisor bounds and activates `ForceZoomDivisors`.
    ///
    /// A later call replaces the earlier bounds.
    pub fn force_zoom_divisors(&mut self, bounds: ZoomDivisorBounds) {
        self.zoom_divisor_bounds = Some(bounds);
        self.active.insert(RestrictionKind::ForceZoomDivisors);
    }

    /// Stores the spyglass mode and activates `SpyglassDependency`.
    ///
    /// The kind becomes active even when `mode` is `None`.
    pub fn force_spyglass(&mut self, mode: Option<SpyglassMode>) {
        self.spyglass_mode = mode;
        self.active.insert(RestrictionKind::SpyglassDependency);
    }

    /// Recomputes `has_restrictions` and the acknowledgement from the active
    /// set.  This is the only writer of the acknowledgement besides
    /// [`RestrictionState::reset`].
    pub fn recompute(&mut self) {
        self.has_restrictions = !self.active.is_empty();
        self.acknowledgement = if self.has_restrictions {
            Acknowledgement::HasRestrictions
        } else {
            Acknowledgement::HasNoRestrictions
        };
    }

    /// Clears every field back to the freshly-created state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    pub fn is_active(&self, kind: RestrictionKind) -> bool {
        self.active.contains(&kind)
    }

    /// Active kinds in a stable order.
    pub fn active_kinds(&self) -> impl Iterator<Item = RestrictionKind> + '_ {
        self.active.iter().copied()
    }

    /// The flag stored by the last [`RestrictionState::recompute`], not
    /// re-derived from the active set.
    pub fn has_restrictions(&self) -> bool {
        self.has_restrictions
    }

    pub fn acknowledgement(&self) -> Acknowledgement {
        self.acknowledgement
    }

    pub fn zoom_divisor_bounds(&self) -> Option<ZoomDivisorBounds> {
        self.zoom_divisor_bounds
    }

    pub fn spyglass_mode(&self) -> Option<SpyglassMode> {
        self.spyglass_mode
    }

    pub fn disable_zoom(&self) -> bool {
        self.is_active(RestrictionKind::DisableZoom)
    }

    pub fn disable_zoom_scrolling(&self) -> bool {
        self.is_active(RestrictionKind::DisableZoomScrolling)
    }

    pub fn force_classic_mode(&self) -> bool {
        self.is_active(RestrictionKind::ForceClassicMode)
    }

    pub fn spyglass_overlay(&self) -> bool {
        self.is_active(RestrictionKind::SpyglassOverlay)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── ZoomDivisorBounds ─────────────────────────────────────────────────────

    #[test]
    fn test_bounds_accept_ordered_positive_pair() {
        let bounds = ZoomDivisorBounds::new(10.0, 5.0).unwrap();
        assert_eq!(bounds.maximum(), 10.0);
        assert_eq!(bounds.minimum(), 5.0);
    }

    #[test]
    fn test_bounds_accept_equal_pair() {
        assert!(ZoomDivisorBounds::new(25.0, 25.0).is_ok());
    }

    #[test]
    fn test_bounds_reject_inverted_pair() {
        assert_eq!(
            ZoomDivisorBounds::new(5.0, 10.0),
            Err(RestrictionError::InvalidDivisorBounds {
                maximum: 5.0,
                minimum: 10.0
            })
        );
    }

    #[test]
    fn test_bounds_reject_zero_and_negative() {
        assert!(ZoomDivisorBounds::new(10.0, 0.0).is_err());
        assert!(ZoomDivisorBounds::new(0.0, 0.0).is_err());
        assert!(ZoomDivisorBounds::new(-1.0, -2.0).is_err());
    }

    #[test]
    fn test_bounds_reject_nan() {
        assert!(ZoomDivisorBounds::new(f64::NAN, 1.0).is_err());
        assert!(ZoomDivisorBounds::new(10.0, f64::NAN).is_err());
    }

    #[test]
    fn test_bounds_clamp() {
        let bounds = ZoomDivisorBounds::new(10.0, 2.0).unwrap();
        assert_eq!(bounds.clamp(50.0), 10.0);
        assert_eq!(bounds.clamp(1.0), 2.0);
        assert_eq!(bounds.clamp(4.0), 4.0);
    }

    // ── SpyglassMode ──────────────────────────────────────────────────────────

    #[test]
    fn test_spyglass_mode_from_flags() {
        assert_eq!(SpyglassMode::from_flags(true, true), Some(SpyglassMode::Both));
        assert_eq!(SpyglassMode::from_flags(true, false), Some(SpyglassMode::RequireItem));
        assert_eq!(SpyglassMode::from_flags(false, true), Some(SpyglassMode::ReplaceZoom));
        assert_eq!(SpyglassMode::from_flags(false, false), None);
    }

    // ── RestrictionState ──────────────────────────────────────────────────────

    #[test]
    fn test_new_state_is_unrestricted_with_no_acknowledgement() {
        let state = RestrictionState::new();
        assert!(!state.has_restrictions());
        assert_eq!(state.acknowledgement(), Acknowledgement::None);
        assert_eq!(state.active_kinds().count(), 0);
    }

    #[test]
    fn test_recompute_on_empty_state_reports_no_restrictions() {
        let mut state = RestrictionState::new();

        state.recompute();

        assert!(!state.has_restrictions());
        assert_eq!(state.acknowledgement(), Acknowledgement::HasNoRestrictions);
    }

    #[test]
    fn test_recompute_after_activation_reports_restrictions() {
        let mut state = RestrictionState::new();
        state.activate(RestrictionKind::DisableZoom);

        state.recompute();

        assert!(state.has_restrictions());
        assert_eq!(state.acknowledgement(), Acknowledgement::HasRestrictions);
    }

    #[test]
    fn test_has_restrictions_is_stored_not_derived() {
        let mut state = RestrictionState::new();

        state.activate(RestrictionKind::DisableZoom);

        // Not visible until the operation recomputes.
        assert!(!state.has_restrictions());
        assert!(state.disable_zoom());
    }

    #[test]
    fn test_activate_reports_whether_kind_is_new() {
        let mut state = RestrictionState::new();
        assert!(state.activate(RestrictionKind::SpyglassOverlay));
        assert!(!state.activate(RestrictionKind::SpyglassOverlay));
    }

    #[test]
    fn test_force_zoom_divisors_activates_kind_and_replaces_bounds() {
        let mut state = RestrictionState::new();
        state.force_zoom_divisors(ZoomDivisorBounds::new(25.0, 1.0).unwrap());
        state.force_zoom_divisors(ZoomDivisorBounds::new(8.0, 2.0).unwrap());

        assert!(state.is_active(RestrictionKind::ForceZoomDivisors));
        assert_eq!(
            state.zoom_divisor_bounds(),
            Some(ZoomDivisorBounds::new(8.0, 2.0).unwrap())
        );
    }

    #[test]
    fn test_force_spyglass_without_mode_still_activates_kind() {
        let mut state = RestrictionState::new();

        state.force_spyglass(None);

        assert!(state.is_active(RestrictionKind::SpyglassDependency));
        assert_eq!(state.spyglass_mode(), None);
    }

    #[test]
    fn test_reset_clears_every_field() {
        let mut state = RestrictionState::new();
        for kind in RestrictionKind::ALL {
            state.activate(kind);
        }
        state.force_zoom_divisors(ZoomDivisorBounds::new(25.0, 1.0).unwrap());
        state.force_spyglass(Some(SpyglassMode::Both));
        state.recompute();

        state.reset();

        assert_eq!(state, RestrictionState::new());
        assert_eq!(state.zoom_divisor_bounds(), None);
        assert_eq!(state.spyglass_mode(), None);
        assert_eq!(state.acknowledgement(), Acknowledgement::None);
    }

    #[test]
    fn test_active_kinds_are_order_independent() {
        let mut a = RestrictionState::new();
        a.activate(RestrictionKind::SpyglassOverlay);
        a.activate(RestrictionKind::DisableZoom);
        a.recompute();

        let mut b = RestrictionState::new();
        b.activate(RestrictionKind::DisableZoom);
        b.activate(RestrictionKind::SpyglassOverlay);
        b.recompute();

        assert_eq!(a, b);
        assert_eq!(
            a.active_kinds().collect::<Vec<_>>(),
            vec![RestrictionKind::DisableZoom, RestrictionKind::SpyglassOverlay]
        );
    }

    #[test]
    fn test_spyglass_mode_maps_to_dependency_option() {
        assert_eq!(
            SpyglassDependency::from(SpyglassMode::ReplaceZoom),
            SpyglassDependency::ReplaceZoom
        );
    }
}
