//! PolicyApplicator: maps accepted restrictions onto option overrides.
//!
//! This use case sits at the application layer and delegates to an
//! [`OverrideStore`] trait object for the actual option writes, and to a
//! [`ZoomInstanceHook`] for recomputing the effective zoom.  Infrastructure implementations live in `infrastructure`.
//!
//! Every operation is idempotent: applying the same restriction twice leaves
//! the store and the [`RestrictionState`] exactly as applying it once.  Each
//! successful operation ends by recomputing the state's aggregate signals.
//! Operations that change what the zoom does (enabled, divisor, spyglass,
//! overlay) run the zoom hook once the kind is active.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};
use zoomer_core::{
    CinematicCamera, OptionId, OverrideValue, RestrictionError, RestrictionKind, RestrictionState,
    SpyglassMode, ZoomDivisorBounds, ZoomOverlay,
};

/// Divisor forced by classic mode.
pub const CLASSIC_ZOOM_DIVISOR: f64 = 4.0;

/// Error type for option store operations.
#[derive(Debug, Error, PartialEq)]
pub enum OverrideError {
    /// The value's type does not match the option.
    #[error("option {option} does not accept {value:?}")]
    TypeMismatch {
        option: OptionId,
        value: OverrideValue,
    },
    /// The backing store could not be reached.
    #[error("option store unavailable: {0}")]
    Unavailable(String),
}

/// Per-option override storage.
///
/// An override sits on top of the user's own value without replacing it;
/// removing the override makes the user's value visible again.
#[cfg_attr(test, mockall::automock)]
pub trait OverrideStore: Send + Sync {
    /// Writes `value` over the user's setting for `option`.
    fn set_override(&self, option: OptionId, value: OverrideValue) -> Result<(), OverrideError>;

    /// Removes the override for `option`.  Removing an absent override is not
    /// an error.
    fn remove_override(&self, option: OptionId) -> Result<(), OverrideError>;

    /// The effective value: the override if present, else the user's value.
    fn value(&self, option: OptionId) -> Option<OverrideValue>;
}

/// Recomputes whatever the client derives from the zoom options.
#[cfg_attr(test, mockall::automock)]
pub trait ZoomInstanceHook: Send + Sync {
    fn configure_zoom_instance(&self, state: &RestrictionState);
}

/// The Apply Policy use case.
pub struct PolicyApplicator {
    store: Arc<dyn OverrideStore>,
    zoom: Arc<dyn ZoomInstanceHook>,
}

impl PolicyApplicator {
    /// Creates a new applicator over the given store and zoom hook.
    pub fn new(store: Arc<dyn OverrideStore>, zoom: Arc<dyn ZoomInstanceHook>) -> Self {
        Self { store, zoom }
    }

    /// Disables zooming for the rest of the session.
    pub fn apply_disable_zoom(&self, state: &mut RestrictionState) {
        info!("server disabled zooming");
        state.activate(RestrictionKind::DisableZoom);
        self.zoom.configure_zoom_instance(state);
        state.recompute();
    }

    /// Disables zoom scrolling and the extra key binds.
    pub fn apply_disable_zoom_scrolling(&self, state: &mut RestrictionState) {
        info!("server disabled zoom scrolling");
        self.set(OptionId::ZoomScrolling, OverrideValue::Bool(false));
        self.set(OptionId::ExtraKeyBinds, OverrideValue::Bool(false));
        state.activate(RestrictionKind::DisableZoomScrolling);
        state.recompute();
    }

    /// Forces the classic preset.
    ///
    /// Classic mode has no zoom scrolling, so this first applies
    /// [`PolicyApplicator::apply_disable_zoom_scrolling`]; both kinds end up
    /// active.
    pub fn apply_force_classic_mode(&self, state: &mut RestrictionState) {
        info!("server imposed classic mode");
        self.apply_disable_zoom_scrolling(state);
        self.set(
            OptionId::CinematicCamera,
            OverrideValue::CinematicCamera(CinematicCamera::Vanilla),
        );
        self.set(OptionId::ReduceSensitivity, OverrideValue::Bool(false));
        self.set(OptionId::ZoomDivisor, OverrideValue::Double(CLASSIC_ZOOM_DIVISOR));
        state.activate(RestrictionKind::ForceClassicMode);
        self.zoom.configure_zoom_instance(state);
        state.recompute();
    }

    /// Locks the zoom divisor into `[minimum, maximum]`.
    ///
    /// # Errors
    ///
    /// Returns [`RestrictionError::InvalidDivisorBounds`] unless
    /// `0 < minimum <= maximum`; the state is left untouched in that case.
    pub fn apply_force_zoom_divisors(
        &self,
        state: &mut RestrictionState,
        maximum: f64,
        minimum: f64,
    ) -> Result<(), RestrictionError> {
        let bounds = match ZoomDivisorBounds::new(maximum, minimum) {
            Ok(bounds) => bounds,
            Err(e) => {
                warn!(minimum, maximum, "server attempted to set invalid zoom divisors");
                return Err(e);
            }
        };
        info!(minimum, maximum, "server forced zoom divisors");
        state.force_zoom_divisors(bounds);
        self.zoom.configure_zoom_instance(state);
        state.recompute();
        Ok(())
    }

    /// Imposes a spyglass dependency.
    ///
    /// With neither flag set the dependency override is removed, yet the kind
    /// still counts as active.
    pub fn apply_force_spyglass(
        &self,
        state: &mut RestrictionState,
        require_item: bool,
        replace_zoom: bool,
    ) {
        info!(require_item, replace_zoom, "server imposed spyglass restrictions");
        let mode = SpyglassMode::from_flags(require_item, replace_zoom);
        match mode {
            Some(mode) => self.set(
                OptionId::SpyglassDependency,
                OverrideValue::SpyglassDependency(mode.into()),
            ),
            None => self.remove(OptionId::SpyglassDependency),
        }
        state.force_spyglass(mode);
        self.zoom.configure_zoom_instance(state);
        state.recompute();
    }

    /// Replaces the zoom overlay with the spyglass overlay.
    pub fn apply_force_spyglass_overlay(&self, state: &mut RestrictionState) {
        info!("server imposed the spyglass overlay");
        self.set(
            OptionId::ZoomOverlay,
            OverrideValue::ZoomOverlay(ZoomOverlay::Spyglass),
        );
        state.activate(RestrictionKind::SpyglassOverlay);
        self.zoom.configure_zoom_instance(state);
        state.recompute();
    }

    /// Removes the override of every option a restriction can touch.
    ///
    /// Failures are logged and do not stop the remaining removals.
    pub fn revert_all(&self) {
        for option in OptionId::ALL {
            self.remove(option);
        }
    }

    /// Lets the zoom hook observe `state`, e.g. after a reset.
    pub fn reconfigure_zoom(&self, state: &RestrictionState) {
        self.zoom.configure_zoom_instance(state);
    }

    fn set(&self, option: OptionId, value: OverrideValue) {
        if let Err(e) = self.store.set_override(option, value) {
            error!(%option, "failed to set override: {e}");
        }
    }

    fn remove(&self, option: OptionId) {
        if let Err(e) = self.store.remove_override(option) {
            error!(%option, "failed to remove override: {e}");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::override_store::mock::RecordingOverrideStore;
    use mockall::predicate::eq;
    use zoomer_core::{Acknowledgement, SpyglassDependency};

    // ── Fixtures ──────────────────────────────────────────────────────────────

    fn idle_zoom_hook() -> Arc<MockZoomInstanceHook> {
        let mut hook = MockZoomInstanceHook::new();
        hook.expect_configure_zoom_instance().return_const(());
        Arc::new(hook)
    }

    fn make_applicator() -> (PolicyApplicator, Arc<RecordingOverrideStore>) {
        let store = Arc::new(RecordingOverrideStore::new());
        let applicator = PolicyApplicator::new(
            Arc::clone(&store) as Arc<dyn OverrideStore>,
            idle_zoom_hook(),
        );
        (applicator, store)
    }

    // ── DisableZoom ───────────────────────────────────────────────────────────

    #[test]
    fn test_disable_zoom_touches_no_option() {
        // Arrange
        let (applicator, store) = make_applicator();
        let mut state = RestrictionState::new();

        // Act
        applicator.apply_disable_zoom(&mut state);

        // Assert
        assert!(state.disable_zoom());
        assert!(state.has_restrictions());
        assert_eq!(state.acknowledgement(), Acknowledgement::HasRestrictions);
        assert!(store.sets.lock().unwrap().is_empty());
    }

    // ── DisableZoomScrolling ──────────────────────────────────────────────────

    #[test]
    fn test_disable_zoom_scrolling_overrides_scrolling_and_key_binds() {
        // Arrange
        let (applicator, store) = make_applicator();
        let mut state = RestrictionState::new();

        // Act
        applicator.apply_disable_zoom_scrolling(&mut state);

        // Assert
        assert_eq!(
            *store.sets.lock().unwrap(),
            vec![
                (OptionId::ZoomScrolling, OverrideValue::Bool(false)),
                (OptionId::ExtraKeyBinds, OverrideValue::Bool(false)),
            ]
        );
        assert!(state.disable_zoom_scrolling());
    }

    #[test]
    fn test_disable_zoom_scrolling_writes_through_store_trait() {
        // Arrange
        let mut store = MockOverrideStore::new();
        store
            .expect_set_override()
            .with(eq(OptionId::ZoomScrolling), eq(OverrideValue::Bool(false)))
            .times(1)
            .returning(|_, _| Ok(()));
        store
            .expect_set_override()
            .with(eq(OptionId::ExtraKeyBinds), eq(OverrideValue::Bool(false)))
            .times(1)
            .returning(|_, _| Ok(()));
        store.expect_remove_override().never();
        let applicator = PolicyApplicator::new(Arc::new(store), idle_zoom_hook());
        let mut state = RestrictionState::new();

        // Act
        applicator.apply_disable_zoom_scrolling(&mut state);

        // Assert – expectations are verified when the mock drops
        assert!(state.disable_zoom_scrolling());
    }

    // ── ForceClassicMode ──────────────────────────────────────────────────────

    #[test]
    fn test_classic_mode_includes_scrolling_restriction() {
        // Arrange
        let (applicator, store) = make_applicator();
        let mut state = RestrictionState::new();

        // Act
        applicator.apply_force_classic_mode(&mut state);

        // Assert
        assert!(state.force_classic_mode());
        assert!(state.disable_zoom_scrolling());
        assert_eq!(
            store.current(OptionId::CinematicCamera),
            Some(OverrideValue::CinematicCamera(CinematicCamera::Vanilla))
        );
        assert_eq!(
            store.current(OptionId::ReduceSensitivity),
            Some(OverrideValue::Bool(false))
        );
        assert_eq!(
            store.current(OptionId::ZoomDivisor),
            Some(OverrideValue::Double(CLASSIC_ZOOM_DIVISOR))
        );
        assert_eq!(store.current(OptionId::ZoomScrolling), Some(OverrideValue::Bool(false)));
    }

    #[test]
    fn test_classic_mode_reconfigures_zoom_instance_with_kind_active() {
        // Arrange
        let mut hook = MockZoomInstanceHook::new();
        hook.expect_configure_zoom_instance()
            .withf(|state: &RestrictionState| state.force_classic_mode())
            .times(1)
            .return_const(());
        let applicator =
            PolicyApplicator::new(Arc::new(RecordingOverrideStore::new()), Arc::new(hook));
        let mut state = RestrictionState::new();

        // Act
        applicator.apply_force_classic_mode(&mut state);

        // Assert
        assert!(state.has_restrictions());
    }

    // ── ForceZoomDivisors ─────────────────────────────────────────────────────

    #[test]
    fn test_valid_divisors_are_stored() {
        // Arrange
        let (applicator, _store) = make_applicator();
        let mut state = RestrictionState::new();

        // Act
        let result = applicator.apply_force_zoom_divisors(&mut state, 10.0, 5.0);

        // Assert
        assert!(result.is_ok());
        let bounds = state.zoom_divisor_bounds().unwrap();
        assert_eq!(bounds.maximum(), 10.0);
        assert_eq!(bounds.minimum(), 5.0);
        assert!(state.is_active(RestrictionKind::ForceZoomDivisors));
    }

    #[test]
    fn test_inverted_divisors_leave_state_unchanged() {
        // Arrange
        let mut hook = MockZoomInstanceHook::new();
        hook.expect_configure_zoom_instance().never();
        let applicator =
            PolicyApplicator::new(Arc::new(RecordingOverrideStore::new()), Arc::new(hook));
        let mut state = RestrictionState::new();
        let before = state.clone();

        // Act
        let result = applicator.apply_force_zoom_divisors(&mut state, 5.0, 10.0);

        // Assert
        assert_eq!(
            result,
            Err(RestrictionError::InvalidDivisorBounds {
                maximum: 5.0,
                minimum: 10.0
            })
        );
        assert_eq!(state, before);
        assert!(!state.is_active(RestrictionKind::ForceZoomDivisors));
        assert_eq!(state.acknowledgement(), Acknowledgement::None);
    }

    #[test]
    fn test_invalid_divisors_keep_previous_bounds() {
        // Arrange
        let (applicator, _store) = make_applicator();
        let mut state = RestrictionState::new();
        applicator
            .apply_force_zoom_divisors(&mut state, 25.0, 1.0)
            .unwrap();

        // Act
        let result = applicator.apply_force_zoom_divisors(&mut state, -1.0, 1.0);

        // Assert
        assert!(result.is_err());
        assert_eq!(state.zoom_divisor_bounds().unwrap().maximum(), 25.0);
    }

    // ── ForceSpyglass ─────────────────────────────────────────────────────────

    #[test]
    fn test_spyglass_both_flags_overrides_dependency_with_both() {
        // Arrange
        let (applicator, store) = make_applicator();
        let mut state = RestrictionState::new();

        // Act
        applicator.apply_force_spyglass(&mut state, true, true);

        // Assert
        assert_eq!(state.spyglass_mode(), Some(SpyglassMode::Both));
        assert_eq!(
            store.current(OptionId::SpyglassDependency),
            Some(OverrideValue::SpyglassDependency(SpyglassDependency::Both))
        );
    }

    #[test]
    fn test_spyglass_single_flags_map_to_single_modes() {
        let (applicator, store) = make_applicator();
        let mut state = RestrictionState::new();

        applicator.apply_force_spyglass(&mut state, true, false);
        assert_eq!(state.spyglass_mode(), Some(SpyglassMode::RequireItem));

        applicator.apply_force_spyglass(&mut state, false, true);
        assert_eq!(state.spyglass_mode(), Some(SpyglassMode::ReplaceZoom));
        assert_eq!(
            store.current(OptionId::SpyglassDependency),
            Some(OverrideValue::SpyglassDependency(SpyglassDependency::ReplaceZoom))
        );
    }

    #[test]
    fn test_spyglass_without_flags_is_active_with_no_override() {
        // Arrange
        let (applicator, store) = make_applicator();
        let mut state = RestrictionState::new();

        // Act
        applicator.apply_force_spyglass(&mut state, false, false);

        // Assert
        assert!(state.is_active(RestrictionKind::SpyglassDependency));
        assert_eq!(state.spyglass_mode(), None);
        assert_eq!(store.current(OptionId::SpyglassDependency), None);
        assert!(state.has_restrictions());
    }

    // ── ForceSpyglassOverlay ──────────────────────────────────────────────────

    #[test]
    fn test_spyglass_overlay_overrides_overlay() {
        let (applicator, store) = make_applicator();
        let mut state = RestrictionState::new();

        applicator.apply_force_spyglass_overlay(&mut state);

        assert!(state.spyglass_overlay());
        assert_eq!(
            store.current(OptionId::ZoomOverlay),
            Some(OverrideValue::ZoomOverlay(ZoomOverlay::Spyglass))
        );
    }

    #[test]
    fn test_zoom_affecting_restrictions_reconfigure_with_kind_active() {
        // Arrange
        let mut hook = MockZoomInstanceHook::new();
        hook.expect_configure_zoom_instance()
            .withf(|state: &RestrictionState| {
                state.disable_zoom() && !state.is_active(RestrictionKind::SpyglassDependency)
            })
            .times(1)
            .return_const(());
        hook.expect_configure_zoom_instance()
            .withf(|state: &RestrictionState| {
                !state.spyglass_overlay() && state.is_active(RestrictionKind::SpyglassDependency)
            })
            .times(1)
            .return_const(());
        hook.expect_configure_zoom_instance()
            .withf(|state: &RestrictionState| state.spyglass_overlay())
            .times(1)
            .return_const(());
        let applicator =
            PolicyApplicator::new(Arc::new(RecordingOverrideStore::new()), Arc::new(hook));
        let mut state = RestrictionState::new();

        // Act
        applicator.apply_disable_zoom(&mut state);
        applicator.apply_force_spyglass(&mut state, true, false);
        applicator.apply_force_spyglass_overlay(&mut state);

        // Assert – expectations are verified when the mock drops
        assert!(state.has_restrictions());
    }

    #[test]
    fn test_disable_zoom_scrolling_alone_leaves_zoom_hook_idle() {
        let mut hook = MockZoomInstanceHook::new();
        hook.expect_configure_zoom_instance().never();
        let applicator =
            PolicyApplicator::new(Arc::new(RecordingOverrideStore::new()), Arc::new(hook));

        applicator.apply_disable_zoom_scrolling(&mut RestrictionState::new());
    }

    // ── Idempotence & failures ────────────────────────────────────────────────

    #[test]
    fn test_applying_twice_equals_applying_once() {
        let (applicator, store) = make_applicator();
        let mut once = RestrictionState::new();
        applicator.apply_force_classic_mode(&mut once);
        let overrides_once = store.snapshot();

        let mut twice = RestrictionState::new();
        applicator.apply_force_classic_mode(&mut twice);
        applicator.apply_force_classic_mode(&mut twice);

        assert_eq!(once, twice);
        assert_eq!(store.snapshot(), overrides_once);
    }

    #[test]
    fn test_store_failure_does_not_abort_apply() {
        // Arrange
        let mut store = MockOverrideStore::new();
        store
            .expect_set_override()
            .returning(|_, _| Err(OverrideError::Unavailable("offline".into())));
        let applicator = PolicyApplicator::new(Arc::new(store), idle_zoom_hook());
        let mut state = RestrictionState::new();

        // Act
        applicator.apply_force_spyglass_overlay(&mut state);

        // Assert
        assert!(state.spyglass_overlay());
    }

    #[test]
    fn test_revert_all_removes_every_option() {
        let mut store = MockOverrideStore::new();
        store
            .expect_remove_override()
            .times(OptionId::ALL.len())
            .returning(|_| Ok(()));
        let applicator = PolicyApplicator::new(Arc::new(store), idle_zoom_hook());

        applicator.revert_all();
    }
}
