//! The effective zoom instance.
//!
//! Whenever a restriction changes the zoom options, the configurator re-reads
//! them from the option store and derives what the zoom actually does:
//!
//! - the divisor is clamped into the server's forced bounds, or into the
//!   user's own min/max when the server forces none;
//! - zooming is off while `DisableZoom` is active;
//! - scrolling follows the (possibly overridden) zoom-scrolling option.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;
use zoomer_core::{
    OptionId, RestrictionState, SpyglassDependency, ZoomDivisorBounds, ZoomOverlay,
};

use crate::application::apply_policy::{OverrideStore, ZoomInstanceHook, CLASSIC_ZOOM_DIVISOR};

/// Snapshot of how zooming currently behaves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomInstance {
    pub enabled: bool,
    pub divisor: f64,
    pub minimum_divisor: f64,
    pub maximum_divisor: f64,
    pub scrolling: bool,
    pub spyglass_dependency: SpyglassDependency,
    pub overlay: ZoomOverlay,
}

/// Recomputes the [`ZoomInstance`] from the option store.
pub struct ZoomInstanceConfigurator {
    store: Arc<dyn OverrideStore>,
    user_bounds: ZoomDivisorBounds,
    current: Mutex<ZoomInstance>,
}

impl ZoomInstanceConfigurator {
    /// `user_bounds` is the user's own divisor range, used when no server
    /// bounds are forced.
    pub fn new(store: Arc<dyn OverrideStore>, user_bounds: ZoomDivisorBounds) -> Self {
        let current = compute(store.as_ref(), user_bounds, &RestrictionState::new());
        Self {
            store,
            user_bounds,
            current: Mutex::new(current),
        }
    }

    /// The most recently computed instance.
    pub fn current(&self) -> ZoomInstance {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ZoomInstanceHook for ZoomInstanceConfigurator {
    fn configure_zoom_instance(&self, state: &RestrictionState) {
        let instance = compute(self.store.as_ref(), self.user_bounds, state);
        debug!(?instance, "zoom instance reconfigured");
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = instance;
    }
}

fn compute(
    store: &dyn OverrideStore,
    user_bounds: ZoomDivisorBounds,
    state: &RestrictionState,
) -> ZoomInstance {
    let bounds = state.zoom_divisor_bounds().unwrap_or(user_bounds);
    let divisor = store
        .value(OptionId::ZoomDivisor)
        .and_then(|v| v.as_f64())
        .unwrap_or(CLASSIC_ZOOM_DIVISOR);

    ZoomInstance {
        enabled: !state.disable_zoom(),
        divisor: bounds.clamp(divisor),
        minimum_divisor: bounds.minimum(),
        maximum_divisor: bounds.maximum(),
        scrolling: store
            .value(OptionId::ZoomScrolling)
            .and_then(|v| v.as_bool())
            .unwrap_or(true),
        spyglass_dependency: store
            .value(OptionId::SpyglassDependency)
            .and_then(|v| v.as_spyglass_dependency())
            .unwrap_or(SpyglassDependency::Off),
        overlay: store
            .value(OptionId::ZoomOverlay)
            .and_then(|v| v.as_zoom_overlay())
            .unwrap_or(ZoomOverlay::Off),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
