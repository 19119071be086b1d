//! In-memory option store with per-option overrides.
//!
//! Each option keeps the user's own value and, separately, an optional
//! override.  Reads return the override while one is present; removing it
//! makes the user's value visible again without having touched it.

pub mod mock;

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::trace;
use zoomer_core::{OptionId, OverrideValue};

use crate::application::apply_policy::{OverrideError, OverrideStore};

#[derive(Debug, Clone, Copy)]
struct Slot {
    user: OverrideValue,
    overridden: Option<OverrideValue>,
}

impl Slot {
    fn effective(&self) -> OverrideValue {
        self.overridden.unwrap_or(self.user)
    }
}

/// Thread-safe option store seeded from the user's configuration.
#[derive(Debug, Default)]
pub struct InMemoryOverrideStore {
    slots: Mutex<HashMap<OptionId, Slot>>,
}

impl InMemoryOverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from the user's own values.
    ///
    /// # Errors
    ///
    /// Returns [`OverrideError::TypeMismatch`] for the first value whose type
    /// does not match its option.
    pub fn with_user_values(
        values: impl IntoIterator<Item = (OptionId, OverrideValue)>,
    ) -> Result<Self, OverrideError> {
        let store = Self::new();
        for (option, value) in values {
            store.set_user_value(option, value)?;
        }
        Ok(store)
    }

    /// Sets the user's own value, leaving any override in place.
    pub fn set_user_value(&self, option: OptionId, value: OverrideValue) -> Result<(), OverrideError> {
        check_type(option, value)?;
        let mut slots = self.lock();
        slots
            .entry(option)
            .and_modify(|slot| slot.user = value)
            .or_insert(Slot {
                user: value,
                overridden: None,
            });
        Ok(())
    }

    /// The user's own value, ignoring any override.
    pub fn user_value(&self, option: OptionId) -> Option<OverrideValue> {
        self.lock().get(&option).map(|slot| slot.user)
    }

    /// Returns `true` if `option` currently carries an override.
    pub fn is_overridden(&self, option: OptionId) -> bool {
        self.lock()
            .get(&option)
            .is_some_and(|slot| slot.overridden.is_some())
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<OptionId, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl OverrideStore for InMemoryOverrideStore {
    fn set_override(&self, option: OptionId, value: OverrideValue) -> Result<(), OverrideError> {
        check_type(option, value)?;
        let mut slots = self.lock();
        match slots.get_mut(&option) {
            Some(slot) => slot.overridden = Some(value),
            // No user value yet: the override doubles as one so removal
            // still leaves the option readable.
            None => {
                slots.insert(
                    option,
                    Slot {
                        user: value,
                        overridden: Some(value),
                    },
                );
            }
        }
        trace!(%option, ?value, "override set");
        Ok(())
    }

    fn remove_override(&self, option: OptionId) -> Result<(), OverrideError> {
        if let Some(slot) = self.lock().get_mut(&option) {
            slot.overridden = None;
        }
        trace!(%option, "override removed");
        Ok(())
    }

    fn value(&self, option: OptionId) -> Option<OverrideValue> {
        self.lock().get(&option).map(Slot::effective)
    }
}

fn check_type(option: OptionId, value: OverrideValue) -> Result<(), OverrideError> {
    if option.accepts(&value) {
        Ok(())
    } else {
        Err(OverrideError::TypeMismatch { option, value })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use zoomer_core::ZoomOverlay;

    fn seeded() -> InMemoryOverrideStore {
        InMemoryOverrideStore::with_user_values([
            (OptionId::ZoomScrolling, OverrideValue::Bool(true)),
            (OptionId::ZoomDivisor, OverrideValue::Double(6.0)),
            (OptionId::ZoomOverlay, OverrideValue::ZoomOverlay(ZoomOverlay::Vignette)),
        ])
        .unwrap()
    }

    #[test]
    fn test_override_shadows_user_value() {
        // Arrange
        let store = seeded();

        // Act
        store
            .set_override(OptionId::ZoomScrolling, OverrideValue::Bool(false))
            .unwrap();

        // Assert
        assert_eq!(store.value(OptionId::ZoomScrolling), Some(OverrideValue::Bool(false)));
        assert_eq!(store.user_value(OptionId::ZoomScrolling), Some(OverrideValue::Bool(true)));
        assert!(store.is_overridden(OptionId::ZoomScrolling));
    }

    #[test]
    fn test_remove_restores_user_value() {
        let store = seeded();
        store
            .set_override(OptionId::ZoomDivisor, OverrideValue::Double(4.0))
            .unwrap();

        store.remove_override(OptionId::ZoomDivisor).unwrap();

        assert_eq!(store.value(OptionId::ZoomDivisor), Some(OverrideValue::Double(6.0)));
        assert!(!store.is_overridden(OptionId::ZoomDivisor));
    }

    #[test]
    fn test_remove_without_override_is_ok() {
        let store = seeded();

        assert!(store.remove_override(OptionId::ExtraKeyBinds).is_ok());
        assert!(store.remove_override(OptionId::ZoomOverlay).is_ok());
        assert_eq!(
            store.value(OptionId::ZoomOverlay),
            Some(OverrideValue::ZoomOverlay(ZoomOverlay::Vignette))
        );
    }

    #[test]
    fn test_user_value_change_keeps_override() {
        let store = seeded();
        store
            .set_override(OptionId::ZoomScrolling, OverrideValue::Bool(false))
            .unwrap();

        store
            .set_user_value(OptionId::ZoomScrolling, OverrideValue::Bool(true))
            .unwrap();

        assert_eq!(store.value(OptionId::ZoomScrolling), Some(OverrideValue::Bool(false)));
    }

    #[test]
    fn test_mismatched_type_is_rejected() {
        let store = seeded();

        let err = store
            .set_override(OptionId::ZoomDivisor, OverrideValue::Bool(false))
            .unwrap_err();

        assert_eq!(
            err,
            OverrideError::TypeMismatch {
                option: OptionId::ZoomDivisor,
                value: OverrideValue::Bool(false)
            }
        );
        assert_eq!(store.value(OptionId::ZoomDivisor), Some(OverrideValue::Double(6.0)));
    }

    #[test]
    fn test_unknown_option_reads_none() {
        let store = InMemoryOverrideStore::new();
        assert_eq!(store.value(OptionId::CinematicCamera), None);
    }
}
