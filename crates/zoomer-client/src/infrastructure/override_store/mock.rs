//! Recording option store for tests.
//!
//! Every `set_override` / `remove_override` call is appended to a
//! `Mutex<Vec<...>>` so assertions can check exactly which options were
//! touched and in what order.  The current overrides are tracked alongside so
//! `value` behaves like a real store with no user values.
//!
//! Set `should_fail = true` to make every write return
//! `OverrideError::Unavailable` while still recording the attempt.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use zoomer_core::{OptionId, OverrideValue};

use crate::application::apply_policy::{OverrideError, OverrideStore};

#[derive(Debug, Default)]
pub struct RecordingOverrideStore {
    /// Every `(option, value)` passed to `set_override`.
    pub sets: Mutex<Vec<(OptionId, OverrideValue)>>,
    /// Every option passed to `remove_override`.
    pub removes: Mutex<Vec<OptionId>>,
    overrides: Mutex<BTreeMap<OptionId, OverrideValue>>,
    pub should_fail: bool,
}

impl RecordingOverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// The override currently in place for `option`.
    pub fn current(&self, option: OptionId) -> Option<OverrideValue> {
        lock(&self.overrides).get(&option).copied()
    }

    /// Every override currently in place.
    pub fn snapshot(&self) -> BTreeMap<OptionId, OverrideValue> {
        lock(&self.overrides).clone()
    }
}

impl OverrideStore for RecordingOverrideStore {
    fn set_override(&self, option: OptionId, value: OverrideValue) -> Result<(), OverrideError> {
        lock(&self.sets).push((option, value));
        if self.should_fail {
            return Err(OverrideError::Unavailable("mock failure".into()));
        }
        lock(&self.overrides).insert(option, value);
        Ok(())
    }

    fn remove_override(&self, option: OptionId) -> Result<(), OverrideError> {
        lock(&self.removes).push(option);
        if self.should_fail {
            return Err(OverrideError::Unavailable("mock failure".into()));
        }
        lock(&self.overrides).remove(&option);
        Ok(())
    }

    fn value(&self, option: OptionId) -> Option<OverrideValue> {
        self.current(option)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
