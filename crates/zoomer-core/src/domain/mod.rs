//! Domain layer: pure business logic with no I/O dependencies.
//!
//! # Modules
//!
//! - **`options`** – The locally configurable options a server may override,
//!   and the tagged [`options::OverrideValue`] written over the user's value.
//!
//! - **`restriction`** – The per-connection [`restriction::RestrictionState`]
//!   and its invariants: divisor bounds are always positive and ordered, and
//!   the acknowledgement status is derived from the set of active kinds.

pub mod options;
pub mod restriction;
