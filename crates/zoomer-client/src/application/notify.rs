//! Acknowledgement notices shown when a server acknowledges the mod.
//!
//! The decision which notice to show (if any) is a pure function of the
//! server's claim and the client's own [`Acknowledgement`] status, kept apart
//! from the [`Notifier`] that actually displays it.

use std::sync::Arc;

use tracing::{debug, info};
use zoomer_core::Acknowledgement;

/// A user-facing notice.  Text is resolved from translation keys by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The server acknowledged the mod and restrictions are in effect.
    RestrictionsAcknowledged,
    /// The server acknowledged the mod and imposed nothing.
    NoRestrictions,
}

impl Notice {
    /// Title shared by every notice.
    pub const TITLE_KEY: &'static str = "toast.ok_zoomer.title";

    pub const fn description_key(self) -> &'static str {
        match self {
            Notice::RestrictionsAcknowledged => "toast.ok_zoomer.acknowledge_mod_restrictions",
            Notice::NoRestrictions => "toast.ok_zoomer.acknowledge_mod",
        }
    }
}

/// Displays a notice to the user.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Decides whether an acknowledgement produces a notice.
///
/// Only two combinations are answered:
///
/// | server says    | client status       | notice                     |
/// |----------------|---------------------|----------------------------|
/// | restricting    | `HasRestrictions`   | `RestrictionsAcknowledged` |
/// | restrictionless| `HasNoRestrictions` | `NoRestrictions`           |
///
/// Every other pairing, including a client status of `None`, stays silent.
pub fn decide(restricting: bool, acknowledgement: Acknowledgement) -> Option<Notice> {
    match (restricting, acknowledgement) {
        (true, Acknowledgement::HasRestrictions) => Some(Notice::RestrictionsAcknowledged),
        (false, Acknowledgement::HasNoRestrictions) => Some(Notice::NoRestrictions),
        _ => None,
    }
}

/// Applies [`decide`] and forwards the result to a [`Notifier`] when the user
/// wants restriction toasts.
pub struct NotificationGate {
    notifier: Arc<dyn Notifier>,
    show_restriction_toasts: bool,
}

impl NotificationGate {
    pub fn new(notifier: Arc<dyn Notifier>, show_restriction_toasts: bool) -> Self {
        Self {
            notifier,
            show_restriction_toasts,
        }
    }

    /// Handles one acknowledgement.  Returns the notice that was decided on,
    /// whether or not it was displayed.
    pub fn on_acknowledgement(
        &self,
        restricting: bool,
        acknowledgement: Acknowledgement,
    ) -> Option<Notice> {
        let notice = decide(restricting, acknowledgement);
        match notice {
            Some(notice) => {
                match notice {
                    Notice::RestrictionsAcknowledged => {
                        info!("server acknowledged the mod and imposed restrictions")
                    }
                    Notice::NoRestrictions => info!("server acknowledged the mod"),
                }
                if self.show_restriction_toasts {
                    self.notifier.notify(notice);
                } else {
                    debug!(?notice, "restriction toasts disabled");
                }
            }
            None => debug!(restricting, ?acknowledgement, "acknowledgement produced no notice"),
        }
        notice
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
