//! Session lifecycle: one restriction state per server connection.
//!
//! # States (for beginners)
//!
//! ```text
//!                 any successful apply
//!   Unrestricted ─────────────────────► Restricted
//!        ▲                                  │
//!        └──────────── disconnect ──────────┘
//!          (remove every override, reset state)
//! ```
//!
//! The controller is the single consumer of inbound restriction messages.
//! It owns the [`RestrictionState`] outright; nothing else holds a reference,
//! so no lock guards it.  Connecting always starts from an empty state, and a
//! disconnect only touches the option store if the session was restricted.

use tracing::{debug, info, info_span};
use uuid::Uuid;
use zoomer_core::{decode_inbound, OptionId, RestrictionMessage, RestrictionState};

use crate::application::apply_policy::PolicyApplicator;
use crate::application::notify::NotificationGate;

/// Drives restriction application across connect/disconnect boundaries.
pub struct SessionLifecycleController {
    applicator: PolicyApplicator,
    gate: NotificationGate,
    session_id: Option<Uuid>,
    state: RestrictionState,
}

impl SessionLifecycleController {
    pub fn new(applicator: PolicyApplicator, gate: NotificationGate) -> Self {
        Self {
            applicator,
            gate,
            session_id: None,
            state: RestrictionState::new(),
        }
    }

    /// Opens a new session.  A session that is still open is closed first.
    ///
    /// Returns the new session's identifier.
    pub fn on_connect(&mut self) -> Uuid {
        if self.session_id.is_some() {
            debug!("connect while a session is open; closing it first");
            self.on_disconnect();
        }
        let id = Uuid::new_v4();
        info!(session = %id, "restriction session opened");
        self.session_id = Some(id);
        self.state = RestrictionState::new();
        id
    }

    /// Closes the current session.
    ///
    /// If restrictions were in effect, every option's override is removed and
    /// the state is reset in one step; otherwise the option store is left
    /// alone.  Returns `true` if restrictions were lifted.
    pub fn on_disconnect(&mut self) -> bool {
        let Some(id) = self.session_id.take() else {
            debug!("disconnect without an open session");
            return false;
        };
        let _span = info_span!("session", id = %id).entered();

        let lifted = self.state.has_restrictions();
        if lifted {
            self.applicator.revert_all();
            self.state.reset();
            self.applicator.reconfigure_zoom(&self.state);
            info!(options = OptionId::ALL.len(), "server restrictions lifted");
        } else {
            self.state.reset();
            debug!("session closed without restrictions");
        }
        lifted
    }

    /// The single inbound entry point for raw channel payloads.
    ///
    /// Unknown channels are ignored and malformed payloads dropped, each with
    /// a debug log line; neither touches the state.
    pub fn handle_inbound(&mut self, channel: &str, payload: &[u8]) {
        if let Some(message) = decode_inbound(channel, payload) {
            self.handle_message(message);
        }
    }

    /// Applies one decoded message to the current session.
    pub fn handle_message(&mut self, message: RestrictionMessage) {
        let id = self.ensure_session();
        let _span = info_span!("session", id = %id).entered();

        let state = &mut self.state;
        match message {
            RestrictionMessage::DisableZoom => self.applicator.apply_disable_zoom(state),
            RestrictionMessage::DisableZoomScrolling => {
                self.applicator.apply_disable_zoom_scrolling(state)
            }
            RestrictionMessage::ForceClassicMode => self.applicator.apply_force_classic_mode(state),
            RestrictionMessage::ForceZoomDivisors { maximum, minimum } => {
                if let Err(e) = self
                    .applicator
                    .apply_force_zoom_divisors(state, maximum, minimum)
                {
                    debug!("divisor restriction ignored: {e}");
                }
            }
            RestrictionMessage::AcknowledgeMod { restrictionless } => {
                state.recompute();
                self.gate
                    .on_acknowledgement(!restrictionless, state.acknowledgement());
            }
            RestrictionMessage::ForceSpyglass {
                require_item,
                replace_zoom,
            } => self
                .applicator
                .apply_force_spyglass(state, require_item, replace_zoom),
            RestrictionMessage::ForceSpyglassOverlay => {
                self.applicator.apply_force_spyglass_overlay(state)
            }
        }
    }

    /// Read-only view of the current restrictions.
    pub fn state(&self) -> &RestrictionState {
        &self.state
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.session_id
    }

    fn ensure_session(&mut self) -> Uuid {
        match self.session_id {
            Some(id) => id,
            None => {
                debug!("restriction message before connect; opening a session");
                self.on_connect()
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
