//! Notice sinks.
//!
//! The client has no UI of its own, so notices are rendered as log lines
//! carrying their translation keys.  A UI shell would implement
//! [`Notifier`] itself and look the keys up in its language files.

pub mod mock;

use tracing::info;

use crate::application::notify::{Notice, Notifier};

/// Writes each notice to the log at `info` level.
#[derive(Debug, Default)]
pub struct LogToastNotifier;

impl LogToastNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for LogToastNotifier {
    fn notify(&self, notice: Notice) {
        info!(
            title = Notice::TITLE_KEY,
            description = notice.description_key(),
            "toast"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_notifier_accepts_every_notice() {
        let notifier = LogToastNotifier::new();
        notifier.notify(Notice::RestrictionsAcknowledged);
        notifier.notify(Notice::NoRestrictions);
    }
}
