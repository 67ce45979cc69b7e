//! User-facing error display.
//!
//! A pure mapping from business/transport codes to notifications: look up an
//! [`ErrorRule`] by exact numeric code, show the supplied message or the
//! rule's default at the rule's severity, then run the rule's optional
//! callback (a logout redirect for session expiry, say). Unmatched codes
//! fall through to a generic unknown-error notification. No retries, no
//! state.

use std::fmt;
use std::sync::Arc;

use tracing::{error, info, warn};

/// Notification severity, the minimum surface a toast component offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Informational notice.
    Info,
    /// Something the user should act on, not fatal.
    Warning,
    /// Failure.
    Error,
}

/// The injected notification surface.
///
/// UI layers implement this over their toast component; headless consumers
/// can use [`TracingNotifier`].
pub trait Notify: Send + Sync {
    /// Display `message` at `severity`.
    fn notify(&self, severity: Severity, message: &str);
}

/// [`Notify`] implementation that emits `tracing` events instead of toasts.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notify for TracingNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Info => info!(target: "supersede::notify", "{message}"),
            Severity::Warning => warn!(target: "supersede::notify", "{message}"),
            Severity::Error => error!(target: "supersede::notify", "{message}"),
        }
    }
}

/// Callback attached to an error rule, run after the notification fires.
pub type RuleCallback = Arc<dyn Fn() + Send + Sync>;

/// One entry of the error-display table, matched by exact numeric code.
#[derive(Clone)]
pub struct ErrorRule {
    /// Business or transport code this rule matches.
    pub code: i64,
    /// Severity of the notification.
    pub severity: Severity,
    /// Default message, used when the response carries none.
    pub message: String,
    /// Optional side effect run after the notification.
    pub callback: Option<RuleCallback>,
}

impl ErrorRule {
    /// Create a rule without a callback.
    #[must_use]
    pub fn new(code: i64, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            callback: None,
        }
    }

    /// Attach a callback run after the notification fires.
    #[must_use]
    pub fn with_callback(mut self, callback: RuleCallback) -> Self {
        self.callback = Some(callback);
        self
    }
}

impl fmt::Debug for ErrorRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorRule")
            .field("code", &self.code)
            .field("severity", &self.severity)
            .field("message", &self.message)
            .field("callback", &self.callback.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// The stock rule table.
#[must_use]
pub fn default_rules() -> Vec<ErrorRule> {
    vec![
        ErrorRule::new(403, Severity::Warning, "login expired, please sign in again"),
        ErrorRule::new(404, Severity::Error, "requested endpoint does not exist"),
        ErrorRule::new(500, Severity::Error, "internal server error"),
    ]
}

/// Message shown when no rule matches and the response carried none.
pub const UNKNOWN_ERROR: &str = "unknown error";

/// Message shown for transport-level failures outside the rule table.
pub const NETWORK_ERROR: &str = "network error";

/// Look up `code` in `rules` and fire the matching notification.
///
/// On a match: notify at the rule's severity with the supplied message,
/// falling back to the rule's default, then run the rule's callback. On no
/// match (including a missing code): notify at error severity with the
/// supplied message or [`UNKNOWN_ERROR`].
pub fn display_error(
    rules: &[ErrorRule],
    notifier: &dyn Notify,
    code: Option<i64>,
    msg: Option<&str>,
) {
    let rule = code.and_then(|code| rules.iter().find(|rule| rule.code == code));
    match rule {
        Some(rule) => {
            notifier.notify(rule.severity, msg.unwrap_or(&rule.message));
            if let Some(callback) = &rule.callback {
                callback();
            }
        }
        None => notifier.notify(Severity::Error, msg.unwrap_or(UNKNOWN_ERROR)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Recorder(Mutex<Vec<(Severity, String)>>);

    impl Recorder {
        #[allow(clippy::unwrap_used)]
        fn take(&self) -> Vec<(Severity, String)> {
            self.0.lock().unwrap().drain(..).collect()
        }
    }

    impl Notify for Recorder {
        #[allow(clippy::unwrap_used)]
        fn notify(&self, severity: Severity, message: &str) {
            self.0.lock().unwrap().push((severity, message.to_owned()));
        }
    }

    #[test]
    fn matched_rule_uses_supplied_message_over_default() {
        let recorder = Recorder::default();
        display_error(&default_rules(), &recorder, Some(403), Some("expired"));
        assert_eq!(recorder.take(), vec![(Severity::Warning, "expired".into())]);
    }

    #[test]
    fn matched_rule_falls_back_to_default_message() {
        let recorder = Recorder::default();
        display_error(&default_rules(), &recorder, Some(500), None);
        assert_eq!(
            recorder.take(),
            vec![(Severity::Error, "internal server error".into())]
        );
    }

    #[test]
    fn matched_rule_runs_callback_after_notification() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let rules = vec![
            ErrorRule::new(403, Severity::Warning, "expired").with_callback(Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })),
        ];

        let recorder = Recorder::default();
        display_error(&rules, &recorder, Some(403), None);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(recorder.take().len(), 1);
    }

    #[test]
    fn unmatched_code_notifies_unknown_error() {
        let recorder = Recorder::default();
        display_error(&default_rules(), &recorder, Some(999), None);
        assert_eq!(
            recorder.take(),
            vec![(Severity::Error, UNKNOWN_ERROR.into())]
        );
    }

    #[test]
    fn missing_code_notifies_unknown_error() {
        let recorder = Recorder::default();
        display_error(&default_rules(), &recorder, None, None);
        assert_eq!(
            recorder.take(),
            vec![(Severity::Error, UNKNOWN_ERROR.into())]
        );
    }

    #[test]
    fn unmatched_code_still_prefers_supplied_message() {
        let recorder = Recorder::default();
        display_error(&default_rules(), &recorder, Some(999), Some("boom"));
        assert_eq!(recorder.take(), vec![(Severity::Error, "boom".into())]);
    }
}
