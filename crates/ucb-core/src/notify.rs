//! Best-effort admin notifications.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    domain::ChatTarget, errors::Error, formatting::escape_html, messaging::port::MessagingPort,
};

/// Fire-and-forget delivery of status messages to the configured admin.
///
/// Notifications are diagnostic, not transactional: callers can never
/// observe whether delivery succeeded, and a lost notification must never
/// stall the user-facing flow.
pub struct AdminNotifier {
    target: Option<ChatTarget>,
    messenger: Arc<dyn MessagingPort>,
}

impl AdminNotifier {
    pub fn new(target: Option<ChatTarget>, messenger: Arc<dyn MessagingPort>) -> Self {
        Self { target, messenger }
    }

    /// Send `text` to the admin. At most two attempts: the rich markdown
    /// send, then the HTML-escaped literal fallback when the first was
    /// rejected as a bad request. Everything else is logged and dropped.
    pub async fn notify(&self, text: &str) {
        let Some(target) = &self.target else {
            return;
        };

        match self.messenger.send_markdown(target, text).await {
            Ok(_) => {}
            Err(Error::BadRequest(e)) => {
                debug!("admin notification rejected, retrying escaped: {e}");
                if let Err(e) = self.messenger.send_html(target, &escape_html(text)).await {
                    warn!("admin notification dropped (fallback failed): {e}");
                }
            }
            Err(e) => {
                warn!("admin notification dropped: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::mock::{Call, FailMode, RecordingMessenger};

    fn admin() -> Option<ChatTarget> {
        Some(ChatTarget::Id(99))
    }

    #[tokio::test]
    async fn unconfigured_admin_means_zero_calls() {
        let messenger = Arc::new(RecordingMessenger::new());
        let notifier = AdminNotifier::new(None, messenger.clone());

        notifier.notify("new user").await;

        assert!(messenger.calls().is_empty());
    }

    #[tokio::test]
    async fn happy_path_sends_once() {
        let messenger = Arc::new(RecordingMessenger::new());
        let notifier = AdminNotifier::new(admin(), messenger.clone());

        notifier.notify("*new* user").await;

        assert_eq!(
            messenger.calls(),
            vec![Call::Markdown {
                chat: ChatTarget::Id(99),
                text: "*new* user".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn bad_request_falls_back_to_escaped_html() {
        let messenger = Arc::new(RecordingMessenger::new());
        messenger.fail_next_markdown(FailMode::BadRequest);
        let notifier = AdminNotifier::new(admin(), messenger.clone());

        notifier.notify("a <b> & c").await;

        let calls = messenger.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(&calls[1], Call::Html { text, .. } if text == "a &lt;b&gt; &amp; c"));
    }

    #[tokio::test]
    async fn non_formatting_errors_are_dropped_without_fallback() {
        let messenger = Arc::new(RecordingMessenger::new());
        messenger.fail_next_markdown(FailMode::External);
        let notifier = AdminNotifier::new(admin(), messenger.clone());

        notifier.notify("status").await;

        assert_eq!(messenger.calls().len(), 1);
    }

    #[tokio::test]
    async fn fallback_failure_is_swallowed() {
        let messenger = Arc::new(RecordingMessenger::new());
        messenger.fail_next_markdown(FailMode::BadRequest);
        messenger.fail_next_html(FailMode::External);
        let notifier = AdminNotifier::new(admin(), messenger.clone());

        // Must not panic or surface anything.
        notifier.notify("status").await;

        assert_eq!(messenger.calls().len(), 2);
    }
}
