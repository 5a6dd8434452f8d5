//! Notification seam.

use crate::core::NotificationConfig;
use async_trait::async_trait;
use tracing::info;

/// Outbound notification channel (webhook, email, chat).
///
/// Best effort: implementations must swallow their own failures, and the
/// orchestrator never blocks on or aborts for a notification. A missing
/// configuration is a no-op, not an error.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends `message` according to `config`, if any.
    async fn notify(&self, config: Option<&NotificationConfig>, message: &str);
}

/// Discards all notifications.
///
/// Used as the default when no notification transport is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpNotifier;

#[async_trait]
impl Notifier for NoOpNotifier {
    async fn notify(&self, _config: Option<&NotificationConfig>, _message: &str) {
        // Intentionally empty - discards all notifications
    }
}

/// Logs notifications through the tracing framework.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNotifier;

#[async_trait]
impl Notifier for LoggingNotifier {
    async fn notify(&self, config: Option<&NotificationConfig>, message: &str) {
        let Some(config) = config else { return };
        info!(
            webhook = config.webhook_url.as_deref(),
            email = config.email.as_deref(),
            slack = config.slack_channel.as_deref(),
            "Notification: {}",
            message
        );
    }
}

/// Records notifications for test assertions.
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    messages: parking_lot::RwLock<Vec<String>>,
}

impl CollectingNotifier {
    /// Creates a new collecting notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all recorded messages.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.read().clone()
    }

    /// Clears recorded messages.
    pub fn clear(&self) {
        self.messages.write().clear();
    }
}

#[async_trait]
impl Notifier for CollectingNotifier {
    async fn notify(&self, config: Option<&NotificationConfig>, message: &str) {
        if config.is_none() {
            return;
        }
        self.messages.write().push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_collecting_notifier_records_messages() {
        let notifier = CollectingNotifier::new();
        let config = NotificationConfig::default();

        notifier.notify(Some(&config), "workflow done").await;

        assert_eq!(notifier.messages(), vec!["workflow done".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_config_is_a_noop() {
        let notifier = CollectingNotifier::new();
        notifier.notify(None, "dropped").await;
        assert!(notifier.messages().is_empty());
    }
}
