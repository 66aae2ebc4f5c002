use crate::models::{Notification, NotificationLevel};
use chrono::Utc;
use tokio::sync::mpsc;
use uuid::Uuid;

pub const TOGGLE_SUCCESS_MESSAGE: &str = "Credenciamento marcado";
pub const TOGGLE_FAILURE_MESSAGE: &str = "Erro ao marcar credenciamento";
pub const EXPORT_FAILURE_MESSAGE: &str = "Erro ao exportar planilha";
pub const LOAD_FAILURE_MESSAGE: &str = "Erro ao buscar inscritos";

/// Implementations must not block.
pub trait Notifier: Send + Sync {
    fn notify_success(&self, message: &str);
    fn notify_error(&self, message: &str);
}

fn build(level: NotificationLevel, message: &str) -> Notification {
    Notification {
        id: Uuid::new_v4().to_string(),
        level,
        message: message.to_string(),
        created_at: Utc::now(),
    }
}

#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    fn push(&self, notification: Notification) {
        if self.sender.send(notification).is_err() {
            tracing::debug!("notification receiver dropped");
        }
    }
}

impl Notifier for ChannelNotifier {
    fn notify_success(&self, message: &str) {
        self.push(build(NotificationLevel::Success, message));
    }

    fn notify_error(&self, message: &str) {
        self.push(build(NotificationLevel::Error, message));
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify_success(&self, message: &str) {
        tracing::info!(text = message, "operator notification");
    }

    fn notify_error(&self, message: &str) {
        tracing::warn!(text = message, "operator notification");
    }
}
