pub mod api;
pub mod config;
pub mod console;
pub mod errors;
pub mod export;
pub mod filter;
pub mod models;
pub mod mutation;
pub mod notify;
pub mod paginator;
pub mod store;

pub use crate::api::{AdminApi, HttpAdminApi};
pub use crate::config::ConsoleSettings;
pub use crate::console::{BuyerList, RegistrantConsole};
pub use crate::errors::{AppError, AppResult};
pub use crate::export::{ExportSink, FileExportSink, MemoryExportSink};
pub use crate::models::{
    Buyer, DashboardFigures, ExportResponse, Notification, NotificationLevel, PaymentStatus, Record,
    RegistrationSummary, ToggleOutcome, ViewPage,
};
pub use crate::notify::{ChannelNotifier, LogNotifier, Notifier};

use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

static LOG_GUARD: std::sync::OnceLock<WorkerGuard> = std::sync::OnceLock::new();

#[derive(Clone)]
pub struct AppState {
    console: Arc<RegistrantConsole>,
}

impl AppState {
    pub fn bootstrap(
        settings: &ConsoleSettings,
        event_id: impl Into<String>,
    ) -> AppResult<(Self, mpsc::UnboundedReceiver<Notification>)> {
        settings.validate()?;
        let api = Arc::new(HttpAdminApi::new(settings)?);
        let (notifier, notifications) = ChannelNotifier::new();
        let sink = Arc::new(FileExportSink::new(settings.export_dir.clone()));
        let console = RegistrantConsole::new(event_id, api, Arc::new(notifier), sink, settings);
        Ok((Self::new(Arc::new(console)), notifications))
    }

    pub fn new(console: Arc<RegistrantConsole>) -> Self {
        Self { console }
    }

    pub fn console(&self) -> &Arc<RegistrantConsole> {
        &self.console
    }

    pub async fn refresh(&self) -> Result<usize, String> {
        self.console.refresh().await.map_err(to_client_error)
    }

    pub fn view(&self) -> Result<ViewPage<Record>, String> {
        self.console.view().map_err(to_client_error)
    }

    pub fn search(&self, query: String) -> Result<ViewPage<Record>, String> {
        self.console.set_query(query).map_err(to_client_error)
    }

    pub fn filter_by_status(&self, label: &str) -> Result<Option<PaymentStatus>, String> {
        let status = PaymentStatus::from_label(label).ok_or_else(|| format!("Unknown payment status {}", label))?;
        self.console
            .set_categorical_filter(status)
            .map_err(to_client_error)
    }

    pub fn next_page(&self) -> Result<bool, String> {
        self.console.next().map_err(to_client_error)
    }

    pub fn prev_page(&self) -> Result<bool, String> {
        self.console.prev().map_err(to_client_error)
    }

    pub fn go_to_page(&self, page: usize) -> Result<usize, String> {
        self.console.go_to(page).map_err(to_client_error)
    }

    pub async fn toggle_credential(&self, record_id: String) -> Result<ToggleOutcome, String> {
        self.console
            .toggle_flag(&record_id)
            .await
            .map_err(to_client_error)
    }

    pub fn export_all(&self) -> Result<ExportResponse, String> {
        self.console.export_all().map_err(to_client_error)
    }

    pub fn summary(&self) -> Result<RegistrationSummary, String> {
        self.console.summary().map_err(to_client_error)
    }
}

pub fn init_tracing(log_dir: &Path) -> Result<(), String> {
    std::fs::create_dir_all(log_dir).map_err(|error| error.to_string())?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "console.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .json()
        .with_writer(non_blocking)
        .try_init()
        .map_err(|error| error.to_string())
}

pub fn to_client_error(error: impl std::fmt::Display) -> String {
    error.to_string()
}
