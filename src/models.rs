use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[serde(rename = "REALIZADO", alias = "COMPLETED")]
    Completed,
    #[serde(rename = "PENDENTE", alias = "PENDING")]
    Pending,
    #[serde(rename = "GRATUITO", alias = "FREE")]
    Free,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 3] = [Self::Completed, Self::Pending, Self::Free];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "REALIZADO",
            Self::Pending => "PENDENTE",
            Self::Free => "GRATUITO",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|status| {
            status.as_str().eq_ignore_ascii_case(label) || status.english_name().eq_ignore_ascii_case(label)
        })
    }

    fn english_name(self) -> &'static str {
        match self {
            Self::Completed => "COMPLETED",
            Self::Pending => "PENDING",
            Self::Free => "FREE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    pub name: String,
    #[serde(rename = "nome_cracha", alias = "badgeName", default)]
    pub badge_name: String,
    pub email: String,
    pub payment_status: PaymentStatus,
    #[serde(rename = "credential", alias = "credentialed")]
    pub credentialed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Buyer {
    #[serde(rename = "uuid_user", alias = "userId")]
    pub user_id: String,
    #[serde(rename = "nome", alias = "name")]
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewPage<T> {
    pub rows: Vec<T>,
    pub page_count: usize,
    pub current_page: usize,
    pub total_matches: usize,
    pub show_pagination: bool,
    pub pending_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum ToggleOutcome {
    #[serde(rename_all = "camelCase")]
    Confirmed { record_id: String, credentialed: bool },
    #[serde(rename_all = "camelCase")]
    RolledBack { record_id: String, credentialed: bool },
}

impl ToggleOutcome {
    pub fn credentialed(&self) -> bool {
        match self {
            Self::Confirmed { credentialed, .. } | Self::RolledBack { credentialed, .. } => *credentialed,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationSummary {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub free: usize,
    pub credentialed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardFigures {
    #[serde(rename = "total_inscritos", default)]
    pub total_registrants: u64,
    #[serde(rename = "total_arrecadado", default)]
    pub total_collected: f64,
    #[serde(rename = "inscricoes_pendentes", default)]
    pub pending_registrations: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    pub path: String,
    pub file_name: String,
    pub row_count: usize,
}
