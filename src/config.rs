use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_API_URL: &str = "CREDENCIAMENTO_API_URL";
pub const ENV_API_TOKEN: &str = "CREDENCIAMENTO_API_TOKEN";
pub const ENV_PAGE_SIZE: &str = "CREDENCIAMENTO_PAGE_SIZE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleSettings {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub page_size: usize,
    pub request_timeout_ms: u64,
    pub export_dir: PathBuf,
    pub export_file_name: String,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            api_token: None,
            page_size: 20,
            request_timeout_ms: 15_000,
            export_dir: PathBuf::from("exports"),
            export_file_name: "Credenciamento.xlsx".to_string(),
        }
    }
}

impl ConsoleSettings {
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let mut settings = match path {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };
        settings.apply_env_overrides(|key| std::env::var(key).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_json_file(path: &Path) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|error| AppError::Config(format!("cannot read {}: {}", path.display(), error)))?;
        let update: serde_json::Value = serde_json::from_str(&raw)
            .map_err(|error| AppError::Config(format!("invalid settings file {}: {}", path.display(), error)))?;
        Self::default().merged(update)
    }

    pub fn merged(&self, update: serde_json::Value) -> AppResult<Self> {
        let mut current = serde_json::to_value(self)?;
        merge_json_skip_null(&mut current, update);
        serde_json::from_value(current).map_err(|error| AppError::Config(error.to_string()))
    }

    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> AppResult<()> {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_base_url = url;
        }
        if let Some(token) = lookup(ENV_API_TOKEN) {
            self.api_token = if token.trim().is_empty() { None } else { Some(token) };
        }
        if let Some(raw) = lookup(ENV_PAGE_SIZE) {
            self.page_size = raw
                .trim()
                .parse()
                .map_err(|_| AppError::Config(format!("{} must be a positive integer, got {:?}", ENV_PAGE_SIZE, raw)))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.page_size == 0 {
            return Err(AppError::Config("pageSize must be at least 1".to_string()));
        }
        if self.api_base_url.trim().is_empty() {
            return Err(AppError::Config("apiBaseUrl cannot be empty".to_string()));
        }
        if self.export_file_name.trim().is_empty() {
            return Err(AppError::Config("exportFileName cannot be empty".to_string()));
        }
        Ok(())
    }
}

fn merge_json_skip_null(target: &mut serde_json::Value, update: serde_json::Value) {
    match (target, update) {
        (serde_json::Value::Object(target_map), serde_json::Value::Object(update_map)) => {
            for (key, value) in update_map {
                merge_json_skip_null(
                    target_map.entry(key).or_insert(serde_json::Value::Null),
                    value,
                );
            }
        }
        (_, serde_json::Value::Null) => {}
        (target, update) => {
            *target = update;
        }
    }
}
