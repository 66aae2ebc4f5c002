use crate::errors::{AppError, AppResult};
use crate::models::Record;
use rust_xlsxwriter::{Format, Workbook};
use std::path::PathBuf;
use std::sync::Mutex;
use uuid::Uuid;

pub const SHEET_NAME: &str = "Dados";

pub const COLUMNS: [(&str, f64); 6] = [
    ("ID", 40.0),
    ("Nome", 40.0),
    ("Nome no crachá", 30.0),
    ("Email", 40.0),
    ("Pagamento", 20.0),
    ("Credenciamento", 20.0),
];

pub fn yes_no(value: bool) -> &'static str {
    if value {
        "Sim"
    } else {
        "Não"
    }
}

pub fn project_row(record: &Record) -> [String; 6] {
    [
        record.id.clone(),
        record.name.clone(),
        record.badge_name.clone(),
        record.email.clone(),
        record.payment_status.as_str().to_string(),
        yes_no(record.credentialed).to_string(),
    ]
}

pub fn project_rows(records: &[Record]) -> Vec<[String; 6]> {
    records.iter().map(project_row).collect()
}

pub fn render_workbook(records: &[Record]) -> AppResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, (title, width)) in COLUMNS.iter().enumerate() {
        let col = col as u16;
        worksheet.set_column_width(col, *width)?;
        worksheet.write_string_with_format(0, col, *title, &header)?;
    }

    for (index, cells) in project_rows(records).into_iter().enumerate() {
        let row = u32::try_from(index + 1)
            .map_err(|_| AppError::Export(format!("{} rows do not fit in a worksheet", records.len())))?;
        for (col, value) in cells.into_iter().enumerate() {
            worksheet.write_string(row, col as u16, value)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

pub trait ExportSink: Send + Sync {
    fn deliver(&self, bytes: &[u8], file_name: &str) -> AppResult<String>;
}

#[derive(Debug, Clone)]
pub struct FileExportSink {
    export_dir: PathBuf,
}

impl FileExportSink {
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
        }
    }
}

impl ExportSink for FileExportSink {
    fn deliver(&self, bytes: &[u8], file_name: &str) -> AppResult<String> {
        std::fs::create_dir_all(&self.export_dir).map_err(|error| AppError::Io(error.to_string()))?;

        let output_path = self.export_dir.join(sanitize_export_file_name(file_name));
        if !output_path.starts_with(&self.export_dir) {
            return Err(AppError::Export("Resolved export path escaped export directory".to_string()));
        }

        let partial_path = self
            .export_dir
            .join(format!(".{}.partial", Uuid::new_v4()));
        if let Err(error) = std::fs::write(&partial_path, bytes)
            .and_then(|_| std::fs::rename(&partial_path, &output_path))
        {
            let _ = std::fs::remove_file(&partial_path);
            return Err(AppError::Export(format!("could not write {}: {}", output_path.display(), error)));
        }

        Ok(output_path.to_string_lossy().to_string())
    }
}

#[derive(Debug, Default)]
pub struct MemoryExportSink {
    deliveries: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemoryExportSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<(String, Vec<u8>)> {
        match self.deliveries.lock() {
            Ok(mut deliveries) => std::mem::take(&mut *deliveries),
            Err(_) => Vec::new(),
        }
    }
}

impl ExportSink for MemoryExportSink {
    fn deliver(&self, bytes: &[u8], file_name: &str) -> AppResult<String> {
        let mut deliveries = self
            .deliveries
            .lock()
            .map_err(|_| AppError::Internal("export sink mutex poisoned".to_string()))?;
        deliveries.push((file_name.to_string(), bytes.to_vec()));
        Ok(format!("memory://{}", file_name))
    }
}

pub fn sanitize_export_file_name(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch.is_alphanumeric() || ch == '-' || ch == '_' || ch == '.' {
            out.push(ch);
        } else {
            out.push('_');
        }
    }
    let candidate: String = out.trim_matches(|c: char| c == '_' || c == '.').chars().take(120).collect();
    let candidate = if candidate.is_empty() {
        "export".to_string()
    } else {
        candidate
    };
    if candidate.to_ascii_lowercase().ends_with(".xlsx") {
        candidate
    } else {
        format!("{}.xlsx", candidate)
    }
}
