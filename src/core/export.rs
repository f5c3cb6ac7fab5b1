use crate::errors::{AppError, AppResult};
use crate::models::TimerEntry;
use crate::ui::messages::{info, success, warning};
use crate::utils::time::to_local_string;
use clap::ValueEnum;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Flat row for CSV / JSON export of timer entries.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct TimerEntryExport {
    pub id: String,
    pub job_id: i64,
    pub technician: String,
    pub start: String,
    pub end: String,
    pub minutes: i64,
    pub notes: String,
}

impl TimerEntryExport {
    pub fn from_entry(job_id: i64, e: &TimerEntry) -> Self {
        Self {
            id: e.id.map(|i| i.to_string()).unwrap_or_default(),
            job_id: e.job_id.unwrap_or(job_id),
            technician: e.technician_name.clone().unwrap_or_default(),
            start: e.start_time.as_ref().map(to_local_string).unwrap_or_default(),
            end: e.end_time.as_ref().map(to_local_string).unwrap_or_default(),
            minutes: e.minutes(),
            notes: e.notes.clone().unwrap_or_default(),
        }
    }
}

pub struct ExportLogic;

impl ExportLogic {
    /// Write the entries of `job_id` to `file`. An existing file is replaced
    /// only with `force` or after confirmation.
    pub fn export_entries(
        job_id: i64,
        entries: &[TimerEntry],
        format: ExportFormat,
        file: &str,
        force: bool,
    ) -> AppResult<()> {
        let path = Path::new(file);
        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "output path must be absolute: {}",
                file
            )));
        }
        ensure_writable(path, force)?;

        let rows: Vec<TimerEntryExport> = entries
            .iter()
            .map(|e| TimerEntryExport::from_entry(job_id, e))
            .collect();

        match format {
            ExportFormat::Csv => export_csv(&rows, path)?,
            ExportFormat::Json => export_json(&rows, path)?,
        }

        success(format!(
            "{} export completed: {}",
            format.as_str().to_uppercase(),
            path.display()
        ));
        Ok(())
    }
}

fn export_json(rows: &[TimerEntryExport], path: &Path) -> AppResult<()> {
    info(format!("Exporting to JSON: {}", path.display()));
    let json_data = serde_json::to_string_pretty(rows)?;
    let mut file = File::create(path)?;
    file.write_all(json_data.as_bytes())?;
    Ok(())
}

fn export_csv(rows: &[TimerEntryExport], path: &Path) -> AppResult<()> {
    info(format!("Exporting to CSV: {}", path.display()));

    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| AppError::Export(format!("CSV open error: {e}")))?;
    for row in rows {
        wtr.serialize(row)
            .map_err(|e| AppError::Export(format!("CSV write error: {e}")))?;
    }
    wtr.flush()?;
    Ok(())
}

fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    if !path.exists() || force {
        return Ok(());
    }

    warning(format!("The file '{}' already exists.", path.display()));
    print!("Overwrite? [y/N]: ");
    io::stdout().flush().ok();

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    if matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
        info("Existing file will be overwritten.");
        Ok(())
    } else {
        Err(AppError::Export(
            "export cancelled: existing file not overwritten".to_string(),
        ))
    }
}
