// src/export.rs
//! Export artifacts: bytes + filename + MIME type, handed to the UI/CLI.

use serde::Serialize;
use serde_json::Value;

use crate::{
    config::consts::ALL_DATA_STEM,
    core::sanitize::sanitize_filename_part,
    csv,
    error::ExportError,
    normalize::{FieldData, NormalizedField, NormalizedTable},
    request::Target,
    workbook,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Json,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Csv, ExportFormat::Xlsx, ExportFormat::Json];

    pub fn ext(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Json => "json",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            ExportFormat::Json => "application/json",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Xlsx => "Excel",
            ExportFormat::Json => "JSON",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "xlsx" | "excel" => Some(ExportFormat::Xlsx),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }

    /// Formats a field can be exported in. Scalars are JSON-only.
    pub fn offered_for(data: &FieldData) -> &'static [ExportFormat] {
        match data {
            FieldData::Table(_) => &Self::ALL,
            FieldData::Scalar(_) => &[ExportFormat::Json],
        }
    }
}

/// Immutable export result. Ownership goes to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mime: &'static str,
}

impl ExportArtifact {
    fn new(bytes: Vec<u8>, filename: String, format: ExportFormat) -> Self {
        Self { bytes, filename, mime: format.mime() }
    }
}

/// `{target}_{field}.{ext}`, both parts filename-safe.
pub fn artifact_name(target: Target, field: &str, format: ExportFormat) -> String {
    format!(
        "{}_{}.{}",
        target.stem(),
        sanitize_filename_part(field, "field"),
        format.ext()
    )
}

/// Pretty JSON, 2-space indent, keys in first-seen order.
pub fn to_json_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, ExportError> {
    Ok(serde_json::to_vec_pretty(value)?)
}

pub fn to_csv_bytes(table: &NormalizedTable) -> Vec<u8> {
    csv::to_csv_bytes(table)
}

/// One artifact for one field in one format.
pub fn field_artifact(
    target: Target,
    field: &NormalizedField,
    format: ExportFormat,
) -> Result<ExportArtifact, ExportError> {
    let filename = artifact_name(target, &field.name, format);
    let bytes = match (&field.data, format) {
        (FieldData::Table(t), ExportFormat::Csv) => csv::to_csv_bytes(t),
        (FieldData::Table(t), ExportFormat::Xlsx) => workbook::to_workbook_bytes(t, &field.name)?,
        (data, ExportFormat::Json) => to_json_bytes(data)?,
        (FieldData::Scalar(_), f @ (ExportFormat::Csv | ExportFormat::Xlsx)) => {
            return Err(ExportError::NotExportable { field: field.name.clone(), format: f.label() });
        }
    };
    Ok(ExportArtifact::new(bytes, filename, format))
}

/// Every format the field supports.
pub fn field_artifacts(target: Target, field: &NormalizedField) -> Result<Vec<ExportArtifact>, ExportError> {
    ExportFormat::offered_for(&field.data)
        .iter()
        .map(|f| field_artifact(target, field, *f))
        .collect()
}

/// The whole payload as `{target}_all_data.json`.
pub fn all_data_artifact(target: Target, payload: &Value) -> Result<ExportArtifact, ExportError> {
    Ok(ExportArtifact::new(
        to_json_bytes(payload)?,
        artifact_name(target, ALL_DATA_STEM, ExportFormat::Json),
        ExportFormat::Json,
    ))
}

/// Every table field in one workbook, `{target}_all_data.xlsx`.
pub fn combined_workbook_artifact(
    target: Target,
    fields: &[NormalizedField],
) -> Result<ExportArtifact, ExportError> {
    Ok(ExportArtifact::new(
        workbook::to_combined_workbook(fields)?,
        artifact_name(target, ALL_DATA_STEM, ExportFormat::Xlsx),
        ExportFormat::Xlsx,
    ))
}

/// Artifacts for a batch: per-field files in `formats`, then the all-data
/// JSON (if JSON is selected) and the combined workbook (if Excel is selected).
pub fn batch_artifacts(
    target: Target,
    payload: &Value,
    fields: &[NormalizedField],
    formats: &[ExportFormat],
) -> Result<Vec<ExportArtifact>, ExportError> {
    let mut out = Vec::new();
    for field in fields {
        for f in ExportFormat::offered_for(&field.data) {
            if formats.contains(f) {
                out.push(field_artifact(target, field, *f)?);
            }
        }
    }
    if formats.contains(&ExportFormat::Json) {
        out.push(all_data_artifact(target, payload)?);
    }
    if formats.contains(&ExportFormat::Xlsx) {
        out.push(combined_workbook_artifact(target, fields)?);
    }
    Ok(out)
}
