// src/workbook.rs
//! Excel export.
//!
//! Sheet names follow the spreadsheet limits: at most 31 characters and none
//! of `[ ] : * ? / \`. When two names collide after cleaning (case-insensitive),
//! the first sheet keeps the name and later ones get ` (2)`, ` (3)`, …,
//! shortened so the result still fits. "History" is reserved by Excel and
//! becomes `History_`.
//!
//! Cells longer than Excel's 32,767 characters are cut to fit. Integers that
//! an `f64` cannot hold exactly are written as text so no digit is lost.

use rust_xlsxwriter::{DocProperties, ExcelDateTime, Format, Workbook, Worksheet};
use serde_json::{Number, Value};

use crate::config::consts::SHEET_NAME_MAX;
use crate::csv::cell_text;
use crate::error::ExportError;
use crate::normalize::{NormalizedField, NormalizedTable};

const FORBIDDEN: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];
const FALLBACK_SHEET: &str = "Sheet";
const RESERVED_SHEET: &str = "history";

/// Excel's per-cell text limit, in characters.
pub const MAX_CELL_CHARS: usize = 32_767;
/// Largest integer magnitude an `f64` represents exactly (2^53).
const MAX_EXACT_INT: u64 = 1 << 53;
/// Stamped into docProps/core.xml so equal input gives equal bytes.
const CREATED: (u16, u8, u8) = (2000, 1, 1);

/// Replace forbidden characters, trim apostrophes, cap at 31 chars.
pub fn clean_sheet_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if FORBIDDEN.contains(&c) { '_' } else { c })
        .collect();
    let trimmed = replaced.trim_matches('\'');
    let capped: String = trimmed.chars().take(SHEET_NAME_MAX).collect();
    let capped = capped.trim_end_matches('\'');
    if capped.is_empty() {
        s!(FALLBACK_SHEET)
    } else if capped.eq_ignore_ascii_case(RESERVED_SHEET) {
        format!("{capped}_")
    } else {
        s!(capped)
    }
}

/// Tracks names handed out for one workbook.
#[derive(Debug, Default)]
pub struct SheetNames {
    used: Vec<String>, // lowercased
}

impl SheetNames {
    /// Clean `wanted` and make it unique. First writer wins the bare name.
    pub fn claim(&mut self, wanted: &str) -> String {
        let base = clean_sheet_name(wanted);
        let mut candidate = base.clone();
        let mut n = 1usize;
        while self.is_used(&candidate) {
            n += 1;
            let suffix = format!(" ({n})");
            let room = SHEET_NAME_MAX.saturating_sub(suffix.chars().count());
            let stem: String = base.chars().take(room).collect();
            candidate = format!("{}{suffix}", stem.trim_end());
        }
        self.used.push(candidate.to_lowercase());
        candidate
    }

    fn is_used(&self, name: &str) -> bool {
        let lc = name.to_lowercase();
        self.used.iter().any(|u| *u == lc)
    }
}

/// A workbook under construction.
pub struct WorkbookBuilder {
    book: Workbook,
    names: SheetNames,
    header: Format,
    sheets: Vec<String>,
}

impl Default for WorkbookBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkbookBuilder {
    pub fn new() -> Self {
        Self {
            book: Workbook::new(),
            names: SheetNames::default(),
            header: Format::new().set_bold(),
            sheets: Vec::new(),
        }
    }

    /// Add `table` as a sheet. Returns the name it actually got.
    pub fn add_table(&mut self, table: &NormalizedTable, sheet_name: &str) -> Result<String, ExportError> {
        let name = self.names.claim(sheet_name);
        if name != clean_sheet_name(sheet_name) {
            logw!("Workbook: sheet name {sheet_name:?} taken, using {name:?}");
        }

        let sheet = self.book.add_worksheet();
        sheet.set_name(name.as_str())?;
        write_table(sheet, table, &self.header)?;

        self.sheets.push(name.clone());
        Ok(name)
    }

    /// Names in insertion order.
    pub fn sheet_names(&self) -> &[String] {
        &self.sheets
    }

    pub fn finish(mut self) -> Result<Vec<u8>, ExportError> {
        if self.sheets.is_empty() {
            // A workbook needs at least one sheet.
            self.book.add_worksheet();
        }
        let (y, m, d) = CREATED;
        let created = ExcelDateTime::from_ymd(y, m, d)?;
        self.book.set_properties(&DocProperties::new().set_creation_datetime(&created));
        Ok(self.book.save_to_buffer()?)
    }
}

/// `Some` only when the number survives the trip through `f64` unchanged.
fn exact_f64(n: &Number) -> Option<f64> {
    if let Some(i) = n.as_i64() {
        (i.unsigned_abs() <= MAX_EXACT_INT).then_some(i as f64)
    } else if let Some(u) = n.as_u64() {
        (u <= MAX_EXACT_INT).then_some(u as f64)
    } else {
        n.as_f64()
    }
}

/// Cut `text` to `MAX_CELL_CHARS` on a char boundary.
pub fn fit_cell(text: &str) -> &str {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

fn write_text(sheet: &mut Worksheet, r: u32, c: u16, text: &str) -> Result<(), ExportError> {
    let fitted = fit_cell(text);
    if fitted.len() < text.len() {
        logw!("Workbook: cell ({r},{c}) cut from {} to {MAX_CELL_CHARS} chars", text.chars().count());
    }
    sheet.write_string(r, c, fitted)?;
    Ok(())
}

fn write_table(sheet: &mut Worksheet, table: &NormalizedTable, header: &Format) -> Result<(), ExportError> {
    for (ci, col) in table.columns().iter().enumerate() {
        sheet.write_string_with_format(0, col_ix(ci)?, fit_cell(col), header)?;
    }
    for (ri, row) in table.rows().iter().enumerate() {
        let r = u32::try_from(ri + 1).map_err(|_| out_of_range("row"))?;
        for (ci, cell) in row.iter().enumerate() {
            let c = col_ix(ci)?;
            match cell {
                Value::Null => {}
                Value::Bool(b) => { sheet.write_boolean(r, c, *b)?; }
                Value::Number(n) => match exact_f64(n) {
                    Some(f) => { sheet.write_number(r, c, f)?; }
                    None => write_text(sheet, r, c, &n.to_string())?,
                },
                Value::String(s) => write_text(sheet, r, c, s)?,
                Value::Array(_) | Value::Object(_) => write_text(sheet, r, c, &cell_text(cell))?,
            }
        }
    }
    Ok(())
}

fn col_ix(ci: usize) -> Result<u16, ExportError> {
    u16::try_from(ci).map_err(|_| out_of_range("column"))
}

fn out_of_range(what: &str) -> ExportError {
    ExportError::Io(std::io::Error::new(
        std::io::ErrorKind::InvalidInput,
        format!("{what} index out of range for a worksheet"),
    ))
}

/// Add `table` to `wb` as one sheet. Returns the resolved sheet name.
pub fn to_workbook_sheet(
    wb: &mut WorkbookBuilder,
    table: &NormalizedTable,
    sheet_name: &str,
) -> Result<String, ExportError> {
    wb.add_table(table, sheet_name)
}

/// Single-sheet workbook for one table.
pub fn to_workbook_bytes(table: &NormalizedTable, sheet_name: &str) -> Result<Vec<u8>, ExportError> {
    let mut wb = WorkbookBuilder::new();
    to_workbook_sheet(&mut wb, table, sheet_name)?;
    wb.finish()
}

/// One sheet per table field, request order. Scalars are skipped.
pub fn plan_combined(fields: &[NormalizedField]) -> Vec<(String, &NormalizedTable)> {
    let mut names = SheetNames::default();
    fields
        .iter()
        .filter_map(|f| f.table().map(|t| (names.claim(&f.name), t)))
        .collect()
}

pub fn to_combined_workbook(fields: &[NormalizedField]) -> Result<Vec<u8>, ExportError> {
    let mut wb = WorkbookBuilder::new();
    for (name, t) in plan_combined(fields) {
        to_workbook_sheet(&mut wb, t, &name)?;
    }
    logd!("Workbook: combined sheets={:?}", wb.sheet_names());
    wb.finish()
}
