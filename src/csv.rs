// src/csv.rs
use std::io::{self, Write};
use std::mem::take;

use serde_json::Value;

use crate::normalize::NormalizedTable;

pub const SEP: char = ',';

/* ---------------- Parsing ---------------- */

/// Minimal CSV parser (quotes + CRLF tolerant). Reads back what `write_row` emits.
pub fn parse_rows(text: &str, sep: char) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut field = s!();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if matches!(chars.peek(), Some('"')) {
                        chars.next(); // double-quote escape
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            c if c == sep && !in_quotes => {
                row.push(take(&mut field));
            }
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) { chars.next(); }
                row.push(take(&mut field));
                rows.push(take(&mut row));
            }
            _ => field.push(ch),
        }
    }

    // Trailing row without a newline, even if quotes were unterminated.
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

/* ---------------- Writing ---------------- */

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV row to any writer.
pub fn write_row<W, S>(mut w: W, row: &[S], sep: char) -> io::Result<()>
where
    W: Write,
    S: AsRef<str>,
{
    // A lone empty cell would be a blank line, which readers drop.
    if let [only] = row {
        if only.as_ref().is_empty() {
            return writeln!(w, "\"\"");
        }
    }

    let mut first = true;
    for cell in row {
        let cell = cell.as_ref();
        if !first { write!(w, "{}", sep)?; } else { first = false; }
        if needs_quotes(cell, sep) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{}\"", escaped)?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Text for one cell: null → empty, strings raw, everything else as JSON.
pub fn cell_text(v: &Value) -> String {
    match v {
        Value::Null => s!(),
        Value::String(s) => s.clone(),
        Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_) => v.to_string(),
    }
}

/// Header + one line per row. A table without columns yields no bytes at all.
pub fn to_csv_bytes(table: &NormalizedTable) -> Vec<u8> {
    let mut buf: Vec<u8> = Vec::new();
    if table.ncols() == 0 {
        return buf;
    }

    // Writes into a Vec<u8> cannot fail.
    let _ = write_row(&mut buf, table.columns(), SEP);
    for row in table.rows() {
        let cells: Vec<String> = row.iter().map(cell_text).collect();
        let _ = write_row(&mut buf, &cells, SEP);
    }
    buf
}

/// Same as `to_csv_bytes`, as text (clipboard path).
pub fn to_csv_string(table: &NormalizedTable) -> String {
    match String::from_utf8(to_csv_bytes(table)) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    }
}
