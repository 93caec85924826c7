//! Writer für Datensatz-Dateien.

use super::RecordsDocument;
use anyhow::Result;

/// Schreibt ein Dokument als formatiertes JSON (mit abschließendem Zeilenumbruch).
pub fn write_records_document(document: &RecordsDocument) -> Result<String> {
    let mut output = serde_json::to_string_pretty(document)?;
    output.push('\n');
    Ok(output)
}
